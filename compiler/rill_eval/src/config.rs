//! Machine limits.

/// Resource limits of a [`Machine`](crate::Machine).
///
/// Both limits are enforced with runtime errors rather than by truncation:
/// pushing beyond `max_stack_size` values raises a stack overflow, and a
/// call that would exceed `max_call_depth` nested frames is rejected.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MachineConfig {
    pub max_stack_size: usize,
    pub max_call_depth: usize,
}

impl MachineConfig {
    pub const DEFAULT_STACK_SIZE: usize = 1024;
    pub const DEFAULT_CALL_DEPTH: usize = 256;

    #[must_use]
    pub fn with_stack_size(mut self, max_stack_size: usize) -> Self {
        self.max_stack_size = max_stack_size;
        self
    }

    #[must_use]
    pub fn with_call_depth(mut self, max_call_depth: usize) -> Self {
        self.max_call_depth = max_call_depth;
        self
    }
}

impl Default for MachineConfig {
    fn default() -> Self {
        MachineConfig {
            max_stack_size: Self::DEFAULT_STACK_SIZE,
            max_call_depth: Self::DEFAULT_CALL_DEPTH,
        }
    }
}
