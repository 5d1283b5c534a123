use std::fmt;

/// Error codes for all rill diagnostics.
///
/// Format: E#### where first digit indicates phase:
/// - E0xxx: Scan errors
/// - E1xxx: Syntax (reader) errors
/// - E2xxx: Compile errors
/// - E3xxx: Runtime errors
/// - E9xxx: Internal errors
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Scan Errors (E0xxx)
    /// Unterminated string literal
    E0001,
    /// Unterminated escape sequence
    E0002,
    /// Invalid escape sequence
    E0003,
    /// String literal crosses a line break
    E0004,

    // Syntax Errors (E1xxx)
    /// Unexpected closing delimiter
    E1001,
    /// Unclosed delimiter
    E1002,
    /// Mismatched closing delimiter
    E1003,
    /// Malformed map literal
    E1004,
    /// Malformed number literal
    E1005,

    // Compile Errors (E2xxx)
    /// Malformed special form
    E2001,
    /// Constant redefinition
    E2002,
    /// `break`/`continue` outside of a loop
    E2003,
    /// Non-constant value in `const`
    E2004,
    /// Expected a name
    E2005,
    /// Empty expression
    E2006,
    /// Wrong operand count for an operator
    E2007,
    /// Label defined twice in one function
    E2008,

    // Runtime Errors (E3xxx)
    /// Unbound name
    E3001,
    /// Operand type mismatch
    E3002,
    /// Operand stack overflow
    E3003,
    /// Operand stack underflow
    E3004,
    /// Missing array index or object key
    E3005,
    /// Wrong number of arguments
    E3006,
    /// Unresolvable jump label
    E3007,
    /// Value is not callable
    E3008,
    /// Call stack overflow
    E3009,
    /// Native function failure
    E3010,
    /// Assignment to a constant binding
    E3011,

    // Internal Errors (E9xxx)
    /// Internal compiler error
    E9001,
}

impl ErrorCode {
    /// Get the numeric code as a string (e.g., "E1001").
    pub fn as_str(&self) -> &'static str {
        match self {
            // Scan
            ErrorCode::E0001 => "E0001",
            ErrorCode::E0002 => "E0002",
            ErrorCode::E0003 => "E0003",
            ErrorCode::E0004 => "E0004",
            // Syntax
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E1003 => "E1003",
            ErrorCode::E1004 => "E1004",
            ErrorCode::E1005 => "E1005",
            // Compile
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
            ErrorCode::E2003 => "E2003",
            ErrorCode::E2004 => "E2004",
            ErrorCode::E2005 => "E2005",
            ErrorCode::E2006 => "E2006",
            ErrorCode::E2007 => "E2007",
            ErrorCode::E2008 => "E2008",
            // Runtime
            ErrorCode::E3001 => "E3001",
            ErrorCode::E3002 => "E3002",
            ErrorCode::E3003 => "E3003",
            ErrorCode::E3004 => "E3004",
            ErrorCode::E3005 => "E3005",
            ErrorCode::E3006 => "E3006",
            ErrorCode::E3007 => "E3007",
            ErrorCode::E3008 => "E3008",
            ErrorCode::E3009 => "E3009",
            ErrorCode::E3010 => "E3010",
            ErrorCode::E3011 => "E3011",
            // Internal
            ErrorCode::E9001 => "E9001",
        }
    }

    /// Pipeline stage that reports this code, read off the leading digit.
    pub fn phase(&self) -> Phase {
        match self.as_str().as_bytes().get(1) {
            Some(b'0') => Phase::Scan,
            Some(b'1') => Phase::Syntax,
            Some(b'2') => Phase::Compile,
            Some(b'3') => Phase::Runtime,
            _ => Phase::Internal,
        }
    }
}

/// Where in the pipeline a failure was detected.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Phase {
    Scan,
    Syntax,
    Compile,
    Runtime,
    Internal,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Scan => "scan",
            Phase::Syntax => "syntax",
            Phase::Compile => "compile",
            Phase::Runtime => "runtime",
            Phase::Internal => "internal",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
