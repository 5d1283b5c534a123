//! The minimal host prelude: `print` and `+`.
//!
//! Output goes through an [`OutputSink`] so that the CLI can write to
//! stdout while tests and embedders capture it.

use std::sync::Arc;

use parking_lot::Mutex;
use rill_value::{EvalErrorKind, ScopeArena, Value};

/// Where `print` writes.
#[derive(Debug)]
pub enum OutputSink {
    Stdout,
    /// Captures output for later inspection.
    Buffer(Mutex<String>),
    /// Discards output.
    Silent,
}

/// A sink shared between the host and the natives that write to it.
pub type SharedSink = Arc<OutputSink>;

impl OutputSink {
    pub fn stdout() -> SharedSink {
        Arc::new(OutputSink::Stdout)
    }

    pub fn buffer() -> SharedSink {
        Arc::new(OutputSink::Buffer(Mutex::new(String::new())))
    }

    pub fn silent() -> SharedSink {
        Arc::new(OutputSink::Silent)
    }

    /// Write a line (with newline).
    pub fn println(&self, msg: &str) {
        match self {
            OutputSink::Stdout => println!("{msg}"),
            OutputSink::Buffer(buffer) => {
                let mut buf = buffer.lock();
                buf.push_str(msg);
                buf.push('\n');
            }
            OutputSink::Silent => {}
        }
    }

    /// Everything captured so far; empty for sinks that do not capture.
    pub fn contents(&self) -> String {
        match self {
            OutputSink::Buffer(buffer) => buffer.lock().clone(),
            OutputSink::Stdout | OutputSink::Silent => String::new(),
        }
    }

    pub fn clear(&self) {
        if let OutputSink::Buffer(buffer) = self {
            buffer.lock().clear();
        }
    }
}

/// A builtin scope holding `print` and `+`.
pub fn prelude(sink: &SharedSink) -> ScopeArena {
    let mut scopes = ScopeArena::new();
    let root = scopes.root();

    let out = Arc::clone(sink);
    scopes.register_native(root, "print", move |_, args| {
        let line = args
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ");
        out.println(&line);
        Ok(())
    });

    scopes.register_native(root, "+", |ctx, args| {
        let mut total = 0.0;
        for value in args.iter() {
            let Some(n) = value.as_number() else {
                return Err(EvalErrorKind::native(format!(
                    "`+` expects numbers, got {}",
                    value.type_name()
                )));
            };
            total += n;
        }
        ctx.push(Value::Number(total))
    });

    scopes
}
