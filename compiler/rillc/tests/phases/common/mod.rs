//! Shared helpers for phase tests.

use std::sync::Arc;

use rill_eval::MachineConfig;
use rill_value::{Script, Value};
use rillc::prelude::{prelude, OutputSink, SharedSink};
use rillc::{Error, SourceFile};

/// Compile `text` as `test.rl` against a prelude that prints into a buffer.
pub fn compile_with_sink(text: &str) -> (SharedSink, Result<(Arc<SourceFile>, Script), Error>) {
    let sink = OutputSink::buffer();
    let result = rillc::load("test.rl", text, &prelude(&sink));
    (sink, result)
}

pub fn compile_ok(text: &str) -> Script {
    compile_with_sink(text).1.unwrap().1
}

pub fn compile_err(text: &str) -> Error {
    match compile_with_sink(text).1 {
        Ok(_) => panic!("expected `{text}` to fail to compile"),
        Err(err) => err,
    }
}

/// Compile and run, returning the printed output and the final stack.
pub fn run_with(text: &str, config: MachineConfig) -> (String, Result<Vec<Value>, Error>) {
    let (sink, compiled) = compile_with_sink(text);
    let (_, script) = compiled.unwrap();
    let result = rillc::run(&script, config);
    (sink.contents(), result)
}

pub fn run(text: &str) -> (String, Vec<Value>) {
    let (output, result) = run_with(text, MachineConfig::default());
    (output, result.unwrap())
}

pub fn run_err(text: &str) -> (String, Error) {
    run_err_with(text, MachineConfig::default())
}

pub fn run_err_with(text: &str, config: MachineConfig) -> (String, Error) {
    match run_with(text, config) {
        (output, Err(err)) => (output, err),
        (_, Ok(stack)) => panic!("expected `{text}` to fail, left {stack:?}"),
    }
}
