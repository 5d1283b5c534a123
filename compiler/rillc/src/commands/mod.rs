//! Command handlers for the `rill` binary.
//!
//! Each handler returns the process exit code instead of exiting, so the
//! handlers can be driven from tests.

use std::io::IsTerminal;
use std::sync::Arc;

use rill_diagnostic::emitter::{DiagnosticEmitter, TerminalEmitter};
use rill_diagnostic::ColorMode;
use rill_eval::MachineConfig;
use rill_ir::SourceFile;
use rill_value::Script;

use crate::prelude::{prelude, OutputSink};
use crate::{compile, run, Error};

/// Options shared by every command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CliOptions {
    pub path: String,
    pub config: MachineConfig,
    pub color: ColorMode,
}

/// Parse the arguments following the command name.
pub fn parse_options(args: &[String]) -> Result<CliOptions, String> {
    let mut path = None;
    let mut config = MachineConfig::default();
    let mut color = ColorMode::Auto;

    for arg in args {
        if let Some(value) = arg.strip_prefix("--stack-size=") {
            config.max_stack_size = parse_limit("--stack-size", value)?;
        } else if let Some(value) = arg.strip_prefix("--call-depth=") {
            config.max_call_depth = parse_limit("--call-depth", value)?;
        } else if let Some(value) = arg.strip_prefix("--color=") {
            color = ColorMode::parse(value)
                .ok_or_else(|| format!("invalid value `{value}` for --color"))?;
        } else if arg.starts_with('-') {
            return Err(format!("unknown option `{arg}`"));
        } else if path.is_none() {
            path = Some(arg.clone());
        } else {
            return Err(format!("unexpected argument `{arg}`"));
        }
    }

    let path = path.ok_or_else(|| "missing file path".to_string())?;
    Ok(CliOptions {
        path,
        config,
        color,
    })
}

fn parse_limit(flag: &str, value: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(format!("{flag} expects a positive integer, got `{value}`")),
    }
}

/// Compile and run a file, printing through stdout.
pub fn run_file(options: &CliOptions) -> i32 {
    let Some(source) = read_file(&options.path) else {
        return 1;
    };
    let builtins = prelude(&OutputSink::stdout());
    let result = compile(&source, &builtins).and_then(|script| run(&script, options.config));
    match result {
        Ok(_) => 0,
        Err(err) => {
            report_error(&err, &source, options.color);
            1
        }
    }
}

/// Compile a file without running it.
pub fn check_file(options: &CliOptions) -> i32 {
    let Some(source) = read_file(&options.path) else {
        return 1;
    };
    match compile(&source, &prelude(&OutputSink::silent())) {
        Ok(_) => 0,
        Err(err) => {
            report_error(&err, &source, options.color);
            1
        }
    }
}

/// Compile a file and print its instruction listing.
pub fn disassemble_file(options: &CliOptions) -> i32 {
    let Some(source) = read_file(&options.path) else {
        return 1;
    };
    match compile(&source, &prelude(&OutputSink::silent())) {
        Ok(script) => {
            print!("{}", disassemble(&script));
            0
        }
        Err(err) => {
            report_error(&err, &source, options.color);
            1
        }
    }
}

/// Listing of the script body followed by every function bound in the
/// global scope.
pub fn disassemble(script: &Script) -> String {
    let mut out = script.main().disassemble();
    for name in script.scopes().local_names(script.global()) {
        let function = script
            .scopes()
            .lookup_local(script.global(), name.as_str())
            .and_then(|value| value.as_function());
        if let Some(function) = function {
            out.push('\n');
            out.push_str(&function.disassemble());
        }
    }
    out
}

fn read_file(path: &str) -> Option<Arc<SourceFile>> {
    match std::fs::read_to_string(path) {
        Ok(text) => Some(SourceFile::new(path, text)),
        Err(err) => {
            eprintln!("error: cannot read '{path}': {err}");
            None
        }
    }
}

fn report_error(err: &Error, source: &Arc<SourceFile>, color: ColorMode) {
    let report = err.report(source);
    let is_tty = std::io::stderr().is_terminal();
    let mut emitter = TerminalEmitter::stderr(color, is_tty)
        .with_source(report.source.text())
        .with_file_path(report.source.name());
    emitter.emit(&report.diagnostic);
    emitter.emit_summary(1);
    emitter.flush();
}
