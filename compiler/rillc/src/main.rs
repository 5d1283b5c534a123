//! The `rill` command-line driver.

use rillc::commands::{check_file, disassemble_file, parse_options, run_file, CliOptions};

fn main() {
    rillc::init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = args[1].as_str();
    let handler: fn(&CliOptions) -> i32 = match command {
        "run" => run_file,
        "check" => check_file,
        "dis" | "disassemble" => disassemble_file,
        "help" | "--help" | "-h" => {
            print_usage();
            return;
        }
        "version" | "--version" | "-V" => {
            println!("rill {}", env!("CARGO_PKG_VERSION"));
            return;
        }
        other => {
            eprintln!("error: unknown command '{other}'");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    };

    let options = match parse_options(&args[2..]) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("error: {message}");
            eprintln!("Usage: rill {command} <file.rl> [options]");
            std::process::exit(1);
        }
    };

    let code = handler(&options);
    if code != 0 {
        std::process::exit(code);
    }
}

fn print_usage() {
    println!("rill: a small stack-machine scripting language");
    println!();
    println!("Usage: rill <command> <file.rl> [options]");
    println!();
    println!("Commands:");
    println!("  run <file>      Compile and run a script");
    println!("  check <file>    Compile without running");
    println!("  dis <file>      Print the compiled instruction listing");
    println!("  help            Show this message");
    println!("  version         Show version information");
    println!();
    println!("Options:");
    println!("  --stack-size=<n>     Operand stack limit (default: 1024)");
    println!("  --call-depth=<n>     Call nesting limit (default: 256)");
    println!("  --color=<mode>       Diagnostic colors: auto, always, never");
    println!();
    println!("Set RILL_LOG=debug to trace compilation and execution.");
}
