//! `cool-parse` entry point.

use std::env;
use std::io;
use std::process::ExitCode;

use cool_cli::{BatchParser, CliConfig, Repl, help_text, init_tracing};

fn main() -> ExitCode {
    init_tracing();
    let args: Vec<String> = env::args().collect();

    match run(args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("\x1b[31mError: {e}\x1b[0m");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Vec<String>) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let config = CliConfig::from_args(args)?;

    if config.show_help {
        println!("{}", help_text());
        return Ok(ExitCode::SUCCESS);
    }

    if config.show_version {
        println!("cool-parse {}", env!("CARGO_PKG_VERSION"));
        return Ok(ExitCode::SUCCESS);
    }

    if config.files.is_empty() {
        Repl::new()?.run()?;
        return Ok(ExitCode::SUCCESS);
    }

    let check = config.check;
    let batch = BatchParser::new(config)?;
    let summary = batch.run(&mut io::stdout().lock(), &mut io::stderr().lock())?;

    if check && !summary.is_clean() {
        eprintln!(
            "{} syntax error(s) in {} of {} file(s)",
            summary.errors, summary.files_with_errors, summary.files
        );
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
