use std::process::ExitCode;

use clap::Parser;
use floe_cli::{exit_status, run_enforce, Cli, Command};

fn main() -> ExitCode {
    floe_core::tracing::init_tracing();
    let cli = Cli::parse();
    let code = match cli.command {
        Command::Enforce(args) => exit_status(run_enforce(&args)),
    };
    ExitCode::from(code)
}
