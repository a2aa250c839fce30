use std::process::ExitCode;

use clap::Parser;

use espresso_cli::{run, Cli};
use espresso_core::errors::EspressoErrorCode;
use espresso_core::tracing::init_tracing;

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match run(cli.command, &mut out) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(code = e.error_code(), "{e}");
            eprintln!("{}", e.tagged_message());
            ExitCode::from(e.exit_code())
        }
    }
}
