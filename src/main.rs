// Entrypoint for the CLI application.
// - Parses arguments, sets up logging and hands off to `commands::run`.
// - Argument errors exit with status 1 like every other failure; `--help`
//   and `--version` exit with 0.

use clap::Parser;
use gnotes::{cli::Cli, commands, logging};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    logging::init(cli.verbose);
    commands::run(cli)
}
