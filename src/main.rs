//! Durak smoke tests - black-box HTTP checks for the Durak card-game backend
//!
//! Runs the smoke-test suite against a running server and exits non-zero
//! if any check fails or the server is unreachable.

use clap::Parser;
use durak_smoke::commands::{Commands, GlobalArgs};
use durak_smoke::{cli, common::logging};

#[derive(Parser)]
#[command(name = "durak-smoke", about = "Smoke tests for the Durak backend")]
#[command(version, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    args: GlobalArgs,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    logging::init_cli(cli.args.verbose);

    let command = cli.command.unwrap_or(Commands::Run);

    match cli::dispatch(command, cli.args).await {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
