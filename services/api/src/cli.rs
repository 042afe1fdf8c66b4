use crate::quote::{run_catalog, run_quote, QuoteArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use handset_advisor::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Handset Contract Advisor",
    about = "Compare subsidized phone contracts against buying outright",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// List devices, carriers, and the offered fees and contract terms
    Catalog,
    /// Price a device and plan, with an optional advisory summary
    Quote(QuoteArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Catalog => {
            run_catalog();
            Ok(())
        }
        Command::Quote(args) => run_quote(args).await,
    }
}
