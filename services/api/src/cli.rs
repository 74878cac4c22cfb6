use crate::demo::{run_quote, run_yield, QuoteArgs, YieldArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use estimo::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Estimo",
    about = "Run the fee and rental-yield estimation service or compute one-off estimates",
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
    /// Print a professional-services fee quote for a construction budget
    Quote(QuoteArgs),
    /// Print a rental-investment profitability analysis
    Yield(YieldArgs),
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
        Command::Quote(args) => run_quote(args),
        Command::Yield(args) => run_yield(args),
    }
}
