use crate::assess::{run_assess, AssessArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use trustlens::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "trustlens",
    about = "Assess consumer product trust from regulatory records and review history",
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
    /// Assess products matching an ID or keyword and print the result
    Assess(AssessArgs),
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
        Command::Assess(args) => run_assess(args),
    }
}
