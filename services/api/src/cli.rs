use crate::demo::{run_demo, run_status_report, DemoArgs, StatusReportArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use status_board::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Backend Status Board",
    about = "Resolve which capabilities are degraded by upstream backend outages",
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
    /// Inspect degraded capabilities from the command line
    Status {
        #[command(subcommand)]
        command: StatusCommand,
    },
    /// Run an end-to-end demo over the deployed topology with sample outages
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum StatusCommand {
    /// Print the affected-service report for a given outage set and instant
    Report(StatusReportArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Seed the in-memory outage store with sample maintenance windows
    #[arg(long)]
    pub(crate) demo_windows: bool,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Status {
            command: StatusCommand::Report(args),
        } => run_status_report(args),
        Command::Demo(args) => run_demo(args),
    }
}
