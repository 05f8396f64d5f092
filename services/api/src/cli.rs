use crate::demo::{run_assess, run_catalog, run_demo, AssessArgs, DemoArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use dose_titration::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Dose Titration Reassessment",
    about = "Run or exercise the semaglutide dose-titration reassessment engine",
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
    /// Evaluate a questionnaire stored as JSON and print the recommendation
    Assess(AssessArgs),
    /// Print the reference tables used to score questionnaires
    Catalog,
    /// Run the canonical reassessment scenarios through the service
    Demo(DemoArgs),
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
        Command::Catalog => run_catalog(),
        Command::Demo(args) => run_demo(args),
    }
}
