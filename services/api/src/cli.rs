use crate::assess::{run_assess, run_batch, run_schema, AssessArgs, BatchArgs, SchemaArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use diabetes_survey::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Diabetes Risk Survey",
    about = "Collect health survey answers and request a diabetes risk assessment",
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
    /// Print the survey questionnaire
    Schema(SchemaArgs),
    /// Run one survey session and print the classified result
    Assess(AssessArgs),
    /// Run one survey session per row of a BRFSS-style CSV export
    Batch(BatchArgs),
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
        Command::Schema(args) => run_schema(args),
        Command::Assess(args) => run_assess(args).await,
        Command::Batch(args) => run_batch(args).await,
    }
}
