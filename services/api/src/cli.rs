use crate::batch::{run_analyze, run_fields, run_fill, AnalyzeArgs, FieldsArgs, FillArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use wohngeld_forms::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Wohngeld Forms",
    about = "Fill and analyse Wohngeld application forms over HTTP or from the command line",
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
    /// Fill a form template from an application data file
    Fill(FillArgs),
    /// Classify the fields of a template and print the recommended mapping
    Analyze(AnalyzeArgs),
    /// List the field names of a template
    Fields(FieldsArgs),
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
        Command::Fill(args) => run_fill(args),
        Command::Analyze(args) => run_analyze(args),
        Command::Fields(args) => run_fields(args),
    }
}
