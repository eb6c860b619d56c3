use crate::commands::{run_rubric, run_services, run_submit, ServicesArgs, SubmitArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use govtech_scoring::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "GovTech Service Scoring",
    about = "Serve and exercise the digital-service scoring form from the command line",
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
    /// List the services offered in the form's dropdown
    Services(ServicesArgs),
    /// Score and store an assessment read from a JSON file
    Submit(SubmitArgs),
    /// Print the scoring rubric for every category
    Rubric,
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
        Command::Services(args) => run_services(args).await,
        Command::Submit(args) => run_submit(args).await,
        Command::Rubric => {
            run_rubric();
            Ok(())
        }
    }
}
