use crate::report::{run_export, run_report, run_years, ExportArgs, ReportArgs, YearsArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use enrollment::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Enrollment Management Dashboard",
    about = "Serve and report enrollment pipeline statistics from a candidate export",
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
    /// Print pipeline statistics and breakdowns for the selected years
    Report(ReportArgs),
    /// List the academic years present in the dataset
    Years(YearsArgs),
    /// Write the filtered candidate rows to a CSV file
    Export(ExportArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Override the configured candidate CSV
    #[arg(long)]
    pub(crate) data: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Report(args) => run_report(args),
        Command::Years(args) => run_years(args),
        Command::Export(args) => run_export(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn report_accepts_year_list() {
        let cli = Cli::try_parse_from(["dashboard", "report", "--years", "2022,2023", "--json"])
            .expect("parses");
        match cli.command {
            Some(Command::Report(args)) => {
                assert_eq!(args.years.as_deref(), Some("2022,2023"));
                assert!(args.json);
            }
            other => panic!("expected report command, got {other:?}"),
        }
    }

    #[test]
    fn serve_is_the_default() {
        let cli = Cli::try_parse_from(["dashboard"]).expect("parses");
        assert!(cli.command.is_none());
    }
}
