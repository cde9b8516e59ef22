use crate::report::{run_demo, run_report, DemoArgs, ReportArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use radar_egresados::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Radar de Egresados",
    about = "Serve and render the graduate employability dashboard",
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
    /// Compute the dashboard from survey CSV exports
    Report(ReportArgs),
    /// Print the dashboard for the built-in sample cohort
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
        Command::Report(args) => run_report(args),
        Command::Demo(args) => run_demo(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_flags_parse() {
        let cli = Cli::try_parse_from([
            "radar",
            "report",
            "--competencies",
            "competencias.csv",
            "--today",
            "2025-09-10",
            "--limit",
            "2",
            "--year",
            "2024",
            "--json",
        ])
        .expect("arguments parse");

        match cli.command {
            Some(Command::Report(args)) => {
                assert_eq!(
                    args.competencies.as_deref(),
                    Some(std::path::Path::new("competencias.csv"))
                );
                assert_eq!(args.limit.map(|limit| limit.get()), Some(2));
                assert_eq!(args.year, Some(2024));
                assert!(args.json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn invalid_date_is_rejected() {
        let result = Cli::try_parse_from(["radar", "demo", "--today", "10/09/2025"]);
        assert!(result.is_err());
    }

    #[test]
    fn zero_limit_is_rejected() {
        let result = Cli::try_parse_from(["radar", "report", "--limit", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn no_subcommand_defaults_to_serve() {
        let cli = Cli::try_parse_from(["radar"]).expect("arguments parse");
        assert!(cli.command.is_none());
    }
}
