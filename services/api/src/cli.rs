use crate::demo::{run_analyze, run_demo, run_import, AnalyzeArgs, DemoArgs, ImportArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use miso_engine::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "MISO Analysis",
    about = "Run the MISO psychometric analysis engine from the command line",
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
    /// Analyze a single JSON assessment submission
    Analyze(AnalyzeArgs),
    /// Import a long-format CSV export and analyze every user in it
    Import(ImportArgs),
    /// Walk through the bundled sample personas
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
    /// Preload stored assessments from a CSV export
    #[arg(long)]
    pub(crate) seed_csv: Option<PathBuf>,
    /// Preload the bundled sample personas
    #[arg(long)]
    pub(crate) seed_demo: bool,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Analyze(args) => run_analyze(args),
        Command::Import(args) => run_import(args),
        Command::Demo(args) => run_demo(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_arguments_defaults_to_serve() {
        let cli = Cli::try_parse_from(["miso-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn analyze_accepts_date_only_as_of() {
        let cli = Cli::try_parse_from([
            "miso-api",
            "analyze",
            "--input",
            "submission.json",
            "--as-of",
            "2026-06-01",
        ])
        .expect("parses");
        match cli.command {
            Some(Command::Analyze(args)) => {
                assert_eq!(args.input, PathBuf::from("submission.json"));
                let as_of = args.as_of.expect("as_of parsed");
                assert_eq!(as_of.to_rfc3339(), "2026-06-01T00:00:00+00:00");
            }
            other => panic!("expected analyze command, got {other:?}"),
        }
    }

    #[test]
    fn import_rejects_garbage_dates() {
        let result = Cli::try_parse_from([
            "miso-api",
            "import",
            "--csv",
            "export.csv",
            "--as-of",
            "soon",
        ]);
        assert!(result.is_err());
    }
}
