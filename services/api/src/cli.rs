use crate::report::{run_forecast, run_vocabulary, ForecastArgs, VocabularyArgs};
use crate::server;
use bistro_forecast::error::AppError;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Bistro Forecast",
    about = "Forecast rating, sales, best city and launch month for a new restaurant",
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
    /// Run a single forecast and print the report
    Forecast(ForecastArgs),
    /// List the cities and cuisines the models were trained on
    Vocabulary(VocabularyArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Override the directory holding the model artifacts
    #[arg(long)]
    pub(crate) artifact_dir: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Forecast(args) => run_forecast(args),
        Command::Vocabulary(args) => run_vocabulary(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["bistro-forecast-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn forecast_flags_fill_the_request() {
        let cli = Cli::try_parse_from([
            "bistro-forecast-api",
            "forecast",
            "--restaurant-name",
            "Spice Route",
            "--city",
            "Kolkata",
            "--month",
            "10",
            "--json",
        ])
        .expect("parses");

        let Some(Command::Forecast(args)) = cli.command else {
            panic!("expected forecast command");
        };
        assert_eq!(args.restaurant_name, "Spice Route");
        assert_eq!(args.city.as_deref(), Some("Kolkata"));
        assert_eq!(args.month, 10);
        assert_eq!(args.year, 2024);
        assert!(args.json);
    }

    #[test]
    fn month_outside_calendar_is_rejected_by_the_parser() {
        let result = Cli::try_parse_from(["bistro-forecast-api", "forecast", "--month", "13"]);
        assert!(result.is_err());
    }
}
