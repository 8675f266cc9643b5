mod cli;
mod infra;
mod report;
mod routes;
mod server;

use bistro_forecast::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
