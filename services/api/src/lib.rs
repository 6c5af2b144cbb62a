mod batch;
mod cli;
mod infra;
mod routes;
mod server;

use wohngeld_forms::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
