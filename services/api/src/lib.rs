mod assess;
mod cli;
mod infra;
mod routes;
mod server;

use diabetes_survey::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
