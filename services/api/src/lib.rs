mod cli;
mod infra;
mod quote;
mod routes;
mod server;

use handset_advisor::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
