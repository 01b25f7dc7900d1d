pub mod config;
pub mod error;
pub mod forms;
pub mod routes;
pub mod telemetry;

mod cli;
mod server;

use error::AppError;

/// Parse the command line and run the selected command.
pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
