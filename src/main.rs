use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    rustyll_preview::cli::run().await
}
