mod app;
mod commands;
mod config;
mod logging;
mod resolver;
mod setup;
mod speech;
mod ui;

use resolver::ResolveError;

#[tokio::main]
async fn main() {
    if let Err(e) = app::run().await {
        if should_report(&e) {
            eprintln!("Error: {e:#}");
        }
        std::process::exit(1);
    }
}

/// cliclack already reported an operator cancel; every other error is printed.
fn should_report(error: &anyhow::Error) -> bool {
    !matches!(
        error.downcast_ref::<ResolveError>(),
        Some(ResolveError::Cancelled)
    )
}
