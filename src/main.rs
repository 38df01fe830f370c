use benefit_buddy::{
    cli::{App, Cli, render_error},
    config::{catalog::load_catalog, settings::Settings},
    core::{period::today, store::UsageStore},
    errors::Result,
    storage::AnyBackend,
};
use clap::Parser;
use dotenvy::dotenv;
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // 1. Parse arguments first so --help and usage errors skip all setup
    let cli = Cli::parse();

    // 2. Initialize tracing; stdout is reserved for command output
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            debug!(error = ?e, "Command failed");
            eprintln!("{}", render_error(&e));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<String> {
    // 3. Load .env and settings
    dotenv().ok(); // Non-fatal, env vars can be set externally
    let settings = Settings::from_env()?;

    // 4. Load the card catalog
    let catalog_path = cli.catalog.unwrap_or_else(|| settings.catalog_path.clone());
    let catalog = load_catalog(&catalog_path)?;

    // 5. Open storage and load the persisted user data
    let backend = AnyBackend::connect(&settings).await?;
    let store = UsageStore::open(backend).await;

    // 6. Run the command
    let today = today();
    let reference = cli.date.unwrap_or(today);
    info!(%reference, %today, "Running command");
    let mut app = App::new(catalog, store, reference, today);
    app.execute(cli.command).await
}
