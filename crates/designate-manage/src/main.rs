//! designate-manage - Entry point

use std::sync::Arc;

use anyhow::Context as _;
use clap::Parser;
use tracing::info;

use designate_config::ConfigLoader;
use designate_core::TldService;
use designate_manage::cli::{Cli, Command, ImportTldsArgs};
use designate_manage::{admin_context, HttpTldService, ImportTlds, MemoryTldStore};
use designate_telemetry::init_logging;

async fn import_tlds(args: ImportTldsArgs) -> anyhow::Result<()> {
    let service: Arc<dyn TldService> = match (&args.endpoint, args.dry_run) {
        (_, true) => {
            info!("Dry run, TLDs are checked against an empty in-memory store");
            Arc::new(MemoryTldStore::new())
        }
        (Some(endpoint), false) => Arc::new(HttpTldService::new(endpoint.clone())?),
        (None, false) => anyhow::bail!("--endpoint is required unless --dry-run is given"),
    };

    let command = ImportTlds::new(service, admin_context(args.auth_token.as_deref()))
        .with_delimiter(args.delimiter);
    command
        .import_file(&args.input_file)
        .await
        .with_context(|| format!("import-tlds failed for {}", args.input_file.display()))?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Before parsing: .env may set DESIGNATE_ENDPOINT and DESIGNATE_AUTH_TOKEN
    let mut loader = ConfigLoader::new().with_defaults().with_dotenv()?;
    let cli = Cli::parse();

    if let Some(path) = &cli.config {
        loader = loader.with_file(path)?;
    }
    let config = loader.with_env_prefix("DESIGNATE").load()?;

    init_logging(&config.logging.to_log_config())?;

    match cli.command {
        Command::ImportTlds(args) => import_tlds(args).await,
    }
}
