use clap::Parser;
use souq_hex::application::bootstrap_service::{BootstrapService, InitReport};
use souq_hex::catalog::load_catalog;
use souq_hex::config::Config;
use souq_hex::domain::seed::SeedCatalog;
use souq_hex::errors::BootstrapError;
use souq_hex::outbound::launcher::LaunchPlan;
use souq_repo::build_store;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "souq-init")]
#[command(about = "Prepare the marketplace database, then start the app server", long_about = None)]
struct Cli {
    /// Stop after seeding instead of launching the app server
    #[arg(long)]
    init_only: bool,

    /// JSON file replacing the built-in reference data
    #[arg(long, env = "SEED_FILE")]
    seed_file: Option<PathBuf>,
}

fn main() -> ExitCode {
    // Load .env for DATABASE_URL / PORT when present.
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()))
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let stage = err.stage();
            let code = err.exit_code();
            tracing::error!(%stage, code, error = %err, "bootstrap aborted");
            eprintln!("[{stage}] {:?}", anyhow::Error::new(err));
            ExitCode::from(code)
        }
    }
}

fn run(cli: Cli) -> Result<(), BootstrapError> {
    let config = Config::from_env()?;
    let catalog = load_catalog(cli.seed_file.as_deref())?;
    // Resolve the launch target up front so a bad PORT fails before any I/O.
    let plan = if cli.init_only {
        None
    } else {
        Some(LaunchPlan::from_config(&config)?)
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| BootstrapError::Config(format!("cannot start async runtime: {e}")))?;
    let report = runtime.block_on(initialize(&config, &catalog))?;
    // Pool and runtime must be gone before the process image is replaced.
    drop(runtime);

    tracing::info!(
        tables_created = report.schema.created.len(),
        categories_inserted = report.seeds.categories.inserted,
        zones_inserted = report.seeds.shipping_zones.inserted,
        "initialization complete"
    );

    match plan {
        Some(plan) => Err(plan.exec()),
        None => Ok(()),
    }
}

async fn initialize(config: &Config, catalog: &SeedCatalog) -> Result<InitReport, BootstrapError> {
    tracing::info!("checking database connection");
    let store = build_store(&config.database_url, config.probe_timeout)
        .await
        .map_err(BootstrapError::Connectivity)?;
    BootstrapService::new(store).run(catalog).await
}
