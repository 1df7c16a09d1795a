use credvault::{Config, CredentialStore, console};
use mimalloc::MiMalloc;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = Config::from_env()?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.basic.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    info!(
        database_path = %cfg.basic.database_path.display(),
        loglevel = %cfg.basic.loglevel,
        memory_kib = cfg.hashing.memory_kib,
        iterations = cfg.hashing.iterations
    );

    let store = CredentialStore::new(&cfg)?;
    store.initialize().await?;

    let lines = console::stdin_lines()?;
    console::run_until(&store, lines, tokio::io::stdout(), interrupted()).await?;
    Ok(())
}

async fn interrupted() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => warn!("interrupted; exiting"),
        Err(e) => {
            warn!(error = %e, "cannot listen for ctrl-c; only `quit` or EOF will stop the console");
            std::future::pending::<()>().await;
        }
    }
}
