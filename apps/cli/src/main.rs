mod args;
mod config;
mod dirs;

use std::io;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use app_api::AppContext;
use http_api::HttpState;
use portfolio_app::{AppPaths, AppState, ensure_app_data_dir};
use tracing_subscriber::EnvFilter;
use view_counter::{
    AdminPanel, FileStore, HttpRemoteCounter, SystemClock, ThreadRandom, ViewCountDisplay,
};

use crate::args::{AdminAction, CliArgs, Command};
use crate::config::CliConfig;

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[tokio::main]
async fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = args::parse_args().map_err(|err| {
        eprintln!("{err}");
        args::print_help();
        io::Error::new(io::ErrorKind::InvalidInput, "invalid arguments")
    })?;

    let loaded = config::load_or_create(args.config.as_deref()).map_err(io::Error::other)?;
    if loaded.created {
        tracing::info!(path = %loaded.file.display(), "created default config");
    }
    let config = loaded.config;

    let data_dir = dirs::resolve_data_dir(args.data_dir.as_deref(), config.data_dir.as_deref())
        .map_err(io::Error::other)?;
    std::fs::create_dir_all(&data_dir)?;

    match args.command.clone() {
        Command::Serve => serve(&args, &config, &data_dir).await,
        Command::Admin(action) => admin(action, &config, &data_dir).await,
        Command::Display { project_id, record } => {
            display(&project_id, record, &config, &data_dir).await
        }
    }
}

async fn serve(args: &CliArgs, config: &CliConfig, data_dir: &Path) -> CliResult<()> {
    let paths = AppPaths::new(data_dir.to_path_buf());
    ensure_app_data_dir(&paths).map_err(|err| io::Error::other(err.to_string()))?;

    let app_state = AppState::new(paths.db_path.clone(), args.seed || config.seed_defaults);
    if app_state.is_fresh_db() {
        tracing::info!(path = %paths.db_path.display(), "creating database");
    }
    app_state
        .initialize()
        .map_err(|err| io::Error::other(format!("failed to initialize database: {}", err)))?;

    let context = AppContext { app_state };
    let state = HttpState::new(context)
        .with_allowed_origins(config.allowed_origins.clone())
        .with_trusted_forwarded_for(config.trust_forwarded_for);
    let router = http_api::router(state);

    let port = args.port.unwrap_or(config.port);
    let bind: std::net::IpAddr = config
        .bind
        .parse()
        .map_err(|_| io::Error::other(format!("invalid bind address: {}", config.bind)))?;
    let listener = tokio::net::TcpListener::bind(SocketAddr::new(bind, port)).await?;
    let addr = listener.local_addr()?;
    tracing::info!(%addr, "analytics server listening");

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn admin(action: AdminAction, config: &CliConfig, data_dir: &Path) -> CliResult<()> {
    let store = FileStore::open(data_dir.join(&config.client.store_file))?;
    let mut panel = AdminPanel::new(config.client.flags(), store, Arc::new(ThreadRandom));

    match action {
        AdminAction::List => {
            let counts = panel.counts()?;
            if counts.is_empty() {
                println!("No local counters.");
            }
            for (project_id, count) in counts {
                println!("{project_id}\t{count}");
            }
        }
        AdminAction::Get(project_id) => {
            println!("{}", panel.get(&project_id)?);
        }
        AdminAction::Set(project_id, count) => {
            panel.set(&project_id, count)?;
            println!("{project_id} set to {count}");
        }
        AdminAction::Reset(project_id) => {
            let value = panel.reset(&project_id)?;
            println!("{project_id} reset to {value}");
        }
        AdminAction::ResetTimer(project_id) => {
            panel.reset_timer(&project_id)?;
            println!("{project_id} growth timer cleared");
        }
        AdminAction::Clear => {
            let removed = panel.clear_all()?;
            println!("Removed {removed} local entries.");
        }
        AdminAction::Spike => {
            for (project_id, count) in panel.simulate_spike()? {
                println!("{project_id}\t{count}");
            }
        }
        AdminAction::Export => {
            println!("{}", panel.export()?);
        }
        AdminAction::Import(path) => {
            let payload = std::fs::read_to_string(&path)?;
            let imported = panel.import(&payload)?;
            println!("Imported {imported} counters from {}.", path.display());
        }
        AdminAction::RemoteSummary => {
            let remote = HttpRemoteCounter::new(&config.client.remote_settings())?;
            remote.health().await.map_err(|err| {
                io::Error::other(format!("analytics server unreachable: {}", err))
            })?;
            for record in panel.remote_summary(&remote).await? {
                println!(
                    "{}\t{}\t{}\t{}",
                    record.project_id,
                    record.view_count,
                    record.unique_visitors,
                    record.last_updated
                );
            }
        }
    }
    Ok(())
}

async fn display(
    project_id: &str,
    record: bool,
    config: &CliConfig,
    data_dir: &Path,
) -> CliResult<()> {
    let settings = config.client.remote_settings();
    let remote = HttpRemoteCounter::new(&settings)?;
    let store = FileStore::open(data_dir.join(&config.client.store_file))?;
    let mut view = ViewCountDisplay::new(
        config.client.flags(),
        remote,
        store,
        Arc::new(SystemClock),
        Arc::new(ThreadRandom),
    )
    .with_remote_timeout(settings.timeout);

    let shown = view.display_count(project_id, record).await?;
    let source = if shown.is_live { "live" } else { "local" };
    println!("{project_id}\t{}\t{source}", shown.value);
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for ctrl-c");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => tracing::error!(error = %err, "failed to listen for SIGTERM"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
