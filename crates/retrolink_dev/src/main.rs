use std::path::PathBuf;

use clap::{Parser, Subcommand};
use retrolink_core::fallback::FallbackTable;
use retrolink_core::markup::{audit_routes, FsMarkupSource, MarkupAvailability};
use retrolink_core::registry::CORE_ROUTES;
use retrolink_core::watcher::{watch_modules, RouteReload};
use retrolink_core::{LoaderConfig, RouteId};
use tokio::sync::broadcast;

#[derive(Parser)]
#[command(name = "retrolink-dev", about = "Serve and check Retrolink views")]
struct Cli {
    /// Config file
    #[arg(short, long, default_value = retrolink_core::config::DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the shell and view markup, reporting view changes
    Serve {
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Report which views would render fallback markup
    Check {
        /// Extra routes to probe besides the core ones
        routes: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let mut config = LoaderConfig::load_or_default(&cli.config)?;

    match cli.command {
        Command::Serve { port } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            serve(config).await
        }
        Command::Check { routes } => check(&config, routes).await,
    }
}

async fn serve(config: LoaderConfig) -> anyhow::Result<()> {
    let (tx, mut rx) = broadcast::channel::<RouteReload>(64);
    let markup_root = config.resolved_markup_root();

    tokio::spawn(async move {
        if let Err(e) = watch_modules(&markup_root, tx).await {
            tracing::error!("view watcher stopped: {:#}", e);
        }
    });
    tokio::spawn(async move {
        while let Ok(RouteReload { route }) = rx.recv().await {
            tracing::info!("view `{}` changed, reload {}", route, route.to_hash());
        }
    });

    retrolink_core::serve(&config).await
}

async fn check(config: &LoaderConfig, extra: Vec<String>) -> anyhow::Result<()> {
    let source = FsMarkupSource::new(config.resolved_markup_root());
    let fallback = FallbackTable::with_defaults(config.default_route());

    let mut routes: Vec<RouteId> = CORE_ROUTES.into_iter().map(RouteId::from).collect();
    routes.extend(extra.into_iter().map(RouteId::from));

    let report = audit_routes(&source, &fallback, &routes).await;
    let mut missing = 0;
    for audit in &report {
        let status = match audit.availability {
            MarkupAvailability::Fetchable => "ok",
            MarkupAvailability::Fallback => "fallback",
            MarkupAvailability::Missing => {
                missing += 1;
                "missing"
            }
        };
        let detail = match &audit.detail {
            Some(detail) => detail.clone(),
            None => source.path_for(&audit.route).display().to_string(),
        };
        println!("{:<10} {:<9} {}", audit.route, status, detail);
    }

    if missing > 0 {
        anyhow::bail!("{} route(s) have neither markup nor fallback", missing);
    }
    Ok(())
}
