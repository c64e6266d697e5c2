// src/main.rs
//
// noghresod CLI
//
// Wiring order: config -> pool -> schema -> repositories -> gateway ->
// services -> event handlers -> AppState. Commands print DTO JSON on stdout;
// failures print the ErrorResponse JSON and exit non-zero.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use noghresod::application::{self, AppState, InitiatePaymentDto};
use noghresod::cache::CacheManager;
use noghresod::config::AppConfig;
use noghresod::db::{
    create_connection_pool, default_database_path, get_connection, get_database_stats,
    initialize_database, verify_database_integrity, ConnectionPool,
};
use noghresod::events::{create_event_bus, register_analytics_handlers};
use noghresod::integrations::{PaymentGateway, ZarinpalClient};
use noghresod::repositories::{
    AnalyticsRepository, PendingTransactionRepository, SqliteAnalyticsRepository,
    SqlitePendingTransactionRepository,
};
use noghresod::services::{AnalyticsService, PaymentService};

#[derive(Parser)]
#[command(name = "noghresod")]
#[command(about = "Payment core of the Noghre Sod jewelry store")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the local database
    InitDb,
    /// Open a gateway session for an order
    Pay {
        #[arg(long)]
        order_id: String,
        /// Amount in Rial
        #[arg(long)]
        amount: u64,
        #[arg(long)]
        description: String,
        #[arg(long)]
        mobile: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
    /// Validate a gateway redirect URL such as `noghresod://payment/callback?Authority=A1&Status=OK`
    Callback { url: String },
    /// Show the stored transaction for an authority
    Status { authority: String },
    /// Delete unverified transactions past the retention window
    Purge {
        /// Ignore the sweep interval
        #[arg(long)]
        force: bool,
    },
}

fn init_logging() {
    // stdout carries command output only
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn open_database(config: &AppConfig) -> anyhow::Result<Arc<ConnectionPool>> {
    let path: PathBuf = match &config.database_path {
        Some(path) => path.clone(),
        None => default_database_path()?,
    };
    log::debug!("Using database {}", path.display());

    let pool = create_connection_pool(&path)
        .with_context(|| format!("opening database {}", path.display()))?;
    {
        let conn = get_connection(&pool)?;
        initialize_database(&conn)?;
    }
    Ok(Arc::new(pool))
}

fn build_state(config: AppConfig, pool: Arc<ConnectionPool>) -> anyhow::Result<AppState> {
    // 1. INFRASTRUCTURE
    let event_bus = Arc::new(create_event_bus());
    let cache = Arc::new(CacheManager::new());
    let gateway: Arc<dyn PaymentGateway> = Arc::new(
        ZarinpalClient::new(config.gateway.clone()).context("configuring Zarinpal client")?,
    );

    // 2. REPOSITORIES
    let tx_repo: Arc<dyn PendingTransactionRepository> =
        Arc::new(SqlitePendingTransactionRepository::new(pool.clone()));
    let analytics_repo: Arc<dyn AnalyticsRepository> =
        Arc::new(SqliteAnalyticsRepository::new(pool));

    // 3. SERVICES
    let analytics_service = Arc::new(AnalyticsService::new(analytics_repo));
    let payment_service = Arc::new(PaymentService::new(
        tx_repo,
        gateway,
        event_bus.clone(),
        cache,
        config.payment.clone(),
    ));

    // 4. EVENT HANDLER REGISTRATION
    register_analytics_handlers(&event_bus, analytics_service.clone());

    Ok(AppState {
        event_bus,
        payment_service,
        analytics_service,
        config: Arc::new(config),
    })
}

fn print_outcome<T: Serialize>(outcome: Result<T, String>) -> anyhow::Result<ExitCode> {
    match outcome {
        Ok(dto) => {
            println!("{}", serde_json::to_string_pretty(&dto)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(error_json) => {
            println!("{}", error_json);
            Ok(ExitCode::FAILURE)
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    init_logging();
    let cli = Cli::parse();

    let config = AppConfig::from_env().context("reading configuration")?;
    let pool = open_database(&config)?;

    if let Commands::InitDb = cli.command {
        let conn = get_connection(&pool)?;
        verify_database_integrity(&conn)?;
        let stats = get_database_stats(&conn)?;
        log::info!("Database ready");
        return print_outcome(Ok::<_, String>(stats));
    }

    let state = build_state(config, pool)?;

    match cli.command {
        Commands::InitDb => Ok(ExitCode::SUCCESS),
        Commands::Pay {
            order_id,
            amount,
            description,
            mobile,
            email,
        } => {
            let dto = InitiatePaymentDto {
                order_id,
                amount,
                description,
                mobile,
                email,
            };
            print_outcome(application::initiate_payment(&state, dto).await)
        }
        Commands::Callback { url } => {
            print_outcome(application::handle_payment_callback(&state, url).await)
        }
        Commands::Status { authority } => {
            print_outcome(application::get_transaction(&state, authority).await)
        }
        Commands::Purge { force } => {
            print_outcome(application::purge_stale_transactions(&state, force).await)
        }
    }
}
