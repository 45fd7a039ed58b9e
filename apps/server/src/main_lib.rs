use std::sync::Arc;

use crate::{
    auth::{decode_secret_key, AuthConfig, AuthManager, UserDirectory},
    config::{Config, StorageKind},
};
use fundbook_core::{
    datasets::{ImportService, ImportServiceTrait},
    funds::{FundRepositoryTrait, FundService, FundServiceTrait},
    identity::IdentityProviderTrait,
    ledger::{LedgerService, LedgerServiceTrait},
    movements::{MovementService, MovementServiceTrait},
    trades::{StrategyCatalog, TradeService, TradeServiceTrait},
};
use fundbook_storage_csv::{
    funds::FundRepository, movements::MovementRepository, spawn_writer, trades::TradeRepository,
    CsvFileStore, MemoryStore, TabularStoreTrait,
};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub struct AppState {
    pub fund_service: Arc<dyn FundServiceTrait>,
    pub movement_service: Arc<dyn MovementServiceTrait>,
    pub trade_service: Arc<dyn TradeServiceTrait>,
    pub ledger_service: Arc<dyn LedgerServiceTrait>,
    pub import_service: Arc<dyn ImportServiceTrait>,
    pub identity_provider: Arc<dyn IdentityProviderTrait>,
    pub auth: Arc<AuthManager>,
}

pub fn init_tracing() {
    let log_format = std::env::var("FB_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let store: Arc<dyn TabularStoreTrait> = match config.storage {
        StorageKind::Csv => {
            let store = CsvFileStore::open(&config.data_dir)?;
            tracing::info!("Data directory in use: {}", store.root().display());
            Arc::new(store)
        }
        StorageKind::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on shutdown");
            Arc::new(MemoryStore::new())
        }
    };
    let writer = spawn_writer(store.clone());

    let movement_repo = Arc::new(MovementRepository::new(store.clone(), writer.clone()));
    let trade_repo = Arc::new(TradeRepository::new(store.clone(), writer.clone()));
    let fund_repo = Arc::new(FundRepository::new(store.clone(), writer.clone()));

    let fund_service = Arc::new(FundService::new(
        fund_repo.clone(),
        movement_repo.clone(),
        trade_repo.clone(),
    ));
    let movement_service = Arc::new(MovementService::new(
        movement_repo.clone(),
        fund_service.clone(),
    ));
    let catalog = Arc::new(StrategyCatalog::with_extra(&config.extra_strategies));
    let trade_service = Arc::new(TradeService::new(
        trade_repo.clone(),
        fund_service.clone(),
        catalog,
    ));
    let ledger_service = Arc::new(LedgerService::new(
        movement_repo.clone(),
        trade_repo.clone(),
    ));
    let import_service = Arc::new(ImportService::new(
        movement_repo,
        trade_repo,
        fund_repo.clone(),
    ));

    let users = UserDirectory::load(&config.users_file)?;
    // Every assigned fund must exist before its users can sign in.
    for identity in users.list_identities() {
        if !fund_service.fund_exists(&identity.assigned_fund)? {
            fund_repo.register(&identity.assigned_fund).await?;
            tracing::info!("Registered fund '{}'", identity.assigned_fund);
        }
    }

    let auth = Arc::new(AuthManager::new(&AuthConfig {
        jwt_secret: decode_secret_key(&config.secret_key)?,
        access_token_ttl: config.token_ttl,
    }));

    Ok(Arc::new(AppState {
        fund_service,
        movement_service,
        trade_service,
        ledger_service,
        import_service,
        identity_provider: Arc::new(users),
        auth,
    }))
}
