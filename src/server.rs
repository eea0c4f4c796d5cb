//! Account panel server runtime.
//!
//! [`ServerHandle`] owns the full lifecycle: database init, migrations,
//! bootstrap admin, REST API and graceful shutdown.

use std::sync::Arc;

use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tracing::{error, info, warn};

use crate::application::AccountService;
use crate::config::{AdminConfig, AppConfig};
use crate::domain::{AccountError, AccountResult, AccountView};
use crate::infrastructure::crypto::password::BcryptCredentials;
use crate::infrastructure::database::migrator::Migrator;
use crate::infrastructure::database::repositories::AccountRepository;
use crate::shared::shutdown::{ShutdownCoordinator, ShutdownSignal};
use crate::domain::MATCH_ALL;
use crate::{create_api_router, init_database};

// ── Options ────────────────────────────────────────────────────────

/// Options for starting the server.
pub struct ServerOptions {
    /// Application configuration.
    pub config: AppConfig,
    /// Run database migrations on startup (default: true).
    pub auto_migrate: bool,
    /// Create the bootstrap admin if the store is empty (default: true).
    pub create_default_admin: bool,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            config: AppConfig::default(),
            auto_migrate: true,
            create_default_admin: true,
        }
    }
}

// ── ServerHandle ───────────────────────────────────────────────────

/// Handle to a running server.
///
/// # Examples
///
/// ```rust,no_run
/// use account_panel::server::{ServerHandle, ServerOptions};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let handle = ServerHandle::start(ServerOptions::default()).await?;
///     handle.install_signal_handler();
///     handle.shutdown_signal().wait().await;
///     handle.wait().await;
///     Ok(())
/// }
/// ```
pub struct ServerHandle {
    /// Account use-cases backed by the database.
    pub accounts: Arc<AccountService>,
    /// The configuration the server was started with.
    pub config: AppConfig,
    /// Port the API is listening on.
    pub api_port: u16,

    db: DatabaseConnection,
    shutdown: ShutdownCoordinator,
    api_task: tokio::task::JoinHandle<()>,
}

impl ServerHandle {
    /// Start the server with the given options.
    pub async fn start(opts: ServerOptions) -> Result<Self, Box<dyn std::error::Error>> {
        let app_cfg = opts.config;
        app_cfg.validate()?;

        info!("Starting account panel...");

        // ── Database ───────────────────────────────────────────
        let db = init_database(&app_cfg.database_config()).await?;

        if opts.auto_migrate {
            info!("Running database migrations...");
            Migrator::up(&db, None).await?;
            info!("Migrations completed");
        }

        // ── Services ───────────────────────────────────────────
        let accounts = Arc::new(AccountService::new(
            Arc::new(AccountRepository::new(db.clone())),
            Arc::new(BcryptCredentials::new(app_cfg.security.bcrypt_cost)),
        ));

        if opts.create_default_admin {
            if let Err(e) = create_default_admin(&accounts, &app_cfg.admin).await {
                error!("Failed to create admin account: {}", e);
            }
        }

        // ── Shutdown coordinator ───────────────────────────────
        let shutdown = ShutdownCoordinator::new(app_cfg.server.shutdown_timeout);
        let shutdown_signal = shutdown.signal();

        // ── REST API server ────────────────────────────────────
        let api_router = create_api_router(
            accounts.clone(),
            app_cfg.jwt_config(),
            app_cfg.page_limits(),
        );

        let api_addr = app_cfg.server.address();
        let listener = tokio::net::TcpListener::bind(&api_addr).await?;
        let api_port = listener.local_addr()?.port();
        info!("REST API server listening on http://{}", api_addr);
        info!("Swagger UI available at http://{}/docs/", api_addr);

        let api_server = axum::serve(listener, api_router).with_graceful_shutdown(async move {
            shutdown_signal.wait().await;
            info!("REST API server received shutdown signal");
        });

        let api_task = tokio::spawn(async move {
            if let Err(e) = api_server.await {
                error!("REST API server error: {}", e);
            }
        });

        Ok(Self {
            accounts,
            config: app_cfg,
            api_port,
            db,
            shutdown,
            api_task,
        })
    }

    /// Get a cloneable shutdown signal.
    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.signal()
    }

    /// Install OS signal listeners (SIGTERM, SIGINT) that trigger shutdown.
    pub fn install_signal_handler(&self) {
        self.shutdown.start_signal_listener();
    }

    /// Trigger graceful shutdown (non-blocking).
    pub fn trigger_shutdown(&self) {
        self.shutdown.signal().trigger();
    }

    /// Wait for the server to stop after shutdown has been triggered.
    pub async fn wait(self) {
        info!("Waiting for in-flight requests to complete...");

        let api_task = self.api_task;
        let drained = self
            .shutdown
            .drain(async move {
                if let Err(e) = api_task.await {
                    error!("REST API server task panicked: {}", e);
                }
            })
            .await;
        if !drained {
            warn!("REST API server did not stop in time");
        }

        if let Err(e) = self.db.close().await {
            warn!("Error closing database connection: {}", e);
        } else {
            info!("Database connection closed");
        }

        info!("Account panel shutdown complete");
    }

    /// Trigger shutdown and wait for completion.
    pub async fn shutdown(self) {
        info!("Shutting down account panel...");
        self.trigger_shutdown();
        self.wait().await;
    }

    pub fn is_running(&self) -> bool {
        !self.api_task.is_finished()
    }
}

// ── Helpers ────────────────────────────────────────────────────────

/// Create the configured admin account if the store holds no accounts.
///
/// Returns whether an account was created.
pub async fn create_default_admin(
    accounts: &AccountService,
    admin: &AdminConfig,
) -> AccountResult<bool> {
    let existing = accounts.search(MATCH_ALL, MATCH_ALL, 1, 1).await?;
    if existing.total > 0 {
        return Ok(false);
    }

    info!("Creating default admin account...");
    let view = AccountView {
        email: Some(admin.email.clone()),
        password: Some(admin.password.clone()),
        ..Default::default()
    };
    match accounts.create_account(&admin.username, view).await {
        Ok(_) => {
            info!(username = %admin.username, "Default admin created");
            warn!("Please change the admin password immediately!");
            Ok(true)
        }
        // Another instance won the race
        Err(AccountError::Conflict(_)) => Ok(false),
        Err(e) => Err(e),
    }
}

/// Initialize tracing (logging) from the application config.
///
/// Call this once at process startup (before [`ServerHandle::start`]).
pub fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    match config.logging.format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Account;
    use crate::infrastructure::InMemoryAccountStore;

    fn service() -> AccountService {
        AccountService::new(
            Arc::new(InMemoryAccountStore::new()),
            Arc::new(BcryptCredentials::new(4)),
        )
    }

    fn admin() -> AdminConfig {
        AdminConfig {
            username: "root".into(),
            email: "root@example.com".into(),
            password: "change-me".into(),
        }
    }

    #[tokio::test]
    async fn admin_created_on_empty_store() {
        let accounts = service();
        assert!(create_default_admin(&accounts, &admin()).await.unwrap());

        let root = accounts.require("root").await.unwrap();
        assert_eq!(root.email, "root@example.com");
        assert!(accounts.verify_credentials(&root, "change-me").await);
    }

    #[tokio::test]
    async fn admin_skipped_when_accounts_exist() {
        let accounts = service();
        accounts
            .create(Account::new("alice", "alice@example.com"))
            .await
            .unwrap();

        assert!(!create_default_admin(&accounts, &admin()).await.unwrap());
        assert!(accounts.get("root").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn start_refuses_placeholder_secret() {
        let mut config = AppConfig::default();
        config.security.jwt_secret = crate::infrastructure::crypto::jwt::PLACEHOLDER_SECRET.into();
        config.database.url = "sqlite::memory:".into();

        let result = ServerHandle::start(ServerOptions {
            config,
            ..Default::default()
        })
        .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn server_starts_and_stops_on_signal() {
        let mut config = AppConfig::default();
        config.server.host = "127.0.0.1".into();
        config.server.port = 0;
        config.server.shutdown_timeout = 5;
        config.database.url = "sqlite::memory:".into();
        config.security.bcrypt_cost = 4;
        config.security.jwt_secret = "issuer-shared-secret".into();

        let handle = ServerHandle::start(ServerOptions {
            config,
            ..Default::default()
        })
        .await
        .unwrap();
        assert_ne!(handle.api_port, 0);
        assert!(handle.accounts.get("admin").await.unwrap().is_some());
        assert!(handle.is_running());

        handle.shutdown().await;
    }
}
