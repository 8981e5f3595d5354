//! Session lifecycle
//!
//! `App` wires the configuration to the store and runs one session:
//! resolve the role, restore the cache, subscribe to the cloud document,
//! keep everything mirrored until shutdown is requested.

use tracing::{info, warn};

use crate::clients::telegram::TelegramClient;
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::services::quiz_store::{QuizStore, UserRole};

/// Application session.
pub struct App {
    config: Config,
    role: UserRole,
    store: QuizStore,
}

impl App {
    /// Build the session: resolve the role from the configured codes and,
    /// for administrators, check the bot credential once up front. A
    /// failed credential check is reported but never aborts the session.
    pub async fn initialize(config: Config) -> Result<Self> {
        let role = if !config.secret_code.is_empty() && config.session_code == config.secret_code
        {
            UserRole::Administrator
        } else {
            UserRole::Learner
        };

        log_startup(&config, role);

        if role.is_admin() {
            let identity = TelegramClient::new(&config).validate_bot().await;
            if identity.ok {
                info!("🤖 bot credential ok: {}", identity.name.unwrap_or_default());
            } else {
                warn!(
                    "⚠️ bot credential check failed: {}",
                    identity.error.unwrap_or_default()
                );
            }
        }

        let store = QuizStore::new(&config);
        Ok(Self {
            config,
            role,
            store,
        })
    }

    /// The session's reconciliation controller.
    pub fn store(&self) -> &QuizStore {
        &self.store
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn role(&self) -> UserRole {
        self.role
    }

    /// Run the session until shutdown: start the store lifecycle, then
    /// wait for ctrl-c and tear the subscription down.
    pub async fn run(mut self) -> Result<()> {
        self.store.init();
        info!(
            "✓ session ready: {} records in memory, cloud {}",
            self.store.questions().len(),
            self.store.status()
        );

        tokio::signal::ctrl_c()
            .await
            .map_err(|e| AppError::Other(format!("signal listener failed: {e}")))?;

        info!("🛑 shutdown requested");
        self.store.dispose();
        log_shutdown(&self.store);
        Ok(())
    }
}

// ========== log helpers ==========

fn log_startup(config: &Config, role: UserRole) {
    info!("{}", "=".repeat(60));
    info!("🚀 quiz-master-kh session starting");
    info!("🔐 role: {role}");
    info!("☁️ cloud document store: {}", config.cloud_base_url);
    info!("💾 local cache: {}", config.cache_file);
    info!("{}", "=".repeat(60));
}

fn log_shutdown(store: &QuizStore) {
    info!("{}", "─".repeat(60));
    info!(
        "✓ session closed with {} records in memory",
        store.questions().len()
    );
    info!("{}", "─".repeat(60));
}
