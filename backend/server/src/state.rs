use std::sync::Arc;

use tokio::task::spawn_blocking;
use tracing::info;

use super::{config::Config, database::GuestStore, email::Mailer, error::AppError};

pub struct State {
    pub config: Config,
    pub store: GuestStore,
    pub mailer: Mailer,
}

impl State {
    /// Ensures the guest table and seeds it once, before any request is served.
    pub async fn new(config: Config) -> Result<Arc<Self>, AppError> {
        let store = GuestStore::new(&config.database_path);
        let guests = config.guests.clone();

        let seeding_store = store.clone();
        let (inserted, total) = spawn_blocking(move || {
            seeding_store.initialize()?;
            let inserted = seeding_store.seed(&guests)?;

            Ok::<_, AppError>((inserted, seeding_store.count()?))
        })
        .await
        .map_err(|e| AppError::InternalError(e.into()))??;

        info!(
            "Guest list at {} ready: {inserted} new, {total} total",
            store.path().display()
        );

        let mailer = Mailer::new(config.mail.clone());
        if mailer.is_enabled() {
            info!(
                "Notifications via {}:{}",
                config.mail.smtp_host, config.mail.smtp_port
            );
        } else {
            info!("Notifications disabled");
        }

        Ok(Arc::new(Self {
            config,
            store,
            mailer,
        }))
    }
}
