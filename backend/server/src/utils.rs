use std::sync::Arc;

use tokio::task::spawn_blocking;
use tracing::{info, warn};

use crate::{
    email::Delivery,
    error::AppError::{self, Ambiguous, NotFound},
    state::State,
};

/// Turns the prefix matches for `nome` into the guest's full name.
pub fn classify(nome: &str, mut matches: Vec<String>) -> Result<String, AppError> {
    match matches.len() {
        0 => Err(NotFound {
            nome: nome.to_string(),
        }),
        1 => Ok(matches.remove(0)),
        _ => Err(Ambiguous {
            nome: nome.to_string(),
        }),
    }
}

pub async fn find_guest(state: Arc<State>, nome: &str) -> Result<String, AppError> {
    let store = state.store.clone();
    let query = nome.to_string();

    let matches = spawn_blocking(move || store.find_by_prefix(&query))
        .await
        .map_err(|e| AppError::InternalError(e.into()))??;

    #[cfg(feature = "verbose")]
    info!("{} match(es) for {nome:?}", matches.len());

    classify(nome, matches)
}

/// Resolves the submission and notifies the organizer. Returns the confirmed full name.
pub async fn confirm(state: Arc<State>, raw_nome: &str) -> Result<String, AppError> {
    let nome = raw_nome.trim();
    let guest = find_guest(state.clone(), nome).await?;

    match state.mailer.notify(&guest).await {
        Ok(Delivery::Sent) => info!("Notified organizer of {guest}"),
        Ok(Delivery::Disabled) => info!("Email not configured, skipping notification for {guest}"),
        Err(e) => warn!("Failed to notify organizer of {guest}: {e}"),
    }

    Ok(guest)
}
