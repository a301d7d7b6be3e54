use axum::response::{Html, IntoResponse, Response};
use thiserror::Error;
use tracing::error;

use crate::{
    database::StoreError,
    page::{Feedback, render},
};

pub const RETRY_MESSAGE: &str = "Ocorreu um erro. Tente novamente.";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Seu nome não está na lista de convidados.")]
    NotFound { nome: String },

    #[error("Digite nome e sobrenome para confirmar.")]
    Ambiguous { nome: String },

    #[error("Malformed payload")]
    MalformedPayload,

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    #[error("Internal error: {0}")]
    InternalError(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl AppError {
    /// Guest-facing text. Anything unexpected collapses into one retry message.
    pub fn message(&self) -> String {
        match self {
            AppError::NotFound { .. } | AppError::Ambiguous { .. } => self.to_string(),
            _ => RETRY_MESSAGE.to_string(),
        }
    }

    pub fn is_transient(&self) -> bool {
        !matches!(self, AppError::NotFound { .. } | AppError::Ambiguous { .. })
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.is_transient() {
            error!("Confirmation failed: {self}");
        }

        let nome = match &self {
            AppError::NotFound { nome } | AppError::Ambiguous { nome } => nome.as_str(),
            _ => "",
        };

        Html(render(Feedback::Error(&self.message()), nome)).into_response()
    }
}
