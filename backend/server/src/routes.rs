use std::sync::Arc;

use axum::{
    Form,
    extract::{self, rejection::FormRejection},
    response::{Html, IntoResponse},
};
use serde::Deserialize;

use crate::{
    error::AppError,
    page::{Feedback, SUCCESS_MESSAGE, render},
    state::State,
    utils::confirm,
};

#[derive(Deserialize)]
pub struct Rsvp {
    nome: Option<String>,
}

pub async fn index_handler() -> impl IntoResponse {
    Html(render(Feedback::None, ""))
}

pub async fn confirm_handler(
    extract::State(state): extract::State<Arc<State>>,
    payload: Result<Form<Rsvp>, FormRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Ok(Form(Rsvp { nome: Some(nome) })) = payload else {
        return Err(AppError::MalformedPayload);
    };

    confirm(state, &nome).await?;

    Ok(Html(render(Feedback::Success(SUCCESS_MESSAGE), "")))
}
