// File: crm-server/src/pages/mod.rs
// Purpose: Page handlers plus the response helpers they share

pub mod agenda;
pub mod contacts;
pub mod dashboard;
pub mod layout;
pub mod properties;
pub mod whatsapp;

use axum::{
    extract::State,
    http::{header, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use crm_core::ValidationErrors;
use crm_sync::CommandError;
use maud::{html, Markup};
use serde::Deserialize;

use crate::state::AppState;
use layout::Tab;

/// Banner shown above the page body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

impl Notice {
    pub fn error(message: impl ToString) -> Self {
        Notice::Error(message.to_string())
    }
}

/// Messages for the `?aviso=` code a successful write redirects with
pub fn flash(code: Option<&str>) -> Option<Notice> {
    let message = match code? {
        "cliente-adicionado" => "Cliente adicionado com sucesso!",
        "cliente-removido" => "Cliente deletado com sucesso!",
        "compromisso-adicionado" => "Compromisso adicionado com sucesso!",
        "compromisso-atualizado" => "Compromisso atualizado.",
        "compromisso-removido" => "Compromisso removido.",
        "imovel-adicionado" => "Imóvel adicionado com sucesso!",
        "imovel-removido" => "Imóvel removido.",
        "template-salvo" => "Template atualizado.",
        _ => return None,
    };
    Some(Notice::Success(message.to_string()))
}

pub fn status_for(error: &CommandError) -> StatusCode {
    match error {
        CommandError::Write { .. } => StatusCode::BAD_GATEWAY,
        CommandError::NotFound { .. } => StatusCode::NOT_FOUND,
        CommandError::Invalid(_)
        | CommandError::NothingToExport
        | CommandError::NoEmail { .. }
        | CommandError::NoPhone { .. } => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

/// Split a command failure into per-field errors (if any) and a banner
pub fn describe(error: CommandError) -> (Option<ValidationErrors>, Notice) {
    match error {
        CommandError::Invalid(errors) => {
            let notice = Notice::error(&errors);
            (Some(errors), notice)
        }
        other => (None, Notice::error(other)),
    }
}

pub fn render(status: StatusCode, markup: Markup) -> Response {
    (status, Html(markup.into_string())).into_response()
}

/// `303 See Other` to `path`
pub fn see_other(path: &str) -> Response {
    Redirect::to(path).into_response()
}

/// `303 See Other` to a link built from stored data; `None` when the link
/// cannot be sent as a `Location` header
pub fn see_other_link(link: &str) -> Option<Response> {
    let location = HeaderValue::try_from(link).ok()?;
    Some((StatusCode::SEE_OTHER, [(header::LOCATION, location)]).into_response())
}

/// Inline error under a form field
pub fn field_error(errors: Option<&ValidationErrors>, field: &str) -> Markup {
    html! {
        @if let Some(message) = errors.and_then(|e| e.get_error(field)) {
            small.erro-campo { (message) }
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ThemeForm {
    pub voltar: String,
}

/// Flip the theme flag and return to the page the toggle was pressed on
pub async fn toggle_theme(State(state): State<AppState>, Form(form): Form<ThemeForm>) -> Response {
    if let Err(error) = state.commands.toggle_dark_mode() {
        tracing::warn!(%error, "could not save theme preference");
    }

    see_other(return_path(&form.voltar))
}

/// The tab page named by `voltar`; anything else goes back to the dashboard
fn return_path(voltar: &str) -> &'static str {
    Tab::ALL
        .into_iter()
        .map(Tab::path)
        .find(|path| *path == voltar)
        .unwrap_or("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crm_sync::{Operation, SyncError};
    use rstest::rstest;

    #[rstest]
    #[case("/agenda", "/agenda")]
    #[case("/imoveis", "/imoveis")]
    #[case("/\\evil.example", "/")]
    #[case("//evil.example", "/")]
    #[case("https://evil.example", "/")]
    #[case("/agenda/../..", "/")]
    #[case("", "/")]
    fn test_return_path_only_names_tabs(#[case] voltar: &str, #[case] expected: &str) {
        assert_eq!(return_path(voltar), expected);
    }

    #[test]
    fn test_link_with_control_character_is_refused() {
        assert!(see_other_link("tel:2199\u{1}8887766").is_none());
        assert!(see_other_link("mailto:ana\u{7f}@x.com").is_none());

        let response = see_other_link("tel:(21)99888-7766").unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "tel:(21)99888-7766");
    }

    #[test]
    fn test_flash_codes() {
        assert_eq!(
            flash(Some("cliente-removido")),
            Some(Notice::Success("Cliente deletado com sucesso!".to_string()))
        );
        assert_eq!(flash(Some("qualquer")), None);
        assert_eq!(flash(None), None);
    }

    #[test]
    fn test_status_for_errors() {
        assert_eq!(
            status_for(&CommandError::NothingToExport),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        let write = CommandError::Write {
            operation: Operation::AddContact,
            source: SyncError::Unavailable("offline".to_string()),
        };
        assert_eq!(status_for(&write), StatusCode::BAD_GATEWAY);

        let (errors, notice) = describe(write);
        assert!(errors.is_none());
        assert!(matches!(notice, Notice::Error(m) if m.contains("adicionar cliente")));
    }
}
