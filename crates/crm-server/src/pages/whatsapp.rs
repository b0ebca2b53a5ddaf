// File: crm-server/src/pages/whatsapp.rs
// Purpose: WhatsApp composer and editable quick-send templates

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
    Form,
};
use crm_core::{MessageTemplate, ValidationErrors, WhatsappForm};
use crm_sync::CommandError;
use maud::{html, Markup};
use serde::Deserialize;

use super::layout::{page, Chrome, Tab};
use super::{describe, field_error, flash, render, see_other, status_for};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct WhatsappQuery {
    /// Template whose text prefills the composer
    pub template: Option<u32>,
    pub aviso: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TemplateForm {
    pub texto: String,
}

/// A template edit that was rejected, shown back with its input
struct TemplateEdit {
    id: u32,
    text: String,
    errors: Option<ValidationErrors>,
}

pub async fn show(State(state): State<AppState>, Query(query): Query<WhatsappQuery>) -> Response {
    let chrome = Chrome::new(&state, Tab::Whatsapp).with_notice(flash(query.aviso.as_deref()));
    let templates = state.commands.templates();

    let mensagem = query
        .template
        .and_then(|id| templates.iter().find(|template| template.id == id))
        .map(|template| template.text.clone())
        .unwrap_or_default();
    let form = WhatsappForm {
        mensagem,
        ..Default::default()
    };

    render(
        StatusCode::OK,
        page(&chrome, whatsapp_body(&templates, &form, None, None)),
    )
}

/// Open the chat for a typed number
pub async fn send(State(state): State<AppState>, Form(form): Form<WhatsappForm>) -> Response {
    match state.commands.whatsapp_link(&form.numero, &form.mensagem) {
        Ok(link) => see_other(&link),
        Err(error) => failed(&state, error, form, None),
    }
}

pub async fn update_template(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    Form(form): Form<TemplateForm>,
) -> Response {
    match state.commands.update_template(id, &form.texto) {
        Ok(_) => see_other("/whatsapp?aviso=template-salvo"),
        Err(error) => {
            let edit = TemplateEdit {
                id,
                text: form.texto,
                errors: None,
            };
            failed(&state, error, WhatsappForm::default(), Some(edit))
        }
    }
}

fn failed(
    state: &AppState,
    error: CommandError,
    form: WhatsappForm,
    edit: Option<TemplateEdit>,
) -> Response {
    let status = status_for(&error);
    let (errors, notice) = describe(error);
    let chrome = Chrome::new(state, Tab::Whatsapp).after_failed_submit(notice);
    let templates = state.commands.templates();

    // Field errors belong to whichever form was submitted
    let (composer_errors, edit) = match edit {
        Some(edit) => (None, Some(TemplateEdit { errors, ..edit })),
        None => (errors, None),
    };

    render(
        status,
        page(
            &chrome,
            whatsapp_body(&templates, &form, composer_errors.as_ref(), edit.as_ref()),
        ),
    )
}

fn composer(form: &WhatsappForm, errors: Option<&ValidationErrors>) -> Markup {
    html! {
        form.cartao method="post" action="/whatsapp/enviar" target="_blank" {
            h2 { "Enviar mensagem" }
            label {
                "Número (com DDD)"
                input type="tel" name="numero" value=(form.numero) placeholder="(11) 98765-4321";
            }
            (field_error(errors, "numero"))
            label {
                "Mensagem"
                textarea name="mensagem" rows="5" { (form.mensagem) }
            }
            button type="submit" { "Abrir no WhatsApp" }
        }
    }
}

fn template_card(template: &MessageTemplate, edit: Option<&TemplateEdit>) -> Markup {
    let edit = edit.filter(|edit| edit.id == template.id);
    let text = edit.map_or(template.text.as_str(), |edit| edit.text.as_str());
    let errors = edit.and_then(|edit| edit.errors.as_ref());

    html! {
        article.cartao {
            h3 { (template.title) }
            form method="post" action={ "/whatsapp/templates/" (template.id) } {
                textarea name="texto" rows="4" { (text) }
                (field_error(errors, "texto"))
                button type="submit" { "Salvar" }
                " "
                a href={ "/whatsapp?template=" (template.id) } { "Usar" }
            }
        }
    }
}

fn whatsapp_body(
    templates: &[MessageTemplate],
    form: &WhatsappForm,
    errors: Option<&ValidationErrors>,
    edit: Option<&TemplateEdit>,
) -> Markup {
    html! {
        h1 { "WhatsApp" }
        (composer(form, errors))

        h2 { "Templates" }
        section.cartoes {
            @for template in templates {
                (template_card(template, edit))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crm_core::model::default_templates;
    use crm_core::forms::validate_template_text;

    #[test]
    fn test_body_lists_templates() {
        let html = whatsapp_body(&default_templates(), &WhatsappForm::default(), None, None)
            .into_string();

        assert!(html.contains("Primeira Abordagem"));
        assert!(html.contains("/whatsapp/templates/4"));
        assert!(html.contains("/whatsapp?template=1"));
    }

    #[test]
    fn test_rejected_edit_stays_on_its_card() {
        let edit = TemplateEdit {
            id: 2,
            text: "   ".to_string(),
            errors: validate_template_text("   ").err(),
        };
        let html = whatsapp_body(&default_templates(), &WhatsappForm::default(), None, Some(&edit))
            .into_string();

        assert_eq!(html.matches("O texto do template não pode ser vazio.").count(), 1);
        assert!(!html.contains("Oi! Como vai?"));
    }

    #[test]
    fn test_composer_shows_number_error() {
        let form = WhatsappForm {
            numero: "123".to_string(),
            mensagem: "Olá".to_string(),
        };
        let errors = form.validate().err();
        let html = whatsapp_body(&default_templates(), &form, errors.as_ref(), None).into_string();

        assert!(html.contains("Por favor, digite um número de telefone válido (com DDD)."));
        assert!(html.contains("value=\"123\""));
    }
}
