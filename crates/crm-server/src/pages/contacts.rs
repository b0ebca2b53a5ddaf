// File: crm-server/src/pages/contacts.rs
// Purpose: Contact list with search, creation, removal and contact actions

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Form,
};
use chrono::Utc;
use crm_core::format::avatar_initials;
use crm_core::view::{property_label, search_contacts};
use crm_core::{ContactForm, RecordId, Snapshot, ValidationErrors};
use crm_sync::CommandError;
use maud::{html, Markup};
use serde::Deserialize;

use super::layout::{page, Chrome, Tab};
use super::{
    describe, field_error, flash, render, see_other, see_other_link, status_for, Notice,
};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ContactsQuery {
    pub q: Option<String>,
    pub aviso: Option<String>,
}

#[derive(Debug, Default)]
struct ContactsView {
    query: String,
    form: ContactForm,
    errors: Option<ValidationErrors>,
    clipboard: Option<String>,
}

async fn render_page(
    state: &AppState,
    status: StatusCode,
    chrome: Chrome,
    view: ContactsView,
) -> Response {
    let snapshot = state.store.snapshot().await;
    render(status, page(&chrome, contacts_body(&snapshot, &view)))
}

async fn failed(state: &AppState, error: CommandError, form: ContactForm) -> Response {
    let status = status_for(&error);
    let (errors, notice) = describe(error);
    let chrome = Chrome::new(state, Tab::Contacts).after_failed_submit(notice);
    let view = ContactsView {
        form,
        errors,
        ..Default::default()
    };
    render_page(state, status, chrome, view).await
}

pub async fn list(State(state): State<AppState>, Query(query): Query<ContactsQuery>) -> Response {
    let chrome = Chrome::new(&state, Tab::Contacts).with_notice(flash(query.aviso.as_deref()));
    let view = ContactsView {
        query: query.q.unwrap_or_default(),
        ..Default::default()
    };
    render_page(&state, StatusCode::OK, chrome, view).await
}

pub async fn create(State(state): State<AppState>, Form(form): Form<ContactForm>) -> Response {
    match state.commands.add_contact(&form).await {
        Ok(_) => see_other("/clientes?aviso=cliente-adicionado"),
        Err(error) => failed(&state, error, form).await,
    }
}

pub async fn remove(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.commands.remove_contact(&RecordId::new(id)).await {
        Ok(()) => see_other("/clientes?aviso=cliente-removido"),
        Err(error) => failed(&state, error, ContactForm::default()).await,
    }
}

/// Send the browser to a link built from stored contact data
async fn open_link(state: &AppState, link: &str) -> Response {
    match see_other_link(link) {
        Some(response) => response,
        None => {
            tracing::warn!(link, "contact link is not a valid redirect target");
            let notice = Notice::error("Os dados deste cliente geram um link inválido.");
            let chrome = Chrome::new(state, Tab::Contacts).after_failed_submit(notice);
            render_page(state, StatusCode::UNPROCESSABLE_ENTITY, chrome, Default::default()).await
        }
    }
}

pub async fn whatsapp(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.commands.contact_whatsapp_link(&RecordId::new(id)).await {
        Ok(link) => open_link(&state, &link).await,
        Err(error) => failed(&state, error, ContactForm::default()).await,
    }
}

pub async fn dial(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.commands.dial_link(&RecordId::new(id)).await {
        Ok(link) => open_link(&state, &link).await,
        Err(error) => failed(&state, error, ContactForm::default()).await,
    }
}

pub async fn email(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.commands.email_link(&RecordId::new(id)).await {
        Ok(link) => open_link(&state, &link).await,
        Err(error) => failed(&state, error, ContactForm::default()).await,
    }
}

/// Show the address selected in a read-only field, ready to copy
pub async fn copy_email(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.commands.copy_email(&RecordId::new(id)).await {
        Ok(email) => {
            let notice = Notice::Success(format!("O email \"{email}\" está pronto para copiar."));
            let chrome = Chrome::new(&state, Tab::Contacts).with_notice(Some(notice));
            let view = ContactsView {
                clipboard: Some(email),
                ..Default::default()
            };
            render_page(&state, StatusCode::OK, chrome, view).await
        }
        Err(error) => failed(&state, error, ContactForm::default()).await,
    }
}

pub async fn export_csv(State(state): State<AppState>) -> Response {
    match state.commands.export_contacts_csv(Utc::now()).await {
        Ok(export) => (
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", export.file_name),
                ),
            ],
            export.body,
        )
            .into_response(),
        Err(error) => failed(&state, error, ContactForm::default()).await,
    }
}

fn contact_form(
    snapshot: &Snapshot,
    form: &ContactForm,
    errors: Option<&ValidationErrors>,
) -> Markup {
    let selected = form.imovel_interesse_id.as_deref().unwrap_or("0");

    html! {
        form.cartao method="post" action="/clientes" {
            h2 { "Novo cliente" }
            label {
                "Nome"
                input type="text" name="nome" value=(form.nome) required;
            }
            (field_error(errors, "nome"))
            label {
                "Email"
                input type="email" name="email" value=(form.email);
            }
            (field_error(errors, "email"))
            label {
                "Telefone"
                input type="tel" name="telefone" value=(form.telefone);
            }
            (field_error(errors, "telefone"))
            label {
                "Imóvel de interesse"
                select name="imovel_interesse_id" {
                    option value="0" selected[selected == "0"] { "Nenhum" }
                    @for property in &snapshot.properties {
                        option value=(property.id.as_str())
                            selected[selected == property.id.as_str()] {
                            (property.title)
                        }
                    }
                }
            }
            button type="submit" { "Adicionar cliente" }
        }
    }
}

fn contacts_body(snapshot: &Snapshot, view: &ContactsView) -> Markup {
    let visible = search_contacts(&snapshot.contacts, &view.query);

    html! {
        h1 { "Clientes" }

        @if let Some(email) = &view.clipboard {
            input.copiar type="text" value=(email) readonly autofocus onfocus="this.select()";
        }

        (contact_form(snapshot, &view.form, view.errors.as_ref()))

        form method="get" action="/clientes" {
            input type="search" name="q" value=(view.query)
                placeholder="Buscar por nome, email ou telefone";
            button type="submit" { "Buscar" }
            " "
            a href="/clientes/exportar.csv" { "Exportar CSV" }
        }

        section.cartoes {
            @for contact in &visible {
                article.cartao {
                    span.avatar { (avatar_initials(&contact.name)) }
                    h3 { (contact.name) }
                    p { (contact.email) }
                    p { (contact.phone) }
                    p {
                        "Interesse: "
                        (property_label(&snapshot.properties, contact.interested_property.as_ref()))
                    }
                    @let base = format!("/clientes/{}", contact.id.as_str());
                    nav {
                        @if contact.phone.is_empty() {
                            span title="Sem telefone" { "WhatsApp" } " "
                            span title="Sem telefone" { "Ligar" } " "
                        } @else {
                            a href={ (base) "/whatsapp" } target="_blank" { "WhatsApp" } " "
                            a href={ (base) "/ligar" } { "Ligar" } " "
                        }
                        a href={ (base) "/email" } { "Email" } " "
                        a href={ (base) "/copiar-email" } { "Copiar email" } " "
                        form.inline method="post" action={ (base) "/excluir" }
                            onsubmit={
                                "return confirm('Tem certeza que deseja deletar "
                                (contact.name) "?')"
                            } {
                            button type="submit" { "Remover" }
                        }
                    }
                }
            }
        }

        @if visible.is_empty() {
            p { "Nenhum cliente encontrado." }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crm_core::{Contact, Property};

    fn snapshot() -> Snapshot {
        Snapshot::new(
            vec![
                Contact {
                    id: RecordId::new("c1"),
                    name: "Maria Silva".to_string(),
                    email: "maria@exemplo.com".to_string(),
                    phone: "21 99888-7766".to_string(),
                    interested_property: Some(RecordId::new("p9")),
                },
                Contact {
                    id: RecordId::new("c2"),
                    name: "João".to_string(),
                    email: String::new(),
                    phone: String::new(),
                    interested_property: None,
                },
            ],
            Vec::new(),
            Vec::<Property>::new(),
        )
    }

    #[test]
    fn test_body_filters_by_query() {
        let view = ContactsView {
            query: "maria".to_string(),
            ..Default::default()
        };
        let html = contacts_body(&snapshot(), &view).into_string();

        assert!(html.contains("Maria Silva"));
        assert!(!html.contains("João"));
        assert!(html.contains("Imóvel (ID) não encontrado"));
        assert!(html.contains("/clientes/c1/whatsapp"));
    }

    #[test]
    fn test_rejected_form_keeps_input() {
        let form = ContactForm {
            nome: String::new(),
            email: "sem-nome@exemplo.com".to_string(),
            ..Default::default()
        };
        let errors = form.validate().unwrap_err();
        let view = ContactsView {
            form,
            errors: Some(errors),
            ..Default::default()
        };
        let html = contacts_body(&snapshot(), &view).into_string();

        assert!(html.contains("sem-nome@exemplo.com"));
        assert!(html.contains("Informe o nome do cliente."));
    }
}
