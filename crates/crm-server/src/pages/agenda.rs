// File: crm-server/src/pages/agenda.rs
// Purpose: Day planner: one day's appointments, creation, completion, removal

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
    Form,
};
use chrono::{Local, NaiveDate};
use crm_core::format::format_date_br;
use crm_core::model::{date_to_iso, parse_date};
use crm_core::view::{appointments_on, contact_label};
use crm_core::{AppointmentForm, Priority, RecordId, Snapshot, ValidationErrors};
use crm_sync::CommandError;
use maud::{html, Markup};
use serde::Deserialize;

use super::layout::{page, Chrome, Tab};
use super::{describe, field_error, flash, render, see_other, status_for};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct AgendaQuery {
    pub dia: Option<String>,
    pub aviso: Option<String>,
}

/// Hidden field carried by row actions so the planner stays on the same day
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DayForm {
    pub dia: String,
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Selected day from a query or form value; anything unparseable means today
fn day_or_today(raw: Option<&str>) -> NaiveDate {
    raw.and_then(|raw| parse_date(raw).ok()).unwrap_or_else(today)
}

fn agenda_path(day: NaiveDate, aviso: &str) -> String {
    format!("/agenda?dia={}&aviso={aviso}", date_to_iso(day))
}

async fn failed(
    state: &AppState,
    error: CommandError,
    day: NaiveDate,
    form: Option<AppointmentForm>,
) -> Response {
    let status = status_for(&error);
    let (errors, notice) = describe(error);
    let chrome = Chrome::new(state, Tab::Agenda).after_failed_submit(notice);
    let snapshot = state.store.snapshot().await;
    let form = form.unwrap_or_else(|| AppointmentForm::for_day(day));

    render(
        status,
        page(&chrome, agenda_body(&snapshot, day, &form, errors.as_ref())),
    )
}

pub async fn show(State(state): State<AppState>, Query(query): Query<AgendaQuery>) -> Response {
    let day = day_or_today(query.dia.as_deref());
    let chrome = Chrome::new(&state, Tab::Agenda).with_notice(flash(query.aviso.as_deref()));
    let snapshot = state.store.snapshot().await;

    render(
        StatusCode::OK,
        page(
            &chrome,
            agenda_body(&snapshot, day, &AppointmentForm::for_day(day), None),
        ),
    )
}

pub async fn create(State(state): State<AppState>, Form(form): Form<AppointmentForm>) -> Response {
    let day = day_or_today(Some(&form.data_compromisso));
    match state.commands.add_appointment(&form).await {
        Ok(_) => see_other(&agenda_path(day, "compromisso-adicionado")),
        Err(error) => failed(&state, error, day, Some(form)).await,
    }
}

pub async fn toggle(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<DayForm>,
) -> Response {
    let day = day_or_today(Some(&form.dia));
    match state.commands.toggle_appointment(&RecordId::new(id)).await {
        Ok(_) => see_other(&agenda_path(day, "compromisso-atualizado")),
        Err(error) => failed(&state, error, day, None).await,
    }
}

pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<DayForm>,
) -> Response {
    let day = day_or_today(Some(&form.dia));
    match state.commands.remove_appointment(&RecordId::new(id)).await {
        Ok(()) => see_other(&agenda_path(day, "compromisso-removido")),
        Err(error) => failed(&state, error, day, None).await,
    }
}

fn appointment_form(
    snapshot: &Snapshot,
    form: &AppointmentForm,
    errors: Option<&ValidationErrors>,
) -> Markup {
    let selected_contact = form.cliente_id.as_deref().unwrap_or("0");

    html! {
        form.cartao method="post" action="/agenda" {
            h2 { "Novo compromisso" }
            label {
                "Título"
                input type="text" name="titulo" value=(form.titulo) required;
            }
            (field_error(errors, "titulo"))
            label {
                "Data"
                input type="date" name="data_compromisso" value=(form.data_compromisso) required;
            }
            (field_error(errors, "data_compromisso"))
            label {
                "Prioridade"
                select name="prioridade" {
                    @for priority in Priority::DESCENDING {
                        option value=(priority.label())
                            selected[form.prioridade == priority.label()] {
                            (priority.label())
                        }
                    }
                }
            }
            (field_error(errors, "prioridade"))
            label {
                "Cliente"
                select name="cliente_id" {
                    option value="0" selected[selected_contact == "0"] { "Sem cliente" }
                    @for contact in &snapshot.contacts {
                        option value=(contact.id.as_str())
                            selected[selected_contact == contact.id.as_str()] {
                            (contact.name)
                        }
                    }
                }
            }
            button type="submit" { "Adicionar compromisso" }
        }
    }
}

fn agenda_body(
    snapshot: &Snapshot,
    day: NaiveDate,
    form: &AppointmentForm,
    errors: Option<&ValidationErrors>,
) -> Markup {
    let appointments = appointments_on(&snapshot.appointments, day);
    let iso_day = date_to_iso(day);
    let previous = day.pred_opt().map(date_to_iso);
    let next = day.succ_opt().map(date_to_iso);

    html! {
        h1 { "Agenda de " (format_date_br(day)) }

        nav.dias {
            @if let Some(previous) = &previous {
                a href={ "/agenda?dia=" (previous) } { "← Dia anterior" } " "
            }
            a href="/agenda" { "Hoje" } " "
            @if let Some(next) = &next {
                a href={ "/agenda?dia=" (next) } { "Próximo dia →" }
            }
        }

        (appointment_form(snapshot, form, errors))

        @if appointments.is_empty() {
            p { "Nenhum compromisso para este dia." }
        }

        ul.compromissos {
            @for appointment in &appointments {
                @let classes = if appointment.completed {
                    format!("cartao {} concluido", appointment.priority.css_class())
                } else {
                    format!("cartao {}", appointment.priority.css_class())
                };
                li class=(classes) {
                    form.inline method="post"
                        action={ "/agenda/" (appointment.id.as_str()) "/concluir" } {
                        input type="hidden" name="dia" value=(iso_day);
                        button type="submit" {
                            @if appointment.completed { "Reabrir" } @else { "Concluir" }
                        }
                    }
                    " "
                    strong { (appointment.title) }
                    " · " (appointment.priority.label())
                    " · " (contact_label(&snapshot.contacts, appointment.contact.as_ref()))
                    " "
                    form.inline method="post"
                        action={ "/agenda/" (appointment.id.as_str()) "/excluir" } {
                        input type="hidden" name="dia" value=(iso_day);
                        button type="submit" { "Remover" }
                    }
                }
            }
        }
    }
}
