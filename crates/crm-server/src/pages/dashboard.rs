// File: crm-server/src/pages/dashboard.rs
// Purpose: Overview counts and the soonest pending appointments

use axum::{extract::State, http::StatusCode, response::Response};
use crm_core::format::format_date_br;
use crm_core::view::{contact_label, dashboard_stats, DashboardStats};
use crm_core::{Contact, Priority};
use maud::{html, Markup};

use super::layout::{page, Chrome, Tab};
use super::render;
use crate::state::AppState;

pub async fn show(State(state): State<AppState>) -> Response {
    let snapshot = state.store.snapshot().await;
    let stats = dashboard_stats(&snapshot);

    let mut chrome = Chrome::new(&state, Tab::Dashboard);
    if state.store.is_loading() {
        chrome = chrome.with_notice(Some(super::Notice::Success(
            "Atualizando dados...".to_string(),
        )));
    }

    render(
        StatusCode::OK,
        page(&chrome, dashboard_body(&stats, &snapshot.contacts)),
    )
}

fn dashboard_body(stats: &DashboardStats, contacts: &[Contact]) -> Markup {
    let appointments = &stats.appointments;

    html! {
        h1 { "Painel" }
        section.cartoes {
            a.cartao href="/clientes" {
                h2 { (stats.contacts) }
                p { "Clientes" }
            }
            a.cartao href="/imoveis" {
                h2 { (stats.properties) }
                p { "Imóveis" }
            }
            a.cartao href="/agenda" {
                h2 { (appointments.pending) }
                p { "Compromissos pendentes de " (appointments.total) }
            }
        }

        section {
            h2 { "Pendentes por prioridade" }
            ul {
                @for priority in Priority::DESCENDING {
                    li class=(priority.css_class()) {
                        (priority.label()) ": " (appointments.pending_by_priority.get(priority))
                    }
                }
            }
        }

        section {
            h2 { "Próximos compromissos" }
            @if appointments.soonest.is_empty() {
                p { "Nenhum compromisso pendente." }
            } @else {
                ul.proximos {
                    @for appointment in &appointments.soonest {
                        li class=(format!("cartao {}", appointment.priority.css_class())) {
                            strong { (appointment.title) }
                            " · " (format_date_br(appointment.date))
                            " · " (contact_label(contacts, appointment.contact.as_ref()))
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use crm_core::{Appointment, RecordId, Snapshot};

    #[test]
    fn test_dashboard_lists_soonest_first() {
        let make = |id: &str, day: u32, priority: Priority| Appointment {
            id: RecordId::new(id),
            title: format!("Compromisso {id}"),
            completed: false,
            priority,
            contact: None,
            date: NaiveDate::from_ymd_opt(2024, 6, day).unwrap(),
        };
        let snapshot = Snapshot::new(
            Vec::new(),
            vec![make("a", 3, Priority::Low), make("b", 1, Priority::High)],
            Vec::new(),
        );

        let html = dashboard_body(&dashboard_stats(&snapshot), &snapshot.contacts).into_string();

        let first = html.find("Compromisso b").unwrap();
        let second = html.find("Compromisso a").unwrap();
        assert!(first < second);
        assert!(html.contains("01/06/2024"));
        assert!(html.contains("Sem cliente"));
    }
}
