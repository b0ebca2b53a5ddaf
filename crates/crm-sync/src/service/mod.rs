// File: crm-sync/src/service/mod.rs
// Purpose: The remote data service seam and shared fetch plumbing

use async_trait::async_trait;
use crm_core::text::collate;
use crm_core::view::stats::due_order;
use crm_core::{
    Appointment, AppointmentPatch, Collection, Contact, NewAppointment, NewContact, NewProperty,
    Property, RawRecord, RecordError, RecordId,
};
use futures::stream::{BoxStream, StreamExt};
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;

use crate::change_feed::ChangeEvent;
use crate::error::Result;

pub mod memory;
pub mod sqlite;

/// A backend row that could not be coerced into a record
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedRow {
    pub id: String,
    pub error: RecordError,
}

/// Records of one collection plus the rows skipped while reading it
#[derive(Debug, Clone, PartialEq)]
pub struct FetchOutcome<T> {
    pub records: Vec<T>,
    pub rejected: Vec<RejectedRow>,
}

impl<T> FetchOutcome<T> {
    pub fn new(records: Vec<T>) -> Self {
        Self {
            records,
            rejected: Vec::new(),
        }
    }
}

/// Coerce raw rows, keeping the ones that pass and logging the rest
pub fn coerce<R: RawRecord>(collection: Collection, rows: Vec<R>) -> FetchOutcome<R::Record> {
    let mut outcome = FetchOutcome::new(Vec::with_capacity(rows.len()));

    for row in rows {
        let id = row.raw_id().to_string();
        match R::Record::try_from(row) {
            Ok(record) => outcome.records.push(record),
            Err(error) => {
                tracing::warn!(%collection, %id, %error, "skipping malformed row");
                outcome.rejected.push(RejectedRow { id, error });
            }
        }
    }

    outcome
}

/// Contacts by name, accent and case insensitive
pub fn sort_contacts(contacts: &mut [Contact]) {
    contacts.sort_by(|a, b| collate(&a.name, &b.name).then_with(|| a.id.cmp(&b.id)));
}

/// Appointments by date ascending, then priority descending
pub fn sort_appointments(appointments: &mut [Appointment]) {
    appointments.sort_by(due_order);
}

/// Properties by title
pub fn sort_properties(properties: &mut [Property]) {
    properties.sort_by(|a, b| collate(&a.title, &b.title).then_with(|| a.id.cmp(&b.id)));
}

/// The remote store holding the three collections.
///
/// Every successful write is announced on the change feed; readers never
/// patch their own copies, they reload.
#[async_trait]
pub trait DataService: Send + Sync {
    async fn fetch_contacts(&self) -> Result<FetchOutcome<Contact>>;

    async fn fetch_appointments(&self) -> Result<FetchOutcome<Appointment>>;

    async fn fetch_properties(&self) -> Result<FetchOutcome<Property>>;

    async fn insert_contact(&self, contact: NewContact) -> Result<RecordId>;

    async fn insert_appointment(&self, appointment: NewAppointment) -> Result<RecordId>;

    async fn insert_property(&self, property: NewProperty) -> Result<RecordId>;

    /// Partial update; fails with `NotFound` when the id is unknown
    async fn update_appointment(&self, id: &RecordId, patch: AppointmentPatch) -> Result<()>;

    async fn delete(&self, collection: Collection, id: &RecordId) -> Result<()>;

    fn subscribe(&self) -> broadcast::Receiver<ChangeEvent>;

    /// Change events for one collection only; lagged gaps are skipped
    fn subscribe_to(&self, collection: Collection) -> BoxStream<'static, ChangeEvent> {
        BroadcastStream::new(self.subscribe())
            .filter_map(move |result| async move {
                match result {
                    Ok(event) if event.collection == collection => Some(event),
                    _ => None,
                }
            })
            .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use crm_core::{Priority, RawAppointment, RawContact};
    use pretty_assertions::assert_eq;

    fn raw_contact(id: &str, nome: &str) -> RawContact {
        RawContact {
            id: id.to_string(),
            nome: nome.to_string(),
            email: None,
            telefone: None,
            imovel_interesse_id: None,
        }
    }

    #[test]
    fn test_coerce_skips_bad_rows() {
        let rows = vec![
            RawAppointment {
                id: "a1".to_string(),
                titulo: "Visita".to_string(),
                concluido: false,
                prioridade: "Alta".to_string(),
                cliente_id: None,
                data_compromisso: "2024-06-01".to_string(),
            },
            RawAppointment {
                id: "a2".to_string(),
                titulo: "Quebrado".to_string(),
                concluido: false,
                prioridade: "Urgente".to_string(),
                cliente_id: None,
                data_compromisso: "2024-06-01".to_string(),
            },
        ];

        let outcome = coerce(Collection::Appointments, rows);
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.records[0].priority, Priority::High);
        assert_eq!(
            outcome.rejected,
            vec![RejectedRow {
                id: "a2".to_string(),
                error: RecordError::UnknownPriority("Urgente".to_string()),
            }]
        );
    }

    #[test]
    fn test_contacts_sort_ignores_accents_and_case() {
        let mut contacts = coerce(
            Collection::Contacts,
            vec![
                raw_contact("1", "bruno"),
                raw_contact("2", "Álvaro"),
                raw_contact("3", "Carla"),
            ],
        )
        .records;
        sort_contacts(&mut contacts);

        let names: Vec<&str> = contacts.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Álvaro", "bruno", "Carla"]);
    }

    #[test]
    fn test_appointments_sort_by_date_then_priority() {
        let day = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let make = |id: &str, date: NaiveDate, priority: Priority| Appointment {
            id: RecordId::new(id),
            title: id.to_string(),
            completed: false,
            priority,
            contact: None,
            date,
        };
        let mut appointments = vec![
            make("late", day.succ_opt().unwrap(), Priority::High),
            make("low", day, Priority::Low),
            make("high", day, Priority::High),
        ];
        sort_appointments(&mut appointments);

        let ids: Vec<&str> = appointments.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["high", "low", "late"]);
    }
}
