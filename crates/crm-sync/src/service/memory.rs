// File: crm-sync/src/service/memory.rs
// Purpose: In-process data service for tests and demos, with failure injection

use async_trait::async_trait;
use crm_core::{
    Appointment, AppointmentPatch, Collection, Contact, NewAppointment, NewContact, NewProperty,
    Property, RawAppointment, RawContact, RawProperty, RawRecord, RecordId,
};
use std::collections::HashSet;
use tokio::sync::{broadcast, RwLock};

use super::{coerce, sort_appointments, sort_contacts, sort_properties, DataService, FetchOutcome};
use crate::change_feed::{ChangeAction, ChangeEvent, ChangeFeed};
use crate::error::{Result, SyncError};

#[derive(Default)]
struct Tables {
    contacts: Vec<RawContact>,
    appointments: Vec<RawAppointment>,
    properties: Vec<RawProperty>,
    failing_fetches: HashSet<Collection>,
    failing_writes: bool,
}

impl Tables {
    fn check_fetch(&self, collection: Collection) -> Result<()> {
        if self.failing_fetches.contains(&collection) {
            return Err(SyncError::Unavailable(format!("fetch {collection} failed")));
        }
        Ok(())
    }

    fn check_write(&self) -> Result<()> {
        if self.failing_writes {
            return Err(SyncError::Unavailable("writes are failing".to_string()));
        }
        Ok(())
    }
}

/// Raw rows kept in memory; coerced on every fetch like a real backend
#[derive(Default)]
pub struct MemoryDataService {
    tables: RwLock<Tables>,
    feed: ChangeFeed,
}

impl MemoryDataService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store rows as-is, without validation or change events
    pub async fn seed_raw_contacts(&self, rows: Vec<RawContact>) {
        self.tables.write().await.contacts.extend(rows);
    }

    pub async fn seed_raw_appointments(&self, rows: Vec<RawAppointment>) {
        self.tables.write().await.appointments.extend(rows);
    }

    pub async fn seed_raw_properties(&self, rows: Vec<RawProperty>) {
        self.tables.write().await.properties.extend(rows);
    }

    /// Make fetches of `collection` fail until switched back
    pub async fn set_fetch_failure(&self, collection: Collection, failing: bool) {
        let mut tables = self.tables.write().await;
        if failing {
            tables.failing_fetches.insert(collection);
        } else {
            tables.failing_fetches.remove(&collection);
        }
    }

    pub async fn set_write_failure(&self, failing: bool) {
        self.tables.write().await.failing_writes = failing;
    }

    fn new_id() -> RecordId {
        RecordId::new(uuid::Uuid::new_v4().to_string())
    }

    fn announce(&self, collection: Collection, action: ChangeAction, id: &RecordId) {
        self.feed.publish(ChangeEvent::new(collection, action, id.clone()));
    }
}

fn remove_by_id<R: RawRecord>(rows: &mut Vec<R>, id: &str) -> bool {
    let before = rows.len();
    rows.retain(|row| row.raw_id() != id);
    rows.len() != before
}

#[async_trait]
impl DataService for MemoryDataService {
    async fn fetch_contacts(&self) -> Result<FetchOutcome<Contact>> {
        let tables = self.tables.read().await;
        tables.check_fetch(Collection::Contacts)?;
        let mut outcome = coerce(Collection::Contacts, tables.contacts.clone());
        sort_contacts(&mut outcome.records);
        Ok(outcome)
    }

    async fn fetch_appointments(&self) -> Result<FetchOutcome<Appointment>> {
        let tables = self.tables.read().await;
        tables.check_fetch(Collection::Appointments)?;
        let mut outcome = coerce(Collection::Appointments, tables.appointments.clone());
        sort_appointments(&mut outcome.records);
        Ok(outcome)
    }

    async fn fetch_properties(&self) -> Result<FetchOutcome<Property>> {
        let tables = self.tables.read().await;
        tables.check_fetch(Collection::Properties)?;
        let mut outcome = coerce(Collection::Properties, tables.properties.clone());
        sort_properties(&mut outcome.records);
        Ok(outcome)
    }

    async fn insert_contact(&self, contact: NewContact) -> Result<RecordId> {
        let id = Self::new_id();
        {
            let mut tables = self.tables.write().await;
            tables.check_write()?;
            tables.contacts.push(contact.into_raw(&id));
        }
        self.announce(Collection::Contacts, ChangeAction::Create, &id);
        Ok(id)
    }

    async fn insert_appointment(&self, appointment: NewAppointment) -> Result<RecordId> {
        let id = Self::new_id();
        {
            let mut tables = self.tables.write().await;
            tables.check_write()?;
            tables.appointments.push(appointment.into_raw(&id));
        }
        self.announce(Collection::Appointments, ChangeAction::Create, &id);
        Ok(id)
    }

    async fn insert_property(&self, property: NewProperty) -> Result<RecordId> {
        let id = Self::new_id();
        {
            let mut tables = self.tables.write().await;
            tables.check_write()?;
            tables.properties.push(property.into_raw(&id));
        }
        self.announce(Collection::Properties, ChangeAction::Create, &id);
        Ok(id)
    }

    async fn update_appointment(&self, id: &RecordId, patch: AppointmentPatch) -> Result<()> {
        {
            let mut tables = self.tables.write().await;
            tables.check_write()?;

            let row = tables
                .appointments
                .iter_mut()
                .find(|row| row.id == id.as_str())
                .ok_or_else(|| SyncError::NotFound {
                    collection: Collection::Appointments,
                    id: id.clone(),
                })?;

            let current = Appointment::try_from(row.clone())?;
            *row = patch.apply(current).into();
        }
        self.announce(Collection::Appointments, ChangeAction::Update, id);
        Ok(())
    }

    async fn delete(&self, collection: Collection, id: &RecordId) -> Result<()> {
        let removed = {
            let mut tables = self.tables.write().await;
            tables.check_write()?;
            match collection {
                Collection::Contacts => remove_by_id(&mut tables.contacts, id.as_str()),
                Collection::Appointments => remove_by_id(&mut tables.appointments, id.as_str()),
                Collection::Properties => remove_by_id(&mut tables.properties, id.as_str()),
            }
        };

        if !removed {
            return Err(SyncError::NotFound {
                collection,
                id: id.clone(),
            });
        }

        self.announce(collection, ChangeAction::Delete, id);
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.feed.subscribe()
    }
}
