// File: crm-core/src/snapshot.rs
// Purpose: Immutable view of the three collections as of the last reload

use crate::model::{Appointment, Contact, Property, RecordId};

/// The three raw collections, replaced wholesale on every reload.
///
/// Derivation functions take a snapshot (or one of its slices) explicitly;
/// nothing in this crate reads shared state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub contacts: Vec<Contact>,
    pub appointments: Vec<Appointment>,
    pub properties: Vec<Property>,
}

impl Snapshot {
    pub fn new(
        contacts: Vec<Contact>,
        appointments: Vec<Appointment>,
        properties: Vec<Property>,
    ) -> Self {
        Self {
            contacts,
            appointments,
            properties,
        }
    }

    pub fn find_contact(&self, id: &RecordId) -> Option<&Contact> {
        self.contacts.iter().find(|c| &c.id == id)
    }

    pub fn find_appointment(&self, id: &RecordId) -> Option<&Appointment> {
        self.appointments.iter().find(|a| &a.id == id)
    }

    pub fn find_property(&self, id: &RecordId) -> Option<&Property> {
        self.properties.iter().find(|p| &p.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty() && self.appointments.is_empty() && self.properties.is_empty()
    }
}
