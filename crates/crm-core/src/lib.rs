// crm-core - record model and view-state derivation for the agent CRM
// Everything here is pure: no network, no storage, no ambient state.

//! # crm-core
//!
//! Strict record types for the three collections (contacts, appointments,
//! properties), coercion of loosely-typed backend rows into those types, and
//! the derivation functions the presentation layer consumes.
//!
//! ```rust,ignore
//! use crm_core::view::{dashboard_stats, search_contacts};
//!
//! let stats = dashboard_stats(&snapshot);
//! let visible = search_contacts(&snapshot.contacts, "maria");
//! ```

pub mod config;
pub mod csv;
pub mod error;
pub mod format;
pub mod forms;
pub mod links;
pub mod model;
pub mod snapshot;
pub mod text;
pub mod validation;
pub mod view;

pub use config::Config;
pub use error::RecordError;
pub use forms::{AppointmentForm, ContactForm, PropertyForm, WhatsappForm};
pub use model::{
    Appointment, AppointmentPatch, Category, Collection, Contact, MessageTemplate,
    NewAppointment, NewContact, NewProperty, Priority, Property, RawAppointment, RawContact,
    RawProperty, RawRecord, RecordId,
};
pub use snapshot::Snapshot;
pub use validation::ValidationErrors;
