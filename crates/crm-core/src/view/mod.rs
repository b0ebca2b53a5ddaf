// File: crm-core/src/view/mod.rs
// Purpose: Derived view state computed from a snapshot plus the current UI inputs
//
// Every function here is pure and idempotent. Results borrow from the input
// slices where possible so repeated derivation on each event stays cheap.

pub mod agenda;
pub mod contacts;
pub mod labels;
pub mod properties;
pub mod stats;

pub use agenda::appointments_on;
pub use contacts::search_contacts;
pub use labels::{contact_label, property_label};
pub use properties::{filter_properties, CategoryFilter, PriceBand, PropertyFilter};
pub use stats::{
    appointment_stats, dashboard_stats, AppointmentStats, DashboardStats, PriorityCounts,
};
