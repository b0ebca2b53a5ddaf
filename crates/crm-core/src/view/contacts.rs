// File: crm-core/src/view/contacts.rs
// Purpose: Free-text contact search

use crate::model::Contact;

/// Contacts whose name, email or phone contains `query`.
///
/// Name and email are compared case-insensitively; the phone is a plain
/// substring match. An empty query returns the whole collection in its
/// original order.
pub fn search_contacts<'a>(contacts: &'a [Contact], query: &str) -> Vec<&'a Contact> {
    if query.is_empty() {
        return contacts.iter().collect();
    }

    let term = query.to_lowercase();

    contacts
        .iter()
        .filter(|c| {
            c.name.to_lowercase().contains(&term)
                || c.email.to_lowercase().contains(&term)
                || c.phone.contains(&term)
        })
        .collect()
}
