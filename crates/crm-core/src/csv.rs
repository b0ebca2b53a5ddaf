// File: crm-core/src/csv.rs
// Purpose: Contact export as a spreadsheet-friendly CSV document

use chrono::{DateTime, Utc};

use crate::model::Contact;

pub const CONTACTS_HEADER: &str = "ID,Nome,Email,Telefone,Imovel_Interesse_ID";

/// Quote a field, doubling any embedded double quote
pub fn escape_field(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

fn contact_row(contact: &Contact) -> String {
    let interested = contact
        .interested_property
        .as_ref()
        .map(|id| id.as_str())
        .unwrap_or_default();

    [
        contact.id.as_str(),
        contact.name.as_str(),
        contact.email.as_str(),
        contact.phone.as_str(),
        interested,
    ]
    .iter()
    .map(|field| escape_field(field))
    .collect::<Vec<_>>()
    .join(",")
}

/// Encode contacts in input order.
///
/// Rows are separated by `\n` and the document has no trailing newline, so
/// identical input always yields identical bytes.
pub fn contacts_to_csv(contacts: &[Contact]) -> String {
    let mut lines = Vec::with_capacity(contacts.len() + 1);
    lines.push(CONTACTS_HEADER.to_string());
    lines.extend(contacts.iter().map(contact_row));
    lines.join("\n")
}

/// Download name for an export taken at `at`
pub fn export_file_name(at: DateTime<Utc>) -> String {
    format!("clientes_crm_{}.csv", at.timestamp_millis())
}
