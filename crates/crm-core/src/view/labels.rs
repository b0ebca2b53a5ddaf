// File: crm-core/src/view/labels.rs
// Purpose: Resolve weak references into display labels without failing

use crate::model::{Contact, Property, RecordId};

pub const NO_CONTACT: &str = "Sem cliente";
pub const CONTACT_NOT_FOUND: &str = "Cliente não encontrado";
pub const NO_PROPERTY: &str = "Nenhum imóvel associado";
pub const PROPERTY_NOT_FOUND: &str = "Imóvel (ID) não encontrado";

/// Name of the referenced contact, or a placeholder when unset or dangling
pub fn contact_label<'a>(contacts: &'a [Contact], id: Option<&RecordId>) -> &'a str {
    match id {
        None => NO_CONTACT,
        Some(id) => contacts
            .iter()
            .find(|c| &c.id == id)
            .map(|c| c.name.as_str())
            .unwrap_or(CONTACT_NOT_FOUND),
    }
}

/// Title of the referenced property, or a placeholder when unset or dangling
pub fn property_label<'a>(properties: &'a [Property], id: Option<&RecordId>) -> &'a str {
    match id {
        None => NO_PROPERTY,
        Some(id) => properties
            .iter()
            .find(|p| &p.id == id)
            .map(|p| p.title.as_str())
            .unwrap_or(PROPERTY_NOT_FOUND),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Category;

    fn property(id: &str, title: &str) -> Property {
        Property {
            id: RecordId::new(id),
            title: title.to_string(),
            address: "Rua das Flores, 10".to_string(),
            price: 100.0,
            listing_url: None,
            photo_url: None,
            category: Category::House,
        }
    }

    #[test]
    fn test_property_label_resolves_and_tolerates_dangling() {
        let properties = vec![property("p1", "Casa na Praia")];

        assert_eq!(
            property_label(&properties, Some(&RecordId::new("p1"))),
            "Casa na Praia"
        );
        assert_eq!(
            property_label(&properties, Some(&RecordId::new("deleted"))),
            PROPERTY_NOT_FOUND
        );
        assert_eq!(property_label(&properties, None), NO_PROPERTY);
    }

    #[test]
    fn test_contact_label_placeholders() {
        assert_eq!(contact_label(&[], None), NO_CONTACT);
        assert_eq!(
            contact_label(&[], Some(&RecordId::new("c9"))),
            CONTACT_NOT_FOUND
        );
    }
}
