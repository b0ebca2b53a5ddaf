// File: crm-core/src/forms.rs
// Purpose: Raw form input and its conversion into validated write payloads
//
// Forms keep exactly what the user typed so a rejected submission can be
// shown again unchanged. Field names match the HTML inputs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::{
    parse_date, Category, NewAppointment, NewContact, NewProperty, Priority, RecordId,
};
use crate::validation::validators::{
    digits_only, has_control_chars, has_min_phone_digits, is_blank, is_valid_url,
};
use crate::validation::ValidationErrors;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactForm {
    pub nome: String,
    pub email: String,
    pub telefone: String,
    pub imovel_interesse_id: Option<String>,
}

impl ContactForm {
    pub fn validate(&self) -> Result<NewContact, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(is_blank(&self.nome), "nome", "Informe o nome do cliente.");
        errors.check(
            has_control_chars(&self.email),
            "email",
            "O email contém caracteres inválidos.",
        );
        errors.check(
            has_control_chars(&self.telefone),
            "telefone",
            "O telefone contém caracteres inválidos.",
        );

        errors.into_result(|| NewContact {
            name: self.nome.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.telefone.trim().to_string(),
            interested_property: RecordId::parse_optional(self.imovel_interesse_id.as_deref()),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppointmentForm {
    pub titulo: String,
    pub data_compromisso: String,
    pub prioridade: String,
    pub cliente_id: Option<String>,
}

impl Default for AppointmentForm {
    fn default() -> Self {
        Self {
            titulo: String::new(),
            data_compromisso: String::new(),
            prioridade: Priority::default().label().to_string(),
            cliente_id: None,
        }
    }
}

impl AppointmentForm {
    /// Empty form pre-filled with the day currently shown in the planner
    pub fn for_day(day: NaiveDate) -> Self {
        Self {
            data_compromisso: crate::model::date_to_iso(day),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<NewAppointment, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(is_blank(&self.titulo), "titulo", "Informe o título do compromisso.");

        let date = if is_blank(&self.data_compromisso) {
            errors.add("data_compromisso", "Informe a data do compromisso.");
            None
        } else {
            match parse_date(&self.data_compromisso) {
                Ok(date) => Some(date),
                Err(_) => {
                    errors.add("data_compromisso", "Data inválida (use AAAA-MM-DD).");
                    None
                }
            }
        };

        let priority = match self.prioridade.parse::<Priority>() {
            Ok(priority) => priority,
            Err(_) => {
                errors.add("prioridade", "Prioridade deve ser Baixa, Média ou Alta.");
                Priority::default()
            }
        };

        match (errors.is_empty(), date) {
            (true, Some(date)) => Ok(NewAppointment {
                title: self.titulo.trim().to_string(),
                completed: false,
                priority,
                contact: RecordId::parse_optional(self.cliente_id.as_deref()),
                date,
            }),
            _ => Err(errors),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertyForm {
    pub titulo: String,
    pub endereco: String,
    pub valor: String,
    pub link_externo: String,
    pub url_foto: String,
    pub tipo: String,
}

impl Default for PropertyForm {
    fn default() -> Self {
        Self {
            titulo: String::new(),
            endereco: String::new(),
            valor: String::new(),
            link_externo: String::new(),
            url_foto: String::new(),
            tipo: Category::default().label().to_string(),
        }
    }
}

fn optional_url(
    errors: &mut ValidationErrors,
    field: &str,
    value: &str,
    message: &str,
) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    errors.check(!is_valid_url(value), field, message);
    Some(value.to_string())
}

impl PropertyForm {
    pub fn validate(&self) -> Result<NewProperty, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(is_blank(&self.titulo), "titulo", "Informe o título do imóvel.");
        errors.check(is_blank(&self.endereco), "endereco", "Informe o endereço do imóvel.");

        // An empty price field means zero, like an untouched number input
        let price = match self.valor.trim() {
            "" => 0.0,
            raw => match raw.replace(',', ".").parse::<f64>() {
                Ok(price) if price.is_finite() && price >= 0.0 => price,
                _ => {
                    errors.add("valor", "Informe um valor numérico não negativo.");
                    0.0
                }
            },
        };

        let category = match self.tipo.parse::<Category>() {
            Ok(category) => category,
            Err(_) => {
                errors.add("tipo", "Tipo de imóvel desconhecido.");
                Category::default()
            }
        };

        let listing_url = optional_url(
            &mut errors,
            "link_externo",
            &self.link_externo,
            "O link do anúncio deve começar com http:// ou https://.",
        );
        let photo_url = optional_url(
            &mut errors,
            "url_foto",
            &self.url_foto,
            "A URL da foto deve começar com http:// ou https://.",
        );

        errors.into_result(|| NewProperty {
            title: self.titulo.trim().to_string(),
            address: self.endereco.trim().to_string(),
            price,
            listing_url,
            photo_url,
            category,
        })
    }
}

/// Free-form WhatsApp composer input
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WhatsappForm {
    pub numero: String,
    pub mensagem: String,
}

impl WhatsappForm {
    /// Digits of the number, once it has enough of them to dial
    pub fn validate(&self) -> Result<String, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(
            !has_min_phone_digits(&self.numero),
            "numero",
            "Por favor, digite um número de telefone válido (com DDD).",
        );
        errors.into_result(|| digits_only(&self.numero))
    }
}

/// Validate replacement text for a message template
pub fn validate_template_text(text: &str) -> Result<String, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    errors.check(is_blank(text), "texto", "O texto do template não pode ser vazio.");
    errors.into_result(|| text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_contact_requires_name() {
        let form = ContactForm {
            nome: "   ".to_string(),
            ..Default::default()
        };
        let errors = form.validate().unwrap_err();
        assert!(errors.get_error("nome").is_some());
    }

    #[test]
    fn test_contact_rejects_control_characters() {
        let form = ContactForm {
            nome: "Ana".to_string(),
            email: "ana\u{7f}@x.com".to_string(),
            telefone: "2199\u{1}8887766".to_string(),
            imovel_interesse_id: None,
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(
            errors.get_error("email").unwrap(),
            "O email contém caracteres inválidos."
        );
        assert_eq!(
            errors.get_error("telefone").unwrap(),
            "O telefone contém caracteres inválidos."
        );
    }

    #[test]
    fn test_contact_sentinel_reference_is_none() {
        let form = ContactForm {
            nome: " Maria ".to_string(),
            email: "maria@exemplo.com".to_string(),
            telefone: "21 99888-7766".to_string(),
            imovel_interesse_id: Some("0".to_string()),
        };
        let contact = form.validate().unwrap();
        assert_eq!(contact.name, "Maria");
        assert_eq!(contact.interested_property, None);
    }

    #[test]
    fn test_appointment_validation() {
        let ok = AppointmentForm {
            titulo: "Visita".to_string(),
            data_compromisso: "2024-06-01".to_string(),
            prioridade: "Alta".to_string(),
            cliente_id: Some("c1".to_string()),
        }
        .validate()
        .unwrap();
        assert_eq!(ok.priority, Priority::High);
        assert_eq!(ok.contact, Some(RecordId::new("c1")));
        assert!(!ok.completed);

        let errors = AppointmentForm::default().validate().unwrap_err();
        assert!(errors.get_error("titulo").is_some());
        assert!(errors.get_error("data_compromisso").is_some());

        let bad_date = AppointmentForm {
            titulo: "Visita".to_string(),
            data_compromisso: "31/02/2024".to_string(),
            ..Default::default()
        };
        assert!(bad_date.validate().is_err());
    }

    #[test]
    fn test_property_validation() {
        let form = PropertyForm {
            titulo: "Casa".to_string(),
            endereco: "Rua A".to_string(),
            valor: "350000".to_string(),
            tipo: "Casa".to_string(),
            ..Default::default()
        };
        let property = form.validate().unwrap();
        assert_eq!(property.price, 350_000.0);
        assert_eq!(property.category, Category::House);
        assert_eq!(property.listing_url, None);

        let bad = PropertyForm {
            valor: "-5".to_string(),
            link_externo: "www.site.com".to_string(),
            ..Default::default()
        };
        let errors = bad.validate().unwrap_err();
        for field in ["titulo", "endereco", "valor", "link_externo"] {
            assert!(errors.get_error(field).is_some(), "expected error on {field}");
        }
    }

    #[test]
    fn test_whatsapp_number_needs_eight_digits() {
        let short = WhatsappForm {
            numero: "99-88".to_string(),
            mensagem: String::new(),
        };
        assert!(short.validate().is_err());

        let ok = WhatsappForm {
            numero: "(21) 99888-7766".to_string(),
            mensagem: "Olá".to_string(),
        };
        assert_eq!(ok.validate().unwrap(), "21998887766");
    }

    #[test]
    fn test_template_text_must_not_be_blank() {
        assert!(validate_template_text("  ").is_err());
        assert_eq!(validate_template_text("Olá!").unwrap(), "Olá!");
    }
}
