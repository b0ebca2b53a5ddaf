// File: crm-core/src/links.rs
// Purpose: Deep links for chat, dialing and e-mail composition

use urlencoding::encode;

use crate::forms::WhatsappForm;
use crate::validation::ValidationErrors;

/// Country code prefixed to every WhatsApp number
pub const WHATSAPP_COUNTRY_CODE: &str = "55";

/// `https://wa.me/55<digits>?text=<message>`; rejects numbers that are too short
pub fn whatsapp_link(phone: &str, message: &str) -> Result<String, ValidationErrors> {
    let form = WhatsappForm {
        numero: phone.to_string(),
        mensagem: message.to_string(),
    };
    let digits = form.validate()?;
    Ok(format!(
        "https://wa.me/{WHATSAPP_COUNTRY_CODE}{digits}?text={}",
        encode(message)
    ))
}

/// `tel:` link keeping the number as typed, minus whitespace
pub fn dial_link(phone: &str) -> String {
    let compact: String = phone.split_whitespace().collect();
    format!("tel:{compact}")
}

pub fn mailto_link(email: &str, subject: &str, body: &str) -> String {
    format!(
        "mailto:{}?subject={}&body={}",
        email.trim(),
        encode(subject),
        encode(body)
    )
}
