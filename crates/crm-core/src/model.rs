// File: crm-core/src/model.rs
// Purpose: Strict record model for contacts, appointments, properties and templates
//
// Rows from the data service arrive as `Raw*` structs (plain strings and
// primitives, exactly as stored) and are converted with `TryFrom` before any
// derivation function sees them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::RecordError;

// ============================================================================
// IDENTIFIERS & COLLECTIONS
// ============================================================================

/// Opaque record identifier assigned by the data service
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse an optional reference from a row or a form field.
    ///
    /// Empty strings and the `"0"` select placeholder both mean "no reference".
    pub fn parse_optional(raw: Option<&str>) -> Option<Self> {
        match raw.map(str::trim) {
            None | Some("") | Some("0") => None,
            Some(id) => Some(Self::new(id)),
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for RecordId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// The three named collections held by the data service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Collection {
    #[serde(rename = "clientes")]
    Contacts,
    #[serde(rename = "compromissos")]
    Appointments,
    #[serde(rename = "imoveis")]
    Properties,
}

impl Collection {
    pub const ALL: [Collection; 3] = [
        Collection::Contacts,
        Collection::Appointments,
        Collection::Properties,
    ];

    /// Backend table name
    pub fn table_name(self) -> &'static str {
        match self {
            Collection::Contacts => "clientes",
            Collection::Appointments => "compromissos",
            Collection::Properties => "imoveis",
        }
    }

    pub fn from_table_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.table_name() == name)
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_name())
    }
}

// ============================================================================
// ENUMERATED FIELDS
// ============================================================================

/// Appointment priority. Declaration order gives `Low < Medium < High`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Priority {
    #[serde(rename = "Baixa")]
    Low,
    #[default]
    #[serde(rename = "Média")]
    Medium,
    #[serde(rename = "Alta")]
    High,
}

impl Priority {
    /// Highest first, the order the dashboard lists them in
    pub const DESCENDING: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    pub fn label(self) -> &'static str {
        match self {
            Priority::Low => "Baixa",
            Priority::Medium => "Média",
            Priority::High => "Alta",
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            Priority::Low => "prioridade-baixa",
            Priority::Medium => "prioridade-media",
            Priority::High => "prioridade-alta",
        }
    }
}

impl FromStr for Priority {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Baixa" => Ok(Priority::Low),
            "Média" | "Media" => Ok(Priority::Medium),
            "Alta" => Ok(Priority::High),
            other => Err(RecordError::UnknownPriority(other.to_string())),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Property listing category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[default]
    #[serde(rename = "Apartamento")]
    Apartment,
    #[serde(rename = "Casa")]
    House,
    #[serde(rename = "Terreno")]
    Land,
    #[serde(rename = "Comercial")]
    Commercial,
    #[serde(rename = "Outro")]
    Other,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Apartment,
        Category::House,
        Category::Land,
        Category::Commercial,
        Category::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::Apartment => "Apartamento",
            Category::House => "Casa",
            Category::Land => "Terreno",
            Category::Commercial => "Comercial",
            Category::Other => "Outro",
        }
    }
}

impl FromStr for Category {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.label() == s)
            .ok_or_else(|| RecordError::UnknownCategory(s.to_string()))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Parse a `YYYY-MM-DD` calendar date
pub fn parse_date(raw: &str) -> Result<NaiveDate, RecordError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| RecordError::InvalidDate(raw.to_string()))
}

/// Render a calendar date the way the backend stores it
pub fn date_to_iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

// ============================================================================
// STRICT RECORDS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Contact {
    pub id: RecordId,
    pub name: String,
    pub email: String,
    pub phone: String,
    /// Weak reference to a property; may dangle
    pub interested_property: Option<RecordId>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Appointment {
    pub id: RecordId,
    pub title: String,
    pub completed: bool,
    pub priority: Priority,
    /// Weak reference to a contact; may dangle
    pub contact: Option<RecordId>,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Property {
    pub id: RecordId,
    pub title: String,
    pub address: String,
    pub price: f64,
    pub listing_url: Option<String>,
    pub photo_url: Option<String>,
    pub category: Category,
}

/// Quick-send message template, stored only in local preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageTemplate {
    pub id: u32,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "texto")]
    pub text: String,
}

impl MessageTemplate {
    pub fn new(id: u32, title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            text: text.into(),
        }
    }
}

/// Seed set written to preferences the first time templates are read
pub fn default_templates() -> Vec<MessageTemplate> {
    vec![
        MessageTemplate::new(
            1,
            "Primeira Abordagem",
            "Olá! Sou corretor de imóveis e gostaria de saber se você tem interesse em comprar, vender ou alugar um imóvel. Posso te ajudar?",
        ),
        MessageTemplate::new(
            2,
            "Follow-up Lead",
            "Oi! Como vai? Gostaria de saber se ainda tem interesse no imóvel que conversamos. Tenho algumas opções similares que podem...",
        ),
        MessageTemplate::new(
            3,
            "Agendamento Visita",
            "Olá! Gostaria de agendar uma visita ao imóvel? Tenho disponibilidade hoje e amanhã. Qual horário é melhor para você?",
        ),
        MessageTemplate::new(
            4,
            "Proposta Aceita",
            "Parabéns! Sua proposta foi aceita! Por favor, me confirme seu melhor horário para enviarmos o contrato digital.",
        ),
    ]
}

// ============================================================================
// WRITE PAYLOADS
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct NewContact {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub interested_property: Option<RecordId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewAppointment {
    pub title: String,
    pub completed: bool,
    pub priority: Priority,
    pub contact: Option<RecordId>,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewProperty {
    pub title: String,
    pub address: String,
    pub price: f64,
    pub listing_url: Option<String>,
    pub photo_url: Option<String>,
    pub category: Category,
}

/// Partial appointment update; `None` fields are left untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppointmentPatch {
    pub title: Option<String>,
    pub completed: Option<bool>,
    pub priority: Option<Priority>,
    pub contact: Option<Option<RecordId>>,
    pub date: Option<NaiveDate>,
}

impl AppointmentPatch {
    pub fn completion(completed: bool) -> Self {
        Self {
            completed: Some(completed),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.completed.is_none()
            && self.priority.is_none()
            && self.contact.is_none()
            && self.date.is_none()
    }

    /// Apply the patch, returning the updated appointment
    pub fn apply(self, appointment: Appointment) -> Appointment {
        Appointment {
            title: self.title.unwrap_or(appointment.title),
            completed: self.completed.unwrap_or(appointment.completed),
            priority: self.priority.unwrap_or(appointment.priority),
            contact: self.contact.unwrap_or(appointment.contact),
            date: self.date.unwrap_or(appointment.date),
            ..appointment
        }
    }
}

// ============================================================================
// RAW ROWS (backend column names)
// ============================================================================

/// A backend row that can be coerced into a strict record
pub trait RawRecord: Sized {
    type Record: TryFrom<Self, Error = RecordError>;

    /// Identifier as stored, used when reporting a rejected row
    fn raw_id(&self) -> &str;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawContact {
    pub id: String,
    pub nome: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub telefone: Option<String>,
    #[serde(default)]
    pub imovel_interesse_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawAppointment {
    pub id: String,
    pub titulo: String,
    #[serde(default)]
    pub concluido: bool,
    pub prioridade: String,
    #[serde(default)]
    pub cliente_id: Option<String>,
    pub data_compromisso: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawProperty {
    pub id: String,
    pub titulo: String,
    pub endereco: String,
    #[serde(default)]
    pub valor: f64,
    #[serde(default)]
    pub link_externo: Option<String>,
    #[serde(default)]
    pub url_foto: Option<String>,
    pub tipo: String,
}

fn require_id(raw: &str) -> Result<RecordId, RecordError> {
    match raw.trim() {
        "" => Err(RecordError::MissingId),
        id => Ok(RecordId::new(id)),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl TryFrom<RawContact> for Contact {
    type Error = RecordError;

    fn try_from(raw: RawContact) -> Result<Self, Self::Error> {
        Ok(Contact {
            id: require_id(&raw.id)?,
            interested_property: RecordId::parse_optional(raw.imovel_interesse_id.as_deref()),
            name: raw.nome,
            email: raw.email.unwrap_or_default(),
            phone: raw.telefone.unwrap_or_default(),
        })
    }
}

impl TryFrom<RawAppointment> for Appointment {
    type Error = RecordError;

    fn try_from(raw: RawAppointment) -> Result<Self, Self::Error> {
        Ok(Appointment {
            id: require_id(&raw.id)?,
            priority: raw.prioridade.parse()?,
            date: parse_date(&raw.data_compromisso)?,
            contact: RecordId::parse_optional(raw.cliente_id.as_deref()),
            title: raw.titulo,
            completed: raw.concluido,
        })
    }
}

impl TryFrom<RawProperty> for Property {
    type Error = RecordError;

    fn try_from(raw: RawProperty) -> Result<Self, Self::Error> {
        if !raw.valor.is_finite() || raw.valor < 0.0 {
            return Err(RecordError::InvalidPrice(raw.valor));
        }

        Ok(Property {
            id: require_id(&raw.id)?,
            category: raw.tipo.parse()?,
            title: raw.titulo,
            address: raw.endereco,
            price: raw.valor,
            listing_url: non_empty(raw.link_externo),
            photo_url: non_empty(raw.url_foto),
        })
    }
}

impl RawRecord for RawContact {
    type Record = Contact;

    fn raw_id(&self) -> &str {
        &self.id
    }
}

impl RawRecord for RawAppointment {
    type Record = Appointment;

    fn raw_id(&self) -> &str {
        &self.id
    }
}

impl RawRecord for RawProperty {
    type Record = Property;

    fn raw_id(&self) -> &str {
        &self.id
    }
}

impl NewContact {
    /// Row shape for storing this contact under `id`
    pub fn into_raw(self, id: &RecordId) -> RawContact {
        RawContact {
            id: id.to_string(),
            nome: self.name,
            email: Some(self.email),
            telefone: Some(self.phone),
            imovel_interesse_id: self.interested_property.map(|r| r.to_string()),
        }
    }
}

impl NewAppointment {
    pub fn into_raw(self, id: &RecordId) -> RawAppointment {
        RawAppointment {
            id: id.to_string(),
            titulo: self.title,
            concluido: self.completed,
            prioridade: self.priority.label().to_string(),
            cliente_id: self.contact.map(|r| r.to_string()),
            data_compromisso: date_to_iso(self.date),
        }
    }
}

impl NewProperty {
    pub fn into_raw(self, id: &RecordId) -> RawProperty {
        RawProperty {
            id: id.to_string(),
            titulo: self.title,
            endereco: self.address,
            valor: self.price,
            link_externo: self.listing_url,
            url_foto: self.photo_url,
            tipo: self.category.label().to_string(),
        }
    }
}

impl From<Appointment> for RawAppointment {
    fn from(appointment: Appointment) -> Self {
        RawAppointment {
            id: appointment.id.to_string(),
            titulo: appointment.title,
            concluido: appointment.completed,
            prioridade: appointment.priority.label().to_string(),
            cliente_id: appointment.contact.map(|r| r.to_string()),
            data_compromisso: date_to_iso(appointment.date),
        }
    }
}
