// File: crm-sync/src/commands.rs
// Purpose: User intents translated into data service and preference writes

use chrono::{DateTime, Utc};
use crm_core::config::AgentConfig;
use crm_core::csv::{contacts_to_csv, export_file_name};
use crm_core::forms::validate_template_text;
use crm_core::{
    links, AppointmentForm, AppointmentPatch, Collection, Contact, ContactForm, MessageTemplate,
    PropertyForm, RecordId, ValidationErrors,
};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use crate::error::SyncError;
use crate::prefs::{self, PreferenceStore};
use crate::service::DataService;
use crate::store::SnapshotStore;

/// The write a failed command was attempting, as shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    AddContact,
    RemoveContact,
    AddAppointment,
    UpdateAppointment,
    RemoveAppointment,
    AddProperty,
    RemoveProperty,
    SavePreferences,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Operation::AddContact => "adicionar cliente",
            Operation::RemoveContact => "remover cliente",
            Operation::AddAppointment => "adicionar compromisso",
            Operation::UpdateAppointment => "atualizar compromisso",
            Operation::RemoveAppointment => "remover compromisso",
            Operation::AddProperty => "adicionar imóvel",
            Operation::RemoveProperty => "remover imóvel",
            Operation::SavePreferences => "salvar preferências",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    Invalid(#[from] ValidationErrors),

    #[error("Erro ao {operation}: {source}")]
    Write {
        operation: Operation,
        source: SyncError,
    },

    #[error("Registro {id} não encontrado.")]
    NotFound { id: String },

    #[error("Não há clientes para exportar.")]
    NothingToExport,

    #[error("O cliente {name} não tem um email cadastrado.")]
    NoEmail { name: String },

    #[error("O cliente {name} não tem um telefone cadastrado.")]
    NoPhone { name: String },
}

impl CommandError {
    fn write(operation: Operation) -> impl FnOnce(SyncError) -> Self {
        move |source| match source {
            SyncError::NotFound { id, .. } => CommandError::NotFound { id: id.to_string() },
            source => {
                tracing::error!(%operation, error = %source, "write failed");
                CommandError::Write { operation, source }
            }
        }
    }
}

pub type CommandResult<T> = std::result::Result<T, CommandError>;

/// Subject and body used for "compose email" links
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailDefaults {
    pub subject: String,
    /// `{nome}` is replaced with the contact's name
    pub body: String,
}

impl From<&AgentConfig> for EmailDefaults {
    fn from(agent: &AgentConfig) -> Self {
        Self {
            subject: agent.email_subject.clone(),
            body: agent.email_body.clone(),
        }
    }
}

impl EmailDefaults {
    pub fn body_for(&self, contact_name: &str) -> String {
        self.body.replace("{nome}", contact_name)
    }
}

impl Default for EmailDefaults {
    fn default() -> Self {
        Self::from(&AgentConfig::default())
    }
}

/// A ready-to-download CSV file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    pub file_name: String,
    pub body: String,
}

/// The one place user intents turn into writes.
///
/// Every write validates locally first, then calls the data service, then
/// reloads the snapshot so the next read reflects it.
#[derive(Clone)]
pub struct Commands {
    service: Arc<dyn DataService>,
    store: Arc<SnapshotStore>,
    prefs: Arc<dyn PreferenceStore>,
    email: EmailDefaults,
}

impl Commands {
    pub fn new(
        service: Arc<dyn DataService>,
        store: Arc<SnapshotStore>,
        prefs: Arc<dyn PreferenceStore>,
        email: EmailDefaults,
    ) -> Self {
        Self {
            service,
            store,
            prefs,
            email,
        }
    }

    pub fn store(&self) -> &Arc<SnapshotStore> {
        &self.store
    }

    async fn refresh(&self) {
        self.store.reload_all(self.service.as_ref()).await;
    }

    async fn contact(&self, id: &RecordId) -> CommandResult<Contact> {
        self.store
            .snapshot()
            .await
            .find_contact(id)
            .cloned()
            .ok_or_else(|| CommandError::NotFound { id: id.to_string() })
    }

    async fn remove(
        &self,
        collection: Collection,
        id: &RecordId,
        operation: Operation,
    ) -> CommandResult<()> {
        self.service
            .delete(collection, id)
            .await
            .map_err(CommandError::write(operation))?;
        tracing::info!(%collection, %id, "record removed");
        self.refresh().await;
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Contacts
    // ------------------------------------------------------------------------

    pub async fn add_contact(&self, form: &ContactForm) -> CommandResult<RecordId> {
        let contact = form.validate()?;
        let id = self
            .service
            .insert_contact(contact)
            .await
            .map_err(CommandError::write(Operation::AddContact))?;
        tracing::info!(%id, "contact added");
        self.refresh().await;
        Ok(id)
    }

    pub async fn remove_contact(&self, id: &RecordId) -> CommandResult<()> {
        self.remove(Collection::Contacts, id, Operation::RemoveContact).await
    }

    // ------------------------------------------------------------------------
    // Appointments
    // ------------------------------------------------------------------------

    pub async fn add_appointment(&self, form: &AppointmentForm) -> CommandResult<RecordId> {
        let appointment = form.validate()?;
        let id = self
            .service
            .insert_appointment(appointment)
            .await
            .map_err(CommandError::write(Operation::AddAppointment))?;
        tracing::info!(%id, "appointment added");
        self.refresh().await;
        Ok(id)
    }

    /// Flip completion; returns the new state
    pub async fn toggle_appointment(&self, id: &RecordId) -> CommandResult<bool> {
        let completed = self
            .store
            .snapshot()
            .await
            .find_appointment(id)
            .map(|appointment| !appointment.completed)
            .ok_or_else(|| CommandError::NotFound { id: id.to_string() })?;

        self.service
            .update_appointment(id, AppointmentPatch::completion(completed))
            .await
            .map_err(CommandError::write(Operation::UpdateAppointment))?;
        self.refresh().await;
        Ok(completed)
    }

    pub async fn remove_appointment(&self, id: &RecordId) -> CommandResult<()> {
        self.remove(Collection::Appointments, id, Operation::RemoveAppointment).await
    }

    // ------------------------------------------------------------------------
    // Properties
    // ------------------------------------------------------------------------

    pub async fn add_property(&self, form: &PropertyForm) -> CommandResult<RecordId> {
        let property = form.validate()?;
        let id = self
            .service
            .insert_property(property)
            .await
            .map_err(CommandError::write(Operation::AddProperty))?;
        tracing::info!(%id, "property added");
        self.refresh().await;
        Ok(id)
    }

    pub async fn remove_property(&self, id: &RecordId) -> CommandResult<()> {
        self.remove(Collection::Properties, id, Operation::RemoveProperty).await
    }

    // ------------------------------------------------------------------------
    // Preferences
    // ------------------------------------------------------------------------

    pub fn templates(&self) -> Vec<MessageTemplate> {
        prefs::load_templates(self.prefs.as_ref())
    }

    /// Replace the text of template `id`, keeping its title
    pub fn update_template(&self, id: u32, text: &str) -> CommandResult<Vec<MessageTemplate>> {
        let text = validate_template_text(text)?;
        let mut templates = self.templates();

        let template = templates
            .iter_mut()
            .find(|template| template.id == id)
            .ok_or_else(|| CommandError::NotFound { id: id.to_string() })?;
        template.text = text;

        prefs::set_typed(self.prefs.as_ref(), prefs::TEMPLATES_KEY, &templates)
            .map_err(CommandError::write(Operation::SavePreferences))?;
        Ok(templates)
    }

    pub fn dark_mode(&self) -> bool {
        prefs::load_dark_mode(self.prefs.as_ref())
    }

    /// Flip the theme flag; returns the new value
    pub fn toggle_dark_mode(&self) -> CommandResult<bool> {
        let enabled = !self.dark_mode();
        prefs::set_typed(self.prefs.as_ref(), prefs::DARK_MODE_KEY, &enabled)
            .map_err(CommandError::write(Operation::SavePreferences))?;
        Ok(enabled)
    }

    // ------------------------------------------------------------------------
    // Side channels
    // ------------------------------------------------------------------------

    pub fn whatsapp_link(&self, phone: &str, message: &str) -> CommandResult<String> {
        Ok(links::whatsapp_link(phone, message)?)
    }

    /// Chat link for a contact's phone, with an empty message
    pub async fn contact_whatsapp_link(&self, id: &RecordId) -> CommandResult<String> {
        let contact = self.contact(id).await?;
        if contact.phone.trim().is_empty() {
            return Err(CommandError::NoPhone { name: contact.name });
        }
        self.whatsapp_link(&contact.phone, "")
    }

    pub async fn dial_link(&self, id: &RecordId) -> CommandResult<String> {
        let contact = self.contact(id).await?;
        if contact.phone.trim().is_empty() {
            return Err(CommandError::NoPhone { name: contact.name });
        }
        Ok(links::dial_link(&contact.phone))
    }

    pub async fn email_link(&self, id: &RecordId) -> CommandResult<String> {
        let contact = self.contact(id).await?;
        if contact.email.trim().is_empty() {
            return Err(CommandError::NoEmail { name: contact.name });
        }
        let body = self.email.body_for(&contact.name);
        Ok(links::mailto_link(&contact.email, &self.email.subject, &body))
    }

    /// The address to place on the clipboard
    pub async fn copy_email(&self, id: &RecordId) -> CommandResult<String> {
        let contact = self.contact(id).await?;
        match contact.email.trim() {
            "" => Err(CommandError::NoEmail { name: contact.name }),
            email => Ok(email.to_string()),
        }
    }

    pub async fn export_contacts_csv(&self, at: DateTime<Utc>) -> CommandResult<CsvExport> {
        let snapshot = self.store.snapshot().await;
        if snapshot.contacts.is_empty() {
            return Err(CommandError::NothingToExport);
        }

        tracing::info!(contacts = snapshot.contacts.len(), "exporting contacts");
        Ok(CsvExport {
            file_name: export_file_name(at),
            body: contacts_to_csv(&snapshot.contacts),
        })
    }
}
