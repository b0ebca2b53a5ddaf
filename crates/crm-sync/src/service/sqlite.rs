// File: crm-sync/src/service/sqlite.rs
// Purpose: Data service backed by SQLite through sqlx

use async_trait::async_trait;
use crm_core::{
    Appointment, AppointmentPatch, Collection, Contact, NewAppointment, NewContact, NewProperty,
    Property, RawAppointment, RawContact, RawProperty, RecordId,
};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{QueryBuilder, Row, Sqlite};
use tokio::sync::broadcast;

use super::{coerce, DataService, FetchOutcome};
use crate::change_feed::{ChangeAction, ChangeEvent, ChangeFeed};
use crate::error::{Result, SyncError};

/// SQLite-backed store for `clientes`, `compromissos` and `imoveis`
pub struct SqliteDataService {
    pool: SqlitePool,
    feed: ChangeFeed,
}

impl SqliteDataService {
    /// Connect to `url` and create the tables if they are missing
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await?;
        Self::from_pool(pool).await
    }

    /// Private in-memory database; a single connection that is never recycled
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;
        Self::from_pool(pool).await
    }

    pub async fn from_pool(pool: SqlitePool) -> Result<Self> {
        Self::init_tables(&pool).await?;
        Ok(Self {
            pool,
            feed: ChangeFeed::new(),
        })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Initialize database tables
    async fn init_tables(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS clientes (
                id TEXT PRIMARY KEY,
                nome TEXT NOT NULL,
                email TEXT,
                telefone TEXT,
                imovel_interesse_id TEXT
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS compromissos (
                id TEXT PRIMARY KEY,
                titulo TEXT NOT NULL,
                concluido INTEGER NOT NULL DEFAULT 0,
                prioridade TEXT NOT NULL,
                cliente_id TEXT,
                data_compromisso TEXT NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS imoveis (
                id TEXT PRIMARY KEY,
                titulo TEXT NOT NULL,
                endereco TEXT NOT NULL,
                valor REAL NOT NULL DEFAULT 0,
                link_externo TEXT,
                url_foto TEXT,
                tipo TEXT NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        tracing::debug!("CRM tables ready");
        Ok(())
    }

    fn new_id() -> RecordId {
        RecordId::new(uuid::Uuid::new_v4().to_string())
    }

    fn announce(&self, collection: Collection, action: ChangeAction, id: &RecordId) {
        self.feed.publish(ChangeEvent::new(collection, action, id.clone()));
    }

    async fn exists(&self, collection: Collection, id: &RecordId) -> Result<bool> {
        let sql = format!("SELECT COUNT(*) FROM {} WHERE id = ?", collection.table_name());
        let count: i64 = sqlx::query_scalar(&sql)
            .bind(id.as_str())
            .fetch_one(&self.pool)
            .await?;
        Ok(count > 0)
    }
}

fn contact_row(row: &SqliteRow) -> std::result::Result<RawContact, sqlx::Error> {
    Ok(RawContact {
        id: row.try_get("id")?,
        nome: row.try_get("nome")?,
        email: row.try_get("email")?,
        telefone: row.try_get("telefone")?,
        imovel_interesse_id: row.try_get("imovel_interesse_id")?,
    })
}

fn appointment_row(row: &SqliteRow) -> std::result::Result<RawAppointment, sqlx::Error> {
    Ok(RawAppointment {
        id: row.try_get("id")?,
        titulo: row.try_get("titulo")?,
        concluido: row.try_get("concluido")?,
        prioridade: row.try_get("prioridade")?,
        cliente_id: row.try_get("cliente_id")?,
        data_compromisso: row.try_get("data_compromisso")?,
    })
}

fn property_row(row: &SqliteRow) -> std::result::Result<RawProperty, sqlx::Error> {
    Ok(RawProperty {
        id: row.try_get("id")?,
        titulo: row.try_get("titulo")?,
        endereco: row.try_get("endereco")?,
        valor: row.try_get("valor")?,
        link_externo: row.try_get("link_externo")?,
        url_foto: row.try_get("url_foto")?,
        tipo: row.try_get("tipo")?,
    })
}

#[async_trait]
impl DataService for SqliteDataService {
    async fn fetch_contacts(&self) -> Result<FetchOutcome<Contact>> {
        let rows = sqlx::query(
            r#"
            SELECT id, nome, email, telefone, imovel_interesse_id
            FROM clientes
            ORDER BY nome COLLATE NOCASE ASC, id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let raw = rows.iter().map(contact_row).collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(coerce(Collection::Contacts, raw))
    }

    async fn fetch_appointments(&self) -> Result<FetchOutcome<Appointment>> {
        let rows = sqlx::query(
            r#"
            SELECT id, titulo, concluido, prioridade, cliente_id, data_compromisso
            FROM compromissos
            ORDER BY data_compromisso ASC,
                CASE prioridade WHEN 'Alta' THEN 3 WHEN 'Média' THEN 2 ELSE 1 END DESC,
                titulo ASC,
                id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let raw = rows
            .iter()
            .map(appointment_row)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(coerce(Collection::Appointments, raw))
    }

    async fn fetch_properties(&self) -> Result<FetchOutcome<Property>> {
        let rows = sqlx::query(
            r#"
            SELECT id, titulo, endereco, valor, link_externo, url_foto, tipo
            FROM imoveis
            ORDER BY titulo COLLATE NOCASE ASC, id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let raw = rows.iter().map(property_row).collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(coerce(Collection::Properties, raw))
    }

    async fn insert_contact(&self, contact: NewContact) -> Result<RecordId> {
        let id = Self::new_id();
        let raw = contact.into_raw(&id);

        sqlx::query(
            r#"
            INSERT INTO clientes (id, nome, email, telefone, imovel_interesse_id)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&raw.id)
        .bind(&raw.nome)
        .bind(&raw.email)
        .bind(&raw.telefone)
        .bind(&raw.imovel_interesse_id)
        .execute(&self.pool)
        .await?;

        self.announce(Collection::Contacts, ChangeAction::Create, &id);
        Ok(id)
    }

    async fn insert_appointment(&self, appointment: NewAppointment) -> Result<RecordId> {
        let id = Self::new_id();
        let raw = appointment.into_raw(&id);

        sqlx::query(
            r#"
            INSERT INTO compromissos
                (id, titulo, concluido, prioridade, cliente_id, data_compromisso)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&raw.id)
        .bind(&raw.titulo)
        .bind(raw.concluido)
        .bind(&raw.prioridade)
        .bind(&raw.cliente_id)
        .bind(&raw.data_compromisso)
        .execute(&self.pool)
        .await?;

        self.announce(Collection::Appointments, ChangeAction::Create, &id);
        Ok(id)
    }

    async fn insert_property(&self, property: NewProperty) -> Result<RecordId> {
        let id = Self::new_id();
        let raw = property.into_raw(&id);

        sqlx::query(
            r#"
            INSERT INTO imoveis (id, titulo, endereco, valor, link_externo, url_foto, tipo)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&raw.id)
        .bind(&raw.titulo)
        .bind(&raw.endereco)
        .bind(raw.valor)
        .bind(&raw.link_externo)
        .bind(&raw.url_foto)
        .bind(&raw.tipo)
        .execute(&self.pool)
        .await?;

        self.announce(Collection::Properties, ChangeAction::Create, &id);
        Ok(id)
    }

    async fn update_appointment(&self, id: &RecordId, patch: AppointmentPatch) -> Result<()> {
        let not_found = || SyncError::NotFound {
            collection: Collection::Appointments,
            id: id.clone(),
        };

        if patch.is_empty() {
            return if self.exists(Collection::Appointments, id).await? {
                Ok(())
            } else {
                Err(not_found())
            };
        }

        let mut builder = QueryBuilder::<Sqlite>::new("UPDATE compromissos SET ");
        let mut fields = builder.separated(", ");
        if let Some(title) = patch.title {
            fields.push("titulo = ").push_bind_unseparated(title);
        }
        if let Some(completed) = patch.completed {
            fields.push("concluido = ").push_bind_unseparated(completed);
        }
        if let Some(priority) = patch.priority {
            fields
                .push("prioridade = ")
                .push_bind_unseparated(priority.label());
        }
        if let Some(contact) = patch.contact {
            fields
                .push("cliente_id = ")
                .push_bind_unseparated(contact.map(|c| c.to_string()));
        }
        if let Some(date) = patch.date {
            fields
                .push("data_compromisso = ")
                .push_bind_unseparated(crm_core::model::date_to_iso(date));
        }
        builder.push(" WHERE id = ").push_bind(id.to_string());

        let result = builder.build().execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(not_found());
        }

        self.announce(Collection::Appointments, ChangeAction::Update, id);
        Ok(())
    }

    async fn delete(&self, collection: Collection, id: &RecordId) -> Result<()> {
        let sql = format!("DELETE FROM {} WHERE id = ?", collection.table_name());
        let result = sqlx::query(&sql)
            .bind(id.as_str())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(SyncError::NotFound {
                collection,
                id: id.clone(),
            });
        }

        self.announce(collection, ChangeAction::Delete, id);
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.feed.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use crm_core::{Category, Priority};
    use pretty_assertions::assert_eq;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    fn appointment(title: &str, date: NaiveDate, priority: Priority) -> NewAppointment {
        NewAppointment {
            title: title.to_string(),
            completed: false,
            priority,
            contact: None,
            date,
        }
    }

    #[tokio::test]
    async fn test_insert_and_fetch_contacts() {
        let service = SqliteDataService::in_memory().await.unwrap();
        let mut rx = service.subscribe();

        let id = service
            .insert_contact(NewContact {
                name: "Maria".to_string(),
                email: "maria@exemplo.com".to_string(),
                phone: "21 99888-7766".to_string(),
                interested_property: None,
            })
            .await
            .unwrap();

        let event = rx.recv().await.unwrap();
        assert_eq!(event.collection, Collection::Contacts);
        assert_eq!(event.action, ChangeAction::Create);
        assert_eq!(event.record_id, id);

        let outcome = service.fetch_contacts().await.unwrap();
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.records[0].id, id);
        assert_eq!(outcome.records[0].interested_property, None);
        assert!(outcome.rejected.is_empty());
    }

    #[tokio::test]
    async fn test_appointments_come_back_in_due_order() {
        let service = SqliteDataService::in_memory().await.unwrap();
        service
            .insert_appointment(appointment("Depois", day(3), Priority::High))
            .await
            .unwrap();
        service
            .insert_appointment(appointment("Baixa", day(1), Priority::Low))
            .await
            .unwrap();
        service
            .insert_appointment(appointment("Alta", day(1), Priority::High))
            .await
            .unwrap();

        let titles: Vec<String> = service
            .fetch_appointments()
            .await
            .unwrap()
            .records
            .into_iter()
            .map(|a| a.title)
            .collect();
        assert_eq!(titles, vec!["Alta", "Baixa", "Depois"]);
    }

    #[tokio::test]
    async fn test_update_appointment_patch() {
        let service = SqliteDataService::in_memory().await.unwrap();
        let id = service
            .insert_appointment(appointment("Visita", day(1), Priority::Medium))
            .await
            .unwrap();

        service
            .update_appointment(&id, AppointmentPatch::completion(true))
            .await
            .unwrap();

        let stored = service.fetch_appointments().await.unwrap().records;
        assert!(stored[0].completed);
        assert_eq!(stored[0].priority, Priority::Medium);
        assert_eq!(stored[0].date, day(1));
    }

    #[tokio::test]
    async fn test_missing_ids_are_not_found() {
        let service = SqliteDataService::in_memory().await.unwrap();
        let ghost = RecordId::new("nope");

        let update = service
            .update_appointment(&ghost, AppointmentPatch::completion(true))
            .await;
        assert!(matches!(update, Err(SyncError::NotFound { .. })));

        let delete = service.delete(Collection::Properties, &ghost).await;
        assert!(matches!(
            delete,
            Err(SyncError::NotFound {
                collection: Collection::Properties,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_malformed_rows_are_skipped() {
        let service = SqliteDataService::in_memory().await.unwrap();
        service
            .insert_property(NewProperty {
                title: "Casa".to_string(),
                address: "Rua A".to_string(),
                price: 250_000.0,
                listing_url: None,
                photo_url: None,
                category: Category::House,
            })
            .await
            .unwrap();

        sqlx::query(
            "INSERT INTO imoveis (id, titulo, endereco, valor, tipo) \
             VALUES ('x', 'Sítio', 'Estrada', 1, 'Sítio')",
        )
        .execute(service.pool())
        .await
        .unwrap();

        let outcome = service.fetch_properties().await.unwrap();
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.rejected.len(), 1);
        assert_eq!(outcome.rejected[0].id, "x");
    }

    #[tokio::test]
    async fn test_delete_announces_change() {
        let service = SqliteDataService::in_memory().await.unwrap();
        let id = service
            .insert_appointment(appointment("Visita", day(1), Priority::Low))
            .await
            .unwrap();
        let mut rx = service.subscribe();

        service.delete(Collection::Appointments, &id).await.unwrap();

        let event = rx.recv().await.unwrap();
        assert_eq!(event.action, ChangeAction::Delete);
        assert!(service.fetch_appointments().await.unwrap().records.is_empty());
    }
}
