use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::types::Json;
use sqlx::{ConnectOptions, FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::core::config::Settings;
use crate::db::{Document, DocumentStore, Filter, StoreError};

/// Documents kept as JSONB rows in a single `documents` table.
#[derive(Debug, Clone)]
pub(crate) struct PostgresStore {
    pool: PgPool,
}

#[derive(Debug, FromRow)]
struct DocumentRow {
    id: String,
    fields: Json<Map<String, Value>>,
    created_at: OffsetDateTime,
}

impl From<DocumentRow> for Document {
    fn from(row: DocumentRow) -> Self {
        Self { id: row.id, created_at: Some(row.created_at), fields: row.fields.0 }
    }
}

impl PostgresStore {
    pub(crate) async fn connect(settings: &Settings) -> Result<Self, sqlx::Error> {
        let database_url = settings.database().database_url();
        let mut connect_options: PgConnectOptions = database_url.parse()?;

        connect_options = connect_options
            .application_name("examflow-api")
            .log_statements(tracing::log::LevelFilter::Off);

        let pool = PgPoolOptions::new()
            .max_connections(20)
            .min_connections(1)
            .acquire_timeout(Duration::from_secs(30))
            .test_before_acquire(true)
            .connect_with(connect_options)
            .await?;

        Ok(Self { pool })
    }

    pub(crate) async fn run_migrations(&self) -> Result<(), sqlx::Error> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for PostgresStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn insert(&self, class: &str, fields: Map<String, Value>) -> Result<String, StoreError> {
        let id = Uuid::new_v4().simple().to_string();
        sqlx::query("INSERT INTO documents (id, class, fields) VALUES ($1, $2, $3)")
            .bind(&id)
            .bind(class)
            .bind(Json(fields))
            .execute(&self.pool)
            .await?;
        Ok(id)
    }

    async fn get(&self, class: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let row = sqlx::query_as::<_, DocumentRow>(
            "SELECT id, fields, created_at FROM documents WHERE class = $1 AND id = $2",
        )
        .bind(class)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Document::from))
    }

    async fn find_first(
        &self,
        class: &str,
        filter: &Filter,
    ) -> Result<Option<Document>, StoreError> {
        // Containment on scalar values is exact match per field.
        let row = sqlx::query_as::<_, DocumentRow>(
            "SELECT id, fields, created_at FROM documents \
             WHERE class = $1 AND fields @> $2 \
             ORDER BY seq ASC LIMIT 1",
        )
        .bind(class)
        .bind(Json(filter.to_json()))
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Document::from))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
