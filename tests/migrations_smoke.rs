use sqlx::Row;

fn database_url() -> Option<String> {
    dotenvy::dotenv().ok();

    std::env::var("DATABASE_URL").ok().filter(|url| !url.trim().is_empty())
}

#[tokio::test]
async fn migrations_apply_and_documents_table_exists() -> anyhow::Result<()> {
    let Some(database_url) = database_url() else {
        eprintln!("DATABASE_URL is not set; skipping Postgres migration smoke test");
        return Ok(());
    };

    let pool =
        sqlx::postgres::PgPoolOptions::new().max_connections(1).connect(&database_url).await?;

    let migrations_dir =
        std::env::var("EXAMFLOW_MIGRATIONS_DIR").unwrap_or_else(|_| "migrations".to_string());
    let migrator = sqlx::migrate::Migrator::new(std::path::Path::new(&migrations_dir)).await?;
    migrator.run(&pool).await?;

    let row =
        sqlx::query("SELECT to_regclass($1)::text").bind("documents").fetch_one(&pool).await?;
    let regclass: Option<String> = row.try_get(0)?;
    assert!(regclass.is_some(), "expected table documents to exist after migrations");

    let id = format!("smoke{}", std::process::id());
    sqlx::query("INSERT INTO documents (id, class, fields) VALUES ($1, 'SmokeTest', $2)")
        .bind(&id)
        .bind(serde_json::json!({"registrationNumber": "SMOKE-1", "status": "active"}))
        .execute(&pool)
        .await?;

    let found: Option<String> = sqlx::query_scalar(
        "SELECT id FROM documents WHERE class = 'SmokeTest' AND fields @> $1 ORDER BY seq LIMIT 1",
    )
    .bind(serde_json::json!({"registrationNumber": "SMOKE-1"}))
    .fetch_optional(&pool)
    .await?;
    assert!(found.is_some(), "containment query should match the inserted document");

    sqlx::query("DELETE FROM documents WHERE class = 'SmokeTest'").execute(&pool).await?;

    Ok(())
}
