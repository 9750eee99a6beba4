use std::{str::FromStr, time::Duration};

use sqlx::{
	PgPool,
	postgres::{PgConnectOptions, PgPoolOptions},
};

use crate::{Result, schema};

const SCHEMA_LOCK_ID: i64 = 5_170_322;

pub struct Db {
	pub pool: PgPool,
}
impl Db {
	pub async fn connect(cfg: &sps_config::Postgres) -> Result<Self> {
		let pool = pool_options(cfg).connect_with(connect_options(cfg)?).await?;

		Ok(Self { pool })
	}

	/// Builds the pool without opening a connection. Failures surface on first acquire.
	pub fn connect_lazy(cfg: &sps_config::Postgres) -> Result<Self> {
		let pool = pool_options(cfg).connect_lazy_with(connect_options(cfg)?);

		Ok(Self { pool })
	}

	pub async fn ensure_schema(&self) -> Result<()> {
		let sql = schema::render_schema();
		// Advisory locks are held per connection. Use a single transaction so the lock is scoped to
		// one connection and automatically released when the transaction ends.
		let mut tx = self.pool.begin().await?;

		sqlx::query("SELECT pg_advisory_xact_lock($1)")
			.bind(SCHEMA_LOCK_ID)
			.execute(&mut *tx)
			.await?;

		for statement in schema::statements(&sql) {
			sqlx::query(statement).execute(&mut *tx).await?;
		}

		tx.commit().await?;

		tracing::info!(tables = schema::TABLES.len(), "Schema ensured.");

		Ok(())
	}

	/// Drops every search table. Destructive; callers gate this behind an admin surface.
	pub async fn reset(&self) -> Result<()> {
		let sql = schema::render_drop();
		let mut tx = self.pool.begin().await?;

		sqlx::query("SELECT pg_advisory_xact_lock($1)")
			.bind(SCHEMA_LOCK_ID)
			.execute(&mut *tx)
			.await?;

		for statement in schema::statements(&sql) {
			sqlx::query(statement).execute(&mut *tx).await?;
		}

		tx.commit().await?;

		tracing::warn!("All search tables dropped.");

		Ok(())
	}
}

fn pool_options(cfg: &sps_config::Postgres) -> PgPoolOptions {
	PgPoolOptions::new()
		.max_connections(cfg.pool_max_conns)
		.acquire_timeout(Duration::from_millis(cfg.acquire_timeout_ms))
}

fn connect_options(cfg: &sps_config::Postgres) -> Result<PgConnectOptions> {
	let options = PgConnectOptions::from_str(&cfg.dsn)?;

	Ok(options.options([("statement_timeout", cfg.statement_timeout_ms.to_string())]))
}
