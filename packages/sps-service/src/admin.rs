use serde::Serialize;

use crate::{SearchService, ServiceResult};
use sps_storage::{
	indexes::{self, IndexReport},
	stats::{self, StatsReport},
};

#[derive(Debug, Clone, Serialize)]
pub struct AdminReport {
	pub message: String,
}

impl SearchService {
	pub async fn init_schema(&self) -> ServiceResult<AdminReport> {
		self.db.ensure_schema().await?;

		Ok(AdminReport { message: "Database initialized.".to_string() })
	}

	pub async fn reset(&self) -> ServiceResult<AdminReport> {
		self.db.reset().await?;

		Ok(AdminReport { message: "All tables dropped.".to_string() })
	}

	pub async fn create_indexes(&self) -> ServiceResult<IndexReport> {
		let report = indexes::create_indexes(&self.db).await?;

		tracing::info!(
			created = report.created(),
			skipped = report.skipped(),
			failed = report.failed(),
			trigram = report.trigram_available,
			"Index batch finished."
		);

		Ok(report)
	}

	pub async fn stats(&self) -> ServiceResult<StatsReport> {
		Ok(stats::table_counts(&self.db).await?)
	}
}
