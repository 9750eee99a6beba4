use serde::Serialize;

use crate::{SearchService, ServiceError, ServiceResult};
use sps_domain::feedback::{self, FeedbackRejectReason};
use sps_storage::ingest;

pub use sps_domain::feedback::FeedbackInput as FeedbackRequest;

#[derive(Debug, Clone, Serialize)]
pub struct FeedbackResponse {
	pub message: String,
}

impl SearchService {
	pub async fn submit_feedback(&self, req: FeedbackRequest) -> ServiceResult<FeedbackResponse> {
		let entry = feedback::sanitize_feedback(&req).map_err(|reason| match reason {
			FeedbackRejectReason::MissingMessage =>
				ServiceError::InvalidRequest { message: "Message is required.".to_string() },
		})?;
		let id = ingest::insert_feedback(&self.db.pool, &entry).await?;

		tracing::info!(id, category = %entry.category, "Feedback stored.");

		Ok(FeedbackResponse { message: "Feedback submitted successfully.".to_string() })
	}
}
