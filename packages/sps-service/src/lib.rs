pub mod admin;
pub mod facets;
pub mod feedback;
pub mod normalize;
pub mod query;
pub mod search;

mod error;

pub use admin::AdminReport;
pub use error::{Error as ServiceError, Result as ServiceResult};
pub use facets::{ChannelItem, LevelItem};
pub use feedback::{FeedbackRequest, FeedbackResponse};
pub use search::{ActivityItem, SearchRequest, SearchResponse};

use sps_config::Config;
use sps_storage::db::Db;

/// Search, listing, feedback, and admin operations over one shared pool.
pub struct SearchService {
	pub cfg: Config,
	pub db: Db,
}
impl SearchService {
	pub fn new(cfg: Config, db: Db) -> Self {
		Self { cfg, db }
	}
}
