pub mod counts;
pub mod feedback;
pub mod level;
pub mod media;
pub mod term;
pub mod upload_date;

/// Display name used when a content row has no resolvable channel.
pub const UNKNOWN_CHANNEL: &str = "Unknown Channel";
