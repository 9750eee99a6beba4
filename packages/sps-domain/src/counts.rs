use std::fmt::{Display, Formatter};

/// Placeholder the ingestion producer writes when a counter is hidden.
pub const UNAVAILABLE: &str = "N/A";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvalidCount {
	pub raw: String,
}
impl Display for InvalidCount {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "invalid count value {:?}", self.raw)
	}
}

/// Parses a like/view counter supplied by the producer.
///
/// Missing and `N/A` values are `Ok(None)`. Anything that is not a non-negative integer is an
/// error; callers store it as `NULL` after logging.
pub fn parse_count(raw: Option<&str>) -> Result<Option<i32>, InvalidCount> {
	let Some(raw) = raw else {
		return Ok(None);
	};
	let trimmed = raw.trim();

	if trimmed.is_empty() || trimmed == UNAVAILABLE {
		return Ok(None);
	}

	match trimmed.parse::<i32>() {
		Ok(value) if value >= 0 => Ok(Some(value)),
		_ => Err(InvalidCount { raw: raw.to_string() }),
	}
}
