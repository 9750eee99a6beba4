use time::{PrimitiveDateTime, macros::format_description};

/// Parses a stored upload timestamp.
///
/// Accepts the machine form `YYYY-MM-DDTHH:MM:SS` (a trailing `Z` is ignored) and the localized
/// form `YYYY年M月D日H時M分`.
pub fn parse_upload_date(raw: &str) -> Option<PrimitiveDateTime> {
	let trimmed = raw.trim().trim_end_matches('Z');

	if let Ok(parsed) = PrimitiveDateTime::parse(
		trimmed,
		format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
	) {
		return Some(parsed);
	}

	PrimitiveDateTime::parse(
		trimmed,
		format_description!(
			"[year]年[month padding:none]月[day padding:none]日[hour padding:none]時[minute padding:none]分"
		),
	)
	.ok()
}

/// Renders a timestamp in the localized display form, e.g. `2023年11月22日11時00分`.
pub fn format_upload_date(value: PrimitiveDateTime) -> Option<String> {
	value.format(format_description!("[year]年[month]月[day]日[hour]時[minute]分")).ok()
}

/// Parses and re-renders a stored timestamp in one step.
pub fn display_upload_date(raw: &str) -> Option<String> {
	parse_upload_date(raw).and_then(format_upload_date)
}
