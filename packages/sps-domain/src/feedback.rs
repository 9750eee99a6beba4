use serde::Deserialize;

pub const MAX_NAME_CHARS: usize = 100;
pub const MAX_EMAIL_CHARS: usize = 255;
pub const MAX_CATEGORY_CHARS: usize = 50;
pub const MAX_MESSAGE_CHARS: usize = 5_000;
pub const DEFAULT_CATEGORY: &str = "general";

const ALLOWED_CATEGORIES: [&str; 3] = ["general", "bug", "suggestion"];

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FeedbackRejectReason {
	MissingMessage,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct FeedbackInput {
	pub name: Option<String>,
	pub email: Option<String>,
	pub category: Option<String>,
	pub message: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Feedback {
	pub name: String,
	pub email: String,
	pub category: String,
	pub message: String,
}

/// Trims, truncates, and whitelists a feedback submission.
///
/// Only a missing message rejects the submission. An unknown category becomes
/// [`DEFAULT_CATEGORY`] and an email without `@` is cleared.
pub fn sanitize_feedback(input: &FeedbackInput) -> Result<Feedback, FeedbackRejectReason> {
	let name = clip(input.name.as_deref(), MAX_NAME_CHARS);
	let mut email = clip(input.email.as_deref(), MAX_EMAIL_CHARS);
	let mut category = clip(input.category.as_deref(), MAX_CATEGORY_CHARS);
	let message = clip(input.message.as_deref(), MAX_MESSAGE_CHARS);

	if message.is_empty() {
		return Err(FeedbackRejectReason::MissingMessage);
	}
	if !category.is_empty() && !ALLOWED_CATEGORIES.contains(&category.as_str()) {
		category = DEFAULT_CATEGORY.to_string();
	}
	if !email.is_empty() && !email.contains('@') {
		email.clear();
	}

	Ok(Feedback { name, email, category, message })
}

fn clip(raw: Option<&str>, max_chars: usize) -> String {
	raw.map(str::trim).unwrap_or_default().chars().take(max_chars).collect()
}
