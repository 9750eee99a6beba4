use sps_domain::{
	UNKNOWN_CHANNEL,
	feedback::{self, FeedbackInput, FeedbackRejectReason},
	level::{self, SkillLevel},
	media, term, upload_date,
};

fn input(message: &str) -> FeedbackInput {
	FeedbackInput {
		name: Some("  Coach  ".to_string()),
		email: Some("coach@example.com".to_string()),
		category: Some("bug".to_string()),
		message: Some(message.to_string()),
	}
}

#[test]
fn feedback_requires_a_message() {
	assert_eq!(
		feedback::sanitize_feedback(&input("   ")),
		Err(FeedbackRejectReason::MissingMessage)
	);
	assert_eq!(
		feedback::sanitize_feedback(&FeedbackInput::default()),
		Err(FeedbackRejectReason::MissingMessage)
	);
}

#[test]
fn feedback_fields_are_trimmed_and_whitelisted() {
	let mut raw = input("Great drills!");

	raw.category = Some("praise".to_string());
	raw.email = Some("not-an-address".to_string());

	let clean = feedback::sanitize_feedback(&raw).expect("Expected feedback to be accepted.");

	assert_eq!(clean.name, "Coach");
	assert_eq!(clean.category, feedback::DEFAULT_CATEGORY);
	assert_eq!(clean.email, "");
	assert_eq!(clean.message, "Great drills!");
}

#[test]
fn feedback_empty_category_stays_empty() {
	let mut raw = input("hello");

	raw.category = None;

	let clean = feedback::sanitize_feedback(&raw).expect("Expected feedback to be accepted.");

	assert_eq!(clean.category, "");
	assert_eq!(clean.email, "coach@example.com");
}

#[test]
fn feedback_is_truncated_by_characters() {
	let long = "パ".repeat(feedback::MAX_MESSAGE_CHARS + 10);
	let clean = feedback::sanitize_feedback(&input(&long)).expect("Expected feedback.");

	assert_eq!(clean.message.chars().count(), feedback::MAX_MESSAGE_CHARS);
}

#[test]
fn mixed_width_terms_share_one_pattern() {
	let half = term::normalize_term("ﾄﾞﾘﾌﾞﾙ").expect("term");
	let full = term::normalize_term("ドリブル").expect("term");

	assert_eq!(term::substring_pattern(&half), term::substring_pattern(&full));
}

#[test]
fn level_ranks_are_strictly_increasing() {
	let ranks: Vec<u8> = ["小学生以上", "中学生", "高校生", "ユース", "謎"]
		.into_iter()
		.map(|label| SkillLevel::from_label(label).rank())
		.collect();

	assert!(ranks.windows(2).all(|pair| pair[0] < pair[1]));
	assert_eq!(level::compare_labels("ユース", "謎"), std::cmp::Ordering::Less);
}

#[test]
fn row_level_helpers_compose() {
	assert_eq!(
		media::to_embed_url("https://www.youtube.com/watch?v=abc"),
		"https://www.youtube.com/embed/abc"
	);
	assert_eq!(
		upload_date::display_upload_date("2021-01-02T03:04:05").as_deref(),
		Some("2021年01月02日03時04分")
	);
	assert_eq!(UNKNOWN_CHANNEL, "Unknown Channel");
}
