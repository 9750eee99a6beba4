use std::cmp::Ordering;

/// Skill levels assigned by classification, in ascending order.
///
/// Unrecognized labels land in [`SkillLevel::Other`], which always sorts last.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SkillLevel {
	Elementary,
	MiddleSchool,
	HighSchool,
	Youth,
	Other,
}
impl SkillLevel {
	pub fn from_label(label: &str) -> Self {
		match label.trim() {
			"小学生以上" => Self::Elementary,
			"中学生" => Self::MiddleSchool,
			"高校生" => Self::HighSchool,
			"ユース" => Self::Youth,
			_ => Self::Other,
		}
	}

	pub fn rank(self) -> u8 {
		match self {
			Self::Elementary => 1,
			Self::MiddleSchool => 2,
			Self::HighSchool => 3,
			Self::Youth => 4,
			Self::Other => 5,
		}
	}
}

/// Orders level labels by rank, then lexically within a rank.
pub fn compare_labels(a: &str, b: &str) -> Ordering {
	SkillLevel::from_label(a).rank().cmp(&SkillLevel::from_label(b).rank()).then_with(|| a.cmp(b))
}

pub fn sort_labels(labels: &mut [String]) {
	labels.sort_by(|a, b| compare_labels(a, b));
}

#[cfg(test)]
mod tests {
	use super::{SkillLevel, sort_labels};

	#[test]
	fn stored_labels_map_to_their_levels() {
		assert_eq!(SkillLevel::from_label("小学生以上"), SkillLevel::Elementary);
		assert_eq!(SkillLevel::from_label(" 中学生 "), SkillLevel::MiddleSchool);
		assert_eq!(SkillLevel::from_label("高校生"), SkillLevel::HighSchool);
		assert_eq!(SkillLevel::from_label("ユース"), SkillLevel::Youth);
		assert_eq!(SkillLevel::from_label("社会人"), SkillLevel::Other);
	}

	#[test]
	fn unknown_labels_sort_last_and_lexically() {
		let mut labels = vec![
			"社会人".to_string(),
			"ユース".to_string(),
			"中学生".to_string(),
			"Adult".to_string(),
			"小学生以上".to_string(),
			"高校生".to_string(),
		];

		sort_labels(&mut labels);

		assert_eq!(
			labels,
			vec!["小学生以上", "中学生", "高校生", "ユース", "Adult", "社会人"]
		);
	}
}
