use unicode_normalization::UnicodeNormalization;

/// Escape character declared in every `LIKE`/`ILIKE` clause built from a search term.
pub const LIKE_ESCAPE: char = '\\';

/// Folds a raw search term into its canonical form.
///
/// The term is trimmed and mapped through NFKC so that full-width and half-width forms, as well
/// as precomposed and combining sequences, compare equal. Returns `None` when nothing searchable
/// remains.
pub fn normalize_term(raw: &str) -> Option<String> {
	let normalized: String = raw.trim().nfkc().collect();
	let normalized = normalized.trim();

	if normalized.is_empty() {
		return None;
	}

	Some(normalized.to_string())
}

/// Escapes `LIKE` metacharacters so the term matches literally.
pub fn escape_like(term: &str) -> String {
	let mut out = String::with_capacity(term.len());

	for ch in term.chars() {
		if matches!(ch, '%' | '_' | LIKE_ESCAPE) {
			out.push(LIKE_ESCAPE);
		}

		out.push(ch);
	}

	out
}

/// Builds the `%term%` substring pattern for an already normalized term.
pub fn substring_pattern(term: &str) -> String {
	format!("%{}%", escape_like(term))
}
