use std::borrow::Cow;

const WATCH_MARKER: &str = "watch?v=";
const EMBED_BASE: &str = "https://www.youtube.com/embed/";

/// Rewrites a "watch" playback link into its embeddable form.
///
/// The video id is everything after the last `watch?v=`. Other URL shapes pass through
/// unchanged.
pub fn to_embed_url(url: &str) -> Cow<'_, str> {
	match url.rsplit_once(WATCH_MARKER) {
		Some((_, video_id)) => Cow::Owned(format!("{EMBED_BASE}{video_id}")),
		None => Cow::Borrowed(url),
	}
}
