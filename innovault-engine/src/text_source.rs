//! Plain-text extraction from uploaded document bytes.

/// Supplies the plain text of a document. Extraction never fails as a whole:
/// unreadable parts are dropped and whatever text remains is returned.
pub trait TextSource {
	fn extract(&self, raw: &[u8]) -> String;
}

/// Concatenate page texts, each followed by a newline. Pages that failed to
/// extract or produced no text are skipped.
pub fn join_pages<I, E>(pages: I) -> String
where
	I: IntoIterator<Item = Result<String, E>>,
	E: std::fmt::Display,
{
	let mut text = String::new();
	for (page, result) in pages.into_iter().enumerate() {
		match result {
			Ok(content) if !content.is_empty() => {
				text.push_str(&content);
				text.push('\n');
			}
			Ok(_) => {}
			Err(e) => tracing::warn!(page, "Skipping page that failed to extract: {}", e),
		}
	}
	text
}

/// Treats the upload as a single UTF-8 page. Invalid sequences are replaced.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextSource;

impl TextSource for PlainTextSource {
	fn extract(&self, raw: &[u8]) -> String {
		let page: Result<String, std::convert::Infallible> =
			Ok(String::from_utf8_lossy(raw).into_owned());
		join_pages([page])
	}
}
