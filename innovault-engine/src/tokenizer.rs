// ---------------------------------------------------------------------------
// Tokenizer
// ---------------------------------------------------------------------------
//
// Lower-cases text and keeps every maximal run of alphanumeric characters
// that is at least two characters long. No stemming, no stopword removal.
// Similarity scores depend on this exact contract.
// ---------------------------------------------------------------------------

use regex::Regex;

/// Word characters minus the underscore, two or more in a row.
const TOKEN_PATTERN: &str = r"[^\W_]{2,}";

thread_local! {
	static TOKEN_RE: Regex = Regex::new(TOKEN_PATTERN).expect("token pattern is a valid regex");
}

/// Split `text` into lower-cased tokens in document order.
pub fn tokenize(text: &str) -> Vec<String> {
	let lower = text.to_lowercase();
	TOKEN_RE.with(|re| {
		re.find_iter(&lower)
			.map(|m| m.as_str().to_string())
			.collect()
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn lowercases_and_splits_on_punctuation() {
		assert_eq!(
			tokenize("The Quick-Brown fox!"),
			vec!["the", "quick", "brown", "fox"]
		);
	}

	#[test]
	fn drops_single_character_tokens() {
		assert_eq!(tokenize("a b cd e fg"), vec!["cd", "fg"]);
	}

	#[test]
	fn underscore_is_a_separator() {
		assert_eq!(tokenize("snake_case_x"), vec!["snake", "case"]);
	}

	#[test]
	fn keeps_digits_and_repeats() {
		assert_eq!(tokenize("R2 d2 r2"), vec!["r2", "d2", "r2"]);
	}

	#[test]
	fn unicode_letters_are_tokens() {
		assert_eq!(tokenize("Über café"), vec!["über", "café"]);
	}

	#[test]
	fn empty_and_symbol_only_text() {
		assert!(tokenize("").is_empty());
		assert!(tokenize("!! -- ?").is_empty());
	}
}
