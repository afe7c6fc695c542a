use crate::types::SimilarityResult;

/// Compute cosine similarity between two f32 vectors.
/// Returns 0.0 for zero-magnitude vectors or dimension mismatches.
/// Result clamped to [0.0, 1.0]; TF-IDF weights are never negative.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
	if a.len() != b.len() || a.is_empty() {
		return 0.0;
	}

	let mut dot: f64 = 0.0;
	let mut norm_a: f64 = 0.0;
	let mut norm_b: f64 = 0.0;

	for (&x, &y) in a.iter().zip(b) {
		let ai = x as f64;
		let bi = y as f64;
		dot += ai * bi;
		norm_a += ai * ai;
		norm_b += bi * bi;
	}

	let denom = norm_a.sqrt() * norm_b.sqrt();
	if denom == 0.0 {
		return 0.0;
	}

	let result = dot / denom;
	if !result.is_finite() {
		return 0.0;
	}
	result.clamp(0.0, 1.0)
}

/// Score `query` against every corpus vector and sort by descending score.
///
/// The sort is stable: equal scores keep corpus insertion order.
///
/// # Panics
///
/// If `corpus` and `titles` differ in length.
pub fn rank<S: AsRef<str>>(
	query: &[f32],
	corpus: &[Vec<f32>],
	titles: &[S],
) -> Vec<SimilarityResult> {
	assert_eq!(
		corpus.len(),
		titles.len(),
		"rank: {} corpus vectors but {} titles",
		corpus.len(),
		titles.len()
	);

	let mut results: Vec<SimilarityResult> = corpus
		.iter()
		.zip(titles)
		.map(|(vector, title)| SimilarityResult {
			title: title.as_ref().to_string(),
			score: cosine_similarity(query, vector),
		})
		.collect();

	results.sort_by(|a, b| {
		b.score
			.partial_cmp(&a.score)
			.unwrap_or(std::cmp::Ordering::Equal)
	});
	results
}
