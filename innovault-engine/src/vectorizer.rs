// ---------------------------------------------------------------------------
// VectorSpaceModel: TF-IDF vectors over a transient batch
// ---------------------------------------------------------------------------
//
// The batch is `[query] ++ corpus`. Vocabulary, document frequencies and IDF
// weights are rebuilt on every call; nothing is retained between queries.
//
//   tf(t, d)  = raw count of t in d
//   idf(t)    = ln((1 + n) / (1 + df(t))) + 1
//   w(t, d)   = tf * idf, then L2-normalised per document
//
// Dimensions follow the sorted vocabulary so output is deterministic.
// ---------------------------------------------------------------------------

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::error::VaultError;
use crate::tokenizer::tokenize;

/// Per-document term counts.
type TermCounts = HashMap<String, usize>;

fn term_counts(text: &str) -> TermCounts {
	let mut counts = HashMap::new();
	for token in tokenize(text) {
		*counts.entry(token).or_insert(0) += 1;
	}
	counts
}

/// Sorted term -> dimension index mapping.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
	index: BTreeMap<String, usize>,
}

impl Vocabulary {
	fn from_counts(docs: &[TermCounts]) -> Self {
		let terms: BTreeSet<&String> = docs.iter().flat_map(|d| d.keys()).collect();
		let index = terms
			.into_iter()
			.enumerate()
			.map(|(i, t)| (t.clone(), i))
			.collect();
		Self { index }
	}

	pub fn len(&self) -> usize {
		self.index.len()
	}

	pub fn is_empty(&self) -> bool {
		self.index.is_empty()
	}

	pub fn get(&self, term: &str) -> Option<usize> {
		self.index.get(term).copied()
	}
}

/// Smoothed inverse document frequency per vocabulary dimension.
///
/// Fails with [`VaultError::DegenerateInput`] for batches of fewer than two
/// documents, where every term would receive the same weight.
fn fit_idf(docs: &[TermCounts], vocab: &Vocabulary) -> Result<Vec<f64>, VaultError> {
	if docs.len() < 2 {
		return Err(VaultError::DegenerateInput(docs.len()));
	}

	let mut df = vec![0usize; vocab.len()];
	for doc in docs {
		for term in doc.keys() {
			if let Some(dim) = vocab.get(term) {
				df[dim] += 1;
			}
		}
	}

	let n = docs.len() as f64;
	Ok(df
		.into_iter()
		.map(|d| ((1.0 + n) / (1.0 + d as f64)).ln() + 1.0)
		.collect())
}

fn weigh(doc: &TermCounts, vocab: &Vocabulary, idf: Option<&[f64]>) -> Vec<f32> {
	let mut weights = vec![0.0f64; vocab.len()];
	for (term, &count) in doc {
		if let Some(dim) = vocab.get(term) {
			let factor = idf.map_or(1.0, |w| w[dim]);
			weights[dim] = count as f64 * factor;
		}
	}

	let norm = weights.iter().map(|w| w * w).sum::<f64>().sqrt();
	if norm > 0.0 {
		for w in &mut weights {
			*w /= norm;
		}
	}
	weights.into_iter().map(|w| w as f32).collect()
}

/// Output of one vectorization call. All vectors share `dimensions`.
#[derive(Debug, Clone)]
pub struct Vectorized {
	pub query: Vec<f32>,
	pub corpus: Vec<Vec<f32>>,
	pub dimensions: usize,
}

/// Stateless TF-IDF model.
#[derive(Debug, Clone, Copy, Default)]
pub struct VectorSpaceModel;

impl VectorSpaceModel {
	pub fn new() -> Self {
		Self
	}

	/// Vectorize `query` together with `corpus`.
	///
	/// With an empty corpus there is nothing to weigh against: the query comes
	/// back as a normalised term-frequency vector and `corpus` is empty.
	pub fn vectorize<S: AsRef<str>>(
		&self,
		corpus: &[S],
		query: &str,
	) -> Result<Vectorized, VaultError> {
		if corpus.is_empty() {
			let doc = term_counts(query);
			let vocab = Vocabulary::from_counts(std::slice::from_ref(&doc));
			return Ok(Vectorized {
				query: weigh(&doc, &vocab, None),
				corpus: Vec::new(),
				dimensions: vocab.len(),
			});
		}

		if query.trim().is_empty() {
			return Err(VaultError::validation(
				"query text is empty but the corpus is not",
			));
		}

		let mut docs = Vec::with_capacity(corpus.len() + 1);
		docs.push(term_counts(query));
		docs.extend(corpus.iter().map(|t| term_counts(t.as_ref())));

		let vocab = Vocabulary::from_counts(&docs);
		let idf = fit_idf(&docs, &vocab)?;

		let mut vectors = docs.iter().map(|d| weigh(d, &vocab, Some(idf.as_slice())));
		let query = vectors.next().unwrap_or_default();
		let corpus: Vec<Vec<f32>> = vectors.collect();

		tracing::debug!(
			documents = docs.len(),
			dimensions = vocab.len(),
			"vectorized batch"
		);

		Ok(Vectorized {
			query,
			corpus,
			dimensions: vocab.len(),
		})
	}
}
