//! Cosine-similarity top-k ranking over the in-memory corpus. Pure
//! functions, no I/O.

use crate::{Error, Result, VectorStoreEntry};

/// Returns the `min(top_k, entries.len())` best-matching chunks, descending
/// by cosine score. The sort is stable, so equal scores keep insertion
/// order and results are deterministic across runs. Zero-norm vectors score
/// negative infinity and sort last instead of producing NaN.
pub fn rank<'a>(
	query: &[f32],
	entries: &'a [VectorStoreEntry],
	top_k: usize,
) -> Result<Vec<&'a str>> {
	let mut scored = Vec::with_capacity(entries.len());

	for entry in entries {
		if entry.embedding.len() != query.len() {
			return Err(Error::DimensionMismatch {
				expected: query.len(),
				actual: entry.embedding.len(),
			});
		}

		scored.push((entry.chunk.as_str(), cosine_similarity(query, &entry.embedding)));
	}

	scored.sort_by(|a, b| b.1.total_cmp(&a.1));
	scored.truncate(top_k);

	Ok(scored.into_iter().map(|(chunk, _)| chunk).collect())
}

/// dot(a, b) / (‖a‖ · ‖b‖), accumulated in f64. Negative infinity when
/// either vector has zero norm.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
	let mut dot = 0.0_f64;
	let mut norm_a = 0.0_f64;
	let mut norm_b = 0.0_f64;

	for (x, y) in a.iter().zip(b) {
		let x = f64::from(*x);
		let y = f64::from(*y);

		dot += x * y;
		norm_a += x * x;
		norm_b += y * y;
	}

	if norm_a == 0.0 || norm_b == 0.0 {
		return f64::NEG_INFINITY;
	}

	dot / (norm_a.sqrt() * norm_b.sqrt())
}

#[cfg(test)]
mod tests {
	use super::*;

	fn entry(chunk: &str, embedding: Vec<f32>) -> VectorStoreEntry {
		VectorStoreEntry { chunk: chunk.to_string(), embedding }
	}

	#[test]
	fn self_similarity_is_one() {
		let v = [0.3_f32, -1.2, 4.5, 0.01];
		let score = cosine_similarity(&v, &v);

		assert!((score - 1.0).abs() < 1e-9);
	}

	#[test]
	fn zero_vector_scores_negative_infinity() {
		assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]), f64::NEG_INFINITY);
	}

	#[test]
	fn returns_at_most_top_k_chunks() {
		let entries = vec![
			entry("a", vec![1.0, 0.0]),
			entry("b", vec![0.0, 1.0]),
			entry("c", vec![1.0, 1.0]),
		];
		let ranked = rank(&[1.0, 0.0], &entries, 2).expect("Ranking must succeed.");

		assert_eq!(ranked.len(), 2);
		assert_eq!(ranked[0], "a");
	}

	#[test]
	fn top_k_larger_than_store_returns_everything() {
		let entries = vec![entry("a", vec![1.0]), entry("b", vec![-1.0])];
		let ranked = rank(&[1.0], &entries, 10).expect("Ranking must succeed.");

		assert_eq!(ranked, vec!["a", "b"]);
	}

	#[test]
	fn scores_are_non_increasing() {
		let entries = vec![
			entry("orthogonal", vec![0.0, 1.0]),
			entry("aligned", vec![2.0, 0.0]),
			entry("opposed", vec![-1.0, 0.0]),
		];
		let query = [1.0_f32, 0.0];
		let ranked = rank(&query, &entries, 3).expect("Ranking must succeed.");
		let scores: Vec<f64> = ranked
			.iter()
			.map(|chunk| {
				let found = entries.iter().find(|e| e.chunk == *chunk).unwrap();

				cosine_similarity(&query, &found.embedding)
			})
			.collect();

		assert!(scores.windows(2).all(|pair| pair[0] >= pair[1]));
		assert_eq!(ranked[0], "aligned");
	}

	#[test]
	fn ties_keep_insertion_order() {
		let entries = vec![
			entry("first", vec![1.0, 0.0]),
			entry("second", vec![2.0, 0.0]),
			entry("third", vec![0.0, 1.0]),
		];
		// "first" and "second" are colinear with the query and tie at 1.0.
		let ranked = rank(&[1.0, 0.0], &entries, 3).expect("Ranking must succeed.");

		assert_eq!(ranked, vec!["first", "second", "third"]);
	}

	#[test]
	fn zero_norm_entries_sort_last() {
		let entries = vec![entry("dead", vec![0.0, 0.0]), entry("live", vec![0.0, 1.0])];
		let ranked = rank(&[0.0, 1.0], &entries, 2).expect("Ranking must succeed.");

		assert_eq!(ranked, vec!["live", "dead"]);
	}

	#[test]
	fn dimension_mismatch_is_an_error() {
		let entries = vec![entry("a", vec![1.0, 2.0, 3.0])];
		let err = rank(&[1.0, 2.0], &entries, 1).expect_err("Mismatch must fail.");

		assert!(matches!(err, Error::DimensionMismatch { expected: 2, actual: 3 }));
	}

	#[test]
	fn ranking_is_deterministic() {
		let entries: Vec<VectorStoreEntry> = (0..32)
			.map(|i| entry(&format!("chunk-{i}"), vec![(i % 7) as f32, (i % 3) as f32]))
			.collect();
		let query = [1.0_f32, 0.5];
		let first = rank(&query, &entries, 8).expect("Ranking must succeed.");
		let second = rank(&query, &entries, 8).expect("Ranking must succeed.");

		assert_eq!(first, second);
	}
}
