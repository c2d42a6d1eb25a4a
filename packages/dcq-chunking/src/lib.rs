use unicode_segmentation::UnicodeSegmentation;

/// Greedy sentence-bounded chunking. A chunk is flushed once appending the
/// next sentence would push it past `max_chars`, so a chunk only exceeds the
/// budget when a single sentence does.
pub fn split_text(text: &str, max_chars: usize) -> Vec<String> {
	let mut chunks = Vec::new();
	let mut current = String::new();

	for (_, sentence) in text.split_sentence_bound_indices() {
		if !current.is_empty() && current.len() + sentence.len() > max_chars {
			push_trimmed(&mut chunks, &current);
			current.clear();
		}

		current.push_str(sentence);
	}

	push_trimmed(&mut chunks, &current);

	chunks
}

fn push_trimmed(chunks: &mut Vec<String>, candidate: &str) {
	let trimmed = candidate.trim();

	if !trimmed.is_empty() {
		chunks.push(trimmed.to_string());
	}
}
