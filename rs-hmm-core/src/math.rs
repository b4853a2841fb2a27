/// Sums a slice of reals.
pub fn sum(values: &[f64]) -> f64 {
	values.iter().sum()
}

/// Sums a slice of occurrence counts.
pub fn sum_counts(values: &[u64]) -> u64 {
	values.iter().sum()
}

/// Turns a row of occurrence counts into a probability distribution.
///
/// A row with a zero total carries no evidence at all; it becomes the
/// uniform distribution instead of a row of NaN.
pub fn normalize_counts(counts: &[u64]) -> Vec<f64> {
	let total = sum_counts(counts);
	if total == 0 {
		if counts.is_empty() {
			return Vec::new();
		}
		log::warn!("zero-total row of width {}, using uniform distribution", counts.len());
		let uniform = 1.0 / counts.len() as f64;
		return vec![uniform; counts.len()];
	}

	let total = total as f64;
	counts.iter().map(|&c| c as f64 / total).collect()
}
