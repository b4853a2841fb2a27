use rand::Rng;

/// Builds a cumulative distribution from a row of log-probabilities.
///
/// Each entry is exponentiated and accumulated. The running sum is capped at
/// 1.0 and the last entry is forced to exactly 1.0, so rounding drift can
/// never leave a uniform draw without a bucket.
pub fn log_to_cdf(log_row: &[f64]) -> Vec<f64> {
	let mut cdf = Vec::with_capacity(log_row.len());
	let mut acc = 0.0;
	for &log_p in log_row {
		acc = (acc + log_p.exp()).min(1.0);
		cdf.push(acc);
	}
	if let Some(last) = cdf.last_mut() {
		*last = 1.0;
	}
	cdf
}

/// Inverse-transform sampling over a cumulative distribution.
///
/// Draws `r` uniformly in `[0, 1)` and returns the smallest index whose
/// cumulative value is strictly greater than `r`, so index `i` is picked with
/// probability `cdf[i] - cdf[i - 1]`.
///
/// `cdf` must be non-empty and end at 1.0, as produced by [`log_to_cdf`].
pub fn draw_from<R: Rng + ?Sized>(cdf: &[f64], rng: &mut R) -> usize {
	let r: f64 = rng.random();
	bucket_of(cdf, r)
}

/// Index of the first cumulative value exceeding `r` (binary search).
#[inline]
fn bucket_of(cdf: &[f64], r: f64) -> usize {
	cdf.partition_point(|&c| c <= r).min(cdf.len().saturating_sub(1))
}
