use rand::Rng;

use super::generation_input::GenerationInput;
use super::parameters::Parameters;
use super::sample::Sample;
use super::sampling::{draw_from, log_to_cdf};

/// Cumulative distributions of every row of a parameter set.
///
/// Built once per `generate` call (or once per batch) from the log-space
/// parameters and dropped afterwards; never stored in the model.
///
/// # Invariants
/// - `transition.len() == emission.len() == start.len()`
/// - every row is non-decreasing and ends at exactly 1.0
pub(crate) struct SamplingTables {
	start: Vec<f64>,
	transition: Vec<Vec<f64>>,
	emission: Vec<Vec<f64>>,
}

impl SamplingTables {
	pub(crate) fn new(parameters: &Parameters) -> Self {
		let cdf = |row: &[f64]| log_to_cdf(&parameters.log_row(row));
		Self {
			start: cdf(parameters.start()),
			transition: parameters.transition().iter().map(|row| cdf(row.as_slice())).collect(),
			emission: parameters.emission().iter().map(|row| cdf(row.as_slice())).collect(),
		}
	}

	/// Ancestral sampling of one trajectory of `length` steps.
	///
	/// - `states[0]` is drawn from the start distribution
	/// - `states[t]` is drawn from the transition row of `states[t - 1]`
	/// - `observations[t]` is drawn from the emission row of `states[t]`
	///
	/// A zero length yields an empty sample.
	pub(crate) fn generate<R: Rng + ?Sized>(&self, length: usize, rng: &mut R) -> Sample {
		let mut sample = Sample::with_capacity(length);
		if length == 0 {
			return sample;
		}

		let mut state = draw_from(&self.start, rng);
		sample.push(draw_from(&self.emission[state], rng), state);

		for _ in 1..length {
			state = draw_from(&self.transition[state], rng);
			sample.push(draw_from(&self.emission[state], rng), state);
		}

		sample
	}

	/// Draws `input.size` independent samples with random lengths.
	pub(crate) fn generate_batch<R: Rng + ?Sized>(
		&self,
		input: &GenerationInput,
		rng: &mut R,
	) -> Vec<Sample> {
		log::debug!(
			"generating {} samples, length in [{}, {})",
			input.size,
			input.min_length(),
			input.max_length()
		);

		(0..input.size)
			.map(|_| {
				let length = input.draw_length(rng);
				self.generate(length, rng)
			})
			.collect()
	}
}
