use rand::Rng;

use crate::error::{HmmError, Result};

/// Parameters for batch generation.
///
/// `GenerationInput` describes how many samples to draw and the range their
/// lengths are drawn from.
///
/// # Invariants
/// - `min_length <= max_length`
/// - lengths are drawn uniformly in `[min_length, max_length)`; when both
///   bounds are equal every sample has length `min_length`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerationInput {
	/// Shortest sample length (inclusive).
	min_length: usize,

	/// Upper length bound (exclusive, unless equal to `min_length`).
	max_length: usize,

	/// Number of samples to generate.
	pub size: usize,
}

impl GenerationInput {
	/// Creates a validated generation input.
	///
	/// # Errors
	/// Returns an error if `min_length > max_length`.
	pub fn new(min_length: usize, max_length: usize, size: usize) -> Result<Self> {
		Self::check_bounds(min_length, max_length)?;
		Ok(Self { min_length, max_length, size })
	}

	fn check_bounds(min_length: usize, max_length: usize) -> Result<()> {
		if min_length > max_length {
			return Err(HmmError::InvalidInput(format!(
				"min_length ({}) must not exceed max_length ({})",
				min_length, max_length
			)));
		}
		Ok(())
	}

	pub fn min_length(&self) -> usize {
		self.min_length
	}

	pub fn max_length(&self) -> usize {
		self.max_length
	}

	/// Sets both length bounds at once.
	///
	/// # Errors
	/// Returns an error if `min_length > max_length`; the input is left unchanged.
	pub fn set_lengths(&mut self, min_length: usize, max_length: usize) -> Result<()> {
		Self::check_bounds(min_length, max_length)?;
		self.min_length = min_length;
		self.max_length = max_length;
		Ok(())
	}

	/// True when every generated sample has the same length.
	pub(crate) fn is_fixed_length(&self) -> bool {
		self.min_length == self.max_length
	}

	/// Draws one sample length in `[min_length, max_length)`.
	pub fn draw_length<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
		if self.is_fixed_length() {
			self.min_length
		} else {
			rng.random_range(self.min_length..self.max_length)
		}
	}
}
