use serde::{Deserialize, Serialize};

/// One fully labeled trajectory: an observation sequence and the hidden
/// states that produced it.
///
/// Produced by the generator and consumed by the estimator. Both vectors are
/// expected to have the same length; `train` rejects samples where they don't.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Sample {
	/// Symbol indices in `[0, num_symbols)`.
	pub observations: Vec<usize>,
	/// State indices in `[0, num_states)`.
	pub states: Vec<usize>,
}

impl Sample {
	pub fn new(observations: Vec<usize>, states: Vec<usize>) -> Self {
		Self { observations, states }
	}

	/// Creates an empty sample with room for `length` steps.
	pub(crate) fn with_capacity(length: usize) -> Self {
		Self {
			observations: Vec::with_capacity(length),
			states: Vec::with_capacity(length),
		}
	}

	/// Number of time steps (length of the observation sequence).
	pub fn len(&self) -> usize {
		self.observations.len()
	}

	pub fn is_empty(&self) -> bool {
		self.observations.is_empty()
	}

	/// True when observations and states line up one to one.
	pub fn is_aligned(&self) -> bool {
		self.observations.len() == self.states.len()
	}

	/// Appends one `(observation, state)` step.
	pub(crate) fn push(&mut self, observation: usize, state: usize) {
		self.observations.push(observation);
		self.states.push(state);
	}
}
