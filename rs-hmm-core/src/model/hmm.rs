use std::path::Path;

use rand::Rng;

use crate::error::{HmmError, Result};
use crate::io;

use super::estimator;
use super::generation_input::GenerationInput;
use super::generator::SamplingTables;
use super::parameters::{Mode, Parameters};
use super::sample::Sample;
use super::viterbi;

/// Generation and decoding, the part of an HMM that depends on its order.
///
/// Parameter storage, estimation and comparison are shared; an
/// implementation only supplies how a chain is walked forward and decoded.
pub trait Sequencer {
	/// Samples one labeled trajectory of `length` steps.
	///
	/// # Errors
	/// Returns `Untrained` if the model has no parameters.
	fn generate<R: Rng + ?Sized>(&self, length: usize, rng: &mut R) -> Result<Sample>;

	/// Writes the most likely state path for `observations` into
	/// `out_states` and returns its log-probability.
	///
	/// # Errors
	/// - `Untrained` if the model has no parameters
	/// - `InvalidInput` if the two slices differ in length
	/// - `SymbolOutOfRange` for an unknown observation symbol
	fn predict(&self, observations: &[usize], out_states: &mut [usize]) -> Result<f64>;

	/// Samples `input.size` independent trajectories, each with a length
	/// drawn uniformly in `[min_length, max_length)`.
	fn generate_batch<R: Rng + ?Sized>(
		&self,
		input: &GenerationInput,
		rng: &mut R,
	) -> Result<Vec<Sample>> {
		let mut samples = Vec::with_capacity(input.size);
		for _ in 0..input.size {
			let length = input.draw_length(rng);
			samples.push(self.generate(length, rng)?);
		}
		Ok(samples)
	}
}

/// A first-order discrete hidden Markov model.
///
/// The model is either empty (waiting for `train`) or holds a full set of
/// [`Parameters`]. Every way of filling it (`new`, `train`, `load` of a
/// model saved in log mode) leaves it in log mode.
///
/// # Responsibilities
/// - Own the start, transition and emission tensors
/// - Generate labeled sequences by ancestral sampling
/// - Decode observation sequences with the Viterbi algorithm
/// - Estimate its parameters from labeled samples
/// - Persist itself as a compact binary file
#[derive(Clone, Debug, Default)]
pub struct FirstOrderHmm {
	parameters: Option<Parameters>,
}

impl FirstOrderHmm {
	/// Builds a model from linear probabilities and converts it to log mode.
	///
	/// # Errors
	/// Returns `InvalidInput` if the tensors are inconsistent or a row is not
	/// a probability distribution.
	pub fn new(
		start: Vec<f64>,
		transition: Vec<Vec<f64>>,
		emission: Vec<Vec<f64>>,
	) -> Result<Self> {
		let mut parameters = Parameters::new(start, transition, emission)?;
		parameters.to_log();
		Ok(Self { parameters: Some(parameters) })
	}

	/// Returns an empty model, usable only through `train` or `load`.
	pub fn empty() -> Self {
		Self::default()
	}

	/// Read-only access to the parameters, if any.
	pub fn parameters(&self) -> Option<&Parameters> {
		self.parameters.as_ref()
	}

	pub fn is_trained(&self) -> bool {
		self.parameters.is_some()
	}

	/// Current representation, `None` for an empty model.
	pub fn mode(&self) -> Option<Mode> {
		self.parameters.as_ref().map(Parameters::mode)
	}

	pub fn num_states(&self) -> usize {
		self.parameters.as_ref().map_or(0, Parameters::num_states)
	}

	pub fn num_symbols(&self) -> usize {
		self.parameters.as_ref().map_or(0, Parameters::num_symbols)
	}

	fn trained(&self) -> Result<&Parameters> {
		self.parameters.as_ref().ok_or(HmmError::Untrained)
	}

	/// Converts the tensors to log-space. No-op if empty or already in log mode.
	pub fn to_log(&mut self) {
		if let Some(parameters) = self.parameters.as_mut() {
			parameters.to_log();
		}
	}

	/// Converts the tensors to linear probabilities. No-op if empty or already linear.
	pub fn un_log(&mut self) {
		if let Some(parameters) = self.parameters.as_mut() {
			parameters.un_log();
		}
	}

	/// Decodes `observations` into a freshly allocated state path.
	///
	/// Returns the path and its log-probability.
	pub fn decode(&self, observations: &[usize]) -> Result<(Vec<usize>, f64)> {
		let mut states = vec![0; observations.len()];
		let log_probability = self.predict(observations, &mut states)?;
		Ok((states, log_probability))
	}

	/// Supervised maximum-likelihood training from labeled samples.
	///
	/// Replaces the current parameters and leaves the model in log mode.
	/// An empty collection changes nothing.
	///
	/// # Errors
	/// Returns `InvalidInput` if a sample's observation and state sequences
	/// differ in length or a sample is empty. All samples are checked before
	/// anything is modified, so the model is untouched on error.
	pub fn train(&mut self, samples: &[Sample]) -> Result<()> {
		let Some(mut parameters) = estimator::estimate(samples)? else {
			log::debug!("train called without samples, model left unchanged");
			return Ok(());
		};
		parameters.to_log();
		self.parameters = Some(parameters);
		Ok(())
	}

	/// Approximate equality with another model (see [`Parameters::similar`]).
	///
	/// Two empty models are similar; an empty and a trained one are not.
	pub fn similar(&self, other: &Self) -> bool {
		match (&self.parameters, &other.parameters) {
			(Some(a), Some(b)) => a.similar(b),
			(None, None) => true,
			_ => false,
		}
	}

	/// Serializes the model (mode included) to `filepath` with `postcard`.
	///
	/// # Errors
	/// Returns `Untrained` for an empty model, or an I/O / encoding error.
	pub fn save<P: AsRef<Path>>(&self, filepath: P) -> Result<()> {
		let parameters = self.trained()?;
		let bytes = postcard::to_stdvec(parameters)?;
		io::write_bytes(&filepath, &bytes)?;
		log::debug!("saved model ({} bytes) to {}", bytes.len(), filepath.as_ref().display());
		Ok(())
	}

	/// Loads a model written by [`FirstOrderHmm::save`].
	///
	/// # Errors
	/// Returns an I/O or decoding error, or `InvalidInput` if the decoded
	/// tensors have inconsistent shapes or a row is not a probability
	/// distribution (negative, NaN or `+inf` entries included).
	pub fn load<P: AsRef<Path>>(filepath: P) -> Result<Self> {
		let bytes = io::read_bytes(&filepath)?;
		let parameters: Parameters = postcard::from_bytes(&bytes)?;
		parameters.validate()?;
		log::debug!(
			"loaded {}x{} model from {}",
			parameters.num_states(),
			parameters.num_symbols(),
			filepath.as_ref().display()
		);
		Ok(Self { parameters: Some(parameters) })
	}
}

impl Sequencer for FirstOrderHmm {
	fn generate<R: Rng + ?Sized>(&self, length: usize, rng: &mut R) -> Result<Sample> {
		let tables = SamplingTables::new(self.trained()?);
		Ok(tables.generate(length, rng))
	}

	fn predict(&self, observations: &[usize], out_states: &mut [usize]) -> Result<f64> {
		viterbi::predict(self.trained()?, observations, out_states)
	}

	/// Builds the sampling tables once for the whole batch.
	fn generate_batch<R: Rng + ?Sized>(
		&self,
		input: &GenerationInput,
		rng: &mut R,
	) -> Result<Vec<Sample>> {
		let tables = SamplingTables::new(self.trained()?);
		Ok(tables.generate_batch(input, rng))
	}
}
