use std::sync::mpsc;
use std::thread;

use crate::error::{HmmError, Result};
use crate::math::normalize_counts;

use super::parameters::Parameters;
use super::sample::Sample;

/// Chunks per CPU when splitting the training set across threads.
const CHUNK_FACTOR: usize = 8;

/// Below this many samples the counting stays on the calling thread.
const PARALLEL_THRESHOLD: usize = 256;

/// Occurrence counts gathered from labeled samples.
///
/// Conceptually, the three count tables behind a maximum-likelihood
/// estimate: how often each state opens a sample, how often each
/// `(from, to)` transition is seen and how often each state emits each symbol.
///
/// ## Responsibilities:
/// - Accumulate occurrences from samples
/// - Merge with another table of the same shape (parallel counting)
/// - Normalize into linear-space parameters
///
/// ## Invariants
/// - `start.len() == transition.len() == emission.len() == num_states`
/// - every transition row has `num_states` entries, every emission row `num_symbols`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CountTable {
	start: Vec<u64>,
	transition: Vec<Vec<u64>>,
	emission: Vec<Vec<u64>>,
}

impl CountTable {
	/// Creates an all-zero table for `num_states` states and `num_symbols` symbols.
	pub fn new(num_states: usize, num_symbols: usize) -> Self {
		Self {
			start: vec![0; num_states],
			transition: vec![vec![0; num_states]; num_states],
			emission: vec![vec![0; num_symbols]; num_states],
		}
	}

	pub fn num_states(&self) -> usize {
		self.start.len()
	}

	pub fn num_symbols(&self) -> usize {
		self.emission.first().map_or(0, Vec::len)
	}

	/// Records every occurrence found in one sample.
	///
	/// The whole sample is checked first, so the table is untouched on
	/// error. An empty sample records nothing.
	///
	/// # Errors
	/// - `InvalidInput` if the sequences differ in length or a state is not
	///   below `num_states`
	/// - `SymbolOutOfRange` if an observation is not below `num_symbols`
	pub fn add_sample(&mut self, sample: &Sample) -> Result<()> {
		self.check_sample(sample)?;

		let mut steps = sample.observations.iter().zip(&sample.states);

		let Some((&o, &s)) = steps.next() else {
			return Ok(());
		};
		self.start[s] += 1;
		self.emission[s][o] += 1;

		let mut previous = s;
		for (&o, &s) in steps {
			self.transition[previous][s] += 1;
			self.emission[s][o] += 1;
			previous = s;
		}
		Ok(())
	}

	fn check_sample(&self, sample: &Sample) -> Result<()> {
		if !sample.is_aligned() {
			return Err(HmmError::InvalidInput(format!(
				"sample has {} observations but {} states",
				sample.observations.len(),
				sample.states.len()
			)));
		}
		let num_states = self.num_states();
		if let Some(&state) = sample.states.iter().find(|&&s| s >= num_states) {
			return Err(HmmError::InvalidInput(format!(
				"state {} is out of range for {} states",
				state, num_states
			)));
		}
		let num_symbols = self.num_symbols();
		if let Some(&symbol) = sample.observations.iter().find(|&&o| o >= num_symbols) {
			return Err(HmmError::SymbolOutOfRange { symbol, num_symbols });
		}
		Ok(())
	}

	/// Merges another table into this one by summing every count.
	///
	/// # Errors
	/// Returns `ShapeMismatch` if the dimensions differ.
	pub fn merge(&mut self, other: &Self) -> Result<()> {
		if self.num_states() != other.num_states() || self.num_symbols() != other.num_symbols() {
			return Err(HmmError::ShapeMismatch(format!(
				"cannot merge {}x{} counts into {}x{}",
				other.num_states(),
				other.num_symbols(),
				self.num_states(),
				self.num_symbols()
			)));
		}

		add_row(&mut self.start, &other.start);
		for (row, other_row) in self.transition.iter_mut().zip(&other.transition) {
			add_row(row, other_row);
		}
		for (row, other_row) in self.emission.iter_mut().zip(&other.emission) {
			add_row(row, other_row);
		}
		Ok(())
	}

	/// Maximum-likelihood estimate: every row divided by its total.
	///
	/// Rows with no occurrence at all become uniform.
	pub fn normalize(&self) -> Parameters {
		Parameters::from_estimates(
			normalize_counts(&self.start),
			self.transition.iter().map(|row| normalize_counts(row)).collect(),
			self.emission.iter().map(|row| normalize_counts(row)).collect(),
		)
	}
}

fn add_row(row: &mut [u64], other: &[u64]) {
	for (count, extra) in row.iter_mut().zip(other) {
		*count += extra;
	}
}

/// Checks every sample and derives the model dimensions.
///
/// Nothing is counted before the whole set is known to be valid.
///
/// # Errors
/// Returns `InvalidInput` naming the first sample whose sequences differ in
/// length or that has no step at all.
fn dimensions(samples: &[Sample]) -> Result<(usize, usize)> {
	let mut max_state = 0;
	let mut max_symbol = 0;

	for (i, sample) in samples.iter().enumerate() {
		if !sample.is_aligned() {
			return Err(HmmError::InvalidInput(format!(
				"sample {} has {} observations but {} states",
				i,
				sample.observations.len(),
				sample.states.len()
			)));
		}
		if sample.is_empty() {
			return Err(HmmError::InvalidInput(format!("sample {} is empty", i)));
		}
		max_state = sample.states.iter().copied().fold(max_state, usize::max);
		max_symbol = sample.observations.iter().copied().fold(max_symbol, usize::max);
	}

	let too_large = |what: &str| HmmError::InvalidInput(format!("{} index too large", what));
	let num_states = max_state.checked_add(1).ok_or_else(|| too_large("state"))?;
	let num_symbols = max_symbol.checked_add(1).ok_or_else(|| too_large("symbol"))?;
	Ok((num_states, num_symbols))
}

/// Counts a slice of samples on the calling thread.
fn count_sequential(
	samples: &[Sample],
	num_states: usize,
	num_symbols: usize,
) -> Result<CountTable> {
	let mut counts = CountTable::new(num_states, num_symbols);
	for sample in samples {
		counts.add_sample(sample)?;
	}
	Ok(counts)
}

/// Splits the samples in chunks, counts each chunk on its own thread and
/// merges the partial tables as they come back.
///
/// Counts are integers, so the result does not depend on the merge order.
fn count_parallel(samples: &[Sample], num_states: usize, num_symbols: usize) -> Result<CountTable> {
	let chunks = num_cpus::get() * CHUNK_FACTOR;
	let chunk_size = samples.len().div_ceil(chunks).max(1);
	log::debug!("counting {} samples in chunks of {}", samples.len(), chunk_size);

	thread::scope(|scope| -> Result<CountTable> {
		let (tx, rx) = mpsc::channel();
		for chunk in samples.chunks(chunk_size) {
			let tx = tx.clone();
			scope.spawn(move || {
				// The receiver outlives every worker inside the scope.
				let _ = tx.send(count_sequential(chunk, num_states, num_symbols));
			});
		}
		drop(tx);

		let mut total = CountTable::new(num_states, num_symbols);
		for partial in rx.iter() {
			total.merge(&partial?)?;
		}
		Ok(total)
	})
}

/// Supervised maximum-likelihood estimation from labeled samples.
///
/// Returns `Ok(None)` for an empty collection, otherwise linear-space
/// parameters with `N = 1 + max state` and `M = 1 + max symbol`.
///
/// # Errors
/// Returns `InvalidInput` if any sample is misaligned or empty, or if an
/// index is too large to size the tables.
pub(crate) fn estimate(samples: &[Sample]) -> Result<Option<Parameters>> {
	if samples.is_empty() {
		return Ok(None);
	}

	let (num_states, num_symbols) = dimensions(samples)?;
	log::debug!(
		"estimating {} states, {} symbols from {} samples",
		num_states,
		num_symbols,
		samples.len()
	);

	let counts = if samples.len() < PARALLEL_THRESHOLD {
		count_sequential(samples, num_states, num_symbols)?
	} else {
		count_parallel(samples, num_states, num_symbols)?
	};

	Ok(Some(counts.normalize()))
}
