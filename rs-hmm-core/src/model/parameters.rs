use serde::{Deserialize, Serialize};

use crate::error::{HmmError, Result};
use crate::math;

/// Allowed drift of a linear row sum away from 1.0 at construction.
const ROW_SUM_TOLERANCE: f64 = 1e-3;

/// Maximum absolute (log-space) difference accepted by `similar`.
pub const SIMILARITY_TOLERANCE: f64 = 1e-2;

/// Representation currently held by the three parameter tensors.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
	/// Raw probabilities; every row sums to 1.
	Linear,
	/// Natural logarithm of each linear entry; `-inf` marks an impossible event.
	Log,
}

impl Mode {
	/// Reads a stored value as a log-probability.
	#[inline]
	fn as_log(self, value: f64) -> f64 {
		match self {
			Mode::Linear => value.ln(),
			Mode::Log => value,
		}
	}

	/// Reads a stored value as a linear probability.
	#[inline]
	fn as_linear(self, value: f64) -> f64 {
		match self {
			Mode::Linear => value,
			Mode::Log => value.exp(),
		}
	}
}

/// Start, transition and emission distributions of a first-order HMM.
///
/// # Invariants
/// - `start.len() == N >= 1`
/// - `transition` is `N x N`
/// - `emission` is `N x M` with `M >= 1`
/// - the three tensors are always in the same `mode`
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Parameters {
	start: Vec<f64>,
	transition: Vec<Vec<f64>>,
	emission: Vec<Vec<f64>>,
	mode: Mode,
}

impl Parameters {
	/// Builds linear-mode parameters from caller-supplied probabilities.
	///
	/// # Errors
	/// Returns `InvalidInput` if the shapes are inconsistent, if an entry is
	/// negative or not finite, or if a row does not sum to 1.
	pub fn new(
		start: Vec<f64>,
		transition: Vec<Vec<f64>>,
		emission: Vec<Vec<f64>>,
	) -> Result<Self> {
		let parameters = Self { start, transition, emission, mode: Mode::Linear };
		parameters.validate()?;
		Ok(parameters)
	}

	/// Checks shapes and that every row is a probability distribution in
	/// the current mode.
	///
	/// Used at construction and after decoding a persisted model. In log
	/// mode `-inf` reads as probability 0, while NaN or `+inf` are rejected.
	pub(crate) fn validate(&self) -> Result<()> {
		self.validate_shape()?;

		self.check_row("start", &self.start)?;
		for (i, row) in self.transition.iter().enumerate() {
			self.check_row(&format!("transition row {}", i), row)?;
		}
		for (i, row) in self.emission.iter().enumerate() {
			self.check_row(&format!("emission row {}", i), row)?;
		}
		Ok(())
	}

	fn check_row(&self, name: &str, row: &[f64]) -> Result<()> {
		let linear: Vec<f64> = row.iter().map(|&v| self.mode.as_linear(v)).collect();
		check_distribution(name, &linear)
	}

	/// Wraps already-normalized estimates; shapes are guaranteed by the estimator.
	pub(crate) fn from_estimates(
		start: Vec<f64>,
		transition: Vec<Vec<f64>>,
		emission: Vec<Vec<f64>>,
	) -> Self {
		Self { start, transition, emission, mode: Mode::Linear }
	}

	/// Checks the dimension invariants (not the row sums).
	fn validate_shape(&self) -> Result<()> {
		let n = self.start.len();
		if n == 0 {
			return Err(HmmError::InvalidInput("at least one hidden state is required".to_owned()));
		}
		if self.transition.len() != n {
			return Err(HmmError::InvalidInput(format!(
				"transition has {} rows, expected {}",
				self.transition.len(),
				n
			)));
		}
		if let Some((i, row)) = self.transition.iter().enumerate().find(|(_, row)| row.len() != n) {
			return Err(HmmError::InvalidInput(format!(
				"transition row {} has {} columns, expected {}",
				i,
				row.len(),
				n
			)));
		}
		if self.emission.len() != n {
			return Err(HmmError::InvalidInput(format!(
				"emission has {} rows, expected {}",
				self.emission.len(),
				n
			)));
		}
		let m = self.emission[0].len();
		if m == 0 {
			let message = "at least one observation symbol is required";
			return Err(HmmError::InvalidInput(message.to_owned()));
		}
		if let Some((i, row)) = self.emission.iter().enumerate().find(|(_, row)| row.len() != m) {
			return Err(HmmError::InvalidInput(format!(
				"emission row {} has {} columns, expected {}",
				i,
				row.len(),
				m
			)));
		}
		Ok(())
	}

	/// Number of hidden states (N).
	pub fn num_states(&self) -> usize {
		self.start.len()
	}

	/// Number of observation symbols (M).
	pub fn num_symbols(&self) -> usize {
		self.emission[0].len()
	}

	pub fn mode(&self) -> Mode {
		self.mode
	}

	/// Start distribution in the current mode.
	pub fn start(&self) -> &[f64] {
		&self.start
	}

	/// Transition rows in the current mode.
	pub fn transition(&self) -> &[Vec<f64>] {
		&self.transition
	}

	/// Emission rows in the current mode.
	pub fn emission(&self) -> &[Vec<f64>] {
		&self.emission
	}

	#[inline]
	pub(crate) fn log_start(&self, state: usize) -> f64 {
		self.mode.as_log(self.start[state])
	}

	#[inline]
	pub(crate) fn log_transition(&self, from: usize, to: usize) -> f64 {
		self.mode.as_log(self.transition[from][to])
	}

	#[inline]
	pub(crate) fn log_emission(&self, state: usize, symbol: usize) -> f64 {
		self.mode.as_log(self.emission[state][symbol])
	}

	/// A row of the current tensors, seen as log-probabilities.
	pub(crate) fn log_row(&self, row: &[f64]) -> Vec<f64> {
		row.iter().map(|&v| self.mode.as_log(v)).collect()
	}

	/// Converts all three tensors to log-space.
	///
	/// Does nothing if they already are. Zero probabilities become `-inf`.
	pub fn to_log(&mut self) {
		if self.mode == Mode::Log {
			return;
		}
		self.map_all(f64::ln);
		self.mode = Mode::Log;
	}

	/// Converts all three tensors back to linear probabilities.
	///
	/// Does nothing if they already are linear.
	pub fn un_log(&mut self) {
		if self.mode == Mode::Linear {
			return;
		}
		self.map_all(f64::exp);
		self.mode = Mode::Linear;
	}

	fn map_all(&mut self, f: fn(f64) -> f64) {
		self.start.iter_mut().for_each(|v| *v = f(*v));
		for row in self.transition.iter_mut().chain(self.emission.iter_mut()) {
			row.iter_mut().for_each(|v| *v = f(*v));
		}
	}

	/// Element-wise approximate equality of two parameter sets.
	///
	/// Values are compared as log-probabilities, whatever mode either side
	/// is in, with an absolute tolerance of [`SIMILARITY_TOLERANCE`]. Two
	/// impossible entries (`-inf`) match; `-inf` never matches a finite value.
	/// Returns `false` on the first mismatch, including a shape mismatch.
	pub fn similar(&self, other: &Self) -> bool {
		if self.num_states() != other.num_states() || self.num_symbols() != other.num_symbols() {
			return false;
		}

		if !self.similar_row(&self.start, other, &other.start) {
			return false;
		}
		for i in 0..self.num_states() {
			if !self.similar_row(&self.transition[i], other, &other.transition[i]) {
				return false;
			}
			if !self.similar_row(&self.emission[i], other, &other.emission[i]) {
				return false;
			}
		}
		true
	}

	fn similar_row(&self, a: &[f64], other: &Self, b: &[f64]) -> bool {
		a.iter().zip(b).all(|(&x, &y)| {
			let (x, y) = (self.mode.as_log(x), other.mode.as_log(y));
			x == y || (x - y).abs() <= SIMILARITY_TOLERANCE
		})
	}
}

/// Rejects negative or non-finite entries and rows that do not sum to 1.
fn check_distribution(name: &str, row: &[f64]) -> Result<()> {
	if let Some(value) = row.iter().find(|v| !v.is_finite() || **v < 0.0) {
		return Err(HmmError::InvalidInput(format!(
			"{} contains invalid probability {}",
			name, value
		)));
	}
	let total = math::sum(row);
	if (total - 1.0).abs() > ROW_SUM_TOLERANCE {
		return Err(HmmError::InvalidInput(format!("{} sums to {}, expected 1.0", name, total)));
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	fn weather() -> Parameters {
		Parameters::new(
			vec![0.6, 0.4],
			vec![vec![0.7, 0.3], vec![0.4, 0.6]],
			vec![vec![0.5, 0.4, 0.1], vec![0.1, 0.3, 0.6]],
		)
		.unwrap()
	}

	#[test]
	fn dimensions_come_from_shapes() {
		let p = weather();
		assert_eq!(p.num_states(), 2);
		assert_eq!(p.num_symbols(), 3);
		assert_eq!(p.mode(), Mode::Linear);
	}

	#[test]
	fn rejects_inconsistent_shapes() {
		let err = Parameters::new(vec![1.0], vec![vec![0.5, 0.5]], vec![vec![1.0]]);
		assert!(matches!(err, Err(HmmError::InvalidInput(_))));

		let err = Parameters::new(
			vec![0.5, 0.5],
			vec![vec![0.5, 0.5], vec![0.5, 0.5]],
			vec![vec![1.0], vec![0.5, 0.5]],
		);
		assert!(matches!(err, Err(HmmError::InvalidInput(_))));

		let err = Parameters::new(vec![], vec![], vec![]);
		assert!(matches!(err, Err(HmmError::InvalidInput(_))));
	}

	#[test]
	fn rejects_bad_rows() {
		let identity = vec![vec![1.0, 0.0], vec![0.0, 1.0]];
		let single = vec![vec![1.0], vec![1.0]];

		let err = Parameters::new(vec![0.7, 0.7], identity.clone(), single.clone());
		assert!(matches!(err, Err(HmmError::InvalidInput(_))));

		let err = Parameters::new(vec![1.5, -0.5], identity, single);
		assert!(matches!(err, Err(HmmError::InvalidInput(_))));
	}

	#[test]
	fn emission_follows_the_mode() {
		let mut p = weather();
		p.to_log();
		assert_eq!(p.mode(), Mode::Log);
		assert!((p.emission()[1][2] - 0.6f64.ln()).abs() < 1e-12);
		assert!((p.transition()[0][1] - 0.3f64.ln()).abs() < 1e-12);
		assert!((p.start()[0] - 0.6f64.ln()).abs() < 1e-12);
	}

	#[test]
	fn conversions_are_idempotent() {
		let mut p = weather();
		p.to_log();
		p.to_log();
		assert!((p.start()[1] - 0.4f64.ln()).abs() < 1e-12);
		p.un_log();
		p.un_log();
		assert!((p.start()[1] - 0.4).abs() < 1e-12);
	}

	#[test]
	fn zero_probability_is_negative_infinity() {
		let mut p = Parameters::new(
			vec![1.0, 0.0],
			vec![vec![1.0, 0.0], vec![0.0, 1.0]],
			vec![vec![1.0], vec![1.0]],
		)
		.unwrap();
		p.to_log();
		assert_eq!(p.start()[1], f64::NEG_INFINITY);
		assert_eq!(p.log_transition(0, 1), f64::NEG_INFINITY);
	}

	#[test]
	fn log_accessors_work_in_both_modes() {
		let mut p = weather();
		let linear = p.log_emission(0, 1);
		p.to_log();
		assert!((linear - p.log_emission(0, 1)).abs() < 1e-12);
	}

	#[test]
	fn similar_compares_log_values_across_modes() {
		let linear = weather();
		let mut log = weather();
		log.to_log();
		assert!(linear.similar(&log));
		assert!(log.similar(&linear));

		let other = Parameters::new(
			vec![0.6, 0.4],
			vec![vec![0.7, 0.3], vec![0.4, 0.6]],
			vec![vec![0.5, 0.4, 0.1], vec![0.2, 0.2, 0.6]],
		)
		.unwrap();
		assert!(!linear.similar(&other));
	}

	fn single_state(emission: Vec<f64>) -> Parameters {
		Parameters::new(vec![1.0], vec![vec![1.0]], vec![emission]).unwrap()
	}

	#[test]
	fn similar_sees_small_probability_gaps() {
		let rare = single_state(vec![0.001, 0.999]);
		let less_rare = single_state(vec![0.009, 0.991]);
		assert!(!rare.similar(&less_rare));
		assert!(!less_rare.similar(&rare));

		let close = single_state(vec![0.001005, 0.998995]);
		assert!(rare.similar(&close));
	}

	#[test]
	fn impossible_entries_only_match_each_other() {
		let mut certain = single_state(vec![1.0, 0.0]);
		certain.to_log();
		let mut same = certain.clone();
		same.un_log();
		assert!(certain.similar(&same));

		let almost = single_state(vec![0.9999, 0.0001]);
		assert!(!certain.similar(&almost));
	}

	#[test]
	fn validate_rejects_corrupt_values_in_either_mode() {
		let mut p = weather();
		p.to_log();
		assert!(p.validate().is_ok());

		p.emission[0][1] = f64::NAN;
		assert!(matches!(p.validate(), Err(HmmError::InvalidInput(_))));

		let mut p = weather();
		p.to_log();
		p.start[0] = f64::INFINITY;
		assert!(matches!(p.validate(), Err(HmmError::InvalidInput(_))));

		let mut p = weather();
		p.transition[1] = vec![1.5, -0.5];
		assert!(matches!(p.validate(), Err(HmmError::InvalidInput(_))));
	}

	#[test]
	fn similar_rejects_other_shapes() {
		let two = weather();
		let one = Parameters::new(vec![1.0], vec![vec![1.0]], vec![vec![0.5, 0.5]]).unwrap();
		assert!(!two.similar(&one));
		assert!(!one.similar(&two));
	}

	/// Strictly positive rows normalized to 1.
	fn distribution(len: usize) -> impl Strategy<Value = Vec<f64>> {
		prop::collection::vec(0.01f64..1.0, len).prop_map(|row| {
			let total: f64 = row.iter().sum();
			row.into_iter().map(|v| v / total).collect()
		})
	}

	fn parameters() -> impl Strategy<Value = Parameters> {
		(1usize..5, 1usize..6).prop_flat_map(|(n, m)| {
			(
				distribution(n),
				prop::collection::vec(distribution(n), n),
				prop::collection::vec(distribution(m), n),
			)
				.prop_map(|(start, transition, emission)| {
					Parameters::new(start, transition, emission).unwrap()
				})
		})
	}

	proptest! {
		#[test]
		fn log_round_trip_restores_probabilities(original in parameters()) {
			let mut p = original.clone();
			p.to_log();
			p.un_log();
			for (a, b) in p.start().iter().zip(original.start()) {
				prop_assert!((a - b).abs() < 1e-5);
			}
			let rows = p.transition().iter().zip(original.transition());
			let rows = rows.chain(p.emission().iter().zip(original.emission()));
			for (ra, rb) in rows {
				for (a, b) in ra.iter().zip(rb) {
					prop_assert!((a - b).abs() < 1e-5);
				}
			}
		}

		#[test]
		fn rows_sum_to_one(p in parameters()) {
			prop_assert!((math::sum(p.start()) - 1.0).abs() < 1e-4);
			for row in p.transition().iter().chain(p.emission()) {
				prop_assert!((math::sum(row) - 1.0).abs() < 1e-4);
			}
		}

		#[test]
		fn similar_is_reflexive_and_symmetric(a in parameters(), b in parameters()) {
			prop_assert!(a.similar(&a));
			prop_assert_eq!(a.similar(&b), b.similar(&a));
		}
	}
}
