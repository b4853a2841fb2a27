use crate::error::{HmmError, Result};

use super::parameters::Parameters;

/// Viterbi decoding: most likely hidden state path for `observations`.
///
/// Writes the path into `out_states` and returns its log-probability.
///
/// The recurrence is
/// `score'[s] = max_f(score[f] + log A[f][s]) + log B[s][o_t]`.
/// Candidates only replace the running maximum on a strict improvement, so
/// the lowest state index wins every tie, both inside the recurrence and for
/// the final state. The running maximum starts at `-inf`: a state no source
/// can reach keeps a `-inf` score and backpointer 0.
///
/// An empty observation sequence writes nothing and returns `0.0`.
///
/// # Errors
/// - `InvalidInput` if `out_states` and `observations` differ in length
/// - `SymbolOutOfRange` if an observation is not a symbol of the model
pub(crate) fn predict(
	parameters: &Parameters,
	observations: &[usize],
	out_states: &mut [usize],
) -> Result<f64> {
	if observations.len() != out_states.len() {
		return Err(HmmError::InvalidInput(format!(
			"state buffer has length {}, observations have length {}",
			out_states.len(),
			observations.len()
		)));
	}

	let num_symbols = parameters.num_symbols();
	if let Some(&symbol) = observations.iter().find(|&&o| o >= num_symbols) {
		return Err(HmmError::SymbolOutOfRange { symbol, num_symbols });
	}

	let time = observations.len();
	if time == 0 {
		return Ok(0.0);
	}
	let num_states = parameters.num_states();

	let mut score: Vec<f64> = (0..num_states)
		.map(|s| parameters.log_start(s) + parameters.log_emission(s, observations[0]))
		.collect();
	let mut previous = vec![f64::NEG_INFINITY; num_states];

	// link[t][s]: best predecessor of state s at time t (row 0 unused)
	let mut link = vec![vec![0usize; num_states]; time];

	for t in 1..time {
		std::mem::swap(&mut score, &mut previous);
		let symbol = observations[t];

		for s in 0..num_states {
			let mut best = f64::NEG_INFINITY;
			let mut best_from = 0;
			for (f, &p) in previous.iter().enumerate() {
				let candidate = p + parameters.log_transition(f, s);
				if candidate > best {
					best = candidate;
					best_from = f;
				}
			}
			score[s] = best + parameters.log_emission(s, symbol);
			link[t][s] = best_from;
		}
	}

	let mut best_state = 0;
	let mut best_score = f64::NEG_INFINITY;
	for (s, &p) in score.iter().enumerate() {
		if p > best_score {
			best_score = p;
			best_state = s;
		}
	}

	for t in (0..time).rev() {
		out_states[t] = best_state;
		best_state = link[t][best_state];
	}

	Ok(best_score)
}
