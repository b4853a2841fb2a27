//! First-order discrete hidden Markov models.
//!
//! This crate provides:
//! - Model parameters held in linear or log space, with explicit conversion
//! - Sequence generation by ancestral sampling, with a caller-supplied RNG
//! - Viterbi decoding of the most likely hidden state path
//! - Supervised maximum-likelihood training from labeled sequences
//! - Binary persistence of trained models
//!
//! ```
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//! use rs_hmm_core::model::hmm::{FirstOrderHmm, Sequencer};
//!
//! let model = FirstOrderHmm::new(
//!     vec![0.6, 0.4],
//!     vec![vec![0.7, 0.3], vec![0.4, 0.6]],
//!     vec![vec![0.5, 0.4, 0.1], vec![0.1, 0.3, 0.6]],
//! )?;
//!
//! let (path, _log_probability) = model.decode(&[0, 1, 2])?;
//! assert_eq!(path, vec![0, 0, 1]);
//!
//! let mut rng = StdRng::seed_from_u64(7);
//! let sample = model.generate(10, &mut rng)?;
//! assert_eq!(sample.len(), 10);
//! # Ok::<(), rs_hmm_core::error::HmmError>(())
//! ```

/// HMM parameters, generation, decoding and training.
pub mod model;

/// Error type shared by every operation.
pub mod error;

/// Summation and normalization helpers.
pub mod math;

/// File helpers used by model persistence.
///
/// Not exposed
pub(crate) mod io;
