//! Top-level module for the hidden Markov model engine.
//!
//! This module provides:
//! - Parameter storage with explicit linear / log representation (`Parameters`)
//! - Labeled trajectories (`Sample`)
//! - Ancestral sampling (`generator`) and its batch configuration (`GenerationInput`)
//! - Viterbi decoding (`viterbi`)
//! - Supervised maximum-likelihood estimation (`estimator`)
//! - The model callers hold (`FirstOrderHmm`) and the order-specific
//!   capability trait (`Sequencer`)

/// First-order model facade and the `Sequencer` trait.
///
/// Owns the parameters and wires generation, decoding, training and
/// persistence together.
pub mod hmm;

/// Start / transition / emission tensors and the log-space transform.
pub mod parameters;

/// Labeled `(observations, states)` trajectories.
pub mod sample;

/// Batch generation configuration.
///
/// Validates length bounds and draws per-sample lengths.
pub mod generation_input;

/// Cumulative distributions and inverse-transform sampling.
pub mod sampling;

/// Count tables and maximum-likelihood estimation.
///
/// Large training sets are counted in parallel chunks and merged.
pub mod estimator;

/// Ancestral sampling over precomputed cumulative tables.
///
/// Not exposed; reached through `Sequencer::generate`.
mod generator;

/// Viterbi decoding.
///
/// Not exposed; reached through `Sequencer::predict`.
mod viterbi;
