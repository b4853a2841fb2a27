use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T, E = HmmError> = std::result::Result<T, E>;

/// Every failure the HMM engine can report.
#[derive(Debug, Error)]
pub enum HmmError {
	/// Malformed argument: mismatched sample lengths, wrong buffer size,
	/// inconsistent tensors, invalid generation bounds.
	#[error("invalid input: {0}")]
	InvalidInput(String),

	/// An observation index is outside `[0, num_symbols)`.
	#[error("symbol {symbol} out of range (model has {num_symbols} symbols)")]
	SymbolOutOfRange { symbol: usize, num_symbols: usize },

	/// Two count tables (or models) of different dimensions were combined.
	#[error("shape mismatch: {0}")]
	ShapeMismatch(String),

	/// The model has no parameters yet; call `train` or build it from tensors.
	#[error("model has no parameters (not trained)")]
	Untrained,

	#[error(transparent)]
	Io(#[from] std::io::Error),

	#[error(transparent)]
	Encoding(#[from] postcard::Error),
}
