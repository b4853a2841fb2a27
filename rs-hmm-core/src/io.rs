use std::fs;
use std::io;
use std::path::Path;

/// Reads a whole binary file into memory.
pub(crate) fn read_bytes<P: AsRef<Path>>(filename: P) -> io::Result<Vec<u8>> {
	fs::read(filename)
}

/// Writes `bytes` to `filename`, creating missing parent directories.
///
/// Example:
/// `models/weather/hmm.bin` creates `models/weather/` first if needed.
pub(crate) fn write_bytes<P: AsRef<Path>>(filename: P, bytes: &[u8]) -> io::Result<()> {
	let path = filename.as_ref();
	if path.file_name().is_none() {
		return Err(io::Error::new(io::ErrorKind::InvalidInput, "Output path has no filename"));
	}

	if let Some(parent) = path.parent() {
		if !parent.as_os_str().is_empty() && !parent.exists() {
			fs::create_dir_all(parent)?;
		}
	}

	fs::write(path, bytes)
}
