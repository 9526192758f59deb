// ---------------------------------------------------------------------------
// File-backed key-value store — gzipped JSON envelope per key
// ---------------------------------------------------------------------------
//
// Each key is stored as one file under a directory, holding a gzip-compressed
// JSON envelope `{ "version": 1, "value": "<payload>" }`. Reads sniff the
// gzip magic bytes and also accept legacy uncompressed envelopes. Anything
// that fails to decompress or parse is treated as an absent key; tracker
// state is non-authoritative, so no read or write error ever propagates past
// this module.
// ---------------------------------------------------------------------------

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use flate2::read::{GzDecoder, GzEncoder};
use flate2::Compression;
use serde::{Deserialize, Serialize};

use crate::recency::KvStore;

const ENVELOPE_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct Envelope {
	version: u32,
	value: String,
}

/// Gzip-compress a byte slice (level 6).
fn compress(data: &[u8]) -> std::io::Result<Vec<u8>> {
	let mut encoder = GzEncoder::new(data, Compression::new(6));
	let mut compressed = Vec::new();
	encoder.read_to_end(&mut compressed)?;
	Ok(compressed)
}

/// Gunzip-decompress a byte slice.
fn decompress(data: &[u8]) -> std::io::Result<Vec<u8>> {
	let mut decoder = GzDecoder::new(data);
	let mut decompressed = Vec::new();
	decoder.read_to_end(&mut decompressed)?;
	Ok(decompressed)
}

/// Check for the gzip magic bytes (0x1f, 0x8b).
fn is_gzipped(data: &[u8]) -> bool {
	data.len() >= 2 && data[0] == 0x1f && data[1] == 0x8b
}

/// Map a storage key to a file-safe name.
fn file_name_for(key: &str) -> String {
	let safe: String = key
		.chars()
		.map(|c| {
			if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
				c
			} else {
				'-'
			}
		})
		.collect();
	format!("{safe}.kv")
}

/// A [`KvStore`] persisting one file per key under `dir`.
pub struct FileKvStore {
	dir: PathBuf,
}

impl FileKvStore {
	/// Create a store rooted at `dir`, creating the directory if needed.
	pub fn new(dir: impl AsRef<Path>) -> std::io::Result<Self> {
		let dir = dir.as_ref().to_path_buf();
		fs::create_dir_all(&dir)?;
		Ok(Self { dir })
	}

	fn path_for(&self, key: &str) -> PathBuf {
		self.dir.join(file_name_for(key))
	}

	fn read_envelope(&self, key: &str) -> Option<String> {
		let path = self.path_for(key);
		let raw = fs::read(&path).ok()?;

		let plain = if is_gzipped(&raw) {
			match decompress(&raw) {
				Ok(bytes) => bytes,
				Err(e) => {
					tracing::warn!("Corrupt gzip payload for {}: {}", key, e);
					return None;
				}
			}
		} else {
			raw
		};

		match serde_json::from_slice::<Envelope>(&plain) {
			Ok(envelope) => Some(envelope.value),
			Err(e) => {
				tracing::warn!("Corrupt envelope for {}: {}", key, e);
				None
			}
		}
	}

	fn write_envelope(&self, key: &str, value: &str) -> std::io::Result<()> {
		let envelope = Envelope {
			version: ENVELOPE_VERSION,
			value: value.to_string(),
		};
		let json = serde_json::to_vec(&envelope)
			.map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
		let compressed = compress(&json)?;
		fs::write(self.path_for(key), compressed)
	}
}

impl KvStore for FileKvStore {
	fn get(&self, key: &str) -> Option<String> {
		self.read_envelope(key)
	}

	fn set(&mut self, key: &str, value: &str) {
		if let Err(e) = self.write_envelope(key, value) {
			tracing::warn!("Failed to persist {}: {}", key, e);
		}
	}

	fn remove(&mut self, key: &str) {
		let path = self.path_for(key);
		if path.exists() {
			if let Err(e) = fs::remove_file(&path) {
				tracing::warn!("Failed to remove {}: {}", key, e);
			}
		}
	}
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
