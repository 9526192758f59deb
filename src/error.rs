use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
	#[error("Catalog not loaded: call catalog/load first")]
	NotLoaded,
	#[error("College not found: {0}")]
	NotFound(String),
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	#[error("Serialization error: {0}")]
	Serialization(String),
}

impl CatalogError {
	pub fn code(&self) -> &str {
		match self {
			Self::NotLoaded => "CATALOG_NOT_LOADED",
			Self::NotFound(_) => "COLLEGE_NOT_FOUND",
			Self::Io(_) => "CATALOG_IO",
			Self::Serialization(_) => "CATALOG_SERIALIZATION",
		}
	}

	pub fn to_json_rpc_error(&self) -> serde_json::Value {
		serde_json::json!({
			"catalogCode": self.code(),
			"message": self.to_string(),
		})
	}
}
