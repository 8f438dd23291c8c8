//! JSON schema file loading.

use std::path::Path;

use caers_model::{Schema, SchemaConfig};

use crate::error::{IngestError, Result};

/// Loads and validates a JSON schema file.
pub fn load_schema(path: &Path) -> Result<Schema> {
    let text = std::fs::read_to_string(path).map_err(|err| IngestError::io(path, err))?;
    let config: SchemaConfig =
        serde_json::from_str(&text).map_err(|source| IngestError::SchemaParse {
            path: path.to_path_buf(),
            source,
        })?;
    let schema = Schema::try_from(config).map_err(|source| IngestError::InvalidSchema {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(
        path = %path.display(),
        fields = schema.fields().len(),
        "Loaded schema"
    );
    Ok(schema)
}
