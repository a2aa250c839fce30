//! Query modules. Free functions over a borrowed `Connection`.

pub mod frequencies;
pub mod matrix;
pub mod promotions;

use espresso_core::errors::StorageError;
use espresso_core::types::ArgumentTuple;

/// JSON array form of an argument tuple, the storage key for instances.
pub fn encode_args(args: &ArgumentTuple) -> Result<String, StorageError> {
    serde_json::to_string(args).map_err(|e| StorageError::MalformedRecord {
        location: args.to_string(),
        message: e.to_string(),
    })
}

pub fn decode_args(json: &str) -> Result<ArgumentTuple, StorageError> {
    serde_json::from_str(json).map_err(|e| StorageError::MalformedRecord {
        location: json.to_string(),
        message: e.to_string(),
    })
}
