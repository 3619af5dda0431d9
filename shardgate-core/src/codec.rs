use std::io::{Read, Write};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::CodecError;
use crate::model::MappingTables;

/// Environment variable carrying the encoded `operationId -> batch` table.
pub const OPERATION_MAP_ENV: &str = "SHARDGATE_OPERATION_MAP";
/// Environment variable carrying the encoded `batch -> base URL` table.
pub const ENDPOINT_MAP_ENV: &str = "SHARDGATE_ENDPOINT_MAP";

/// `base64(gzip(json(table)))`.
pub fn encode_table<T: Serialize>(table: &T) -> Result<String, CodecError> {
    let json = serde_json::to_vec(table).map_err(CodecError::Serialize)?;
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&json).map_err(CodecError::Compress)?;
    let compressed = encoder.finish().map_err(CodecError::Compress)?;
    Ok(STANDARD.encode(compressed))
}

pub fn decode_table<T: DeserializeOwned>(payload: &str) -> Result<T, CodecError> {
    let compressed = STANDARD.decode(payload.trim())?;
    let mut json = Vec::new();
    GzDecoder::new(compressed.as_slice())
        .read_to_end(&mut json)
        .map_err(CodecError::Decompress)?;
    serde_json::from_slice(&json).map_err(CodecError::Deserialize)
}

/// The two tables, each compressed on its own, ready to be handed to the
/// router as configuration values.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CompressedPayload {
    pub operations: String,
    pub endpoints: String,
}

impl CompressedPayload {
    pub fn encode(tables: &MappingTables) -> Result<Self, CodecError> {
        Ok(Self {
            operations: encode_table(&tables.operations)?,
            endpoints: encode_table(&tables.endpoints)?,
        })
    }

    pub fn decode(&self) -> Result<MappingTables, CodecError> {
        Ok(MappingTables {
            operations: decode_table(&self.operations)?,
            endpoints: decode_table(&self.endpoints)?,
        })
    }
}
