#![forbid(unsafe_code)]

//! Build-time core of shardgate: turns an API description into classified,
//! batched operations and the mapping tables the runtime router consumes.

pub mod batch;
pub mod classify;
pub mod codec;
pub mod error;
pub mod index;
pub mod model;
pub mod parser;
pub mod schema;

pub use crate::batch::{partition, Batch};
pub use crate::classify::{
    Classification, FieldNameTranslator, IdentityTranslator, OperationClassifier,
    OverrideTranslator,
};
pub use crate::codec::{
    decode_table, encode_table, CompressedPayload, ENDPOINT_MAP_ENV, OPERATION_MAP_ENV,
};
pub use crate::error::{BatchError, CodecError, IndexError, ParseError, SchemaError};
pub use crate::index::index_operations;
pub use crate::model::{
    BatchEndpointMap, Diagnostic, DiagnosticSeverity, HttpMethod, IndexedOperation,
    MappingTables, OperationBatchMap, OperationDescriptor, OperationRole,
};
pub use crate::parser::{parse_description_str, DocumentFormat, ParsedDescription};
pub use crate::schema::{SchemaFormat, SchemaIndex};

/// Default ceiling on front-door resources per deployable unit.
pub const DEFAULT_MAX_RESOURCES_PER_STACK: usize = 50;
