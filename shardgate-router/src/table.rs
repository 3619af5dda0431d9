use std::sync::OnceLock;

use shardgate_core::{
    decode_table, BatchEndpointMap, CompressedPayload, MappingTables, OperationBatchMap,
    ENDPOINT_MAP_ENV, OPERATION_MAP_ENV,
};

use crate::error::{RouteError, RouterInitError};

/// Where the compressed tables come from at cold start.
#[derive(Debug, Clone)]
pub enum PayloadSource {
    Environment,
    Inline(CompressedPayload),
}

impl PayloadSource {
    fn load(&self) -> Result<CompressedPayload, RouterInitError> {
        match self {
            PayloadSource::Inline(payload) => Ok(payload.clone()),
            PayloadSource::Environment => Ok(CompressedPayload {
                operations: env_var(OPERATION_MAP_ENV)?,
                endpoints: env_var(ENDPOINT_MAP_ENV)?,
            }),
        }
    }
}

fn env_var(name: &'static str) -> Result<String, RouterInitError> {
    std::env::var(name).map_err(|_| RouterInitError::MissingVariable { name })
}

/// Decoded, validated routing tables. Read-only once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingTable {
    tables: MappingTables,
}

/// A resolved route: the batch serving an operation and its base URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route<'a> {
    pub batch: usize,
    pub base_url: &'a str,
}

impl RoutingTable {
    pub fn from_payload(payload: &CompressedPayload) -> Result<Self, RouterInitError> {
        let operations: OperationBatchMap =
            decode_table(&payload.operations).map_err(|source| RouterInitError::Decode {
                table: "operation",
                source,
            })?;
        let endpoints: BatchEndpointMap =
            decode_table(&payload.endpoints).map_err(|source| RouterInitError::Decode {
                table: "endpoint",
                source,
            })?;
        Self::from_tables(MappingTables {
            operations,
            endpoints,
        })
    }

    /// Every endpoint must be an absolute URL that can carry a path.
    pub fn from_tables(tables: MappingTables) -> Result<Self, RouterInitError> {
        for (batch, base_url) in tables.endpoints.iter() {
            let parsed = url::Url::parse(base_url).map_err(|e| RouterInitError::InvalidEndpoint {
                batch,
                url: base_url.to_string(),
                message: e.to_string(),
            })?;
            if parsed.cannot_be_a_base() {
                return Err(RouterInitError::InvalidEndpoint {
                    batch,
                    url: base_url.to_string(),
                    message: "not a base URL".to_string(),
                });
            }
        }
        Ok(Self { tables })
    }

    pub fn route(&self, operation_id: &str) -> Result<Route<'_>, RouteError> {
        let batch = self
            .tables
            .operations
            .batch_for(operation_id)
            .ok_or_else(|| RouteError::UnknownOperation(operation_id.to_string()))?;
        let base_url =
            self.tables
                .endpoints
                .endpoint_for(batch)
                .ok_or_else(|| RouteError::NoEndpoint {
                    operation_id: operation_id.to_string(),
                    batch,
                })?;
        Ok(Route { batch, base_url })
    }

    pub fn operation_count(&self) -> usize {
        self.tables.operations.len()
    }

    pub fn batch_count(&self) -> usize {
        self.tables.endpoints.len()
    }
}

/// Cold-start state: empty until the first request, then either the tables
/// or the failure that prevented building them, forever.
#[derive(Debug)]
pub struct RoutingState {
    source: PayloadSource,
    cell: OnceLock<Result<RoutingTable, RouterInitError>>,
}

impl RoutingState {
    pub fn new(source: PayloadSource) -> Self {
        Self {
            source,
            cell: OnceLock::new(),
        }
    }

    pub fn from_env() -> Self {
        Self::new(PayloadSource::Environment)
    }

    pub fn get(&self) -> Result<&RoutingTable, &RouterInitError> {
        self.cell
            .get_or_init(|| {
                let table = self
                    .source
                    .load()
                    .and_then(|payload| RoutingTable::from_payload(&payload));
                match &table {
                    Ok(t) => tracing::info!(
                        operations = t.operation_count(),
                        batches = t.batch_count(),
                        "routing tables loaded"
                    ),
                    Err(e) => tracing::error!(error = %e, "routing tables unavailable"),
                }
                table
            })
            .as_ref()
    }

    pub fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tables() -> MappingTables {
        MappingTables {
            operations: [("getUser".to_string(), 0), ("orphan".to_string(), 7)]
                .into_iter()
                .collect(),
            endpoints: [(0, "https://batch0.example".to_string())]
                .into_iter()
                .collect(),
        }
    }

    #[test]
    fn routes_known_operations() {
        let table = RoutingTable::from_tables(tables()).unwrap();
        assert_eq!(
            table.route("getUser").unwrap(),
            Route {
                batch: 0,
                base_url: "https://batch0.example"
            }
        );
        assert!(matches!(
            table.route("unknownOp"),
            Err(RouteError::UnknownOperation(_))
        ));
        assert!(matches!(
            table.route("orphan"),
            Err(RouteError::NoEndpoint { batch: 7, .. })
        ));
    }

    #[test]
    fn rejects_relative_endpoints() {
        let mut t = tables();
        t.endpoints.insert(1, "batch1.example/prod");
        assert!(matches!(
            RoutingTable::from_tables(t),
            Err(RouterInitError::InvalidEndpoint { batch: 1, .. })
        ));
    }

    #[test]
    fn initializes_once_from_inline_payload() {
        let payload = CompressedPayload::encode(&tables()).unwrap();
        let state = RoutingState::new(PayloadSource::Inline(payload));
        assert!(!state.is_initialized());
        let first = state.get().unwrap() as *const RoutingTable;
        let second = state.get().unwrap() as *const RoutingTable;
        assert_eq!(first, second);
        assert!(state.is_initialized());
    }

    #[test]
    fn reads_payload_from_environment() {
        let payload = CompressedPayload::encode(&tables()).unwrap();
        std::env::set_var(OPERATION_MAP_ENV, &payload.operations);
        std::env::set_var(ENDPOINT_MAP_ENV, &payload.endpoints);

        let state = RoutingState::from_env();
        let table = state.get().unwrap();
        assert_eq!(table.operation_count(), 2);
        assert_eq!(table.route("getUser").unwrap().batch, 0);
    }

    #[test]
    fn decode_failure_is_permanent() {
        let state = RoutingState::new(PayloadSource::Inline(CompressedPayload {
            operations: "not base64!".to_string(),
            endpoints: String::new(),
        }));
        assert!(matches!(
            state.get(),
            Err(RouterInitError::Decode {
                table: "operation",
                ..
            })
        ));
        assert!(state.get().is_err());
    }
}
