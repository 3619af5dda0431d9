#![forbid(unsafe_code)]

//! Runtime front door: decodes the compressed routing tables once and
//! forwards each request to the batch endpoint serving its operation.

pub mod error;
pub mod forward;
pub mod http;
pub mod server;
pub mod table;

pub use crate::error::{RouteError, RouterInitError};
pub use crate::http::{ForwardRequest, ForwardResponse, HttpClient, HttpError, ReqwestHttpClient};
pub use crate::server::{router, serve, ProxyState, DEFAULT_MAX_BODY_BYTES};
pub use crate::table::{PayloadSource, Route, RoutingState, RoutingTable};
