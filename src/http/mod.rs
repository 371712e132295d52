//! HTTP transport.
//!
//! Each request is independent: no session, no ordering between requests.
//! Invocations run on the blocking pool, so a slow handler holds up only its
//! own request. Errors use one body shape on every route:
//!
//! ```json
//! {"error": {"code": "UnknownCapability", "message": "unknown tool: x"}}
//! ```
//!
//! Status codes follow [`crate::error::ErrorCode::http_status`].

mod error;
pub mod router;
pub mod server;

pub use error::{ApiError, HttpTransportError};
pub use router::{build_router, AppState};
pub use server::HttpServer;
