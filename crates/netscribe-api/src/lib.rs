// netscribe-api: Async client for UniFi-style controller APIs across
// software generations (dialects).

pub mod dialect;
pub mod error;
pub mod models;
pub mod negotiate;
pub mod resources;
pub mod session;
pub mod transport;

pub use dialect::{ApiDialect, DialectSelection};
pub use error::{DialectAttempt, Error, NegotiateError};
pub use negotiate::{NegotiationTarget, resolve};
pub use session::{Credential, Session};
pub use transport::{TlsMode, TransportConfig};
