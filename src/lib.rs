//! An iterative DNS resolver: starting from a root nameserver it walks the
//! delegation chain itself instead of asking any server to recurse on its
//! behalf. Answers are kept in a TTL-expiring cache shared by all lookups.

pub mod cache;
pub mod dns;
pub mod error;
pub mod resolver;
pub mod trace;
pub mod transport;

pub use cache::{Cache, SharedCache};
pub use error::ResolveError;
pub use resolver::Resolver;
pub use trace::{LogTracer, NullTracer, Tracer};
pub use transport::{Transport, UdpTransport};
