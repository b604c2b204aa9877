use std::io;

use thiserror::Error;

/// The failures a caller can actually observe. Transport trouble is not
/// among them: timeouts, stray datagrams and unparseable responses all
/// collapse into an empty record set, keeping lookups available rather
/// than diagnostic.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// A CNAME chain ran past the caller's indirection budget.
    #[error("cname indirection budget exhausted")]
    DepthExceeded,

    /// The bootstrap server could not be turned into an address.
    #[error("unknown host: {0}")]
    UnknownHost(String),

    /// The resolver's socket could not be set up.
    #[error("socket setup failed: {0}")]
    Socket(#[from] io::Error),
}
