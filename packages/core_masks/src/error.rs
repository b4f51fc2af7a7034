use std::io;

use thiserror::Error;

/// Errors that abort a core mask calculation.
///
/// Any of these means the topology of the host could not be established with confidence, so no
/// partial assignment is ever returned alongside them.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Topology data was read successfully but is not a valid cpulist.
    #[error("malformed cpulist in {origin}")]
    InvalidCpuList {
        /// Which topology file the text came from.
        origin: String,

        /// The parsing failure, naming the offending token.
        #[source]
        source: cpulist::Error,
    },

    /// Topology data could not be read and there is no recognized fallback.
    #[error("failed to read {what}")]
    TopologyRead {
        /// Which piece of topology data was being read.
        what: String,

        /// The underlying I/O failure.
        #[source]
        source: io::Error,
    },
}

/// A specialized `Result` type for core mask operations.
pub(crate) type Result<T> = std::result::Result<T, Error>;
