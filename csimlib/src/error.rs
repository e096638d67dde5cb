use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using the library error
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can stop a simulation run. All of these are fatal, the simulator never
/// recovers from them or continues past the offending input
#[derive(Error, Debug)]
pub enum Error {
    /// A geometry parameter was never supplied
    #[error("missing required cache parameter `{0}`")]
    MissingParameter(&'static str),

    /// The geometry can't be simulated
    #[error("invalid cache configuration: {0}")]
    InvalidConfiguration(String),

    /// The configuration file isn't valid JSON, or doesn't have the expected shape
    #[error("couldn't parse the config file: {0}")]
    ConfigFile(#[from] serde_json::Error),

    /// The trace couldn't be opened or mapped
    #[error("couldn't open the trace at {}: {source}", .path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Reading the trace failed part way through
    #[error("failed to read the trace: {0}")]
    Io(#[from] io::Error),

    /// A data line didn't follow the trace grammar
    #[error("malformed record on line {line} ({content:?}): {reason}")]
    MalformedRecord {
        line: usize,
        content: String,
        reason: RecordError,
    },
}

/// Why a single data line was rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("expected `<kind> <hex address>,<decimal size>`")]
    Syntax,

    #[error("unknown access kind `{0}`, expected one of L, S or M")]
    UnknownKind(char),

    #[error("invalid hexadecimal address `{0}`")]
    Address(String),

    #[error("invalid decimal size `{0}`")]
    Size(String),

    #[error("access size must be positive")]
    ZeroSize,
}
