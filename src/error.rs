use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("could not geocode {address:?}: {reason}")]
    Resolution { address: String, reason: String },
    #[error("road network acquisition failed: {0}")]
    NetworkAcquisition(String),
    #[error("no roads of the requested travel mode within the region")]
    EmptyNetwork,
    #[error("no nearby nodes found for snapping")]
    NoPointsFound,
    #[error("no path found between nodes {from} and {to}")]
    NoPathFound { from: usize, to: usize },
    #[error("cannot summarize an absent route")]
    MissingRoute,
    #[error("route traverses an edge missing from the network")]
    InvalidRoute,
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
