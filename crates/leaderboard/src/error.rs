use thiserror::Error;

/// Anything that kept a remote call from completing.
///
/// The synchronizer logs these and carries on locally, they never reach the caller.
#[derive(Debug, Error)]
pub enum RemoteError {
	#[error("request to remote store failed: {0}")]
	Request(#[from] reqwest::Error),
	#[error("remote store rejected the request <status={status}>: {body}")]
	Status {
		status: reqwest::StatusCode,
		body: String,
	},
	#[error("failed to decode remote store response: {0}")]
	Decode(#[from] serde_json::Error),
	#[error("remote store is unavailable: {0}")]
	Unavailable(String),
}

/// Input turned away before anything was attempted; the snapshot is left untouched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Rejection {
	#[error("name is empty")]
	EmptyName,
	#[error("score is not an integer: '{0}'")]
	InvalidScore(String),
	#[error("no entry at position {position} <len={len}>")]
	OutOfRange { position: usize, len: usize },
}
