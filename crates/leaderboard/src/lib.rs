//!
//! # Leaderboard
//!
//! A ranked list of named scores mirrored from a remote record store into a local [`Snapshot`].
//!
//! The [`Synchronizer`] owns the snapshot and applies every edit locally even when the remote
//! store can't be reached, so whatever renders the board never waits on the backend:
//! - Fetches replace the snapshot with the remote rows, but an empty result never wipes it;
//! - Adds that the store rejects are kept locally without an id;
//! - Removes and updates are applied locally whatever the remote outcome;
//! - After every operation the snapshot is sorted by descending score, ties keeping their
//!   previous relative order.
//!
//! ## Basic example
//!
//! ```
//! use sd_leaderboard::{store::MemoryStore, Applied, Synchronizer};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let sync = Synchronizer::new(Arc::new(MemoryStore::new()));
//!     sync.fetch_all().await;
//!
//!     assert!(matches!(sync.add_entry("Ann", "50").await, Ok(Applied::Remote)));
//!     assert_eq!(sync.snapshot().await.get(0).map(|e| e.score), Some(50));
//! }
//! ```

#![warn(
	clippy::all,
	clippy::pedantic,
	clippy::correctness,
	clippy::perf,
	clippy::style,
	clippy::suspicious,
	clippy::complexity,
	clippy::nursery,
	clippy::unwrap_used,
	unused_qualifications,
	rust_2018_idioms,
	trivial_casts,
	trivial_numeric_casts,
	unused_allocation,
	clippy::unnecessary_cast,
	clippy::cast_lossless,
	clippy::cast_possible_truncation,
	clippy::cast_possible_wrap,
	clippy::cast_precision_loss,
	clippy::cast_sign_loss,
	clippy::dbg_macro,
	clippy::deprecated_cfg_attr,
	clippy::separated_literal_suffix,
	deprecated
)]
#![forbid(deprecated_in_future)]
#![allow(clippy::missing_errors_doc, clippy::module_name_repetitions)]

mod entry;
mod error;
mod snapshot;
pub mod store;
mod synchronizer;

pub use entry::{
	parse_score, Column, Entry, EntryId, Identity, NewRecord, Record, RecordPatch, Score,
};
pub use error::{RemoteError, Rejection};
pub use snapshot::{Medal, Snapshot};
pub use store::RemoteStore;
pub use synchronizer::{Applied, Draft, FetchOutcome, Synchronizer};
