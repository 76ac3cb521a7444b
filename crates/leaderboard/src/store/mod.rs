use std::fmt;

use async_trait::async_trait;

use super::{
	entry::{Column, EntryId, NewRecord, Record, RecordPatch},
	error::RemoteError,
};

mod memory;
mod rest;

pub use memory::MemoryStore;
pub use rest::{RestConfig, RestStore};

/// A named record collection living somewhere the synchronizer can't see.
///
/// Every call reports failure through its return value; timeouts are the implementor's job
/// and surface as a regular [`RemoteError`].
#[async_trait]
pub trait RemoteStore: Send + Sync + 'static {
	async fn list_all(
		&self,
		order_by: Column,
		descending: bool,
	) -> Result<Vec<Record>, RemoteError>;

	/// Returns the rows as persisted, ids included.
	async fn insert(&self, record: NewRecord) -> Result<Vec<Record>, RemoteError>;

	async fn delete_by_id(&self, id: EntryId) -> Result<(), RemoteError>;

	async fn update_by_id(&self, id: EntryId, patch: RecordPatch) -> Result<(), RemoteError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
	List,
	Insert,
	Delete,
	Update,
}

impl fmt::Display for Operation {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::List => "list",
			Self::Insert => "insert",
			Self::Delete => "delete",
			Self::Update => "update",
		})
	}
}
