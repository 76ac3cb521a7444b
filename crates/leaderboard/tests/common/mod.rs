#![allow(dead_code)]

use sd_leaderboard::{
	store::MemoryStore, Column, EntryId, NewRecord, Record, RecordPatch, RemoteError, RemoteStore,
	Snapshot, Synchronizer,
};

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Notify;

pub fn record(id: i64, name: &str, score: i64) -> Record {
	Record {
		id: EntryId(id),
		name: name.to_string(),
		score,
	}
}

/// `(id, name, score)` per position, easier to assert on than whole entries.
pub fn board(snapshot: &Snapshot) -> Vec<(Option<i64>, String, i64)> {
	snapshot
		.iter()
		.map(|entry| (entry.id().map(|id| id.0), entry.name.clone(), entry.score))
		.collect()
}

pub fn row(id: Option<i64>, name: &str, score: i64) -> (Option<i64>, String, i64) {
	(id, name.to_string(), score)
}

/// A synchronizer that already fetched `records` from a fresh [`MemoryStore`].
pub async fn seeded(records: impl IntoIterator<Item = Record>) -> (Arc<MemoryStore>, Synchronizer) {
	let store = Arc::new(MemoryStore::with_records(records));
	let sync = Synchronizer::new(store.clone());
	sync.fetch_all().await;

	(store, sync)
}

/// Holds every delete until [`GatedStore::release`] is called.
#[derive(Default)]
pub struct GatedStore {
	pub inner: MemoryStore,
	entered: Notify,
	gate: Notify,
}

impl GatedStore {
	pub fn with_records(records: impl IntoIterator<Item = Record>) -> Self {
		Self {
			inner: MemoryStore::with_records(records),
			..Default::default()
		}
	}

	/// Resolves once a delete is parked at the gate.
	pub async fn delete_started(&self) {
		self.entered.notified().await;
	}

	pub fn release(&self) {
		self.gate.notify_one();
	}
}

#[async_trait]
impl RemoteStore for GatedStore {
	async fn list_all(
		&self,
		order_by: Column,
		descending: bool,
	) -> Result<Vec<Record>, RemoteError> {
		self.inner.list_all(order_by, descending).await
	}

	async fn insert(&self, record: NewRecord) -> Result<Vec<Record>, RemoteError> {
		self.inner.insert(record).await
	}

	async fn delete_by_id(&self, id: EntryId) -> Result<(), RemoteError> {
		self.entered.notify_one();
		self.gate.notified().await;
		self.inner.delete_by_id(id).await
	}

	async fn update_by_id(&self, id: EntryId, patch: RecordPatch) -> Result<(), RemoteError> {
		self.inner.update_by_id(id, patch).await
	}
}

/// Serves rows in whatever order they were given, ignoring the requested ordering.
pub struct UnorderedStore(pub Vec<Record>);

#[async_trait]
impl RemoteStore for UnorderedStore {
	async fn list_all(&self, _: Column, _: bool) -> Result<Vec<Record>, RemoteError> {
		Ok(self.0.clone())
	}

	async fn insert(&self, _: NewRecord) -> Result<Vec<Record>, RemoteError> {
		Err(RemoteError::Unavailable("read only".to_string()))
	}

	async fn delete_by_id(&self, _: EntryId) -> Result<(), RemoteError> {
		Err(RemoteError::Unavailable("read only".to_string()))
	}

	async fn update_by_id(&self, _: EntryId, _: RecordPatch) -> Result<(), RemoteError> {
		Err(RemoteError::Unavailable("read only".to_string()))
	}
}
