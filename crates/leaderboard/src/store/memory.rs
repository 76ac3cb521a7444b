use std::collections::HashSet;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{Column, EntryId, NewRecord, Operation, Record, RecordPatch, RemoteError, RemoteStore};

/// In-process [`RemoteStore`], used when no remote is configured and as a test double.
///
/// Failures can be injected per [`Operation`] or for everything at once.
#[derive(Debug, Default)]
pub struct MemoryStore {
	inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
	rows: Vec<Record>,
	last_id: i64,
	unavailable: bool,
	failing: HashSet<Operation>,
	calls: Vec<Operation>,
}

impl Inner {
	fn attempt(&mut self, op: Operation) -> Result<(), RemoteError> {
		self.calls.push(op);

		if self.unavailable {
			Err(RemoteError::Unavailable("store is offline".to_string()))
		} else if self.failing.contains(&op) {
			Err(RemoteError::Unavailable(format!("{op} failed")))
		} else {
			Ok(())
		}
	}

	fn position(&self, id: EntryId) -> Option<usize> {
		self.rows.iter().position(|row| row.id == id)
	}
}

impl MemoryStore {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Seeds the store with existing rows; later inserts get ids above the highest one.
	pub fn with_records(records: impl IntoIterator<Item = Record>) -> Self {
		let rows = records.into_iter().collect::<Vec<_>>();
		let last_id = rows.iter().map(|row| row.id.0).max().unwrap_or_default();

		Self {
			inner: Mutex::new(Inner {
				rows,
				last_id,
				..Default::default()
			}),
		}
	}

	pub async fn set_unavailable(&self, unavailable: bool) {
		self.inner.lock().await.unavailable = unavailable;
	}

	pub async fn fail_on(&self, op: Operation, failing: bool) {
		let mut inner = self.inner.lock().await;
		if failing {
			inner.failing.insert(op);
		} else {
			inner.failing.remove(&op);
		}
	}

	/// Rows in insertion order.
	pub async fn records(&self) -> Vec<Record> {
		self.inner.lock().await.rows.clone()
	}

	/// Every operation attempted so far, failed ones included.
	pub async fn calls(&self) -> Vec<Operation> {
		self.inner.lock().await.calls.clone()
	}
}

#[async_trait]
impl RemoteStore for MemoryStore {
	async fn list_all(
		&self,
		order_by: Column,
		descending: bool,
	) -> Result<Vec<Record>, RemoteError> {
		let mut inner = self.inner.lock().await;
		inner.attempt(Operation::List)?;

		let mut rows = inner.rows.clone();
		rows.sort_by(|a, b| {
			let ordering = match order_by {
				Column::Id => a.id.cmp(&b.id),
				Column::Name => a.name.cmp(&b.name),
				Column::Score => a.score.cmp(&b.score),
			};
			if descending {
				ordering.reverse()
			} else {
				ordering
			}
		});

		Ok(rows)
	}

	async fn insert(
		&self,
		NewRecord { name, score }: NewRecord,
	) -> Result<Vec<Record>, RemoteError> {
		let mut inner = self.inner.lock().await;
		inner.attempt(Operation::Insert)?;

		inner.last_id += 1;
		let record = Record {
			id: EntryId(inner.last_id),
			name,
			score,
		};
		inner.rows.push(record.clone());

		Ok(vec![record])
	}

	async fn delete_by_id(&self, id: EntryId) -> Result<(), RemoteError> {
		let mut inner = self.inner.lock().await;
		inner.attempt(Operation::Delete)?;

		// Deleting a missing row matches nothing, same as a filtered remote delete
		if let Some(position) = inner.position(id) {
			inner.rows.remove(position);
		}

		Ok(())
	}

	async fn update_by_id(
		&self,
		id: EntryId,
		RecordPatch { name, score }: RecordPatch,
	) -> Result<(), RemoteError> {
		let mut inner = self.inner.lock().await;
		inner.attempt(Operation::Update)?;

		if let Some(row) = inner.rows.iter_mut().find(|row| row.id == id) {
			if let Some(name) = name {
				row.name = name;
			}
			if let Some(score) = score {
				row.score = score;
			}
		}

		Ok(())
	}
}
