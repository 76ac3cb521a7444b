use std::{
	fmt,
	sync::{
		atomic::{AtomicBool, Ordering},
		Arc,
	},
};

use tokio::sync::{Mutex, RwLock};
use tracing::{debug, error, instrument, warn};

use super::{
	entry::{parse_score, Column, Entry, EntryId, NewRecord, RecordPatch, Score},
	error::{Rejection, RemoteError},
	snapshot::Snapshot,
	store::{Operation, RemoteStore},
};

/// What happened on the remote side of a mutation. The local change is applied in every case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
	/// The store accepted the change.
	Remote,
	/// The store call failed and was logged; the snapshot now diverges from the store.
	RemoteFailed,
	/// The entry was never persisted, so no remote call was made.
	LocalOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
	/// The snapshot now holds this many rows from the store.
	Replaced(usize),
	/// The store returned nothing; the snapshot was kept as it was.
	Empty,
	/// The store call failed and was logged; the snapshot was kept as it was.
	Failed,
}

/// Pending input for the add row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
	pub name: String,
	pub score: String,
}

/// Owns the leaderboard [`Snapshot`] and keeps it in step with a [`RemoteStore`].
///
/// Remote failures never reach the caller: they're logged and the local snapshot is updated
/// anyway (or, for fetches, left alone). No lock is held while a remote call is in flight, so
/// overlapping operations each read their target when they start and apply their local change
/// to whatever sits at that position when their remote call returns.
pub struct Synchronizer {
	store: Arc<dyn RemoteStore>,
	snapshot: RwLock<Snapshot>,
	draft: Mutex<Draft>,
	loading: AtomicBool,
	edit_mode: AtomicBool,
}

impl fmt::Debug for Synchronizer {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Synchronizer")
			.field("loading", &self.is_loading())
			.field("edit_mode", &self.is_edit_mode())
			.finish_non_exhaustive()
	}
}

impl Synchronizer {
	pub fn new(store: Arc<dyn RemoteStore>) -> Self {
		Self {
			store,
			snapshot: RwLock::default(),
			draft: Mutex::default(),
			loading: AtomicBool::new(true),
			edit_mode: AtomicBool::new(false),
		}
	}

	/// Pulls every row from the store, best score first.
	///
	/// An empty result keeps the current snapshot so a transient empty response can't blank a
	/// populated board.
	#[instrument(skip(self))]
	pub async fn fetch_all(&self) -> FetchOutcome {
		let outcome = match self.store.list_all(Column::Score, true).await {
			Ok(records) if records.is_empty() => {
				debug!("remote store returned no rows, keeping current snapshot");
				FetchOutcome::Empty
			}
			Ok(records) => {
				let count = records.len();
				self.snapshot
					.write()
					.await
					.replace(records.into_iter().map(Entry::from));
				FetchOutcome::Replaced(count)
			}
			Err(e) => {
				error!(?e, "failed to fetch leaderboard");
				FetchOutcome::Failed
			}
		};

		self.loading.store(false, Ordering::Release);

		outcome
	}

	/// Adds a new entry from raw input.
	///
	/// When the store accepts it the whole snapshot is fetched again to pick up the new id.
	/// Otherwise the entry is kept locally without an id.
	#[instrument(skip(self))]
	pub async fn add_entry(&self, name: &str, raw_score: &str) -> Result<Applied, Rejection> {
		let record = validate_new(name, raw_score)?;

		match self.store.insert(record.clone()).await {
			Ok(_) => {
				self.fetch_all().await;
				Ok(Applied::Remote)
			}
			Err(e) => {
				error!(?e, name = %record.name, "failed to add entry, keeping it locally");
				self.snapshot.write().await.insert(Entry::from(&record));
				Ok(Applied::RemoteFailed)
			}
		}
	}

	/// Removes the entry at `position`, whether or not the store managed to delete it.
	#[instrument(skip(self))]
	pub async fn remove_entry(&self, position: usize) -> Result<Applied, Rejection> {
		let target = self.target(position).await?;

		let applied = self
			.remote(Operation::Delete, target.id(), |store, id| async move {
				store.delete_by_id(id).await
			})
			.await;

		if self.snapshot.write().await.remove(position).is_none() {
			warn!(position, "entry vanished before it could be removed");
		}

		Ok(applied)
	}

	/// Sets the score of the entry at `position` and re-ranks the board.
	#[instrument(skip(self))]
	pub async fn update_score(&self, position: usize, score: Score) -> Result<Applied, Rejection> {
		let target = self.target(position).await?;

		let applied = self
			.remote(Operation::Update, target.id(), |store, id| async move {
				store.update_by_id(id, RecordPatch::score(score)).await
			})
			.await;

		if self.snapshot.write().await.set_score(position, score).is_none() {
			warn!(position, "entry vanished before its score could be updated");
		}

		Ok(applied)
	}

	/// Score edit typed as text, anything that isn't a number counts as `0`.
	pub async fn update_score_input(
		&self,
		position: usize,
		raw: &str,
	) -> Result<Applied, Rejection> {
		self.update_score(position, parse_score(raw).unwrap_or_default()).await
	}

	/// Renames the entry at `position`; ranks don't change.
	#[instrument(skip(self))]
	pub async fn update_name(&self, position: usize, name: &str) -> Result<Applied, Rejection> {
		let target = self.target(position).await?;

		let applied = self
			.remote(Operation::Update, target.id(), |store, id| {
				let patch = RecordPatch::name(name);
				async move { store.update_by_id(id, patch).await }
			})
			.await;

		if self.snapshot.write().await.set_name(position, name).is_none() {
			warn!(position, "entry vanished before it could be renamed");
		}

		Ok(applied)
	}

	pub async fn set_draft_name(&self, name: impl Into<String>) {
		self.draft.lock().await.name = name.into();
	}

	pub async fn set_draft_score(&self, score: impl Into<String>) {
		self.draft.lock().await.score = score.into();
	}

	pub async fn draft(&self) -> Draft {
		self.draft.lock().await.clone()
	}

	/// Adds the drafted entry. The draft is cleared once it passes validation, even if the
	/// store then fails; a rejected draft stays for correction.
	pub async fn submit_draft(&self) -> Result<Applied, Rejection> {
		let Draft { name, score } = self.draft().await;
		validate_new(&name, &score)?;

		*self.draft.lock().await = Draft::default();

		self.add_entry(&name, &score).await
	}

	/// Flips edit mode, returning the new state.
	pub fn toggle_edit_mode(&self) -> bool {
		!self.edit_mode.fetch_xor(true, Ordering::AcqRel)
	}

	pub fn is_edit_mode(&self) -> bool {
		self.edit_mode.load(Ordering::Acquire)
	}

	/// True until the first fetch attempt has finished.
	pub fn is_loading(&self) -> bool {
		self.loading.load(Ordering::Acquire)
	}

	pub async fn snapshot(&self) -> Snapshot {
		self.snapshot.read().await.clone()
	}

	pub async fn len(&self) -> usize {
		self.snapshot.read().await.len()
	}

	pub async fn is_empty(&self) -> bool {
		self.snapshot.read().await.is_empty()
	}

	async fn target(&self, position: usize) -> Result<Entry, Rejection> {
		let snapshot = self.snapshot.read().await;
		snapshot.get(position).cloned().ok_or(Rejection::OutOfRange {
			position,
			len: snapshot.len(),
		})
	}

	/// Runs `call` for persisted entries only, logging instead of returning its failure.
	async fn remote<F, Fut>(&self, op: Operation, id: Option<EntryId>, call: F) -> Applied
	where
		F: FnOnce(Arc<dyn RemoteStore>, EntryId) -> Fut,
		Fut: std::future::Future<Output = Result<(), RemoteError>>,
	{
		let Some(id) = id else {
			debug!(%op, "entry has no id yet, skipping remote store");
			return Applied::LocalOnly;
		};

		match call(Arc::clone(&self.store), id).await {
			Ok(()) => Applied::Remote,
			Err(e) => {
				error!(?e, %op, %id, "remote store call failed, applying locally anyway");
				Applied::RemoteFailed
			}
		}
	}
}

fn validate_new(name: &str, raw_score: &str) -> Result<NewRecord, Rejection> {
	let name = name.trim();
	if name.is_empty() {
		return Err(Rejection::EmptyName);
	}

	let score =
		parse_score(raw_score).ok_or_else(|| Rejection::InvalidScore(raw_score.to_string()))?;

	Ok(NewRecord {
		name: name.to_string(),
		score,
	})
}
