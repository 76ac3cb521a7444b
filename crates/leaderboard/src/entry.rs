use std::fmt;

use serde::{Deserialize, Serialize};

pub type Score = i64;

/// Identifier assigned by the remote store once a row is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub i64);

impl fmt::Display for EntryId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		self.0.fmt(f)
	}
}

/// Whether an [`Entry`] is known to exist remotely.
///
/// A [`Identity::Local`] entry was never confirmed by the store, so anything that targets it
/// has to go by position and skip the remote call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Identity {
	#[default]
	Local,
	Synced(EntryId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
	pub identity: Identity,
	pub name: String,
	pub score: Score,
}

impl Entry {
	pub fn local(name: impl Into<String>, score: Score) -> Self {
		Self {
			identity: Identity::Local,
			name: name.into(),
			score,
		}
	}

	pub fn synced(id: EntryId, name: impl Into<String>, score: Score) -> Self {
		Self {
			identity: Identity::Synced(id),
			name: name.into(),
			score,
		}
	}

	#[must_use]
	pub const fn id(&self) -> Option<EntryId> {
		match self.identity {
			Identity::Synced(id) => Some(id),
			Identity::Local => None,
		}
	}

	#[must_use]
	pub const fn is_synced(&self) -> bool {
		matches!(self.identity, Identity::Synced(_))
	}
}

/// A row as the remote store returns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
	pub id: EntryId,
	pub name: String,
	pub score: Score,
}

impl From<Record> for Entry {
	fn from(Record { id, name, score }: Record) -> Self {
		Self {
			identity: Identity::Synced(id),
			name,
			score,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRecord {
	pub name: String,
	pub score: Score,
}

impl From<&NewRecord> for Entry {
	fn from(record: &NewRecord) -> Self {
		Self::local(record.name.clone(), record.score)
	}
}

/// Partial update, only the present fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordPatch {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub score: Option<Score>,
}

impl RecordPatch {
	pub fn name(name: impl Into<String>) -> Self {
		Self {
			name: Some(name.into()),
			score: None,
		}
	}

	#[must_use]
	pub const fn score(score: Score) -> Self {
		Self {
			name: None,
			score: Some(score),
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
	Id,
	Name,
	Score,
}

impl Column {
	#[must_use]
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Id => "id",
			Self::Name => "name",
			Self::Score => "score",
		}
	}
}

impl fmt::Display for Column {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Reads a score out of free-form text input.
///
/// Leading and trailing whitespace is ignored, then an optional sign followed by the longest
/// run of ASCII digits is taken; anything after the digits is dropped (`"42wpm"` is `42`).
/// Returns `None` when there are no digits or the value doesn't fit a [`Score`].
#[must_use]
pub fn parse_score(raw: &str) -> Option<Score> {
	let trimmed = raw.trim();
	let unsigned = trimmed.trim_start_matches(['+', '-']);
	let sign_len = trimmed.len() - unsigned.len();
	if sign_len > 1 {
		return None;
	}

	let digits_len = unsigned
		.bytes()
		.take_while(u8::is_ascii_digit)
		.count();
	if digits_len == 0 {
		return None;
	}

	trimmed[..sign_len + digits_len].parse().ok()
}
