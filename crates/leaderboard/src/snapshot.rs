use std::{cmp::Reverse, fmt, slice};

use super::entry::{Entry, Score};

/// The ordered entries currently on the board.
///
/// Always sorted by descending score. Every mutation re-sorts with a stable sort, so entries
/// with equal scores keep the order they had before it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
	entries: Vec<Entry>,
}

impl Snapshot {
	#[must_use]
	pub const fn new() -> Self {
		Self {
			entries: Vec::new(),
		}
	}

	pub fn from_entries(entries: impl IntoIterator<Item = Entry>) -> Self {
		let mut snapshot = Self {
			entries: entries.into_iter().collect(),
		};
		snapshot.sort();
		snapshot
	}

	/// Replaces every entry, keeping the incoming order among equal scores.
	pub fn replace(&mut self, entries: impl IntoIterator<Item = Entry>) {
		self.entries.clear();
		self.entries.extend(entries);
		self.sort();
	}

	/// Places `entry` after any existing entries with the same score.
	pub fn insert(&mut self, entry: Entry) {
		self.entries.push(entry);
		self.sort();
	}

	pub fn remove(&mut self, position: usize) -> Option<Entry> {
		(position < self.entries.len()).then(|| self.entries.remove(position))
	}

	pub fn set_score(&mut self, position: usize, score: Score) -> Option<()> {
		self.entries.get_mut(position)?.score = score;
		self.sort();
		Some(())
	}

	/// Names don't affect rank, so nothing moves.
	pub fn set_name(&mut self, position: usize, name: impl Into<String>) -> Option<()> {
		self.entries.get_mut(position)?.name = name.into();
		Some(())
	}

	#[must_use]
	pub fn get(&self, position: usize) -> Option<&Entry> {
		self.entries.get(position)
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn iter(&self) -> slice::Iter<'_, Entry> {
		self.entries.iter()
	}

	#[must_use]
	pub fn is_sorted(&self) -> bool {
		self.entries.windows(2).all(|w| w[0].score >= w[1].score)
	}

	fn sort(&mut self) {
		self.entries.sort_by_key(|entry| Reverse(entry.score));
	}
}

impl<'a> IntoIterator for &'a Snapshot {
	type Item = &'a Entry;
	type IntoIter = slice::Iter<'a, Entry>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}

/// Podium marker for the top three ranks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Medal {
	Gold,
	Silver,
	Bronze,
}

impl Medal {
	#[must_use]
	pub const fn for_position(position: usize) -> Option<Self> {
		match position {
			0 => Some(Self::Gold),
			1 => Some(Self::Silver),
			2 => Some(Self::Bronze),
			_ => None,
		}
	}
}

impl fmt::Display for Medal {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::Gold => "🥇",
			Self::Silver => "🥈",
			Self::Bronze => "🥉",
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::entry::EntryId;

	fn names(snapshot: &Snapshot) -> Vec<&str> {
		snapshot.iter().map(|e| e.name.as_str()).collect()
	}

	#[test]
	fn replace_sorts_descending_and_keeps_tie_order() {
		let mut snapshot = Snapshot::new();
		snapshot.replace([
			Entry::synced(EntryId(1), "Ann", 60),
			Entry::synced(EntryId(2), "Bo", 80),
			Entry::synced(EntryId(3), "Cy", 60),
			Entry::synced(EntryId(4), "Di", 90),
		]);

		assert!(snapshot.is_sorted());
		assert_eq!(names(&snapshot), ["Di", "Bo", "Ann", "Cy"]);
	}

	#[test]
	fn inserted_entry_goes_after_equal_scores() {
		let mut snapshot = Snapshot::from_entries([
			Entry::synced(EntryId(1), "Ann", 50),
			Entry::synced(EntryId(2), "Bo", 40),
		]);

		snapshot.insert(Entry::local("Cy", 50));

		assert_eq!(names(&snapshot), ["Ann", "Cy", "Bo"]);
		assert_eq!(snapshot.get(1).and_then(Entry::id), None);
	}

	#[test]
	fn set_score_reranks() {
		let mut snapshot = Snapshot::from_entries([
			Entry::synced(EntryId(1), "Ann", 80),
			Entry::synced(EntryId(2), "Bo", 60),
		]);

		assert_eq!(snapshot.set_score(1, 95), Some(()));

		assert_eq!(names(&snapshot), ["Bo", "Ann"]);
		assert!(snapshot.is_sorted());
	}

	#[test]
	fn set_score_keeps_relative_order_among_ties() {
		let mut snapshot = Snapshot::from_entries([
			Entry::synced(EntryId(1), "Ann", 80),
			Entry::synced(EntryId(2), "Bo", 70),
			Entry::synced(EntryId(3), "Cy", 60),
		]);

		snapshot.set_score(0, 70);
		assert_eq!(names(&snapshot), ["Ann", "Bo", "Cy"]);

		snapshot.set_score(2, 70);
		assert_eq!(names(&snapshot), ["Ann", "Bo", "Cy"]);
	}

	#[test]
	fn set_name_does_not_move_anything() {
		let mut snapshot = Snapshot::from_entries([
			Entry::synced(EntryId(1), "Ann", 80),
			Entry::synced(EntryId(2), "Bo", 60),
		]);

		snapshot.set_name(1, "Zed");

		assert_eq!(names(&snapshot), ["Ann", "Zed"]);
	}

	#[test]
	fn out_of_range_positions_are_ignored() {
		let mut snapshot = Snapshot::from_entries([Entry::local("Ann", 1)]);

		assert_eq!(snapshot.remove(3), None);
		assert_eq!(snapshot.set_score(1, 9), None);
		assert_eq!(snapshot.set_name(1, "x"), None);
		assert_eq!(snapshot.len(), 1);
	}

	#[test]
	fn medals_cover_the_podium_only() {
		assert_eq!(Medal::for_position(0), Some(Medal::Gold));
		assert_eq!(Medal::for_position(2), Some(Medal::Bronze));
		assert_eq!(Medal::for_position(3), None);
	}
}
