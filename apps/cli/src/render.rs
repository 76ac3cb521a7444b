use comfy_table::{presets::UTF8_BORDERS_ONLY, Table};
use sd_leaderboard::{Medal, Snapshot};

/// The board as a table, one row per entry, best first. Unsynced entries get a `*`.
pub fn table(snapshot: &Snapshot, edit_mode: bool) -> String {
	let mut table = Table::new();
	table.load_preset(UTF8_BORDERS_ONLY);
	table.set_header(vec!["Rank", "Name", "Score"]);

	if snapshot.is_empty() {
		table.add_row(vec!["", "(no entries)", ""]);
	}

	for (position, entry) in snapshot.iter().enumerate() {
		let rank = match Medal::for_position(position) {
			Some(medal) => format!("#{} {medal}", position + 1),
			None => format!("#{}", position + 1),
		};
		let score = if entry.is_synced() {
			entry.score.to_string()
		} else {
			format!("{} *", entry.score)
		};

		table.add_row(vec![rank, entry.name.clone(), score]);
	}

	if edit_mode {
		format!("** EDIT MODE ** (type `edit` to leave)\n{table}")
	} else {
		table.to_string()
	}
}
