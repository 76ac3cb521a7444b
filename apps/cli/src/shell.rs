use anyhow::Result;
use clap::{Parser, Subcommand};
use sd_leaderboard::{Rejection, Synchronizer};
use std::io::Write;
use tokio::io::{self, AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::render;

/// One line typed into the shell.
#[derive(Parser, Debug)]
#[command(
	name = "board",
	no_binary_name = true,
	disable_version_flag = true,
	after_help = "Adding, removing and editing entries needs edit mode."
)]
struct Line {
	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
	/// Show the board
	#[command(visible_alias = "ls")]
	List,
	/// Fetch the board again
	Refresh,
	/// Toggle edit mode
	#[command(name = "edit")]
	ToggleEdit,
	/// Leave the shell
	#[command(visible_alias = "exit")]
	Quit,
	/// Set the name of the new entry
	#[command(name = "name")]
	DraftName {
		#[arg(num_args = 0.., trailing_var_arg = true, allow_hyphen_values = true)]
		words: Vec<String>,
	},
	/// Set the score of the new entry
	#[command(name = "score")]
	DraftScore {
		#[arg(num_args = 0.., trailing_var_arg = true, allow_hyphen_values = true)]
		words: Vec<String>,
	},
	/// Add the new entry
	Add,
	/// Remove an entry
	#[command(name = "rm")]
	Remove {
		#[arg(value_parser = rank)]
		rank: usize,
	},
	/// Change a score
	#[command(name = "set")]
	SetScore {
		#[arg(value_parser = rank)]
		rank: usize,
		#[arg(allow_hyphen_values = true)]
		score: String,
	},
	/// Change a name
	Rename {
		#[arg(value_parser = rank)]
		rank: usize,
		#[arg(num_args = 0.., trailing_var_arg = true, allow_hyphen_values = true)]
		words: Vec<String>,
	},
}

impl Command {
	const fn needs_edit_mode(&self) -> bool {
		matches!(
			self,
			Self::DraftName { .. }
				| Self::DraftScore { .. }
				| Self::Add
				| Self::Remove { .. }
				| Self::SetScore { .. }
				| Self::Rename { .. }
		)
	}
}

/// Turns a 1-based rank into a snapshot position.
pub fn rank(raw: &str) -> Result<usize, String> {
	match raw.parse::<usize>() {
		Ok(rank) if rank > 0 => Ok(rank - 1),
		_ => Err(format!("'{raw}' is not a rank, ranks start at 1")),
	}
}

/// `Ok(None)` for a blank line; help output comes back as an error, like any other clap exit.
pub fn parse(line: &str) -> Result<Option<Command>, clap::Error> {
	let words = line.split_whitespace().collect::<Vec<_>>();
	if words.is_empty() {
		return Ok(None);
	}

	Line::try_parse_from(words).map(|line| Some(line.command))
}

pub async fn run(sync: &Synchronizer) -> Result<()> {
	let mut lines = BufReader::new(io::stdin()).lines();

	println!("{}", render::table(&sync.snapshot().await, sync.is_edit_mode()));

	loop {
		print!("{}> ", if sync.is_edit_mode() { "edit" } else { "board" });
		std::io::stdout().flush()?;

		let Some(line) = lines.next_line().await? else {
			break;
		};

		let command = match parse(&line) {
			Ok(Some(command)) => command,
			Ok(None) => continue,
			Err(err) => {
				println!("{err}");
				continue;
			}
		};

		if command.needs_edit_mode() && !sync.is_edit_mode() {
			println!("not in edit mode, type `edit` first");
			continue;
		}

		let result = match command {
			Command::Quit => break,
			Command::List => Ok(()),
			Command::Refresh => {
				sync.fetch_all().await;
				Ok(())
			}
			Command::ToggleEdit => {
				sync.toggle_edit_mode();
				Ok(())
			}
			Command::DraftName { words } => {
				sync.set_draft_name(words.join(" ")).await;
				continue;
			}
			Command::DraftScore { words } => {
				sync.set_draft_score(words.join(" ")).await;
				continue;
			}
			Command::Add => sync.submit_draft().await.map(drop),
			Command::Remove { rank } => sync.remove_entry(rank).await.map(drop),
			Command::SetScore { rank, score } => {
				sync.update_score_input(rank, &score).await.map(drop)
			}
			Command::Rename { rank, words } => {
				sync.update_name(rank, &words.join(" ")).await.map(drop)
			}
		};

		match result {
			Err(rejection @ Rejection::OutOfRange { .. }) => println!("{rejection}"),
			Err(rejection) => debug!(%rejection, "input ignored"),
			Ok(_) => println!("{}", render::table(&sync.snapshot().await, sync.is_edit_mode())),
		}
	}

	Ok(())
}
