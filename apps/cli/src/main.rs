use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use sd_leaderboard::{
	store::{MemoryStore, RestStore},
	Rejection, RemoteStore, Synchronizer,
};
use std::{path::PathBuf, sync::Arc};
use tracing::{debug, info, warn};

mod config;
mod logger;
mod render;
mod shell;

use config::{default_data_dir, CliConfig};

#[derive(Parser, Debug)]
#[command(name = "leaderboard", about = "Ranked score board mirrored from a remote table")]
struct Cli {
	/// Directory holding the config file and logs
	#[arg(long, env = "LEADERBOARD_DATA_DIR")]
	data_dir: Option<PathBuf>,

	/// Remote project URL, overrides the config file
	#[arg(long, env = "LEADERBOARD_URL")]
	url: Option<String>,

	/// Remote API key, overrides the config file
	#[arg(long, env = "LEADERBOARD_API_KEY", hide_env_values = true)]
	api_key: Option<String>,

	/// Keep the board in memory, ignoring any configured remote
	#[arg(long, default_value_t = false)]
	offline: bool,

	#[command(subcommand)]
	command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
	/// Show the board (default)
	List,
	/// Add an entry
	Add { name: String, score: String },
	/// Remove the entry at a rank
	Remove {
		#[arg(value_parser = shell::rank)]
		rank: usize,
	},
	/// Change the score of the entry at a rank
	Score {
		#[arg(value_parser = shell::rank)]
		rank: usize,
		#[arg(allow_hyphen_values = true)]
		score: String,
	},
	/// Rename the entry at a rank
	Rename {
		#[arg(value_parser = shell::rank)]
		rank: usize,
		name: String,
	},
	/// Interactive session against a single board
	Shell,
}

fn store(config: &CliConfig, offline: bool) -> Result<Arc<dyn RemoteStore>> {
	match &config.remote {
		Some(remote) if !offline => {
			info!(url = %remote.base_url, table = %remote.table, "using remote store");
			Ok(Arc::new(RestStore::new(remote.clone())?))
		}
		_ => {
			info!("no remote store in use, the board lives in memory");
			Ok(Arc::new(MemoryStore::new()))
		}
	}
}

fn report(result: Result<impl std::fmt::Debug, Rejection>) -> Result<()> {
	match result {
		Ok(applied) => debug!(?applied, "done"),
		Err(rejection @ Rejection::OutOfRange { .. }) => bail!(rejection),
		Err(rejection) => debug!(%rejection, "input ignored"),
	}

	Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
	let cli = Cli::parse();

	let data_dir = match cli.data_dir {
		Some(data_dir) => data_dir,
		None => default_data_dir()?,
	};

	let (config, created) = CliConfig::load_or_create(&data_dir)?;
	let config = config.with_overrides(cli.url, cli.api_key);
	let _guard = logger::init(&data_dir, &config.log_level)?;

	let config_path = CliConfig::config_path(&data_dir);
	if created {
		warn!(?config_path, "no config found, wrote the defaults");
	} else {
		info!(?config_path, "loaded config");
	}

	let sync = Synchronizer::new(store(&config, cli.offline)?);
	sync.fetch_all().await;

	match cli.command.unwrap_or(Commands::List) {
		Commands::List => {}
		Commands::Add { name, score } => report(sync.add_entry(&name, &score).await)?,
		Commands::Remove { rank } => report(sync.remove_entry(rank).await)?,
		Commands::Score { rank, score } => report(sync.update_score_input(rank, &score).await)?,
		Commands::Rename { rank, name } => report(sync.update_name(rank, &name).await)?,
		Commands::Shell => return shell::run(&sync).await,
	}

	println!("{}", render::table(&sync.snapshot().await, false));

	Ok(())
}
