//! CLI configuration, stored as JSON in the data directory

use anyhow::{anyhow, Result};
use sd_leaderboard::store::RestConfig;
use serde::{Deserialize, Serialize};
use std::{
	fs,
	path::{Path, PathBuf},
};

pub const CONFIG_FILE: &str = "leaderboard.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliConfig {
	/// Config schema version
	pub version: u32,
	/// Level for our own crates, a `RUST_LOG` directive for the same target wins
	#[serde(default = "default_log_level")]
	pub log_level: String,
	/// Remote table to mirror; without it the board lives in memory only
	#[serde(default)]
	pub remote: Option<RestConfig>,
}

fn default_log_level() -> String {
	"info".to_string()
}

impl Default for CliConfig {
	fn default() -> Self {
		Self {
			version: 1,
			log_level: default_log_level(),
			remote: None,
		}
	}
}

impl CliConfig {
	pub fn config_path(data_dir: &Path) -> PathBuf {
		data_dir.join(CONFIG_FILE)
	}

	/// Loads the config from `data_dir`, writing the defaults there first if there's none.
	///
	/// Runs before logging is set up, so it reports whether the file was created instead of
	/// logging it.
	pub fn load_or_create(data_dir: &Path) -> Result<(Self, bool)> {
		let config_path = Self::config_path(data_dir);

		if config_path.exists() {
			let json = fs::read_to_string(&config_path)?;
			Ok((serde_json::from_str(&json)?, false))
		} else {
			let config = Self::default();
			config.save(data_dir)?;
			Ok((config, true))
		}
	}

	pub fn save(&self, data_dir: &Path) -> Result<()> {
		fs::create_dir_all(data_dir)?;
		fs::write(
			Self::config_path(data_dir),
			serde_json::to_string_pretty(self)?,
		)?;
		Ok(())
	}

	/// Command line and environment values take precedence over the file.
	#[must_use]
	pub fn with_overrides(mut self, url: Option<String>, api_key: Option<String>) -> Self {
		if let Some(url) = url {
			match &mut self.remote {
				Some(remote) => remote.base_url = url,
				None => self.remote = Some(RestConfig::new(url)),
			}
		}

		if let (Some(remote), Some(api_key)) = (&mut self.remote, api_key) {
			remote.api_key = Some(api_key);
		}

		self
	}
}

pub fn default_data_dir() -> Result<PathBuf> {
	Ok(dirs::data_local_dir()
		.ok_or_else(|| anyhow!("Could not determine data directory"))?
		.join("leaderboard"))
}
