//! Build-time configuration for the API the dashboards talk to.

use std::time::Duration;

use leptos::prelude::*;
use log::warn;

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5001";
const DEFAULT_REFRESH_SECS: u64 = 30;
const MIN_REFRESH_SECS: u64 = 5;
const DEFAULT_LATEST_LIMIT: u32 = 50;

/// Path style of the node API deployment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ApiFlavor {
	/// Flat `/get-*` routes.
	Legacy,
	/// Resource routes under `/nodes` and `/statistics`.
	#[default]
	Rest,
}

impl ApiFlavor {
	fn parse(raw: &str) -> Option<Self> {
		match raw.trim().to_ascii_lowercase().as_str() {
			"legacy" => Some(Self::Legacy),
			"rest" => Some(Self::Rest),
			_ => None,
		}
	}
}

/// Where the API lives and how often the volatile panels refresh.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiConfig {
	pub base_url: String,
	pub flavor: ApiFlavor,
	pub refresh_interval: Duration,
	pub latest_limit: u32,
}

impl Default for ApiConfig {
	fn default() -> Self {
		Self {
			base_url: DEFAULT_BASE_URL.into(),
			flavor: ApiFlavor::default(),
			refresh_interval: Duration::from_secs(DEFAULT_REFRESH_SECS),
			latest_limit: DEFAULT_LATEST_LIMIT,
		}
	}
}

impl ApiConfig {
	/// Reads the `NODE_ATLAS_*` variables captured at compile time.
	pub fn from_build_env() -> Self {
		Self::from_vars(
			option_env!("NODE_ATLAS_API_URL"),
			option_env!("NODE_ATLAS_API_FLAVOR"),
			option_env!("NODE_ATLAS_REFRESH_SECS"),
			option_env!("NODE_ATLAS_LATEST_LIMIT"),
		)
	}

	/// Unparseable values fall back to the defaults with a warning.
	pub fn from_vars(
		base_url: Option<&str>,
		flavor: Option<&str>,
		refresh_secs: Option<&str>,
		latest_limit: Option<&str>,
	) -> Self {
		let mut config = Self::default();

		if let Some(url) = base_url.map(str::trim).filter(|u| !u.is_empty()) {
			config.base_url = url.trim_end_matches('/').to_string();
		}

		if let Some(raw) = flavor {
			match ApiFlavor::parse(raw) {
				Some(f) => config.flavor = f,
				None => warn!("Unknown API flavor {raw:?}, using {:?}", config.flavor),
			}
		}

		if let Some(raw) = refresh_secs {
			match raw.trim().parse::<u64>() {
				Ok(secs) => {
					config.refresh_interval = Duration::from_secs(secs.max(MIN_REFRESH_SECS))
				}
				Err(_) => warn!("Invalid refresh interval {raw:?}"),
			}
		}

		if let Some(raw) = latest_limit {
			match raw.trim().parse::<u32>() {
				Ok(limit) if limit > 0 => config.latest_limit = limit,
				_ => warn!("Invalid latest-node limit {raw:?}"),
			}
		}

		config
	}
}

/// Makes `config` available to every page below the caller.
pub fn provide_config(config: ApiConfig) {
	provide_context(config);
}

pub fn use_config() -> ApiConfig {
	use_context::<ApiConfig>().unwrap_or_else(ApiConfig::from_build_env)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults_when_nothing_is_set() {
		assert_eq!(ApiConfig::from_vars(None, None, None, None), ApiConfig::default());
	}

	#[test]
	fn base_url_loses_trailing_slash() {
		let config = ApiConfig::from_vars(Some("https://api.example.org/"), None, None, None);
		assert_eq!(config.base_url, "https://api.example.org");
	}

	#[test]
	fn flavor_is_case_insensitive() {
		let config = ApiConfig::from_vars(None, Some("LEGACY"), None, None);
		assert_eq!(config.flavor, ApiFlavor::Legacy);
	}

	#[test]
	fn refresh_interval_has_a_floor() {
		let config = ApiConfig::from_vars(None, None, Some("1"), None);
		assert_eq!(config.refresh_interval, Duration::from_secs(MIN_REFRESH_SECS));

		let config = ApiConfig::from_vars(None, None, Some("1500"), None);
		assert_eq!(config.refresh_interval, Duration::from_secs(1500));
	}

	#[test]
	fn garbage_values_keep_defaults() {
		let config = ApiConfig::from_vars(Some("  "), Some("grpc"), Some("soon"), Some("0"));
		assert_eq!(config, ApiConfig::default());
	}
}
