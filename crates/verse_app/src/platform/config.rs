//! Run options: `options.ron`, then environment variables, then CLI flags.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use verse_engine::{BLUE_LETTER_BASE_URL, DEFAULT_USER_AGENT, GATEWAY_BASE_URL};
use verse_logging::verse_info;

pub(crate) const DEFAULT_CONFIG_FILE: &str = "options.ron";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct Options {
    pub auto_convert_to_txt: bool,
    /// Seconds to wait after each chapter request.
    pub request_delay: f64,
    pub max_retries: u32,
    pub user_agent: String,
    pub output_dir: String,
    pub gateway_base_url: String,
    pub blue_letter_base_url: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            auto_convert_to_txt: true,
            request_delay: 2.0,
            max_retries: 3,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            output_dir: "bible_downloads".to_string(),
            gateway_base_url: GATEWAY_BASE_URL.to_string(),
            blue_letter_base_url: BLUE_LETTER_BASE_URL.to_string(),
        }
    }
}

impl Options {
    /// Zero for a value `validate` would reject.
    pub fn request_delay(&self) -> Duration {
        Duration::try_from_secs_f64(self.request_delay).unwrap_or_default()
    }

    /// The output root: absolute paths as-is, relative ones under `cwd`.
    pub fn output_root(&self, cwd: &Path) -> PathBuf {
        resolve_output_dir(&self.output_dir, cwd)
    }

    fn validate(self) -> Result<Self> {
        if let Err(err) = Duration::try_from_secs_f64(self.request_delay) {
            bail!("request_delay must be a non-negative number of seconds ({err})");
        }
        if self.output_dir.trim().is_empty() {
            bail!("output_dir must not be empty");
        }
        Ok(self)
    }
}

/// Loads options from `explicit` (which must exist) or from `options.ron` in
/// the working directory (optional), then applies environment overrides.
pub(crate) fn load(explicit: Option<&Path>) -> Result<Options> {
    let from_file = match explicit {
        Some(path) => read_file(path)?,
        None => {
            let default_path = Path::new(DEFAULT_CONFIG_FILE);
            if default_path.is_file() {
                read_file(default_path)?
            } else {
                Options::default()
            }
        }
    };
    apply_env(from_file, |key| std::env::var(key).ok())?.validate()
}

fn read_file(path: &Path) -> Result<Options> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("could not read config file {}", path.display()))?;
    let options: Options = ron::from_str(&content)
        .with_context(|| format!("could not parse config file {}", path.display()))?;
    verse_info!("Loaded options from {}", path.display());
    Ok(options)
}

/// Environment variables override file values.
pub(crate) fn apply_env<F>(mut options: Options, lookup: F) -> Result<Options>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = lookup("AUTO_CONVERT_TO_TXT") {
        options.auto_convert_to_txt = value.trim().eq_ignore_ascii_case("true");
    }
    if let Some(value) = lookup("REQUEST_DELAY") {
        options.request_delay = value
            .trim()
            .parse()
            .with_context(|| format!("REQUEST_DELAY is not a number: {value}"))?;
    }
    if let Some(value) = lookup("MAX_RETRIES") {
        options.max_retries = value
            .trim()
            .parse()
            .with_context(|| format!("MAX_RETRIES is not a count: {value}"))?;
    }
    if let Some(value) = lookup("USER_AGENT") {
        options.user_agent = value;
    }
    if let Some(value) = lookup("OUTPUT_DIR") {
        options.output_dir = value;
    }
    Ok(options)
}

pub(crate) fn resolve_output_dir(raw: &str, cwd: &Path) -> PathBuf {
    let cleaned = raw.trim().trim_matches('"').trim_matches('\'');
    let path = Path::new(cleaned);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}
