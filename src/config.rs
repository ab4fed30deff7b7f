use std::{
    path::{Path, PathBuf},
    sync::LazyLock,
    time::Duration,
};

use anyhow::Result;
use regex::Regex;
use serde::Deserialize;

use crate::extractor::PageExtractor;

static DEFAULT_SITE: &str = include_str!("../config/xkcd.toml");

static PAGE_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{page\}").expect("placeholder pattern is valid"));

pub const DEFAULT_THREADS: usize = 3;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub output_dir: PathBuf,
    pub record_file: String,
    pub threads: usize,
    pub timeout_secs: u64,
    pub user_agent: String,
    #[serde(default)]
    pub site_file: Option<PathBuf>,
}

impl AppConfig {
    /// Defaults, then `config.toml` (or `path` when given), then `XKCD__*`
    /// environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name("config").required(false),
        };

        let config: AppConfig = config::Config::builder()
            .set_default("output_dir", "./output")?
            .set_default("record_file", "xkcd.json")?
            .set_default("threads", DEFAULT_THREADS as i64)?
            .set_default("timeout_secs", 30_i64)?
            .set_default(
                "user_agent",
                concat!("xkcd-fetch/", env!("CARGO_PKG_VERSION")),
            )?
            .add_source(file.format(config::FileFormat::Toml))
            .add_source(
                config::Environment::with_prefix("XKCD")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
            .map_err(|e| anyhow::anyhow!("failed to deserialize configuration: {}", e))?;

        Ok(config)
    }

    /// Call once command-line overrides have been applied.
    pub fn validate(&self) -> Result<()> {
        if self.threads == 0 {
            anyhow::bail!("threads must be at least 1");
        }
        if self.record_file.trim().is_empty() {
            anyhow::bail!("record_file must not be empty");
        }
        Ok(())
    }

    pub fn record_path(&self) -> PathBuf {
        self.output_dir.join(&self.record_file)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn site(&self) -> Result<SiteConfig> {
        match &self.site_file {
            Some(path) => SiteConfig::load(path),
            None => SiteConfig::from_toml(DEFAULT_SITE, "built-in site"),
        }
    }
}

#[derive(Deserialize)]
pub struct SiteConfig {
    pub name: String,
    pub page_url: String,
    #[serde(default)]
    pub skip: Vec<u32>,
    pub page: PageExtractor,
}

impl SiteConfig {
    pub fn load(config_path: &Path) -> Result<Self> {
        let file_content = std::fs::read_to_string(config_path)?;
        Self::from_toml(&file_content, &config_path.display().to_string())
    }

    pub fn from_toml(content: &str, origin: &str) -> Result<Self> {
        let site: SiteConfig = config::Config::builder()
            .add_source(config::File::from_str(content, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
            .map_err(|e| anyhow::anyhow!("failed to deserialize {}: {}", origin, e))?;

        if !PAGE_PLACEHOLDER.is_match(&site.page_url) {
            anyhow::bail!("{}: page_url has no {{page}} placeholder", origin);
        }
        Ok(site)
    }

    pub fn build_url(&self, page: u32) -> String {
        PAGE_PLACEHOLDER
            .replace_all(&self.page_url, page.to_string().as_str())
            .into_owned()
    }

    pub fn is_skipped(&self, page: u32) -> bool {
        self.skip.contains(&page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_site_targets_xkcd() {
        let site = SiteConfig::from_toml(DEFAULT_SITE, "built-in site").unwrap();
        assert_eq!(site.name, "xkcd");
        assert_eq!(site.build_url(353), "https://xkcd.com/353/");
        assert!(site.is_skipped(404));
        assert!(!site.is_skipped(405));
    }

    #[test]
    fn page_url_without_placeholder_is_rejected() {
        let toml = DEFAULT_SITE.replace("{page}", "latest");
        assert!(SiteConfig::from_toml(&toml, "test").is_err());
    }

    #[test]
    fn bad_selector_is_rejected() {
        let toml = DEFAULT_SITE.replace("#ctitle", "##");
        assert!(SiteConfig::from_toml(&toml, "test").is_err());
    }

    #[test]
    fn explicit_config_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fetch.toml");
        std::fs::write(&path, "threads = 5\noutput_dir = \"comics\"\n").unwrap();

        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.threads, 5);
        assert_eq!(config.output_dir, PathBuf::from("comics"));
        assert_eq!(config.record_path(), PathBuf::from("comics").join("xkcd.json"));
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn zero_threads_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fetch.toml");
        std::fs::write(&path, "threads = 0\n").unwrap();

        let mut config = AppConfig::load(Some(&path)).unwrap();
        assert!(config.validate().is_err());

        config.threads = 2;
        assert!(config.validate().is_ok());
    }
}
