use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use ladder_crawl::{CrawlSettings, TargetRegistry};
use serde::{Deserialize, Serialize};

/// Config file read from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "ladder.toml";
pub const ENV_PREFIX: &str = "LADDER_";

/// Layered configuration.
///
/// ```toml
/// [crawl]
/// workers = 4
/// data_root = "/var/lib/ladder"
///
/// [targets]
/// staging = "https://staging.example/"
/// ```
///
/// `LADDER_<FIELD>` variables override `[crawl]` fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawl:   CrawlSettings,
    /// Added to, or replacing, the built-in targets.
    pub targets: BTreeMap<String, String>,
}

/// Command-line values that take precedence over every other layer.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CrawlOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_root: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workers:   Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefetch:  Option<usize>,
}

#[derive(Serialize)]
struct Overrides<'a> {
    crawl: &'a CrawlOverrides,
}

impl Config {
    pub fn figment(file: &Path, overrides: &CrawlOverrides) -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(file))
            .merge(crawl_env())
            .merge(Serialized::defaults(Overrides { crawl: overrides }))
    }

    pub fn load(file: &Path, overrides: &CrawlOverrides) -> Result<Self, figment::Error> {
        Self::figment(file, overrides).extract()
    }

    pub fn registry(&self) -> TargetRegistry {
        let mut registry = TargetRegistry::builtin();
        registry.extend(&self.targets);
        registry
    }
}

/// `LADDER_WORKERS=4` becomes `crawl.workers = 4`.
fn crawl_env() -> Env {
    Env::prefixed(ENV_PREFIX).map(|key| format!("crawl.{}", key.as_str().to_ascii_lowercase()).into())
}
