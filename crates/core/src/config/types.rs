use serde::{Deserialize, Deserializer, Serialize};
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;
use std::time::Duration;

pub use crate::transformer::TransformerConfig;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub build: BuildConfig,
    #[serde(default)]
    pub transformer: TransformerConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Build configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BuildConfig {
    /// Category identifiers to build, e.g. `pro-regular-svg-icons`.
    #[serde(
        default = "default_styles",
        deserialize_with = "deserialize_styles"
    )]
    pub styles: Vec<String>,

    /// Output root. Wiped at the start of every build.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Directory holding one sub-directory per category.
    #[serde(default = "default_packages_dir")]
    pub packages_dir: PathBuf,

    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    #[serde(default = "default_minify")]
    pub minify: bool,

    /// Per-item timeout in seconds; unset means no timeout.
    #[serde(default)]
    pub item_timeout_secs: Option<u64>,

    /// Fixed UNIX timestamp used for `generatedAt`.
    #[serde(default)]
    pub source_date_epoch: Option<i64>,

    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,

    #[serde(default = "default_file_extension")]
    pub file_extension: String,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            styles: default_styles(),
            output_dir: default_output_dir(),
            packages_dir: default_packages_dir(),
            concurrency: default_concurrency(),
            minify: default_minify(),
            item_timeout_secs: None,
            source_date_epoch: None,
            file_prefix: default_file_prefix(),
            file_extension: default_file_extension(),
        }
    }
}

impl BuildConfig {
    /// Per-item timeout as a duration.
    pub fn item_timeout(&self) -> Option<Duration> {
        self.item_timeout_secs.map(Duration::from_secs)
    }
}

fn default_styles() -> Vec<String> {
    vec!["pro-regular-svg-icons".to_string()]
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./dist")
}

fn default_packages_dir() -> PathBuf {
    PathBuf::from("./node_modules/@fortawesome")
}

fn default_concurrency() -> usize {
    20
}

fn default_minify() -> bool {
    true
}

fn default_file_prefix() -> String {
    "fa".to_string()
}

fn default_file_extension() -> String {
    ".js".to_string()
}

/// Splits a comma-separated style list, trimming entries and dropping empty ones.
pub fn split_styles(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StyleList {
    Joined(String),
    List(Vec<String>),
}

fn deserialize_styles<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match StyleList::deserialize(deserializer)? {
        StyleList::Joined(raw) => split_styles(&raw),
        StyleList::List(list) => list.iter().flat_map(|s| split_styles(s)).collect(),
    })
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    3000
}
