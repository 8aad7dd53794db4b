use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Deserialize;

/// Where and how to load one agency's feed
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub agency: String,
    pub source: SourceConfig,
    /// Separates fields in every file. Must be ASCII.
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
    /// Hex without `#`, for routes with no `route_color`
    #[serde(default = "default_route_color")]
    pub route_color_fallback: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SourceConfig {
    /// Base URL the files are served under
    Http { url: String },
    Dir { path: PathBuf },
    Zip {
        path: PathBuf,
        /// Directory inside the archive holding the files
        #[serde(default)]
        prefix: Option<String>,
    },
}

fn default_delimiter() -> char {
    ','
}

fn default_route_color() -> String {
    "007bff".to_string()
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|err| anyhow!("{}: {err}", path.as_ref().display()))?;
        Self::parse(&content)
    }

    pub fn parse(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.delimiter_byte()?;
        Ok(config)
    }

    /// A config for files laid out like `{dir}/{agency}/stops.txt`
    pub fn for_dir<P: AsRef<Path>>(dir: P, agency: &str) -> Self {
        Self {
            agency: agency.to_string(),
            source: SourceConfig::Dir {
                path: dir.as_ref().join(agency),
            },
            delimiter: default_delimiter(),
            route_color_fallback: default_route_color(),
        }
    }

    pub fn delimiter_byte(&self) -> Result<u8> {
        if !self.delimiter.is_ascii() {
            bail!("Delimiter {:?} isn't ASCII", self.delimiter);
        }
        Ok(self.delimiter as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::parse(
            "agency: autobusosalmassora\nsource:\n  kind: http\n  url: https://example.org/data/autobusosalmassora/\n",
        )
        .unwrap();
        assert_eq!(config.agency, "autobusosalmassora");
        assert_eq!(
            config.source,
            SourceConfig::Http {
                url: "https://example.org/data/autobusosalmassora/".to_string()
            }
        );
        assert_eq!(config.delimiter_byte().unwrap(), b',');
        assert_eq!(config.route_color_fallback, "007bff");
    }

    #[test]
    fn zip_with_prefix() {
        let config = Config::parse(
            "agency: x\nsource:\n  kind: zip\n  path: feeds/x.zip\n  prefix: gtfs\ndelimiter: ';'\nroute_color_fallback: '333333'\n",
        )
        .unwrap();
        assert_eq!(
            config.source,
            SourceConfig::Zip {
                path: PathBuf::from("feeds/x.zip"),
                prefix: Some("gtfs".to_string()),
            }
        );
        assert_eq!(config.delimiter_byte().unwrap(), b';');
        assert_eq!(config.route_color_fallback, "333333");
    }

    #[test]
    fn bad_configs() {
        assert!(Config::parse("agency: x\nsource:\n  kind: ftp\n  url: x\n").is_err());
        assert!(Config::parse("agency: x\nsource:\n  kind: dir\n  path: d\ndelimiter: '→'\n").is_err());
        assert!(Config::load("/nonexistent/config.yaml").is_err());
    }

    #[test]
    fn dir_layout() {
        let config = Config::for_dir("./data", "autobusosalmassora");
        assert_eq!(
            config.source,
            SourceConfig::Dir {
                path: PathBuf::from("./data/autobusosalmassora")
            }
        );
    }
}
