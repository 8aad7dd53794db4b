use std::collections::BTreeMap;
use std::io::{Cursor, Read};
use std::path::PathBuf;

use anyhow::Result;
use zip::ZipArchive;

/// Somewhere the raw text of a feed's files can be fetched from. Each fetch may suspend
/// independently.
#[allow(async_fn_in_trait)]
pub trait Source {
    /// For log messages
    fn describe(&self) -> String;

    async fn fetch(&self, file: &str) -> Result<String>;
}

/// Files served under one base URL, like `https://example.org/data/agency/`
pub struct HttpSource {
    client: reqwest::Client,
    base: reqwest::Url,
}

impl HttpSource {
    pub fn new(base_url: &str) -> Result<Self> {
        // Without the trailing slash, joining would replace the last path segment
        let mut base = base_url.to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base = reqwest::Url::parse(&base).map_err(|err| anyhow!("{base_url}: {err}"))?;
        Ok(Self {
            client: reqwest::Client::new(),
            base,
        })
    }
}

impl Source for HttpSource {
    fn describe(&self) -> String {
        self.base.to_string()
    }

    async fn fetch(&self, file: &str) -> Result<String> {
        let url = self.base.join(file)?;
        let resp = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|err| anyhow!("{url}: {err}"))?
            .error_for_status()
            .map_err(|err| anyhow!("{url}: {err}"))?;
        Ok(resp.text().await?)
    }
}

/// An unpacked feed on disk
pub struct DirSource {
    dir: PathBuf,
}

impl DirSource {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }
}

impl Source for DirSource {
    fn describe(&self) -> String {
        self.dir.display().to_string()
    }

    async fn fetch(&self, file: &str) -> Result<String> {
        let path = self.dir.join(file);
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|err| anyhow!("{}: {err}", path.display()))
    }
}

/// A zipped feed on disk. Feeds are often zipped with everything inside one directory; set
/// `prefix` to that directory.
pub struct ZipSource {
    path: PathBuf,
    prefix: Option<String>,
}

impl ZipSource {
    pub fn new<P: Into<PathBuf>>(path: P, prefix: Option<String>) -> Self {
        Self {
            path: path.into(),
            prefix,
        }
    }
}

impl Source for ZipSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch(&self, file: &str) -> Result<String> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|err| anyhow!("{}: {err}", self.path.display()))?;
        let mut archive = ZipArchive::new(Cursor::new(bytes))?;
        let name = match self.prefix {
            Some(ref prefix) => format!("{}/{file}", prefix.trim_end_matches('/')),
            None => file.to_string(),
        };
        let mut text = String::new();
        get_zip_file(&mut archive, &name)?.read_to_string(&mut text)?;
        Ok(text)
    }
}

// Adds the path in the error message
fn get_zip_file<'a, R: std::io::Read + std::io::Seek>(
    archive: &'a mut ZipArchive<R>,
    path: &str,
) -> Result<zip::read::ZipFile<'a>> {
    archive
        .by_name(path)
        .map_err(|err| anyhow!("{path}: {err}"))
}

/// Files already in memory, for embedding a feed in the binary
#[derive(Default)]
pub struct MemorySource {
    files: BTreeMap<String, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<K: Into<String>, V: Into<String>>(mut self, file: K, text: V) -> Self {
        self.files.insert(file.into(), text.into());
        self
    }
}

impl Source for MemorySource {
    fn describe(&self) -> String {
        format!("{} files in memory", self.files.len())
    }

    async fn fetch(&self, file: &str) -> Result<String> {
        match self.files.get(file) {
            Some(text) => Ok(text.clone()),
            None => bail!("{file} isn't in memory"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("gtfs-source-{}-{name}", std::process::id()))
    }

    #[tokio::test]
    async fn memory() {
        let source = MemorySource::new().with("stops.txt", "stop_id\n1\n");
        assert_eq!(source.fetch("stops.txt").await.unwrap(), "stop_id\n1\n");
        assert!(source.fetch("routes.txt").await.is_err());
    }

    #[tokio::test]
    async fn dir() {
        let dir = scratch_path("dir");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("routes.txt"), "route_id\nR1\n").unwrap();

        let source = DirSource::new(&dir);
        assert_eq!(source.fetch("routes.txt").await.unwrap(), "route_id\nR1\n");
        let err = source.fetch("shapes.txt").await.unwrap_err().to_string();
        assert!(err.contains("shapes.txt"));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn zip_with_prefix() {
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        zip.start_file("feed/trips.txt", zip::write::FileOptions::default())
            .unwrap();
        zip.write_all(b"trip_id,route_id\nT1,R1\n").unwrap();
        let bytes = zip.finish().unwrap().into_inner();
        let path = scratch_path("feed.zip");
        std::fs::write(&path, bytes).unwrap();

        let source = ZipSource::new(&path, Some("feed/".to_string()));
        assert_eq!(
            source.fetch("trips.txt").await.unwrap(),
            "trip_id,route_id\nT1,R1\n"
        );
        let err = source.fetch("shapes.txt").await.unwrap_err().to_string();
        assert!(err.contains("feed/shapes.txt"));

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn http_base_gets_trailing_slash() {
        let source = HttpSource::new("https://example.org/data/agency").unwrap();
        assert_eq!(source.describe(), "https://example.org/data/agency/");
        assert!(HttpSource::new("not a url").is_err());
    }
}
