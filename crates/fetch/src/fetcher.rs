use crate::error::{ErrorKind, Result};
use cnfdb_compress::Compression;
use cnfdb_repodata::{DatabaseRole, LocalDatabase};
use cnfdb_repomd::{MetadataEntry, RepoMetadata};
use exn::ResultExt;
use futures::io::AsyncReadExt;
use futures::{StreamExt, TryStreamExt, stream};
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::AsyncWriteExt;

/// Path of the manifest, relative to the repository base URL.
pub const MANIFEST_PATH: &str = "repodata/repomd.xml";
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
// Decompressed bytes copied per write.
const CHUNK_SIZE: usize = 64 * 1024;

#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    /// Directory decompressed databases are written to. Defaults to the
    /// system temporary directory.
    pub scratch_dir: Option<PathBuf>,
    /// Give up on establishing a connection after this long. Transfers
    /// themselves are not bounded.
    pub connect_timeout: Option<Duration>,
}

/// Retrieves metadata from a single repository.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: reqwest::Client,
    base: String,
    options: FetchOptions,
}

impl Fetcher {
    pub fn new(base_url: impl Into<String>, options: FetchOptions) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = options.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        let client = builder.build().or_raise(|| ErrorKind::Client)?;
        let base = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base, options })
    }

    pub fn base_url(&self) -> &str {
        &self.base
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base, path.trim_start_matches('/'))
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response> {
        let response = self.client.get(url).send().await.or_raise(|| ErrorKind::Network)?;
        let status = response.status();
        if !status.is_success() {
            exn::bail!(ErrorKind::Status(status.as_u16()));
        }
        Ok(response)
    }

    /// Fetch and parse the repository manifest.
    #[tracing::instrument(skip(self), fields(base = %self.base))]
    pub async fn manifest(&self) -> Result<RepoMetadata> {
        let response = self.get(&self.url(MANIFEST_PATH)).await?;
        let body = response.text().await.or_raise(|| ErrorKind::Network)?;
        let manifest = RepoMetadata::parse(&body).or_raise(|| ErrorKind::Manifest)?;
        tracing::debug!(revision = ?manifest.revision, entries = manifest.entries.len(), "fetched manifest");
        Ok(manifest)
    }

    /// Fetch the payload `entry` points at and decompress it into a scratch
    /// file, handed back as a [`LocalDatabase`] with the given `role`.
    ///
    /// Only bzip2 payloads are accepted. The `href` extension is checked
    /// before anything is requested, and the first bytes of the body are
    /// checked before anything is written. The scratch file is removed if
    /// anything fails along the way.
    #[tracing::instrument(skip(self, entry), fields(kind = %entry.kind, href = %entry.location.href))]
    pub async fn database(&self, entry: &MetadataEntry, role: DatabaseRole) -> Result<LocalDatabase> {
        let href = entry.location.href.as_str();
        let compression = Compression::try_from_path(href)
            .or_raise(|| ErrorKind::UnsupportedFormat(href.to_string()))?;
        if compression != Compression::Bzip2 {
            exn::bail!(ErrorKind::UnsupportedFormat(href.to_string()));
        }

        let mut builder = tempfile::Builder::new();
        let prefix = format!("{}.", entry.kind);
        builder.prefix(&prefix).suffix(".sqlite");
        let scratch = match &self.options.scratch_dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        }
        .or_raise(|| ErrorKind::Io)?;
        let (file, path) = scratch.into_parts();
        let mut file = tokio::fs::File::from_std(file);

        let response = self.get(&self.url(href)).await?;
        let mut body = Box::pin(response.bytes_stream());
        let first = loop {
            match body.next().await {
                Some(chunk) => {
                    let chunk = chunk.or_raise(|| ErrorKind::Network)?;
                    if !chunk.is_empty() {
                        break chunk;
                    }
                },
                // An empty body is a truncated stream, not a different format.
                None => exn::bail!(ErrorKind::Decompress),
            }
        };
        if !compression.check_magic_bytes(&first) {
            exn::bail!(ErrorKind::UnsupportedFormat(format!("{href}: not {compression}")));
        }

        let reader = stream::iter([Ok(first)]).chain(body).map_err(io::Error::other).into_async_read();
        let mut decoder = compression.async_wrap_reader(reader);
        let mut buf = vec![0u8; CHUNK_SIZE];
        let mut written = 0u64;
        loop {
            let read = match decoder.read(&mut buf).await {
                Ok(0) => break,
                Ok(read) => read,
                Err(e) => {
                    let kind = classify(&e);
                    return Err(e).or_raise(|| kind);
                },
            };
            file.write_all(&buf[..read]).await.or_raise(|| ErrorKind::Io)?;
            written += read as u64;
        }
        file.flush().await.or_raise(|| ErrorKind::Io)?;
        drop(file);

        tracing::debug!(
            bytes = written,
            modified = ?entry.modified(),
            path = %path.display(),
            "materialized database"
        );
        Ok(LocalDatabase::new(path, role))
    }
}

/// Transport errors come back through the decoder wrapped in an
/// [`io::Error`]; anything else came from the decoder itself.
fn classify(err: &io::Error) -> ErrorKind {
    if err.get_ref().is_some_and(|inner| inner.is::<reqwest::Error>()) {
        ErrorKind::Network
    } else {
        ErrorKind::Decompress
    }
}
