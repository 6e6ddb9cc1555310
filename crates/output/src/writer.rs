use crate::error::{ErrorKind, Result};
use cnfdb_repodata::BinaryPackage;
use exn::ResultExt;
use futures::{Stream, StreamExt};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous};
use std::path::{Path, PathBuf};
use tempfile::TempPath;

/// Extension of published databases.
pub const OUTPUT_EXTENSION: &str = "sqlite";
#[cfg(unix)]
const OUTPUT_MODE: u32 = 0o644;

/// What ended up on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteReport {
    pub rows: u64,
    pub path: PathBuf,
}

/// A fresh output database, not yet published.
#[derive(Debug)]
pub struct Writer {
    pool: SqlitePool,
    scratch: TempPath,
    destination: PathBuf,
}

/// An output database with every row committed, waiting to be published.
#[derive(Debug)]
pub struct StagedOutput {
    rows: u64,
    scratch: TempPath,
    destination: PathBuf,
}

impl Writer {
    /// Create an empty `cmdpkg` table in a scratch file inside `dir`, destined
    /// for `{dir}/{name}.sqlite`. `dir` is created if it doesn't exist.
    #[tracing::instrument(skip(dir), fields(dir = %dir.as_ref().display()))]
    pub async fn create(dir: impl AsRef<Path>, name: &str) -> Result<Self> {
        let dir = dir.as_ref();
        if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
            exn::bail!(ErrorKind::InvalidName(name.to_string()));
        }
        tokio::fs::create_dir_all(dir).await.or_raise(|| ErrorKind::Create)?;
        // Same directory as the destination, so publishing is a rename.
        let scratch = tempfile::Builder::new()
            .prefix(&format!(".{name}."))
            .suffix(".tmp")
            .tempfile_in(dir)
            .or_raise(|| ErrorKind::Create)?
            .into_temp_path();

        let options = SqliteConnectOptions::new()
            .filename(&scratch)
            // No `-wal`/`-shm` side files: the file is the whole database.
            .journal_mode(SqliteJournalMode::Delete)
            .synchronous(SqliteSynchronous::Normal);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .or_raise(|| ErrorKind::Create)?;
        sqlx::query(include_str!("../queries/create_cmdpkg.sql"))
            .execute(&pool)
            .await
            .or_raise(|| ErrorKind::Create)?;

        let destination = dir.join(format!("{name}.{OUTPUT_EXTENSION}"));
        Ok(Self { pool, scratch, destination })
    }

    /// Where the database will be published.
    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Insert one row per pair, all in a single transaction, and commit once
    /// `pairs` ends.
    ///
    /// An end of `pairs` is taken at face value. Whether the producer
    /// finished or gave up is for the caller to know before calling
    /// [`StagedOutput::publish`].
    pub async fn insert_all<S>(self, pairs: S) -> Result<StagedOutput>
    where
        S: Stream<Item = BinaryPackage>,
    {
        let mut tx = self.pool.begin().await.or_raise(|| ErrorKind::Insert)?;
        let mut rows = 0u64;
        let mut pairs = Box::pin(pairs);
        while let Some(pair) = pairs.next().await {
            sqlx::query(include_str!("../queries/insert_cmdpkg.sql"))
                .bind(pair.binary)
                .bind(pair.package)
                .execute(&mut *tx)
                .await
                .or_raise(|| ErrorKind::Insert)?;
            rows += 1;
        }
        tx.commit().await.or_raise(|| ErrorKind::Insert)?;
        self.pool.close().await;
        tracing::debug!(rows, "output rows committed");

        Ok(StagedOutput { rows, scratch: self.scratch, destination: self.destination })
    }

    /// [`insert_all`](Self::insert_all) and [`publish`](StagedOutput::publish)
    /// in one go.
    pub async fn write_all<S>(self, pairs: S) -> Result<WriteReport>
    where
        S: Stream<Item = BinaryPackage>,
    {
        self.insert_all(pairs).await?.publish()
    }
}

impl StagedOutput {
    pub fn rows(&self) -> u64 {
        self.rows
    }

    /// Atomically replace `{dir}/{name}.sqlite` with the staged database.
    #[tracing::instrument(skip(self), fields(path = %self.destination.display(), rows = self.rows))]
    pub fn publish(self) -> Result<WriteReport> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.scratch, std::fs::Permissions::from_mode(OUTPUT_MODE))
                .or_raise(|| ErrorKind::Publish)?;
        }
        self.scratch.persist(&self.destination).or_raise(|| ErrorKind::Publish)?;
        tracing::info!("published output database");
        Ok(WriteReport { rows: self.rows, path: self.destination })
    }
}
