use crate::error::{Error, ErrorKind, Result};
use async_stream::stream;
use cnfdb_asyncutils::handoff;
use cnfdb_config::{Config, JoinMode};
use cnfdb_fetch::error::{Error as FetchError, ErrorKind as FetchErrorKind};
use cnfdb_fetch::{FetchOptions, Fetcher};
use cnfdb_output::{WriteReport, Writer};
use cnfdb_repodata::error::{Error as RepodataError, ErrorKind as RepodataErrorKind};
use cnfdb_repodata::{DatabaseRole, JoinStrategy, LocalDatabase, PackageBinaries, filelist, primary};
use cnfdb_repomd::{DataKind, MetadataEntry, RepoMetadata};
use exn::ResultExt;
use futures::{Stream, StreamExt, TryFutureExt};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;
use tokio::time::Instant;

/// Progress reported by [`Pipeline::events`], in this order:
///
/// 1. [`ManifestFetched`](Self::ManifestFetched)
/// 2. [`EntriesDispatched`](Self::EntriesDispatched)
/// 3. [`FilelistReady`](Self::FilelistReady)
/// 4. [`JoinRunning`](Self::JoinRunning)
/// 5. [`WriteComplete`](Self::WriteComplete)
///
/// Each is emitted exactly once. An error ends the stream early, and nothing
/// is published in that case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    /// The manifest was fetched and parsed.
    ManifestFetched { revision: Option<i64>, entries: usize },
    /// Both required entries were found and their downloads started.
    EntriesDispatched,
    /// Both databases are on local disk and the filelist scan is set up.
    FilelistReady,
    /// Scan, join and writer are running.
    JoinRunning,
    /// The output database has been published.
    WriteComplete(WriteReport),
}
impl Display for Stage {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Stage::ManifestFetched { .. } => write!(f, "manifest fetched"),
            Stage::EntriesDispatched => write!(f, "entries dispatched"),
            Stage::FilelistReady => write!(f, "filelist ready"),
            Stage::JoinRunning => write!(f, "join running"),
            Stage::WriteComplete(_) => write!(f, "write complete"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub fetch: FetchOptions,
    /// Where the output database is published.
    pub output_dir: PathBuf,
    /// File stem of the output database.
    pub output_name: String,
    pub join: JoinStrategy,
    /// Bound on the whole run, from the first poll to publication.
    pub deadline: Option<Duration>,
}
impl From<&Config> for PipelineOptions {
    fn from(config: &Config) -> Self {
        Self {
            fetch: FetchOptions { scratch_dir: config.scratch_dir.clone(), ..Default::default() },
            output_dir: config.dir.clone(),
            output_name: config.output_name().to_string(),
            join: match config.join {
                JoinMode::Point => JoinStrategy::PointQuery,
                JoinMode::Preload => JoinStrategy::Preload,
            },
            deadline: config.deadline(),
        }
    }
}

/// Builds one command-not-found database from one repository.
#[derive(Debug)]
pub struct Pipeline {
    fetcher: Fetcher,
    options: PipelineOptions,
}

impl Pipeline {
    pub fn new(base_url: impl Into<String>, options: PipelineOptions) -> Result<Self> {
        let fetcher = Fetcher::new(base_url, options.fetch.clone()).or_raise(|| ErrorKind::Setup)?;
        Ok(Self { fetcher, options })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.base_url(), PipelineOptions::from(config))
    }

    pub fn base_url(&self) -> &str {
        self.fetcher.base_url()
    }

    /// Run to completion, logging each stage.
    pub async fn run(&self) -> Result<WriteReport> {
        self.run_with_progress(|_| {}).await
    }

    /// Run to completion, handing each stage to `progress` as it is reached.
    #[tracing::instrument(skip_all, fields(base = %self.base_url(), output = %self.options.output_name))]
    pub async fn run_with_progress(&self, mut progress: impl FnMut(&Stage)) -> Result<WriteReport> {
        let mut events = Box::pin(self.events());
        while let Some(stage) = events.next().await {
            let stage = stage?;
            tracing::info!(%stage, "pipeline progress");
            progress(&stage);
            if let Stage::WriteComplete(report) = stage {
                return Ok(report);
            }
        }
        // The stream only ends early after yielding an error.
        exn::bail!(ErrorKind::Write)
    }

    /// Stream the run's [`Stage`]s. Nothing happens until it is polled.
    pub fn events(&self) -> impl Stream<Item = Result<Stage>> + '_ {
        // `rustfmt` does not format macros that use braces. Wrap in parentheses!
        stream!({
            let deadline = self.options.deadline.map(|limit| Instant::now() + limit);

            let fetch_manifest = self.fetcher.manifest().map_err(|e| e.raise(ErrorKind::Manifest));
            let manifest = match within(deadline, fetch_manifest).await {
                Ok(manifest) => manifest,
                Err(e) => {
                    yield Err(e);
                    return;
                },
            };
            yield Ok(Stage::ManifestFetched { revision: manifest.revision, entries: manifest.entries.len() });

            let (filelists, primary) = match required_entries(&manifest) {
                Ok(entries) => entries,
                Err(e) => {
                    yield Err(e);
                    return;
                },
            };
            yield Ok(Stage::EntriesDispatched);

            let (filelist_db, primary_db) = match within(deadline, self.fetch_both(filelists, primary)).await {
                Ok(databases) => databases,
                Err(e) => {
                    yield Err(e);
                    return;
                },
            };
            // The join consumes the scan, so the scan must exist first.
            let binaries = filelist::scan(filelist_db);
            yield Ok(Stage::FilelistReady);

            let writer = match Writer::create(&self.options.output_dir, &self.options.output_name).await {
                Ok(writer) => writer,
                Err(e) => {
                    yield Err(e.raise(ErrorKind::Write));
                    return;
                },
            };
            yield Ok(Stage::JoinRunning);

            let report = match within(deadline, self.join_and_write(binaries, primary_db, writer)).await {
                Ok(report) => report,
                Err(e) => {
                    yield Err(e);
                    return;
                },
            };
            yield Ok(Stage::WriteComplete(report));
        })
    }

    async fn fetch_both(
        &self,
        filelists: &MetadataEntry,
        primary: &MetadataEntry,
    ) -> Result<(LocalDatabase, LocalDatabase)> {
        tokio::try_join!(
            self.fetcher.database(filelists, DatabaseRole::Filelist).map_err(|e| fetch_error(e, &filelists.kind)),
            self.fetcher.database(primary, DatabaseRole::Primary).map_err(|e| fetch_error(e, &primary.kind)),
        )
    }

    /// Drive scan → join → writer with a rendezvous handoff between each
    /// stage, and publish only once every stage has finished cleanly.
    ///
    /// The two pumps and the writer are polled together on the calling task,
    /// so dropping this future stops all of them and releases both scratch
    /// databases.
    async fn join_and_write<S>(&self, binaries: S, primary_db: LocalDatabase, writer: Writer) -> Result<WriteReport>
    where
        S: Stream<Item = std::result::Result<PackageBinaries, RepodataError>> + Send + 'static,
    {
        let (scan_pump, binaries) = handoff(binaries);
        let (join_pump, pairs) = handoff(primary::join(primary_db, binaries.map(Ok), self.options.join));
        let (scanned, joined, staged) = tokio::try_join!(
            scan_pump.map_err(query_error),
            join_pump.map_err(query_error),
            writer.insert_all(pairs).map_err(|e| e.raise(ErrorKind::Write)),
        )?;
        tracing::debug!(scanned, joined, rows = staged.rows(), "all stages finished");
        staged.publish().or_raise(|| ErrorKind::Write)
    }
}

fn required_entries(manifest: &RepoMetadata) -> Result<(&MetadataEntry, &MetadataEntry)> {
    let find = |kind: DataKind| match manifest.find(&kind) {
        Some(entry) => Ok(entry),
        None => Err(Error::from(ErrorKind::NoMetadata(kind))),
    };
    Ok((find(DataKind::FilelistsDb)?, find(DataKind::PrimaryDb)?))
}

async fn within<F, T>(deadline: Option<Instant>, future: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match deadline {
        None => future.await,
        Some(deadline) => match tokio::time::timeout_at(deadline, future).await {
            Ok(result) => result,
            Err(elapsed) => Err(elapsed).or_raise(|| ErrorKind::Timeout),
        },
    }
}

#[track_caller]
fn fetch_error(err: FetchError, kind: &DataKind) -> Error {
    let unreadable = matches!(*err, FetchErrorKind::Decompress | FetchErrorKind::UnsupportedFormat(_));
    if unreadable {
        err.raise(ErrorKind::Decompress(kind.clone()))
    } else {
        err.raise(ErrorKind::Fetch(kind.clone()))
    }
}

#[track_caller]
fn query_error(err: RepodataError) -> Error {
    let role = match *err {
        RepodataErrorKind::Open(role) | RepodataErrorKind::Query(role) => role,
        RepodataErrorKind::Role { expected, .. } => expected,
    };
    err.raise(ErrorKind::Query(role))
}
