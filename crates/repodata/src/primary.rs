//! Resolving package keys to package names against a primary database.

use crate::error::{ErrorKind, Result};
use crate::models::PackageRow;
use crate::{BinaryPackage, DatabaseRole, LocalDatabase, PackageBinaries, PackageKey};
use async_stream::stream;
use exn::ResultExt;
use futures::{Stream, StreamExt};
use sqlx::SqlitePool;
use std::collections::HashMap;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Package builds for this architecture never produce a mapping.
pub const EXCLUDED_ARCH: &str = "i686";

/// How package names are looked up.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum JoinStrategy {
    /// One parameterized query per upstream record. Constant memory.
    #[default]
    PointQuery,
    /// Load every eligible `packages` row into memory up front, then join
    /// in-process.
    Preload,
}
impl JoinStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            JoinStrategy::PointQuery => "point",
            JoinStrategy::Preload => "preload",
        }
    }
}
impl Display for JoinStrategy {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

enum Lookup {
    Point(SqlitePool),
    Preloaded(HashMap<PackageKey, Vec<String>>),
}
impl Lookup {
    async fn open(db: &LocalDatabase, strategy: JoinStrategy) -> Result<(SqlitePool, Self)> {
        let pool = db.connect().await?;
        let lookup = match strategy {
            JoinStrategy::PointQuery => Lookup::Point(pool.clone()),
            JoinStrategy::Preload => Lookup::Preloaded(preload(&pool).await?),
        };
        Ok((pool, lookup))
    }

    async fn names(&self, key: &PackageKey) -> Result<Vec<String>> {
        match self {
            Lookup::Point(pool) => {
                let names: Vec<Option<String>> =
                    sqlx::query_scalar(include_str!("../queries/select_package_names.sql"))
                        .bind(key.as_str())
                        .bind(EXCLUDED_ARCH)
                        .fetch_all(pool)
                        .await
                        .or_raise(|| ErrorKind::Query(DatabaseRole::Primary))?;
                Ok(names.into_iter().flatten().filter(|name| !name.trim().is_empty()).collect())
            },
            Lookup::Preloaded(names) => Ok(names.get(key).cloned().unwrap_or_default()),
        }
    }
}

async fn preload(pool: &SqlitePool) -> Result<HashMap<PackageKey, Vec<String>>> {
    let rows: Vec<PackageRow> = sqlx::query_as(include_str!("../queries/select_all_package_names.sql"))
        .bind(EXCLUDED_ARCH)
        .fetch_all(pool)
        .await
        .or_raise(|| ErrorKind::Query(DatabaseRole::Primary))?;
    let mut names: HashMap<PackageKey, Vec<String>> = HashMap::new();
    for row in rows {
        let Some(name) = row.name.filter(|name| !name.trim().is_empty()) else {
            continue;
        };
        names.entry(PackageKey::from(row.pkg_key)).or_default().push(name);
    }
    tracing::debug!(keys = names.len(), "preloaded package names");
    Ok(names)
}

/// Join every upstream record against the `packages` table of `db`,
/// yielding one [`BinaryPackage`] per (binary, matched name) combination.
///
/// Builds for [`EXCLUDED_ARCH`] are ignored, as are blank or `NULL` names.
/// A key may match several rows (one per remaining architecture); each match
/// is expanded in full, so duplicates are possible and are kept.
///
/// The first error, whether from `upstream` or from a query, is yielded once
/// and ends the stream. `db` is closed and deleted once the stream is
/// exhausted or dropped.
pub fn join<S>(
    db: LocalDatabase,
    upstream: S,
    strategy: JoinStrategy,
) -> impl Stream<Item = Result<BinaryPackage>> + Send + 'static
where
    S: Stream<Item = Result<PackageBinaries>> + Send + 'static,
{
    stream!({
        if let Err(e) = db.expect_role(DatabaseRole::Primary) {
            yield Err(e);
            return;
        }
        let (pool, lookup) = match Lookup::open(&db, strategy).await {
            Ok(opened) => opened,
            Err(e) => {
                yield Err(e);
                return;
            },
        };
        tracing::debug!(path = %db.path().display(), %strategy, "joining against primary database");

        let mut joined = 0u64;
        let mut upstream = Box::pin(upstream);
        while let Some(record) = upstream.next().await {
            let record = match record {
                Ok(record) => record,
                Err(e) => {
                    yield Err(e);
                    return;
                },
            };
            let names = match lookup.names(&record.key).await {
                Ok(names) => names,
                Err(e) => {
                    yield Err(e);
                    return;
                },
            };
            for name in &names {
                for binary in &record.binaries {
                    joined += 1;
                    yield Ok(BinaryPackage::new(binary.as_str(), name.as_str()));
                }
            }
        }

        drop(lookup);
        pool.close().await;
        tracing::debug!(joined, "primary join complete");
        drop(db);
    })
}
