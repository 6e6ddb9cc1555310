//! Scanning a filelists database for packages that install commands.

use crate::error::{ErrorKind, Result};
use crate::models::FilelistRow;
use crate::{DatabaseRole, LocalDatabase, PackageBinaries};
use async_stream::stream;
use exn::ResultExt;
use futures::{Stream, StreamExt};

/// Stream every package that installs at least one regular file into a
/// `bin` directory (`/bin`, `/usr/sbin`, `/usr/libexec/foo/bin`, ...), one
/// [`PackageBinaries`] per matching `filelist` row.
///
/// The stream is lazy: nothing is queried until it is first polled, and rows
/// are read one at a time. It takes ownership of `db`, which is closed and
/// deleted once the stream is exhausted or dropped.
///
/// A query or row decoding failure is yielded as a single `Err`, after which
/// the stream ends. Consumers must treat anything received before it as
/// incomplete.
pub fn scan(db: LocalDatabase) -> impl Stream<Item = Result<PackageBinaries>> + Send + 'static {
    // `rustfmt` does not format macros that use braces. Wrap in parentheses!
    stream!({
        if let Err(e) = db.expect_role(DatabaseRole::Filelist) {
            yield Err(e);
            return;
        }
        let pool = match db.connect().await {
            Ok(pool) => pool,
            Err(e) => {
                yield Err(e);
                return;
            },
        };
        tracing::debug!(path = %db.path().display(), "scanning filelist database");

        let mut scanned = 0u64;
        let mut rows = sqlx::query_as::<_, FilelistRow>(include_str!("../queries/select_binaries.sql")).fetch(&pool);
        while let Some(row) = rows.next().await {
            match row.or_raise(|| ErrorKind::Query(DatabaseRole::Filelist)) {
                Ok(row) => {
                    scanned += 1;
                    yield Ok(PackageBinaries::from(row));
                },
                Err(e) => {
                    yield Err(e);
                    return;
                },
            }
        }
        drop(rows);

        pool.close().await;
        tracing::debug!(scanned, "filelist scan complete");
        // Explicit, so the file outlives the pool that has it open.
        drop(db);
    })
}
