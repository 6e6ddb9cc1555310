//! Decompressed metadata databases on local disk.

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::Path;
use tempfile::TempPath;

// Each database is read by exactly one stage, one query at a time.
const MAX_CONNECTIONS: u32 = 1;

/// Which of the two createrepo schemas a database follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatabaseRole {
    /// `filelists.sqlite`
    Filelist,
    /// `primary.sqlite`
    Primary,
}
impl DatabaseRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            DatabaseRole::Filelist => "filelist",
            DatabaseRole::Primary => "primary",
        }
    }
}
impl Display for DatabaseRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

/// A decompressed metadata database, materialized as a temporary file.
///
/// Owns the file: dropping the handle deletes it. Stages that consume a
/// `LocalDatabase` hold on to it for exactly as long as their stream lives.
#[derive(Debug)]
pub struct LocalDatabase {
    path: TempPath,
    role: DatabaseRole,
}
impl LocalDatabase {
    pub fn new(path: TempPath, role: DatabaseRole) -> Self {
        Self { path, role }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn role(&self) -> DatabaseRole {
        self.role
    }

    pub(crate) fn expect_role(&self, expected: DatabaseRole) -> Result<()> {
        if self.role != expected {
            exn::bail!(ErrorKind::Role { expected, found: self.role });
        }
        Ok(())
    }

    /// Open a read-only connection pool to the database.
    pub(crate) async fn connect(&self) -> Result<SqlitePool> {
        let options = SqliteConnectOptions::new()
            .filename(self.path())
            // Never create an empty database in place of a missing one.
            .create_if_missing(false)
            .read_only(true);
        SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect_with(options)
            .await
            .or_raise(|| ErrorKind::Open(self.role))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture;

    #[tokio::test]
    async fn test_dropping_handle_deletes_file() {
        let dir = tempfile::tempdir().unwrap();
        let db = fixture::filelists(dir.path(), &[]).await;
        let path = db.path().to_path_buf();
        assert!(path.exists());
        drop(db);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_connect_is_read_only() {
        let dir = tempfile::tempdir().unwrap();
        let db = fixture::primary(dir.path(), &[("1", Some("bash"), "x86_64")]).await;
        let pool = db.connect().await.unwrap();
        let insert = sqlx::query("INSERT INTO packages (pkgKey, name, arch) VALUES (2, 'zsh', 'x86_64')")
            .execute(&pool)
            .await;
        assert!(insert.is_err());
        pool.close().await;
    }

    #[tokio::test]
    async fn test_connect_to_garbage_fails_on_first_query() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = tempfile::NamedTempFile::new_in(dir.path()).unwrap();
        std::io::Write::write_all(&mut file, b"this is not an sqlite database, not even close").unwrap();
        let db = LocalDatabase::new(file.into_temp_path(), DatabaseRole::Filelist);
        // SQLite only validates the header lazily, so either step may fail.
        let result = match db.connect().await {
            Ok(pool) => sqlx::query("SELECT 1 FROM filelist").execute(&pool).await.map(|_| ()).map_err(|_| ()),
            Err(_) => Err(()),
        };
        assert!(result.is_err());
    }

    #[test]
    fn test_expect_role() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let db = LocalDatabase::new(file.into_temp_path(), DatabaseRole::Primary);
        assert!(db.expect_role(DatabaseRole::Primary).is_ok());
        let err = db.expect_role(DatabaseRole::Filelist).unwrap_err();
        assert_eq!(*err, ErrorKind::Role { expected: DatabaseRole::Filelist, found: DatabaseRole::Primary });
    }
}
