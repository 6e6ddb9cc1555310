//! Test fixtures: small createrepo-shaped databases built on the fly.
//!
//! Available to this crate's tests, and to other crates through the
//! `fixture` feature (intended for dev-dependencies only). Everything in here
//! panics on failure, like any other test code.

use crate::{DatabaseRole, LocalDatabase};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::path::Path;

/// The parts of the createrepo `filelists.sqlite` schema this crate reads.
pub const FILELISTS_SCHEMA: &str = r#"
    CREATE TABLE db_info (dbversion INTEGER, checksum TEXT);
    CREATE TABLE packages (pkgKey INTEGER PRIMARY KEY, pkgId TEXT);
    CREATE TABLE filelist (pkgKey INTEGER, dirname TEXT, filenames TEXT, filetypes TEXT);
    CREATE INDEX keyfile ON filelist (pkgKey);
    CREATE INDEX dirnames ON filelist (dirname);
"#;

/// The parts of the createrepo `primary.sqlite` schema this crate reads.
///
/// `pkgKey` is deliberately not a primary key, so multi-arch fixtures can
/// share a key.
pub const PRIMARY_SCHEMA: &str = r#"
    CREATE TABLE db_info (dbversion INTEGER, checksum TEXT);
    CREATE TABLE packages (
        pkgKey INTEGER,
        pkgId TEXT,
        name TEXT,
        arch TEXT,
        version TEXT,
        epoch TEXT,
        release TEXT,
        summary TEXT
    );
    CREATE INDEX packagename ON packages (name);
"#;

/// A `filelist` row: `(pkgKey, dirname, filenames, filetypes)`.
pub type FilelistFixture<'a> = (&'a str, &'a str, &'a str, &'a str);
/// A `packages` row: `(pkgKey, name, arch)`.
pub type PackageFixture<'a> = (&'a str, Option<&'a str>, &'a str);

/// Build a filelists database in `dir`.
pub async fn filelists(dir: &Path, rows: &[FilelistFixture<'_>]) -> LocalDatabase {
    let path = scratch(dir);
    let pool = create(&path, FILELISTS_SCHEMA).await;
    for (key, dirname, filenames, filetypes) in rows {
        sqlx::query("INSERT INTO filelist (pkgKey, dirname, filenames, filetypes) VALUES (?, ?, ?, ?)")
            .bind(*key)
            .bind(*dirname)
            .bind(*filenames)
            .bind(*filetypes)
            .execute(&pool)
            .await
            .expect("fixture row to insert");
    }
    pool.close().await;
    LocalDatabase::new(path, DatabaseRole::Filelist)
}

/// Build a primary database in `dir`.
pub async fn primary(dir: &Path, rows: &[PackageFixture<'_>]) -> LocalDatabase {
    let path = scratch(dir);
    let pool = create(&path, PRIMARY_SCHEMA).await;
    for (key, name, arch) in rows {
        sqlx::query("INSERT INTO packages (pkgKey, name, arch, version, release) VALUES (?, ?, ?, '1.0', '1.el7')")
            .bind(*key)
            .bind(*name)
            .bind(*arch)
            .execute(&pool)
            .await
            .expect("fixture row to insert");
    }
    pool.close().await;
    LocalDatabase::new(path, DatabaseRole::Primary)
}

/// Build a database in `dir` from arbitrary SQL, for schemas that are wrong
/// on purpose.
pub async fn custom(dir: &Path, role: DatabaseRole, sql: &str) -> LocalDatabase {
    let path = scratch(dir);
    create(&path, sql).await.close().await;
    LocalDatabase::new(path, role)
}

fn scratch(dir: &Path) -> tempfile::TempPath {
    tempfile::Builder::new()
        .prefix("fixture.")
        .suffix(".sqlite")
        .tempfile_in(dir)
        .expect("fixture file to be created")
        .into_temp_path()
}

async fn create(path: &Path, sql: &str) -> sqlx::SqlitePool {
    let options = SqliteConnectOptions::new().filename(path).create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .expect("fixture database to open");
    sqlx::raw_sql(sql).execute(&pool).await.expect("fixture schema to apply");
    pool
}
