// File: src/backup.rs
// Purpose: Database backups (pg_dump for PostgreSQL, VACUUM INTO for SQLite),
// listing and retention pruning, plus the optional in-server schedule

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, SystemTime};

use chrono::{DateTime, Local};
use tokio::process::Command;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use walkdir::WalkDir;

use crate::config::BackupConfig;
use crate::database::{Database, DatabaseType};

pub const FILE_PREFIX: &str = "backup_egresados_";

/// How long a candidate gets to answer `--version`
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Longest stderr excerpt carried in an error
const STDERR_LIMIT: usize = 500;

const SECONDS_PER_DAY: u64 = 24 * 3600;

#[derive(Debug, thiserror::Error)]
pub enum BackupError {
    #[error("could not create backup directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("pg_dump not found (tried: {0})")]
    PgDumpNotFound(String),
    #[error("pg_dump failed with exit code {code}: {stderr}")]
    DumpFailed { code: String, stderr: String },
    #[error("backup did not finish within {0:?}")]
    Timeout(Duration),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// A backup file on disk
#[derive(Debug, Clone, PartialEq)]
pub struct BackupFile {
    pub path: PathBuf,
    pub name: String,
    pub size: u64,
    pub modified: DateTime<Local>,
}

impl BackupFile {
    fn from_path(path: &Path) -> std::io::Result<Self> {
        let meta = std::fs::metadata(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            size: meta.len(),
            modified: DateTime::<Local>::from(meta.modified()?),
        })
    }

    pub fn size_mb(&self) -> f64 {
        self.size as f64 / (1024.0 * 1024.0)
    }
}

// ============================================================================
// PURE FUNCTIONS
// ============================================================================

/// `backup_egresados_<YYYYMMDD_HHMMSS>.sql` for PostgreSQL, `.db` for SQLite
pub fn backup_file_name(kind: DatabaseType, at: DateTime<Local>) -> String {
    let extension = match kind {
        DatabaseType::PostgreSQL => "sql",
        DatabaseType::SQLite => "db",
    };
    format!("{}{}.{}", FILE_PREFIX, at.format("%Y%m%d_%H%M%S"), extension)
}

pub fn is_backup_file(name: &str) -> bool {
    name.starts_with(FILE_PREFIX) && (name.ends_with(".sql") || name.ends_with(".db"))
}

/// Cut stderr to at most `limit` characters
pub fn truncate_stderr(stderr: &str, limit: usize) -> String {
    stderr.trim().chars().take(limit).collect()
}

/// Strictly older than the retention window
pub fn is_expired(modified: SystemTime, now: SystemTime, retention_days: u64) -> bool {
    now.duration_since(modified)
        .map(|age| age.as_secs() > retention_days * SECONDS_PER_DAY)
        .unwrap_or(false)
}

// ============================================================================
// BACKUP
// ============================================================================

/// First candidate that answers `--version` successfully
pub async fn find_pg_dump(candidates: &[String]) -> Option<String> {
    for candidate in candidates {
        let probe = Command::new(candidate)
            .arg("--version")
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output();

        match tokio::time::timeout(PROBE_TIMEOUT, probe).await {
            Ok(Ok(output)) if output.status.success() => {
                debug!("Using {}: {}", candidate, String::from_utf8_lossy(&output.stdout).trim());
                return Some(candidate.clone());
            }
            Ok(Ok(_)) => debug!("{} --version failed", candidate),
            Ok(Err(e)) => debug!("{} not usable: {}", candidate, e),
            Err(_) => debug!("{} --version timed out", candidate),
        }
    }
    None
}

fn ensure_dir(dir: &Path) -> Result<(), BackupError> {
    if !dir.exists() {
        std::fs::create_dir_all(dir).map_err(|source| BackupError::CreateDir {
            path: dir.to_path_buf(),
            source,
        })?;
        info!("Created backup directory {:?}", dir);
    }
    Ok(())
}

async fn dump_postgres(
    database_url: &str,
    target: &Path,
    config: &BackupConfig,
) -> Result<(), BackupError> {
    let pg_dump = find_pg_dump(&config.pg_dump_candidates)
        .await
        .ok_or_else(|| BackupError::PgDumpNotFound(config.pg_dump_candidates.join(", ")))?;

    let dump = Command::new(&pg_dump)
        .arg(database_url)
        .arg("-f")
        .arg(target)
        .stdin(Stdio::null())
        .kill_on_drop(true)
        .output();

    let output = match tokio::time::timeout(config.timeout(), dump).await {
        Ok(result) => result?,
        Err(_) => {
            let _ = std::fs::remove_file(target);
            return Err(BackupError::Timeout(config.timeout()));
        }
    };

    if !output.status.success() {
        let _ = std::fs::remove_file(target);
        return Err(BackupError::DumpFailed {
            code: output
                .status
                .code()
                .map(|c| c.to_string())
                .unwrap_or_else(|| "signal".to_string()),
            stderr: truncate_stderr(&String::from_utf8_lossy(&output.stderr), STDERR_LIMIT),
        });
    }

    Ok(())
}

/// Write a new backup into `config.dir` and describe it
pub async fn run_backup(
    db: &Database,
    database_url: &str,
    config: &BackupConfig,
) -> Result<BackupFile, BackupError> {
    ensure_dir(&config.dir)?;

    let target = config.dir.join(backup_file_name(db.kind(), Local::now()));
    info!("Starting backup into {:?}", target);

    match db.kind() {
        DatabaseType::PostgreSQL => dump_postgres(database_url, &target, config).await?,
        DatabaseType::SQLite => {
            let vacuum = db.vacuum_into(&target.to_string_lossy());
            match tokio::time::timeout(config.timeout(), vacuum).await {
                Ok(result) => result?,
                Err(_) => return Err(BackupError::Timeout(config.timeout())),
            }
        }
    }

    let file = BackupFile::from_path(&target)?;
    info!("Backup complete: {} ({:.2} MB)", file.name, file.size_mb());
    Ok(file)
}

// ============================================================================
// LISTING AND RETENTION
// ============================================================================

/// Backups in `dir`, newest first; a missing directory has none
pub fn list_backups(dir: &Path) -> Result<Vec<BackupFile>, BackupError> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry in {:?}: {}", dir, e);
                continue;
            }
        };

        if entry.file_type().is_file() && is_backup_file(&entry.file_name().to_string_lossy()) {
            files.push(BackupFile::from_path(entry.path())?);
        }
    }

    // the timestamp in the name sorts chronologically
    files.sort_by(|a, b| b.name.cmp(&a.name));
    Ok(files)
}

/// Delete backups older than `retention_days`, returning what was removed
pub fn prune_backups(dir: &Path, retention_days: u64) -> Result<Vec<BackupFile>, BackupError> {
    prune_backups_at(dir, retention_days, SystemTime::now())
}

pub fn prune_backups_at(
    dir: &Path,
    retention_days: u64,
    now: SystemTime,
) -> Result<Vec<BackupFile>, BackupError> {
    let mut removed = Vec::new();

    for file in list_backups(dir)? {
        let modified = SystemTime::from(file.modified);
        if is_expired(modified, now, retention_days) {
            std::fs::remove_file(&file.path)?;
            info!("Pruned old backup {}", file.name);
            removed.push(file);
        }
    }

    Ok(removed)
}

// ============================================================================
// SCHEDULE
// ============================================================================

/// Periodic backup then prune; `None` when `interval_hours` is 0
pub fn spawn_schedule(
    db: Database,
    database_url: String,
    config: BackupConfig,
) -> Option<JoinHandle<()>> {
    let period = config.interval()?;
    info!("Backups scheduled every {} h into {:?}", config.interval_hours, config.dir);

    Some(tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        // the first tick fires immediately; the first backup waits one period
        ticker.tick().await;

        loop {
            ticker.tick().await;

            match run_backup(&db, &database_url, &config).await {
                Ok(file) => info!("Scheduled backup written: {}", file.name),
                Err(e) => {
                    error!("Scheduled backup failed: {}", e);
                    continue;
                }
            }

            match prune_backups(&config.dir, config.retention_days) {
                Ok(removed) if !removed.is_empty() => {
                    info!("Pruned {} old backup(s)", removed.len())
                }
                Ok(_) => {}
                Err(e) => warn!("Pruning backups failed: {}", e),
            }
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use std::fs::File;

    fn touch(dir: &Path, name: &str, age_days: u64) -> PathBuf {
        let path = dir.join(name);
        let file = File::create(&path).unwrap();
        let modified = SystemTime::now() - Duration::from_secs(age_days * SECONDS_PER_DAY);
        file.set_modified(modified).unwrap();
        path
    }

    #[test]
    fn test_backup_file_name() {
        let at = Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(
            backup_file_name(DatabaseType::PostgreSQL, at),
            "backup_egresados_20240309_070501.sql"
        );
        assert_eq!(
            backup_file_name(DatabaseType::SQLite, at),
            "backup_egresados_20240309_070501.db"
        );
    }

    #[test]
    fn test_is_backup_file() {
        assert!(is_backup_file("backup_egresados_20240309_070501.sql"));
        assert!(is_backup_file("backup_egresados_20240309_070501.db"));
        assert!(!is_backup_file("notes.sql"));
        assert!(!is_backup_file("backup_egresados_20240309_070501.sql.gz"));
    }

    #[test]
    fn test_truncate_stderr_is_char_safe() {
        let long = "é".repeat(600);
        assert_eq!(truncate_stderr(&long, STDERR_LIMIT).chars().count(), 500);
        assert_eq!(truncate_stderr("  short\n", STDERR_LIMIT), "short");
    }

    #[test]
    fn test_is_expired() {
        let now = SystemTime::now();
        let day = Duration::from_secs(SECONDS_PER_DAY);
        assert!(is_expired(now - day * 31, now, 30));
        assert!(!is_expired(now - day * 29, now, 30));
        // exactly at the boundary is kept
        assert!(!is_expired(now - day * 30, now, 30));
        // clock skew: modified in the future
        assert!(!is_expired(now + day, now, 30));
    }

    #[test]
    fn test_list_newest_first_and_ignores_other_files() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "backup_egresados_20240101_000000.sql", 0);
        touch(dir.path(), "backup_egresados_20240301_000000.db", 0);
        touch(dir.path(), "backup_egresados_20240201_000000.sql", 0);
        touch(dir.path(), "readme.txt", 0);

        let names: Vec<_> = list_backups(dir.path()).unwrap().into_iter().map(|f| f.name).collect();
        assert_eq!(
            names,
            vec![
                "backup_egresados_20240301_000000.db",
                "backup_egresados_20240201_000000.sql",
                "backup_egresados_20240101_000000.sql",
            ]
        );
    }

    #[test]
    fn test_list_missing_dir_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(list_backups(&dir.path().join("nope")).unwrap().is_empty());
    }

    #[test]
    fn test_prune_removes_only_old_backups() {
        let dir = tempfile::tempdir().unwrap();
        let old = touch(dir.path(), "backup_egresados_20230101_000000.sql", 45);
        let fresh = touch(dir.path(), "backup_egresados_20240101_000000.sql", 2);
        let unrelated = touch(dir.path(), "keep-me.sql", 90);

        let removed = prune_backups(dir.path(), 30).unwrap();

        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0].name, "backup_egresados_20230101_000000.sql");
        assert!(!old.exists());
        assert!(fresh.exists());
        assert!(unrelated.exists());
    }

    #[tokio::test]
    async fn test_sqlite_backup_into_new_directory() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::init("sqlite::memory:").await.unwrap();
        let config = BackupConfig {
            dir: dir.path().join("backups"),
            ..Default::default()
        };

        let file = run_backup(&db, "sqlite::memory:", &config).await.unwrap();

        assert!(file.name.starts_with(FILE_PREFIX));
        assert!(file.name.ends_with(".db"));
        assert!(file.size > 0);
        assert_eq!(list_backups(&config.dir).unwrap(), vec![file]);
    }

    #[tokio::test]
    async fn test_missing_pg_dump() {
        let candidates = vec!["definitely-not-a-real-pg-dump-binary".to_string()];
        assert_eq!(find_pg_dump(&candidates).await, None);
    }

    #[tokio::test]
    async fn test_schedule_disabled_without_interval() {
        let db = Database::init("sqlite::memory:").await.unwrap();
        assert!(spawn_schedule(db, "sqlite::memory:".into(), BackupConfig::default()).is_none());
    }
}
