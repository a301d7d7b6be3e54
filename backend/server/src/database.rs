//! # SQLite
//!
//! File-backed guest table.
//!
//! ## Schema
//! - `convidados(id TEXT PRIMARY KEY, nome TEXT UNIQUE)`
//! - `id` is a random UUID v4, `nome` the display name exactly as seeded
//!
//! ## Notes
//! - Every call opens and closes its own connection, no pooling
//! - Calls are blocking, run them on the blocking pool from async code
//! - The guest list is small, so prefix matching is done in memory after a
//!   full scan. This keeps `%` and `_` in user input literal and folds case
//!   for non-ASCII names, which SQLite's `LOWER` does not
use std::path::{Path, PathBuf};

use rusqlite::{Connection, ErrorCode, params};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS convidados (
    id TEXT PRIMARY KEY,
    nome TEXT UNIQUE
)";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Query failed: {0}")]
    Query(#[from] rusqlite::Error),
}

#[derive(Clone, Debug)]
pub struct GuestStore {
    path: PathBuf,
}

impl GuestStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connect(&self) -> Result<Connection, StoreError> {
        Connection::open(&self.path).map_err(|source| StoreError::Open {
            path: self.path.clone(),
            source,
        })
    }

    pub fn initialize(&self) -> Result<(), StoreError> {
        self.connect()?.execute_batch(CREATE_TABLE)?;

        Ok(())
    }

    /// Inserts each name that is not already stored. Returns how many were new.
    pub fn seed<S: AsRef<str>>(&self, names: &[S]) -> Result<usize, StoreError> {
        let mut connection = self.connect()?;
        let transaction = connection.transaction()?;
        let mut inserted = 0;

        for name in names {
            let name = name.as_ref();

            match transaction.execute(
                "INSERT INTO convidados (id, nome) VALUES (?1, ?2)",
                params![Uuid::new_v4().to_string(), name],
            ) {
                Ok(_) => inserted += 1,
                Err(e) if is_unique_violation(&e) => {
                    debug!("Guest {name} already seeded");
                }
                Err(e) => return Err(e.into()),
            }
        }

        transaction.commit()?;

        Ok(inserted)
    }

    /// Names whose lowercase form starts with the lowercase `query`, sorted.
    pub fn find_by_prefix(&self, query: &str) -> Result<Vec<String>, StoreError> {
        let connection = self.connect()?;
        let prefix = query.to_lowercase();

        let mut statement =
            connection.prepare("SELECT nome FROM convidados WHERE nome IS NOT NULL ORDER BY nome")?;
        let names = statement
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(names
            .into_iter()
            .filter(|name| name.to_lowercase().starts_with(&prefix))
            .collect())
    }

    pub fn count(&self) -> Result<usize, StoreError> {
        let count: i64 = self
            .connect()?
            .query_row("SELECT COUNT(*) FROM convidados", [], |row| row.get(0))?;

        Ok(count as usize)
    }
}

fn is_unique_violation(error: &rusqlite::Error) -> bool {
    matches!(
        error,
        rusqlite::Error::SqliteFailure(failure, _) if failure.code == ErrorCode::ConstraintViolation
    )
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::config::DEFAULT_GUESTS;

    fn seeded_store() -> (TempDir, GuestStore) {
        let dir = TempDir::new().unwrap();
        let store = GuestStore::new(dir.path().join("database.db"));

        store.initialize().unwrap();
        store.seed(&DEFAULT_GUESTS).unwrap();

        (dir, store)
    }

    #[test]
    fn initialize_is_idempotent() {
        let (_dir, store) = seeded_store();

        store.initialize().unwrap();
        store.initialize().unwrap();

        assert_eq!(store.count().unwrap(), 3);
    }

    #[test]
    fn seeding_twice_keeps_one_row_per_name() {
        let (_dir, store) = seeded_store();

        let inserted = store.seed(&DEFAULT_GUESTS).unwrap();

        assert_eq!(inserted, 0);
        assert_eq!(store.count().unwrap(), 3);
    }

    #[test]
    fn seeding_adds_only_new_names() {
        let (_dir, store) = seeded_store();

        let inserted = store.seed(&["Julia Souza", "Julia Santos"]).unwrap();

        assert_eq!(inserted, 1);
        assert_eq!(store.count().unwrap(), 4);
    }

    #[test]
    fn names_are_unique_only_by_exact_case() {
        let (_dir, store) = seeded_store();

        store.seed(&["artur mendes"]).unwrap();

        assert_eq!(store.count().unwrap(), 4);
    }

    #[test]
    fn prefix_match_ignores_case() {
        let (_dir, store) = seeded_store();

        assert_eq!(store.find_by_prefix("artur").unwrap(), vec!["Artur Mendes"]);
        assert_eq!(store.find_by_prefix("JULIA SOUZA").unwrap(), vec!["Julia Souza"]);
        assert_eq!(store.find_by_prefix("Ca").unwrap(), vec!["Carlos Silva"]);
    }

    #[test]
    fn prefix_match_returns_every_candidate() {
        let (_dir, store) = seeded_store();
        store.seed(&["Carla Dias"]).unwrap();

        assert_eq!(
            store.find_by_prefix("car").unwrap(),
            vec!["Carla Dias", "Carlos Silva"]
        );
        assert_eq!(store.find_by_prefix("").unwrap().len(), 4);
        assert!(store.find_by_prefix("Zzz").unwrap().is_empty());
    }

    #[test]
    fn null_name_rows_are_skipped() {
        let (_dir, store) = seeded_store();
        Connection::open(store.path())
            .unwrap()
            .execute("INSERT INTO convidados (id, nome) VALUES ('x', NULL)", [])
            .unwrap();

        assert_eq!(store.find_by_prefix("artur").unwrap(), vec!["Artur Mendes"]);
        assert_eq!(store.find_by_prefix("").unwrap().len(), 3);
    }

    #[test]
    fn wildcards_in_query_are_literal() {
        let (_dir, store) = seeded_store();

        assert!(store.find_by_prefix("%").unwrap().is_empty());
        assert!(store.find_by_prefix("_rtur").unwrap().is_empty());
    }

    #[test]
    fn prefix_match_folds_accented_names() {
        let (_dir, store) = seeded_store();
        store.seed(&["Ângela Prado"]).unwrap();

        assert_eq!(store.find_by_prefix("âng").unwrap(), vec!["Ângela Prado"]);
    }

    #[test]
    fn missing_directory_is_an_open_error() {
        let dir = TempDir::new().unwrap();
        let store = GuestStore::new(dir.path().join("missing").join("database.db"));

        assert!(matches!(store.initialize(), Err(StoreError::Open { .. })));
    }
}
