use crate::error::StoreError;
use crate::store::{LeadStore, NewLead};
use chrono::Utc;
use common::model::lead::Lead;
use log::info;
use rusqlite::{params, params_from_iter, Connection, ErrorCode};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Duration;
use uuid::Uuid;

/// Upper bound of bound parameters per `IN (...)` lookup.
const LOOKUP_CHUNK: usize = 500;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS leads (
        id          TEXT PRIMARY KEY,
        first_name  TEXT,
        last_name   TEXT,
        email       TEXT NOT NULL UNIQUE COLLATE NOCASE,
        phone       TEXT,
        source      TEXT NOT NULL,
        raw_data    TEXT NOT NULL,
        created_at  TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_leads_created_at ON leads (created_at);
";

/// Lead store backed by a SQLite file. A connection is opened per operation,
/// so the value is cheap to clone and share between workers.
#[derive(Debug, Clone)]
pub struct SqliteLeadStore {
    path: PathBuf,
}

impl SqliteLeadStore {
    /// Opens (creating if needed) the database at `path` and ensures the schema exists.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let store = SqliteLeadStore {
            path: path.as_ref().to_path_buf(),
        };
        let conn = store.connect()?;
        conn.execute_batch(SCHEMA)?;
        info!("Lead store ready at {}", store.path.display());
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connect(&self) -> Result<Connection, StoreError> {
        let conn = Connection::open(&self.path)?;
        // Concurrent imports share the file; wait on the write lock instead of failing.
        conn.busy_timeout(Duration::from_secs(5))?;
        Ok(conn)
    }

    /// Most recently imported leads first.
    pub fn list(&self, limit: usize) -> Result<Vec<Lead>, StoreError> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT id, first_name, last_name, email, phone, source, raw_data, created_at
             FROM leads ORDER BY created_at DESC, rowid DESC LIMIT ?1",
        )?;
        let rows = stmt
            .query_map(params![limit as i64], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, Option<String>>(1)?,
                    row.get::<_, Option<String>>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, Option<String>>(4)?,
                    row.get::<_, String>(5)?,
                    row.get::<_, String>(6)?,
                    row.get::<_, String>(7)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut leads = Vec::with_capacity(rows.len());
        for (id, first_name, last_name, email, phone, source, raw, created_at) in rows {
            leads.push(Lead {
                id,
                first_name,
                last_name,
                email,
                phone,
                source,
                raw_data: serde_json::from_str(&raw)?,
                created_at,
            });
        }
        Ok(leads)
    }
}

fn classify(err: rusqlite::Error, email: &str) -> StoreError {
    if err.sqlite_error_code() == Some(ErrorCode::ConstraintViolation) {
        StoreError::ConstraintViolation(email.to_string())
    } else {
        StoreError::Database(err)
    }
}

impl LeadStore for SqliteLeadStore {
    fn find_by_emails(&self, emails: &BTreeSet<String>) -> Result<Vec<String>, StoreError> {
        if emails.is_empty() {
            return Ok(Vec::new());
        }

        let conn = self.connect()?;
        let all: Vec<&String> = emails.iter().collect();
        let mut found = Vec::new();

        for chunk in all.chunks(LOOKUP_CHUNK) {
            let placeholders = vec!["?"; chunk.len()].join(", ");
            let sql = format!("SELECT lower(email) FROM leads WHERE email IN ({placeholders})");
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(params_from_iter(chunk.iter()), |row| {
                row.get::<_, String>(0)
            })?;
            for email in rows {
                found.push(email?);
            }
        }

        Ok(found)
    }

    fn insert_many(&self, leads: &[NewLead]) -> Result<usize, StoreError> {
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;
        let created_at = Utc::now().to_rfc3339();

        {
            let mut stmt = tx.prepare(
                "INSERT INTO leads (id, first_name, last_name, email, phone, source, raw_data, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            )?;
            for lead in leads {
                let raw = serde_json::to_string(&lead.raw_data)?;
                stmt.execute(params![
                    Uuid::new_v4().to_string(),
                    lead.first_name,
                    lead.last_name,
                    lead.email,
                    lead.phone,
                    lead.source,
                    raw,
                    created_at,
                ])
                .map_err(|e| classify(e, &lead.email))?;
            }
        }

        // Dropping `tx` on an early return above rolls the whole batch back.
        tx.commit()?;
        Ok(leads.len())
    }
}
