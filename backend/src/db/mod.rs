//! SQLite persistence.
//!
//! Every request opens its own connection through [`open`]; the import job
//! opens one for its whole run. Schema creation is idempotent and runs once at
//! start-up.

pub mod applications;
pub mod scholarships;

use crate::error::StoreError;
use rusqlite::Connection;
use std::path::Path;

/// ISO-8601 UTC timestamp with milliseconds, computed by SQLite.
pub(crate) const NOW: &str = "strftime('%Y-%m-%dT%H:%M:%fZ', 'now')";

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS scholarships (
    id            TEXT PRIMARY KEY,
    name          TEXT NOT NULL,
    description   TEXT NOT NULL DEFAULT '',
    amount        REAL,
    deadline      TEXT,
    is_active     INTEGER NOT NULL DEFAULT 1,
    form_schema   TEXT,
    custom_fields TEXT,
    created_at    TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
    updated_at    TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);

CREATE TABLE IF NOT EXISTS applications (
    id                         TEXT PRIMARY KEY,
    scholarship_id             TEXT NOT NULL REFERENCES scholarships(id),
    applicant_id               TEXT,
    first_name                 TEXT NOT NULL DEFAULT '',
    last_name                  TEXT NOT NULL DEFAULT '',
    email                      TEXT NOT NULL DEFAULT '',
    phone                      TEXT NOT NULL DEFAULT '',
    address                    TEXT NOT NULL DEFAULT '',
    city                       TEXT NOT NULL DEFAULT '',
    state                      TEXT NOT NULL DEFAULT '',
    zip                        TEXT NOT NULL DEFAULT '',
    date_of_birth              TEXT NOT NULL DEFAULT '',
    school                     TEXT NOT NULL DEFAULT '',
    graduation_year            INTEGER,
    gpa                        REAL CHECK (gpa IS NULL OR (gpa >= 0 AND gpa <= 4)),
    major                      TEXT NOT NULL DEFAULT '',
    academic_level             TEXT,
    career_goals               TEXT NOT NULL DEFAULT '',
    financial_need             TEXT NOT NULL DEFAULT '',
    community_involvement      TEXT NOT NULL DEFAULT '',
    why_deserve_scholarship    TEXT NOT NULL DEFAULT '',
    work_experience            TEXT NOT NULL DEFAULT '',
    extracurricular_activities TEXT NOT NULL DEFAULT '',
    awards_and_honors          TEXT NOT NULL DEFAULT '',
    custom_responses           TEXT NOT NULL DEFAULT '{}',
    status                     TEXT NOT NULL DEFAULT 'draft',
    submitted_at               TEXT,
    awarded_amount             REAL,
    awarded_date               TEXT,
    created_at                 TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
    updated_at                 TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
    deleted_at                 TEXT
);

CREATE UNIQUE INDEX IF NOT EXISTS applications_one_per_applicant
    ON applications (scholarship_id, applicant_id)
    WHERE deleted_at IS NULL;

CREATE INDEX IF NOT EXISTS applications_by_email
    ON applications (scholarship_id, email);
";

pub fn open(path: impl AsRef<Path>) -> Result<Connection, StoreError> {
    let conn = Connection::open(path)?;
    conn.pragma_update(None, "foreign_keys", true)?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// An in-memory database with the schema applied.
    pub(crate) fn memory() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.pragma_update(None, "foreign_keys", true).unwrap();
        init_schema(&conn).unwrap();
        conn
    }

    #[test]
    fn schema_creation_is_idempotent() {
        let conn = memory();
        init_schema(&conn).unwrap();
        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN ('scholarships', 'applications')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 2);
    }

    #[test]
    fn gpa_is_constrained_by_the_database() {
        let conn = memory();
        conn.execute("INSERT INTO scholarships (id, name) VALUES ('s1', 'Award')", [])
            .unwrap();
        let result = conn.execute(
            "INSERT INTO applications (id, scholarship_id, gpa) VALUES ('a1', 's1', 4.5)",
            [],
        );
        assert!(result.is_err());
    }
}
