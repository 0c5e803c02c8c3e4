//! Database access needed by the import pipeline, behind a trait so batch
//! fallback can be exercised without SQLite.

use crate::db;
use crate::error::StoreError;
use common::model::application::Application;
use rusqlite::Connection;
use std::collections::HashSet;

pub trait ImportStore {
    /// The subset of `ids` naming existing scholarships.
    fn known_scholarships(&mut self, ids: &[String]) -> Result<HashSet<String>, StoreError>;

    /// Stored `(lowercased email, scholarship_id)` pairs for the given
    /// scholarships.
    fn existing_pairs(&mut self, scholarship_ids: &[String]) -> Result<HashSet<(String, String)>, StoreError>;

    /// Inserts every row or none of them.
    fn insert_batch(&mut self, batch: &[Application]) -> Result<(), StoreError>;

    fn insert_one(&mut self, application: &Application) -> Result<(), StoreError>;
}

pub struct SqliteImportStore<'a> {
    conn: &'a mut Connection,
}

impl<'a> SqliteImportStore<'a> {
    pub fn new(conn: &'a mut Connection) -> Self {
        Self { conn }
    }
}

impl ImportStore for SqliteImportStore<'_> {
    fn known_scholarships(&mut self, ids: &[String]) -> Result<HashSet<String>, StoreError> {
        db::scholarships::existing_ids(self.conn, ids)
    }

    fn existing_pairs(&mut self, scholarship_ids: &[String]) -> Result<HashSet<(String, String)>, StoreError> {
        db::applications::existing_email_pairs(self.conn, scholarship_ids)
    }

    fn insert_batch(&mut self, batch: &[Application]) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;
        for application in batch {
            db::applications::insert_imported(&tx, application)?;
        }
        tx.commit()?;
        Ok(())
    }

    fn insert_one(&mut self, application: &Application) -> Result<(), StoreError> {
        db::applications::insert_imported(self.conn, application).map(|_| ())
    }
}
