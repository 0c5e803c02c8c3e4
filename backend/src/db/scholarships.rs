use crate::error::StoreError;
use common::model::scholarship::Scholarship;
use common::schema::FormSchema;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::HashSet;

const COLUMNS: &str = "id, name, description, amount, deadline, is_active, form_schema, custom_fields";

/// Row with its JSON columns still encoded.
struct RawScholarship {
    scholarship: Scholarship,
    form_schema: Option<String>,
    custom_fields: Option<String>,
}

fn raw_from_row(row: &Row) -> rusqlite::Result<RawScholarship> {
    let mut scholarship = Scholarship::new(row.get::<_, String>(0)?, row.get::<_, String>(1)?);
    scholarship.description = row.get(2)?;
    scholarship.amount = row.get(3)?;
    scholarship.deadline = row.get(4)?;
    scholarship.is_active = row.get(5)?;
    Ok(RawScholarship {
        scholarship,
        form_schema: row.get(6)?,
        custom_fields: row.get(7)?,
    })
}

fn decode(raw: RawScholarship) -> Result<Scholarship, StoreError> {
    let mut scholarship = raw.scholarship;
    scholarship.form_schema = raw.form_schema.as_deref().map(serde_json::from_str).transpose()?;
    scholarship.custom_fields = raw.custom_fields.as_deref().map(serde_json::from_str).transpose()?;
    Ok(scholarship)
}

pub fn list(conn: &Connection) -> Result<Vec<Scholarship>, StoreError> {
    let mut stmt = conn.prepare(&format!("SELECT {} FROM scholarships ORDER BY name", COLUMNS))?;
    let rows = stmt.query_map([], raw_from_row)?;
    rows.map(|raw| decode(raw?)).collect()
}

pub fn get(conn: &Connection, id: &str) -> Result<Scholarship, StoreError> {
    let raw = conn
        .query_row(
            &format!("SELECT {} FROM scholarships WHERE id = ?1", COLUMNS),
            params![id],
            raw_from_row,
        )
        .optional()?
        .ok_or_else(|| StoreError::NotFound(format!("Scholarship {}", id)))?;
    decode(raw)
}

/// Inserts or replaces a scholarship. A stored schema must validate.
pub fn save(conn: &Connection, scholarship: &Scholarship) -> Result<(), StoreError> {
    if scholarship.id.trim().is_empty() {
        return Err(StoreError::Invalid("Scholarship id must not be empty".to_string()));
    }
    if scholarship.name.trim().is_empty() {
        return Err(StoreError::Invalid("Scholarship name must not be empty".to_string()));
    }
    if let Some(schema) = &scholarship.form_schema {
        schema.validate()?;
    }

    let form_schema = scholarship.form_schema.as_ref().map(serde_json::to_string).transpose()?;
    let custom_fields = scholarship.custom_fields.as_ref().map(serde_json::to_string).transpose()?;

    conn.execute(
        &format!(
            "INSERT INTO scholarships ({COLUMNS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                description = excluded.description,
                amount = excluded.amount,
                deadline = excluded.deadline,
                is_active = excluded.is_active,
                form_schema = excluded.form_schema,
                custom_fields = excluded.custom_fields,
                updated_at = {now}",
            now = super::NOW
        ),
        params![
            scholarship.id,
            scholarship.name,
            scholarship.description,
            scholarship.amount,
            scholarship.deadline,
            scholarship.is_active,
            form_schema,
            custom_fields,
        ],
    )?;
    Ok(())
}

/// Replaces the form schema of an existing scholarship.
pub fn save_form_schema(conn: &Connection, id: &str, schema: &FormSchema) -> Result<(), StoreError> {
    schema.validate()?;
    let json = serde_json::to_string(schema)?;
    let updated = conn.execute(
        &format!(
            "UPDATE scholarships SET form_schema = ?1, updated_at = {} WHERE id = ?2",
            super::NOW
        ),
        params![json, id],
    )?;
    if updated == 0 {
        return Err(StoreError::NotFound(format!("Scholarship {}", id)));
    }
    Ok(())
}

/// The subset of `ids` that name stored scholarships.
pub fn existing_ids(conn: &Connection, ids: &[String]) -> Result<HashSet<String>, StoreError> {
    if ids.is_empty() {
        return Ok(HashSet::new());
    }
    let placeholders = vec!["?"; ids.len()].join(", ");
    let mut stmt = conn.prepare(&format!(
        "SELECT id FROM scholarships WHERE id IN ({})",
        placeholders
    ))?;
    let rows = stmt.query_map(rusqlite::params_from_iter(ids), |row| row.get::<_, String>(0))?;
    Ok(rows.collect::<Result<_, _>>()?)
}
