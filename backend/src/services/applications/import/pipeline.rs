//! Import stages that need the database: the existing-data check (stage 5)
//! and the batched commit (stage 6).

use super::store::ImportStore;
use super::ImportError;
use common::csv_import::{parse_csv, transform_row, ImportPlan};
use common::model::application::Application;
use common::model::csv::{ImportResult, ImportRowError, ParsedApplication};
use log::{info, warn};
use rayon::prelude::*;
use std::collections::BTreeSet;

/// Stages 1 to 5. Row transformation runs in parallel; everything else is
/// sequential.
pub fn prepare(input: &str, current_year: i32, store: &mut dyn ImportStore) -> Result<ImportPlan, ImportError> {
    let rows = parse_csv(input)?;
    let parsed: Vec<ParsedApplication> = rows.par_iter().map(|row| transform_row(row, current_year)).collect();
    let mut plan = ImportPlan::from_parsed(parsed);
    check_existing(&mut plan, store)?;
    Ok(plan)
}

/// Stage 5. One lookup for the scholarships referenced by the valid rows and
/// one for their stored `(email, scholarship)` pairs.
pub fn check_existing(plan: &mut ImportPlan, store: &mut dyn ImportStore) -> Result<(), ImportError> {
    let scholarship_ids: Vec<String> = plan
        .valid
        .iter()
        .map(|row| row.application.scholarship_id.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    if scholarship_ids.is_empty() {
        return Ok(());
    }

    let known = store.known_scholarships(&scholarship_ids)?;
    let existing = store.existing_pairs(&scholarship_ids)?;

    plan.reject_where(|row| {
        let application = &row.application;
        if !known.contains(&application.scholarship_id) {
            return Some(format!("Unknown scholarship_id: {}", application.scholarship_id));
        }
        let key = (application.email.trim().to_lowercase(), application.scholarship_id.clone());
        existing.contains(&key).then(|| {
            format!(
                "An application for {} already exists for this scholarship",
                application.email
            )
        })
    });
    Ok(())
}

/// Stage 6. Inserts the plan's valid rows `batch_size` at a time, in order. A
/// failed batch is retried row by row so one bad row only costs itself.
/// `progress` receives `(rows handled, rows to handle)` after each batch.
pub fn commit(
    plan: &ImportPlan,
    store: &mut dyn ImportStore,
    batch_size: usize,
    mut progress: impl FnMut(usize, usize),
) -> ImportResult {
    let rows = plan.applications();
    let total = rows.len();
    let mut errors: Vec<ImportRowError> = plan.errors.clone();
    let mut success_count = 0;
    let mut handled = 0;

    for (index, chunk) in rows.chunks(batch_size.max(1)).enumerate() {
        let batch: Vec<Application> = chunk.iter().map(|(_, app)| app.clone()).collect();
        match store.insert_batch(&batch) {
            Ok(()) => success_count += batch.len(),
            Err(e) => {
                warn!("Import batch {} failed ({}), inserting its rows one by one", index + 1, e);
                for (row_number, application) in chunk {
                    match store.insert_one(application) {
                        Ok(()) => success_count += 1,
                        Err(e) => errors.push(ImportRowError::new(*row_number, e.to_string())),
                    }
                }
            }
        }
        handled += chunk.len();
        progress(handled, total);
    }

    errors.sort_by_key(|e| e.row);
    info!(
        "Import finished: {} processed, {} inserted, {} errors",
        plan.processed_count,
        success_count,
        errors.len()
    );
    ImportResult::new(plan.processed_count, success_count, errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use std::collections::HashSet;

    /// Accepts everything except applications whose email is poisoned, which
    /// fail only at insert time.
    #[derive(Default)]
    struct FakeStore {
        poisoned: HashSet<String>,
        existing: HashSet<(String, String)>,
        inserted: Vec<String>,
        batch_sizes: Vec<usize>,
        failed_batches: usize,
    }

    impl ImportStore for FakeStore {
        fn known_scholarships(&mut self, ids: &[String]) -> Result<HashSet<String>, StoreError> {
            Ok(ids.iter().filter(|id| id.as_str() != "ghost").cloned().collect())
        }

        fn existing_pairs(&mut self, _ids: &[String]) -> Result<HashSet<(String, String)>, StoreError> {
            Ok(self.existing.clone())
        }

        fn insert_batch(&mut self, batch: &[Application]) -> Result<(), StoreError> {
            self.batch_sizes.push(batch.len());
            if batch.iter().any(|a| self.poisoned.contains(&a.email)) {
                self.failed_batches += 1;
                return Err(StoreError::Invalid("CHECK constraint failed".to_string()));
            }
            self.inserted.extend(batch.iter().map(|a| a.email.clone()));
            Ok(())
        }

        fn insert_one(&mut self, application: &Application) -> Result<(), StoreError> {
            if self.poisoned.contains(&application.email) {
                return Err(StoreError::Invalid("CHECK constraint failed".to_string()));
            }
            self.inserted.push(application.email.clone());
            Ok(())
        }
    }

    fn csv_with_rows(count: usize) -> String {
        let mut csv = String::from("scholarship_id,first_name,last_name,email,school,major\n");
        for i in 0..count {
            csv.push_str(&format!("s1,First{i},Last{i},student{i}@example.com,School,Major\n"));
        }
        csv
    }

    #[test]
    fn batches_fall_back_to_single_rows() {
        let mut store = FakeStore::default();
        // Data row index 73 sits on line 75.
        store.poisoned.insert("student73@example.com".to_string());

        let plan = prepare(&csv_with_rows(120), 2026, &mut store).unwrap();
        assert_eq!(plan.valid_count(), 120);

        let mut reports = Vec::new();
        let result = commit(&plan, &mut store, 50, |done, total| reports.push((done, total)));

        assert_eq!(store.batch_sizes, [50, 50, 20]);
        assert_eq!(store.failed_batches, 1);
        assert_eq!(result.processed_count, 120);
        assert_eq!(result.success_count, 119);
        assert_eq!(result.error_count, 1);
        assert_eq!(result.errors[0].row, 75);
        assert!(result.success);
        assert_eq!(reports, [(50, 120), (100, 120), (120, 120)]);
        assert!(!store.inserted.contains(&"student73@example.com".to_string()));
    }

    #[test]
    fn existing_and_unknown_rows_are_withheld() {
        let mut store = FakeStore::default();
        store
            .existing
            .insert(("taken@example.com".to_string(), "s1".to_string()));
        let csv = "scholarship_id,first_name,last_name,email,school,major\n\
                   s1,A,B,Taken@Example.com,X,Y\n\
                   ghost,C,D,c@example.com,X,Y\n\
                   s1,E,F,e@example.com,X,Y\n";

        let plan = prepare(csv, 2026, &mut store).unwrap();
        assert_eq!(plan.valid_count(), 1);
        assert_eq!(plan.errors.len(), 2);
        assert_eq!(plan.errors[0].row, 2);
        assert!(plan.errors[0].message.contains("already exists"));
        assert_eq!(plan.errors[1].row, 3);
        assert!(plan.errors[1].message.contains("Unknown scholarship_id"));

        let result = commit(&plan, &mut store, 50, |_, _| {});
        assert_eq!(result.success_count, 1);
        assert_eq!(result.error_count, 2);
    }

    #[test]
    fn malformed_csv_aborts_before_any_row() {
        let mut store = FakeStore::default();
        let err = prepare("a,b\n1\n", 2026, &mut store).unwrap_err();
        assert!(matches!(err, ImportError::Csv(_)));
        assert!(store.batch_sizes.is_empty());
    }

    #[test]
    fn nothing_valid_means_no_success() {
        let mut store = FakeStore::default();
        let plan = prepare("scholarship_id,first_name\ns1,\n", 2026, &mut store).unwrap();
        let result = commit(&plan, &mut store, 50, |_, _| {});
        assert!(!result.success);
        assert_eq!(result.success_count, 0);
        assert!(result.error_count > 0);
        assert!(store.batch_sizes.is_empty());
    }
}
