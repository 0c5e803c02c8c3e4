//! Identifier generation for sections and fields created in the builder.

use chrono::Utc;
use uuid::Uuid;

/// Length of the random suffix appended to generated ids.
const SUFFIX_LEN: usize = 9;

/// Supplies the two ingredients of a generated id: a millisecond timestamp and
/// a short random suffix.
pub trait IdSource {
    fn timestamp_millis(&mut self) -> i64;
    fn random_suffix(&mut self) -> String;
}

/// Wall clock plus a slice of a v4 UUID.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemIds;

impl IdSource for SystemIds {
    fn timestamp_millis(&mut self) -> i64 {
        Utc::now().timestamp_millis()
    }

    fn random_suffix(&mut self) -> String {
        let mut suffix = Uuid::new_v4().simple().to_string();
        suffix.truncate(SUFFIX_LEN);
        suffix
    }
}
