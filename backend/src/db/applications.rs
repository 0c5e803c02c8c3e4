use crate::error::StoreError;
use common::model::application::{AcademicLevel, Application, ApplicationStatus};
use common::requests::ApplicationListQuery;
use rusqlite::types::Type;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use std::collections::{BTreeMap, HashSet};

const COLUMNS: &str = "id, scholarship_id, applicant_id, first_name, last_name, email, phone, address, city, \
    state, zip, date_of_birth, school, graduation_year, gpa, major, academic_level, career_goals, \
    financial_need, community_involvement, why_deserve_scholarship, work_experience, \
    extracurricular_activities, awards_and_honors, custom_responses, status, submitted_at, \
    awarded_amount, awarded_date, created_at, updated_at";

fn conversion_error(index: usize, err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(index, Type::Text, err.into())
}

fn application_from_row(row: &Row) -> rusqlite::Result<Application> {
    let academic_level: Option<String> = row.get(16)?;
    let custom_responses: String = row.get(24)?;
    let status: String = row.get(25)?;

    Ok(Application {
        id: row.get(0)?,
        scholarship_id: row.get(1)?,
        applicant_id: row.get(2)?,
        first_name: row.get(3)?,
        last_name: row.get(4)?,
        email: row.get(5)?,
        phone: row.get(6)?,
        address: row.get(7)?,
        city: row.get(8)?,
        state: row.get(9)?,
        zip: row.get(10)?,
        date_of_birth: row.get(11)?,
        school: row.get(12)?,
        graduation_year: row.get(13)?,
        gpa: row.get(14)?,
        major: row.get(15)?,
        academic_level: academic_level
            .map(|l| l.parse::<AcademicLevel>())
            .transpose().map_err(|e| conversion_error(16, e))?,
        career_goals: row.get(17)?,
        financial_need: row.get(18)?,
        community_involvement: row.get(19)?,
        why_deserve_scholarship: row.get(20)?,
        work_experience: row.get(21)?,
        extracurricular_activities: row.get(22)?,
        awards_and_honors: row.get(23)?,
        custom_responses: serde_json::from_str::<BTreeMap<_, _>>(&custom_responses)
            .map_err(|e| conversion_error(24, e))?,
        status: status.parse::<ApplicationStatus>().map_err(|e| conversion_error(25, e))?,
        submitted_at: row.get(26)?,
        awarded_amount: row.get(27)?,
        awarded_date: row.get(28)?,
        created_at: row.get(29)?,
        updated_at: row.get(30)?,
    })
}

pub fn get(conn: &Connection, id: &str) -> Result<Application, StoreError> {
    conn.query_row(
        &format!("SELECT {} FROM applications WHERE id = ?1 AND deleted_at IS NULL", COLUMNS),
        params![id],
        application_from_row,
    )
    .optional()?
    .ok_or_else(|| StoreError::NotFound(format!("Application {}", id)))
}

/// The live application of an applicant for a scholarship, if any.
pub fn find_draft(conn: &Connection, scholarship_id: &str, applicant_id: &str) -> Result<Option<Application>, StoreError> {
    Ok(conn
        .query_row(
            &format!(
                "SELECT {} FROM applications
                 WHERE scholarship_id = ?1 AND applicant_id = ?2 AND deleted_at IS NULL",
                COLUMNS
            ),
            params![scholarship_id, applicant_id],
            application_from_row,
        )
        .optional()?)
}

pub fn list(conn: &Connection, query: &ApplicationListQuery) -> Result<Vec<Application>, StoreError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM applications
         WHERE deleted_at IS NULL
           AND (?1 IS NULL OR scholarship_id = ?1)
           AND (?2 IS NULL OR status = ?2)
         ORDER BY created_at DESC, id",
        COLUMNS
    ))?;
    let rows = stmt.query_map(
        params![query.scholarship_id, query.status.map(|s| s.as_str())],
        application_from_row,
    )?;
    Ok(rows.collect::<Result<_, _>>()?)
}

/// Inserts or updates the single live row of `(scholarship_id, applicant_id)`.
///
/// `status` must be `draft` or `submitted`. A draft save never moves a
/// submitted row back to draft. Rows that have moved past `submitted` are not
/// touched and [`StoreError::Locked`] is returned. Returns the row id.
pub fn upsert(conn: &Connection, application: &Application, status: ApplicationStatus) -> Result<String, StoreError> {
    if !status.is_applicant_editable() {
        return Err(StoreError::Invalid(format!("Applicants cannot save with status {}", status)));
    }
    let applicant_id = application
        .applicant_id
        .as_deref()
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| StoreError::Invalid("An applicant id is required".to_string()))?;

    let custom_responses = serde_json::to_string(&application.custom_responses)?;
    let id = uuid::Uuid::new_v4().to_string();

    let sql = format!(
        "INSERT INTO applications (
            id, scholarship_id, applicant_id, first_name, last_name, email, phone, address, city,
            state, zip, date_of_birth, school, graduation_year, gpa, major, academic_level,
            career_goals, financial_need, community_involvement, why_deserve_scholarship,
            work_experience, extracurricular_activities, awards_and_honors, custom_responses,
            status, submitted_at
        ) VALUES (
            ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17,
            ?18, ?19, ?20, ?21, ?22, ?23, ?24, ?25, ?26,
            CASE WHEN ?26 = 'submitted' THEN {now} END
        )
        ON CONFLICT (scholarship_id, applicant_id) WHERE deleted_at IS NULL DO UPDATE SET
            first_name = excluded.first_name,
            last_name = excluded.last_name,
            email = excluded.email,
            phone = excluded.phone,
            address = excluded.address,
            city = excluded.city,
            state = excluded.state,
            zip = excluded.zip,
            date_of_birth = excluded.date_of_birth,
            school = excluded.school,
            graduation_year = excluded.graduation_year,
            gpa = excluded.gpa,
            major = excluded.major,
            academic_level = excluded.academic_level,
            career_goals = excluded.career_goals,
            financial_need = excluded.financial_need,
            community_involvement = excluded.community_involvement,
            why_deserve_scholarship = excluded.why_deserve_scholarship,
            work_experience = excluded.work_experience,
            extracurricular_activities = excluded.extracurricular_activities,
            awards_and_honors = excluded.awards_and_honors,
            custom_responses = excluded.custom_responses,
            status = CASE WHEN applications.status = 'submitted' THEN 'submitted' ELSE excluded.status END,
            submitted_at = CASE WHEN excluded.status = 'submitted' THEN excluded.submitted_at
                                ELSE applications.submitted_at END,
            updated_at = {now}
        WHERE applications.status IN ('draft', 'submitted')
        RETURNING id",
        now = super::NOW
    );

    let returned: Option<String> = conn
        .query_row(
            &sql,
            params![
                id,
                application.scholarship_id,
                applicant_id,
                application.first_name,
                application.last_name,
                application.email,
                application.phone,
                application.address,
                application.city,
                application.state,
                application.zip,
                application.date_of_birth,
                application.school,
                application.graduation_year,
                application.gpa,
                application.major,
                application.academic_level.map(|l| l.as_str()),
                application.career_goals,
                application.financial_need,
                application.community_involvement,
                application.why_deserve_scholarship,
                application.work_experience,
                application.extracurricular_activities,
                application.awards_and_honors,
                custom_responses,
                status.as_str(),
            ],
            |row| row.get(0),
        )
        .optional()?;

    returned.ok_or(StoreError::Locked)
}

/// Inserts an imported row. Imported applications have no applicant and carry
/// a server-side submission timestamp.
pub fn insert_imported(conn: &Connection, application: &Application) -> Result<String, StoreError> {
    let id = uuid::Uuid::new_v4().to_string();
    let custom_responses = serde_json::to_string(&application.custom_responses)?;
    conn.execute(
        &format!(
            "INSERT INTO applications (
                id, scholarship_id, applicant_id, first_name, last_name, email, phone, address, city,
                state, zip, date_of_birth, school, graduation_year, gpa, major, academic_level,
                career_goals, financial_need, community_involvement, why_deserve_scholarship,
                work_experience, extracurricular_activities, awards_and_honors, custom_responses,
                status, submitted_at
            ) VALUES (
                ?1, ?2, NULL, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16,
                ?17, ?18, ?19, ?20, ?21, ?22, ?23, ?24, ?25, {}
            )",
            super::NOW
        ),
        params![
            id,
            application.scholarship_id,
            application.first_name,
            application.last_name,
            application.email,
            application.phone,
            application.address,
            application.city,
            application.state,
            application.zip,
            application.date_of_birth,
            application.school,
            application.graduation_year,
            application.gpa,
            application.major,
            application.academic_level.map(|l| l.as_str()),
            application.career_goals,
            application.financial_need,
            application.community_involvement,
            application.why_deserve_scholarship,
            application.work_experience,
            application.extracurricular_activities,
            application.awards_and_honors,
            custom_responses,
            ApplicationStatus::Submitted.as_str(),
        ],
    )?;
    Ok(id)
}

/// `(lowercased email, scholarship_id)` pairs already stored for the given
/// scholarships, in one query.
pub fn existing_email_pairs(conn: &Connection, scholarship_ids: &[String]) -> Result<HashSet<(String, String)>, StoreError> {
    if scholarship_ids.is_empty() {
        return Ok(HashSet::new());
    }
    let placeholders = vec!["?"; scholarship_ids.len()].join(", ");
    let mut stmt = conn.prepare(&format!(
        "SELECT lower(email), scholarship_id FROM applications
         WHERE deleted_at IS NULL AND email <> '' AND scholarship_id IN ({})",
        placeholders
    ))?;
    let rows = stmt.query_map(params_from_iter(scholarship_ids), |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
    })?;
    Ok(rows.collect::<Result<_, _>>()?)
}

/// Admin status change. Awards go through [`award`] and [`remove_award`].
pub fn set_status(conn: &Connection, id: &str, next: ApplicationStatus) -> Result<Application, StoreError> {
    let current = get(conn, id)?;
    let award_change = next == ApplicationStatus::Awarded || current.status == ApplicationStatus::Awarded;
    if award_change || !current.status.can_transition_to(next) {
        return Err(StoreError::InvalidTransition {
            from: current.status,
            to: next,
        });
    }
    conn.execute(
        &format!("UPDATE applications SET status = ?1, updated_at = {} WHERE id = ?2", super::NOW),
        params![next.as_str(), id],
    )?;
    get(conn, id)
}

/// `approved → awarded` with the awarded amount and date.
pub fn award(conn: &Connection, id: &str, amount: f64, awarded_date: &str) -> Result<Application, StoreError> {
    if !(amount.is_finite() && amount > 0.0) {
        return Err(StoreError::Invalid("The awarded amount must be positive".to_string()));
    }
    let current = get(conn, id)?;
    if !current.status.can_transition_to(ApplicationStatus::Awarded) {
        return Err(StoreError::InvalidTransition {
            from: current.status,
            to: ApplicationStatus::Awarded,
        });
    }
    conn.execute(
        &format!(
            "UPDATE applications
             SET status = 'awarded', awarded_amount = ?1, awarded_date = ?2, updated_at = {}
             WHERE id = ?3",
            super::NOW
        ),
        params![amount, awarded_date, id],
    )?;
    get(conn, id)
}

/// `awarded → approved`, clearing the award fields.
pub fn remove_award(conn: &Connection, id: &str) -> Result<Application, StoreError> {
    let current = get(conn, id)?;
    if current.status != ApplicationStatus::Awarded {
        return Err(StoreError::InvalidTransition {
            from: current.status,
            to: ApplicationStatus::Approved,
        });
    }
    conn.execute(
        &format!(
            "UPDATE applications
             SET status = 'approved', awarded_amount = NULL, awarded_date = NULL, updated_at = {}
             WHERE id = ?1",
            super::NOW
        ),
        params![id],
    )?;
    get(conn, id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::scholarships;
    use crate::db::tests::memory;
    use common::model::scholarship::Scholarship;
    use rstest::rstest;
    use serde_json::json;

    fn setup() -> Connection {
        let conn = memory();
        scholarships::save(&conn, &Scholarship::new("s1", "STEM Award")).unwrap();
        conn
    }

    fn applicant(first_name: &str) -> Application {
        let mut app = Application::new("s1");
        app.applicant_id = Some("u1".to_string());
        app.first_name = first_name.to_string();
        app.email = "ada@example.com".to_string();
        app
    }

    fn count(conn: &Connection) -> i64 {
        conn.query_row("SELECT COUNT(*) FROM applications", [], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn two_submissions_leave_one_row_with_the_second_values() {
        let conn = setup();
        let first = upsert(&conn, &applicant("Ada"), ApplicationStatus::Submitted).unwrap();
        let mut second_app = applicant("Augusta");
        second_app.custom_responses.insert("essay_q".into(), json!("hello"));
        let second = upsert(&conn, &second_app, ApplicationStatus::Submitted).unwrap();

        assert_eq!(first, second);
        assert_eq!(count(&conn), 1);
        let stored = get(&conn, &first).unwrap();
        assert_eq!(stored.first_name, "Augusta");
        assert_eq!(stored.status, ApplicationStatus::Submitted);
        assert!(stored.submitted_at.is_some());
        assert_eq!(stored.custom_responses["essay_q"], json!("hello"));
    }

    #[test]
    fn draft_then_submit_updates_the_same_row() {
        let conn = setup();
        let id = upsert(&conn, &applicant("Ada"), ApplicationStatus::Draft).unwrap();
        let draft = find_draft(&conn, "s1", "u1").unwrap().unwrap();
        assert_eq!(draft.status, ApplicationStatus::Draft);
        assert_eq!(draft.submitted_at, None);

        upsert(&conn, &applicant("Ada"), ApplicationStatus::Submitted).unwrap();
        let submitted = get(&conn, &id).unwrap();
        assert_eq!(submitted.status, ApplicationStatus::Submitted);

        // A later draft save keeps the submission.
        upsert(&conn, &applicant("Ada L."), ApplicationStatus::Draft).unwrap();
        let resaved = get(&conn, &id).unwrap();
        assert_eq!(resaved.status, ApplicationStatus::Submitted);
        assert_eq!(resaved.first_name, "Ada L.");
        assert_eq!(resaved.submitted_at, submitted.submitted_at);
    }

    #[test]
    fn reviewed_applications_are_locked() {
        let conn = setup();
        let id = upsert(&conn, &applicant("Ada"), ApplicationStatus::Submitted).unwrap();
        set_status(&conn, &id, ApplicationStatus::UnderReview).unwrap();

        let err = upsert(&conn, &applicant("Changed"), ApplicationStatus::Submitted).unwrap_err();
        assert!(matches!(err, StoreError::Locked));
        assert_eq!(get(&conn, &id).unwrap().first_name, "Ada");
    }

    #[test]
    fn upsert_requires_applicant() {
        let conn = setup();
        let mut app = applicant("Ada");
        app.applicant_id = None;
        assert!(matches!(
            upsert(&conn, &app, ApplicationStatus::Draft),
            Err(StoreError::Invalid(_))
        ));
    }

    #[rstest]
    #[case(ApplicationStatus::Submitted, ApplicationStatus::UnderReview, true)]
    #[case(ApplicationStatus::Submitted, ApplicationStatus::Approved, false)]
    #[case(ApplicationStatus::UnderReview, ApplicationStatus::Rejected, true)]
    #[case(ApplicationStatus::UnderReview, ApplicationStatus::Awarded, false)]
    fn status_transitions(#[case] from: ApplicationStatus, #[case] to: ApplicationStatus, #[case] allowed: bool) {
        let conn = setup();
        let id = upsert(&conn, &applicant("Ada"), ApplicationStatus::Submitted).unwrap();
        conn.execute("UPDATE applications SET status = ?1", params![from.as_str()])
            .unwrap();
        let result = set_status(&conn, &id, to);
        assert_eq!(result.is_ok(), allowed, "{:?}", result);
    }

    #[test]
    fn award_and_remove_award() {
        let conn = setup();
        let id = upsert(&conn, &applicant("Ada"), ApplicationStatus::Submitted).unwrap();
        assert!(award(&conn, &id, 1000.0, "2026-05-01").is_err());

        set_status(&conn, &id, ApplicationStatus::UnderReview).unwrap();
        set_status(&conn, &id, ApplicationStatus::Approved).unwrap();
        assert!(award(&conn, &id, -5.0, "2026-05-01").is_err());

        let awarded = award(&conn, &id, 1000.0, "2026-05-01").unwrap();
        assert_eq!(awarded.status, ApplicationStatus::Awarded);
        assert_eq!(awarded.awarded_amount, Some(1000.0));
        assert!(set_status(&conn, &id, ApplicationStatus::Approved).is_err());

        let reverted = remove_award(&conn, &id).unwrap();
        assert_eq!(reverted.status, ApplicationStatus::Approved);
        assert_eq!(reverted.awarded_amount, None);
        assert_eq!(reverted.awarded_date, None);
    }

    #[test]
    fn imported_rows_and_existing_pairs() {
        let conn = setup();
        let mut imported = Application::new("s1");
        imported.email = "Grace@Example.com".to_string();
        let id = insert_imported(&conn, &imported).unwrap();

        let stored = get(&conn, &id).unwrap();
        assert_eq!(stored.applicant_id, None);
        assert_eq!(stored.status, ApplicationStatus::Submitted);
        assert!(stored.submitted_at.is_some());

        // Rows without applicant do not collide with each other.
        insert_imported(&conn, &Application::new("s1")).unwrap();

        let pairs = existing_email_pairs(&conn, &["s1".to_string()]).unwrap();
        assert!(pairs.contains(&("grace@example.com".to_string(), "s1".to_string())));
        assert_eq!(pairs.len(), 1);
    }

    #[test]
    fn list_filters_by_scholarship_and_status() {
        let conn = setup();
        scholarships::save(&conn, &Scholarship::new("s2", "Arts Award")).unwrap();
        upsert(&conn, &applicant("Ada"), ApplicationStatus::Submitted).unwrap();
        let mut other = applicant("Grace");
        other.scholarship_id = "s2".to_string();
        upsert(&conn, &other, ApplicationStatus::Draft).unwrap();

        let all = list(&conn, &ApplicationListQuery::default()).unwrap();
        assert_eq!(all.len(), 2);
        let s2 = list(
            &conn,
            &ApplicationListQuery {
                scholarship_id: Some("s2".to_string()),
                status: None,
            },
        )
        .unwrap();
        assert_eq!(s2.len(), 1);
        let submitted = list(
            &conn,
            &ApplicationListQuery {
                scholarship_id: None,
                status: Some(ApplicationStatus::Submitted),
            },
        )
        .unwrap();
        assert_eq!(submitted[0].first_name, "Ada");
    }
}
