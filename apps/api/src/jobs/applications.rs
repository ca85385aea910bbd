//! Candidate applications to job postings.

use std::collections::HashMap;

use chrono::Utc;
use serde::Serialize;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection};

use crate::jobs::forms::StatusUpdate;
use crate::models::application::{Applicant, Application, ApplicationStatus, ApplicationWithJob};

/// Fails with a unique violation when the user already applied to the job.
pub async fn insert_application(
    conn: &mut SqliteConnection,
    user_id: i64,
    job_id: i64,
    cover_letter: &str,
) -> Result<Application, sqlx::Error> {
    let now = Utc::now();
    sqlx::query_as::<_, Application>(
        r#"
        INSERT INTO applications (user_id, job_id, status, cover_letter, applied_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(job_id)
    .bind(ApplicationStatus::Applied)
    .bind(cover_letter)
    .bind(now)
    .bind(now)
    .fetch_one(&mut *conn)
    .await
}

pub async fn find_application(
    conn: &mut SqliteConnection,
    application_id: i64,
) -> Result<Option<Application>, sqlx::Error> {
    sqlx::query_as::<_, Application>("SELECT * FROM applications WHERE id = ?")
        .bind(application_id)
        .fetch_optional(&mut *conn)
        .await
}

pub async fn find_user_application(
    conn: &mut SqliteConnection,
    user_id: i64,
    job_id: i64,
) -> Result<Option<Application>, sqlx::Error> {
    sqlx::query_as::<_, Application>("SELECT * FROM applications WHERE user_id = ? AND job_id = ?")
        .bind(user_id)
        .bind(job_id)
        .fetch_optional(&mut *conn)
        .await
}

/// Creates the (user, job) application unless one exists. The flag is true
/// when a row was inserted.
pub async fn get_or_create_application(
    conn: &mut SqliteConnection,
    user_id: i64,
    job_id: i64,
    cover_letter: &str,
) -> Result<(Application, bool), sqlx::Error> {
    if let Some(existing) = find_user_application(conn, user_id, job_id).await? {
        return Ok((existing, false));
    }
    let application = insert_application(conn, user_id, job_id, cover_letter).await?;
    Ok((application, true))
}

fn push_user_filter(qb: &mut QueryBuilder<'_, Sqlite>, user_id: i64, status: Option<ApplicationStatus>) {
    qb.push(" WHERE a.user_id = ").push_bind(user_id);
    if let Some(status) = status {
        qb.push(" AND a.status = ").push_bind(status);
    }
}

/// The user's applications with their job titles, newest first.
pub async fn list_user_applications(
    conn: &mut SqliteConnection,
    user_id: i64,
    status: Option<ApplicationStatus>,
    limit: i64,
    offset: i64,
) -> Result<Vec<ApplicationWithJob>, sqlx::Error> {
    let mut qb = QueryBuilder::<Sqlite>::new(
        r#"
        SELECT a.*, j.title AS job_title, c.name AS company_name
        FROM applications a
        JOIN jobs j ON j.id = a.job_id
        JOIN companies c ON c.id = j.company_id"#,
    );
    push_user_filter(&mut qb, user_id, status);
    qb.push(" ORDER BY a.applied_at DESC, a.id DESC LIMIT ")
        .push_bind(limit)
        .push(" OFFSET ")
        .push_bind(offset);
    qb.build_query_as::<ApplicationWithJob>()
        .fetch_all(&mut *conn)
        .await
}

pub async fn count_user_applications(
    conn: &mut SqliteConnection,
    user_id: i64,
    status: Option<ApplicationStatus>,
) -> Result<i64, sqlx::Error> {
    let mut qb = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM applications a");
    push_user_filter(&mut qb, user_id, status);
    qb.build_query_scalar::<i64>().fetch_one(&mut *conn).await
}

/// Per-status totals for one candidate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ApplicationStats {
    pub total: i64,
    pub applied: i64,
    pub interviewing: i64,
    pub approved: i64,
    pub rejected: i64,
}

pub async fn application_stats(
    conn: &mut SqliteConnection,
    user_id: i64,
) -> Result<ApplicationStats, sqlx::Error> {
    let rows = sqlx::query_as::<_, (ApplicationStatus, i64)>(
        "SELECT status, COUNT(*) FROM applications WHERE user_id = ? GROUP BY status",
    )
    .bind(user_id)
    .fetch_all(&mut *conn)
    .await?;

    let mut stats = ApplicationStats::default();
    for (status, count) in rows {
        stats.total += count;
        match status {
            ApplicationStatus::Applied => stats.applied = count,
            ApplicationStatus::Interviewing => stats.interviewing = count,
            ApplicationStatus::Approved => stats.approved = count,
            ApplicationStatus::Rejected => stats.rejected = count,
        }
    }
    Ok(stats)
}

/// Deletes the user's application while it is still `applied`. `None` when
/// no such application exists, which covers every other status.
pub async fn withdraw_application(
    conn: &mut SqliteConnection,
    application_id: i64,
    user_id: i64,
) -> Result<Option<Application>, sqlx::Error> {
    sqlx::query_as::<_, Application>(
        r#"
        DELETE FROM applications
        WHERE id = ? AND user_id = ? AND status = ?
        RETURNING *
        "#,
    )
    .bind(application_id)
    .bind(user_id)
    .bind(ApplicationStatus::Applied)
    .fetch_optional(&mut *conn)
    .await
}

pub async fn update_application_status(
    conn: &mut SqliteConnection,
    application_id: i64,
    update: &StatusUpdate,
) -> Result<Application, sqlx::Error> {
    sqlx::query_as::<_, Application>(
        r#"
        UPDATE applications
        SET status = ?, rejection_reason = ?, feedback_text = ?, updated_at = ?
        WHERE id = ?
        RETURNING *
        "#,
    )
    .bind(update.status)
    .bind(update.rejection_reason)
    .bind(&update.feedback_text)
    .bind(Utc::now())
    .bind(application_id)
    .fetch_one(&mut *conn)
    .await
}

/// Everyone who applied to `job_id`, newest first.
pub async fn list_applicants(
    conn: &mut SqliteConnection,
    job_id: i64,
) -> Result<Vec<Applicant>, sqlx::Error> {
    sqlx::query_as::<_, Applicant>(
        r#"
        SELECT a.*,
               u.email AS applicant_email,
               u.first_name AS applicant_first_name,
               u.last_name AS applicant_last_name,
               p.slug AS applicant_profile_slug
        FROM applications a
        JOIN users u ON u.id = a.user_id
        LEFT JOIN profiles p ON p.user_id = u.id
        WHERE a.job_id = ?
        ORDER BY a.applied_at DESC, a.id DESC
        "#,
    )
    .bind(job_id)
    .fetch_all(&mut *conn)
    .await
}

/// Application totals keyed by job id; jobs without applications are absent.
pub async fn count_applications_for_jobs(
    conn: &mut SqliteConnection,
    job_ids: &[i64],
) -> Result<HashMap<i64, i64>, sqlx::Error> {
    if job_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let mut qb = QueryBuilder::<Sqlite>::new("SELECT job_id, COUNT(*) FROM applications WHERE job_id IN (");
    let mut ids = qb.separated(", ");
    for id in job_ids {
        ids.push_bind(*id);
    }
    ids.push_unseparated(") GROUP BY job_id");

    let rows = qb.build_query_as::<(i64, i64)>().fetch_all(&mut *conn).await?;
    Ok(rows.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::repo::{insert_user, NewUser};
    use crate::db::{is_unique_violation, test_pool};
    use crate::jobs::repo::insert_job;
    use crate::jobs::repo::tests::{company, job_input};
    use crate::models::application::RejectionReason;

    async fn candidate(conn: &mut SqliteConnection, email: &str) -> i64 {
        insert_user(
            conn,
            NewUser {
                username: email,
                email,
                first_name: "Carla",
                last_name: "Candidate",
                password_hash: "x",
            },
        )
        .await
        .unwrap()
        .id
    }

    #[tokio::test]
    async fn second_application_is_a_unique_violation() {
        let pool = test_pool().await;
        let mut conn = pool.acquire().await.unwrap();
        let acme = company(&mut conn, "rita@example.com", "1").await;
        let job = insert_job(&mut conn, &job_input(acme.id, "Dev", &[])).await.unwrap();
        let carla = candidate(&mut conn, "carla@example.com").await;

        insert_application(&mut conn, carla, job.id, "Hi").await.unwrap();
        let err = insert_application(&mut conn, carla, job.id, "Again").await.unwrap_err();
        assert!(is_unique_violation(&err));

        let (existing, created) = get_or_create_application(&mut conn, carla, job.id, "")
            .await
            .unwrap();
        assert!(!created);
        assert_eq!(existing.cover_letter, "Hi");
    }

    #[tokio::test]
    async fn withdraw_only_removes_applied() {
        let pool = test_pool().await;
        let mut conn = pool.acquire().await.unwrap();
        let acme = company(&mut conn, "rita@example.com", "1").await;
        let job = insert_job(&mut conn, &job_input(acme.id, "Dev", &[])).await.unwrap();
        let other_job = insert_job(&mut conn, &job_input(acme.id, "Ops", &[])).await.unwrap();
        let carla = candidate(&mut conn, "carla@example.com").await;

        let interviewing = insert_application(&mut conn, carla, job.id, "").await.unwrap();
        update_application_status(
            &mut conn,
            interviewing.id,
            &StatusUpdate {
                status: ApplicationStatus::Interviewing,
                rejection_reason: None,
                feedback_text: String::new(),
            },
        )
        .await
        .unwrap();
        assert!(withdraw_application(&mut conn, interviewing.id, carla)
            .await
            .unwrap()
            .is_none());
        assert!(find_application(&mut conn, interviewing.id).await.unwrap().is_some());

        let applied = insert_application(&mut conn, carla, other_job.id, "").await.unwrap();
        let intruder = candidate(&mut conn, "eve@example.com").await;
        assert!(withdraw_application(&mut conn, applied.id, intruder).await.unwrap().is_none());
        assert!(withdraw_application(&mut conn, applied.id, carla).await.unwrap().is_some());
        assert!(find_application(&mut conn, applied.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn stats_and_filtered_listing() {
        let pool = test_pool().await;
        let mut conn = pool.acquire().await.unwrap();
        let acme = company(&mut conn, "rita@example.com", "1").await;
        let carla = candidate(&mut conn, "carla@example.com").await;

        let mut ids = Vec::new();
        for title in ["A", "B", "C"] {
            let job = insert_job(&mut conn, &job_input(acme.id, title, &[])).await.unwrap();
            ids.push(insert_application(&mut conn, carla, job.id, "").await.unwrap().id);
        }
        let rejected = update_application_status(
            &mut conn,
            ids[0],
            &StatusUpdate {
                status: ApplicationStatus::Rejected,
                rejection_reason: Some(RejectionReason::PositionFilled),
                feedback_text: "Filled internally".into(),
            },
        )
        .await
        .unwrap();
        assert_eq!(rejected.rejection_reason, Some(RejectionReason::PositionFilled));

        let stats = application_stats(&mut conn, carla).await.unwrap();
        assert_eq!(
            stats,
            ApplicationStats {
                total: 3,
                applied: 2,
                interviewing: 0,
                approved: 0,
                rejected: 1,
            }
        );

        let applied = list_user_applications(&mut conn, carla, Some(ApplicationStatus::Applied), 10, 0)
            .await
            .unwrap();
        let titles: Vec<&str> = applied.iter().map(|a| a.job_title.as_str()).collect();
        assert_eq!(titles, vec!["C", "B"]);
        assert_eq!(applied[0].company_name, acme.name);
        assert_eq!(
            count_user_applications(&mut conn, carla, Some(ApplicationStatus::Rejected))
                .await
                .unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn applicants_and_counts_per_job() {
        let pool = test_pool().await;
        let mut conn = pool.acquire().await.unwrap();
        let acme = company(&mut conn, "rita@example.com", "1").await;
        let job = insert_job(&mut conn, &job_input(acme.id, "Dev", &[])).await.unwrap();
        let quiet = insert_job(&mut conn, &job_input(acme.id, "Quiet", &[])).await.unwrap();
        let carla = candidate(&mut conn, "carla@example.com").await;
        let dan = candidate(&mut conn, "dan@example.com").await;
        insert_application(&mut conn, carla, job.id, "").await.unwrap();
        insert_application(&mut conn, dan, job.id, "").await.unwrap();

        let applicants = list_applicants(&mut conn, job.id).await.unwrap();
        assert_eq!(applicants.len(), 2);
        assert_eq!(applicants[0].applicant_email, "dan@example.com");
        assert_eq!(applicants[0].applicant_profile_slug, None);

        let counts = count_applications_for_jobs(&mut conn, &[job.id, quiet.id]).await.unwrap();
        assert_eq!(counts.get(&job.id), Some(&2));
        assert_eq!(counts.get(&quiet.id), None);
    }
}
