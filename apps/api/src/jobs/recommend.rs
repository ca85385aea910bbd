//! Skill-based job recommendations.

use sqlx::SqliteConnection;

use crate::jobs::repo::{fold_tag, list_jobs, JobFilter};
use crate::models::job::Job;

pub const RECOMMENDATION_LIMIT: i64 = 5;

/// Splits a comma-separated skill string into folded, non-empty tag keys.
pub fn parse_skills(skills: &str) -> Vec<String> {
    skills
        .split(',')
        .map(fold_tag)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Active jobs tagged with any of the profile's skills, newest first. Falls
/// back to the newest active jobs when there are no skills or no matches.
pub async fn recommended_jobs(
    conn: &mut SqliteConnection,
    skills: &str,
) -> Result<Vec<Job>, sqlx::Error> {
    let skills = parse_skills(skills);
    let active = JobFilter {
        is_active: Some(true),
        ..Default::default()
    };

    if !skills.is_empty() {
        let matching = JobFilter {
            any_tags: Some(&skills),
            ..active
        };
        let jobs = list_jobs(conn, &matching, Some(RECOMMENDATION_LIMIT), 0).await?;
        if !jobs.is_empty() {
            return Ok(jobs);
        }
    }
    list_jobs(conn, &active, Some(RECOMMENDATION_LIMIT), 0).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;
    use crate::jobs::repo::insert_job;
    use crate::jobs::repo::tests::{company, job_input};

    #[test]
    fn parse_skills_normalizes_tokens() {
        assert_eq!(parse_skills(" Python, DJANGO ,, "), vec!["python", "django"]);
        assert!(parse_skills("").is_empty());
        assert!(parse_skills(" , ").is_empty());
    }

    #[tokio::test]
    async fn matches_tags_case_insensitively_newest_first() {
        let pool = test_pool().await;
        let mut conn = pool.acquire().await.unwrap();
        let acme = company(&mut conn, "rita@example.com", "1").await;

        insert_job(&mut conn, &job_input(acme.id, "Java", &["Java"])).await.unwrap();
        insert_job(&mut conn, &job_input(acme.id, "Py", &["python"])).await.unwrap();
        let mut closed = job_input(acme.id, "Closed Django", &["Django"]);
        closed.is_active = false;
        insert_job(&mut conn, &closed).await.unwrap();
        insert_job(&mut conn, &job_input(acme.id, "Both", &["Python", "Django"])).await.unwrap();

        let jobs = recommended_jobs(&mut conn, "Python, Django").await.unwrap();
        let titles: Vec<&str> = jobs.iter().map(|j| j.title.as_str()).collect();
        assert_eq!(titles, vec!["Both", "Py"]);
    }

    #[test]
    fn parse_skills_folds_accented_letters() {
        assert_eq!(parse_skills("Ágil, ÉTICA"), vec!["ágil", "ética"]);
    }

    #[tokio::test]
    async fn matches_accented_tags_ignoring_case() {
        let pool = test_pool().await;
        let mut conn = pool.acquire().await.unwrap();
        let acme = company(&mut conn, "rita@example.com", "1").await;
        insert_job(&mut conn, &job_input(acme.id, "Old", &["Java"])).await.unwrap();
        insert_job(&mut conn, &job_input(acme.id, "Agile coach", &["Ágil"])).await.unwrap();
        insert_job(&mut conn, &job_input(acme.id, "Newest", &["Go"])).await.unwrap();

        for skills in ["Ágil", "ágil", "ÁGIL"] {
            let jobs = recommended_jobs(&mut conn, skills).await.unwrap();
            let titles: Vec<&str> = jobs.iter().map(|j| j.title.as_str()).collect();
            assert_eq!(titles, vec!["Agile coach"], "{skills}");
        }
    }

    #[tokio::test]
    async fn caps_at_five() {
        let pool = test_pool().await;
        let mut conn = pool.acquire().await.unwrap();
        let acme = company(&mut conn, "rita@example.com", "1").await;
        for i in 0..7 {
            insert_job(&mut conn, &job_input(acme.id, &format!("Rust {i}"), &["Rust"]))
                .await
                .unwrap();
        }
        let jobs = recommended_jobs(&mut conn, "rust").await.unwrap();
        assert_eq!(jobs.len(), 5);
        assert_eq!(jobs[0].title, "Rust 6");
    }

    #[tokio::test]
    async fn falls_back_to_newest_active_jobs() {
        let pool = test_pool().await;
        let mut conn = pool.acquire().await.unwrap();
        let acme = company(&mut conn, "rita@example.com", "1").await;
        insert_job(&mut conn, &job_input(acme.id, "Java", &["Java"])).await.unwrap();
        insert_job(&mut conn, &job_input(acme.id, "Go", &["Go"])).await.unwrap();

        for skills in ["", "Cobol"] {
            let jobs = recommended_jobs(&mut conn, skills).await.unwrap();
            let titles: Vec<&str> = jobs.iter().map(|j| j.title.as_str()).collect();
            assert_eq!(titles, vec!["Go", "Java"]);
        }
    }
}
