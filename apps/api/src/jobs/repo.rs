//! Job postings and their tags.
//!
//! Listings are built with [`JobFilter`]; every filter is pushed into a single
//! `QueryBuilder` statement so counting and paging see the same rows.

use std::collections::HashMap;

use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection};

use crate::jobs::forms::JobInput;
use crate::models::job::{Job, TagCount};

const JOB_COLUMNS: &str = r#"
    SELECT j.id, j.company_id, c.name AS company_name, c.owner_id AS company_owner_id,
           j.title, j.description, j.requirements, j.salary_range, j.is_active,
           j.created_at, j.updated_at
    FROM jobs j
    JOIN companies c ON c.id = j.company_id
    WHERE 1 = 1"#;

const LIKE_ESCAPE: &str = r" ESCAPE '\'";

const JOB_COUNT: &str = r#"
    SELECT COUNT(*)
    FROM jobs j
    JOIN companies c ON c.id = j.company_id
    WHERE 1 = 1"#;

/// Which jobs a listing includes. Unset fields do not filter.
#[derive(Debug, Default, Clone, Copy)]
pub struct JobFilter<'a> {
    pub is_active: Option<bool>,
    pub owner_id: Option<i64>,
    pub company_id: Option<i64>,
    /// Exact tag name, ignoring case.
    pub tag: Option<&'a str>,
    /// Substring of the title, company name, description or a tag name.
    pub search: Option<&'a str>,
    /// Tag names folded with [`fold_tag`]; a job matches when it carries
    /// any of them.
    pub any_tags: Option<&'a [String]>,
    /// Same company or at least one shared tag, excluding the job itself.
    pub related_to: Option<&'a Job>,
}

fn push_filters(qb: &mut QueryBuilder<'_, Sqlite>, filter: &JobFilter<'_>) {
    if let Some(active) = filter.is_active {
        qb.push(" AND j.is_active = ").push_bind(active);
    }
    if let Some(owner_id) = filter.owner_id {
        qb.push(" AND c.owner_id = ").push_bind(owner_id);
    }
    if let Some(company_id) = filter.company_id {
        qb.push(" AND j.company_id = ").push_bind(company_id);
    }
    if let Some(tag) = filter.tag {
        qb.push(
            " AND EXISTS (SELECT 1 FROM job_tags jt JOIN tags t ON t.id = jt.tag_id \
             WHERE jt.job_id = j.id AND t.name_folded = ",
        )
        .push_bind(fold_tag(tag))
        .push(")");
    }
    if let Some(search) = filter.search {
        let pattern = like_pattern(search);
        let folded = like_pattern(&fold_tag(search));
        qb.push(" AND (j.title LIKE ")
            .push_bind(pattern.clone())
            .push(LIKE_ESCAPE)
            .push(" OR c.name LIKE ")
            .push_bind(pattern.clone())
            .push(LIKE_ESCAPE)
            .push(" OR j.description LIKE ")
            .push_bind(pattern.clone())
            .push(LIKE_ESCAPE)
            .push(
                " OR EXISTS (SELECT 1 FROM job_tags jt JOIN tags t ON t.id = jt.tag_id \
                 WHERE jt.job_id = j.id AND t.name_folded LIKE ",
            )
            .push_bind(folded)
            .push(LIKE_ESCAPE)
            .push("))");
    }
    if let Some(tags) = filter.any_tags {
        if tags.is_empty() {
            qb.push(" AND 0");
        } else {
            qb.push(
                " AND EXISTS (SELECT 1 FROM job_tags jt JOIN tags t ON t.id = jt.tag_id \
                 WHERE jt.job_id = j.id AND t.name_folded IN (",
            );
            let mut names = qb.separated(", ");
            for tag in tags {
                names.push_bind(tag.clone());
            }
            names.push_unseparated("))");
        }
    }
    if let Some(job) = filter.related_to {
        qb.push(" AND j.id != ")
            .push_bind(job.id)
            .push(" AND (j.company_id = ")
            .push_bind(job.company_id)
            .push(
                " OR EXISTS (SELECT 1 FROM job_tags jt WHERE jt.job_id = j.id \
                 AND jt.tag_id IN (SELECT tag_id FROM job_tags WHERE job_id = ",
            )
            .push_bind(job.id)
            .push(")))");
    }
}

/// Case-folded tag key. SQLite's `LOWER`, `NOCASE` and `LIKE` only fold
/// ASCII, so every case-insensitive tag comparison goes through this key.
pub fn fold_tag(name: &str) -> String {
    name.trim().to_lowercase()
}

/// `%term%` with LIKE wildcards in `term` escaped by backslash.
fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Matching jobs newest first, with tags loaded.
pub async fn list_jobs(
    conn: &mut SqliteConnection,
    filter: &JobFilter<'_>,
    limit: Option<i64>,
    offset: i64,
) -> Result<Vec<Job>, sqlx::Error> {
    let mut qb = QueryBuilder::<Sqlite>::new(JOB_COLUMNS);
    push_filters(&mut qb, filter);
    qb.push(" ORDER BY j.created_at DESC, j.id DESC");
    if let Some(limit) = limit {
        qb.push(" LIMIT ").push_bind(limit).push(" OFFSET ").push_bind(offset);
    }

    let mut jobs = qb.build_query_as::<Job>().fetch_all(&mut *conn).await?;
    attach_tags(conn, &mut jobs).await?;
    Ok(jobs)
}

pub async fn count_jobs(conn: &mut SqliteConnection, filter: &JobFilter<'_>) -> Result<i64, sqlx::Error> {
    let mut qb = QueryBuilder::<Sqlite>::new(JOB_COUNT);
    push_filters(&mut qb, filter);
    qb.build_query_scalar::<i64>().fetch_one(&mut *conn).await
}

pub async fn find_job(conn: &mut SqliteConnection, job_id: i64) -> Result<Option<Job>, sqlx::Error> {
    let mut qb = QueryBuilder::<Sqlite>::new(JOB_COLUMNS);
    qb.push(" AND j.id = ").push_bind(job_id);
    let Some(job) = qb.build_query_as::<Job>().fetch_optional(&mut *conn).await? else {
        return Ok(None);
    };
    let mut jobs = vec![job];
    attach_tags(conn, &mut jobs).await?;
    Ok(jobs.pop())
}

async fn fetch_job(conn: &mut SqliteConnection, job_id: i64) -> Result<Job, sqlx::Error> {
    find_job(conn, job_id).await?.ok_or(sqlx::Error::RowNotFound)
}

async fn attach_tags(conn: &mut SqliteConnection, jobs: &mut [Job]) -> Result<(), sqlx::Error> {
    let ids: Vec<i64> = jobs.iter().map(|job| job.id).collect();
    let mut tags = tags_for_jobs(conn, &ids).await?;
    for job in jobs.iter_mut() {
        job.tags = tags.remove(&job.id).unwrap_or_default();
    }
    Ok(())
}

/// Tag names per job id, alphabetical.
async fn tags_for_jobs(
    conn: &mut SqliteConnection,
    job_ids: &[i64],
) -> Result<HashMap<i64, Vec<String>>, sqlx::Error> {
    let mut tags: HashMap<i64, Vec<String>> = HashMap::new();
    if job_ids.is_empty() {
        return Ok(tags);
    }

    let mut qb = QueryBuilder::<Sqlite>::new(
        "SELECT jt.job_id, t.name FROM job_tags jt JOIN tags t ON t.id = jt.tag_id WHERE jt.job_id IN (",
    );
    let mut ids = qb.separated(", ");
    for id in job_ids {
        ids.push_bind(*id);
    }
    ids.push_unseparated(") ORDER BY t.name");

    let rows = qb
        .build_query_as::<(i64, String)>()
        .fetch_all(&mut *conn)
        .await?;
    for (job_id, name) in rows {
        tags.entry(job_id).or_default().push(name);
    }
    Ok(tags)
}

// ────────────────────────────────────────────────────────────────────────────
// Writes
// ────────────────────────────────────────────────────────────────────────────

/// Inserts the job and its tags. Run inside a transaction.
pub async fn insert_job(conn: &mut SqliteConnection, input: &JobInput) -> Result<Job, sqlx::Error> {
    let now = Utc::now();
    let job_id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO jobs (company_id, title, description, requirements, salary_range, is_active, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(input.company_id)
    .bind(&input.title)
    .bind(&input.description)
    .bind(&input.requirements)
    .bind(&input.salary_range)
    .bind(input.is_active)
    .bind(now)
    .bind(now)
    .fetch_one(&mut *conn)
    .await?;

    replace_job_tags(conn, job_id, &input.tags).await?;
    fetch_job(conn, job_id).await
}

/// Updates the job and replaces its tag set. Run inside a transaction.
pub async fn update_job(
    conn: &mut SqliteConnection,
    job_id: i64,
    input: &JobInput,
) -> Result<Job, sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE jobs
        SET company_id = ?, title = ?, description = ?, requirements = ?, salary_range = ?,
            is_active = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(input.company_id)
    .bind(&input.title)
    .bind(&input.description)
    .bind(&input.requirements)
    .bind(&input.salary_range)
    .bind(input.is_active)
    .bind(Utc::now())
    .bind(job_id)
    .execute(&mut *conn)
    .await?;

    replace_job_tags(conn, job_id, &input.tags).await?;
    fetch_job(conn, job_id).await
}

/// Deletes the job together with its applications.
pub async fn delete_job(conn: &mut SqliteConnection, job_id: i64) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM jobs WHERE id = ?")
        .bind(job_id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

/// Finds a job by (company, title) and creates it from `input` when missing.
/// The flag is true when a row was inserted.
pub async fn get_or_create_job(
    conn: &mut SqliteConnection,
    input: &JobInput,
) -> Result<(Job, bool), sqlx::Error> {
    let existing = sqlx::query_scalar::<_, i64>(
        "SELECT id FROM jobs WHERE company_id = ? AND title = ? ORDER BY id LIMIT 1",
    )
    .bind(input.company_id)
    .bind(&input.title)
    .fetch_optional(&mut *conn)
    .await?;

    match existing {
        Some(job_id) => Ok((fetch_job(conn, job_id).await?, false)),
        None => Ok((insert_job(conn, input).await?, true)),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tags
// ────────────────────────────────────────────────────────────────────────────

/// Makes the job's tag set exactly `names`.
pub async fn replace_job_tags(
    conn: &mut SqliteConnection,
    job_id: i64,
    names: &[String],
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM job_tags WHERE job_id = ?")
        .bind(job_id)
        .execute(&mut *conn)
        .await?;

    for name in names {
        let (tag_id, _) = ensure_tag(conn, name).await?;
        sqlx::query("INSERT OR IGNORE INTO job_tags (job_id, tag_id) VALUES (?, ?)")
            .bind(job_id)
            .bind(tag_id)
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

/// Returns the tag id, creating the tag when missing. The flag is true
/// when a row was inserted.
async fn ensure_tag(conn: &mut SqliteConnection, name: &str) -> Result<(i64, bool), sqlx::Error> {
    let inserted = sqlx::query(
        "INSERT INTO tags (name, name_folded) VALUES (?, ?) ON CONFLICT (name) DO NOTHING",
    )
    .bind(name)
    .bind(fold_tag(name))
    .execute(&mut *conn)
    .await?
    .rows_affected()
        > 0;
    let tag_id = sqlx::query_scalar::<_, i64>("SELECT id FROM tags WHERE name = ?")
        .bind(name)
        .fetch_one(&mut *conn)
        .await?;
    Ok((tag_id, inserted))
}

/// Creates every missing tag in `names`; returns how many were new.
pub async fn ensure_tags(conn: &mut SqliteConnection, names: &[&str]) -> Result<usize, sqlx::Error> {
    let mut created = 0;
    for name in names {
        if ensure_tag(conn, name).await?.1 {
            created += 1;
        }
    }
    Ok(created)
}

/// Tag names containing `query` (case-insensitive), alphabetical.
pub async fn search_tags(
    conn: &mut SqliteConnection,
    query: &str,
    limit: i64,
) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>(
        r"SELECT name FROM tags WHERE name_folded LIKE ? ESCAPE '\' ORDER BY name LIMIT ?",
    )
    .bind(like_pattern(&fold_tag(query)))
    .bind(limit)
    .fetch_all(&mut *conn)
    .await
}

/// Most used tags across all jobs.
pub async fn popular_tags(conn: &mut SqliteConnection, limit: i64) -> Result<Vec<TagCount>, sqlx::Error> {
    sqlx::query_as::<_, TagCount>(
        r#"
        SELECT t.name, COUNT(jt.job_id) AS job_count
        FROM tags t
        LEFT JOIN job_tags jt ON jt.tag_id = t.id
        GROUP BY t.id, t.name
        ORDER BY job_count DESC, t.name
        LIMIT ?
        "#,
    )
    .bind(limit)
    .fetch_all(&mut *conn)
    .await
}
