use std::collections::HashSet;

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use sqlx::SqliteConnection;
use tracing::info;

use crate::accounts::forms::{
    EducationInput, ExperienceInput, ProfileUpdate, TechProjectInput, UserUpdate,
};
use crate::accounts::slug::{base_slug, candidate};
use crate::db::is_unique_violation;
use crate::forms::FormsetOp;
use crate::models::profile::{
    Education, EducationStatus, ProfessionalExperience, Profile, TechProject,
};
use crate::models::user::User;

const MAX_SLUG_ATTEMPTS: u32 = 100;

// ────────────────────────────────────────────────────────────────────────────
// Users
// ────────────────────────────────────────────────────────────────────────────

pub struct NewUser<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub password_hash: &'a str,
}

pub async fn insert_user(conn: &mut SqliteConnection, new: NewUser<'_>) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (username, email, first_name, last_name, password_hash, date_joined)
        VALUES (?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(new.username)
    .bind(new.email)
    .bind(new.first_name)
    .bind(new.last_name)
    .bind(new.password_hash)
    .bind(Utc::now())
    .fetch_one(&mut *conn)
    .await
}

pub async fn get_user(conn: &mut SqliteConnection, user_id: i64) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_one(&mut *conn)
        .await
}

pub async fn find_user_by_email(
    conn: &mut SqliteConnection,
    email: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
        .bind(email)
        .fetch_optional(&mut *conn)
        .await
}

pub async fn find_user_by_username(
    conn: &mut SqliteConnection,
    username: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = ?")
        .bind(username)
        .fetch_optional(&mut *conn)
        .await
}

/// True when another account already uses `email`.
pub async fn email_taken(
    conn: &mut SqliteConnection,
    email: &str,
    except_user_id: Option<i64>,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM users WHERE email = ? AND id != ?)",
    )
    .bind(email)
    .bind(except_user_id.unwrap_or(0))
    .fetch_one(&mut *conn)
    .await
}

pub async fn update_user(
    conn: &mut SqliteConnection,
    user_id: i64,
    update: &UserUpdate,
) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        UPDATE users SET first_name = ?, last_name = ?, email = ?
        WHERE id = ?
        RETURNING *
        "#,
    )
    .bind(&update.first_name)
    .bind(&update.last_name)
    .bind(&update.email)
    .bind(user_id)
    .fetch_one(&mut *conn)
    .await
}

// ────────────────────────────────────────────────────────────────────────────
// Profiles
// ────────────────────────────────────────────────────────────────────────────

pub async fn find_profile_by_user(
    conn: &mut SqliteConnection,
    user_id: i64,
) -> Result<Option<Profile>, sqlx::Error> {
    sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE user_id = ?")
        .bind(user_id)
        .fetch_optional(&mut *conn)
        .await
}

pub async fn find_profile_by_slug(
    conn: &mut SqliteConnection,
    slug: &str,
) -> Result<Option<Profile>, sqlx::Error> {
    sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE slug = ?")
        .bind(slug)
        .fetch_optional(&mut *conn)
        .await
}

/// Returns the user's profile, creating it on first access with a unique
/// slug derived from the username.
pub async fn ensure_profile(conn: &mut SqliteConnection, user: &User) -> Result<Profile, sqlx::Error> {
    if let Some(profile) = find_profile_by_user(conn, user.id).await? {
        return Ok(profile);
    }

    let base = base_slug(&user.username);
    let mut attempt = 1;
    loop {
        let slug = candidate(&base, attempt);
        let now = Utc::now();
        let inserted = sqlx::query_as::<_, Profile>(
            r#"
            INSERT INTO profiles (user_id, slug, created_at, updated_at)
            VALUES (?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(user.id)
        .bind(&slug)
        .bind(now)
        .bind(now)
        .fetch_one(&mut *conn)
        .await;

        match inserted {
            Ok(profile) => {
                info!("Created profile '{}' for user {}", profile.slug, user.id);
                return Ok(profile);
            }
            Err(e) if is_unique_violation(&e) && attempt < MAX_SLUG_ATTEMPTS => {
                // Either the slug is taken or a concurrent request created the profile.
                if let Some(profile) = find_profile_by_user(conn, user.id).await? {
                    return Ok(profile);
                }
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

pub async fn slug_taken(
    conn: &mut SqliteConnection,
    slug: &str,
    except_profile_id: i64,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM profiles WHERE slug = ? AND id != ?)",
    )
    .bind(slug)
    .bind(except_profile_id)
    .fetch_one(&mut *conn)
    .await
}

/// First free slug for `username`, ignoring the profile being edited.
pub async fn free_slug_for(
    conn: &mut SqliteConnection,
    username: &str,
    profile_id: i64,
) -> Result<String, sqlx::Error> {
    let base = base_slug(username);
    let mut attempt = 1;
    loop {
        let slug = candidate(&base, attempt);
        if attempt >= MAX_SLUG_ATTEMPTS || !slug_taken(conn, &slug, profile_id).await? {
            return Ok(slug);
        }
        attempt += 1;
    }
}

/// Writes the editable profile fields with the resolved `slug`.
pub async fn update_profile(
    conn: &mut SqliteConnection,
    profile_id: i64,
    update: &ProfileUpdate,
    slug: &str,
) -> Result<Profile, sqlx::Error> {
    sqlx::query_as::<_, Profile>(
        r#"
        UPDATE profiles
        SET bio = ?, city = ?, contact_info = ?, github_url = ?, linkedin_url = ?,
            is_portfolio_public = ?, is_published = ?, slug = ?, updated_at = ?
        WHERE id = ?
        RETURNING *
        "#,
    )
    .bind(&update.bio)
    .bind(&update.city)
    .bind(&update.contact_info)
    .bind(&update.github_url)
    .bind(&update.linkedin_url)
    .bind(update.is_portfolio_public)
    .bind(update.is_published)
    .bind(slug)
    .bind(Utc::now())
    .bind(profile_id)
    .fetch_one(&mut *conn)
    .await
}

pub async fn update_skills(
    conn: &mut SqliteConnection,
    profile_id: i64,
    skills: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE profiles SET skills = ?, updated_at = ? WHERE id = ?")
        .bind(skills)
        .bind(Utc::now())
        .bind(profile_id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Profile children
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
pub enum ChildTable {
    Experiences,
    Education,
    TechProjects,
}

impl ChildTable {
    fn table(self) -> &'static str {
        match self {
            ChildTable::Experiences => "professional_experiences",
            ChildTable::Education => "educations",
            ChildTable::TechProjects => "tech_projects",
        }
    }
}

/// Ids of the child rows of one kind that belong to a profile.
pub async fn child_ids(
    conn: &mut SqliteConnection,
    table: ChildTable,
    profile_id: i64,
) -> Result<HashSet<i64>, sqlx::Error> {
    let sql = format!("SELECT id FROM {} WHERE profile_id = ?", table.table());
    let ids: Vec<i64> = sqlx::query_scalar(&sql)
        .bind(profile_id)
        .fetch_all(&mut *conn)
        .await?;
    Ok(ids.into_iter().collect())
}

async fn delete_child(
    conn: &mut SqliteConnection,
    table: ChildTable,
    profile_id: i64,
    id: i64,
) -> Result<(), sqlx::Error> {
    let sql = format!("DELETE FROM {} WHERE id = ? AND profile_id = ?", table.table());
    sqlx::query(&sql)
        .bind(id)
        .bind(profile_id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct PortfolioCounts {
    pub experiences: i64,
    pub education: i64,
    pub tech_projects: i64,
}

pub async fn portfolio_counts(
    conn: &mut SqliteConnection,
    profile_id: i64,
) -> Result<PortfolioCounts, sqlx::Error> {
    let (experiences, education, tech_projects) = sqlx::query_as::<_, (i64, i64, i64)>(
        r#"
        SELECT
            (SELECT COUNT(*) FROM professional_experiences WHERE profile_id = ?1),
            (SELECT COUNT(*) FROM educations WHERE profile_id = ?1),
            (SELECT COUNT(*) FROM tech_projects WHERE profile_id = ?1)
        "#,
    )
    .bind(profile_id)
    .fetch_one(&mut *conn)
    .await?;
    Ok(PortfolioCounts {
        experiences,
        education,
        tech_projects,
    })
}

pub async fn list_experiences(
    conn: &mut SqliteConnection,
    profile_id: i64,
    limit: i64,
) -> Result<Vec<ProfessionalExperience>, sqlx::Error> {
    sqlx::query_as::<_, ProfessionalExperience>(
        r#"
        SELECT * FROM professional_experiences
        WHERE profile_id = ?
        ORDER BY start_date DESC, id DESC
        LIMIT ?
        "#,
    )
    .bind(profile_id)
    .bind(limit)
    .fetch_all(&mut *conn)
    .await
}

pub async fn list_education(
    conn: &mut SqliteConnection,
    profile_id: i64,
    limit: i64,
) -> Result<Vec<Education>, sqlx::Error> {
    sqlx::query_as::<_, Education>(
        r#"
        SELECT * FROM educations
        WHERE profile_id = ?
        ORDER BY start_date DESC, id DESC
        LIMIT ?
        "#,
    )
    .bind(profile_id)
    .bind(limit)
    .fetch_all(&mut *conn)
    .await
}

pub async fn list_tech_projects(
    conn: &mut SqliteConnection,
    profile_id: i64,
    limit: i64,
) -> Result<Vec<TechProject>, sqlx::Error> {
    sqlx::query_as::<_, TechProject>(
        r#"
        SELECT * FROM tech_projects
        WHERE profile_id = ?
        ORDER BY created_at DESC, id DESC
        LIMIT ?
        "#,
    )
    .bind(profile_id)
    .bind(limit)
    .fetch_all(&mut *conn)
    .await
}

pub async fn insert_experience(
    conn: &mut SqliteConnection,
    profile_id: i64,
    input: &ExperienceInput,
) -> Result<(), sqlx::Error> {
    let now = Utc::now();
    sqlx::query(
        r#"
        INSERT INTO professional_experiences
            (profile_id, company, role, start_date, end_date, description, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(profile_id)
    .bind(&input.company)
    .bind(&input.role)
    .bind(input.start_date)
    .bind(input.end_date)
    .bind(&input.description)
    .bind(now)
    .bind(now)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

/// Applies a validated experience formset.
pub async fn apply_experience_ops(
    conn: &mut SqliteConnection,
    profile_id: i64,
    ops: &[FormsetOp<ExperienceInput>],
) -> Result<(), sqlx::Error> {
    for op in ops {
        match op {
            FormsetOp::Create(input) => insert_experience(conn, profile_id, input).await?,
            FormsetOp::Update(id, input) => {
                sqlx::query(
                    r#"
                    UPDATE professional_experiences
                    SET company = ?, role = ?, start_date = ?, end_date = ?, description = ?,
                        updated_at = ?
                    WHERE id = ? AND profile_id = ?
                    "#,
                )
                .bind(&input.company)
                .bind(&input.role)
                .bind(input.start_date)
                .bind(input.end_date)
                .bind(&input.description)
                .bind(Utc::now())
                .bind(id)
                .bind(profile_id)
                .execute(&mut *conn)
                .await?;
            }
            FormsetOp::Delete(id) => {
                delete_child(conn, ChildTable::Experiences, profile_id, *id).await?
            }
        }
    }
    Ok(())
}

pub async fn insert_education(
    conn: &mut SqliteConnection,
    profile_id: i64,
    input: &EducationInput,
) -> Result<(), sqlx::Error> {
    let now = Utc::now();
    sqlx::query(
        r#"
        INSERT INTO educations
            (profile_id, institution, course, status, start_date, end_date, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(profile_id)
    .bind(&input.institution)
    .bind(&input.course)
    .bind(input.status)
    .bind(input.start_date)
    .bind(input.end_date)
    .bind(now)
    .bind(now)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

pub async fn apply_education_ops(
    conn: &mut SqliteConnection,
    profile_id: i64,
    ops: &[FormsetOp<EducationInput>],
) -> Result<(), sqlx::Error> {
    for op in ops {
        match op {
            FormsetOp::Create(input) => insert_education(conn, profile_id, input).await?,
            FormsetOp::Update(id, input) => {
                sqlx::query(
                    r#"
                    UPDATE educations
                    SET institution = ?, course = ?, status = ?, start_date = ?, end_date = ?,
                        updated_at = ?
                    WHERE id = ? AND profile_id = ?
                    "#,
                )
                .bind(&input.institution)
                .bind(&input.course)
                .bind(input.status)
                .bind(input.start_date)
                .bind(input.end_date)
                .bind(Utc::now())
                .bind(id)
                .bind(profile_id)
                .execute(&mut *conn)
                .await?;
            }
            FormsetOp::Delete(id) => {
                delete_child(conn, ChildTable::Education, profile_id, *id).await?
            }
        }
    }
    Ok(())
}

pub async fn apply_tech_project_ops(
    conn: &mut SqliteConnection,
    profile_id: i64,
    ops: &[FormsetOp<TechProjectInput>],
) -> Result<(), sqlx::Error> {
    for op in ops {
        match op {
            FormsetOp::Create(input) => {
                let now = Utc::now();
                sqlx::query(
                    r#"
                    INSERT INTO tech_projects
                        (profile_id, name, description, url, project_type, created_at, updated_at)
                    VALUES (?, ?, ?, ?, ?, ?, ?)
                    "#,
                )
                .bind(profile_id)
                .bind(&input.name)
                .bind(&input.description)
                .bind(&input.url)
                .bind(input.project_type)
                .bind(now)
                .bind(now)
                .execute(&mut *conn)
                .await?;
            }
            FormsetOp::Update(id, input) => {
                sqlx::query(
                    r#"
                    UPDATE tech_projects
                    SET name = ?, description = ?, url = ?, project_type = ?, updated_at = ?
                    WHERE id = ? AND profile_id = ?
                    "#,
                )
                .bind(&input.name)
                .bind(&input.description)
                .bind(&input.url)
                .bind(input.project_type)
                .bind(Utc::now())
                .bind(id)
                .bind(profile_id)
                .execute(&mut *conn)
                .await?;
            }
            FormsetOp::Delete(id) => {
                delete_child(conn, ChildTable::TechProjects, profile_id, *id).await?
            }
        }
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Get-or-create helpers (seeding)
// ────────────────────────────────────────────────────────────────────────────

/// Inserts an experience unless one with the same (company, role) exists.
/// Returns whether a row was created.
pub async fn get_or_create_experience(
    conn: &mut SqliteConnection,
    profile_id: i64,
    input: &ExperienceInput,
) -> Result<bool, sqlx::Error> {
    let exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM professional_experiences WHERE profile_id = ? AND company = ? AND role = ?)",
    )
    .bind(profile_id)
    .bind(&input.company)
    .bind(&input.role)
    .fetch_one(&mut *conn)
    .await?;
    if exists {
        return Ok(false);
    }
    insert_experience(conn, profile_id, input).await?;
    Ok(true)
}

/// Inserts an education entry unless one with the same (institution, course)
/// exists. Returns whether a row was created.
pub async fn get_or_create_education(
    conn: &mut SqliteConnection,
    profile_id: i64,
    institution: &str,
    course: &str,
    status: EducationStatus,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
) -> Result<bool, sqlx::Error> {
    let exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM educations WHERE profile_id = ? AND institution = ? AND course = ?)",
    )
    .bind(profile_id)
    .bind(institution)
    .bind(course)
    .fetch_one(&mut *conn)
    .await?;
    if exists {
        return Ok(false);
    }
    let input = EducationInput {
        institution: institution.to_string(),
        course: course.to_string(),
        status,
        start_date,
        end_date,
    };
    insert_education(conn, profile_id, &input).await?;
    Ok(true)
}
