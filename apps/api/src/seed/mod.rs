//! Demo data for local development: recruiters with companies and jobs,
//! candidates with varying profile completeness, and their applications.
//!
//! Every record is looked up before it is created, so the seed can run
//! against a populated database without duplicating rows.

pub mod fixtures;
pub mod techs;

use std::fmt;

use anyhow::Result;
use chrono::{Duration, NaiveDate, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};

use crate::accounts::forms::{ExperienceInput, ProfileUpdate, SlugChoice};
use crate::accounts::password::hash_password;
use crate::accounts::repo as accounts;
use crate::companies::forms::CompanyInput;
use crate::companies::repo::{get_or_create_company, list_companies_by_owner};
use crate::jobs::applications::{
    count_user_applications, get_or_create_application, update_application_status,
};
use crate::jobs::forms::{JobInput, StatusUpdate};
use crate::jobs::repo::{get_or_create_job, list_jobs, JobFilter};
use crate::models::application::ApplicationStatus;
use crate::models::user::User;

use fixtures::{
    CandidateFixture, COVER_LETTERS, DEFAULT_PASSWORD, INCOMPLETE_CANDIDATES, JOB_TEMPLATES,
    MID_LEVEL_CANDIDATES, RECRUITERS, STRONG_CANDIDATES,
};

const MIN_APPLICATIONS: usize = 3;
const MAX_APPLICATIONS: usize = 7;

/// Created versus already-present rows per entity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedStats {
    pub users_created: usize,
    pub users_existing: usize,
    pub companies_created: usize,
    pub companies_existing: usize,
    pub jobs_created: usize,
    pub jobs_existing: usize,
    pub applications_created: usize,
}

impl fmt::Display for SeedStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "users {} new / {} existing, companies {} new / {} existing, \
             jobs {} new / {} existing, applications {} new",
            self.users_created,
            self.users_existing,
            self.companies_created,
            self.companies_existing,
            self.jobs_created,
            self.jobs_existing,
            self.applications_created,
        )
    }
}

/// Seeds the database inside a single transaction.
pub async fn run(pool: &SqlitePool) -> Result<SeedStats> {
    let mut tx = pool.begin().await?;
    let stats = seed_database(&mut tx, &mut StdRng::from_entropy()).await?;
    tx.commit().await?;
    Ok(stats)
}

async fn seed_database(conn: &mut SqliteConnection, rng: &mut StdRng) -> Result<SeedStats> {
    let mut stats = SeedStats::default();
    let password_hash = hash_password(DEFAULT_PASSWORD)?;

    info!("Seeding recruiters and companies...");
    for recruiter in RECRUITERS {
        let user = get_or_create_user(
            conn,
            &mut stats,
            UserFixture {
                username: recruiter.username,
                email: recruiter.email,
                first_name: recruiter.first_name,
                last_name: recruiter.last_name,
            },
            &password_hash,
        )
        .await?;

        for fixture in recruiter.companies {
            let input = CompanyInput {
                name: fixture.name.to_string(),
                cnpj: fixture.cnpj.to_string(),
                website: fixture.website.to_string(),
                description: fixture.description.to_string(),
            };
            let (_, created) = get_or_create_company(conn, user.id, &input).await?;
            if created {
                stats.companies_created += 1;
            } else {
                stats.companies_existing += 1;
            }
        }
        seed_jobs(conn, &mut stats, rng, user.id).await?;
    }

    info!("Seeding candidates...");
    let mut applicants = Vec::new();
    for fixture in STRONG_CANDIDATES {
        let user = seed_candidate(conn, &mut stats, fixture, &password_hash).await?;
        seed_portfolio(conn, rng, &user, fixture).await?;
        applicants.push(user);
    }
    for fixture in MID_LEVEL_CANDIDATES {
        applicants.push(seed_candidate(conn, &mut stats, fixture, &password_hash).await?);
    }
    for fixture in INCOMPLETE_CANDIDATES {
        seed_candidate(conn, &mut stats, fixture, &password_hash).await?;
    }

    info!("Seeding applications...");
    seed_applications(conn, &mut stats, rng, &applicants).await?;

    Ok(stats)
}

struct UserFixture<'a> {
    username: &'a str,
    email: &'a str,
    first_name: &'a str,
    last_name: &'a str,
}

/// Looks the user up by username, creating it (and its profile) when missing.
async fn get_or_create_user(
    conn: &mut SqliteConnection,
    stats: &mut SeedStats,
    fixture: UserFixture<'_>,
    password_hash: &str,
) -> Result<User> {
    let user = match accounts::find_user_by_username(conn, fixture.username).await? {
        Some(user) => {
            stats.users_existing += 1;
            user
        }
        None => {
            let user = accounts::insert_user(
                conn,
                accounts::NewUser {
                    username: fixture.username,
                    email: fixture.email,
                    first_name: fixture.first_name,
                    last_name: fixture.last_name,
                    password_hash,
                },
            )
            .await?;
            debug!("Created user {}", user.username);
            stats.users_created += 1;
            user
        }
    };
    accounts::ensure_profile(conn, &user).await?;
    Ok(user)
}

/// Posts every job template for each company the recruiter owns. The last
/// template is posted paused.
async fn seed_jobs(
    conn: &mut SqliteConnection,
    stats: &mut SeedStats,
    rng: &mut StdRng,
    owner_id: i64,
) -> Result<()> {
    let paused = JOB_TEMPLATES.len() - 1;
    for company in list_companies_by_owner(conn, owner_id).await? {
        let mut order: Vec<usize> = (0..JOB_TEMPLATES.len()).collect();
        order.shuffle(rng);

        for index in order {
            let template = &JOB_TEMPLATES[index];
            let input = JobInput {
                company_id: company.id,
                title: template.title.to_string(),
                description: template.description.to_string(),
                requirements: template.requirements.to_string(),
                salary_range: template.salary_range.to_string(),
                is_active: index != paused,
                tags: template.tags.iter().map(|t| t.to_string()).collect(),
            };
            let (_, created) = get_or_create_job(conn, &input).await?;
            if created {
                stats.jobs_created += 1;
            } else {
                stats.jobs_existing += 1;
            }
        }
    }
    Ok(())
}

/// Creates the candidate and fills whatever profile fields the fixture has.
async fn seed_candidate(
    conn: &mut SqliteConnection,
    stats: &mut SeedStats,
    fixture: &CandidateFixture,
    password_hash: &str,
) -> Result<User> {
    let user = get_or_create_user(
        conn,
        stats,
        UserFixture {
            username: fixture.username,
            email: fixture.email,
            first_name: fixture.first_name,
            last_name: fixture.last_name,
        },
        password_hash,
    )
    .await?;

    if fixture.bio.is_empty() && fixture.skills.is_empty() {
        return Ok(user);
    }

    let profile = accounts::ensure_profile(conn, &user).await?;
    let update = ProfileUpdate {
        bio: fixture.bio.to_string(),
        city: fixture.city.to_string(),
        contact_info: profile.contact_info.clone(),
        github_url: fixture.github_url.to_string(),
        linkedin_url: fixture.linkedin_url.to_string(),
        is_portfolio_public: profile.is_portfolio_public,
        is_published: profile.is_published,
        slug: SlugChoice::Keep,
    };
    accounts::update_profile(conn, profile.id, &update, &profile.slug).await?;
    accounts::update_skills(conn, profile.id, fixture.skills).await?;
    Ok(user)
}

fn days_ago(rng: &mut StdRng, min: i64, max: i64) -> NaiveDate {
    Utc::now().date_naive() - Duration::days(rng.gen_range(min..=max))
}

/// Experience and education entries. The first experience is the current job.
async fn seed_portfolio(
    conn: &mut SqliteConnection,
    rng: &mut StdRng,
    user: &User,
    fixture: &CandidateFixture,
) -> Result<()> {
    let profile = accounts::ensure_profile(conn, user).await?;

    for (position, experience) in fixture.experiences.iter().enumerate() {
        let start_date = days_ago(rng, 365, 2920);
        let end_date = if position == 0 {
            None
        } else {
            Some(days_ago(rng, 30, 365))
        };
        let input = ExperienceInput {
            company: experience.company.to_string(),
            role: experience.role.to_string(),
            start_date,
            end_date,
            description: experience.description.to_string(),
        };
        accounts::get_or_create_experience(conn, profile.id, &input).await?;
    }

    for education in fixture.education {
        let start_date = days_ago(rng, 2190, 3650);
        let end_date = days_ago(rng, 365, 1825);
        accounts::get_or_create_education(
            conn,
            profile.id,
            education.institution,
            education.course,
            education.status,
            Some(start_date),
            Some(end_date),
        )
        .await?;
    }
    Ok(())
}

/// Candidates without any application apply to a random handful of active
/// jobs. Roughly one in four applications moves on to an interview.
async fn seed_applications(
    conn: &mut SqliteConnection,
    stats: &mut SeedStats,
    rng: &mut StdRng,
    applicants: &[User],
) -> Result<()> {
    let active = JobFilter {
        is_active: Some(true),
        ..Default::default()
    };
    let jobs = list_jobs(conn, &active, None, 0).await?;
    if jobs.is_empty() {
        return Ok(());
    }

    for user in applicants {
        if count_user_applications(conn, user.id, None).await? > 0 {
            continue;
        }

        let wanted = rng.gen_range(MIN_APPLICATIONS..=MAX_APPLICATIONS);
        let picked: Vec<_> = jobs.choose_multiple(rng, wanted).collect();
        for job in picked {
            let cover_letter = if rng.gen_bool(0.5) {
                COVER_LETTERS.choose(rng).copied().unwrap_or_default()
            } else {
                ""
            };
            let (application, created) =
                get_or_create_application(conn, user.id, job.id, cover_letter).await?;
            if !created {
                continue;
            }
            stats.applications_created += 1;

            if rng.gen_bool(0.25) {
                let update = StatusUpdate {
                    status: ApplicationStatus::Interviewing,
                    rejection_reason: None,
                    feedback_text: String::new(),
                };
                update_application_status(conn, application.id, &update).await?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    async fn count(conn: &mut SqliteConnection, table: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&mut *conn)
            .await
            .unwrap()
    }

    async fn snapshot(conn: &mut SqliteConnection) -> Vec<i64> {
        let mut counts = Vec::new();
        for table in [
            "users",
            "profiles",
            "companies",
            "jobs",
            "tags",
            "job_tags",
            "applications",
            "professional_experiences",
            "educations",
        ] {
            counts.push(count(conn, table).await);
        }
        counts
    }

    #[tokio::test]
    async fn seeding_twice_adds_nothing_the_second_time() {
        let pool = test_pool().await;
        let mut conn = pool.acquire().await.unwrap();

        let first = seed_database(&mut conn, &mut StdRng::seed_from_u64(7))
            .await
            .unwrap();
        let after_first = snapshot(&mut conn).await;

        let second = seed_database(&mut conn, &mut StdRng::seed_from_u64(8))
            .await
            .unwrap();
        let after_second = snapshot(&mut conn).await;

        assert_eq!(after_first, after_second);
        assert_eq!(second.users_created, 0);
        assert_eq!(second.companies_created, 0);
        assert_eq!(second.jobs_created, 0);
        assert_eq!(second.applications_created, 0);
        assert_eq!(second.users_existing, first.users_created);
    }

    #[tokio::test]
    async fn seeded_data_has_the_expected_shape() {
        let pool = test_pool().await;
        let mut conn = pool.acquire().await.unwrap();
        let stats = seed_database(&mut conn, &mut StdRng::seed_from_u64(42))
            .await
            .unwrap();

        let users = RECRUITERS.len()
            + STRONG_CANDIDATES.len()
            + MID_LEVEL_CANDIDATES.len()
            + INCOMPLETE_CANDIDATES.len();
        let companies: usize = RECRUITERS.iter().map(|r| r.companies.len()).sum();
        assert_eq!(stats.users_created, users);
        assert_eq!(stats.companies_created, companies);
        assert_eq!(stats.jobs_created, companies * JOB_TEMPLATES.len());

        let paused: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM jobs WHERE is_active = 0")
            .fetch_one(&mut *conn)
            .await
            .unwrap();
        assert_eq!(paused, companies as i64);

        let incomplete = accounts::find_user_by_username(&mut conn, "user_incompleto_1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(count_user_applications(&mut conn, incomplete.id, None).await.unwrap(), 0);

        let strong = accounts::find_user_by_username(&mut conn, "flavio_senior")
            .await
            .unwrap()
            .unwrap();
        let applied = count_user_applications(&mut conn, strong.id, None).await.unwrap();
        assert!((MIN_APPLICATIONS as i64..=MAX_APPLICATIONS as i64).contains(&applied));

        let profile = accounts::find_profile_by_user(&mut conn, strong.id)
            .await
            .unwrap()
            .unwrap();
        assert!(profile.skills.contains("Django"));
        assert_eq!(accounts::list_experiences(&mut conn, profile.id, 10).await.unwrap().len(), 3);

        let inactive_applications: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM applications a JOIN jobs j ON j.id = a.job_id WHERE j.is_active = 0",
        )
        .fetch_one(&mut *conn)
        .await
        .unwrap();
        assert_eq!(inactive_applications, 0);
    }
}
