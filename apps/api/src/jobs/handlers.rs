use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use sqlx::SqliteConnection;
use tracing::{info, warn};

use crate::accounts::session::{AuthUser, MaybeUser};
use crate::companies::repo::list_companies_by_owner;
use crate::db::is_unique_violation;
use crate::errors::AppError;
use crate::forms::FieldErrors;
use crate::jobs::applications::{self, ApplicationStats};
use crate::jobs::forms::{ApplyForm, JobForm, StatusForm};
use crate::jobs::repo::{self, JobFilter};
use crate::messages::WithMessage;
use crate::models::application::{Applicant, Application, ApplicationStatus, ApplicationWithJob};
use crate::models::company::Company;
use crate::models::job::{Job, JobSummary, TagCount};
use crate::pagination::{Page, Window};
use crate::state::AppState;

const JOBS_PER_PAGE: i64 = 12;
const APPLICATIONS_PER_PAGE: i64 = 10;
const POPULAR_TAG_LIMIT: i64 = 15;
const RELATED_JOB_LIMIT: i64 = 4;
const TAG_SUGGESTION_LIMIT: i64 = 20;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct JobListQuery {
    pub q: Option<String>,
    pub tag: Option<String>,
    pub page: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct JobListView {
    pub jobs: Page<Job>,
    pub total_jobs: i64,
    pub search_query: String,
    pub selected_tag: String,
    pub popular_tags: Vec<TagCount>,
}

#[derive(Debug, Serialize)]
pub struct RecruiterJobsView {
    pub jobs: Vec<JobSummary>,
    pub total_jobs: i64,
    pub active_jobs: i64,
    pub total_applications: i64,
}

#[derive(Debug, Default, Deserialize)]
pub struct JobCreateQuery {
    pub company: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct JobFormView {
    pub form: JobForm,
    pub companies: Vec<Company>,
}

#[derive(Debug, Serialize)]
pub struct JobDetailView {
    pub job: Job,
    pub already_applied: bool,
    pub user_application: Option<Application>,
    pub is_owner: bool,
    pub related_jobs: Vec<Job>,
}

#[derive(Debug, Serialize)]
pub struct JobApplicantsView {
    pub job: Job,
    pub applicants: Vec<Applicant>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ApplicationListQuery {
    pub status: Option<String>,
    pub page: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct ApplicationListView {
    pub applications: Page<ApplicationWithJob>,
    pub stats: ApplicationStats,
    pub selected_status: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct TagQuery {
    pub q: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TagSuggestion {
    pub value: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

/// The job when `user_id` owns its company: 404 when missing, 403 otherwise.
async fn owned_job(conn: &mut SqliteConnection, job_id: i64, user_id: i64) -> Result<Job, AppError> {
    let job = repo::find_job(conn, job_id)
        .await?
        .ok_or_else(|| AppError::not_found("Job", job_id))?;
    if !job.is_owned_by(user_id) {
        warn!("User {user_id} denied access to job {job_id}");
        return Err(AppError::Forbidden);
    }
    Ok(job)
}

async fn owned_company_ids(conn: &mut SqliteConnection, user_id: i64) -> Result<Vec<i64>, sqlx::Error> {
    Ok(list_companies_by_owner(conn, user_id)
        .await?
        .iter()
        .map(|c| c.id)
        .collect())
}

/// Pairs each job with its application total.
pub async fn summarize_jobs(
    conn: &mut SqliteConnection,
    jobs: Vec<Job>,
) -> Result<Vec<JobSummary>, sqlx::Error> {
    let ids: Vec<i64> = jobs.iter().map(|job| job.id).collect();
    let counts = applications::count_applications_for_jobs(conn, &ids).await?;
    Ok(jobs
        .into_iter()
        .map(|job| JobSummary {
            applications_count: counts.get(&job.id).copied().unwrap_or(0),
            job,
        })
        .collect())
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

// ────────────────────────────────────────────────────────────────────────────
// Public listing and detail
// ────────────────────────────────────────────────────────────────────────────

/// GET /jobs/
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    Query(query): Query<JobListQuery>,
) -> Result<Json<JobListView>, AppError> {
    let mut conn = state.db.acquire().await?;
    let active = JobFilter {
        is_active: Some(true),
        ..Default::default()
    };
    let filter = JobFilter {
        tag: non_blank(&query.tag),
        search: non_blank(&query.q),
        ..active
    };

    let matching = repo::count_jobs(&mut conn, &filter).await?;
    let window = Window::resolve(query.page, matching, JOBS_PER_PAGE)?;
    let jobs = repo::list_jobs(&mut conn, &filter, Some(window.limit), window.offset).await?;

    Ok(Json(JobListView {
        jobs: window.into_page(jobs, matching),
        total_jobs: repo::count_jobs(&mut conn, &active).await?,
        search_query: query.q.clone().unwrap_or_default(),
        selected_tag: query.tag.clone().unwrap_or_default(),
        popular_tags: repo::popular_tags(&mut conn, POPULAR_TAG_LIMIT).await?,
    }))
}

/// GET /jobs/:id/
///
/// Inactive jobs are only visible to the owner of their company.
pub async fn handle_job_detail(
    State(state): State<AppState>,
    viewer: MaybeUser,
    Path(job_id): Path<i64>,
) -> Result<Json<JobDetailView>, AppError> {
    let mut conn = state.db.acquire().await?;
    let job = repo::find_job(&mut conn, job_id)
        .await?
        .filter(|job| job.is_active || viewer.id().is_some_and(|id| job.is_owned_by(id)))
        .ok_or_else(|| AppError::not_found("Job", job_id))?;

    let user_application = match viewer.id() {
        Some(user_id) => applications::find_user_application(&mut conn, user_id, job.id).await?,
        None => None,
    };
    let related = JobFilter {
        is_active: Some(true),
        related_to: Some(&job),
        ..Default::default()
    };
    let related_jobs = repo::list_jobs(&mut conn, &related, Some(RELATED_JOB_LIMIT), 0).await?;

    Ok(Json(JobDetailView {
        already_applied: user_application.is_some(),
        user_application,
        is_owner: viewer.id().is_some_and(|id| job.is_owned_by(id)),
        related_jobs,
        job,
    }))
}

// ────────────────────────────────────────────────────────────────────────────
// Recruiter views
// ────────────────────────────────────────────────────────────────────────────

/// GET /jobs/dashboard/
pub async fn handle_recruiter_jobs(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<RecruiterJobsView>, AppError> {
    let mut conn = state.db.acquire().await?;
    let filter = JobFilter {
        owner_id: Some(user.id),
        ..Default::default()
    };
    let jobs = repo::list_jobs(&mut conn, &filter, None, 0).await?;
    let jobs = summarize_jobs(&mut conn, jobs).await?;

    Ok(Json(RecruiterJobsView {
        total_jobs: jobs.len() as i64,
        active_jobs: jobs.iter().filter(|s| s.job.is_active).count() as i64,
        total_applications: jobs.iter().map(|s| s.applications_count).sum(),
        jobs,
    }))
}

/// GET /jobs/create/
///
/// Only company owners may post jobs. `?company=` preselects one of the
/// requester's companies; any other id is ignored.
pub async fn handle_new_job(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(query): Query<JobCreateQuery>,
) -> Result<Json<JobFormView>, AppError> {
    let mut conn = state.db.acquire().await?;
    let companies = list_companies_by_owner(&mut conn, user.id).await?;
    if companies.is_empty() {
        return Err(AppError::Forbidden);
    }

    let company = query
        .company
        .filter(|id| companies.iter().any(|c| c.id == *id));
    Ok(Json(JobFormView {
        form: JobForm {
            company,
            ..Default::default()
        },
        companies,
    }))
}

/// POST /jobs/create/
pub async fn handle_create_job(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(form): Json<JobForm>,
) -> Result<(StatusCode, Json<WithMessage<Job>>), AppError> {
    let mut tx = state.db.begin().await?;
    let owned = owned_company_ids(&mut tx, user.id).await?;
    if owned.is_empty() {
        return Err(AppError::Forbidden);
    }

    let mut errors = FieldErrors::new();
    let input = form.clean(&mut errors, &owned);
    let input = errors.finish(input)?;

    let job = repo::insert_job(&mut tx, &input).await?;
    tx.commit().await?;

    info!("Job {} published by user {} with tags {:?}", job.id, user.id, job.tags);
    Ok((
        StatusCode::CREATED,
        Json(WithMessage::success("Job published successfully!", job)),
    ))
}

/// GET /jobs/:id/edit/
pub async fn handle_edit_job_form(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(job_id): Path<i64>,
) -> Result<Json<JobFormView>, AppError> {
    let mut conn = state.db.acquire().await?;
    let job = owned_job(&mut conn, job_id, user.id).await?;
    let companies = list_companies_by_owner(&mut conn, user.id).await?;
    Ok(Json(JobFormView {
        form: JobForm::from(&job),
        companies,
    }))
}

/// POST /jobs/:id/edit/
///
/// The submitted tags replace the job's previous tag set.
pub async fn handle_update_job(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(job_id): Path<i64>,
    Json(form): Json<JobForm>,
) -> Result<Json<WithMessage<Job>>, AppError> {
    let mut tx = state.db.begin().await?;
    owned_job(&mut tx, job_id, user.id).await?;

    let owned = owned_company_ids(&mut tx, user.id).await?;
    let mut errors = FieldErrors::new();
    let input = form.clean(&mut errors, &owned);
    let input = errors.finish(input)?;

    let job = repo::update_job(&mut tx, job_id, &input).await?;
    tx.commit().await?;

    Ok(Json(WithMessage::success("Job updated successfully!", job)))
}

/// POST /jobs/:id/delete/
pub async fn handle_delete_job(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(job_id): Path<i64>,
) -> Result<Json<WithMessage<Job>>, AppError> {
    let mut conn = state.db.acquire().await?;
    let job = owned_job(&mut conn, job_id, user.id).await?;
    repo::delete_job(&mut conn, job.id).await?;

    info!("Job {} deleted by user {}", job.id, user.id);
    Ok(Json(WithMessage::success("Job deleted successfully!", job)))
}

/// GET /jobs/:id/applications/
pub async fn handle_job_applicants(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(job_id): Path<i64>,
) -> Result<Json<JobApplicantsView>, AppError> {
    let mut conn = state.db.acquire().await?;
    let job = owned_job(&mut conn, job_id, user.id).await?;
    let applicants = applications::list_applicants(&mut conn, job.id).await?;
    Ok(Json(JobApplicantsView { job, applicants }))
}

/// POST /jobs/application/:id/status/
///
/// Any transition is accepted; only the owner of the job's company may make it.
pub async fn handle_update_application_status(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(application_id): Path<i64>,
    Json(form): Json<StatusForm>,
) -> Result<Json<WithMessage<Application>>, AppError> {
    let mut conn = state.db.acquire().await?;
    let application = applications::find_application(&mut conn, application_id)
        .await?
        .ok_or_else(|| AppError::not_found("Application", application_id))?;
    owned_job(&mut conn, application.job_id, user.id).await?;

    let mut errors = FieldErrors::new();
    let update = form.clean(&mut errors);
    let update = errors.finish(update)?;
    let application = applications::update_application_status(&mut conn, application.id, &update).await?;

    info!(
        "Application {} moved to {} by user {}",
        application.id,
        application.status.as_str(),
        user.id
    );
    Ok(Json(WithMessage::success("Application status updated.", application)))
}

// ────────────────────────────────────────────────────────────────────────────
// Candidate views
// ────────────────────────────────────────────────────────────────────────────

/// POST /jobs/:id/apply/
///
/// The body is optional; when present it must be a valid apply form. A
/// repeated application is answered with a warning and the existing record.
pub async fn handle_apply(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(job_id): Path<i64>,
    body: Bytes,
) -> Result<(StatusCode, Json<WithMessage<Application>>), AppError> {
    let form = if body.iter().all(u8::is_ascii_whitespace) {
        ApplyForm::default()
    } else {
        Json::<ApplyForm>::from_bytes(&body)?.0
    };
    let mut conn = state.db.acquire().await?;

    let job = repo::find_job(&mut conn, job_id)
        .await?
        .filter(|job| job.is_active)
        .ok_or_else(|| AppError::not_found("Job", job_id))?;
    if job.is_owned_by(user.id) {
        return Err(AppError::UnprocessableEntity(
            "You cannot apply to jobs from your own company.".into(),
        ));
    }

    match applications::insert_application(&mut conn, user.id, job.id, form.cover_letter.trim()).await {
        Ok(application) => {
            info!("User {} applied to job {}", user.id, job.id);
            Ok((
                StatusCode::CREATED,
                Json(WithMessage::success(
                    format!("Application sent successfully for \"{}\"!", job.title),
                    application,
                )),
            ))
        }
        Err(e) if is_unique_violation(&e) => {
            let existing = applications::find_user_application(&mut conn, user.id, job.id)
                .await?
                .ok_or_else(|| AppError::not_found("Application for job", job.id))?;
            Ok((
                StatusCode::OK,
                Json(WithMessage::warning(
                    "You have already applied to this job.",
                    existing,
                )),
            ))
        }
        Err(e) => Err(e.into()),
    }
}

/// POST /jobs/application/:id/withdraw/
///
/// Only the applicant's own applications still in `applied` can be withdrawn;
/// anything else is a 404.
pub async fn handle_withdraw(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(application_id): Path<i64>,
) -> Result<Json<WithMessage<Application>>, AppError> {
    let mut conn = state.db.acquire().await?;
    let application = applications::withdraw_application(&mut conn, application_id, user.id)
        .await?
        .ok_or_else(|| AppError::not_found("Application", application_id))?;
    let title = repo::find_job(&mut conn, application.job_id)
        .await?
        .map(|job| job.title)
        .unwrap_or_default();

    info!("User {} withdrew application {}", user.id, application.id);
    Ok(Json(WithMessage::success(
        format!("Application for \"{title}\" withdrawn successfully."),
        application,
    )))
}

/// GET /jobs/candidaturas/
///
/// Unknown `status` values are ignored rather than rejected.
pub async fn handle_my_applications(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(query): Query<ApplicationListQuery>,
) -> Result<Json<ApplicationListView>, AppError> {
    let mut conn = state.db.acquire().await?;
    let status = non_blank(&query.status).and_then(ApplicationStatus::parse);

    let matching = applications::count_user_applications(&mut conn, user.id, status).await?;
    let window = Window::resolve(query.page, matching, APPLICATIONS_PER_PAGE)?;
    let items = applications::list_user_applications(
        &mut conn,
        user.id,
        status,
        window.limit,
        window.offset,
    )
    .await?;

    Ok(Json(ApplicationListView {
        applications: window.into_page(items, matching),
        stats: applications::application_stats(&mut conn, user.id).await?,
        selected_status: query.status.clone().unwrap_or_default(),
    }))
}

/// GET /jobs/api/tags/
pub async fn handle_tag_suggestions(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Query(query): Query<TagQuery>,
) -> Result<Json<Vec<TagSuggestion>>, AppError> {
    let mut conn = state.db.acquire().await?;
    let names = repo::search_tags(
        &mut conn,
        query.q.as_deref().unwrap_or_default(),
        TAG_SUGGESTION_LIMIT,
    )
    .await?;
    Ok(Json(
        names.into_iter().map(|value| TagSuggestion { value }).collect(),
    ))
}
