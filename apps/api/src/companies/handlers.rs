use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use sqlx::SqliteConnection;
use tracing::{info, warn};

use crate::accounts::session::AuthUser;
use crate::companies::forms::CompanyForm;
use crate::companies::repo;
use crate::db::is_unique_violation;
use crate::errors::AppError;
use crate::forms::FieldErrors;
use crate::jobs::handlers::summarize_jobs;
use crate::jobs::repo::{list_jobs, JobFilter};
use crate::messages::WithMessage;
use crate::models::company::Company;
use crate::models::job::JobSummary;
use crate::state::AppState;

const CNPJ_TAKEN: &str = "Company with this CNPJ already exists.";

#[derive(Debug, Serialize)]
pub struct CompanyWithJobs {
    pub company: Company,
    pub jobs: Vec<JobSummary>,
    pub total_jobs: i64,
    pub active_jobs: i64,
}

#[derive(Debug, Serialize)]
pub struct CompanyDashboardView {
    pub companies: Vec<CompanyWithJobs>,
    pub has_companies: bool,
}

/// The company when `user_id` owns it: 404 when missing, 403 otherwise.
async fn owned_company(
    conn: &mut SqliteConnection,
    company_id: i64,
    user_id: i64,
) -> Result<Company, AppError> {
    let company = repo::find_company(conn, company_id)
        .await?
        .ok_or_else(|| AppError::not_found("Company", company_id))?;
    if company.owner_id != user_id {
        warn!("User {user_id} denied access to company {company_id}");
        return Err(AppError::Forbidden);
    }
    Ok(company)
}

fn cnpj_conflict(e: sqlx::Error) -> AppError {
    if is_unique_violation(&e) {
        AppError::Validation(FieldErrors::single("cnpj", CNPJ_TAKEN))
    } else {
        AppError::Database(e)
    }
}

/// GET /companies/dashboard/
///
/// Every owned company with its jobs (newest first) and their application
/// totals.
pub async fn handle_dashboard(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<CompanyDashboardView>, AppError> {
    let mut conn = state.db.acquire().await?;
    let companies = repo::list_companies_by_owner(&mut conn, user.id).await?;

    let mut view = Vec::with_capacity(companies.len());
    for company in companies {
        let filter = JobFilter {
            company_id: Some(company.id),
            ..Default::default()
        };
        let jobs = list_jobs(&mut conn, &filter, None, 0).await?;
        let jobs = summarize_jobs(&mut conn, jobs).await?;
        view.push(CompanyWithJobs {
            total_jobs: jobs.len() as i64,
            active_jobs: jobs.iter().filter(|s| s.job.is_active).count() as i64,
            company,
            jobs,
        });
    }

    Ok(Json(CompanyDashboardView {
        has_companies: !view.is_empty(),
        companies: view,
    }))
}

/// POST /companies/create/
pub async fn handle_create(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(form): Json<CompanyForm>,
) -> Result<(StatusCode, Json<WithMessage<Company>>), AppError> {
    let mut conn = state.db.acquire().await?;
    let mut errors = FieldErrors::new();
    let input = form.clean(&mut errors);
    if !errors.contains("cnpj") && repo::cnpj_taken(&mut conn, &input.cnpj, None).await? {
        errors.add("cnpj", CNPJ_TAKEN);
    }
    let input = errors.finish(input)?;

    let company = repo::insert_company(&mut conn, user.id, &input)
        .await
        .map_err(cnpj_conflict)?;

    info!("Company {} ({}) registered by user {}", company.id, company.name, user.id);
    Ok((
        StatusCode::CREATED,
        Json(WithMessage::success("Company registered successfully!", company)),
    ))
}

/// GET /companies/:id/edit/
pub async fn handle_get(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(company_id): Path<i64>,
) -> Result<Json<Company>, AppError> {
    let mut conn = state.db.acquire().await?;
    Ok(Json(owned_company(&mut conn, company_id, user.id).await?))
}

/// POST /companies/:id/edit/
pub async fn handle_update(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(company_id): Path<i64>,
    Json(form): Json<CompanyForm>,
) -> Result<Json<WithMessage<Company>>, AppError> {
    let mut conn = state.db.acquire().await?;
    let company = owned_company(&mut conn, company_id, user.id).await?;

    let mut errors = FieldErrors::new();
    let input = form.clean(&mut errors);
    if !errors.contains("cnpj")
        && repo::cnpj_taken(&mut conn, &input.cnpj, Some(company.id)).await?
    {
        errors.add("cnpj", CNPJ_TAKEN);
    }
    let input = errors.finish(input)?;

    let company = repo::update_company(&mut conn, company.id, &input)
        .await
        .map_err(cnpj_conflict)?;
    Ok(Json(WithMessage::success("Company updated successfully!", company)))
}

/// POST /companies/:id/delete/
///
/// Removes the company with all of its jobs and their applications.
pub async fn handle_delete(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(company_id): Path<i64>,
) -> Result<Json<WithMessage<Company>>, AppError> {
    let mut conn = state.db.acquire().await?;
    let company = owned_company(&mut conn, company_id, user.id).await?;
    repo::delete_company(&mut conn, company.id).await?;

    info!("Company {} deleted by user {}", company.id, user.id);
    Ok(Json(WithMessage::success("Company deleted successfully!", company)))
}
