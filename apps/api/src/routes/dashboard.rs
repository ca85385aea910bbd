use axum::{extract::State, Json};
use serde::Serialize;

use crate::accounts::repo::{
    ensure_profile, list_education, list_experiences, list_tech_projects, portfolio_counts,
    PortfolioCounts,
};
use crate::accounts::session::AuthUser;
use crate::companies::repo::owns_any_company;
use crate::errors::AppError;
use crate::jobs::applications::{count_user_applications, list_user_applications};
use crate::jobs::recommend::recommended_jobs;
use crate::models::application::ApplicationWithJob;
use crate::models::job::Job;
use crate::models::profile::{Education, ProfessionalExperience, Profile, TechProject};
use crate::models::user::User;
use crate::state::AppState;

const RECENT_APPLICATIONS: i64 = 3;
const PORTFOLIO_PREVIEW: i64 = 5;

#[derive(Debug, Serialize)]
pub struct DashboardView {
    pub user: User,
    pub profile: Profile,
    pub is_recruiter: bool,
    pub recommended_jobs: Vec<Job>,
    pub recent_applications: Vec<ApplicationWithJob>,
    pub total_applications: i64,
    pub experiences: Vec<ProfessionalExperience>,
    pub education: Vec<Education>,
    pub tech_projects: Vec<TechProject>,
    pub counts: PortfolioCounts,
}

/// GET /dashboard/
///
/// Skill-matched job recommendations, the latest applications and a preview
/// of the portfolio.
pub async fn dashboard_handler(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<DashboardView>, AppError> {
    let mut conn = state.db.acquire().await?;
    let profile = ensure_profile(&mut conn, &user).await?;

    Ok(Json(DashboardView {
        is_recruiter: owns_any_company(&mut conn, user.id).await?,
        recommended_jobs: recommended_jobs(&mut conn, &profile.skills).await?,
        recent_applications: list_user_applications(&mut conn, user.id, None, RECENT_APPLICATIONS, 0)
            .await?,
        total_applications: count_user_applications(&mut conn, user.id, None).await?,
        experiences: list_experiences(&mut conn, profile.id, PORTFOLIO_PREVIEW).await?,
        education: list_education(&mut conn, profile.id, PORTFOLIO_PREVIEW).await?,
        tech_projects: list_tech_projects(&mut conn, profile.id, PORTFOLIO_PREVIEW).await?,
        counts: portfolio_counts(&mut conn, profile.id).await?,
        profile,
        user,
    }))
}
