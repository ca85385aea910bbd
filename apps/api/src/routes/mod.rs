pub mod dashboard;
pub mod health;
pub mod home;

#[cfg(test)]
mod tests;

use axum::{
    routing::{get, post},
    Router,
};

use crate::accounts::handlers as accounts;
use crate::companies::handlers as companies;
use crate::jobs::handlers as jobs;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home::home_handler))
        .route("/health", get(health::health_handler))
        .route("/dashboard/", get(dashboard::dashboard_handler))
        // Accounts
        .route("/accounts/signup/", post(accounts::handle_signup))
        .route("/accounts/login/", post(accounts::handle_login))
        .route("/accounts/logout/", post(accounts::handle_logout))
        .route(
            "/accounts/profile/edit/",
            get(accounts::handle_get_profile).post(accounts::handle_update_profile),
        )
        .route(
            "/accounts/professional/edit/",
            get(accounts::handle_get_professional).post(accounts::handle_update_professional),
        )
        .route("/accounts/portfolio/:slug/", get(accounts::handle_portfolio))
        // Companies
        .route("/companies/dashboard/", get(companies::handle_dashboard))
        .route("/companies/create/", post(companies::handle_create))
        .route(
            "/companies/:id/edit/",
            get(companies::handle_get).post(companies::handle_update),
        )
        .route("/companies/:id/delete/", post(companies::handle_delete))
        // Jobs: recruiter
        .route("/jobs/dashboard/", get(jobs::handle_recruiter_jobs))
        .route(
            "/jobs/create/",
            get(jobs::handle_new_job).post(jobs::handle_create_job),
        )
        .route(
            "/jobs/:id/edit/",
            get(jobs::handle_edit_job_form).post(jobs::handle_update_job),
        )
        .route("/jobs/:id/delete/", post(jobs::handle_delete_job))
        .route("/jobs/:id/applications/", get(jobs::handle_job_applicants))
        .route(
            "/jobs/application/:id/status/",
            post(jobs::handle_update_application_status),
        )
        // Jobs: public and candidates
        .route("/jobs/", get(jobs::handle_list_jobs))
        .route("/jobs/:id/", get(jobs::handle_job_detail))
        .route("/jobs/:id/apply/", post(jobs::handle_apply))
        .route("/jobs/candidaturas/", get(jobs::handle_my_applications))
        .route(
            "/jobs/application/:id/withdraw/",
            post(jobs::handle_withdraw),
        )
        .route("/jobs/api/tags/", get(jobs::handle_tag_suggestions))
        .with_state(state)
}
