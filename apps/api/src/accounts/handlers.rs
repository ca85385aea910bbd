use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::Serialize;
use tracing::info;

use crate::accounts::forms::{
    clean_skills, LoginForm, ProfessionalDataForm, ProfileEditForm, SignUpForm, SlugChoice,
};
use crate::accounts::password::{hash_password, verify_password};
use crate::accounts::repo::{self, ChildTable, NewUser};
use crate::accounts::session::{bearer_token, create_session, delete_session, AuthUser, MaybeUser};
use crate::db::is_unique_violation;
use crate::errors::AppError;
use crate::forms::{clean_formset, FieldErrors};
use crate::messages::WithMessage;
use crate::models::profile::{Education, ProfessionalExperience, Profile, TechProject};
use crate::models::user::User;
use crate::state::AppState;

/// Upper bound on child rows returned by the edit and portfolio views.
const CHILD_LIST_LIMIT: i64 = 500;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Serialize)]
pub struct ProfileEditView {
    pub user: User,
    pub profile: Profile,
}

#[derive(Debug, Serialize)]
pub struct ProfessionalDataView {
    pub skills: String,
    pub experiences: Vec<ProfessionalExperience>,
    pub education: Vec<Education>,
    pub tech_projects: Vec<TechProject>,
}

#[derive(Debug, Serialize)]
pub struct PortfolioView {
    pub name: String,
    pub profile: Profile,
    pub experiences: Vec<ProfessionalExperience>,
    pub education: Vec<Education>,
    pub tech_projects: Vec<TechProject>,
}

// ────────────────────────────────────────────────────────────────────────────
// Sign-up / login / logout
// ────────────────────────────────────────────────────────────────────────────

/// POST /accounts/signup/
///
/// Registers an account whose username is its email, creates the profile and
/// opens a session.
pub async fn handle_signup(
    State(state): State<AppState>,
    Json(form): Json<SignUpForm>,
) -> Result<(StatusCode, Json<WithMessage<SessionResponse>>), AppError> {
    let mut errors = FieldErrors::new();
    let signup = form.clean(&mut errors);

    let mut tx = state.db.begin().await?;
    if !errors.contains("email") && repo::email_taken(&mut tx, &signup.email, None).await? {
        errors.add("email", "This email is already in use.");
    }
    let signup = errors.finish(signup)?;

    let password_hash = hash_password(&signup.password)?;
    let user = repo::insert_user(
        &mut tx,
        NewUser {
            username: &signup.email,
            email: &signup.email,
            first_name: &signup.first_name,
            last_name: &signup.last_name,
            password_hash: &password_hash,
        },
    )
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            AppError::Validation(FieldErrors::single("email", "This email is already in use."))
        } else {
            AppError::Database(e)
        }
    })?;
    repo::ensure_profile(&mut tx, &user).await?;
    let token = create_session(&mut tx, user.id, state.config.session_ttl_hours).await?;
    tx.commit().await?;

    info!("Registered user {} ({})", user.id, user.email);
    Ok((
        StatusCode::CREATED,
        Json(WithMessage::success(
            "Account created successfully!",
            SessionResponse { token, user },
        )),
    ))
}

/// POST /accounts/login/
pub async fn handle_login(
    State(state): State<AppState>,
    Json(form): Json<LoginForm>,
) -> Result<Json<SessionResponse>, AppError> {
    let email = form.email.trim().to_lowercase();
    let mut conn = state.db.acquire().await?;

    let user = repo::find_user_by_email(&mut conn, &email)
        .await?
        .filter(|user| verify_password(&form.password, &user.password_hash))
        .ok_or_else(|| {
            AppError::Validation(FieldErrors::single(
                "__all__",
                "Please enter a correct email and password.",
            ))
        })?;

    let token = create_session(&mut conn, user.id, state.config.session_ttl_hours).await?;
    Ok(Json(SessionResponse { token, user }))
}

/// POST /accounts/logout/
pub async fn handle_logout(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    headers: HeaderMap,
) -> Result<StatusCode, AppError> {
    if let Some(token) = bearer_token(&headers) {
        let mut conn = state.db.acquire().await?;
        delete_session(&mut conn, token).await?;
    }
    Ok(StatusCode::NO_CONTENT)
}

// ────────────────────────────────────────────────────────────────────────────
// Profile edit
// ────────────────────────────────────────────────────────────────────────────

/// GET /accounts/profile/edit/
pub async fn handle_get_profile(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<ProfileEditView>, AppError> {
    let mut conn = state.db.acquire().await?;
    let profile = repo::ensure_profile(&mut conn, &user).await?;
    Ok(Json(ProfileEditView { user, profile }))
}

/// POST /accounts/profile/edit/
///
/// Saves the user form and the profile form together; both must validate.
pub async fn handle_update_profile(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(form): Json<ProfileEditForm>,
) -> Result<Json<WithMessage<ProfileEditView>>, AppError> {
    let mut errors = FieldErrors::new();
    let user_update = form.user.clean(&mut errors);
    let profile_update = form.profile.clean(&mut errors);

    let mut tx = state.db.begin().await?;
    let profile = repo::ensure_profile(&mut tx, &user).await?;

    if !errors.contains("email")
        && repo::email_taken(&mut tx, &user_update.email, Some(user.id)).await?
    {
        errors.add("email", "This email is already in use.");
    }
    let slug = match &profile_update.slug {
        SlugChoice::Keep => profile.slug.clone(),
        SlugChoice::Derive => repo::free_slug_for(&mut tx, &user.username, profile.id).await?,
        SlugChoice::Set(slug) => {
            if !errors.contains("slug") && repo::slug_taken(&mut tx, slug, profile.id).await? {
                errors.add("slug", "Profile with this Slug already exists.");
            }
            slug.clone()
        }
    };
    errors.finish(())?;

    let user = repo::update_user(&mut tx, user.id, &user_update).await?;
    let profile = repo::update_profile(&mut tx, profile.id, &profile_update, &slug).await?;
    tx.commit().await?;

    Ok(Json(WithMessage::success(
        "Profile updated successfully!",
        ProfileEditView { user, profile },
    )))
}

// ────────────────────────────────────────────────────────────────────────────
// Professional data (skills + formsets)
// ────────────────────────────────────────────────────────────────────────────

async fn load_professional_data(
    conn: &mut sqlx::SqliteConnection,
    profile: &Profile,
) -> Result<ProfessionalDataView, sqlx::Error> {
    Ok(ProfessionalDataView {
        skills: profile.skills.clone(),
        experiences: repo::list_experiences(conn, profile.id, CHILD_LIST_LIMIT).await?,
        education: repo::list_education(conn, profile.id, CHILD_LIST_LIMIT).await?,
        tech_projects: repo::list_tech_projects(conn, profile.id, CHILD_LIST_LIMIT).await?,
    })
}

/// GET /accounts/professional/edit/
pub async fn handle_get_professional(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<ProfessionalDataView>, AppError> {
    let mut conn = state.db.acquire().await?;
    let profile = repo::ensure_profile(&mut conn, &user).await?;
    Ok(Json(load_professional_data(&mut conn, &profile).await?))
}

/// POST /accounts/professional/edit/
///
/// Skills and each formset are validated separately; nothing is written
/// unless all of them are valid, and the writes share one transaction.
pub async fn handle_update_professional(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(form): Json<ProfessionalDataForm>,
) -> Result<Json<WithMessage<ProfessionalDataView>>, AppError> {
    let mut tx = state.db.begin().await?;
    let profile = repo::ensure_profile(&mut tx, &user).await?;

    let mut errors = FieldErrors::new();
    let skills = form
        .skills
        .as_deref()
        .map(|raw| clean_skills(&mut errors, raw));

    let owned = repo::child_ids(&mut tx, ChildTable::Experiences, profile.id).await?;
    let experience_ops = clean_formset(&mut errors, "experiences", &form.experiences, &owned);
    let owned = repo::child_ids(&mut tx, ChildTable::Education, profile.id).await?;
    let education_ops = clean_formset(&mut errors, "education", &form.education, &owned);
    let owned = repo::child_ids(&mut tx, ChildTable::TechProjects, profile.id).await?;
    let project_ops = clean_formset(&mut errors, "tech_projects", &form.tech_projects, &owned);
    errors.finish(())?;

    if let Some(skills) = &skills {
        repo::update_skills(&mut tx, profile.id, skills).await?;
    }
    repo::apply_experience_ops(&mut tx, profile.id, &experience_ops).await?;
    repo::apply_education_ops(&mut tx, profile.id, &education_ops).await?;
    repo::apply_tech_project_ops(&mut tx, profile.id, &project_ops).await?;

    let profile = repo::ensure_profile(&mut tx, &user).await?;
    let view = load_professional_data(&mut tx, &profile).await?;
    tx.commit().await?;

    info!(
        "Saved professional data for profile {} ({} experience, {} education, {} project changes)",
        profile.id,
        experience_ops.len(),
        education_ops.len(),
        project_ops.len()
    );
    Ok(Json(WithMessage::success(
        "Professional data updated successfully!",
        view,
    )))
}

// ────────────────────────────────────────────────────────────────────────────
// Public portfolio
// ────────────────────────────────────────────────────────────────────────────

/// GET /accounts/portfolio/:slug/
///
/// Visible to everyone once public and published; always visible to its owner.
pub async fn handle_portfolio(
    State(state): State<AppState>,
    viewer: MaybeUser,
    Path(slug): Path<String>,
) -> Result<Json<PortfolioView>, AppError> {
    let mut conn = state.db.acquire().await?;
    let not_found = || AppError::NotFound(format!("Portfolio '{slug}' not found"));

    let profile = repo::find_profile_by_slug(&mut conn, &slug)
        .await?
        .ok_or_else(not_found)?;
    let is_owner = viewer.id() == Some(profile.user_id);
    if !is_owner && !(profile.is_portfolio_public && profile.is_published) {
        return Err(not_found());
    }

    let owner = repo::get_user(&mut conn, profile.user_id).await?;
    let data = load_professional_data(&mut conn, &profile).await?;

    Ok(Json(PortfolioView {
        name: owner.display_name(),
        profile,
        experiences: data.experiences,
        education: data.education,
        tech_projects: data.tech_projects,
    }))
}
