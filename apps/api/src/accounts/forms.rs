use chrono::NaiveDate;
use serde::Deserialize;

use crate::accounts::slug::is_valid_slug;
use crate::forms::{
    clean_date, clean_email, clean_optional, clean_required, clean_url, FieldErrors, FormsetRow,
};
use crate::models::profile::{EducationStatus, ProjectType};

const NAME_MAX: usize = 150;
const TITLE_MAX: usize = 200;
const CITY_MAX: usize = 100;
const SLUG_MAX: usize = 50;
const MIN_PASSWORD_LEN: usize = 8;

// ────────────────────────────────────────────────────────────────────────────
// Sign-up / login
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SignUpForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password1: String,
    pub password2: String,
}

#[derive(Debug, Clone)]
pub struct SignUp {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

impl SignUpForm {
    /// Field-level checks only; email uniqueness needs the database and is
    /// added by the caller.
    pub fn clean(&self, errors: &mut FieldErrors) -> SignUp {
        let first_name = clean_required(errors, "first_name", &self.first_name, NAME_MAX);
        let last_name = clean_required(errors, "last_name", &self.last_name, NAME_MAX);
        let email = clean_email(errors, "email", &self.email);

        if self.password1.is_empty() {
            errors.add("password1", "This field is required.");
        } else {
            for problem in password_problems(&self.password1) {
                errors.add("password2", problem);
            }
        }
        if self.password2.is_empty() {
            errors.add("password2", "This field is required.");
        } else if self.password1 != self.password2 {
            errors.add("password2", "The two password fields didn't match.");
        }

        SignUp {
            first_name,
            last_name,
            email,
            password: self.password1.clone(),
        }
    }
}

fn password_problems(password: &str) -> Vec<&'static str> {
    let mut problems = Vec::new();
    if password.chars().count() < MIN_PASSWORD_LEN {
        problems.push("This password is too short. It must contain at least 8 characters.");
    }
    if password.chars().all(|c| c.is_ascii_digit()) {
        problems.push("This password is entirely numeric.");
    }
    problems
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Profile edit
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UserUpdateForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

#[derive(Debug, Clone)]
pub struct UserUpdate {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl UserUpdateForm {
    pub fn clean(&self, errors: &mut FieldErrors) -> UserUpdate {
        UserUpdate {
            first_name: clean_optional(errors, "first_name", &self.first_name, NAME_MAX),
            last_name: clean_optional(errors, "last_name", &self.last_name, NAME_MAX),
            email: clean_email(errors, "email", &self.email),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ProfileUpdateForm {
    pub bio: String,
    pub city: String,
    pub contact_info: String,
    pub github_url: String,
    pub linkedin_url: String,
    pub is_portfolio_public: bool,
    pub is_published: bool,
    /// Omitted keeps the current slug; blank re-derives it from the username.
    pub slug: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum SlugChoice {
    #[default]
    Keep,
    Derive,
    Set(String),
}

#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub bio: String,
    pub city: String,
    pub contact_info: String,
    pub github_url: String,
    pub linkedin_url: String,
    pub is_portfolio_public: bool,
    pub is_published: bool,
    pub slug: SlugChoice,
}

impl ProfileUpdateForm {
    pub fn clean(&self, errors: &mut FieldErrors) -> ProfileUpdate {
        let slug = match self.slug.as_deref().map(str::trim) {
            None => SlugChoice::Keep,
            Some("") => SlugChoice::Derive,
            Some(slug) => {
                if !is_valid_slug(slug) {
                    errors.add(
                        "slug",
                        "Enter a valid slug of lowercase letters, numbers, underscores or hyphens.",
                    );
                }
                SlugChoice::Set(clean_optional(errors, "slug", slug, SLUG_MAX))
            }
        };

        ProfileUpdate {
            bio: self.bio.trim().to_string(),
            city: clean_optional(errors, "city", &self.city, CITY_MAX),
            contact_info: self.contact_info.trim().to_string(),
            github_url: clean_url(errors, "github_url", &self.github_url),
            linkedin_url: clean_url(errors, "linkedin_url", &self.linkedin_url),
            is_portfolio_public: self.is_portfolio_public,
            is_published: self.is_published,
            slug,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ProfileEditForm {
    pub user: UserUpdateForm,
    pub profile: ProfileUpdateForm,
}

// ────────────────────────────────────────────────────────────────────────────
// Professional data: skills plus child-record formsets
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ProfessionalDataForm {
    /// Absent leaves the stored skills untouched.
    pub skills: Option<String>,
    pub experiences: Vec<ExperienceRow>,
    pub education: Vec<EducationRow>,
    pub tech_projects: Vec<TechProjectRow>,
}

pub const SKILLS_MAX: usize = 1000;

/// Normalises a comma-separated skill list: trimmed entries, empty ones
/// dropped, joined with ", ".
pub fn clean_skills(errors: &mut FieldErrors, raw: &str) -> String {
    let skills = raw
        .split(',')
        .map(str::trim)
        .filter(|skill| !skill.is_empty())
        .collect::<Vec<_>>()
        .join(", ");
    clean_optional(errors, "skills", &skills, SKILLS_MAX)
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ExperienceRow {
    pub id: Option<i64>,
    pub delete: bool,
    pub company: String,
    pub role: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExperienceInput {
    pub company: String,
    pub role: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub description: String,
}

impl FormsetRow for ExperienceRow {
    type Cleaned = ExperienceInput;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn marked_for_deletion(&self) -> bool {
        self.delete
    }

    fn clean(&self, errors: &mut FieldErrors) -> ExperienceInput {
        let company = clean_required(errors, "company", &self.company, TITLE_MAX);
        let role = clean_required(errors, "role", &self.role, TITLE_MAX);
        let start_date = clean_date(errors, "start_date", self.start_date.as_deref());
        if start_date.is_none() && !errors.contains("start_date") {
            errors.add("start_date", "This field is required.");
        }
        let end_date = clean_date(errors, "end_date", self.end_date.as_deref());
        ExperienceInput {
            company,
            role,
            start_date: start_date.unwrap_or(NaiveDate::MIN),
            end_date,
            description: self.description.trim().to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct EducationRow {
    pub id: Option<i64>,
    pub delete: bool,
    pub institution: String,
    pub course: String,
    pub status: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EducationInput {
    pub institution: String,
    pub course: String,
    pub status: EducationStatus,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl FormsetRow for EducationRow {
    type Cleaned = EducationInput;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn marked_for_deletion(&self) -> bool {
        self.delete
    }

    fn clean(&self, errors: &mut FieldErrors) -> EducationInput {
        let status = match self.status.as_deref().map(str::trim) {
            None | Some("") => EducationStatus::default(),
            Some(raw) => EducationStatus::parse(raw).unwrap_or_else(|| {
                errors.add("status", format!("Select a valid choice. {raw} is not one of the available choices."));
                EducationStatus::default()
            }),
        };
        EducationInput {
            institution: clean_required(errors, "institution", &self.institution, TITLE_MAX),
            course: clean_required(errors, "course", &self.course, TITLE_MAX),
            status,
            start_date: clean_date(errors, "start_date", self.start_date.as_deref()),
            end_date: clean_date(errors, "end_date", self.end_date.as_deref()),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TechProjectRow {
    pub id: Option<i64>,
    pub delete: bool,
    pub name: String,
    pub description: String,
    pub url: String,
    pub project_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TechProjectInput {
    pub name: String,
    pub description: String,
    pub url: String,
    pub project_type: ProjectType,
}

impl FormsetRow for TechProjectRow {
    type Cleaned = TechProjectInput;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn marked_for_deletion(&self) -> bool {
        self.delete
    }

    fn clean(&self, errors: &mut FieldErrors) -> TechProjectInput {
        let project_type = match self.project_type.as_deref().map(str::trim) {
            None | Some("") => ProjectType::default(),
            Some(raw) => ProjectType::parse(raw).unwrap_or_else(|| {
                errors.add(
                    "project_type",
                    format!("Select a valid choice. {raw} is not one of the available choices."),
                );
                ProjectType::default()
            }),
        };
        TechProjectInput {
            name: clean_required(errors, "name", &self.name, TITLE_MAX),
            description: self.description.trim().to_string(),
            url: clean_url(errors, "url", &self.url),
            project_type,
        }
    }
}
