//! Shared form-validation plumbing.
//!
//! Forms validate into a cleaned value or a [`FieldErrors`] map keyed by field
//! name. Formset rows use `<prefix>-<index>-<field>` keys.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use crate::errors::AppError;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    /// Merges another error map under `<prefix>-<index>-` keys.
    pub fn merge_prefixed(&mut self, prefix: &str, index: usize, other: FieldErrors) {
        for (field, messages) in other.0 {
            let key = format!("{prefix}-{index}-{field}");
            self.0.entry(key).or_default().extend(messages);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// `Ok(value)` when no error was recorded.
    pub fn finish<T>(self, value: T) -> Result<T, AppError> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(AppError::Validation(self))
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<&str> = self.0.keys().map(String::as_str).collect();
        write!(f, "invalid fields: {}", fields.join(", "))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Field cleaners
// ────────────────────────────────────────────────────────────────────────────

/// Trims and checks a required text field against its maximum length.
pub fn clean_required(
    errors: &mut FieldErrors,
    field: &str,
    value: &str,
    max_len: usize,
) -> String {
    let value = value.trim();
    if value.is_empty() {
        errors.add(field, "This field is required.");
    } else {
        check_max_len(errors, field, value, max_len);
    }
    value.to_string()
}

pub fn clean_optional(
    errors: &mut FieldErrors,
    field: &str,
    value: &str,
    max_len: usize,
) -> String {
    let value = value.trim();
    check_max_len(errors, field, value, max_len);
    value.to_string()
}

fn check_max_len(errors: &mut FieldErrors, field: &str, value: &str, max_len: usize) {
    let len = value.chars().count();
    if len > max_len {
        errors.add(
            field,
            format!("Ensure this value has at most {max_len} characters (it has {len})."),
        );
    }
}

/// Blank is allowed; otherwise the value must be an absolute http(s) URL.
pub fn clean_url(errors: &mut FieldErrors, field: &str, value: &str) -> String {
    let value = value.trim();
    if !value.is_empty() && !is_valid_url(value) {
        errors.add(field, "Enter a valid URL.");
    }
    value.to_string()
}

pub fn clean_email(errors: &mut FieldErrors, field: &str, value: &str) -> String {
    let value = value.trim().to_lowercase();
    if value.is_empty() {
        errors.add(field, "This field is required.");
    } else if !is_valid_email(&value) {
        errors.add(field, "Enter a valid email address.");
    }
    value
}

pub fn is_valid_url(value: &str) -> bool {
    let rest = match value
        .strip_prefix("https://")
        .or_else(|| value.strip_prefix("http://"))
    {
        Some(rest) => rest,
        None => return false,
    };
    let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
    let host = host.rsplit('@').next().unwrap_or_default();
    let host = host.split(':').next().unwrap_or_default();
    !host.is_empty()
        && !value.chars().any(char::is_whitespace)
        && (host.contains('.') || host == "localhost")
        && host
            .split('.')
            .all(|label| !label.is_empty() && label.chars().all(|c| c.is_alphanumeric() || c == '-'))
}

pub fn is_valid_email(value: &str) -> bool {
    let Some((local, domain)) = value.rsplit_once('@') else {
        return false;
    };
    !local.is_empty()
        && !local.chars().any(char::is_whitespace)
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && domain
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '.')
}

/// Parses an optional ISO date (`YYYY-MM-DD`); blank means `None`.
pub fn clean_date(errors: &mut FieldErrors, field: &str, value: Option<&str>) -> Option<NaiveDate> {
    let value = value.map(str::trim).filter(|v| !v.is_empty())?;
    match NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(_) => {
            errors.add(field, "Enter a valid date (YYYY-MM-DD).");
            None
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Formsets
// ────────────────────────────────────────────────────────────────────────────

/// What a validated formset row asks the repository to do.
#[derive(Debug, Clone, PartialEq)]
pub enum FormsetOp<T> {
    Create(T),
    Update(i64, T),
    Delete(i64),
}

/// A submitted child-record row: an optional existing id, a delete mark and
/// the row's own fields.
pub trait FormsetRow {
    type Cleaned;

    fn id(&self) -> Option<i64>;
    fn marked_for_deletion(&self) -> bool;
    fn clean(&self, errors: &mut FieldErrors) -> Self::Cleaned;
}

/// Validates every row of a formset. Ids must belong to the parent record
/// (`owned_ids`). Rows marked for deletion skip field validation; a new row
/// marked for deletion is dropped.
pub fn clean_formset<R: FormsetRow>(
    errors: &mut FieldErrors,
    prefix: &str,
    rows: &[R],
    owned_ids: &std::collections::HashSet<i64>,
) -> Vec<FormsetOp<R::Cleaned>> {
    let mut ops = Vec::with_capacity(rows.len());
    for (index, row) in rows.iter().enumerate() {
        if let Some(id) = row.id() {
            if !owned_ids.contains(&id) {
                errors.merge_prefixed(
                    prefix,
                    index,
                    FieldErrors::single("id", "Select a valid choice. That record does not exist."),
                );
                continue;
            }
        }

        match (row.id(), row.marked_for_deletion()) {
            (Some(id), true) => ops.push(FormsetOp::Delete(id)),
            (None, true) => {}
            (id, false) => {
                let mut row_errors = FieldErrors::new();
                let cleaned = row.clean(&mut row_errors);
                if row_errors.is_empty() {
                    ops.push(match id {
                        Some(id) => FormsetOp::Update(id, cleaned),
                        None => FormsetOp::Create(cleaned),
                    });
                } else {
                    errors.merge_prefixed(prefix, index, row_errors);
                }
            }
        }
    }
    ops
}
