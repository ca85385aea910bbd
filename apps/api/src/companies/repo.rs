use chrono::Utc;
use sqlx::SqliteConnection;

use crate::companies::forms::CompanyInput;
use crate::models::company::Company;

pub async fn insert_company(
    conn: &mut SqliteConnection,
    owner_id: i64,
    input: &CompanyInput,
) -> Result<Company, sqlx::Error> {
    let now = Utc::now();
    sqlx::query_as::<_, Company>(
        r#"
        INSERT INTO companies (name, cnpj, website, description, owner_id, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(&input.name)
    .bind(&input.cnpj)
    .bind(&input.website)
    .bind(&input.description)
    .bind(owner_id)
    .bind(now)
    .bind(now)
    .fetch_one(&mut *conn)
    .await
}

pub async fn find_company(
    conn: &mut SqliteConnection,
    company_id: i64,
) -> Result<Option<Company>, sqlx::Error> {
    sqlx::query_as::<_, Company>("SELECT * FROM companies WHERE id = ?")
        .bind(company_id)
        .fetch_optional(&mut *conn)
        .await
}

pub async fn find_company_by_cnpj(
    conn: &mut SqliteConnection,
    cnpj: &str,
) -> Result<Option<Company>, sqlx::Error> {
    sqlx::query_as::<_, Company>("SELECT * FROM companies WHERE cnpj = ?")
        .bind(cnpj)
        .fetch_optional(&mut *conn)
        .await
}

/// True when a company other than `except_id` is registered under `cnpj`.
pub async fn cnpj_taken(
    conn: &mut SqliteConnection,
    cnpj: &str,
    except_id: Option<i64>,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM companies WHERE cnpj = ? AND id != ?)",
    )
    .bind(cnpj)
    .bind(except_id.unwrap_or(0))
    .fetch_one(&mut *conn)
    .await
}

pub async fn update_company(
    conn: &mut SqliteConnection,
    company_id: i64,
    input: &CompanyInput,
) -> Result<Company, sqlx::Error> {
    sqlx::query_as::<_, Company>(
        r#"
        UPDATE companies
        SET name = ?, cnpj = ?, website = ?, description = ?, updated_at = ?
        WHERE id = ?
        RETURNING *
        "#,
    )
    .bind(&input.name)
    .bind(&input.cnpj)
    .bind(&input.website)
    .bind(&input.description)
    .bind(Utc::now())
    .bind(company_id)
    .fetch_one(&mut *conn)
    .await
}

/// Deletes the company; its jobs and their applications go with it.
pub async fn delete_company(conn: &mut SqliteConnection, company_id: i64) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM companies WHERE id = ?")
        .bind(company_id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

/// Companies owned by `owner_id`, by name.
pub async fn list_companies_by_owner(
    conn: &mut SqliteConnection,
    owner_id: i64,
) -> Result<Vec<Company>, sqlx::Error> {
    sqlx::query_as::<_, Company>(
        "SELECT * FROM companies WHERE owner_id = ? ORDER BY name, id",
    )
    .bind(owner_id)
    .fetch_all(&mut *conn)
    .await
}

pub async fn owns_any_company(conn: &mut SqliteConnection, owner_id: i64) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM companies WHERE owner_id = ?)")
        .bind(owner_id)
        .fetch_one(&mut *conn)
        .await
}

/// Looks the company up by CNPJ and creates it for `owner_id` when missing.
/// The flag is true when a row was inserted.
pub async fn get_or_create_company(
    conn: &mut SqliteConnection,
    owner_id: i64,
    input: &CompanyInput,
) -> Result<(Company, bool), sqlx::Error> {
    if let Some(company) = find_company_by_cnpj(conn, &input.cnpj).await? {
        return Ok((company, false));
    }
    let company = insert_company(conn, owner_id, input).await?;
    Ok((company, true))
}
