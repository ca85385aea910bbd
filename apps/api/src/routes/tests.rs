use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::config::Config;
use crate::db::test_pool;
use crate::routes::build_router;
use crate::state::AppState;

const BODY_LIMIT: usize = 1024 * 1024;

async fn app() -> Router {
    build_router(AppState {
        db: test_pool().await,
        config: Config::for_tests(),
    })
}

async fn call(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
        Some(body) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(serde_json::to_vec(&body).unwrap())
        }
        None => Body::empty(),
    };

    let response = app.clone().oneshot(request.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), BODY_LIMIT)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn get(app: &Router, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
    call(app, Method::GET, uri, token, None).await
}

async fn post(app: &Router, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
    call(app, Method::POST, uri, Some(token), Some(body)).await
}

/// Registers an account and returns its session token.
async fn signup(app: &Router, email: &str) -> String {
    let (status, body) = call(
        app,
        Method::POST,
        "/accounts/signup/",
        None,
        Some(json!({
            "first_name": "Test",
            "last_name": "User",
            "email": email,
            "password1": "s3cret-pass",
            "password2": "s3cret-pass",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["data"]["token"].as_str().unwrap().to_string()
}

async fn create_company(app: &Router, token: &str, cnpj: &str) -> i64 {
    let (status, body) = post(
        app,
        "/companies/create/",
        token,
        json!({ "name": format!("Company {cnpj}"), "cnpj": cnpj }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["data"]["id"].as_i64().unwrap()
}

async fn create_job(app: &Router, token: &str, company_id: i64, title: &str, tags: &str) -> i64 {
    let (status, body) = post(
        app,
        "/jobs/create/",
        token,
        json!({
            "company": company_id,
            "title": title,
            "description": "Build and run things.",
            "tags_input": tags,
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["data"]["id"].as_i64().unwrap()
}

/// A recruiter with one company and one active job, plus a candidate.
struct Board {
    app: Router,
    recruiter: String,
    candidate: String,
    company_id: i64,
    job_id: i64,
}

async fn board() -> Board {
    let app = app().await;
    let recruiter = signup(&app, "recruiter@example.com").await;
    let candidate = signup(&app, "candidate@example.com").await;
    let company_id = create_company(&app, &recruiter, "11.111.111/0001-11").await;
    let job_id = create_job(&app, &recruiter, company_id, "Backend Developer", "Python, Django").await;
    Board {
        app,
        recruiter,
        candidate,
        company_id,
        job_id,
    }
}

#[tokio::test]
async fn health_reports_service_and_version() {
    let app = app().await;
    let (status, body) = get(&app, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "ginga");
}

#[tokio::test]
async fn sessions_follow_signup_login_and_logout() {
    let app = app().await;
    signup(&app, "Ana@Example.com").await;

    let (status, body) = call(
        &app,
        Method::POST,
        "/accounts/login/",
        None,
        Some(json!({ "email": "ana@example.com", "password": "wrong-pass" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let (status, body) = call(
        &app,
        Method::POST,
        "/accounts/login/",
        None,
        Some(json!({ "email": "ANA@example.com", "password": "s3cret-pass" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["username"], "ana@example.com");
    let token = body["token"].as_str().unwrap().to_string();

    assert_eq!(get(&app, "/dashboard/", Some(&token)).await.0, StatusCode::OK);
    assert_eq!(get(&app, "/dashboard/", None).await.0, StatusCode::UNAUTHORIZED);

    let (status, _) = call(&app, Method::POST, "/accounts/logout/", Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(get(&app, "/dashboard/", Some(&token)).await.0, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn duplicate_signup_email_is_a_field_error() {
    let app = app().await;
    signup(&app, "dup@example.com").await;

    let (status, body) = call(
        &app,
        Method::POST,
        "/accounts/signup/",
        None,
        Some(json!({
            "first_name": "Other",
            "last_name": "Person",
            "email": "DUP@example.com",
            "password1": "s3cret-pass",
            "password2": "s3cret-pass",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]["fields"]["email"].is_array());
}

#[tokio::test]
async fn applying_twice_warns_with_the_existing_application() {
    let b = board().await;
    let uri = format!("/jobs/{}/apply/", b.job_id);

    let (status, first) = post(&b.app, &uri, &b.candidate, json!({ "cover_letter": "Hi!" })).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(first["level"], "success");
    assert_eq!(first["data"]["status"], "applied");

    let (status, second) = call(&b.app, Method::POST, &uri, Some(&b.candidate), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["level"], "warning");
    assert_eq!(second["message"], "You have already applied to this job.");
    assert_eq!(second["data"]["id"], first["data"]["id"]);
    assert_eq!(second["data"]["cover_letter"], "Hi!");
}

#[tokio::test]
async fn apply_rejects_a_malformed_body_but_accepts_none() {
    let b = board().await;
    let uri = format!("/jobs/{}/apply/", b.job_id);

    let request = Request::post(&uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", b.candidate))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"cover_letter\": "))
        .unwrap();
    let response = b.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let (status, body) = post(&b.app, &uri, &b.candidate, json!({ "cover_letter": 42 })).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "INVALID_BODY");

    let (_, listing) = get(&b.app, "/jobs/candidaturas/", Some(&b.candidate)).await;
    assert_eq!(listing["applications"]["total"], 0);

    let (status, body) = call(&b.app, Method::POST, &uri, Some(&b.candidate), None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["cover_letter"], "");
}

#[tokio::test]
async fn owner_cannot_apply_to_their_own_job() {
    let b = board().await;
    let (status, body) = post(
        &b.app,
        &format!("/jobs/{}/apply/", b.job_id),
        &b.recruiter,
        json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["level"], "error");
    assert_eq!(body["message"], "You cannot apply to jobs from your own company.");
}

#[tokio::test]
async fn withdraw_only_succeeds_while_still_applied() {
    let b = board().await;
    let (_, applied) = post(&b.app, &format!("/jobs/{}/apply/", b.job_id), &b.candidate, json!({})).await;
    let application_id = applied["data"]["id"].as_i64().unwrap();

    let (status, body) = post(
        &b.app,
        &format!("/jobs/application/{application_id}/status/"),
        &b.recruiter,
        json!({ "status": "interviewing" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "interviewing");

    let withdraw = format!("/jobs/application/{application_id}/withdraw/");
    let (status, _) = post(&b.app, &withdraw, &b.candidate, json!({})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, listing) = get(&b.app, "/jobs/candidaturas/", Some(&b.candidate)).await;
    assert_eq!(listing["applications"]["total"], 1);
    assert_eq!(listing["stats"]["interviewing"], 1);

    let other_job = create_job(&b.app, &b.recruiter, b.company_id, "Data Engineer", "SQL").await;
    let (_, applied) = post(&b.app, &format!("/jobs/{other_job}/apply/"), &b.candidate, json!({})).await;
    let other_id = applied["data"]["id"].as_i64().unwrap();
    let (status, body) = post(
        &b.app,
        &format!("/jobs/application/{other_id}/withdraw/"),
        &b.candidate,
        json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Application for \"Data Engineer\" withdrawn successfully.");
}

#[tokio::test]
async fn rejection_reason_is_kept_only_for_rejected_applications() {
    let b = board().await;
    let (_, applied) = post(&b.app, &format!("/jobs/{}/apply/", b.job_id), &b.candidate, json!({})).await;
    let uri = format!("/jobs/application/{}/status/", applied["data"]["id"]);

    let (_, body) = post(
        &b.app,
        &uri,
        &b.recruiter,
        json!({ "status": "rejected", "rejection_reason": "position_filled", "feedback_text": "Thanks" }),
    )
    .await;
    assert_eq!(body["data"]["status"], "rejected");
    assert_eq!(body["data"]["rejection_reason"], "position_filled");

    let (_, body) = post(
        &b.app,
        &uri,
        &b.recruiter,
        json!({ "status": "approved", "rejection_reason": "position_filled" }),
    )
    .await;
    assert_eq!(body["data"]["status"], "approved");
    assert!(body["data"]["rejection_reason"].is_null());

    let (status, _) = post(&b.app, &uri, &b.candidate, json!({ "status": "approved" })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn deleting_a_company_removes_its_jobs_and_applications() {
    let b = board().await;
    post(&b.app, &format!("/jobs/{}/apply/", b.job_id), &b.candidate, json!({})).await;

    let (status, body) = post(
        &b.app,
        &format!("/companies/{}/delete/", b.company_id),
        &b.recruiter,
        json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Company deleted successfully!");

    assert_eq!(
        get(&b.app, &format!("/jobs/{}/", b.job_id), None).await.0,
        StatusCode::NOT_FOUND
    );
    let (_, listing) = get(&b.app, "/jobs/candidaturas/", Some(&b.candidate)).await;
    assert_eq!(listing["applications"]["total"], 0);
}

#[tokio::test]
async fn other_recruiters_are_forbidden_and_missing_ids_are_not_found() {
    let b = board().await;
    let intruder = signup(&b.app, "intruder@example.com").await;
    create_company(&b.app, &intruder, "22.222.222/0001-22").await;

    for uri in [
        format!("/companies/{}/edit/", b.company_id),
        format!("/jobs/{}/edit/", b.job_id),
        format!("/jobs/{}/applications/", b.job_id),
    ] {
        assert_eq!(get(&b.app, &uri, Some(&intruder)).await.0, StatusCode::FORBIDDEN, "{uri}");
    }
    let (status, _) = post(
        &b.app,
        &format!("/jobs/{}/delete/", b.job_id),
        &intruder,
        json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    assert_eq!(
        get(&b.app, "/companies/9999/edit/", Some(&intruder)).await.0,
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        get(&b.app, "/jobs/9999/edit/", Some(&intruder)).await.0,
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn posting_jobs_requires_an_owned_company() {
    let b = board().await;
    assert_eq!(
        get(&b.app, "/jobs/create/", Some(&b.candidate)).await.0,
        StatusCode::FORBIDDEN
    );

    let intruder = signup(&b.app, "intruder@example.com").await;
    create_company(&b.app, &intruder, "22.222.222/0001-22").await;
    let (status, body) = post(
        &b.app,
        "/jobs/create/",
        &intruder,
        json!({ "company": b.company_id, "title": "Sneaky", "description": "Nope" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]["fields"]["company"].is_array());

    let (_, form) = get(
        &b.app,
        &format!("/jobs/create/?company={}", b.company_id),
        Some(&b.recruiter),
    )
    .await;
    assert_eq!(form["form"]["company"], b.company_id);
    assert_eq!(form["form"]["is_active"], true);
}

#[tokio::test]
async fn duplicate_cnpj_is_rejected_on_create() {
    let b = board().await;
    let (status, body) = post(
        &b.app,
        "/companies/create/",
        &b.candidate,
        json!({ "name": "Copycat", "cnpj": "11.111.111/0001-11" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["fields"]["cnpj"][0], "Company with this CNPJ already exists.");
}

#[tokio::test]
async fn editing_a_job_replaces_its_tags() {
    let b = board().await;
    let (status, body) = post(
        &b.app,
        &format!("/jobs/{}/edit/", b.job_id),
        &b.recruiter,
        json!({
            "company": b.company_id,
            "title": "Backend Developer",
            "description": "Build and run things.",
            "tags_input": "Rust, Go, Rust",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["tags"], json!(["Go", "Rust"]));

    let (_, form) = get(&b.app, &format!("/jobs/{}/edit/", b.job_id), Some(&b.recruiter)).await;
    assert_eq!(form["form"]["tags_input"], "Go, Rust");
}

#[tokio::test]
async fn inactive_jobs_are_hidden_from_everyone_but_the_owner() {
    let b = board().await;
    post(
        &b.app,
        &format!("/jobs/{}/edit/", b.job_id),
        &b.recruiter,
        json!({
            "company": b.company_id,
            "title": "Backend Developer",
            "description": "Paused for now.",
            "is_active": false,
        }),
    )
    .await;

    let detail = format!("/jobs/{}/", b.job_id);
    assert_eq!(get(&b.app, &detail, None).await.0, StatusCode::NOT_FOUND);
    assert_eq!(get(&b.app, &detail, Some(&b.candidate)).await.0, StatusCode::NOT_FOUND);
    let (status, body) = get(&b.app, &detail, Some(&b.recruiter)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_owner"], true);

    let (_, listing) = get(&b.app, "/jobs/", None).await;
    assert_eq!(listing["total_jobs"], 0);

    let (status, _) = post(&b.app, &format!("/jobs/{}/apply/", b.job_id), &b.candidate, json!({})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, dashboard) = get(&b.app, "/jobs/dashboard/", Some(&b.recruiter)).await;
    assert_eq!(dashboard["total_jobs"], 1);
    assert_eq!(dashboard["active_jobs"], 0);
}

#[tokio::test]
async fn job_listing_filters_by_search_and_tag() {
    let b = board().await;
    create_job(&b.app, &b.recruiter, b.company_id, "Mobile Developer", "Flutter").await;

    let (_, all) = get(&b.app, "/jobs/", None).await;
    assert_eq!(all["total_jobs"], 2);
    assert_eq!(all["jobs"]["items"][0]["title"], "Mobile Developer");

    let (_, by_tag) = get(&b.app, "/jobs/?tag=django", None).await;
    assert_eq!(by_tag["jobs"]["total"], 1);
    assert_eq!(by_tag["jobs"]["items"][0]["title"], "Backend Developer");

    let (_, by_text) = get(&b.app, "/jobs/?q=mobile", None).await;
    assert_eq!(by_text["jobs"]["total"], 1);
    assert_eq!(by_text["search_query"], "mobile");

    assert_eq!(get(&b.app, "/jobs/?page=5", None).await.0, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn dashboard_recommends_jobs_matching_skills() {
    let b = board().await;
    create_job(&b.app, &b.recruiter, b.company_id, "Systems Engineer", "Rust, Linux").await;

    let (status, _) = post(
        &b.app,
        "/accounts/professional/edit/",
        &b.candidate,
        json!({ "skills": "rust , go" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, dashboard) = get(&b.app, "/dashboard/", Some(&b.candidate)).await;
    let titles: Vec<&str> = dashboard["recommended_jobs"]
        .as_array()
        .unwrap()
        .iter()
        .map(|job| job["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Systems Engineer"]);
    assert_eq!(dashboard["profile"]["skills"], "rust, go");
    assert_eq!(dashboard["is_recruiter"], false);

    let (_, recruiter) = get(&b.app, "/dashboard/", Some(&b.recruiter)).await;
    assert_eq!(recruiter["is_recruiter"], true);
    assert_eq!(recruiter["recommended_jobs"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn tag_suggestions_require_login() {
    let b = board().await;
    assert_eq!(get(&b.app, "/jobs/api/tags/?q=dj", None).await.0, StatusCode::UNAUTHORIZED);

    let (status, body) = get(&b.app, "/jobs/api/tags/?q=DJ", Some(&b.candidate)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{ "value": "Django" }]));
}

#[tokio::test]
async fn accented_tags_filter_suggest_and_recommend_ignoring_case() {
    let b = board().await;
    create_job(&b.app, &b.recruiter, b.company_id, "Agile Coach", "Ágil, Scrum").await;

    // "ágil"
    let (_, by_tag) = get(&b.app, "/jobs/?tag=%C3%A1gil", None).await;
    assert_eq!(by_tag["jobs"]["total"], 1);
    assert_eq!(by_tag["jobs"]["items"][0]["title"], "Agile Coach");

    // "ÁG"
    let (_, suggestions) = get(&b.app, "/jobs/api/tags/?q=%C3%81G", Some(&b.candidate)).await;
    assert_eq!(suggestions, json!([{ "value": "Ágil" }]));

    post(
        &b.app,
        "/accounts/professional/edit/",
        &b.candidate,
        json!({ "skills": "ÁGIL" }),
    )
    .await;
    let (_, dashboard) = get(&b.app, "/dashboard/", Some(&b.candidate)).await;
    let titles: Vec<&str> = dashboard["recommended_jobs"]
        .as_array()
        .unwrap()
        .iter()
        .map(|job| job["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Agile Coach"]);
}

#[tokio::test]
async fn professional_data_is_all_or_nothing() {
    let b = board().await;
    let uri = "/accounts/professional/edit/";

    let (status, body) = post(
        &b.app,
        uri,
        &b.candidate,
        json!({
            "skills": "Rust, Go",
            "experiences": [
                { "company": "Acme", "role": "Dev", "start_date": "2020-01-01" },
                { "company": "Broken", "role": "Dev", "start_date": "not-a-date" },
            ],
            "education": [{ "id": 9999, "institution": "USP", "course": "CS" }],
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let fields = &body["error"]["fields"];
    assert!(fields["experiences-1-start_date"].is_array(), "{fields}");
    assert!(fields["education-0-id"].is_array(), "{fields}");

    let (_, stored) = get(&b.app, uri, Some(&b.candidate)).await;
    assert_eq!(stored["skills"], "");
    assert_eq!(stored["experiences"], json!([]));
    assert_eq!(stored["education"], json!([]));

    let (status, body) = post(
        &b.app,
        uri,
        &b.candidate,
        json!({
            "skills": "Rust, Go",
            "experiences": [
                { "company": "Acme", "role": "Dev", "start_date": "2020-01-01" },
                { "company": "Globex", "role": "Intern", "start_date": "2018-03-01", "end_date": "2019-12-31" },
            ],
            "tech_projects": [{ "name": "ginga", "url": "https://example.com/ginga" }],
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let data = &body["data"];
    assert_eq!(data["skills"], "Rust, Go");
    assert_eq!(data["experiences"].as_array().unwrap().len(), 2);
    assert_eq!(data["tech_projects"][0]["project_type"], "open_source");

    let acme = data["experiences"]
        .as_array()
        .unwrap()
        .iter()
        .find(|e| e["company"] == "Acme")
        .unwrap()["id"]
        .clone();
    let globex = data["experiences"]
        .as_array()
        .unwrap()
        .iter()
        .find(|e| e["company"] == "Globex")
        .unwrap()["id"]
        .clone();
    let project = data["tech_projects"][0]["id"].clone();

    let (status, body) = post(
        &b.app,
        uri,
        &b.candidate,
        json!({
            "experiences": [
                { "id": acme, "company": "Acme", "role": "Senior Dev", "start_date": "2020-01-01" },
                { "id": globex, "delete": true },
                { "company": "Initech", "role": "Lead", "start_date": "2023-05-01" },
            ],
            "tech_projects": [{ "id": project, "delete": true }],
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let data = &body["data"];
    assert_eq!(data["skills"], "Rust, Go");
    let roles: Vec<&str> = data["experiences"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["role"].as_str().unwrap())
        .collect();
    assert_eq!(roles, vec!["Lead", "Senior Dev"]);
    assert_eq!(data["tech_projects"], json!([]));
}

#[tokio::test]
async fn portfolio_is_public_only_once_published() {
    let app = app().await;
    let token = signup(&app, "dev@example.com").await;
    let (_, profile) = get(&app, "/accounts/profile/edit/", Some(&token)).await;
    let slug = profile["profile"]["slug"].as_str().unwrap().to_string();
    let portfolio = format!("/accounts/portfolio/{slug}/");

    assert_eq!(get(&app, &portfolio, None).await.0, StatusCode::NOT_FOUND);
    assert_eq!(get(&app, &portfolio, Some(&token)).await.0, StatusCode::OK);

    let (status, body) = post(
        &app,
        "/accounts/profile/edit/",
        &token,
        json!({
            "user": { "first_name": "Dev", "last_name": "Eloper", "email": "dev@example.com" },
            "profile": { "is_portfolio_public": true, "is_published": true },
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["profile"]["slug"], slug);

    let (status, body) = get(&app, &portfolio, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Dev Eloper");
}
