mod common;

use allocation_api::auth::Role;
use anyhow::Result;
use axum::http::StatusCode;
use axum::Router;
use serde_json::{json, Value};

use common::{get, post, test_app, token_for};

async fn seed(app: &Router) -> Result<()> {
    let admin = token_for(Role::Admin);
    let allocator = token_for(Role::Allocator);
    let people = [("Zoe", 1, "2024-03-01", "2024-03-31"), ("Adam", 2, "2024-05-01", "2024-05-15"), ("Mia", 1, "2024-08-01", "2024-08-31")];

    for (i, (name, role, start, end)) in people.iter().enumerate() {
        let employee = post(
            app,
            "/api/admin/employees",
            Some(&admin),
            json!({
                "name": name,
                "email": format!("r{}@example.com", i),
                "bench_start_date": "2024-01-01",
                "job_role_id": role
            }),
        )
        .await?;
        let id = employee.body["data"]["id"].clone();
        post(
            app,
            "/api/allocator/allocations",
            Some(&allocator),
            json!({
                "employee_id": id,
                "allocation_type_id": 2,
                "start_date": start,
                "end_date": end,
                "training_id": 1
            }),
        )
        .await?;
    }
    Ok(())
}

fn names(body: &Value) -> Vec<String> {
    body["data"]
        .as_array()
        .map(|rows| {
            rows.iter()
                .filter_map(|r| r["employee_name"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

#[tokio::test]
async fn date_range_returns_overlapping_allocations() -> Result<()> {
    let (app, _) = test_app();
    seed(&app).await?;
    let manager = token_for(Role::Manager);

    let res = get(&app, "/api/manager/reports/date-range?from=2024-03-15&to=2024-05-01", Some(&manager)).await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(names(&res.body), vec!["Zoe", "Adam"]);
    assert_eq!(res.body["data"][0]["training"], "Onboarding");
    assert_eq!(res.body["data"][0]["allocation_type"], "Training");

    let none = get(&app, "/api/manager/reports/date-range?from=2025-01-01&to=2025-12-31", Some(&manager)).await?;
    assert_eq!(none.body["data"], json!([]));
    Ok(())
}

#[tokio::test]
async fn date_range_rejects_inverted_range() -> Result<()> {
    let (app, _) = test_app();
    let manager = token_for(Role::Manager);

    let res = get(&app, "/api/manager/reports/date-range?from=2024-06-01&to=2024-01-01", Some(&manager)).await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn job_role_report_filters_and_sorts_by_name() -> Result<()> {
    let (app, _) = test_app();
    seed(&app).await?;
    let manager = token_for(Role::Manager);

    let res = post(&app, "/api/manager/reports/job-role", Some(&manager), json!({ "job_role_ids": [1, 1] })).await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(names(&res.body), vec!["Mia", "Zoe"]);
    assert_eq!(res.body["data"][0]["job_role"], "Software Engineer");

    let both = post(&app, "/api/manager/reports/job-role", Some(&manager), json!({ "job_role_ids": [2, 1] })).await?;
    assert_eq!(names(&both.body), vec!["Adam", "Mia", "Zoe"]);
    Ok(())
}

#[tokio::test]
async fn job_role_report_requires_a_selection() -> Result<()> {
    let (app, _) = test_app();
    let manager = token_for(Role::Manager);

    let res = post(&app, "/api/manager/reports/job-role", Some(&manager), json!({ "job_role_ids": [] })).await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["field_errors"]["job_role_ids"], "Select at least one job role");
    Ok(())
}

#[tokio::test]
async fn reports_are_manager_only() -> Result<()> {
    let (app, _) = test_app();
    let res = post(&app, "/api/manager/reports/job-role", Some(&token_for(Role::Allocator)), json!({ "job_role_ids": [1] })).await?;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn missing_report_bound_gets_error_envelope() -> Result<()> {
    let (app, _) = test_app();
    let manager = token_for(Role::Manager);

    let res = get(&app, "/api/manager/reports/date-range?from=2024-01-01", Some(&manager)).await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["success"], false);
    assert_eq!(res.body["code"], "BAD_REQUEST");
    Ok(())
}
