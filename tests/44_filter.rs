mod common;

use allocation_api::auth::Role;
use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;

use common::{get, post, test_app, token_for};

async fn seed(app: &axum::Router, names: &[&str]) -> Result<()> {
    let admin = token_for(Role::Admin);
    for (i, name) in names.iter().enumerate() {
        let allocation_type_id = if i % 3 == 0 { 2 } else { 1 };
        let job_role_id = 1 + (i as i64 % 2);
        post(
            app,
            "/api/admin/employees",
            Some(&admin),
            json!({
                "name": name,
                "email": format!("e{}@example.com", i),
                "bench_start_date": format!("2024-02-{:02}", i + 1),
                "job_role_id": job_role_id,
                "allocation_type_id": allocation_type_id
            }),
        )
        .await?;
    }
    Ok(())
}

#[tokio::test]
async fn pages_and_sorts_employees() -> Result<()> {
    let (app, _) = test_app();
    seed(&app, &["Cara", "Abe", "Dina", "Bea", "Eli"]).await?;
    let admin = token_for(Role::Admin);

    let page = get(&app, "/api/admin/employees?page=1&page_size=2&sort=name%20desc", Some(&admin)).await?;
    assert_eq!(page.status, StatusCode::OK);
    assert_eq!(page.body["data"]["total"], 5);
    assert_eq!(page.body["data"]["page_size"], 2);
    assert_eq!(page.body["data"]["items"][0]["name"], "Eli");
    assert_eq!(page.body["data"]["items"][1]["name"], "Dina");

    let last = get(&app, "/api/admin/employees?page=3&page_size=2&sort=name", Some(&admin)).await?;
    assert_eq!(last.body["data"]["items"].as_array().map(Vec::len), Some(1));
    assert_eq!(last.body["data"]["items"][0]["name"], "Eli");
    Ok(())
}

#[tokio::test]
async fn search_matches_name_or_email() -> Result<()> {
    let (app, _) = test_app();
    seed(&app, &["Cara", "Abe", "Dina"]).await?;
    let admin = token_for(Role::Admin);

    let res = get(&app, "/api/admin/employees?search=ab", Some(&admin)).await?;
    assert_eq!(res.body["data"]["total"], 1);
    assert_eq!(res.body["data"]["items"][0]["name"], "Abe");

    let res = get(&app, "/api/admin/employees?search=e2%40", Some(&admin)).await?;
    assert_eq!(res.body["data"]["items"][0]["name"], "Dina");
    Ok(())
}

#[tokio::test]
async fn manager_filters_by_allocation_type() -> Result<()> {
    let (app, _) = test_app();
    seed(&app, &["Cara", "Abe", "Dina", "Bea"]).await?;
    let manager = token_for(Role::Manager);

    let training = get(&app, "/api/manager/employees?allocation_type_id=2", Some(&manager)).await?;
    assert_eq!(training.body["data"]["total"], 2);

    let bench = get(&app, "/api/manager/employees?allocation_type_id=1", Some(&manager)).await?;
    assert_eq!(bench.body["data"]["total"], 2);
    Ok(())
}

#[tokio::test]
async fn rejects_bad_sort_and_page() -> Result<()> {
    let (app, _) = test_app();
    let admin = token_for(Role::Admin);

    let res = get(&app, "/api/admin/employees?sort=password%20asc", Some(&admin)).await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);

    let res = get(&app, "/api/admin/employees?sort=name%20sideways", Some(&admin)).await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);

    let res = get(&app, "/api/admin/employees?page=0", Some(&admin)).await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn page_size_is_capped() -> Result<()> {
    let (app, _) = test_app();
    let admin = token_for(Role::Admin);

    let res = get(&app, "/api/admin/employees?page_size=5000", Some(&admin)).await?;
    assert_eq!(res.body["data"]["page_size"], 100);
    Ok(())
}

#[tokio::test]
async fn search_wildcards_match_literally() -> Result<()> {
    let (app, _) = test_app();
    seed(&app, &["Cara", "Abe"]).await?;
    let admin = token_for(Role::Admin);

    let res = get(&app, "/api/admin/employees?search=%25", Some(&admin)).await?;
    assert_eq!(res.body["data"]["total"], 0);

    let res = get(&app, "/api/admin/employees?search=_", Some(&admin)).await?;
    assert_eq!(res.body["data"]["total"], 0);
    Ok(())
}
