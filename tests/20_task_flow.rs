mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

/// The full happy path: register, create, list, update, delete, re-fetch.
#[tokio::test]
async fn user_registers_and_works_through_a_task_lifecycle() -> Result<()> {
    let server = common::ensure_server().await?;
    common::register_user(&server.base_url, "flow_alice", "pw1").await?;
    let client = reqwest::Client::new();

    // Create: 201, Location header, server-assigned id, completed defaults off
    let res = client
        .post(format!("{}/api/tasks", server.base_url))
        .basic_auth("flow_alice", Some("pw1"))
        .json(&json!({ "title": "Buy milk" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let location = res
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .expect("Location header");

    let created = res.json::<serde_json::Value>().await?;
    let id = created["id"].as_i64().expect("server-assigned id");
    assert_eq!(location, format!("/api/tasks/{}", id));
    assert_eq!(created["title"], "Buy milk");
    assert_eq!(created["completed"], false);
    assert!(created.get("userId").is_none(), "owner must not leak");

    // List: exactly one task
    let res = client
        .get(format!("{}/api/tasks", server.base_url))
        .basic_auth("flow_alice", Some("pw1"))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let tasks = res.json::<serde_json::Value>().await?;
    let tasks = tasks.as_array().expect("plain array without pagination");
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["title"], "Buy milk");

    // Update: overwrites the mutable fields, id unchanged
    let res = client
        .put(format!("{}/api/tasks/{}", server.base_url, id))
        .basic_auth("flow_alice", Some("pw1"))
        .json(&json!({
            "title": "Buy oat milk",
            "description": "from the corner shop",
            "completed": true,
            "dueDate": "2026-09-03"
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let updated = res.json::<serde_json::Value>().await?;
    assert_eq!(updated["id"], id);
    assert_eq!(updated["title"], "Buy oat milk");

    // Re-fetch reflects exactly the update
    let res = client
        .get(format!("{}/api/tasks/{}", server.base_url, id))
        .basic_auth("flow_alice", Some("pw1"))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let fetched = res.json::<serde_json::Value>().await?;
    assert_eq!(fetched["title"], "Buy oat milk");
    assert_eq!(fetched["description"], "from the corner shop");
    assert_eq!(fetched["completed"], true);
    assert_eq!(fetched["dueDate"], "2026-09-03");

    // Delete: 204, then the task is gone
    let res = client
        .delete(format!("{}/api/tasks/{}", server.base_url, id))
        .basic_auth("flow_alice", Some("pw1"))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = client
        .get(format!("{}/api/tasks/{}", server.base_url, id))
        .basic_auth("flow_alice", Some("pw1"))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn create_honors_an_explicit_completed_flag() -> Result<()> {
    let server = common::ensure_server().await?;
    common::register_user(&server.base_url, "flow_done", "pw1").await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/tasks", server.base_url))
        .basic_auth("flow_done", Some("pw1"))
        .json(&json!({ "title": "Already done", "completed": true }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let created = res.json::<serde_json::Value>().await?;
    assert_eq!(created["completed"], true);
    let id = created["id"].as_i64().unwrap();

    // The flag survives persistence, not just the echo
    let res = client
        .get(format!("{}/api/tasks/{}", server.base_url, id))
        .basic_auth("flow_done", Some("pw1"))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<serde_json::Value>().await?["completed"], true);
    Ok(())
}

#[tokio::test]
async fn create_requires_a_title() -> Result<()> {
    let server = common::ensure_server().await?;
    common::register_user(&server.base_url, "flow_notitle", "pw1").await?;
    let client = reqwest::Client::new();

    for payload in [json!({}), json!({ "title": "  " }), json!({ "description": "x" })] {
        let res = client
            .post(format!("{}/api/tasks", server.base_url))
            .basic_auth("flow_notitle", Some("pw1"))
            .json(&payload)
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "payload: {payload}");
        let body = res.json::<serde_json::Value>().await?;
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }
    Ok(())
}

#[tokio::test]
async fn pagination_returns_a_page_envelope() -> Result<()> {
    let server = common::ensure_server().await?;
    common::register_user(&server.base_url, "flow_pager", "pw1").await?;
    let client = reqwest::Client::new();

    for i in 0..5 {
        let res = client
            .post(format!("{}/api/tasks", server.base_url))
            .basic_auth("flow_pager", Some("pw1"))
            .json(&json!({ "title": format!("task-{i}") }))
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    let res = client
        .get(format!("{}/api/tasks?page=1&size=2", server.base_url))
        .basic_auth("flow_pager", Some("pw1"))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let page = res.json::<serde_json::Value>().await?;
    assert_eq!(page["page"], 1);
    assert_eq!(page["size"], 2);
    assert_eq!(page["totalElements"], 5);
    assert_eq!(page["totalPages"], 3);
    let content = page["content"].as_array().unwrap();
    assert_eq!(content.len(), 2);
    assert_eq!(content[0]["title"], "task-2");
    assert_eq!(content[1]["title"], "task-3");

    // Absurd page numbers land past the end instead of erroring
    let res = client
        .get(format!(
            "{}/api/tasks?page={}&size=100",
            server.base_url,
            i64::MAX
        ))
        .basic_auth("flow_pager", Some("pw1"))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let page = res.json::<serde_json::Value>().await?;
    assert_eq!(page["totalElements"], 5);
    assert_eq!(page["content"].as_array().unwrap().len(), 0);
    Ok(())
}
