use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tempfile::TempDir;
use tokio::sync::Mutex;
use tower::ServiceExt;

use courseboard::api::router;
use courseboard::config::AppConfig;
use courseboard::services::CourseService;
use courseboard::state::AppState;
use courseboard::store::CsvStore;

fn test_app() -> (TempDir, Router) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let config = AppConfig {
        courses_file: dir.path().join("courses.csv"),
        students_file: dir.path().join("students.csv"),
        port: 0,
    };
    let service = CourseService::new(CsvStore::new(&config));
    let state = AppState {
        service: Arc::new(Mutex::new(service)),
    };
    (dir, router(state))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(v) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(v.to_string()))
            .expect("Failed to build request"),
        None => builder.body(Body::empty()).expect("Failed to build request"),
    };
    let response = app.clone().oneshot(request).await.expect("Request failed");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("Body was not JSON")
    };
    (status, value)
}

async fn send_html(app: &Router, uri: &str) -> (StatusCode, Option<String>, String) {
    let request = Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("Failed to build request");
    let response = app.clone().oneshot(request).await.expect("Request failed");
    let status = response.status();
    let location = response
        .headers()
        .get(header::LOCATION)
        .map(|v| v.to_str().unwrap_or_default().to_string());
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    (status, location, String::from_utf8_lossy(&bytes).to_string())
}

#[tokio::test]
async fn create_course_applies_defaults() {
    let (_dir, app) = test_app();
    let (status, body) = send(
        &app,
        "POST",
        "/api/courses",
        Some(json!({ "title": "Math 101" })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 1);
    assert_eq!(body["instructor"], "Unknown");
    assert_eq!(body["credits"], 3);
    assert_eq!(body["students"], json!([]));
}

#[tokio::test]
async fn create_course_requires_title() {
    let (_dir, app) = test_app();
    for payload in [json!({}), json!({ "title": "" })] {
        let (status, body) = send(&app, "POST", "/api/courses", Some(payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Title is required" }));
    }
}

#[tokio::test]
async fn get_missing_course_is_404() {
    let (_dir, app) = test_app();
    let (status, body) = send(&app, "GET", "/api/courses/42", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Course not found" }));
}

#[tokio::test]
async fn update_applies_known_fields_and_ignores_unknown() {
    let (_dir, app) = test_app();
    send(&app, "POST", "/api/courses", Some(json!({ "title": "Math 101" }))).await;

    let (status, body) = send(
        &app,
        "PUT",
        "/api/courses/1",
        Some(json!({ "title": "Math 102", "credits": 4, "bogus": "ignored" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Math 102");
    assert_eq!(body["credits"], 4);
    assert!(body.get("bogus").is_none());

    let (status, body) = send(&app, "PUT", "/api/courses/42", Some(json!({}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Course not found" }));
}

#[tokio::test]
async fn delete_course_keeps_remaining_ids() {
    let (_dir, app) = test_app();
    send(&app, "POST", "/api/courses", Some(json!({ "title": "Math 101" }))).await;
    send(&app, "POST", "/api/courses", Some(json!({ "title": "History 210" }))).await;

    let (status, body) = send(&app, "DELETE", "/api/courses/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Course deleted successfully" }));

    let (status, body) = send(&app, "GET", "/api/courses", None).await;
    assert_eq!(status, StatusCode::OK);
    let listed = body.as_array().expect("Expected an array");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["id"], 2);
    assert_eq!(listed[0]["title"], "History 210");

    let (status, _) = send(&app, "DELETE", "/api/courses/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_courses_filters_by_instructor() {
    let (_dir, app) = test_app();
    send(
        &app,
        "POST",
        "/api/courses",
        Some(json!({ "title": "Math 101", "instructor": "Dr. Adams" })),
    )
    .await;
    send(
        &app,
        "POST",
        "/api/courses",
        Some(json!({ "title": "History 210", "instructor": "Dr. Brown" })),
    )
    .await;

    let (status, body) = send(&app, "GET", "/api/courses?instructor=Dr.%20Adams", None).await;
    assert_eq!(status, StatusCode::OK);
    let listed = body.as_array().expect("Expected an array");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["title"], "Math 101");

    let (_, body) = send(&app, "GET", "/api/courses", None).await;
    assert_eq!(body.as_array().expect("Expected an array").len(), 2);
}

#[tokio::test]
async fn student_enrollment_flow() {
    let (_dir, app) = test_app();
    send(&app, "POST", "/api/courses", Some(json!({ "title": "Math 101" }))).await;

    // All three fields are required.
    let (status, body) = send(
        &app,
        "POST",
        "/api/courses/1/students",
        Some(json!({ "name": "John Doe" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({ "error": "Name, email, and student_id are required" })
    );

    let payload = json!({
        "name": "John Doe",
        "email": "john@example.com",
        "student_id": "S001"
    });
    let (status, body) = send(&app, "POST", "/api/courses/1/students", Some(payload.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], "S001");
    assert_eq!(body["grade"], Value::Null);

    let (status, body) = send(&app, "POST", "/api/courses/42/students", Some(payload)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Course not found" }));
}

#[tokio::test]
async fn grade_update_and_removal() {
    let (_dir, app) = test_app();
    send(&app, "POST", "/api/courses", Some(json!({ "title": "Math 101" }))).await;
    send(
        &app,
        "POST",
        "/api/courses/1/students",
        Some(json!({
            "name": "John Doe",
            "email": "john@example.com",
            "student_id": "S001"
        })),
    )
    .await;

    let (status, body) = send(
        &app,
        "PUT",
        "/api/courses/1/students/S001",
        Some(json!({ "grade": "A" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["grade"], "A");

    let (status, body) = send(
        &app,
        "PUT",
        "/api/courses/1/students/S404",
        Some(json!({ "grade": "A" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Course or student not found" }));

    let (status, body) = send(&app, "DELETE", "/api/courses/1/students/S001", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Student removed successfully" }));

    let (_, body) = send(&app, "GET", "/api/courses/1", None).await;
    assert_eq!(body["students"], json!([]));

    // Removing an unknown student from an existing course still answers 200.
    let (status, _) = send(&app, "DELETE", "/api/courses/1/students/S404", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn html_index_and_course_page() {
    let (_dir, app) = test_app();
    send(
        &app,
        "POST",
        "/api/courses",
        Some(json!({ "title": "Math 101", "instructor": "Dr. Adams" })),
    )
    .await;

    let (status, _, html) = send_html(&app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Math 101"));
    assert!(html.contains("Dr. Adams"));

    let (status, _, html) = send_html(&app, "/courses/1").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("No students enrolled."));

    // Unknown course ids bounce back to the index.
    let (status, location, _) = send_html(&app, "/courses/42").await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/"));
}

#[tokio::test]
async fn state_survives_restart_with_fresh_router() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let config = AppConfig {
        courses_file: dir.path().join("courses.csv"),
        students_file: dir.path().join("students.csv"),
        port: 0,
    };

    let build = |config: &AppConfig| {
        let service = CourseService::new(CsvStore::new(config));
        router(AppState {
            service: Arc::new(Mutex::new(service)),
        })
    };

    let app = build(&config);
    send(&app, "POST", "/api/courses", Some(json!({ "title": "Math 101" }))).await;
    send(
        &app,
        "POST",
        "/api/courses/1/students",
        Some(json!({
            "name": "John Doe",
            "email": "john@example.com",
            "student_id": "S001"
        })),
    )
    .await;
    drop(app);

    let app = build(&config);
    let (status, body) = send(&app, "GET", "/api/courses/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Math 101");
    assert_eq!(body["students"][0]["id"], "S001");

    // The id counter resumes past the persisted maximum.
    let (_, body) = send(&app, "POST", "/api/courses", Some(json!({ "title": "History 210" }))).await;
    assert_eq!(body["id"], 2);
}
