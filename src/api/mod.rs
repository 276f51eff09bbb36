pub mod pages;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::Router;
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::error::AppError;
use crate::models::{Course, EnrollStudentRequest, GradeUpdateRequest, NewCourseRequest, Student};
use crate::state::AppState;

#[derive(Deserialize)]
struct CourseQueryParams {
    instructor: Option<String>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(pages::index))
        .route("/courses/{id}", get(pages::course_page))
        .route("/api/courses", get(list_courses).post(create_course))
        .route(
            "/api/courses/{id}",
            get(get_course).put(update_course).delete(delete_course),
        )
        .route("/api/courses/{id}/students", post(enroll_student))
        .route(
            "/api/courses/{id}/students/{student_id}",
            put(update_student_grade).delete(remove_student),
        )
        .with_state(state)
}

async fn list_courses(
    State(state): State<AppState>,
    Query(params): Query<CourseQueryParams>,
) -> Result<Json<Vec<Course>>, AppError> {
    let service = state.service.lock().await;
    let courses = match params.instructor.as_deref() {
        Some(instructor) if !instructor.is_empty() => service.courses_by_instructor(instructor),
        _ => service.courses().to_vec(),
    };
    Ok(Json(courses))
}

async fn create_course(
    State(state): State<AppState>,
    Json(req): Json<NewCourseRequest>,
) -> Result<(StatusCode, Json<Course>), AppError> {
    if req.title.is_empty() {
        return Err(AppError::BadRequest("Title is required".to_string()));
    }
    let mut service = state.service.lock().await;
    let course = service.add_course(req.title, req.description, req.instructor, req.credits)?;
    Ok((StatusCode::CREATED, Json(course)))
}

async fn get_course(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Course>, AppError> {
    let service = state.service.lock().await;
    let course = service.course(id).cloned().ok_or(AppError::CourseNotFound)?;
    Ok(Json(course))
}

async fn update_course(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(changes): Json<Map<String, Value>>,
) -> Result<Json<Course>, AppError> {
    let mut service = state.service.lock().await;
    let course = service
        .update_course(id, &changes)?
        .ok_or(AppError::CourseNotFound)?;
    Ok(Json(course))
}

async fn delete_course(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let mut service = state.service.lock().await;
    if service.delete_course(id)? {
        Ok(Json(json!({ "message": "Course deleted successfully" })))
    } else {
        Err(AppError::CourseNotFound)
    }
}

async fn enroll_student(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<EnrollStudentRequest>,
) -> Result<(StatusCode, Json<Student>), AppError> {
    let (name, email, student_id) = match (req.name, req.email, req.student_id) {
        (Some(name), Some(email), Some(student_id))
            if !name.is_empty() && !email.is_empty() && !student_id.is_empty() =>
        {
            (name, email, student_id)
        }
        _ => {
            return Err(AppError::BadRequest(
                "Name, email, and student_id are required".to_string(),
            ));
        }
    };

    let mut service = state.service.lock().await;
    let student = service
        .enroll_student(id, name, email, student_id)?
        .ok_or(AppError::CourseNotFound)?;
    Ok((StatusCode::CREATED, Json(student)))
}

async fn update_student_grade(
    State(state): State<AppState>,
    Path((id, student_id)): Path<(i64, String)>,
    Json(req): Json<GradeUpdateRequest>,
) -> Result<Json<Student>, AppError> {
    let mut service = state.service.lock().await;
    let student = service
        .update_student_grade(id, &student_id, req.grade)?
        .ok_or(AppError::StudentNotFound)?;
    Ok(Json(student))
}

async fn remove_student(
    State(state): State<AppState>,
    Path((id, student_id)): Path<(i64, String)>,
) -> Result<Json<Value>, AppError> {
    let mut service = state.service.lock().await;
    if service.remove_student(id, &student_id)? {
        Ok(Json(json!({ "message": "Student removed successfully" })))
    } else {
        Err(AppError::StudentNotFound)
    }
}
