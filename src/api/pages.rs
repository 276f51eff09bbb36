//! Server-rendered HTML views: a course list and a per-course roster page.

use std::fmt::Write as _;

use axum::extract::{Path, State};
use axum::response::{Html, IntoResponse, Redirect, Response};

use crate::models::Course;
use crate::state::AppState;

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let service = state.service.lock().await;
    Html(render_index(service.courses()))
}

pub async fn course_page(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    let service = state.service.lock().await;
    match service.course(id) {
        Some(course) => Html(render_course(course)).into_response(),
        None => Redirect::to("/").into_response(),
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>{}</title></head>\n<body>\n{}\n</body>\n</html>\n",
        escape(title),
        body
    )
}

fn render_index(courses: &[Course]) -> String {
    let mut body = String::from("<h1>Courses</h1>\n");
    if courses.is_empty() {
        body.push_str("<p>No courses yet.</p>\n");
    } else {
        body.push_str(
            "<table>\n<tr><th>Title</th><th>Instructor</th><th>Credits</th><th>Enrolled</th></tr>\n",
        );
        for course in courses {
            let _ = writeln!(
                body,
                "<tr><td><a href=\"/courses/{}\">{}</a></td><td>{}</td><td>{}</td><td>{}</td></tr>",
                course.id,
                escape(&course.title),
                escape(&course.instructor),
                course.credits,
                course.students.len()
            );
        }
        body.push_str("</table>\n");
    }
    page("Courses", &body)
}

fn render_course(course: &Course) -> String {
    let mut body = format!(
        "<h1>{}</h1>\n<p>{}</p>\n<p>Instructor: {} &middot; Credits: {}</p>\n",
        escape(&course.title),
        escape(&course.description),
        escape(&course.instructor),
        course.credits
    );
    body.push_str("<h2>Students</h2>\n");
    if course.students.is_empty() {
        body.push_str("<p>No students enrolled.</p>\n");
    } else {
        body.push_str("<table>\n<tr><th>ID</th><th>Name</th><th>Email</th><th>Grade</th></tr>\n");
        for student in &course.students {
            let _ = writeln!(
                body,
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                escape(&student.id),
                escape(&student.name),
                escape(&student.email),
                escape(student.grade.as_deref().unwrap_or("-"))
            );
        }
        body.push_str("</table>\n");
    }
    let _ = writeln!(body, "<p><a href=\"/\">Back to courses</a></p>");
    page(&course.title, &body)
}
