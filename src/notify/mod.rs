use tracing::info;

use crate::models::Course;

pub type SinkError = Box<dyn std::error::Error + Send + Sync>;

/// Mutation events fanned out to sinks. The string forms are the wire names
/// sinks are expected to log or forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CourseEvent {
    Created,
    Updated,
    Deleted,
    StudentEnrolled,
    StudentRemoved,
}

impl CourseEvent {
    pub fn as_str(self) -> &'static str {
        match self {
            CourseEvent::Created => "created",
            CourseEvent::Updated => "updated",
            CourseEvent::Deleted => "deleted",
            CourseEvent::StudentEnrolled => "student_enrolled",
            CourseEvent::StudentRemoved => "student_removed",
        }
    }
}

/// A listener invoked synchronously after each persisted mutation, in
/// registration order. A failing sink is logged and skipped; it never aborts
/// the mutation or the sinks after it.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, course: &Course, event: CourseEvent) -> Result<(), SinkError>;
}

/// Writes each event to the application log.
pub struct LogSink;

impl NotificationSink for LogSink {
    fn notify(&self, course: &Course, event: CourseEvent) -> Result<(), SinkError> {
        info!(target: "courseboard::log", "course '{}' - event: {}", course.title, event.as_str());
        Ok(())
    }
}

/// Stand-in for an outbound mail notifier; logs where a real one would send.
pub struct EmailSink;

impl NotificationSink for EmailSink {
    fn notify(&self, course: &Course, event: CourseEvent) -> Result<(), SinkError> {
        info!(target: "courseboard::email", "course '{}' - event: {}", course.title, event.as_str());
        Ok(())
    }
}
