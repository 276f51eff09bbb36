use std::sync::Arc;

use tokio::sync::Mutex;

use crate::services::CourseService;

/// Shared handler state. The single mutex serializes every request's whole
/// read-modify-persist cycle; the service itself has no interior locking.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<Mutex<CourseService>>,
}
