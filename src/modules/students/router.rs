use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::get_dashboard_data;

pub fn init_students_router() -> Router<AppState> {
    Router::new().route("/dashboardData", get(get_dashboard_data))
}
