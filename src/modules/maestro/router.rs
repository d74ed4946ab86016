use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{get_estudiantes, post_progreso};

pub fn init_maestro_router() -> Router<AppState> {
    Router::new()
        .route("/estudiantes", get(get_estudiantes))
        .route("/progreso", post(post_progreso))
}
