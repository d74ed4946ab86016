use axum::{
    Router,
    routing::{get, put},
};

use crate::state::AppState;

use super::controller::{get_users, update_user};

pub fn init_users_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_users))
        .route("/{uid}", put(update_user))
}
