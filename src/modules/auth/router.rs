use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_governor::GovernorLayer;

use crate::state::AppState;

use super::controller::{get_profile, login_user, logout_user, register_user};

pub fn init_auth_router(state: &AppState) -> Router<AppState> {
    let register_governor = Arc::new(state.rate_limit_config.register_governor_config());

    Router::new()
        .route(
            "/register",
            post(register_user).route_layer(GovernorLayer::new(register_governor)),
        )
        .route("/login", post(login_user))
        .route("/logout", post(logout_user))
        .route("/profile", get(get_profile))
}
