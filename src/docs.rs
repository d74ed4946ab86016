use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::modules::auth::controller::ErrorResponse;
use crate::modules::auth::model::{
    LoginRequest, ProfileResponse, RegisterRequest, RegisterResponse, StatusResponse,
};
use crate::modules::maestro::model::{EstudianteProgreso, ProgresoDto};
use crate::modules::students::model::{DashboardData, HumidityPoint, Plant};
use crate::modules::users::model::{Role, UpdateUserDto, UsersResponse};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::register_user,
        crate::modules::auth::controller::login_user,
        crate::modules::auth::controller::logout_user,
        crate::modules::auth::controller::get_profile,
        crate::modules::users::controller::get_users,
        crate::modules::users::controller::update_user,
        crate::modules::maestro::controller::get_estudiantes,
        crate::modules::maestro::controller::post_progreso,
        crate::modules::students::controller::get_dashboard_data,
    ),
    components(
        schemas(
            Role,
            RegisterRequest,
            RegisterResponse,
            LoginRequest,
            StatusResponse,
            ProfileResponse,
            ErrorResponse,
            UpdateUserDto,
            UsersResponse,
            EstudianteProgreso,
            ProgresoDto,
            DashboardData,
            HumidityPoint,
            Plant,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Registration, login and session endpoints"),
        (name = "Users", description = "Admin user management"),
        (name = "Maestro", description = "Teacher progress tracking"),
        (name = "Students", description = "Student dashboard data"),
    ),
    info(
        title = "Brotes API",
        description = "Backend for the Brotes educational gardening platform",
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "session_cookie",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new("session"))),
            );
        }
    }
}
