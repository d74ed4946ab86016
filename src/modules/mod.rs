pub mod auth;
pub mod maestro;
pub mod students;
pub mod users;

pub use self::users::model::Role;
