//! # Brotes API
//!
//! REST backend for the Brotes educational gardening platform: students
//! follow plant-care dashboards with humidity readings, teachers track
//! student progress, admins manage accounts.
//!
//! The backend is a thin layer over two external services — an identity
//! provider and a document database — reached exclusively through the
//! adapter traits in [`services`]. The substantial part is the session
//! subsystem: cookie verification, role authorization with a document
//! fallback, and the per-email login throttle.
//!
//! ## Architecture
//!
//! ```text
//! src/
//! ├── cli/          # Maintenance commands (create-admin, repair-profiles)
//! ├── config/       # Environment configuration and credential loading
//! ├── middleware/   # Session verification and role authorization
//! ├── modules/      # Feature modules
//! │   ├── auth/     # Register, login (+ throttle), logout, profile
//! │   ├── users/    # Admin user management
//! │   ├── maestro/  # Teacher progress tracking
//! │   └── students/ # Student dashboard data
//! ├── services/     # Identity service and document store adapters
//! └── utils/        # Errors, password rules
//! ```
//!
//! Each feature module follows the same structure: `controller.rs` (HTTP
//! handlers), `service.rs` (logic), `model.rs` (DTOs), `router.rs`.
//!
//! ## Roles
//!
//! | Role | Access |
//! |------|--------|
//! | `admin` | User management |
//! | `maestro` | Student progress listing and updates |
//! | `estudiante` | Own dashboard data |
//!
//! The role lives both as a custom claim on the session token and as a field
//! on the UserProfile document; authorization checks the claim first and
//! falls back to one document read, failing closed on store errors.
//!
//! ## Sessions
//!
//! Login sets an http-only `session` cookie with a fixed five-day lifetime
//! (`SameSite=Lax`, `Secure` on production deployments). Logout only clears
//! the cookie — sessions are not revoked server-side, so a captured cookie
//! stays valid until expiry. Five failed logins within five minutes lock an
//! email out for five minutes, measured from the most recent failure.
//!
//! ## Environment
//!
//! ```bash
//! PORT=3000
//! ADMIN_SECRET=shared-secret-for-admin-registration
//! ALLOW_CORS=true
//! PROD_ORIGIN=https://brotes.example.com
//! IDENTITY_BACKEND=http          # or: memory
//! STORE_BACKEND=firestore        # or: memory
//! IDENTITY_API_KEY=...
//! SERVICE_ACCOUNT_FILE=serviceAccountKey.json
//! ```
//!
//! With the server running, API documentation is served at `/swagger-ui`
//! and `/scalar`.

pub mod cli;
pub mod config;
pub mod docs;
pub mod logging;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod services;
pub mod state;
pub mod utils;
pub mod validator;
