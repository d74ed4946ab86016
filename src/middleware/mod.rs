//! Middleware for request processing.
//!
//! - [`auth`]: session cookie verification and the `SessionUser` extractor
//! - [`role`]: role-based authorization with document fallback
//!
//! # Authentication flow
//!
//! 1. Client sends a request carrying the `session` cookie
//! 2. The [`auth::SessionUser`] extractor verifies the cookie with the
//!    identity service (revocation-checking) and exposes the claims
//! 3. Role layers ([`role::require_admin`] and friends) check the role claim,
//!    falling back to one UserProfile document read when the claim is absent
//!    or insufficient
//! 4. The handler runs with the (possibly backfilled) identity in the request
//!    context

pub mod auth;
pub mod role;
