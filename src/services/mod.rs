//! Adapters for the backing services.
//!
//! The application never talks to the identity provider or the document
//! database directly; it goes through the [`identity::IdentityService`] and
//! [`store::DocumentStore`] traits, constructed once at startup and injected
//! through [`crate::state::AppState`]. Each trait has an HTTP implementation
//! for real deployments and an in-process implementation for development and
//! tests.

pub mod identity;
pub mod store;
