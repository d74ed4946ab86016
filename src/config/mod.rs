//! Configuration modules for the Brotes API.
//!
//! Each submodule handles one aspect of configuration, loaded from
//! environment variables at startup.
//!
//! # Modules
//!
//! - [`cors`]: CORS allow-list configuration
//! - [`credentials`]: Backing-service credential resolution
//! - [`identity`]: Identity service endpoint and backend selection
//! - [`rate_limit`]: Registration rate limiting configuration
//! - [`sensor`]: Humidity sensor document path
//! - [`session`]: Session cookie parameters
//! - [`store`]: Document store endpoint and backend selection

pub mod cors;
pub mod credentials;
pub mod identity;
pub mod rate_limit;
pub mod sensor;
pub mod session;
pub mod store;
