//! GitHub explorer backend
//!
//! - REST API endpoints in `endpoints/`
//! - Cross-origin policy and response headers in `layers`
//! - Reads PORTFOLIO_URL, GITHUB_TOKEN and PORT from the environment (see `config`)

pub mod config;
pub mod endpoints;
pub mod layers;
pub mod router;
