//! # Spec Module
//!
//! Turns the authored project document into a routing table.
//!
//! ```text
//! raw endpoint records ─▶ normalize ─▶ Vec<CanonicalEndpoint> ─▶ build ─▶ RouteTable
//! ```
//!
//! - [`load_project`] reads the document the editor persists (`.json`, `.yaml`, `.yml`)
//! - [`normalize_endpoints`] applies defaults and picks the response policy, never failing
//! - [`build_route_table`] deduplicates by (method, path), last definition winning,
//!   and groups methods by path in first-seen order

mod build;
mod load;
mod normalize;
mod types;

pub use build::*;
pub use load::*;
pub use normalize::*;
pub use types::*;
