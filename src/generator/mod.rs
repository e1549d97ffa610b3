//! # Generator Module
//!
//! Synthesizes a standalone Go HTTP mock server from a compiled [`RouteTable`](crate::spec::RouteTable).
//!
//! ## Architecture
//!
//! ```text
//! RouteTable → resolve → JSON table → go_string_literal → askama templates → main.go + go.mod
//! ```
//!
//! 1. **Resolve** - every endpoint is reduced to status, content type, headers,
//!    delay and body ([`resolve_table`])
//! 2. **Embed** - the resolved table is serialized to JSON and embedded as a Go
//!    string constant ([`go_string_literal`])
//! 3. **Render** - `templates/main.go.txt` and `templates/go.mod.txt` are rendered
//!    with askama
//!
//! The generated program only depends on the Go standard library.
//!
//! ## Generated server
//!
//! - listens on `--port`, else `PORT`, else [`DEFAULT_PORT`]
//! - `--cors` (default `true`) adds permissive CORS headers and answers
//!   `OPTIONS` with an empty 200
//! - unknown paths get the standard 404, known paths with an unregistered
//!   method get an empty 405
//!
//! ## Usage
//!
//! ```rust,ignore
//! use mocksmith::generator::synthesize;
//! use mocksmith::spec::compile_route_table;
//!
//! let table = compile_route_table(&project.endpoints);
//! let program = synthesize(&table, "Pets API")?;
//! program.write_to(Path::new("out"), false)?;
//! ```

mod literal;
mod project;
mod resolve;
mod templates;

pub use literal::*;
pub use project::*;
pub use resolve::*;
pub use templates::*;
