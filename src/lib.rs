//! # mocksmith
//!
//! **mocksmith** compiles authored HTTP endpoint definitions into a standalone
//! Go mock server and cross-builds it into a native executable with a bundled
//! Go toolchain.
//!
//! ## Architecture
//!
//! - **[`spec`]** - project document loading, endpoint normalization and the route table
//! - **[`generator`]** - response resolution and askama rendering of `main.go` / `go.mod`
//! - **[`build`]** - host checks, bundled toolchain, scratch workspace and `go build`
//! - **[`config`]** - builder settings from `mocksmith.toml` and the environment
//! - **[`logging`]** - `tracing` subscriber setup for the binary
//! - **[`cli`]** - the `mocksmith` command line
//!
//! ### Compile flow
//!
//! ```text
//! endpoints ─▶ normalize ─▶ route table ─▶ resolve ─▶ main.go + go.mod ─▶ go build ─▶ executable
//! ```
//!
//! ## Example
//!
//! ```rust
//! use mocksmith::generator::synthesize;
//! use mocksmith::spec::compile_route_table;
//! use serde_json::json;
//!
//! let table = compile_route_table(&[
//!     json!({"method": "get", "path": "/health", "responseBody": {"status": "ok"}}),
//! ]);
//! let program = synthesize(&table, "Health").unwrap();
//! assert!(program.main_go.contains("package main"));
//! assert_eq!(program.go_mod, "module local/generated\n\ngo 1.22\n");
//! ```

pub mod build;
pub mod cli;
pub mod config;
pub mod generator;
pub mod logging;
pub mod spec;
