//! # Build Module
//!
//! Cross-compiles a session's project into a native mock server executable
//! with the Go toolchain bundled for the host.
//!
//! ## Flow
//!
//! ```text
//! host check → destination prompt → locate toolchain → probe (optional)
//!            → scratch workspace (mockbuild-*) → main.go + go.mod → go build -o <out> .
//! ```
//!
//! Hosts other than Windows and macOS are refused before anything touches the
//! disk. Every failure is reported as a [`BuildReport`] with `ok: false`;
//! [`CrossBuilder::build`] itself never returns an error.
//!
//! ## Toolchain environment
//!
//! | Variable      | Value                                |
//! |---------------|--------------------------------------|
//! | `GOROOT`      | `<resources>/go/<os>-<arch>`         |
//! | `GOPATH`      | `<data dir>/gopath`                  |
//! | `GOMODCACHE`  | `<data dir>/gopath/pkg/mod`          |
//! | `PATH`        | `GOROOT/bin` prepended               |
//! | `CGO_ENABLED` | `0`                                  |
//! | `GOOS`/`GOARCH` | the requested target               |
//! | `GOTOOLCHAIN` | `local`                              |

mod error;
mod platform;
mod process;
mod session;
mod toolchain;

pub use error::*;
pub use platform::*;
pub use process::*;
pub use session::*;
pub use toolchain::*;
