//! # CLI Module
//!
//! Command-line front end of the `mocksmith` binary.
//!
//! ## Commands
//!
//! ### `compile`
//!
//! Write the generated Go module for a project document:
//!
//! ```bash
//! mocksmith compile --project pets.json --out ./pets-mock [--force]
//! ```
//!
//! ### `inspect`
//!
//! Show the route table, including endpoints that were refused:
//!
//! ```bash
//! mocksmith inspect --project pets.yaml
//! ```
//!
//! ### `build`
//!
//! Cross-build a native executable with the bundled Go toolchain:
//!
//! ```bash
//! mocksmith build --project pets.json --output ./pets-mock.exe --os windows --arch amd64
//! mocksmith build --project pets.json --json
//! ```
//!
//! Without `--output` the destination is asked for on stdin. The exit status
//! is 1 when the build did not succeed.

mod commands;


pub use commands::{
    describe_table, destination_from_answer, execute, run_cli, Cli, Commands, StdinPrompt,
};
