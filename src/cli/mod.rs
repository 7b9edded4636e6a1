//! # CLI Module
//!
//! Command-line interface for the `structgen` binary.
//!
//! ## Commands
//!
//! ### `generate`
//!
//! Write a `<stem>_generated.go` beside every Go file that has annotated
//! structs:
//!
//! ```bash
//! structgen generate ./internal/model
//! ```
//!
//! Options:
//! - `--config <FILE>` - settings file (default: `structgen.toml` in ROOT, if present)
//! - `--suffix <S>` - artifact suffix (default: `_generated`)
//! - `--formatter <CMD>` - formatter command (default: `goimports -w`)
//! - `--no-format` - skip the formatter
//! - `--formatter-timeout <SECS>` - kill a hung formatter
//! - `--dry-run` - print artifacts instead of writing them
//!
//! ### `inspect`
//!
//! Show which declarations carry directives and which fields each directive
//! selects, without generating anything:
//!
//! ```bash
//! structgen inspect ./internal/model --json
//! ```
//!
//! ## Usage from Code
//!
//! ```rust,ignore
//! use clap::Parser;
//! use structgen::cli::{run_cli, Cli};
//!
//! run_cli(Cli::parse())?;
//! ```

mod commands;


pub use commands::{format_plans, run_cli, Cli, Commands, ConfigOverrides};
