//! # structgen
//!
//! **structgen** writes the boilerplate Go makes you type by hand: constructors,
//! builders, getters, setters, `String()` and `Equals()`, driven by markers in a
//! struct's doc comment and by its field tags.
//!
//! ## Overview
//!
//! ```go
//! // Account is a user account.
//! // @Builder
//! // @Getter
//! type Account struct {
//!     Email string `builder:"must"`
//!     Note  string `getter:"ignore"`
//! }
//! ```
//!
//! Running `structgen generate` over the package writes `account_generated.go`
//! beside `account.go` with an `AccountBuilder` whose `WithEmail` panics on an
//! empty address, and a single `GetEmail` accessor. The artifact is passed
//! through `goimports -w`; if the formatter rejects it the file is removed.
//!
//! ## Architecture
//!
//! - **[`source`]** - scans Go files into package, imports and struct declarations
//! - **[`generator`]** - directive extraction, field selection, templates, imports and emission
//! - **[`config`]** - `structgen.toml`, environment and flag layering
//! - **[`error`]** - error taxonomy for discovery, parsing, rendering and emission
//! - **[`logging`]** - `tracing` subscriber setup
//! - **[`cli`]** - the `structgen` command line
//!
//! ### Generation Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant CLI as CLI<br/>(structgen)
//!     participant Gen as generator::Generator
//!     participant Src as source::parse_source
//!     participant Tpl as generator::templates
//!     participant FS as File System
//!     participant Fmt as Formatter
//!
//!     CLI->>Gen: run(root)
//!     Gen->>FS: walk *.go (sorted)
//!     loop every source file
//!         Gen->>Src: parse_source(text)
//!         Src-->>Gen: SourceFile
//!         Gen->>Tpl: render_directive(...) per directive
//!         Tpl-->>Gen: fragments
//!         Gen->>FS: write <stem>_generated.go
//!         Gen->>Fmt: goimports -w
//!         alt formatter fails
//!             Gen->>FS: remove artifact
//!         end
//!     end
//!     Gen-->>CLI: RunSummary
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod generator;
pub mod logging;
pub mod source;

pub use config::GeneratorConfig;
pub use error::{DiscoveryError, EmitError, FileError, ParseError, RenderError};
pub use generator::{Generator, RunSummary};
