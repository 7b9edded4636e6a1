//! # Generator Module
//!
//! Turns annotated Go struct declarations into companion source files.
//!
//! ## Overview
//!
//! A struct asks for generated code through markers in its doc comment:
//!
//! ```go
//! // Person is a person.
//! // @RequiredArgsConstructor
//! // @Getter
//! type Person struct {
//!     Name string
//!     Age  int `validate:"required"`
//! }
//! ```
//!
//! For every origin file with at least one such declaration, one artifact
//! `<stem>_generated.go` is written beside it.
//!
//! ## Pipeline
//!
//! ```text
//! walk → parse → extract directives → select fields → render → aggregate imports → emit
//! ```
//!
//! 1. **Directive extraction** ([`extract_directives`]) - markers found in doc lines
//! 2. **Field selection** ([`select_fields`]) - per-kind, tag-driven filtering
//! 3. **Rendering** ([`render_directive`]) - one Askama template per kind
//! 4. **Import aggregation** ([`ImportSet`]) - origin imports plus `reflect` / `fmt`
//! 5. **Emission** ([`Emitter`]) - write, run the formatter, remove the file on failure
//!
//! [`Generator`] drives the pipeline over a source tree and reports a
//! [`RunSummary`].
//!
//! ## Directives
//!
//! | Marker | Generates |
//! |---|---|
//! | `@AllArgsConstructor` | `New<T>WithAllArgs(...)` |
//! | `@RequiredArgsConstructor` | `New<T>WithRequiredArgs(...)` over `validate:"required"` fields |
//! | `@NoArgsConstructor` | `New<T>WithNoArgs()` |
//! | `@Builder` | `<T>Builder` with `With<Field>` setters, `Build()` and `New<T>Builder()` |
//! | `@ToString` | `String() string` |
//! | `@Equals` | `Equals(other T) bool` |
//! | `@Getter` / `@Setter` | `Get<Field>()` / `Set<Field>(v)` |
//!
//! Adding `.Default` to a constructor marker names the constructor `New<T>`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use structgen::config::GeneratorConfig;
//! use structgen::generator::Generator;
//!
//! # fn main() -> anyhow::Result<()> {
//! let generator = Generator::new(GeneratorConfig::default(), false);
//! let summary = generator.run(std::path::Path::new("./internal/model"))?;
//! println!("{} artifacts written", summary.written.len());
//! # Ok(())
//! # }
//! ```

mod directive;
mod emit;
mod imports;
mod naming;
mod run;
mod select;
mod templates;

pub use directive::{extract_directives, Directive, DirectiveKind, DEFAULT_MARKER};
pub use emit::{artifact_path, Artifact, EmitOutcome, Emitter, Formatter, GENERATED_HEADER};
pub use imports::{synthetic_imports, ImportSet};
pub use naming::{lower_camel, param_name, receiver_name, type_qualifiers, TypeShape};
pub use run::{
    generate_code, plan_declarations, DeclarationPlan, DirectivePlan, FileOutcome, FilePlan,
    GeneratedCode, Generator, RunSummary, SkippedFile,
};
pub use select::{select_fields, SelectedField};
pub use templates::{constructor_name, render_directive, renderer, RenderFn, RenderInput};
