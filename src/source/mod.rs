//! # Source Module
//!
//! Declaration-level scanner for Go source files.
//!
//! The generator only needs a narrow slice of a Go file: the package clause,
//! the imports, and every top-level `struct` type together with its doc
//! comment, its fields and their raw struct tags. This module extracts exactly
//! that into a [`SourceFile`] without building a full syntax tree.
//!
//! ```rust
//! use structgen::source::parse_source;
//!
//! let file = parse_source(
//!     "package model\n\n// @Getter\ntype Person struct {\n\tName string `getter:\"ignore\"`\n}\n",
//! )
//! .unwrap();
//! assert_eq!(file.package, "model");
//! assert_eq!(file.declarations[0].name, "Person");
//! assert_eq!(file.declarations[0].doc, vec!["// @Getter".to_string()]);
//! ```
//!
//! Anything that is not a struct (interfaces, aliases, named basic types,
//! function types) is skipped, as are types declared inside function bodies.

mod lexer;
mod model;
mod parser;
mod tag;


pub use lexer::is_go_keyword;
pub use model::{Declaration, Field, ImportReference, SourceFile};
pub use parser::parse_source;
pub use tag::StructTag;
