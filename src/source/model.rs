use serde::Serialize;

use super::tag::StructTag;

/// One import spec of a Go source file.
///
/// The alias is kept verbatim, including the blank (`_`) and dot (`.`) forms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportReference {
    /// Explicit package name, if the spec carried one
    pub alias: Option<String>,
    /// Import path without quotes
    pub path: String,
}

impl ImportReference {
    /// Bare import of `path`
    pub fn new(path: impl Into<String>) -> Self {
        ImportReference {
            alias: None,
            path: path.into(),
        }
    }

    /// Aliased import of `path`
    pub fn aliased(alias: impl Into<String>, path: impl Into<String>) -> Self {
        ImportReference {
            alias: Some(alias.into()),
            path: path.into(),
        }
    }

    /// Name the package is referenced by in the importing file.
    ///
    /// The alias when given, otherwise the last path element with a major
    /// version element (`/v2`) or suffix (`yaml.v3`) skipped. Blank and dot
    /// imports bind no name.
    pub fn package_name(&self) -> Option<&str> {
        if let Some(alias) = &self.alias {
            return (alias != "_" && alias != ".").then_some(alias.as_str());
        }
        let mut segments = self.path.rsplit('/');
        let mut last = segments.next()?;
        if is_major_version(last) {
            last = segments.next()?;
        }
        let name = match last.rsplit_once('.') {
            Some((stem, version)) if is_major_version(version) => stem,
            _ => last,
        };
        (!name.is_empty()).then_some(name)
    }

    /// Render as a line of a Go import block: `alias "path"` or `"path"`.
    pub fn to_go(&self) -> String {
        match &self.alias {
            Some(alias) => format!("{alias} \"{}\"", self.path),
            None => format!("\"{}\"", self.path),
        }
    }
}

fn is_major_version(segment: &str) -> bool {
    segment
        .strip_prefix('v')
        .is_some_and(|n| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()))
}

/// One member of a struct declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    /// Field name; for embedded fields the embedded type name
    pub name: String,
    /// Type signature as written in the source, whitespace-normalised
    pub ty: String,
    /// Raw struct tag metadata
    pub tag: StructTag,
    /// True when the field has no explicit name
    pub embedded: bool,
}

impl Field {
    /// True when the field's type can be compared against `nil`: pointers,
    /// slices, maps, channels and functions.
    ///
    /// Arrays and struct literals holding pointers (`[4]*T`) do not count.
    pub fn is_nilable(&self) -> bool {
        let ty = self.ty.as_str();
        ty.starts_with('*')
            || ty.starts_with("[]")
            || ty.starts_with("map[")
            || ty.starts_with("chan")
            || ty.starts_with("<-chan")
            || ty.starts_with("func")
    }
}

/// A top-level struct type declaration with its attached documentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Declaration {
    /// Type name
    pub name: String,
    /// Type parameter list without brackets (`K comparable, V any`); empty for non-generic types
    pub type_params: String,
    /// Fields in declaration order
    pub fields: Vec<Field>,
    /// Doc comment lines, one entry per source line, comment markers included
    pub doc: Vec<String>,
    /// 1-based line of the type name
    pub line: usize,
}

/// Everything the generator needs from one Go source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceFile {
    /// Package clause name
    pub package: String,
    /// Imports in source order, as written
    pub imports: Vec<ImportReference>,
    /// Top-level struct declarations in source order
    pub declarations: Vec<Declaration>,
}
