use std::fmt;

use serde::Serialize;

/// Modifier that drops the kind suffix from a constructor name.
pub const DEFAULT_MARKER: &str = ".Default";

/// The closed set of things a declaration can ask the generator for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum DirectiveKind {
    AllArgsConstructor,
    RequiredArgsConstructor,
    NoArgsConstructor,
    Builder,
    ToString,
    Equals,
    Getter,
    Setter,
}

impl DirectiveKind {
    /// Every kind, in the order markers are checked on a doc line.
    pub const ALL: [DirectiveKind; 8] = [
        DirectiveKind::AllArgsConstructor,
        DirectiveKind::RequiredArgsConstructor,
        DirectiveKind::NoArgsConstructor,
        DirectiveKind::Builder,
        DirectiveKind::ToString,
        DirectiveKind::Equals,
        DirectiveKind::Getter,
        DirectiveKind::Setter,
    ];

    /// Marker token recognised in doc comments.
    pub fn marker(self) -> &'static str {
        match self {
            DirectiveKind::AllArgsConstructor => "@AllArgsConstructor",
            DirectiveKind::RequiredArgsConstructor => "@RequiredArgsConstructor",
            DirectiveKind::NoArgsConstructor => "@NoArgsConstructor",
            DirectiveKind::Builder => "@Builder",
            DirectiveKind::ToString => "@ToString",
            DirectiveKind::Equals => "@Equals",
            DirectiveKind::Getter => "@Getter",
            DirectiveKind::Setter => "@Setter",
        }
    }

    /// Constructor kinds accept the `.Default` modifier.
    pub fn is_constructor(self) -> bool {
        matches!(
            self,
            DirectiveKind::AllArgsConstructor
                | DirectiveKind::RequiredArgsConstructor
                | DirectiveKind::NoArgsConstructor
        )
    }
}

impl fmt::Display for DirectiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.marker())
    }
}

/// One requested generation for a declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Directive {
    pub kind: DirectiveKind,
    /// `.Default` naming: the constructor is called `New<Type>`
    pub default_naming: bool,
}

impl Directive {
    pub fn new(kind: DirectiveKind) -> Self {
        Directive {
            kind,
            default_naming: false,
        }
    }

    pub fn with_default_naming(kind: DirectiveKind) -> Self {
        Directive {
            kind,
            default_naming: true,
        }
    }
}

/// Find the directives requested by a declaration's doc lines.
///
/// Matching is a case-sensitive substring test per line. The result is
/// ordered by line and, within a line, by [`DirectiveKind::ALL`]. A kind seen
/// twice keeps its first occurrence.
pub fn extract_directives<S: AsRef<str>>(doc: &[S]) -> Vec<Directive> {
    let mut found: Vec<Directive> = Vec::new();
    for line in doc {
        let line = line.as_ref();
        let default_naming = line.contains(DEFAULT_MARKER);
        for kind in DirectiveKind::ALL {
            if !line.contains(kind.marker()) {
                continue;
            }
            if found.iter().any(|d| d.kind == kind) {
                tracing::debug!(directive = %kind, "ignoring repeated directive");
                continue;
            }
            found.push(Directive {
                kind,
                default_naming: default_naming && kind.is_constructor(),
            });
        }
    }
    found
}
