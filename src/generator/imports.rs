use super::directive::DirectiveKind;
use crate::source::{ImportReference, SourceFile};

/// Package paths generated code needs for a directive, beyond the origin's imports.
pub fn synthetic_imports(kind: DirectiveKind) -> &'static [&'static str] {
    match kind {
        DirectiveKind::Builder | DirectiveKind::Equals => &["reflect"],
        DirectiveKind::ToString => &["fmt"],
        _ => &[],
    }
}

/// Insertion-ordered import set keyed by path.
///
/// The first alias seen for a path wins; later references to the same path
/// are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSet {
    imports: Vec<ImportReference>,
}

impl ImportSet {
    pub fn new() -> Self {
        ImportSet::default()
    }

    /// Seed the set with every import of the origin file.
    pub fn from_source(file: &SourceFile) -> Self {
        let mut set = ImportSet::new();
        for import in &file.imports {
            set.insert(import.clone());
        }
        set
    }

    /// Add `import` unless its path is already present. Returns whether it was added.
    pub fn insert(&mut self, import: ImportReference) -> bool {
        if self.contains_path(&import.path) {
            return false;
        }
        self.imports.push(import);
        true
    }

    /// Add the synthetic references `kind` requires.
    pub fn require(&mut self, kind: DirectiveKind) {
        for path in synthetic_imports(kind) {
            if self.insert(ImportReference::new(*path)) {
                tracing::trace!(path, directive = %kind, "added synthetic import");
            }
        }
    }

    pub fn contains_path(&self, path: &str) -> bool {
        self.imports.iter().any(|i| i.path == path)
    }

    /// Package names the imports bind in the file.
    pub fn package_names(&self) -> impl Iterator<Item = &str> {
        self.imports.iter().filter_map(ImportReference::package_name)
    }

    /// Import block lines in insertion order.
    pub fn lines(&self) -> Vec<String> {
        self.imports.iter().map(ImportReference::to_go).collect()
    }
}
