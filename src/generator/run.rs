use serde::Serialize;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use super::directive::{extract_directives, Directive};
use super::emit::{artifact_path, Artifact, EmitOutcome, Emitter, Formatter};
use super::imports::ImportSet;
use super::naming::TypeShape;
use super::select::{select_fields, SelectedField};
use super::templates::{render_directive, RenderInput};
use crate::config::GeneratorConfig;
use crate::error::{DiscoveryError, FileError, RenderError};
use crate::source::{parse_source, Declaration, SourceFile};

/// Fragments and imports produced for one parsed file.
#[derive(Debug, Default)]
pub struct GeneratedCode {
    pub imports: ImportSet,
    pub fragments: Vec<String>,
    /// Directives that failed to render; their fragments are missing
    pub failures: Vec<RenderError>,
}

/// One directive of a declaration with the fields it acts on.
#[derive(Debug, Clone, Serialize)]
pub struct DirectivePlan {
    pub directive: Directive,
    pub fields: Vec<SelectedField>,
}

/// An annotated declaration as the generator sees it.
#[derive(Debug, Clone, Serialize)]
pub struct DeclarationPlan {
    pub name: String,
    pub line: usize,
    pub directives: Vec<DirectivePlan>,
}

/// Annotated declarations of one file, or why it could not be read.
#[derive(Debug, Clone, Serialize)]
pub struct FilePlan {
    pub path: PathBuf,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub declarations: Vec<DeclarationPlan>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Result of processing a single file.
#[derive(Debug, PartialEq, Eq)]
pub enum FileOutcome {
    /// No declaration requested anything
    Unannotated,
    /// No declaration requested anything; the artifact of an earlier run was deleted
    StaleRemoved(PathBuf),
    Emitted(EmitOutcome),
}

/// A file that was skipped, with the reason.
#[derive(Debug)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub error: FileError,
}

/// What a run did.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub files_scanned: usize,
    /// Artifacts written to disk
    pub written: Vec<PathBuf>,
    /// Dry run: artifacts rendered but not written
    pub rendered: Vec<(PathBuf, String)>,
    /// Artifacts of earlier runs whose origin no longer asks for anything
    pub removed: Vec<PathBuf>,
    pub skipped: Vec<SkippedFile>,
    /// Directives dropped because they failed to render
    pub render_failures: usize,
}

impl RunSummary {
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty() && self.render_failures == 0
    }
}

/// Drives discovery, parsing, rendering and emission over a source tree.
#[derive(Debug, Clone)]
pub struct Generator {
    config: GeneratorConfig,
    emitter: Emitter,
}

impl Generator {
    /// Build a generator whose formatter comes from `config`.
    pub fn new(config: GeneratorConfig, dry_run: bool) -> Self {
        let formatter = Formatter::from_argv(&config.formatter, config.formatter_timeout());
        Generator {
            emitter: Emitter::new(formatter, dry_run),
            config,
        }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// List source files under `root` in sorted order.
    ///
    /// Skips previously generated artifacts and excluded or hidden
    /// directories. Any walk error is fatal.
    pub fn discover(&self, root: &Path) -> Result<Vec<PathBuf>, DiscoveryError> {
        let artifact_ending = format!("{}.{}", self.config.suffix, self.config.extension);
        let mut files = Vec::new();
        let walker = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !self.is_excluded_dir(entry));
        for entry in walker {
            let entry = entry.map_err(|err| DiscoveryError::Walk {
                path: err.path().map(Path::to_path_buf),
                message: err.to_string(),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            let matches_ext = path
                .extension()
                .is_some_and(|ext| ext.to_string_lossy() == self.config.extension);
            let is_artifact = entry.file_name().to_string_lossy().ends_with(&artifact_ending);
            if matches_ext && !is_artifact {
                files.push(path.to_path_buf());
            }
        }
        Ok(files)
    }

    fn is_excluded_dir(&self, entry: &DirEntry) -> bool {
        if !entry.file_type().is_dir() {
            return false;
        }
        let name = entry.file_name().to_string_lossy();
        name.starts_with('.')
            || name.starts_with('_')
            || self.config.exclude_dirs.iter().any(|d| *d == name)
    }

    /// Process every source file under `root`.
    ///
    /// Per-file failures are logged and collected in the summary; only a
    /// discovery failure ends the run early.
    pub fn run(&self, root: &Path) -> Result<RunSummary, DiscoveryError> {
        tracing::info!(root = %root.display(), dry_run = self.emitter.dry_run, "starting generation");
        let mut summary = RunSummary::default();
        for path in self.discover(root)? {
            summary.files_scanned += 1;
            let source = read_source(&path)?;
            match self.process_source(&path, &source) {
                Ok((outcome, failures)) => {
                    summary.render_failures += failures;
                    match outcome {
                        FileOutcome::Unannotated => {
                            tracing::debug!(file = %path.display(), "no directives");
                        }
                        FileOutcome::StaleRemoved(artifact) => {
                            println!("🧹 Removed stale {}", artifact.display());
                            summary.removed.push(artifact);
                        }
                        FileOutcome::Emitted(EmitOutcome::Written(artifact)) => {
                            println!("✅ Generated {}", artifact.display());
                            summary.written.push(artifact);
                        }
                        FileOutcome::Emitted(EmitOutcome::Rendered { path, contents }) => {
                            summary.rendered.push((path, contents));
                        }
                    }
                }
                Err(error) => {
                    tracing::error!(file = %path.display(), error = %error, "skipping file");
                    summary.skipped.push(SkippedFile { path, error });
                }
            }
        }
        tracing::info!(
            files = summary.files_scanned,
            written = summary.written.len(),
            removed = summary.removed.len(),
            skipped = summary.skipped.len(),
            render_failures = summary.render_failures,
            "generation finished"
        );
        Ok(summary)
    }

    /// Parse, render and emit one file whose contents are already loaded.
    ///
    /// Returns the outcome plus the number of directives that failed to render.
    /// A file that requests nothing has any artifact of an earlier run removed.
    pub fn process_source(
        &self,
        path: &Path,
        source: &str,
    ) -> Result<(FileOutcome, usize), FileError> {
        let file = parse_source(source)?;
        let generated = generate_code(&file, path);
        let failures = generated.failures.len();
        let target = artifact_path(path, &self.config.suffix);
        if generated.fragments.is_empty() {
            let outcome = if failures == 0 && self.emitter.remove_stale(&target)? {
                FileOutcome::StaleRemoved(target)
            } else {
                FileOutcome::Unannotated
            };
            return Ok((outcome, failures));
        }
        let artifact = Artifact {
            origin: path.to_path_buf(),
            path: target,
            package: file.package,
            imports: generated.imports,
            fragments: generated.fragments,
        };
        let outcome = self.emitter.emit(&artifact)?;
        Ok((FileOutcome::Emitted(outcome), failures))
    }

    /// Describe what would be generated under `root` without rendering.
    pub fn inspect(&self, root: &Path) -> Result<Vec<FilePlan>, DiscoveryError> {
        let mut plans = Vec::new();
        for path in self.discover(root)? {
            let source = read_source(&path)?;
            let plan = match parse_source(&source) {
                Ok(file) => {
                    let declarations = plan_declarations(&file);
                    if declarations.is_empty() {
                        continue;
                    }
                    FilePlan {
                        path,
                        declarations,
                        error: None,
                    }
                }
                Err(err) => FilePlan {
                    path,
                    declarations: Vec::new(),
                    error: Some(err.to_string()),
                },
            };
            plans.push(plan);
        }
        Ok(plans)
    }
}

/// Read a source file; invalid UTF-8 is decoded lossily.
fn read_source(path: &Path) -> Result<String, DiscoveryError> {
    let bytes = std::fs::read(path).map_err(|source| DiscoveryError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(String::from_utf8(bytes).unwrap_or_else(|err| {
        tracing::warn!(file = %path.display(), "source is not valid UTF-8, decoding lossily");
        String::from_utf8_lossy(err.as_bytes()).into_owned()
    }))
}

/// Selected fields for every directive of every annotated declaration.
pub fn plan_declarations(file: &SourceFile) -> Vec<DeclarationPlan> {
    let imports = ImportSet::from_source(file);
    file.declarations
        .iter()
        .filter_map(|decl| {
            let directives = extract_directives(&decl.doc);
            if directives.is_empty() {
                return None;
            }
            let shape = TypeShape::of(decl);
            let reserved = shape.reserved(decl, &imports);
            Some(DeclarationPlan {
                name: decl.name.clone(),
                line: decl.line,
                directives: directives
                    .into_iter()
                    .map(|directive| DirectivePlan {
                        directive,
                        fields: select_fields(&decl.fields, directive.kind, &reserved),
                    })
                    .collect(),
            })
        })
        .collect()
}

/// Render every directive of every declaration in `file`.
///
/// Fragments are ordered by declaration, then by directive. A directive that
/// fails to render is logged and left out; the rest still render.
pub fn generate_code(file: &SourceFile, path: &Path) -> GeneratedCode {
    let origin_imports = ImportSet::from_source(file);
    let mut code = GeneratedCode {
        imports: origin_imports.clone(),
        ..GeneratedCode::default()
    };
    for decl in &file.declarations {
        let directives = extract_directives(&decl.doc);
        if directives.is_empty() {
            continue;
        }
        warn_default_collisions(path, decl, &directives);
        let shape = TypeShape::of(decl);
        let reserved = shape.reserved(decl, &origin_imports);
        for directive in directives {
            let fields = select_fields(&decl.fields, directive.kind, &reserved);
            let input = RenderInput {
                shape: &shape,
                directive,
                fields: &fields,
            };
            match render_directive(&input) {
                Ok(fragment) => {
                    tracing::debug!(
                        file = %path.display(),
                        declaration = %decl.name,
                        directive = %directive.kind,
                        fields = fields.len(),
                        "rendered"
                    );
                    code.imports.require(directive.kind);
                    code.fragments.push(fragment);
                }
                Err(err) => {
                    tracing::error!(
                        file = %path.display(),
                        declaration = %decl.name,
                        directive = %directive.kind,
                        error = %err,
                        "skipping directive"
                    );
                    code.failures.push(err);
                }
            }
        }
    }
    code
}

/// Two `.Default` constructors on one type produce the same `New<Type>` name.
fn warn_default_collisions(path: &Path, decl: &Declaration, directives: &[Directive]) {
    let defaults: Vec<String> = directives
        .iter()
        .filter(|d| d.default_naming)
        .map(|d| d.kind.to_string())
        .collect();
    if defaults.len() > 1 {
        tracing::warn!(
            file = %path.display(),
            declaration = %decl.name,
            constructor = %format!("New{}", decl.name),
            directives = %defaults.join(", "),
            "several .Default constructors share one name"
        );
    }
}
