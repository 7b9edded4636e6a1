use askama::Template;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use super::imports::ImportSet;
use super::templates::ArtifactTemplate;
use crate::error::EmitError;

/// First line of every artifact. Only files that start with it are ever
/// removed.
pub const GENERATED_HEADER: &str = "// Code generated by structgen. DO NOT EDIT.";

/// Everything generated for one origin file.
#[derive(Debug, Clone)]
pub struct Artifact {
    /// Source file the fragments were generated from
    pub origin: PathBuf,
    /// Where the artifact is written
    pub path: PathBuf,
    pub package: String,
    pub imports: ImportSet,
    /// Rendered fragments in declaration order, then directive order
    pub fragments: Vec<String>,
}

impl Artifact {
    /// Render the full file contents.
    pub fn render(&self) -> Result<String, EmitError> {
        let origin = self
            .origin
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mut text = ArtifactTemplate {
            origin: &origin,
            package: &self.package,
            imports: self.imports.lines(),
            fragments: &self.fragments,
        }
        .render()
        .map_err(EmitError::Render)?;
        text.truncate(text.trim_end().len());
        text.push('\n');
        Ok(text)
    }
}

/// `<dir>/<stem><suffix>.<ext>` beside `origin`, keeping the origin's extension.
pub fn artifact_path(origin: &Path, suffix: &str) -> PathBuf {
    let stem = origin
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match origin.extension() {
        Some(ext) => format!("{stem}{suffix}.{}", ext.to_string_lossy()),
        None => format!("{stem}{suffix}"),
    };
    origin.with_file_name(name)
}

/// External formatter invoked as `<program> <args..> <artifact>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formatter {
    pub program: String,
    pub args: Vec<String>,
    pub timeout: Option<Duration>,
}

impl Formatter {
    /// Build from an argv list; an empty list means no formatter.
    pub fn from_argv(argv: &[String], timeout: Option<Duration>) -> Option<Self> {
        let (program, args) = argv.split_first()?;
        Some(Formatter {
            program: program.clone(),
            args: args.to_vec(),
            timeout,
        })
    }

    /// Run the formatter over `path`, failing on a non-zero exit or timeout.
    pub fn run(&self, path: &Path) -> Result<(), EmitError> {
        let spawn_err = |source| EmitError::FormatterSpawn {
            program: self.program.clone(),
            source,
        };
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(spawn_err)?;

        // drain stderr off-thread so a chatty formatter cannot block on a full pipe
        let stderr = child.stderr.take();
        let reader = thread::spawn(move || {
            let mut buf = String::new();
            if let Some(mut stderr) = stderr {
                let _ = stderr.read_to_string(&mut buf);
            }
            buf
        });

        let status = match self.timeout {
            None => child.wait().map_err(spawn_err)?,
            Some(limit) => {
                let started = Instant::now();
                loop {
                    if let Some(status) = child.try_wait().map_err(spawn_err)? {
                        break status;
                    }
                    if started.elapsed() >= limit {
                        let _ = child.kill();
                        let _ = child.wait();
                        return Err(EmitError::FormatterTimeout {
                            program: self.program.clone(),
                            seconds: limit.as_secs(),
                        });
                    }
                    thread::sleep(Duration::from_millis(20));
                }
            }
        };
        let stderr = reader.join().unwrap_or_default();

        if status.success() {
            Ok(())
        } else {
            Err(EmitError::FormatterFailed {
                program: self.program.clone(),
                code: status.code(),
                stderr,
            })
        }
    }
}

/// Removes the artifact on drop unless [`ArtifactGuard::commit`] was called.
struct ArtifactGuard<'a> {
    path: &'a Path,
    committed: bool,
}

impl<'a> ArtifactGuard<'a> {
    fn new(path: &'a Path) -> Self {
        ArtifactGuard {
            path,
            committed: false,
        }
    }

    fn commit(mut self) {
        self.committed = true;
    }
}

impl Drop for ArtifactGuard<'_> {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        match fs::remove_file(self.path) {
            Ok(()) => tracing::debug!(path = %self.path.display(), "removed rejected artifact"),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => tracing::warn!(
                path = %self.path.display(),
                error = %err,
                "failed to remove rejected artifact"
            ),
        }
    }
}

/// What happened to an artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmitOutcome {
    /// Written (and formatted, when a formatter is configured)
    Written(PathBuf),
    /// Dry run: rendered but not written
    Rendered { path: PathBuf, contents: String },
}

/// Writes artifacts and runs the formatter over them.
#[derive(Debug, Clone, Default)]
pub struct Emitter {
    pub formatter: Option<Formatter>,
    pub dry_run: bool,
}

impl Emitter {
    pub fn new(formatter: Option<Formatter>, dry_run: bool) -> Self {
        Emitter { formatter, dry_run }
    }

    /// Write `artifact` to its final path and format it in place.
    ///
    /// A formatter failure removes the artifact before the error is returned,
    /// so a rejected artifact never stays on disk.
    pub fn emit(&self, artifact: &Artifact) -> Result<EmitOutcome, EmitError> {
        let contents = artifact.render()?;
        if self.dry_run {
            return Ok(EmitOutcome::Rendered {
                path: artifact.path.clone(),
                contents,
            });
        }

        let guard = ArtifactGuard::new(&artifact.path);
        fs::write(&artifact.path, contents).map_err(|source| EmitError::Write {
            path: artifact.path.clone(),
            source,
        })?;
        if let Some(formatter) = &self.formatter {
            formatter.run(&artifact.path)?;
        }
        guard.commit();
        Ok(EmitOutcome::Written(artifact.path.clone()))
    }

    /// Remove an artifact an earlier run left at `path`.
    ///
    /// Files not starting with [`GENERATED_HEADER`] are left alone. Returns
    /// whether a file was removed; a dry run never removes.
    pub fn remove_stale(&self, path: &Path) -> Result<bool, EmitError> {
        let remove_err = |source| EmitError::Remove {
            path: path.to_path_buf(),
            source,
        };
        let contents = match fs::read(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(false),
            Err(err) => return Err(remove_err(err)),
        };
        let first_line = contents.split(|b| *b == b'\n').next().unwrap_or_default();
        if first_line.strip_suffix(b"\r").unwrap_or(first_line) != GENERATED_HEADER.as_bytes() {
            tracing::warn!(path = %path.display(), "not removing file without generated header");
            return Ok(false);
        }
        if self.dry_run {
            tracing::info!(path = %path.display(), "would remove stale artifact");
            return Ok(false);
        }
        fs::remove_file(path).map_err(remove_err)?;
        tracing::info!(path = %path.display(), "removed stale artifact");
        Ok(true)
    }
}
