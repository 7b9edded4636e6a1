use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::config::{split_command, GeneratorConfig};
use crate::generator::{FilePlan, Generator, RunSummary};

/// Command-line interface for structgen
///
/// Generates constructors, builders, accessors, `String()` and `Equals()`
/// for Go structs annotated in their doc comments.
#[derive(Parser, Debug)]
#[command(name = "structgen", version)]
#[command(about = "Boilerplate generator for annotated Go structs", long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available structgen commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate `<stem>_generated.go` files for every annotated source file
    Generate {
        /// Directory (or single file) to scan
        #[arg(default_value = ".")]
        root: PathBuf,

        /// Path to a structgen.toml; auto-detected in ROOT when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Artifact suffix appended to the origin file stem
        #[arg(long)]
        suffix: Option<String>,

        /// Formatter command run on each artifact, e.g. "gofmt -w"
        #[arg(long, conflicts_with = "no_format")]
        formatter: Option<String>,

        /// Skip the formatter
        #[arg(long, default_value_t = false)]
        no_format: bool,

        /// Kill the formatter after this many seconds
        #[arg(long, value_name = "SECS")]
        formatter_timeout: Option<u64>,

        /// Print the artifacts instead of writing them
        #[arg(long, default_value_t = false)]
        dry_run: bool,
    },
    /// List annotated declarations, their directives and selected fields
    Inspect {
        /// Directory (or single file) to scan
        #[arg(default_value = ".")]
        root: PathBuf,

        /// Path to a structgen.toml; auto-detected in ROOT when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Emit JSON instead of text
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

impl Cli {
    /// Log level implied by `-v` flags, if any were given
    pub fn log_level(&self) -> Option<&'static str> {
        match self.verbose {
            0 => None,
            1 => Some("debug"),
            _ => Some("trace"),
        }
    }
}

/// Command-line overrides for [`GeneratorConfig`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub suffix: Option<String>,
    pub formatter: Option<String>,
    pub no_format: bool,
    pub formatter_timeout: Option<u64>,
}

impl ConfigOverrides {
    /// Apply the overrides on top of file and environment settings.
    pub fn apply(&self, config: &mut GeneratorConfig) -> anyhow::Result<()> {
        if let Some(suffix) = &self.suffix {
            config.suffix = suffix.clone();
        }
        if let Some(formatter) = &self.formatter {
            config.formatter = split_command(formatter);
        }
        if self.no_format {
            config.formatter.clear();
        }
        if let Some(seconds) = self.formatter_timeout {
            config.formatter_timeout_secs = Some(seconds);
        }
        config.validate()
    }
}

/// Run a parsed command line.
///
/// Only fatal problems (bad config, an unreadable tree) are returned as
/// errors; files skipped during generation are reported on stderr.
pub fn run_cli(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Generate {
            root,
            config,
            suffix,
            formatter,
            no_format,
            formatter_timeout,
            dry_run,
        } => {
            let mut settings = GeneratorConfig::resolve(config.as_deref(), &root)?;
            ConfigOverrides {
                suffix,
                formatter,
                no_format,
                formatter_timeout,
            }
            .apply(&mut settings)?;
            let summary = Generator::new(settings, dry_run)
                .run(&root)
                .with_context(|| format!("Failed to generate under {}", root.display()))?;
            print_summary(&summary);
            Ok(())
        }
        Commands::Inspect { root, config, json } => {
            let settings = GeneratorConfig::resolve(config.as_deref(), &root)?;
            let plans = Generator::new(settings, true)
                .inspect(&root)
                .with_context(|| format!("Failed to inspect {}", root.display()))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&plans)?);
            } else {
                print!("{}", format_plans(&plans, &root));
            }
            Ok(())
        }
    }
}

fn print_summary(summary: &RunSummary) {
    for (path, contents) in &summary.rendered {
        println!("// ---- {} ----", path.display());
        print!("{contents}");
    }
    for skipped in &summary.skipped {
        eprintln!("❌ {}: {}", skipped.path.display(), skipped.error);
    }
    println!(
        "Scanned {} file(s): {} generated, {} removed, {} skipped, {} directive(s) failed",
        summary.files_scanned,
        summary.written.len() + summary.rendered.len(),
        summary.removed.len(),
        summary.skipped.len(),
        summary.render_failures
    );
}

/// Human-readable listing for `inspect`.
pub fn format_plans(plans: &[FilePlan], root: &Path) -> String {
    let mut out = String::new();
    for plan in plans {
        let shown = plan.path.strip_prefix(root).unwrap_or(&plan.path);
        out.push_str(&format!("{}\n", shown.display()));
        if let Some(error) = &plan.error {
            out.push_str(&format!("  error: {error}\n"));
        }
        for decl in &plan.declarations {
            out.push_str(&format!("  {} (line {})\n", decl.name, decl.line));
            for d in &decl.directives {
                let marker = if d.directive.default_naming {
                    format!("{}.Default", d.directive.kind)
                } else {
                    d.directive.kind.to_string()
                };
                let fields: Vec<String> = d
                    .fields
                    .iter()
                    .map(|f| {
                        if f.must_supply {
                            format!("{}!", f.name)
                        } else {
                            f.name.clone()
                        }
                    })
                    .collect();
                if fields.is_empty() {
                    out.push_str(&format!("    {marker}\n"));
                } else {
                    out.push_str(&format!("    {marker}: {}\n", fields.join(", ")));
                }
            }
        }
    }
    out
}
