//! draftsync command-line tool.
//!
//! Provides subcommands for generating, replaying, and validating text
//! patches, three-way merging files, reconciling drafts held in the
//! configured store, and generating / validating configuration files.

mod style;
mod summary;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use draftsync_core::config::{AppConfig, ENV_LOG_LEVEL};
use draftsync_core::{
    DiffList, DiffResult, FileDraftStore, Merger, PatchEngine, ReconcileRequest, Reconciler,
};

// ---------------------------------------------------------------------------
// CLI argument definitions
// ---------------------------------------------------------------------------

/// draftsync command-line tool.
#[derive(Parser, Debug)]
#[command(
    name = "draftsync",
    version,
    about = "Generate, replay, and merge edits to document drafts"
)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, global = true, default_value = "./draftsync.toml")]
    config: PathBuf,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the patch turning OLD into NEW.
    Diff {
        old: PathBuf,
        new: PathBuf,

        /// Print a unified line diff instead of the JSON patch.
        #[arg(long)]
        unified: bool,
    },

    /// Apply a JSON patch (operation list or full diff result) to a file.
    Apply {
        file: PathBuf,
        patch: PathBuf,

        /// Write the result here instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check that a JSON patch still turns OLD into NEW.
    Check {
        old: PathBuf,
        new: PathBuf,
        patch: PathBuf,
    },

    /// Three-way merge of BASE, CURRENT (human edit), and INCOMING (agent edit).
    Merge {
        base: PathBuf,
        current: PathBuf,
        incoming: PathBuf,

        /// Write the merged text here instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write the JSON merge result to this path.
        #[arg(long)]
        report: Option<PathBuf>,

        /// Print conflicts with diff3-style markers instead of the merged text.
        #[arg(long)]
        annotate: bool,

        /// Show a unified diff of CURRENT against the merged text on stderr.
        #[arg(long)]
        show_diff: bool,
    },

    /// Merge drafts held in the configured store.
    Reconcile {
        base_id: String,
        current_id: String,
        incoming_id: String,

        /// Draft receiving the merged text (defaults to CURRENT_ID).
        #[arg(long)]
        target: Option<String>,
    },

    /// Generate a default configuration file.
    Init {
        /// Output path for the generated config file.
        #[arg(short, long, default_value = "./draftsync.toml")]
        output: PathBuf,
    },

    /// Validate a configuration file.
    Validate,
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = resolve_log_level(&cli);
    let filter = EnvFilter::try_new(&level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}", style::error(&format!("{:#}", e)));
            ExitCode::FAILURE
        }
    }
}

/// `--log-level`, then `DRAFTSYNC_LOG_LEVEL`, then the config file, then `warn`.
fn resolve_log_level(cli: &Cli) -> String {
    cli.log_level
        .clone()
        .or_else(|| std::env::var(ENV_LOG_LEVEL).ok().filter(|v| !v.is_empty()))
        .or_else(|| {
            cli.config
                .exists()
                .then(|| AppConfig::load_from_file(&cli.config).ok())
                .flatten()
                .map(|c| c.logging.level)
        })
        .unwrap_or_else(|| "warn".into())
}

fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Commands::Diff { old, new, unified } => cmd_diff(&old, &new, unified),
        Commands::Apply {
            file,
            patch,
            output,
        } => cmd_apply(&file, &patch, output.as_deref()),
        Commands::Check { old, new, patch } => cmd_check(&old, &new, &patch),
        Commands::Merge {
            base,
            current,
            incoming,
            output,
            report,
            annotate,
            show_diff,
        } => cmd_merge(
            &MergeFiles {
                base,
                current,
                incoming,
            },
            output.as_deref(),
            report.as_deref(),
            annotate,
            show_diff,
        ),
        Commands::Reconcile {
            base_id,
            current_id,
            incoming_id,
            target,
        } => {
            let config = load_config(&cli.config)?;
            let mut request = ReconcileRequest::new(base_id, current_id, incoming_id);
            if let Some(target) = target {
                request = request.with_target(target);
            }
            cmd_reconcile(&config, &request)
        }
        Commands::Init { output } => cmd_init(&output),
        Commands::Validate => cmd_validate(&cli.config),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn load_config(path: &Path) -> Result<AppConfig> {
    AppConfig::load_and_resolve(path).context("failed to load configuration file")
}

fn read_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn write_or_print(output: Option<&Path>, text: &str) -> Result<()> {
    match output {
        Some(path) => std::fs::write(path, text)
            .with_context(|| format!("failed to write {}", path.display())),
        None => {
            print!("{}", text);
            Ok(())
        }
    }
}

/// Parse a patch file holding either a bare operation list or a full diff
/// result.
fn parse_patch(json: &str) -> Result<DiffList> {
    let value: serde_json::Value = serde_json::from_str(json).context("patch is not valid JSON")?;
    if value.is_array() {
        serde_json::from_value(value).context("patch is not a valid operation list")
    } else {
        let result: DiffResult =
            serde_json::from_value(value).context("patch is not a valid diff result")?;
        Ok(result.diffs)
    }
}

struct MergeFiles {
    base: PathBuf,
    current: PathBuf,
    incoming: PathBuf,
}

// ---------------------------------------------------------------------------
// Subcommand implementations
// ---------------------------------------------------------------------------

fn cmd_diff(old: &Path, new: &Path, unified: bool) -> Result<ExitCode> {
    let old_content = read_text(old)?;
    let new_content = read_text(new)?;

    if unified {
        print!("{}", diffy::create_patch(&old_content, &new_content));
    } else {
        let result = PatchEngine::generate_diff(&old_content, &new_content);
        debug!(ops = result.diffs.len(), "generated diff");
        println!("{}", serde_json::to_string_pretty(&result)?);
    }
    Ok(ExitCode::SUCCESS)
}

fn cmd_apply(file: &Path, patch: &Path, output: Option<&Path>) -> Result<ExitCode> {
    let content = read_text(file)?;
    let diffs = parse_patch(&read_text(patch)?)?;

    let applied = PatchEngine::apply_diff(&content, &diffs)
        .with_context(|| format!("patch does not apply to {}", file.display()))?;
    write_or_print(output, &applied)?;
    Ok(ExitCode::SUCCESS)
}

fn cmd_check(old: &Path, new: &Path, patch: &Path) -> Result<ExitCode> {
    let old_content = read_text(old)?;
    let new_content = read_text(new)?;
    let diffs = parse_patch(&read_text(patch)?)?;

    if PatchEngine::validate_diff(&old_content, &new_content, &diffs) {
        println!("valid");
        Ok(ExitCode::SUCCESS)
    } else {
        println!("stale");
        Ok(ExitCode::FAILURE)
    }
}

fn cmd_merge(
    files: &MergeFiles,
    output: Option<&Path>,
    report: Option<&Path>,
    annotate: bool,
    show_diff: bool,
) -> Result<ExitCode> {
    let base = read_text(&files.base)?;
    let current = read_text(&files.current)?;
    let incoming = read_text(&files.incoming)?;

    let result = Merger::merge_section_content(&base, &current, &incoming);

    let text = if annotate {
        Merger::annotate(&base, &current, &incoming)
    } else {
        result.merged.clone()
    };
    write_or_print(output, &text)?;

    if let Some(path) = report {
        std::fs::write(path, serde_json::to_string_pretty(&result)?)
            .with_context(|| format!("failed to write report {}", path.display()))?;
        info!(path = %path.display(), "merge result written");
    }
    if show_diff {
        eprint!("{}", diffy::create_patch(&current, &result.merged));
    }

    summary::print_merge_summary(&result);
    Ok(ExitCode::SUCCESS)
}

fn cmd_reconcile(config: &AppConfig, request: &ReconcileRequest) -> Result<ExitCode> {
    let store = FileDraftStore::with_extension(&config.store.root, &config.store.extension);
    let reconciler = Reconciler::new(store).with_annotation(config.reconcile.annotate);

    let outcome = reconciler
        .reconcile(request)
        .with_context(|| format!("failed to reconcile into '{}'", request.target_id))?;

    println!(
        "{}",
        style::header(&format!("Reconciled into '{}'", request.target_id))
    );
    summary::print_merge_summary(&outcome.result);

    if let Some(report) = &outcome.report {
        if config.reconcile.write_reports {
            let path = report
                .write_to_dir(&config.reconcile.report_dir)
                .context("failed to write conflict report")?;
            println!("{}", style::dim(&format!("Report: {}", path.display())));
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn cmd_init(output: &Path) -> Result<ExitCode> {
    let default_config = r#"# draftsync configuration

[logging]
level = "warn"

[store]
root = "./drafts"
extension = "md"

[reconcile]
write_reports = true
report_dir = "./reports"
annotate = false
"#;

    if output.exists() {
        anyhow::bail!(
            "file already exists: {}. Use a different path or remove the existing file.",
            output.display()
        );
    }

    std::fs::write(output, default_config).context("failed to write config file")?;

    println!("Default configuration written to {}", output.display());
    println!();
    println!("Next steps:");
    println!("  1. Point [store].root at the directory holding your drafts");
    println!(
        "  2. Validate with: draftsync validate --config {}",
        output.display()
    );
    Ok(ExitCode::SUCCESS)
}

fn cmd_validate(config_path: &Path) -> Result<ExitCode> {
    println!("Validating configuration: {}", config_path.display());
    println!();

    let mut config =
        AppConfig::load_from_file(config_path).context("failed to parse configuration")?;
    println!("  [OK] TOML structure is valid");

    config.apply_env_overrides();
    println!("  [OK] Environment overrides applied");

    if let Err(e) = config.validate() {
        println!("  [FAIL] Validation error: {}", e);
        anyhow::bail!("configuration validation failed");
    }
    println!("  [OK] All fields are valid");

    println!();
    println!("Configuration summary:");
    println!("  Log level     : {}", config.logging.level);
    println!("  Store root    : {}", config.store.root.display());
    println!("  Extension     : {}", config.store.extension);
    println!(
        "  Reports       : {}",
        if config.reconcile.write_reports {
            config.reconcile.report_dir.display().to_string()
        } else {
            "disabled".to_string()
        }
    );
    println!(
        "  Annotate      : {}",
        if config.reconcile.annotate { "yes" } else { "no" }
    );
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use draftsync_core::DiffOperation;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_merge_args() {
        let cli = Cli::try_parse_from([
            "draftsync",
            "merge",
            "base.md",
            "current.md",
            "incoming.md",
            "--annotate",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Merge {
                annotate: true,
                show_diff: false,
                ..
            }
        ));
        assert_eq!(cli.config, PathBuf::from("./draftsync.toml"));
    }

    #[test]
    fn test_parse_patch_list_and_result() {
        let list = r#"[{"type":"insert","position":5,"text":" world"}]"#;
        assert_eq!(
            parse_patch(list).unwrap(),
            vec![DiffOperation::Insert {
                position: 5,
                text: " world".into()
            }]
        );

        let full = serde_json::to_string(&PatchEngine::generate_diff("Hello world", "Hello"))
            .unwrap();
        assert_eq!(
            parse_patch(&full).unwrap(),
            vec![DiffOperation::Delete {
                position: 5,
                length: 6
            }]
        );

        assert!(parse_patch("{not json").is_err());
        assert!(parse_patch(r#"[{"type":"move"}]"#).is_err());
    }

    #[test]
    fn test_init_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("draftsync.toml");
        cmd_init(&path).unwrap();

        let written = AppConfig::load_from_file(&path).unwrap();
        assert!(written.validate().is_ok());
        assert!(cmd_init(&path).is_err());
    }

    #[test]
    fn test_merge_writes_output_and_report() {
        let dir = tempfile::tempdir().unwrap();
        let write = |name: &str, text: &str| {
            let path = dir.path().join(name);
            std::fs::write(&path, text).unwrap();
            path
        };
        let files = MergeFiles {
            base: write("base.md", "a\nb\nc"),
            current: write("current.md", "A\nb\nc"),
            incoming: write("incoming.md", "X\nb\nc"),
        };
        let output = dir.path().join("merged.md");
        let report = dir.path().join("result.json");

        cmd_merge(&files, Some(&output), Some(&report), false, false).unwrap();

        assert_eq!(std::fs::read_to_string(&output).unwrap(), "X\nb\nc");
        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&report).unwrap()).unwrap();
        assert_eq!(json["hasConflict"], true);
        assert_eq!(json["conflicts"][0]["current"][0], "A");
    }
}
