use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use colored::Colorize;
use member_spacing::config::{discover, load_from_path, LintConfig};
use member_spacing::lint::{fix_source, lint_file, write_fixed, LintedFile};
use member_spacing::report::{render_json, render_text, OutputFormat, Summary};
use member_spacing::{Dialect, LinesBetweenClassMembers, RULE_NAME};
use similar::{ChangeTag, TextDiff};
use std::env;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

mod logging;

#[derive(Parser)]
#[command(name = "member-spacing")]
#[command(about = "Check blank lines between TypeScript class members", long_about = None)]
#[command(version)]
struct Cli {
    /// Log more (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Only print problems, no summary
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct RuleArgs {
    /// Config file (default: nearest member-spacing.toml or tslint.json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Require exactly N blank lines, overriding the config
    #[arg(short, long, value_name = "N")]
    lines: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Report members without the required blank lines
    Check {
        /// Files or directories to lint
        #[arg(default_value = ".")]
        paths: Vec<PathBuf>,

        #[command(flatten)]
        rule: RuleArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value_t)]
        format: OutputFormat,
    },

    /// Insert or remove blank lines so every member conforms
    Fix {
        /// Files or directories to fix
        #[arg(default_value = ".")]
        paths: Vec<PathBuf>,

        #[command(flatten)]
        rule: RuleArgs,

        /// Dry run - show what would be changed without modifying files
        #[arg(short = 'n', long)]
        dry_run: bool,

        /// Show unified diff of changes
        #[arg(short, long)]
        diff: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::start(cli.verbose, cli.quiet)?;

    match cli.command {
        Commands::Check {
            paths,
            rule,
            format,
        } => cmd_check(&paths, &rule, format, cli.quiet),

        Commands::Fix {
            paths,
            rule,
            dry_run,
            diff,
        } => cmd_fix(&paths, &rule, dry_run, diff, cli.quiet),
    }
}

/// Build the rule from `--config` (or the discovered config) and `--lines`.
///
/// Returns `None` when the config switches the rule off and `--lines`
/// does not switch it back on.
fn resolve_rule(args: &RuleArgs) -> Result<Option<LinesBetweenClassMembers>> {
    let config_path = match &args.config {
        Some(path) => Some(path.clone()),
        None => discover(&env::current_dir()?),
    };

    let config = match &config_path {
        Some(path) => {
            info!(path = %path.display(), "using config");
            load_from_path(path)?
        }
        None => LintConfig::default(),
    };

    let mut settings = config.settings(RULE_NAME).unwrap_or_default();
    if let Some(lines) = args.lines {
        settings.enabled = true;
        settings.option = Some(lines.to_string());
    }
    debug!(?settings, "resolved rule settings");
    let rule = settings.into_rule();
    if let Some(rule) = &rule {
        info!(spacing = %rule.config(), severity = %rule.severity(), "rule enabled");
    }
    Ok(rule)
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name == "node_modules" || name.starts_with('.'))
}

/// Expand `paths` into the sorted list of lintable files beneath them.
fn collect_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if !path.exists() {
            anyhow::bail!("No such file or directory: {}", path.display());
        }

        if path.is_file() {
            if Dialect::from_path(path).is_some() {
                files.push(path.clone());
            } else {
                warn!(path = %path.display(), "not a TypeScript or JavaScript file, skipping");
            }
            continue;
        }

        for entry in WalkDir::new(path).into_iter().filter_entry(|e| !is_skipped_dir(e)) {
            let entry = entry.with_context(|| format!("failed to walk {}", path.display()))?;
            if entry.file_type().is_file() && Dialect::from_path(entry.path()).is_some() {
                files.push(entry.into_path());
            }
        }
    }

    files.sort();
    files.dedup();
    debug!(count = files.len(), "collected files");
    Ok(files)
}

/// Helper: Show unified diff between original and fixed content
fn display_diff(file: &Path, original: &str, modified: &str) {
    println!("{}", format!("--- {} (original)", file.display()).dimmed());
    println!("{}", format!("+++ {} (fixed)", file.display()).dimmed());

    let diff = TextDiff::from_lines(original, modified);
    for (idx, group) in diff.grouped_ops(2).iter().enumerate() {
        if idx > 0 {
            println!("{}", "...".dimmed());
        }
        for op in group {
            for change in diff.iter_changes(op) {
                let line = match change.tag() {
                    ChangeTag::Delete => format!("-{}", change).red(),
                    ChangeTag::Insert => format!("+{}", change).green(),
                    ChangeTag::Equal => format!(" {}", change).normal(),
                };
                print!("{}", line);
                if change.missing_newline() {
                    println!();
                }
            }
        }
    }
}

fn cmd_check(paths: &[PathBuf], args: &RuleArgs, format: OutputFormat, quiet: bool) -> Result<()> {
    let Some(rule) = resolve_rule(args)? else {
        if !quiet {
            println!("{}", format!("{RULE_NAME} is disabled").yellow());
        }
        return Ok(());
    };

    let files = collect_files(paths)?;
    let mut summary = Summary::default();
    let mut linted = Vec::with_capacity(files.len());
    let mut failed = 0;

    for file in &files {
        match lint_file(&rule, file) {
            Ok(result) => {
                summary.add(&result.diagnostics);
                if matches!(format, OutputFormat::Text) {
                    print!("{}", render_text(&result.path, &result.diagnostics));
                }
                linted.push(result);
            }
            Err(e) => {
                failed += 1;
                eprintln!("{} {}: {}", "✗".red(), file.display(), e);
            }
        }
    }

    match format {
        OutputFormat::Json => println!("{}", render_json(&linted)?),
        OutputFormat::Text if !quiet => {
            println!();
            let line = summary.to_string();
            if summary.has_errors() {
                println!("{}", line.red().bold());
            } else if summary.warnings > 0 {
                println!("{}", line.yellow());
            } else {
                println!("{}", line.green());
            }
        }
        OutputFormat::Text => {}
    }

    if summary.has_errors() || failed > 0 {
        std::process::exit(1);
    }

    Ok(())
}

fn cmd_fix(
    paths: &[PathBuf],
    args: &RuleArgs,
    dry_run: bool,
    show_diff: bool,
    quiet: bool,
) -> Result<()> {
    let Some(rule) = resolve_rule(args)? else {
        if !quiet {
            println!("{}", format!("{RULE_NAME} is disabled").yellow());
        }
        return Ok(());
    };

    if dry_run && !quiet {
        println!("{}", "[DRY RUN - no files will be modified]".cyan());
    }

    let files = collect_files(paths)?;
    let mut summary = Summary::default();
    let mut total_fixed_files = 0;
    let mut total_fixes = 0;
    let mut failed = 0;

    for file in &files {
        match fix_file(&rule, file, dry_run, show_diff) {
            Ok(FileFix { applied, remaining }) => {
                if applied > 0 {
                    total_fixed_files += 1;
                    total_fixes += applied;
                    if !quiet {
                        let verb = if dry_run { "Would fix" } else { "Fixed" };
                        println!(
                            "{} {} {} ({} fix(es))",
                            "✓".green(),
                            verb,
                            file.display(),
                            applied
                        );
                    }
                }
                print!("{}", render_text(&remaining.path, &remaining.diagnostics));
                summary.add(&remaining.diagnostics);
            }
            Err(e) => {
                failed += 1;
                eprintln!("{} {}: {:#}", "✗".red(), file.display(), e);
            }
        }
    }

    if !quiet {
        println!();
        println!("{}", "Summary:".bold());
        println!(
            "  {} fix(es) in {} file(s)",
            format!("{}", total_fixes).green(),
            total_fixed_files
        );
        println!(
            "  {} problem(s) remaining",
            format!("{}", summary.errors + summary.warnings).yellow()
        );
        println!("  {} failed", format!("{}", failed).red());
    }

    if summary.has_errors() || failed > 0 {
        std::process::exit(1);
    }

    Ok(())
}

struct FileFix {
    applied: usize,
    /// Diagnostics the fixer could not resolve, against the fixed text.
    remaining: LintedFile,
}

fn fix_file(
    rule: &LinesBetweenClassMembers,
    file: &Path,
    dry_run: bool,
    show_diff: bool,
) -> Result<FileFix> {
    let mut linted = lint_file(rule, file)?;
    if !linted.diagnostics.iter().any(|d| d.is_fixable()) {
        return Ok(FileFix {
            applied: 0,
            remaining: linted,
        });
    }

    let outcome = fix_source(rule, file, &linted.source, linted.dialect)?;
    if outcome.changed(&linted.source) {
        if show_diff {
            display_diff(file, &linted.source, &outcome.text);
        }
        if !dry_run {
            let result = write_fixed(file, &linted.source, &outcome.text)
                .with_context(|| format!("failed to write {}", file.display()))?;
            debug!(?result, "wrote fixed file");
        }
    }

    linted.source = outcome.text;
    linted.diagnostics = outcome.remaining;
    Ok(FileFix {
        applied: outcome.applied,
        remaining: linted,
    })
}
