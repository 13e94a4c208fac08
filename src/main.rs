// SPDX-License-Identifier: PMPL-1.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! brandguard CLI - Brand Compliance Enforcer

use brandguard::audit::{self, AuditResult, FixReport, RuleBreak, ViolationKind};
use brandguard::config::{self, Config};
use brandguard::contrast::{contrast, ContrastOptions};
use brandguard::kit::{BrandKitStore, MemoryStore, ValidationReport};
use brandguard::provider::DocumentProvider;
use brandguard::tone::{GeminiClient, ToneAnalysis, ToneAnalyzer, ToneRequest};
use brandguard::undo::{Snapshot, SnapshotUndoManager, UndoOutcome};
use brandguard::{AuditSession, BrandguardError, Color, JsonDocument, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{fmt, EnvFilter};

/// brandguard: Brand Compliance Enforcer
///
/// Audits document elements against a brand kit's palette, fonts and
/// contrast policy, and applies reversible fixes.
#[derive(Parser)]
#[command(name = "brandguard")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Report planned fixes without changing the document
    #[arg(long, global = true)]
    dry_run: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    /// Output format (pretty, json)
    #[arg(long, default_value = "pretty", global = true)]
    format: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate a brand kit document
    Validate {
        /// Brand kit JSON file
        kit: PathBuf,
    },

    /// Validate, store and activate a brand kit
    Import {
        /// Brand kit JSON file
        kit: PathBuf,
    },

    /// Audit a document against the brand kit
    Audit {
        /// Document JSON file
        #[arg(long)]
        doc: PathBuf,

        /// Use this kit file instead of the active kit
        #[arg(long)]
        kit: Option<PathBuf>,

        /// Also fail on unfixable contrast findings
        #[arg(long)]
        strict: bool,
    },

    /// Fix every violation in a document
    Fix {
        /// Document JSON file
        #[arg(long)]
        doc: PathBuf,

        /// Use this kit file instead of the active kit
        #[arg(long)]
        kit: Option<PathBuf>,
    },

    /// Revert the last fix on a document
    Undo {
        /// Document JSON file
        #[arg(long)]
        doc: PathBuf,
    },

    /// Measure the contrast of a color pair
    Contrast {
        /// Foreground color (hex)
        foreground: String,

        /// Background color (hex)
        background: String,

        /// Large text or non-text content
        #[arg(long)]
        large: bool,

        /// Also check AAA
        #[arg(long)]
        aaa: bool,
    },

    /// Score copy against the brand voice
    Tone {
        /// Text to analyze
        text: String,
    },

    /// Initialize configuration file
    Init {
        /// Output format (yaml, toml)
        #[arg(long, default_value = "yaml")]
        format: String,
    },

    /// Show current configuration
    Show,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(&cli.log_level);

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(config::default_config_path);

    let mut config = match config::load_config(&config_path) {
        Ok(c) => c,
        Err(e) => return fail("Error loading config", e),
    };

    if cli.dry_run {
        config.dry_run = true;
    }

    let json = cli.format == "json";

    match cli.command {
        Command::Validate { kit } => handle_validate(&kit, &config, json),
        Command::Import { kit } => handle_import(&kit, &config),
        Command::Audit { doc, kit, strict } => {
            handle_audit(&doc, kit.as_deref(), &config, strict, json).await
        }
        Command::Fix { doc, kit } => handle_fix(&doc, kit.as_deref(), &config, json).await,
        Command::Undo { doc } => handle_undo(&doc, &config).await,
        Command::Contrast {
            foreground,
            background,
            large,
            aaa,
        } => handle_contrast(&foreground, &background, large, aaa, json),
        Command::Tone { text } => handle_tone(text, &config, json).await,
        Command::Init { format } => handle_init(&config_path, &format),
        Command::Show => handle_show(&config),
    }
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_target(true)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

fn fail(context: &str, err: impl Display) -> ExitCode {
    eprintln!("{}: {}", context, err);
    ExitCode::FAILURE
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("JSON serialization error: {}", e),
    }
}

fn read_json(path: &Path) -> Result<serde_json::Value> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Kit store for one command: a throwaway store around `kit`, or the
/// persisted store with its active kit restored
fn open_store(kit: Option<&Path>, config: &Config) -> Result<Arc<BrandKitStore>> {
    let store = match kit {
        Some(path) => {
            let store = BrandKitStore::new(Box::new(MemoryStore::new()), config.validator());
            store.import(&read_json(path)?)?;
            store
        }
        None => {
            let store = config.open_store();
            store.load_active()?.ok_or(BrandguardError::NoActiveKit)?;
            store
        }
    };
    Ok(Arc::new(store))
}

fn handle_validate(kit: &Path, config: &Config, json: bool) -> ExitCode {
    let doc = match read_json(kit) {
        Ok(d) => d,
        Err(e) => return fail("Error reading brand kit", e),
    };

    let report = config.validator().validate(&doc);
    if json {
        print_json(&report);
    } else {
        print_validation(&report);
    }

    if report.valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn handle_import(kit: &Path, config: &Config) -> ExitCode {
    let doc = match read_json(kit) {
        Ok(d) => d,
        Err(e) => return fail("Error reading brand kit", e),
    };

    match config.open_store().import(&doc) {
        Ok(spec) => {
            println!("Imported and activated brand kit '{}'", spec.name());
            println!("  Colors: {}", spec.allowed_colors().len());
            println!("  Fonts: {}", spec.allowed_fonts().join(", "));
            println!("  Min contrast: {}", spec.min_contrast());
            ExitCode::SUCCESS
        }
        Err(BrandguardError::InvalidKit(report)) => {
            print_validation(&report);
            ExitCode::FAILURE
        }
        Err(e) => fail("Error importing brand kit", e),
    }
}

async fn handle_audit(
    doc: &Path,
    kit: Option<&Path>,
    config: &Config,
    strict: bool,
    json: bool,
) -> ExitCode {
    let store = match open_store(kit, config) {
        Ok(s) => s,
        Err(e) => return fail("Error loading brand kit", e),
    };
    let document = match JsonDocument::load(doc) {
        Ok(d) => d,
        Err(e) => return fail("Error loading document", e),
    };

    let result = match AuditSession::new(store).run(&document).await {
        Ok(r) => r,
        Err(e) => return fail("Audit error", e),
    };

    if json {
        print_json(&result);
    } else {
        print_audit(&result);
    }

    if !result.is_compliant() {
        ExitCode::FAILURE
    } else if strict && !result.unfixable.is_empty() {
        ExitCode::from(2)
    } else {
        ExitCode::SUCCESS
    }
}

async fn handle_fix(doc: &Path, kit: Option<&Path>, config: &Config, json: bool) -> ExitCode {
    let store = match open_store(kit, config) {
        Ok(s) => s,
        Err(e) => return fail("Error loading brand kit", e),
    };
    let document = match JsonDocument::load(doc) {
        Ok(d) => d,
        Err(e) => return fail("Error loading document", e),
    };

    if config.dry_run {
        return handle_fix_dry_run(&store, &document, json).await;
    }

    let snapshot_path = config.snapshot_path(doc);
    let mut undo = match load_snapshot(&snapshot_path) {
        Ok(Some(snapshot)) => SnapshotUndoManager::from_snapshot(snapshot),
        Ok(None) => SnapshotUndoManager::new(),
        Err(e) => return fail("Error reading undo snapshot", e),
    };

    let report = match AuditSession::new(store).fix_all(&document, &mut undo).await {
        Ok(r) => r,
        Err(e) => return fail("Fix error", e),
    };

    if let Err(e) = document.save() {
        return fail("Error saving document", e);
    }
    if let Some(snapshot) = undo.snapshot() {
        if let Err(e) = save_snapshot(&snapshot_path, snapshot) {
            return fail("Error saving undo snapshot", e);
        }
    }

    if json {
        print_json(&report);
    } else {
        print_fix(&report, &snapshot_path);
    }

    if report.is_complete() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

async fn handle_fix_dry_run(store: &BrandKitStore, document: &JsonDocument, json: bool) -> ExitCode {
    let spec = match store.require_active() {
        Ok(s) => s,
        Err(e) => return fail("Error loading brand kit", e),
    };
    let scan = match document.scan().await {
        Ok(s) => s,
        Err(e) => return fail("Error scanning document", e),
    };

    let plans = audit::plan_fixes(&spec, &scan.elements);
    if json {
        print_json(&plans);
    } else {
        println!("Dry run: {} fix(es) planned", plans.len());
        for plan in &plans {
            let color = plan.color.map(|c| c.to_string()).unwrap_or_else(|| "-".to_string());
            let font = plan.font.as_deref().unwrap_or("-");
            println!("  {:<24} color: {:<8} font: {}", plan.element_id, color, font);
        }
    }
    ExitCode::SUCCESS
}

async fn handle_undo(doc: &Path, config: &Config) -> ExitCode {
    let document = match JsonDocument::load(doc) {
        Ok(d) => d,
        Err(e) => return fail("Error loading document", e),
    };

    let snapshot_path = config.snapshot_path(doc);
    let mut undo = match load_snapshot(&snapshot_path) {
        Ok(Some(snapshot)) => SnapshotUndoManager::from_snapshot(snapshot),
        Ok(None) => SnapshotUndoManager::new(),
        Err(e) => return fail("Error reading undo snapshot", e),
    };

    match undo.undo(&document).await {
        UndoOutcome::NothingToUndo => {
            println!("⚠️  Nothing to undo for {}", doc.display());
            ExitCode::SUCCESS
        }
        UndoOutcome::Restored { restored, failures } => {
            if let Err(e) = document.save() {
                return fail("Error saving document", e);
            }
            if let Err(e) = std::fs::remove_file(&snapshot_path) {
                return fail("Error removing undo snapshot", e);
            }

            println!("↩️  Restored {} element(s)", restored);
            for failure in &failures {
                println!(
                    "❌ {}: could not restore {} to {}",
                    failure.element_id, failure.property, failure.value
                );
            }
            if failures.is_empty() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

fn handle_contrast(foreground: &str, background: &str, large: bool, aaa: bool, json: bool) -> ExitCode {
    let (fg, bg) = match (Color::normalize(foreground), Color::normalize(background)) {
        (Ok(fg), Ok(bg)) => (fg, bg),
        (Err(e), _) | (_, Err(e)) => return fail("Invalid color", e),
    };

    let options = ContrastOptions {
        large_or_non_text: large,
        include_aaa: aaa,
    };
    let report = contrast(&fg, &bg, options);

    if json {
        print_json(&report);
    } else {
        let mark = |pass: bool| if pass { "✅" } else { "❌" };
        println!("{} on {}: {:.2}:1", fg, bg, report.ratio);
        println!("  {} AA  (requires {:.1}:1)", mark(report.passes_aa), report.required_aa);
        if let (Some(pass), Some(required)) = (report.passes_aaa, report.required_aaa) {
            println!("  {} AAA (requires {:.1}:1)", mark(pass), required);
        }
    }

    if report.passes_aa && report.passes_aaa.unwrap_or(true) {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

async fn handle_tone(text: String, config: &Config, json: bool) -> ExitCode {
    let request = match ToneRequest::with_limit(text, config.tone.max_text_length) {
        Ok(r) => r,
        Err(e) => return fail("Error", e),
    };
    let client = match GeminiClient::from_env(&config.tone) {
        Ok(c) => c,
        Err(e) => return fail("Error", e),
    };

    match client.analyze(&request).await {
        Ok(analysis) => {
            if json {
                print_json(&analysis);
            } else {
                print_tone(&analysis);
            }
            ExitCode::SUCCESS
        }
        Err(e) => fail("Tone analysis error", e),
    }
}

fn handle_init(config_path: &Path, format: &str) -> ExitCode {
    let path = if format == "toml" {
        config_path.with_extension("toml")
    } else {
        config_path.to_path_buf()
    };

    match config::write_default_config(&path) {
        Ok(()) => {
            println!("Created configuration file: {}", path.display());
            ExitCode::SUCCESS
        }
        Err(e) => fail("Error creating config", e),
    }
}

fn handle_show(config: &Config) -> ExitCode {
    println!("\nCurrent Configuration:");
    println!("======================\n");

    println!("Store:");
    println!("  Path: {}", config.store.path.display());
    println!();

    println!("Fonts:");
    if config.fonts.extra_known_fonts.is_empty() {
        println!("  Extra known fonts: (none)");
    } else {
        println!("  Extra known fonts: {}", config.fonts.extra_known_fonts.join(", "));
    }
    println!();

    println!("Tone:");
    println!("  Endpoint: {}", config.tone.endpoint);
    println!("  Model: {}", config.tone.model);
    println!(
        "  API keys: ${} (backup ${})",
        config.tone.api_key_env, config.tone.backup_api_key_env
    );
    println!("  Timeout: {}s", config.tone.timeout_secs);
    println!();

    println!("Audit:");
    println!("  Snapshot file: {}", config.audit.snapshot_file);
    println!();

    println!("General:");
    println!("  Dry run: {}", config.dry_run);

    ExitCode::SUCCESS
}

fn load_snapshot(path: &Path) -> Result<Option<Snapshot>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(path)?;
    Ok(Some(serde_json::from_str(&content)?))
}

fn save_snapshot(path: &Path, snapshot: &Snapshot) -> Result<()> {
    std::fs::write(path, serde_json::to_string_pretty(snapshot)?)?;
    Ok(())
}

fn print_validation(report: &ValidationReport) {
    if report.valid {
        println!("✅ Brand kit is valid");
        return;
    }

    println!("❌ Brand kit is invalid ({} error(s))", report.errors.len());
    for error in &report.errors {
        println!("   {}: {}", error.field, error.message);
    }
}

fn print_audit(result: &AuditResult) {
    println!();
    println!("╔════════════════════════════════════════════════════════════════╗");
    println!("║                 BRANDGUARD COMPLIANCE AUDIT                    ║");
    println!("╠════════════════════════════════════════════════════════════════╣");
    println!("║  Kit:           {:<47}║", result.kit);
    println!("║  Elements:      {:<47}║", result.total_elements);
    println!(
        "║  Violations:    {:<47}║",
        format!(
            "{} ({} contrast, {} font, {} color)",
            result.violations.len(),
            result.violations_of(ViolationKind::Contrast).len(),
            result.violations_of(ViolationKind::Font).len(),
            result.violations_of(ViolationKind::Color).len()
        )
    );
    println!("║  Unfixable:     {:<47}║", result.unfixable.len());
    println!("║  Health score:  {:<47}║", format!("{}/100", result.health_score));
    println!("╚════════════════════════════════════════════════════════════════╝");
    println!();

    if result.violations.is_empty() && result.unfixable.is_empty() {
        println!("✅ No issues found!");
        return;
    }

    for violation in &result.violations {
        let icon = match violation.primary {
            ViolationKind::Contrast => "❌",
            ViolationKind::Font => "🔤",
            ViolationKind::Color => "🎨",
        };
        println!("{} [{}]", icon, violation.element_id);
        for rule in &violation.rules {
            match rule {
                RuleBreak::Palette { color } => {
                    println!("   {} is not a brand color", color);
                }
                RuleBreak::Font { font } => {
                    println!("   font '{}' is not a brand font", font);
                }
                RuleBreak::Contrast {
                    color,
                    background,
                    ratio,
                    required,
                    level,
                } => {
                    println!(
                        "   {} on {} is {:.2}:1, {} requires {:.1}:1",
                        color, background, ratio, level, required
                    );
                }
            }
        }
        println!();
    }

    for finding in &result.unfixable {
        println!("⚠️  [{}] no brand color meets contrast", finding.element_id);
        println!(
            "   {} on {} is {:.2}:1, requires {:.1}:1",
            finding.current_color, finding.background, finding.current_ratio, finding.required_ratio
        );
        if finding.is_current_best {
            println!("   💡 already the best brand color for this background");
        } else {
            println!(
                "   💡 {} reaches {:.2}:1, the best available",
                finding.best_color, finding.best_ratio
            );
        }
        println!();
    }
}

fn print_fix(report: &FixReport, snapshot_path: &Path) {
    println!("🔧 Fixed {} of {} element(s)", report.fixed, report.plans.len());
    for plan in &report.plans {
        if let Some(color) = plan.color {
            println!("   {}: color → {}", plan.element_id, color);
        }
        if let Some(font) = plan.font.as_deref() {
            println!("   {}: font → {}", plan.element_id, font);
        }
    }
    for failure in &report.failures {
        println!(
            "❌ {}: document refused {} {}",
            failure.element_id, failure.property, failure.value
        );
    }
    if report.snapshot_taken {
        println!("↩️  Undo snapshot saved to {}", snapshot_path.display());
    }
}

fn print_tone(analysis: &ToneAnalysis) {
    println!();
    println!("Brand voice score: {:.0}/100", analysis.score);
    println!();
    println!("💡 {}", analysis.suggestion);
}
