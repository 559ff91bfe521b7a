//! GitConfig Studio - layered git configuration editor
//!
//! Usage:
//!   gitconfig-studio list                  # Effective values across tiers
//!   gitconfig-studio --repo . list --scope local
//!   gitconfig-studio set user.name "Ada"   # Add or overwrite in a tier
//!   gitconfig-studio diff                  # Compare tiers side by side

mod interactive;
mod messages;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use console::style;
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use studio_core::backend::{ConfigBackend, GitConfigBackend};
use studio_core::config::{canonical_key, group_schema, ungrouped_keys};
use studio_core::context::AppContext;
use studio_core::resolve::{diff_summary, entries_for_key};
use studio_core::session::{AddOutcome, LoadOutcome, Session};
use studio_core::types::{ConfigEntry, Locale, Scope, Target};

use crate::interactive::{SetPrompt, display_value};
use crate::messages::Messages;

#[derive(Parser)]
#[command(name = "gitconfig-studio")]
#[command(about = "Inspect and edit layered git configuration", long_about = None)]
struct Cli {
    /// Work on this repository instead of the global config
    #[arg(long, global = true, value_name = "PATH")]
    repo: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List entries of one scope, grouped by category
    #[command(alias = "ls")]
    List {
        /// Scope to show (local, global, system, merged)
        ///
        /// Defaults to merged: one effective value per key.
        #[arg(long, default_value = "merged")]
        scope: Scope,

        /// Only keys whose name or label contains this text
        #[arg(long)]
        filter: Option<String>,

        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Show the effective value of a key and what it overrides
    Get {
        key: String,

        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Add a key or overwrite its value in one scope
    Set {
        key: String,

        /// New value; prompts (or uses the key's default with -y) when omitted
        value: Option<String>,

        /// Scope to write (local, global, system)
        ///
        /// Defaults to local with --repo, global otherwise.
        #[arg(long)]
        scope: Option<Scope>,

        /// Skip all confirmation prompts
        #[arg(short = 'y', long)]
        yes: bool,

        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Compare known keys across tiers
    Diff {
        /// Only keys whose tiers disagree
        #[arg(long)]
        conflicts: bool,

        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// List the tiers of the current target and their files
    Scopes {
        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Show or change the interface language (en, zh)
    Locale { locale: Option<Locale> },
}

#[derive(Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// Machine-readable JSON
    Json,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let ctx = AppContext::with_defaults()?;
    let mut session = ctx.session();

    open_target(&mut session, cli.repo).await?;
    run_cli(&ctx, &mut session, cli.command).await?;

    if let Err(err) = ctx.state_file().save(&session.snapshot()) {
        warn!(error = %format!("{err:#}"), "Failed to persist UI state");
    }
    Ok(())
}

async fn open_target(session: &mut Session<GitConfigBackend>, repo: Option<PathBuf>) -> Result<()> {
    match repo {
        Some(path) => {
            let path = std::path::absolute(&path)
                .with_context(|| format!("Failed to resolve path: {}", path.display()))?;
            session.open_repository(path).await?;
        }
        None => session.open_global(),
    }
    Ok(())
}

async fn run_cli(
    ctx: &AppContext,
    session: &mut Session<GitConfigBackend>,
    command: Commands,
) -> Result<()> {
    let messages = Messages::for_locale(session.locale());
    match command {
        Commands::List {
            scope,
            filter,
            format,
        } => {
            load_scope(session, scope, &messages).await?;
            if let Some(filter) = filter {
                session.set_search(filter);
            }
            match format {
                OutputFormat::Table => print_list_table(session, &messages),
                OutputFormat::Json => print_list_json(session)?,
            }
        }
        Commands::Get { key, format } => {
            load_scope(session, Scope::Merged, &messages).await?;
            let key = canonical_key(session.schema(), key.trim());
            run_get(session, key, format, &messages)?;
        }
        Commands::Set {
            key,
            value,
            scope,
            yes,
            format,
        } => {
            let scope = scope.unwrap_or(match session.target() {
                Some(Target::Repository(_)) => Scope::Local,
                _ => Scope::Global,
            });
            if !scope.is_tier() {
                anyhow::bail!("Cannot write to the merged view; pick local, global or system");
            }
            load_scope(session, scope, &messages).await?;
            run_set(session, &key, value, yes, format, &messages).await?;
        }
        Commands::Diff { conflicts, format } => {
            load_scope(session, Scope::Merged, &messages).await?;
            print_diff(session, conflicts, format, &messages)?;
        }
        Commands::Scopes { format } => {
            print_scopes(ctx, session, format, &messages).await?;
        }
        Commands::Locale { locale } => {
            if let Some(locale) = locale {
                session.set_locale(locale);
            }
            let messages = Messages::for_locale(session.locale());
            println!("{}: {}", messages.language, session.locale());
        }
    }
    Ok(())
}

async fn load_scope(
    session: &mut Session<GitConfigBackend>,
    scope: Scope,
    messages: &Messages,
) -> Result<()> {
    session.set_scope(scope)?;
    match session.reload().await? {
        LoadOutcome::Applied { entries, flagged } => {
            tracing::debug!(entries, flagged, "{}", messages.loaded);
            if flagged > 0 {
                eprintln!(
                    "{} {}: {}",
                    style("⚠").yellow(),
                    messages.flagged,
                    flagged
                );
            }
        }
        LoadOutcome::Fallback { .. } => {
            eprintln!("{} {}", style("⚠").yellow(), messages.placeholder_notice);
        }
        LoadOutcome::Stale => {}
    }
    Ok(())
}

/// Rows visible in the active scope: the merged view resolves every key.
fn visible_entries(session: &Session<GitConfigBackend>) -> Vec<ConfigEntry> {
    if session.scope().is_tier() {
        session.entries().to_vec()
    } else {
        session.merged()
    }
}

fn print_target_header(session: &Session<GitConfigBackend>, messages: &Messages) {
    let target = match session.target() {
        Some(Target::Repository(path)) => {
            format!("{} {}", messages.target_repo_prefix, path.display())
        }
        _ => messages.target_global.to_string(),
    };
    println!(
        "{}  [{}]",
        style(target).bold().cyan(),
        messages.scope_name(session.scope())
    );
    println!();
}

fn print_list_table(session: &Session<GitConfigBackend>, messages: &Messages) {
    print_target_header(session, messages);
    let rows = visible_entries(session);
    if rows.is_empty() {
        println!("{}", messages.no_entries);
        return;
    }

    let print_row = |entry: &ConfigEntry| {
        let overridden = entry
            .overridden_by
            .map(|scope| format!("({} {})", messages.overridden_by, messages.scope_name(scope)))
            .unwrap_or_default();
        println!(
            "  {:<28} {:<30} {:<8} {}",
            entry.key,
            display_value(messages, &entry.value),
            messages.scope_name(entry.scope),
            style(overridden).dim()
        );
    };

    for group in session.groups() {
        let group_rows: Vec<&ConfigEntry> = group
            .items
            .iter()
            .flat_map(|meta| rows.iter().filter(move |entry| entry.key == meta.key))
            .collect();
        if group_rows.is_empty() {
            continue;
        }
        println!("{}", style(group.category).bold());
        for entry in group_rows {
            print_row(entry);
        }
    }

    let term = session.store().search().trim().to_lowercase();
    let others: Vec<&str> = ungrouped_keys(session.schema(), &rows)
        .into_iter()
        .filter(|key| key.to_lowercase().contains(&term))
        .collect();
    if !others.is_empty() {
        println!("{}", style(messages.other_keys).bold());
        for key in others {
            for entry in rows.iter().filter(|entry| entry.key == key) {
                print_row(entry);
            }
        }
    }
}

fn print_list_json(session: &Session<GitConfigBackend>) -> Result<()> {
    let rows = visible_entries(session);
    let groups = group_schema(session.schema(), session.store().search());
    let output = serde_json::json!({
        "target": session.target(),
        "scope": session.scope(),
        "entries": rows,
        "groups": groups,
        "flagged": session.store().flagged(),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn run_get(
    session: &Session<GitConfigBackend>,
    key: &str,
    format: OutputFormat,
    messages: &Messages,
) -> Result<()> {
    let effective = session.effective(key);
    let tiers = entries_for_key(session.entries(), key);

    match format {
        OutputFormat::Table => {
            let Some(effective) = &effective else {
                println!("{} {}", key, messages.not_set);
                return Ok(());
            };
            println!(
                "{}: {} = {} ({})",
                messages.effective_value,
                style(key).bold(),
                style(display_value(messages, &effective.value)).green(),
                messages.scope_name(effective.scope)
            );
            if let Some(scope) = effective.overridden_by {
                println!("  {} {}", messages.overridden_by, messages.scope_name(scope));
            }
            for entry in tiers.iter().skip(1) {
                println!(
                    "  {:<8} {}",
                    messages.scope_name(entry.scope),
                    style(display_value(messages, &entry.value)).dim()
                );
            }
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "key": key,
                "effective": effective,
                "entries": tiers,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }
    Ok(())
}

async fn run_set(
    session: &mut Session<GitConfigBackend>,
    key: &str,
    value: Option<String>,
    yes: bool,
    format: OutputFormat,
    messages: &Messages,
) -> Result<()> {
    let key = canonical_key(session.schema(), key.trim());
    let mut prompt = SetPrompt::new(*messages, yes);
    let value = match value {
        Some(value) => Some(value),
        None => prompt.value(session.schema(), key)?,
    };
    let used_default = value.as_deref().is_none_or(str::is_empty);

    let mut prompt_error = None;
    let outcome = session.add_entry(key, value.as_deref(), |existing| {
        match prompt.confirm_overwrite(existing) {
            Ok(confirmed) => confirmed,
            Err(err) => {
                prompt_error = Some(err);
                false
            }
        }
    })?;
    if let Some(err) = prompt_error {
        return Err(err);
    }

    let report = match outcome {
        AddOutcome::Declined => None,
        AddOutcome::Inserted | AddOutcome::Overwritten => Some(session.save().await?),
    };
    let written = session.store().get(key, session.scope()).cloned();

    match format {
        OutputFormat::Table => match (&report, &written) {
            (Some(report), Some(entry)) => {
                if used_default {
                    println!("  {}", style(messages.default_value_applied).dim());
                }
                println!(
                    "{} {} = {} ({})",
                    style("✓").green(),
                    entry.key,
                    display_value(messages, &entry.value),
                    messages.scope_name(report.scope)
                );
                println!("  {}", messages.saved);
            }
            _ => println!("• {}", messages.kept),
        },
        OutputFormat::Json => {
            let outcome = match outcome {
                AddOutcome::Inserted => "inserted",
                AddOutcome::Overwritten => "overwritten",
                AddOutcome::Declined => "declined",
            };
            let output = serde_json::json!({
                "outcome": outcome,
                "entry": written,
                "saved": report.map(|report| report.saved).unwrap_or(0),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }
    Ok(())
}

fn print_diff(
    session: &Session<GitConfigBackend>,
    conflicts_only: bool,
    format: OutputFormat,
    messages: &Messages,
) -> Result<()> {
    let summary: Vec<_> = diff_summary(session.schema(), session.entries())
        .into_iter()
        .filter(|diff| !conflicts_only || diff.has_conflict())
        .collect();

    match format {
        OutputFormat::Table => {
            print_target_header(session, messages);
            if summary.is_empty() {
                println!("{}", messages.no_entries);
                return Ok(());
            }
            println!(
                "  {:<28} {:<20} {:<20} {:<20}",
                "Key",
                messages.scope_name(Scope::Local),
                messages.scope_name(Scope::Global),
                messages.scope_name(Scope::System)
            );
            println!("  {}", "-".repeat(90));
            let cell = |value: &Option<String>| match value {
                Some(value) => display_value(messages, value).to_string(),
                None => messages.not_set.to_string(),
            };
            for diff in &summary {
                let marker = if diff.has_conflict() {
                    style(format!("⚠ {}", messages.conflict)).red().to_string()
                } else {
                    String::new()
                };
                println!(
                    "  {:<28} {:<20} {:<20} {:<20} {}",
                    diff.key,
                    cell(&diff.local),
                    cell(&diff.global),
                    cell(&diff.system),
                    marker
                );
            }
        }
        OutputFormat::Json => {
            let output: Vec<_> = summary
                .iter()
                .map(|diff| {
                    serde_json::json!({
                        "key": diff.key,
                        "local": diff.local,
                        "global": diff.global,
                        "system": diff.system,
                        "conflict": diff.has_conflict(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }
    Ok(())
}

async fn print_scopes(
    ctx: &AppContext,
    session: &Session<GitConfigBackend>,
    format: OutputFormat,
    messages: &Messages,
) -> Result<()> {
    let backend = session.backend();
    let target = session
        .target()
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("No configuration target selected"))?;

    let mut rows = Vec::new();
    for scope in target.tiers() {
        let path = backend.config_path(*scope, &target)?;
        let entries = match backend.load_entries(*scope, &target).await {
            Ok(records) => Some(records.len()),
            Err(err) => {
                warn!(%scope, error = %err, "Failed to read tier");
                None
            }
        };
        rows.push((*scope, path, entries));
    }

    match format {
        OutputFormat::Table => {
            print_target_header(session, messages);
            for (scope, path, entries) in &rows {
                let count = entries.map(|n| n.to_string()).unwrap_or_else(|| "?".into());
                println!(
                    "  {:<8} {:<5} {}",
                    messages.scope_name(*scope),
                    count,
                    path.display()
                );
            }
            println!();
            println!("  {}", style(ctx.settings_path().display()).dim());
        }
        OutputFormat::Json => {
            let output: Vec<_> = rows
                .iter()
                .map(|(scope, path, entries)| {
                    serde_json::json!({
                        "scope": scope,
                        "label": scope.label(),
                        "path": path,
                        "entries": entries,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }
    Ok(())
}
