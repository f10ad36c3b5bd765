//! Registry subcommand handlers.

use std::fs;
use std::path::Path;

use anyhow::Context;
use serde_json::{Value, json};
use tracing::info;

use qphase_config::Config;
use qphase_core::{DiscoveryReport, EntryInfo, EntryStatus};
use qphase_visualizer::{RenderRequest, render};

use crate::cli::OutputFormat;
use crate::register;

/// List registered entries, after discovery.
pub(crate) fn list(
    config: &Config,
    namespace: Option<&str>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let (registry, _) = register::build(config)?;
    let entries: Vec<EntryInfo> = registry
        .entries()
        .into_iter()
        .filter(|e| namespace.is_none_or(|ns| e.namespace == ns))
        .collect();

    match format {
        OutputFormat::Json => {
            let json: Vec<Value> = entries.iter().map(entry_json).collect();
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        OutputFormat::Table => {
            if entries.is_empty() {
                println!("No entries registered.");
                return Ok(());
            }
            println!("{:<14} {:<20} {:<12} {}", "NAMESPACE", "KEY", "STATUS", "TARGET");
            println!("{}", "-".repeat(80));
            for entry in &entries {
                let (status, target) = match &entry.status {
                    EntryStatus::Resolved { type_name } => ("resolved", type_name.to_string()),
                    EntryStatus::Unresolved { target, .. } => ("lazy", target.to_string()),
                    EntryStatus::Resolving => ("resolving", String::new()),
                };
                println!(
                    "{:<14} {:<20} {:<12} {}",
                    entry.namespace, entry.key, status, target
                );
            }
        }
    }

    Ok(())
}

fn entry_json(entry: &EntryInfo) -> Value {
    let status = match &entry.status {
        EntryStatus::Resolved { type_name } => json!({
            "state": "resolved",
            "type": type_name,
        }),
        EntryStatus::Unresolved {
            target,
            return_callable,
        } => json!({
            "state": "unresolved",
            "target": target.to_string(),
            "return_callable": return_callable,
        }),
        EntryStatus::Resolving => json!({ "state": "resolving" }),
    };
    json!({
        "namespace": entry.namespace,
        "key": entry.key,
        "status": status,
    })
}

/// Resolve one entry and report what it produced.
pub(crate) fn resolve(config: &Config, namespace: &str, key: &str) -> anyhow::Result<()> {
    let (registry, _) = register::build(config)?;
    let artifact = registry.resolve(namespace, key)?;
    println!("{}:{} -> {}", namespace, key, artifact.type_name());
    Ok(())
}

/// Run discovery and print every plugin's outcome.
pub(crate) fn discover(config: &Config, format: OutputFormat) -> anyhow::Result<()> {
    register::validate(config)?;
    let registry = register::create(config)?;
    let report = register::discover(&registry, config);
    print_report(&report, format)
}

fn print_report(report: &DiscoveryReport, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            let json: Vec<Value> = report
                .outcomes
                .iter()
                .map(|outcome| {
                    json!({
                        "source": outcome.source.to_string(),
                        "ok": outcome.is_ok(),
                        "error": outcome.result.as_ref().err().map(|e| e.to_string()),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        OutputFormat::Table => {
            if report.is_empty() {
                println!("No plugins configured.");
                return Ok(());
            }
            for outcome in &report.outcomes {
                match &outcome.result {
                    Ok(()) => println!("ok      {}", outcome.source),
                    Err(e) => println!("failed  {}: {}", outcome.source, e),
                }
            }
        }
    }
    Ok(())
}

/// Render the request in `input` and write the figure as JSON.
pub(crate) fn render_figure(
    config: &Config,
    key: &str,
    input: &Path,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let content = fs::read_to_string(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let request: RenderRequest = serde_json::from_str(&content)
        .with_context(|| format!("Invalid render request in {}", input.display()))?;

    let (registry, _) = register::build(config)?;
    let figure = render(&registry, key, &request)?;
    let json = serde_json::to_string_pretty(&figure)?;

    match output {
        Some(path) => {
            fs::write(path, json)?;
            info!("Figure written to {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}
