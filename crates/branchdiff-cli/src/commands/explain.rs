//! Explain command
//!
//! Usage: branchdiff explain --base <FILE> --branch <FILE> --asset <KEY> [--json]

use branchdiff_core::diff::{explain_asset, ChangeDetail, ChangeLabel, MapDelta};
use branchdiff_core::model::{AssetKey, PartitionsSpec};
use branchdiff_store::snapshot::parse_snapshot_file;
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ExplainArgs {
    /// Base deployment snapshot
    #[arg(long)]
    pub base: PathBuf,

    /// Branch deployment snapshot
    #[arg(long)]
    pub branch: PathBuf,

    /// Asset key, segments joined by '/'
    #[arg(long)]
    pub asset: String,

    /// Print the detail as JSON
    #[arg(long)]
    pub json: bool,
}

/// Execute explain command
pub fn execute(args: ExplainArgs) -> Result<(), Box<dyn std::error::Error>> {
    let key = AssetKey::parse(&args.asset)?;
    let base = parse_snapshot_file(&args.base)?;
    let branch = parse_snapshot_file(&args.branch)?;

    let Some(detail) = explain_asset(&base, &branch, &key) else {
        if base.contains_key(&key) {
            println!("Asset: {}", key);
            println!("Label: {}", ChangeLabel::RemovedInBranch);
            return Ok(());
        }
        return Err(format!(
            "Asset '{}' not found in {} or {}",
            key,
            base.deployment(),
            branch.deployment()
        )
        .into());
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&detail)?);
    } else {
        print!("{}", render_detail(&detail));
    }
    Ok(())
}

fn render_detail(detail: &ChangeDetail) -> String {
    let mut out = format!("Asset: {}\n", detail.key);
    let label = ChangeLabel::for_reasons(&detail.reasons)
        .map(|l| l.text())
        .unwrap_or("Unchanged");
    out.push_str(&format!("Label: {}\n", label));
    if detail.reasons.is_empty() {
        return out;
    }

    let reasons: Vec<&str> = detail.reasons.iter().map(|r| r.as_str()).collect();
    out.push_str(&format!("Reasons: {}\n", reasons.join(", ")));

    if let Some(change) = &detail.code_version {
        out.push_str(&format!(
            "  code version: {} -> {}\n",
            change.old.as_deref().unwrap_or("(none)"),
            change.new.as_deref().unwrap_or("(none)")
        ));
    }
    if let Some(delta) = &detail.dependencies {
        let added: Vec<String> = delta.added.iter().map(|k| format!("+{}", k)).collect();
        let removed: Vec<String> = delta.removed.iter().map(|k| format!("-{}", k)).collect();
        out.push_str(&format!(
            "  dependencies: {}\n",
            added.into_iter().chain(removed).collect::<Vec<_>>().join(" ")
        ));
    }
    if let Some(change) = &detail.partitions_definition {
        let show = |spec: &Option<PartitionsSpec>| match spec {
            Some(spec) => format!("{}", spec),
            None => "(none)".to_string(),
        };
        out.push_str(&format!(
            "  partitions definition: {} -> {}\n",
            show(&change.old),
            show(&change.new)
        ));
    }
    if let Some(delta) = &detail.tags {
        out.push_str(&format!("  tags: {}\n", render_map_delta(delta)));
    }
    if let Some(delta) = &detail.metadata {
        out.push_str(&format!("  metadata: {}\n", render_map_delta(delta)));
    }
    out
}

fn render_map_delta(delta: &MapDelta) -> String {
    let mut parts = Vec::new();
    if !delta.added.is_empty() {
        parts.push(format!("added {}", delta.added.join(", ")));
    }
    if !delta.removed.is_empty() {
        parts.push(format!("removed {}", delta.removed.join(", ")));
    }
    if !delta.changed.is_empty() {
        parts.push(format!("changed {}", delta.changed.join(", ")));
    }
    parts.join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use branchdiff_core::diff::explain_change;
    use branchdiff_core::model::AssetDefinitionSnapshot;

    #[test]
    fn test_render_changed_asset() {
        let base = AssetDefinitionSnapshot::new(AssetKey::from("orders"))
            .with_code_version("v1")
            .with_partitions(PartitionsSpec::weekly("2024-01-01"))
            .with_tag("section", "produce");
        let branch = base
            .clone()
            .with_code_version("v2")
            .with_partitions(PartitionsSpec::weekly("2023-01-01"))
            .with_tag("type", "perishable");

        let text = render_detail(&explain_change(Some(&base), &branch));
        assert!(text.contains("Label: Changed in branch"));
        assert!(text.contains("code version: v1 -> v2"));
        assert!(text.contains(
            "partitions definition: weekly from 2024-01-01 -> weekly from 2023-01-01"
        ));
        assert!(text.contains("tags: added type"));
        assert!(!text.contains("metadata:"));
    }

    #[test]
    fn test_render_unchanged_asset() {
        let def = AssetDefinitionSnapshot::new(AssetKey::from("orders"));
        let text = render_detail(&explain_change(Some(&def), &def));
        assert_eq!(text, "Asset: orders\nLabel: Unchanged\n");
    }
}
