//! Human-readable summary renderer for graph diffs.

use crate::diff::model::GraphDiff;

/// Render a Markdown summary of a [`GraphDiff`].
///
/// Intended for pull-request comments and terminal review. Informational
/// only; consumers that act on the diff should read the structured form.
pub fn render_human_summary(diff: &GraphDiff) -> String {
    let mut out = String::new();
    let stats = diff.stats();

    out.push_str("## Branch Asset Changes\n\n");
    out.push_str(&format!(
        "**Base**: `{}`  \n**Branch**: `{}`\n\n",
        diff.identity.base_deployment, diff.identity.branch_deployment
    ));

    out.push_str("| | Deployment | Snapshot Digest |\n|---|---|---|\n");
    out.push_str(&format!(
        "| Base | {} | `{}` |\n| Branch | {} | `{}` |\n\n",
        diff.identity.base_deployment,
        short(&diff.identity.base_digest),
        diff.identity.branch_deployment,
        short(&diff.identity.branch_digest),
    ));

    out.push_str(&format!(
        "**New**: {} · **Changed**: {} · **Removed**: {} · **Unchanged**: {}\n\n",
        stats.new, stats.changed, stats.removed, stats.unchanged
    ));

    if diff.is_unchanged() {
        out.push_str("_No asset changes detected._\n");
        return out;
    }

    let new_assets: Vec<String> = diff
        .results()
        .filter(|r| r.is_new())
        .map(|r| r.key.to_string())
        .collect();
    if !new_assets.is_empty() {
        out.push_str("### New in branch\n\n");
        for key in &new_assets {
            out.push_str(&format!("- `{}`\n", key));
        }
        out.push('\n');
    }

    let changed: Vec<_> = diff
        .results()
        .filter(|r| !r.is_new() && !r.is_unchanged())
        .collect();
    if !changed.is_empty() {
        out.push_str("### Changed in branch\n\n");
        for result in &changed {
            let dims: Vec<&str> = result.reasons.iter().map(|r| r.dimension()).collect();
            out.push_str(&format!("- `{}`: {}\n", result.key, dims.join(", ")));
        }
        out.push('\n');
    }

    if !diff.removed_keys.is_empty() {
        out.push_str("### Removed in branch\n\n");
        for key in &diff.removed_keys {
            out.push_str(&format!("- `{}`\n", key));
        }
        out.push('\n');
    }

    out
}

/// Shorten a digest to its first 12 characters for display.
fn short(digest: &str) -> &str {
    if digest.is_empty() {
        "-"
    } else if digest.len() > 12 {
        &digest[..12]
    } else {
        digest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::engine::compute_graph_diff;
    use crate::model::{AssetDefinitionSnapshot, AssetKey};
    use crate::snapshot::AssetGraphSnapshot;

    #[test]
    fn test_unchanged_summary() {
        let base = AssetGraphSnapshot::from_definitions(
            "prod",
            vec![AssetDefinitionSnapshot::new(AssetKey::from("a"))],
        )
        .unwrap();
        let branch = AssetGraphSnapshot::from_definitions(
            "pr-3",
            vec![AssetDefinitionSnapshot::new(AssetKey::from("a"))],
        )
        .unwrap();
        let summary = render_human_summary(&compute_graph_diff(&base, &branch));
        assert!(summary.contains("_No asset changes detected._"));
        assert!(summary.contains("**Branch**: `pr-3`"));
    }

    #[test]
    fn test_sections_present() {
        let base = AssetGraphSnapshot::from_definitions(
            "prod",
            vec![
                AssetDefinitionSnapshot::new(AssetKey::parse("sales/orders").unwrap())
                    .with_code_version("v1"),
                AssetDefinitionSnapshot::new(AssetKey::from("legacy")),
            ],
        )
        .unwrap();
        let branch = AssetGraphSnapshot::from_definitions(
            "pr-4",
            vec![
                AssetDefinitionSnapshot::new(AssetKey::parse("sales/orders").unwrap())
                    .with_code_version("v2")
                    .with_tag("tier", "gold"),
                AssetDefinitionSnapshot::new(AssetKey::from("fresh")),
            ],
        )
        .unwrap();
        let summary = render_human_summary(&compute_graph_diff(&base, &branch));
        assert!(summary.contains("### New in branch\n\n- `fresh`"));
        assert!(summary.contains("- `sales/orders`: code version, tags"));
        assert!(summary.contains("### Removed in branch\n\n- `legacy`"));
    }

    #[test]
    fn test_short_digest() {
        assert_eq!(short(""), "-");
        assert_eq!(short("abc"), "abc");
        assert_eq!(short("0123456789abcdef"), "0123456789ab");
    }
}
