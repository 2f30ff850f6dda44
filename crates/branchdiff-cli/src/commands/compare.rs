//! Compare command
//!
//! Usage: branchdiff compare --branch-deployment <NAME> [--base-deployment <NAME>]
//!        [--snapshots-dir <DIR>]

use crate::commands::output::{emit, OutputArgs};
use crate::config::Settings;
use branchdiff_core::core_types::RequestContext;
use branchdiff_core::diff::compute_graph_diff_in_context;
use branchdiff_store::{resolve_pair, DirectorySnapshotResolver};
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct CompareArgs {
    /// Branch deployment name (e.g. pr-123)
    #[arg(long)]
    pub branch_deployment: String,

    /// Base deployment name (default: prod)
    #[arg(long, env = "BRANCHDIFF_BASE_DEPLOYMENT")]
    pub base_deployment: Option<String>,

    /// Directory holding <deployment>.yaml snapshots
    #[arg(long, env = "BRANCHDIFF_SNAPSHOTS_DIR")]
    pub snapshots_dir: Option<PathBuf>,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Execute compare command
pub fn execute(args: CompareArgs, settings: Settings) -> Result<(), Box<dyn std::error::Error>> {
    let settings = settings
        .with_base_deployment(args.base_deployment)
        .with_snapshots_dir(args.snapshots_dir);

    let dir = settings.snapshots_dir.ok_or(
        "No snapshots directory configured (use --snapshots-dir, BRANCHDIFF_SNAPSHOTS_DIR, or snapshots_dir in branchdiff.toml)",
    )?;
    let ctx = RequestContext::new();
    let resolver = DirectorySnapshotResolver::new(dir);
    let pair = resolve_pair(
        &resolver,
        &settings.base_deployment,
        &args.branch_deployment,
    )
    .map_err(|e| e.with_request_context(&ctx))?;

    let diff = compute_graph_diff_in_context(&pair.base, &pair.branch, &ctx);
    emit(&diff, &args.output)
}
