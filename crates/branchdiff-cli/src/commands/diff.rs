//! Diff command
//!
//! Usage: branchdiff diff --base <FILE> --branch <FILE> [--format json|summary|labels]

use crate::commands::output::{emit, OutputArgs};
use branchdiff_core::core_types::RequestContext;
use branchdiff_core::diff::compute_graph_diff_in_context;
use branchdiff_store::snapshot::parse_snapshot_file;
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct DiffArgs {
    /// Base deployment snapshot (.yaml, .yml or .json)
    #[arg(long)]
    pub base: PathBuf,

    /// Branch deployment snapshot (.yaml, .yml or .json)
    #[arg(long)]
    pub branch: PathBuf,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Execute diff command
pub fn execute(args: DiffArgs) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = RequestContext::new();
    let base = parse_snapshot_file(&args.base).map_err(|e| e.with_request_context(&ctx))?;
    let branch = parse_snapshot_file(&args.branch).map_err(|e| e.with_request_context(&ctx))?;

    let diff = compute_graph_diff_in_context(&base, &branch, &ctx);
    emit(&diff, &args.output)
}
