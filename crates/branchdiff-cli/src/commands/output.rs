//! Diff output rendering shared by `diff` and `compare`

use branchdiff_core::diff::{project_labels, render_human_summary, GraphDiff};
use clap::{Args, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Structured diff (`changes` and `removed_keys`)
    Json,
    /// Markdown summary for pull requests
    Summary,
    /// One line per asset: key, label, reasons
    Labels,
}

#[derive(Debug, Args)]
pub struct OutputArgs {
    #[arg(long, value_enum, default_value_t = OutputFormat::Summary)]
    pub format: OutputFormat,

    /// Keep only new, changed, and removed assets
    #[arg(long)]
    pub changed_only: bool,

    /// Output file path (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Render the diff in the requested format
pub fn render(diff: &GraphDiff, args: &OutputArgs) -> Result<String, Box<dyn std::error::Error>> {
    let rendered = match args.format {
        OutputFormat::Json => {
            if args.changed_only {
                let mut filtered = diff.clone();
                filtered.changes.retain(|_, reasons| !reasons.is_empty());
                serde_json::to_string_pretty(&filtered)?
            } else {
                serde_json::to_string_pretty(diff)?
            }
        }
        OutputFormat::Summary => render_human_summary(diff),
        OutputFormat::Labels => {
            let mut out = String::new();
            for row in project_labels(diff, args.changed_only) {
                let label = row.label.map(|l| l.text()).unwrap_or("-");
                let reasons: Vec<&str> = row.reasons.iter().map(|r| r.as_str()).collect();
                out.push_str(&format!("{}\t{}\t{}\n", row.key, label, reasons.join(",")));
            }
            out
        }
    };
    Ok(rendered)
}

/// Write the rendered diff to `--output` or stdout
pub fn emit(diff: &GraphDiff, args: &OutputArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut rendered = render(diff, args)?;
    if !rendered.ends_with('\n') {
        rendered.push('\n');
    }

    if let Some(output_path) = &args.output {
        std::fs::write(output_path, rendered)?;
        println!("✓ Wrote diff to {}", output_path.display());
    } else {
        print!("{}", rendered);
    }
    Ok(())
}
