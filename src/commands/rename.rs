use std::collections::HashSet;
use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use rejar::classfile::JsonClassCodec;
use rejar::log_status;
use rejar::pipeline::{default_output_path, ArchivePipeline, RenameReport};
use rejar::{mapping, MatchMode, RecordSet, RenameContext};

use crate::commands::CmdResult;

#[derive(Args)]
pub struct RenameArgs {
    /// Archive to transform
    #[arg(short, long)]
    input: String,

    /// Rename-table file with the recovered names
    #[arg(short, long)]
    mapping: String,

    /// Output archive path (default: sibling named <input>-renamed)
    #[arg(short, long)]
    output: Option<String>,

    /// Fully qualified class names exempt from renaming and relocation
    #[arg(long, value_name = "CLASS")]
    exclude: Vec<String>,

    /// Match member records by original name alone, ignoring owner and
    /// descriptor (legacy behavior; overloads become indistinguishable)
    #[arg(long)]
    match_names_only: bool,
}

#[derive(Serialize)]
#[serde(tag = "command")]
pub enum RenameOutput {
    #[serde(rename = "rename")]
    Rename {
        input: String,
        #[serde(flatten)]
        report: RenameReport,
    },
}

pub fn run(args: RenameArgs, _global: &crate::commands::GlobalArgs) -> CmdResult<RenameOutput> {
    let input = PathBuf::from(&args.input);
    let output = args
        .output
        .map(PathBuf::from)
        .unwrap_or_else(|| default_output_path(&input));

    let records = mapping::load_records(std::path::Path::new(&args.mapping))?;
    log_status!("mapping", "Loaded {} rename records", records.len());

    let mode = if args.match_names_only {
        MatchMode::NameOnly
    } else {
        MatchMode::Strict
    };
    let exclusions: HashSet<String> = args.exclude.iter().cloned().collect();

    let ctx = RenameContext::new(RecordSet::new(records), exclusions, mode);
    let codec = JsonClassCodec;
    let mut pipeline = ArchivePipeline::new(&input, &output, &codec, ctx);
    let report = pipeline.run()?;

    Ok((
        RenameOutput::Rename {
            input: args.input,
            report,
        },
        0,
    ))
}
