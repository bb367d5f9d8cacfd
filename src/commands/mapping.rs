use std::path::Path;

use clap::{Args, Subcommand};
use serde::Serialize;

use rejar::mapping;
use rejar::record::RecordSet;

use crate::commands::CmdResult;

#[derive(Args)]
pub struct MappingArgs {
    #[command(subcommand)]
    command: MappingCommand,
}

#[derive(Subcommand)]
enum MappingCommand {
    /// Parse a rename-table file and report what it contains
    Inspect {
        /// Rename-table file
        file: String,
    },
}

#[derive(Serialize)]
#[serde(tag = "command")]
pub enum MappingOutput {
    #[serde(rename = "mapping.inspect")]
    Inspect {
        file: String,
        classes: usize,
        methods: usize,
        fields: usize,
        total: usize,
    },
}

pub fn run(args: MappingArgs, _global: &crate::commands::GlobalArgs) -> CmdResult<MappingOutput> {
    match args.command {
        MappingCommand::Inspect { file } => {
            let records = mapping::load_records(Path::new(&file))?;
            let total = records.len();
            let set = RecordSet::new(records);

            Ok((
                MappingOutput::Inspect {
                    file,
                    classes: set.class_count(),
                    methods: set.method_count(),
                    fields: set.field_count(),
                    total,
                },
                0,
            ))
        }
    }
}
