// Public modules
pub mod classfile;
pub mod collision;
pub mod context;
pub mod error;
pub mod mapping;
pub mod namespace;
pub mod oracle;
pub mod pipeline;
pub mod record;
pub mod strings;

// Re-export common types for convenience
pub use classfile::{ClassCodec, ClassModel, JsonClassCodec};
pub use context::{MatchMode, RenameContext};
pub use error::{Error, Result};
pub use pipeline::{default_output_path, ArchivePipeline, PipelineState, RenameReport};
pub use record::{RecordKind, RecordSet, RenameRecord};
