//! Archive pipeline: three sequential forward passes over the input
//! archive, sharing one [`RenameContext`].
//!
//! ```text
//! Idle -> MemberAnalysis -> StringAnalysis -> Transform -> Done
//!                 \________________\______________\-> Failed
//! ```
//!
//! Each pass opens the archive fresh and walks its entries in order; the
//! only addressable unit is "next entry". The transform pass writes to a
//! temporary sibling of the output path and publishes it atomically, so a
//! mid-run failure never leaves a corrupt artifact at the destination.

use std::collections::HashSet;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use zip::write::FileOptions;
use zip::{ZipArchive, ZipWriter};

use crate::classfile::{class_entry_path, entry_class_name, ClassCodec};
use crate::context::RenameContext;
use crate::error::{Error, Result};
use crate::oracle::{remap_class, Remapper};
use crate::record::RecordKind;
use crate::strings;
use crate::utils::io::{discard_quiet, publish_atomic};

/// Pipeline progress. `Failed` is absorbing: any I/O or decode failure
/// aborts the whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    MemberAnalysis,
    StringAnalysis,
    Transform,
    Done,
    Failed,
}

/// What a completed run produced.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameReport {
    pub output: PathBuf,
    pub entries_total: usize,
    pub classes_transformed: usize,
    pub resources_copied: usize,
    /// Entries silently dropped because another entry already claimed the
    /// same output path (first writer wins).
    pub entries_dropped: usize,
    pub renamed_classes: usize,
    pub renamed_members: usize,
    pub string_substitutions: usize,
}

pub struct ArchivePipeline<'c, C: ClassCodec> {
    input: PathBuf,
    output: PathBuf,
    codec: &'c C,
    ctx: RenameContext,
    state: PipelineState,
}

impl<'c, C: ClassCodec> ArchivePipeline<'c, C> {
    pub fn new(
        input: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
        codec: &'c C,
        ctx: RenameContext,
    ) -> Self {
        ArchivePipeline {
            input: input.into(),
            output: output.into(),
            codec,
            ctx,
            state: PipelineState::Idle,
        }
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Run all passes. Consumes the pipeline's readiness: a pipeline either
    /// reaches `Done` with a report or `Failed` with the first error.
    pub fn run(&mut self) -> Result<RenameReport> {
        let result = self.execute();
        self.state = match result {
            Ok(_) => PipelineState::Done,
            Err(_) => PipelineState::Failed,
        };
        result
    }

    fn execute(&mut self) -> Result<RenameReport> {
        self.state = PipelineState::MemberAnalysis;
        self.analyze_members()?;

        // The string pass only exists to serve class/method records.
        if self.ctx.wants_string_analysis() {
            self.state = PipelineState::StringAnalysis;
            self.analyze_strings()?;
        }

        self.state = PipelineState::Transform;
        self.transform()
    }

    fn open_input(&self) -> Result<ZipArchive<File>> {
        let file = File::open(&self.input)?;
        Ok(ZipArchive::new(file)?)
    }

    /// Pass 1: resolve every declared member of every non-excluded class,
    /// populating the shared caches. Produces no output.
    fn analyze_members(&mut self) -> Result<()> {
        let mut archive = self.open_input()?;

        for index in 0..archive.len() {
            let mut entry = archive.by_index(index)?;
            let Some(class_name) = entry_class_name(entry.name()) else {
                continue;
            };
            if self.ctx.is_excluded(&class_name) {
                continue;
            }

            let entry_name = entry.name().to_string();
            let mut bytes = Vec::new();
            entry.read_to_end(&mut bytes)?;
            let model = self
                .codec
                .decode(&bytes)
                .map_err(|e| Error::decode(&entry_name, e))?;

            // Original names claim their spots before any rename lands.
            self.ctx.seed_used_names(
                &class_name,
                model
                    .fields
                    .iter()
                    .map(|f| f.name.clone())
                    .chain(
                        model
                            .methods
                            .iter()
                            .filter(|m| !m.name.starts_with('<'))
                            .map(|m| m.name.clone()),
                    ),
            );

            for field in &model.fields {
                self.ctx
                    .resolve_member(RecordKind::Field, &class_name, &field.name, &field.descriptor);
            }
            for method in &model.methods {
                self.ctx.resolve_member(
                    RecordKind::Method,
                    &class_name,
                    &method.name,
                    &method.descriptor,
                );
            }
        }

        log_status!("rename", "Member analysis completed");
        Ok(())
    }

    /// Pass 2: collect literal strings from every non-excluded class and
    /// build the substitution map against the resolved names.
    fn analyze_strings(&mut self) -> Result<()> {
        let mut archive = self.open_input()?;

        for index in 0..archive.len() {
            let mut entry = archive.by_index(index)?;
            let Some(class_name) = entry_class_name(entry.name()) else {
                continue;
            };
            if self.ctx.is_excluded(&class_name) {
                continue;
            }

            let entry_name = entry.name().to_string();
            let mut bytes = Vec::new();
            entry.read_to_end(&mut bytes)?;
            let model = self
                .codec
                .decode(&bytes)
                .map_err(|e| Error::decode(&entry_name, e))?;

            strings::analyze_literals(&mut self.ctx, model.string_literals());
        }

        log_status!("rename", "String analysis completed");
        Ok(())
    }

    /// Pass 3: rewrite class entries through the oracle, relocate them under
    /// their resolved names, copy resources verbatim, dedup by output path.
    fn transform(&mut self) -> Result<RenameReport> {
        let tmp = temp_sibling(&self.output);
        let result = self.transform_into(&tmp);
        if result.is_err() {
            discard_quiet(&tmp);
        }
        result
    }

    fn transform_into(&mut self, tmp: &Path) -> Result<RenameReport> {
        let mut archive = self.open_input()?;
        let mut writer = ZipWriter::new(File::create(tmp)?);
        let mut written: HashSet<String> = HashSet::new();

        let mut classes_transformed = 0usize;
        let mut resources_copied = 0usize;
        let mut entries_dropped = 0usize;
        let entries_total = archive.len();

        for index in 0..entries_total {
            let mut entry = archive.by_index(index)?;
            let entry_name = entry.name().to_string();

            if entry.is_dir() {
                if written.insert(entry_name.clone()) {
                    writer.add_directory(entry_name.trim_end_matches('/'), FileOptions::default())?;
                } else {
                    entries_dropped += 1;
                }
                continue;
            }

            let mut bytes = Vec::new();
            entry.read_to_end(&mut bytes)?;
            drop(entry);

            if let Some(class_name) = entry_class_name(&entry_name) {
                let model = self
                    .codec
                    .decode(&bytes)
                    .map_err(|e| Error::decode(&entry_name, e))?;
                let remapped = remap_class(&model, &mut Remapper::new(&mut self.ctx));
                let out_bytes = self.codec.encode(&remapped)?;

                let out_path = if self.ctx.is_excluded(&class_name) {
                    entry_name.clone()
                } else {
                    class_entry_path(&self.ctx.resolve_class(&class_name))
                };

                if written.insert(out_path.clone()) {
                    writer.start_file(&out_path, FileOptions::default())?;
                    writer.write_all(&out_bytes)?;
                    classes_transformed += 1;
                } else {
                    entries_dropped += 1;
                    log_status!("rename", "Dropped duplicate entry: {}", out_path);
                }
            } else if written.insert(entry_name.clone()) {
                writer.start_file(&entry_name, FileOptions::default())?;
                writer.write_all(&bytes)?;
                resources_copied += 1;
            } else {
                entries_dropped += 1;
                log_status!("rename", "Dropped duplicate entry: {}", entry_name);
            }

            log_status!("rename", "Processed entry: {}", entry_name);
        }

        writer.finish()?;
        publish_atomic(tmp, &self.output)?;

        let stats = self.ctx.stats();
        Ok(RenameReport {
            output: self.output.clone(),
            entries_total,
            classes_transformed,
            resources_copied,
            entries_dropped,
            renamed_classes: stats.renamed_classes,
            renamed_members: stats.renamed_members,
            string_substitutions: stats.string_substitutions,
        })
    }
}

/// Default output path: a sibling of the input named `<stem>-renamed.<ext>`.
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "archive".to_string());
    let renamed = match input.extension() {
        Some(ext) => format!("{}-renamed.{}", stem, ext.to_string_lossy()),
        None => format!("{}-renamed", stem),
    };
    input.with_file_name(renamed)
}

fn temp_sibling(output: &Path) -> PathBuf {
    let name = output
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "output".to_string());
    output.with_file_name(format!("{}.tmp", name))
}
