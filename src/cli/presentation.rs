//! CLI presentation: render structures and plans as text tables, JSON, or CSV rows.

use crate::cli::parse::OutputFormat;
use crate::error::ApiError;
use crate::randomizer::longest_runs;
use crate::sequencer::Plan;
use crate::structure::{Structure, Truncation};
use crate::types::Label;
use comfy_table::Table;
use serde_json::json;

/// Render the grouped output of `build`.
pub fn format_structure(
    structure: &Structure,
    truncated: &[Truncation],
    format: OutputFormat,
) -> Result<String, ApiError> {
    match format {
        OutputFormat::Json => {
            let out = json!({
                "structure": structure,
                "truncations": truncated,
            });
            Ok(serde_json::to_string_pretty(&out)?)
        }
        OutputFormat::Csv => format_csv(structure),
        OutputFormat::Text => {
            let mut output = blocks_table(structure);
            for t in truncated {
                output.push_str(&format!(
                    "\nWarning: {} has {} trials, not divisible into blocks; {} per block, {} dropped",
                    t.label, t.total, t.per_block, t.dropped
                ));
            }
            Ok(output)
        }
    }
}

/// Render the randomized output of `randomize`.
pub fn format_plan(plan: &Plan, format: OutputFormat) -> Result<String, ApiError> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(plan)?),
        OutputFormat::Csv => format_csv(&plan.structure),
        OutputFormat::Text => Ok(format!(
            "Seed: {}\n{}",
            plan.seed,
            blocks_table(&plan.structure)
        )),
    }
}

/// One row per trial: `trial,block,condition`, both indices 1-based.
fn format_csv(structure: &Structure) -> Result<String, ApiError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["trial", "block", "condition"])?;
    let mut trial = 0usize;
    for (block_index, block) in structure.blocks().into_iter().enumerate() {
        for label in block {
            trial += 1;
            writer.write_record([
                trial.to_string(),
                (block_index + 1).to_string(),
                label.to_string(),
            ])?;
        }
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| ApiError::Output(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| ApiError::Output(e.to_string()))
}

fn blocks_table(structure: &Structure) -> String {
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.set_header(vec!["Block", "Trials", "Longest runs", "Sequence"]);
    for (index, block) in structure.blocks().into_iter().enumerate() {
        table.add_row(vec![
            (index + 1).to_string(),
            block.len().to_string(),
            format_runs(block),
            join_labels(block),
        ]);
    }
    table.to_string()
}

fn format_runs(block: &[Label]) -> String {
    longest_runs(block)
        .into_iter()
        .map(|(label, run)| format!("{}={}", label, run))
        .collect::<Vec<_>>()
        .join(", ")
}

fn join_labels(block: &[Label]) -> String {
    block
        .iter()
        .map(Label::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}
