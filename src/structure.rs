//! Structure Builder
//!
//! Expands a condition design into a grouped (not yet shuffled) multiset of trial
//! labels, optionally split into equal-sized blocks.
//!
//! Per-block counts use floor division. When a label's count does not divide
//! evenly by the block count the remainder is dropped and a warning is logged, so
//! the produced total can be smaller than the design total. Callers that need the
//! exact shortfall can ask [`truncations`] before building.

use crate::error::DesignError;
use crate::types::{Blocks, Label, Sequence};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;
use std::mem::size_of;
use std::str::FromStr;
use tracing::{debug, warn};

/// Most labels a single allocation can hold.
const MAX_TRIALS: usize = isize::MAX as usize / size_of::<Label>();

/// Experimental design: which conditions exist and how many trials each gets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Design {
    /// `conditions` anonymous labels `0..conditions`, each repeated `trials_per_condition` times.
    Uniform {
        conditions: usize,
        trials_per_condition: usize,
    },
    /// Explicit label to count mapping, in declaration order.
    Counts(Vec<(Label, usize)>),
}

impl Design {
    /// Build a design from a count pair given as a slice.
    pub fn from_pair(pair: &[usize]) -> Result<Self, DesignError> {
        match pair {
            [conditions, trials_per_condition] => {
                let design = Design::Uniform {
                    conditions: *conditions,
                    trials_per_condition: *trials_per_condition,
                };
                design.total()?;
                Ok(design)
            }
            _ => Err(DesignError::PairLength(pair.len())),
        }
    }

    /// Build a mapping design, rejecting repeated labels.
    pub fn counts<I, L>(entries: I) -> Result<Self, DesignError>
    where
        I: IntoIterator<Item = (L, usize)>,
        L: Into<Label>,
    {
        let entries: Vec<(Label, usize)> = entries
            .into_iter()
            .map(|(label, count)| (label.into(), count))
            .collect();
        check_unique(&entries)?;
        let design = Design::Counts(entries);
        design.total()?;
        Ok(design)
    }

    /// Interpret a loosely-typed JSON value as a design.
    ///
    /// Arrays are count pairs and must hold exactly two non-negative integers.
    /// Objects map label to non-negative integer count; key order is kept.
    pub fn from_value(value: &Value) -> Result<Self, DesignError> {
        match value {
            Value::Array(items) => {
                if items.len() != 2 {
                    return Err(DesignError::PairLength(items.len()));
                }
                Design::from_pair(&[
                    count_from_value("conditions", &items[0])?,
                    count_from_value("trials_per_condition", &items[1])?,
                ])
            }
            Value::Object(map) => {
                let mut entries = Vec::with_capacity(map.len());
                for (key, count) in map {
                    entries.push((Label::parse(key), count_from_value(key, count)?));
                }
                Design::counts(entries)
            }
            other => Err(DesignError::Shape(value_kind(other).to_string())),
        }
    }

    /// Per-label counts in declaration order.
    pub fn entries(&self) -> Vec<(Label, usize)> {
        match self {
            Design::Uniform {
                conditions,
                trials_per_condition,
            } => (0..*conditions as u64)
                .map(|index| (Label::Index(index), *trials_per_condition))
                .collect(),
            Design::Counts(entries) => entries.clone(),
        }
    }

    /// Total trials the design asks for, before any block truncation.
    ///
    /// Fails with [`DesignError::TooLarge`] when the total (or, for a count pair,
    /// the number of conditions) cannot be materialised.
    pub fn total(&self) -> Result<usize, DesignError> {
        let total = match self {
            Design::Uniform {
                conditions,
                trials_per_condition,
            } => {
                if *conditions > MAX_TRIALS {
                    return Err(DesignError::TooLarge(format!("{} conditions", conditions)));
                }
                conditions.checked_mul(*trials_per_condition)
            }
            Design::Counts(entries) => entries
                .iter()
                .try_fold(0usize, |sum, (_, count)| sum.checked_add(*count)),
        };
        total
            .filter(|total| *total <= MAX_TRIALS)
            .ok_or_else(|| DesignError::TooLarge("the total trial count".to_string()))
    }
}

impl FromStr for Design {
    type Err = DesignError;

    /// Accepts `NxM` (count pair), `label=count,label=count`, or a JSON literal.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        if text.starts_with('[') || text.starts_with('{') {
            let value: Value = serde_json::from_str(text)
                .map_err(|e| DesignError::Shape(format!("unparseable JSON ({})", e)))?;
            return Design::from_value(&value);
        }

        if !text.contains('=') && text.contains(['x', 'X']) {
            let fields: Vec<&str> = text.split(['x', 'X']).collect();
            if fields.len() != 2 {
                return Err(DesignError::PairLength(fields.len()));
            }
            return Design::from_pair(&[
                parse_count("conditions", fields[0])?,
                parse_count("trials_per_condition", fields[1])?,
            ]);
        }

        let mut entries = Vec::new();
        for part in text.split(',').filter(|p| !p.trim().is_empty()) {
            let (label, count) = part
                .split_once('=')
                .ok_or_else(|| DesignError::Shape(format!("'{}'", part.trim())))?;
            entries.push((Label::parse(label), parse_count(label.trim(), count)?));
        }
        if entries.is_empty() {
            return Err(DesignError::Shape("empty design".to_string()));
        }
        Design::counts(entries)
    }
}

/// A label whose count was not evenly divisible by the block count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Truncation {
    pub label: Label,
    pub total: usize,
    pub per_block: usize,
    /// Trials lost across the whole design (`total - per_block * blocks`).
    pub dropped: usize,
}

/// Built structure, grouped by label and not yet randomized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Structure {
    /// Single block requested.
    Flat(Sequence),
    /// More than one block requested.
    Blocked(Blocks),
}

impl Structure {
    /// Normalise to a list of blocks. A flat sequence becomes one block.
    pub fn into_blocks(self) -> Blocks {
        match self {
            Structure::Flat(sequence) => vec![sequence],
            Structure::Blocked(blocks) => blocks,
        }
    }

    /// Borrowing view of the blocks.
    pub fn blocks(&self) -> Vec<&[Label]> {
        match self {
            Structure::Flat(sequence) => vec![sequence.as_slice()],
            Structure::Blocked(blocks) => blocks.iter().map(Vec::as_slice).collect(),
        }
    }

    /// Total number of trials across all blocks.
    pub fn len(&self) -> usize {
        match self {
            Structure::Flat(sequence) => sequence.len(),
            Structure::Blocked(blocks) => blocks.iter().map(Vec::len).sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Rebuild a structure of the same shape from a list of blocks.
    pub(crate) fn from_blocks(mut blocks: Blocks, flat: bool) -> Self {
        if flat && blocks.len() == 1 {
            Structure::Flat(blocks.remove(0))
        } else {
            Structure::Blocked(blocks)
        }
    }
}

/// Labels that lose trials when split into `block_count` blocks.
pub fn truncations(design: &Design, block_count: usize) -> Result<Vec<Truncation>, DesignError> {
    if block_count == 0 {
        return Err(DesignError::ZeroBlocks);
    }
    design.total()?;
    let truncated = design
        .entries()
        .into_iter()
        .filter(|(_, total)| total % block_count != 0)
        .map(|(label, total)| {
            let per_block = total / block_count;
            Truncation {
                label,
                total,
                per_block,
                dropped: total - per_block * block_count,
            }
        })
        .collect();
    Ok(truncated)
}

/// Expand `design` into `block_count` grouped blocks.
///
/// Returns [`Structure::Flat`] when `block_count == 1`.
pub fn build_structure(design: &Design, block_count: usize) -> Result<Structure, DesignError> {
    if block_count == 0 {
        return Err(DesignError::ZeroBlocks);
    }
    if let Design::Counts(entries) = design {
        check_unique(entries)?;
    }

    let design_total = design.total()?;
    report_truncations(design, block_count)?;

    let per_block: Vec<(Label, usize)> = design
        .entries()
        .into_iter()
        .map(|(label, total)| (label, total / block_count))
        .collect();

    let block: Sequence = per_block
        .iter()
        .flat_map(|(label, count)| std::iter::repeat(label.clone()).take(*count))
        .collect();

    debug!(
        blocks = block_count,
        trials_per_block = block.len(),
        design_total,
        "Built experiment structure"
    );

    if block_count == 1 {
        Ok(Structure::Flat(block))
    } else {
        Ok(Structure::Blocked(vec![block; block_count]))
    }
}

fn report_truncations(design: &Design, block_count: usize) -> Result<(), DesignError> {
    let truncated = truncations(design, block_count)?;
    match design {
        // All conditions share one count, so one warning covers them.
        Design::Uniform {
            trials_per_condition,
            ..
        } => {
            if let Some(first) = truncated.first() {
                warn!(
                    trials_per_condition,
                    blocks = block_count,
                    per_block = first.per_block,
                    "Trials per condition not divisible by block count; restructuring to fit blocks"
                );
            }
        }
        Design::Counts(_) => {
            for t in &truncated {
                warn!(
                    condition = %t.label,
                    trials = t.total,
                    blocks = block_count,
                    per_block = t.per_block,
                    dropped = t.dropped,
                    "Condition not divisible by block count; restructuring to fit blocks"
                );
            }
        }
    }
    Ok(())
}

fn check_unique(entries: &[(Label, usize)]) -> Result<(), DesignError> {
    let mut seen = HashSet::with_capacity(entries.len());
    for (label, _) in entries {
        if !seen.insert(label) {
            return Err(DesignError::DuplicateLabel(label.clone()));
        }
    }
    Ok(())
}

fn count_from_value(label: &str, value: &Value) -> Result<usize, DesignError> {
    value
        .as_u64()
        .and_then(|count| usize::try_from(count).ok())
        .ok_or_else(|| DesignError::Count {
            label: label.to_string(),
            value: value.to_string(),
        })
}

fn parse_count(label: &str, text: &str) -> Result<usize, DesignError> {
    text.trim().parse::<usize>().map_err(|_| DesignError::Count {
        label: label.trim().to_string(),
        value: text.trim().to_string(),
    })
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
