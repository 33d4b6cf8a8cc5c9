//! Constraint Model: per-label run-length caps and per-block boundary rules.

use crate::error::ConstraintError;
use crate::types::Label;
use std::collections::{HashMap, HashSet};
use std::num::NonZeroUsize;

/// Validated mapping from label to maximum consecutive run length.
///
/// Labels without an explicit cap fall back to the default cap, which is unset
/// (unconstrained) unless [`RunConstraint::with_default_cap`] was used. Labels that
/// never occur in the randomized sequence are allowed and never trigger.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunConstraint {
    caps: HashMap<Label, NonZeroUsize>,
    default_cap: Option<NonZeroUsize>,
}

impl RunConstraint {
    /// No caps at all; every order is acceptable.
    pub fn unconstrained() -> Self {
        Self::default()
    }

    /// Same cap for every label.
    pub fn uniform(cap: usize) -> Result<Self, ConstraintError> {
        Self::default().with_default_cap(cap)
    }

    /// Apply `cap` to every label not listed explicitly.
    pub fn with_default_cap(mut self, cap: usize) -> Result<Self, ConstraintError> {
        self.default_cap = Some(NonZeroUsize::new(cap).ok_or(ConstraintError::ZeroDefault)?);
        Ok(self)
    }

    /// Effective cap for `label`, `None` when unconstrained.
    pub fn cap(&self, label: &Label) -> Option<usize> {
        self.caps
            .get(label)
            .or(self.default_cap.as_ref())
            .map(|cap| cap.get())
    }

    pub fn is_unconstrained(&self) -> bool {
        self.caps.is_empty() && self.default_cap.is_none()
    }

    /// Cap applied to labels without an explicit entry.
    pub fn default_cap(&self) -> Option<usize> {
        self.default_cap.map(NonZeroUsize::get)
    }
}

/// Validate a raw label to cap mapping.
///
/// Every value must be a positive integer; non-positive values are rejected,
/// never clamped. A label given twice keeps its last value.
pub fn validate_constraints<I, L>(constraints: I) -> Result<RunConstraint, ConstraintError>
where
    I: IntoIterator<Item = (L, i64)>,
    L: Into<Label>,
{
    let mut caps = HashMap::new();
    for (label, value) in constraints {
        let label = label.into();
        let cap = usize::try_from(value)
            .ok()
            .and_then(NonZeroUsize::new)
            .ok_or_else(|| ConstraintError::NonPositive {
                label: label.clone(),
                value,
            })?;
        caps.insert(label, cap);
    }
    Ok(RunConstraint {
        caps,
        default_cap: None,
    })
}

/// Parse one `LABEL=N` pair as typed on the command line.
///
/// Only the shape is checked here; the cap itself is validated by
/// [`validate_constraints`].
pub fn parse_constraint(text: &str) -> Result<(Label, i64), ConstraintError> {
    let (label, value) = text
        .split_once('=')
        .ok_or_else(|| ConstraintError::Malformed(text.to_string()))?;
    if label.trim().is_empty() {
        return Err(ConstraintError::Malformed(text.to_string()));
    }
    let value = value
        .trim()
        .parse::<i64>()
        .map_err(|_| ConstraintError::Malformed(text.to_string()))?;
    Ok((Label::parse(label), value))
}

/// Labels that may not open or close a block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoundaryConstraint {
    pub forbidden_first: HashSet<Label>,
    pub forbidden_last: HashSet<Label>,
}

impl BoundaryConstraint {
    pub fn new<F, L, A, B>(forbidden_first: F, forbidden_last: L) -> Self
    where
        F: IntoIterator<Item = A>,
        L: IntoIterator<Item = B>,
        A: Into<Label>,
        B: Into<Label>,
    {
        Self {
            forbidden_first: forbidden_first.into_iter().map(Into::into).collect(),
            forbidden_last: forbidden_last.into_iter().map(Into::into).collect(),
        }
    }

    /// No boundary restrictions.
    pub fn none() -> Self {
        Self::default()
    }

    /// Whether `block` respects both boundary sets. Empty blocks always pass.
    pub fn permits(&self, block: &[Label]) -> bool {
        let first_ok = block
            .first()
            .map_or(true, |label| !self.forbidden_first.contains(label));
        let last_ok = block
            .last()
            .map_or(true, |label| !self.forbidden_last.contains(label));
        first_ok && last_ok
    }
}
