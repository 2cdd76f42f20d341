//! Lineage tracking for cleaning runs.
//!
//! Every stage execution appends exactly one [`StepRecord`] explaining what
//! changed and why. Records are numbered `1..N` in execution order, are
//! immutable once appended, and the recorder offers no way to rewrite or
//! remove them. A finished [`LineageLog`] is exported verbatim.

use serde::Serialize;

/// One entry of the audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepRecord {
    step: u32,
    description: String,
    details: String,
    reason: String,
}

impl StepRecord {
    pub fn step(&self) -> u32 {
        self.step
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn details(&self) -> &str {
        &self.details
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// Ordered sequence of step records for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LineageLog {
    steps: Vec<StepRecord>,
}

impl LineageLog {
    pub fn steps(&self) -> &[StepRecord] {
        &self.steps
    }

    pub fn iter(&self) -> impl Iterator<Item = &StepRecord> {
        self.steps.iter()
    }

    /// Record with the given 1-based step number.
    pub fn get(&self, step: u32) -> Option<&StepRecord> {
        let index = usize::try_from(step).ok()?.checked_sub(1)?;
        self.steps.get(index)
    }

    pub fn last(&self) -> Option<&StepRecord> {
        self.steps.last()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl<'a> IntoIterator for &'a LineageLog {
    type Item = &'a StepRecord;
    type IntoIter = std::slice::Iter<'a, StepRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

/// Append-only writer for a [`LineageLog`].
#[derive(Debug, Default)]
pub struct LineageRecorder {
    log: LineageLog,
}

impl LineageRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record with the next step number.
    pub fn record(
        &mut self,
        description: impl Into<String>,
        details: impl Into<String>,
        reason: impl Into<String>,
    ) -> &StepRecord {
        let step = u32::try_from(self.log.steps.len()).map_or(u32::MAX, |n| n.saturating_add(1));
        self.log.steps.push(StepRecord {
            step,
            description: description.into(),
            details: details.into(),
            reason: reason.into(),
        });
        &self.log.steps[self.log.steps.len() - 1]
    }

    pub fn log(&self) -> &LineageLog {
        &self.log
    }

    pub fn into_log(self) -> LineageLog {
        self.log
    }

    pub fn len(&self) -> usize {
        self.log.len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }
}
