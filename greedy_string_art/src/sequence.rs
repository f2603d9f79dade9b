use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::{nails, Channel};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub nail: usize,
    /// Strand colour, `None` for monochrome runs.
    pub channel: Option<Channel>,
    /// Colour group the step belongs to. Groups change every colour change
    /// interval, so two groups of the same colour stay apart.
    pub group: usize,
}

/// Nails in the order the thread visits them. Append only.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sequence {
    steps: Vec<Step>,
}

impl Sequence {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            steps: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, step: Step) {
        self.steps.push(step);
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn nails(&self) -> impl ExactSizeIterator<Item = usize> + '_ {
        self.steps.iter().map(|step| step.nail)
    }

    pub fn labels(&self) -> impl ExactSizeIterator<Item = String> + '_ {
        self.nails().map(nails::label)
    }

    /// Consecutive steps drawn in one colour group, in order. Monochrome runs
    /// yield a single group with no channel.
    pub fn channel_groups(&self) -> Vec<(Option<Channel>, Range<usize>)> {
        let mut groups: Vec<(Option<Channel>, Range<usize>)> = Vec::new();
        let mut current_group = None;
        for (idx, step) in self.steps.iter().enumerate() {
            if current_group == Some(step.group) {
                if let Some((_, range)) = groups.last_mut() {
                    range.end = idx + 1;
                    continue;
                }
            }
            groups.push((step.channel, idx..idx + 1));
            current_group = Some(step.group);
        }
        groups
    }
}
