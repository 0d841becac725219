use serde::{Deserialize, Serialize};

use crate::robot::{LandmarkMeasurement, Motion};

/// One discrete time step: the landmarks sensed at the start of the step, followed by the
/// motion that was applied afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryRecord {
    pub measurements: Vec<LandmarkMeasurement>,
    pub motion: Motion,
}

/// Sequential log of sense/move cycles, consumed by a SLAM back end.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Trajectory {
    records: Vec<TrajectoryRecord>,
}

impl Trajectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a time step. `measurements` must have been captured before `motion` was applied.
    pub fn push(&mut self, measurements: Vec<LandmarkMeasurement>, motion: Motion) {
        self.records.push(TrajectoryRecord {
            measurements,
            motion,
        });
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[TrajectoryRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TrajectoryRecord> {
        self.records.iter()
    }
}

impl<'a> IntoIterator for &'a Trajectory {
    type Item = &'a TrajectoryRecord;
    type IntoIter = std::slice::Iter<'a, TrajectoryRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
