use serde::{Deserialize, Serialize};

/// A fixed point landmark in the world. The position of a landmark within the list it is
/// stored in is its identity, see [`LandmarkMeasurement::landmark_index`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Landmark {
    /// The x position of the landmark
    pub x: i64,

    /// The y position of the landmark
    pub y: i64,
}

impl Landmark {
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

impl From<Landmark> for [i64; 2] {
    fn from(val: Landmark) -> Self {
        [val.x, val.y]
    }
}

impl From<[i64; 2]> for Landmark {
    fn from(val: [i64; 2]) -> Self {
        Landmark::new(val[0], val[1])
    }
}

/// A single noisy observation of a landmark, relative to the robot position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LandmarkMeasurement {
    /// Index of the observed landmark in the landmark list of the robot.
    pub landmark_index: usize,

    /// Measured offset along the x-axis from the robot to the landmark.
    pub dx: f64,

    /// Measured offset along the y-axis from the robot to the landmark.
    pub dy: f64,
}

impl From<LandmarkMeasurement> for (usize, f64, f64) {
    fn from(val: LandmarkMeasurement) -> Self {
        (val.landmark_index, val.dx, val.dy)
    }
}

/// A commanded translation of the robot for a single time step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Motion {
    pub dx: f64,
    pub dy: f64,
}

impl Motion {
    pub const fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }

    /// Euclidean length of the translation.
    pub fn length(&self) -> f64 {
        self.dx.hypot(self.dy)
    }
}

impl From<Motion> for (f64, f64) {
    fn from(val: Motion) -> Self {
        (val.dx, val.dy)
    }
}
