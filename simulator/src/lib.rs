//! Simulates a point robot in a square world with fixed landmarks, producing the noisy motion
//! and landmark measurements a SLAM back end consumes.

pub mod error;
mod noise;
mod sim;
pub mod trajectory;

pub use error::{Result, SimulatorError};
pub use noise::uniform_noise;
pub use sim::{Robot, RobotParameters};
pub use trajectory::{generate_trajectory, SimulationRun, TrajectoryParameters};
