use thiserror::Error;

/// Errors raised by the simulator for invalid arguments or unproductive data generation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimulatorError {
    #[error("world size must be a finite positive number, got {0}")]
    InvalidWorldSize(f64),

    #[error("{name} must be a finite non-negative number, got {value}")]
    InvalidNoise { name: &'static str, value: f64 },

    #[error("measurement range must be a number, got {0}")]
    InvalidMeasurementRange(f64),

    #[error("landmark {index} at ({x}, {y}) lies outside the world [0, {world_size}]")]
    LandmarkOutOfBounds {
        index: usize,
        x: i64,
        y: i64,
        world_size: f64,
    },

    #[error("step distance must be a finite non-negative number, got {0}")]
    InvalidStepDistance(f64),

    #[error("robot could not move at step {step} after {attempts} headings")]
    MoveAttemptsExhausted { step: usize, attempts: usize },

    #[error("not every landmark was observed after {attempts} attempts")]
    IncompleteCoverage { attempts: usize },
}

pub type Result<T> = std::result::Result<T, SimulatorError>;
