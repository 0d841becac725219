use std::f64::consts::PI;

use common::{
    robot::{Landmark, Motion},
    trajectory::Trajectory,
    world::WorldSnapshot,
};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    error::{Result, SimulatorError},
    sim::{Robot, RobotParameters},
};

/// Number of random headings tried before a single step is given up on.
const MAX_HEADINGS_PER_STEP: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrajectoryParameters {
    /// Number of time steps, the trajectory holds one record less than this.
    pub steps: usize,

    /// Distance the robot is commanded to travel every step.
    pub step_distance: f64,

    pub num_landmarks: usize,

    /// Retry until every landmark has been observed at least once.
    pub require_full_coverage: bool,

    pub max_attempts: usize,
}

impl Default for TrajectoryParameters {
    fn default() -> Self {
        Self {
            steps: 20,
            step_distance: 20.0,
            num_landmarks: 5,
            require_full_coverage: true,
            max_attempts: 100,
        }
    }
}

/// A complete generated dataset: the true landmark positions, the logged sense/move cycles and
/// where the robot truly ended up.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationRun {
    pub world_size: f64,
    pub landmarks: Vec<Landmark>,
    pub trajectory: Trajectory,
    pub final_position: [f64; 2],
}

impl SimulationRun {
    /// The world as it was left at the end of the run.
    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            world_size: self.world_size.round() as i64,
            robot: self.final_position,
            landmarks: (!self.landmarks.is_empty())
                .then(|| self.landmarks.iter().map(|&l| l.into()).collect()),
        }
    }
}

fn random_heading<R: Rng + ?Sized>(rng: &mut R, distance: f64) -> Motion {
    let theta = rng.gen_range(0.0..2.0 * PI);
    Motion::new(theta.cos() * distance, theta.sin() * distance)
}

/// Drives a freshly created robot through `steps - 1` sense/move cycles with a constant step
/// length. Whenever a move would leave the world a new random heading is chosen.
pub fn generate_trajectory<R: Rng>(
    robot_parameters: RobotParameters,
    parameters: TrajectoryParameters,
    rng: &mut R,
) -> Result<SimulationRun> {
    let distance = parameters.step_distance;
    if !(distance.is_finite() && distance >= 0.0) {
        return Err(SimulatorError::InvalidStepDistance(distance));
    }

    let attempts = parameters.max_attempts.max(1);

    for attempt in 1..=attempts {
        let mut robot = Robot::with_rng(robot_parameters, &mut *rng)?;
        robot.generate_landmarks(parameters.num_landmarks);

        let mut seen = vec![false; robot.num_landmarks()];
        let mut trajectory = Trajectory::new();
        let mut motion = random_heading(robot.rng(), distance);

        for step in 0..parameters.steps.saturating_sub(1) {
            let measurements = robot.sense();

            let mut headings = 1;
            while !robot.move_by(motion.dx, motion.dy) {
                if headings >= MAX_HEADINGS_PER_STEP {
                    return Err(SimulatorError::MoveAttemptsExhausted {
                        step,
                        attempts: headings,
                    });
                }
                motion = random_heading(robot.rng(), distance);
                headings += 1;
            }

            for m in &measurements {
                seen[m.landmark_index] = true;
            }
            trajectory.push(measurements, motion);
        }

        if parameters.require_full_coverage && seen.iter().any(|s| !s) {
            debug!("Attempt {attempt}: not all landmarks were observed, retrying");
            continue;
        }

        info!("Trajectory with {} steps generated", trajectory.len() + 1);
        info!("{robot}");

        return Ok(SimulationRun {
            world_size: robot.parameters().world_size,
            landmarks: robot.landmarks().to_vec(),
            trajectory,
            final_position: [robot.x(), robot.y()],
        });
    }

    Err(SimulatorError::IncompleteCoverage { attempts })
}
