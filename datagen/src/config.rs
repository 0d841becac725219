use std::{fs, path::Path};

use anyhow::{anyhow, Context};
use rand::{rngs::StdRng, SeedableRng};
use serde::Deserialize;
use simulator::{RobotParameters, TrajectoryParameters};

#[derive(Debug, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub robot: RobotParameters,

    pub trajectory: TrajectoryParameters,

    /// Seed for the random source, omit it to get a different dataset on every run.
    pub seed: Option<u64>,

    /// Log a text drawing of the world once the dataset is generated.
    pub render: bool,
}

impl Config {
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();

        // read file contents
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Could not read config file {}", path.display()))?;

        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> anyhow::Result<Self> {
        let config: Config = serde_yaml::from_str(contents).map_err(|e| anyhow!(e))?;
        config.robot.validate()?;
        Ok(config)
    }

    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}
