#![warn(clippy::all, rust_2018_idioms)]

use std::io::Write;

use datagen::config::Config;
use simulator::generate_trajectory;
use tracing::info;

fn main() -> anyhow::Result<()> {
    // Log to stderr, stdout carries the generated dataset.
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    // load configuration file
    let mut args = std::env::args();
    let config = match args.nth(1) {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    let mut rng = config.rng();
    let run = generate_trajectory(config.robot, config.trajectory, &mut rng)?;

    info!(
        "Generated {} records observing {} landmarks",
        run.trajectory.len(),
        run.landmarks.len()
    );

    if config.render {
        info!("World at the end of the run:\n{}", run.snapshot().render());
    }

    let mut stdout = std::io::stdout().lock();
    serde_yaml::to_writer(&mut stdout, &run)?;
    stdout.flush()?;

    Ok(())
}
