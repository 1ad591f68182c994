//! Collision probe
//!
//! Loads a scenario file (`.ron` or `.toml`), runs every case through the
//! collision kernel and logs the outcome. Exits with an error when any
//! expectation in the file is not met.
//!
//! ```text
//! RUST_LOG=info collision_probe scenarios/basic.ron
//! ```

use collision_kernel::foundation::logging;
use collision_kernel::scenario::Scenario;

#[derive(thiserror::Error, Debug)]
enum ProbeError {
    #[error("usage: collision_probe <scenario.ron|scenario.toml>")]
    MissingPath,

    #[error("{failed} of {total} cases did not match their expectation")]
    Mismatch { failed: usize, total: usize },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_with_default("info");

    let path = std::env::args().nth(1).ok_or(ProbeError::MissingPath)?;
    log::info!("Loading scenario from {path}");
    let scenario = Scenario::load(&path)?;

    let report = scenario.run()?;
    for case in &report.cases {
        if let Some(normal) = case.normal {
            log::debug!("{}: normal ({:.4}, {:.4}, {:.4})", case.name, normal.x, normal.y, normal.z);
        }
    }

    let failed = report.failures();
    if failed > 0 {
        log::warn!("Scenario '{}': {failed} mismatches", scenario.name);
        return Err(ProbeError::Mismatch { failed, total: report.cases.len() }.into());
    }
    log::info!("Scenario '{}': all {} cases ran clean", scenario.name, report.cases.len());
    Ok(())
}
