//! Foil Polar Tool
//!
//! Run with: `cargo run --bin foil_polar -- curves.json --curve main`
//!
//! Loads a curve library, prints the Cl/Cd/Cm polar of one curve and the
//! force it produces on a sample foil section at a given apparent wind.
//!
//! ```bash
//! # Full polar in 5° steps
//! foil_polar curves.json --curve main --step 5
//!
//! # Sample foil: 1.5 m chord, 6 m², 8 m/s at 12° in air
//! foil_polar curves.json --curve main --chord 1.5 --area 6 --speed 8 --angle 12
//! ```

use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use tracing::{Level, info, warn};
use tracing_subscriber::FmtSubscriber;

use sail_physics::aero::{AIR_DENSITY, CurveLibrary, Foil, SEA_WATER_DENSITY};
use sail_physics::physics::{ChordLine, DVec2};

/// Print aerodynamic curve polars and sample foil forces
#[derive(Parser, Debug)]
#[command(name = "foil_polar")]
#[command(version, about = "Aerodynamic curve polar and foil force tool", long_about = None)]
struct Cli {
    /// Curve library JSON file (`{ "name": curve, ... }`)
    library: PathBuf,

    /// Curve to inspect; defaults to the first name in sorted order
    #[arg(short, long)]
    curve: Option<String>,

    /// Polar step (degrees)
    #[arg(short, long, default_value = "10")]
    step: f64,

    /// Sample foil chord length (meters)
    #[arg(long, default_value = "1.0")]
    chord: f64,

    /// Sample foil reference area (square meters)
    #[arg(long, default_value = "1.0")]
    area: f64,

    /// Apparent flow speed (m/s)
    #[arg(long, default_value = "5.0")]
    speed: f64,

    /// Angle of attack of the sample flow (degrees)
    #[arg(long, default_value = "10.0")]
    angle: f64,

    /// Use sea water density instead of air
    #[arg(long)]
    water: bool,

    /// Logging verbosity level
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let log_level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let json = std::fs::read_to_string(&cli.library)?;
    let library = CurveLibrary::from_json(&json)?;
    info!(curves = library.len(), path = %cli.library.display(), "loaded curve library");

    let name = match cli.curve.clone().or_else(|| library.names().first().map(|n| n.to_string())) {
        Some(name) => name,
        None => {
            warn!("curve library is empty");
            return Ok(());
        }
    };
    let curve = library
        .get(&name)
        .ok_or_else(|| sail_physics::ConfigError::UnknownCurve(name.clone()))?;

    println!("# {name}");
    println!("{:>8} {:>9} {:>9} {:>9}  cm kind", "alpha", "cl", "cd", "cm");
    for (angle, c) in curve.polar(cli.step) {
        let kind = if c.cm_is_chord_fraction { "chord" } else { "coef" };
        println!("{angle:>8.1} {:>9.4} {:>9.4} {:>9.4}  {kind}", c.cl, c.cd, c.cm);
    }

    let foil = Foil::new(
        ChordLine::new(DVec2::ZERO, DVec2::new(cli.chord, 0.0)),
        0.0,
        cli.area,
        curve,
    );
    let rho = if cli.water { SEA_WATER_DENSITY } else { AIR_DENSITY };
    let alpha = cli.angle.to_radians();
    let flow = DVec2::new(alpha.cos(), alpha.sin()) * cli.speed;
    let force = foil.calc_force(rho, flow);

    println!();
    println!(
        "sample foil: chord {:.2} m, area {:.2} m², {:.2} m/s at {:.1}°, rho {:.3}",
        cli.chord, cli.area, cli.speed, cli.angle, rho
    );
    println!("  q            {:>10.2} Pa", force.dynamic_pressure);
    println!("  lift         {:>10.2} N", force.lift);
    println!("  drag         {:>10.2} N", force.drag);
    println!("  induced drag {:>10.2} N", force.induced_drag);
    println!("  force        ({:.2}, {:.2}) N", force.force.x, force.force.y);
    println!("  moment (LE)  {:>10.2} N·m", force.moment);

    Ok(())
}
