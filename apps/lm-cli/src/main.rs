use clap::{Parser, Subcommand};
use lm_core::units::{kph, to_mps};
use lm_sim::{
    Maneuver, ManeuverRecord, SimError, SimOptions, builtin_maneuvers, load_maneuvers_yaml,
    reference_stop, run_maneuver,
};
use lm_solver::{CostWeights, SolverError};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lm-cli")]
#[command(about = "Longitudinal MPC - closed-loop car-following maneuvers", long_about = None)]
struct Cli {
    /// YAML file with cost weights (ttc, distance, acceleration, jerk)
    #[arg(long, global = true)]
    costs: Option<PathBuf>,
    /// Accumulate and log solve timings
    #[arg(long, global = true)]
    timing: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List built-in maneuvers
    Maneuvers,
    /// Run built-in maneuvers
    Run {
        /// Run only the maneuver with this index
        #[arg(short, long)]
        index: Option<usize>,
        /// Write per-tick samples as CSV
        #[arg(long)]
        csv: Option<PathBuf>,
        /// Write the full record as JSON
        #[arg(long)]
        json: Option<PathBuf>,
    },
    /// Run maneuvers from a YAML file
    RunFile {
        /// Path to the maneuvers YAML file
        path: PathBuf,
        /// Write per-tick samples as CSV
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Approach a stopped car and report the stopping distance
    Stop {
        /// Initial ego speed (m/s)
        #[arg(long, default_value_t = 20.0)]
        v_ego: f64,
        /// Distance to the stopped car (m)
        #[arg(long, default_value_t = 200.0)]
        x_lead: f64,
        /// Number of 0.2 s ticks
        #[arg(long, default_value_t = 150)]
        steps: usize,
        /// Read --v-ego in km/h
        #[arg(long = "kph")]
        in_kph: bool,
    },
}

#[derive(Error, Debug)]
enum CliError {
    #[error("{0}")]
    Sim(#[from] SimError),

    #[error("Invalid cost weights: {0}")]
    Weights(#[from] SolverError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(String),

    #[error("No maneuver with index {index} ({count} available)")]
    NoSuchManeuver { index: usize, count: usize },
}

type CliResult<T> = Result<T, CliError>;

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    if cli.timing {
        lm_core::timing::enable_timing();
    }
    let weights = load_weights(cli.costs.as_deref())?;
    debug!(?weights, "cost weights");

    match cli.command {
        Commands::Maneuvers => cmd_maneuvers(),
        Commands::Run { index, csv, json } => {
            let all = builtin_maneuvers();
            let selected = match index {
                Some(i) => {
                    let count = all.len();
                    let m = all
                        .into_iter()
                        .nth(i)
                        .ok_or(CliError::NoSuchManeuver { index: i, count })?;
                    vec![m]
                }
                None => all,
            };
            cmd_run(&selected, weights, csv.as_deref(), json.as_deref())
        }
        Commands::RunFile { path, csv } => {
            let maneuvers = load_maneuvers_yaml(&path)?;
            cmd_run(&maneuvers, weights, csv.as_deref(), None)
        }
        Commands::Stop {
            v_ego,
            x_lead,
            steps,
            in_kph,
        } => {
            let v_ego = if in_kph { to_mps(kph(v_ego)) } else { v_ego };
            cmd_stop(v_ego, x_lead, steps, weights)
        }
    }
}

fn load_weights(path: Option<&Path>) -> CliResult<CostWeights> {
    let Some(path) = path else {
        return Ok(CostWeights::default());
    };
    let content = std::fs::read_to_string(path)?;
    let weights: CostWeights = serde_yaml::from_str(&content)?;
    weights.validate()?;
    Ok(weights)
}

fn cmd_maneuvers() -> CliResult<()> {
    for (i, m) in builtin_maneuvers().iter().enumerate() {
        println!("{:2}  {} ({:.0} s)", i, m.title, m.duration);
    }
    Ok(())
}

fn cmd_run(
    maneuvers: &[Maneuver],
    weights: CostWeights,
    csv: Option<&Path>,
    json: Option<&Path>,
) -> CliResult<()> {
    let opts = SimOptions::default();
    let single = maneuvers.len() == 1;
    let mut failures = 0;

    for (i, maneuver) in maneuvers.iter().enumerate() {
        let record = run_maneuver(maneuver, weights, &opts)?;
        print_summary(i, &record);
        if record.summary.collided || record.summary.invalid_ticks > 0 {
            failures += 1;
        }

        if let Some(path) = csv {
            let path = numbered_path(path, i, single);
            std::fs::write(&path, record.to_csv())?;
            println!("    wrote {}", path.display());
        }
        if let Some(path) = json {
            let path = numbered_path(path, i, single);
            let content = record.to_json().map_err(|e| CliError::Json(e.to_string()))?;
            std::fs::write(&path, content)?;
            println!("    wrote {}", path.display());
        }
    }

    println!("\n{} of {} maneuvers clean", maneuvers.len() - failures, maneuvers.len());
    Ok(())
}

fn print_summary(index: usize, record: &ManeuverRecord) {
    let s = &record.summary;
    let status = if s.collided {
        "COLLISION"
    } else if s.invalid_ticks > 0 {
        "FALLBACK"
    } else {
        "ok"
    };
    println!("[{:2}] {} - {}", index, record.title, status);
    println!(
        "    min gap {:.2} m, final gap {:.2} m, final speed {:.2} m/s, min accel {:.2} m/s^2",
        s.min_gap, s.final_gap, s.final_speed, s.min_accel
    );
    match s.first_brake_time {
        Some(t) => println!("    first braking at {:.1} s", t),
        None => println!("    never braked"),
    }
    if s.invalid_ticks > 0 {
        println!("    {} invalid plans of {} ticks", s.invalid_ticks, s.ticks);
    }
}

/// `out.csv` -> `out_03.csv` when several records share one target.
fn numbered_path(path: &Path, index: usize, single: bool) -> PathBuf {
    if single {
        return path.to_path_buf();
    }
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{}_{:02}.{}", stem, index, ext.to_string_lossy()),
        None => format!("{}_{:02}", stem, index),
    };
    path.with_file_name(name)
}

fn cmd_stop(v_ego: f64, x_lead: f64, steps: usize, weights: CostWeights) -> CliResult<()> {
    let report = reference_stop(v_ego, x_lead, steps, weights)?;
    println!(
        "Stopping from {:.1} m/s with a stopped car {:.1} m ahead",
        report.initial_speed, report.initial_distance
    );
    println!("  stopping distance: {:.2} m", report.stopping_distance);
    println!("  final gap:         {:.2} m", report.final_gap);
    println!("  final speed:       {:.3} m/s", report.final_speed);
    if !report.all_valid {
        println!("  warning: controller produced invalid plans");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbered_paths() {
        let p = Path::new("out/run.csv");
        assert_eq!(numbered_path(p, 3, true), PathBuf::from("out/run.csv"));
        assert_eq!(numbered_path(p, 3, false), PathBuf::from("out/run_03.csv"));
        assert_eq!(
            numbered_path(Path::new("run"), 0, false),
            PathBuf::from("run_00")
        );
    }

    #[test]
    fn cli_parses_global_costs() {
        let cli = Cli::try_parse_from(["lm-cli", "run", "--index", "2", "--costs", "w.yaml"]).unwrap();
        assert_eq!(cli.costs, Some(PathBuf::from("w.yaml")));
        assert!(matches!(cli.command, Commands::Run { index: Some(2), .. }));
    }

    #[test]
    fn stop_defaults() {
        let cli = Cli::try_parse_from(["lm-cli", "stop", "--kph"]).unwrap();
        match cli.command {
            Commands::Stop {
                v_ego,
                x_lead,
                steps,
                in_kph,
            } => {
                assert_eq!((v_ego, x_lead, steps), (20.0, 200.0, 150));
                assert!(in_kph);
            }
            _ => panic!("expected stop"),
        }
    }
}
