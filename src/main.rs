use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{info, warn};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use lj_landscape::analysis::normalmodes::{self, ModeAnimation, NormalMode, PathFrame};
use lj_landscape::core::domain::{
    Configuration, PotentialKind, PotentialParams, DEFAULT_NUMERICAL_STEP,
};
use lj_landscape::engine::evaluator::{self, DerivativeCheck, Evaluation};
use lj_landscape::engine::neighbor_list::NeighborList;

// --- CLI Definitions ---

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Evaluate Lennard-Jones energies, gradients and Hessians",
    long_about = None
)]
struct Args {
    /// JSON file with a flat coordinate array [x0, y0, z0, x1, ...]
    #[arg(short, long, conflicts_with = "random")]
    coords: Option<PathBuf>,

    /// Generate a random configuration with this many atoms instead
    #[arg(short, long)]
    random: Option<usize>,

    /// Seed for --random
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Half-width of the box used by --random
    #[arg(long, default_value_t = 2.0)]
    box_size: f64,

    /// JSON file with potential parameters (kind, c6, c12, rcut, neighbor_list)
    #[arg(short, long)]
    params: Option<PathBuf>,

    /// Override C6
    #[arg(long)]
    c6: Option<f64>,

    /// Override C12
    #[arg(long)]
    c12: Option<f64>,

    /// Truncate the potential at this radius
    #[arg(long)]
    rcut: Option<f64>,

    /// Evaluate only pairs within this radius of the input geometry
    #[arg(long, conflicts_with = "rcut")]
    neighbor_radius: Option<f64>,

    /// Compare analytic derivatives against finite differences
    #[arg(long)]
    check: bool,

    /// Print Hessian eigenvalues
    #[arg(long)]
    modes: bool,

    /// Animate the normal mode with this index (ascending eigenvalue order)
    #[arg(long)]
    mode: Option<usize>,

    /// Number of frames along the animated mode
    #[arg(long, default_value_t = 30)]
    nframes: usize,

    /// Displacement amplitude along the animated mode
    #[arg(long, default_value_t = 1.0)]
    amplitude: f64,

    /// Sweep one sine period instead of a linear ramp
    #[arg(long)]
    oscillate: bool,

    /// Keep rigid-body translations and rotations in the animated mode
    #[arg(long)]
    keep_zero_modes: bool,

    /// Emit a JSON report instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct Report {
    natoms: usize,
    params: PotentialParams,
    evaluation: Evaluation,
    check: Option<DerivativeCheck>,
    modes: Option<Vec<NormalMode>>,
    path: Option<ModePath>,
}

#[derive(Debug, Serialize)]
struct ModePath {
    index: usize,
    eigenvalue: f64,
    frames: Vec<PathFrame>,
}

// --- Initialization Helpers ---

fn load_configuration(args: &Args) -> Result<Configuration> {
    match (&args.coords, args.random) {
        (Some(path), _) => {
            let text = read(path)?;
            let coords: Vec<f64> = serde_json::from_str(&text)
                .with_context(|| format!("Failed to parse coordinates in {}", path.display()))?;
            Ok(Configuration::new(coords)?)
        }
        (None, Some(natoms)) => {
            let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
            let box_size = args.box_size;
            Configuration::new_random(natoms, box_size, 0.9, &mut rng).with_context(|| {
                format!("Could not place {natoms} atoms in a box of half-width {box_size}")
            })
        }
        (None, None) => bail!("Either --coords or --random is required"),
    }
}

fn load_params(args: &Args, x: &[f64]) -> Result<PotentialParams> {
    let mut params = match &args.params {
        Some(path) => serde_json::from_str::<PotentialParams>(&read(path)?)
            .with_context(|| format!("Failed to parse parameters in {}", path.display()))?,
        None => PotentialParams::default(),
    };

    if let Some(c6) = args.c6 {
        params.c6 = c6;
    }
    if let Some(c12) = args.c12 {
        params.c12 = c12;
    }
    if let Some(rcut) = args.rcut {
        params.kind = PotentialKind::Cutoff;
        params.rcut = Some(rcut);
    }
    if let Some(radius) = args.neighbor_radius {
        let neighbors = NeighborList::within_cutoff(x, radius)?;
        if neighbors.is_empty() {
            warn!("No pairs within {radius}; energy will be zero");
        }
        params.kind = PotentialKind::NeighborList;
        params.neighbor_list = Some(neighbors.to_flat());
    }
    Ok(params)
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn print_text(report: &Report) {
    println!("atoms:        {}", report.natoms);
    println!("potential:    {:?}", report.params.kind);
    println!("energy:       {:.12}", report.evaluation.energy);
    println!("rms gradient: {:.6e}", report.evaluation.rms_gradient);

    if let Some(check) = &report.check {
        println!("energy spread across orders: {:.3e}", check.energy_spread());
        println!("max |g - g_num|: {:.3e}", check.max_gradient_error);
        println!("max |H - H_num|: {:.3e}", check.max_hessian_error);
    }
    if let Some(modes) = &report.modes {
        println!("hessian eigenvalues:");
        for (k, mode) in modes.iter().enumerate() {
            println!("  {:>4} {:>16.8e}", k, mode.eigenvalue);
        }
    }
    if let Some(path) = &report.path {
        println!(
            "mode {} (eigenvalue {:.8e}), {} frames:",
            path.index,
            path.eigenvalue,
            path.frames.len()
        );
        for (k, frame) in path.frames.iter().enumerate() {
            println!("  {:>4} energy={:.12}", k, frame.energy);
        }
    }
}

// --- Main ---

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = load_configuration(&args)?;
    let x = config.as_slice();
    let params = load_params(&args, x)?;
    let potential = params.build().context("Failed to build potential")?;
    info!(
        "Evaluating {} atoms with {:?} potential",
        config.natoms(),
        params.kind
    );

    let evaluation = evaluator::evaluate(potential.as_ref(), x)?;

    let check = if args.check {
        Some(evaluator::check_derivatives(potential.as_ref(), x, DEFAULT_NUMERICAL_STEP)?)
    } else {
        None
    };

    let spectrum = if args.modes || args.mode.is_some() {
        let (_, _, hess) = potential.evaluate_hessian(x)?;
        Some(normalmodes::normal_modes(&hess, x.len())?)
    } else {
        None
    };

    let path = match (args.mode, &spectrum) {
        (Some(index), Some(spectrum)) => {
            let Some(mode) = spectrum.get(index) else {
                bail!(
                    "Mode {index} out of range, configuration has {} modes",
                    spectrum.len()
                );
            };
            let animation = ModeAnimation {
                amplitude: args.amplitude,
                nframes: args.nframes,
                remove_zero_modes: !args.keep_zero_modes,
                oscillate: args.oscillate,
            };
            let frames = animation.frames(potential.as_ref(), x, &mode.vector)?;
            Some(ModePath {
                index,
                eigenvalue: mode.eigenvalue,
                frames,
            })
        }
        _ => None,
    };
    let modes = if args.modes { spectrum } else { None };

    let report = Report {
        natoms: config.natoms(),
        params,
        evaluation,
        check,
        modes,
        path,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_text(&report);
    }
    Ok(())
}
