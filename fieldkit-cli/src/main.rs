use clap::{Parser, Subcommand};
use fieldkit_core::{
    create_field_file, Context, Force, ForceLookup, Gravity, GridSpec, SpeciesTable,
    TableSampler,
};
use glam::DVec3;
use log::info;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "fieldkit")]
#[command(about = "Sample force fields onto multi-resolution lookup tables", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sample uniform gravity onto a fine and a coarse grid and write a table file
    Create {
        /// Output table file
        #[arg(long)]
        out: PathBuf,

        /// Gravitational acceleration as gx,gy,gz
        #[arg(long, default_value = "0,0,-9.81", value_parser = parse_vec3, allow_hyphen_values = true)]
        gravity: DVec3,

        /// Particle mass used for the potential
        #[arg(long, default_value_t = 1.0)]
        mass: f64,

        /// Fine region as MIN,MAX,STEP on every axis
        #[arg(long, default_value = "-20,20,5", value_parser = parse_cube, allow_hyphen_values = true)]
        fine: Cube,

        /// Coarse region as MIN,MAX,STEP on every axis
        #[arg(long, default_value = "-100,100,20", value_parser = parse_cube, allow_hyphen_values = true)]
        coarse: Cube,
    },
    /// Print acceleration and potential from a table file at one point
    #[command(allow_negative_numbers = true)]
    Probe {
        /// Table file written by `create`
        file: PathBuf,
        x: f64,
        y: f64,
        z: f64,

        /// Species index
        #[arg(long, default_value_t = 0)]
        species: usize,
    },
}

#[derive(Debug, Clone, Copy)]
struct Cube {
    min: f64,
    max: f64,
    step: f64,
}

fn parse_numbers<const K: usize>(s: &str) -> Result<[f64; K], String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() != K {
        return Err(format!("expected {} comma-separated numbers, got '{}'", K, s));
    }
    let mut out = [0.0; K];
    for (o, p) in out.iter_mut().zip(&parts) {
        *o = p.parse().map_err(|_| format!("invalid number '{}'", p))?;
    }
    Ok(out)
}

fn parse_vec3(s: &str) -> Result<DVec3, String> {
    parse_numbers::<3>(s).map(DVec3::from_array)
}

fn parse_cube(s: &str) -> Result<Cube, String> {
    let [min, max, step] = parse_numbers::<3>(s)?;
    Ok(Cube { min, max, step })
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Create {
            out,
            gravity,
            mass,
            fine,
            coarse,
        } => create(&out, gravity, mass, fine, coarse),
        Commands::Probe {
            file,
            x,
            y,
            z,
            species,
        } => probe(&file, DVec3::new(x, y, z), species),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn create(
    out: &Path,
    g: DVec3,
    mass: f64,
    fine: Cube,
    coarse: Cube,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut db = SpeciesTable::new();
    db.add("particle", mass);

    let gravity = Gravity::with_context(g, Context::new(&db));
    let sampler: TableSampler<_> = TableSampler::new(gravity);
    let spec = GridSpec::two_level(
        DVec3::splat(fine.min),
        DVec3::splat(fine.max),
        DVec3::splat(fine.step),
        DVec3::splat(coarse.min),
        DVec3::splat(coarse.max),
        DVec3::splat(coarse.step),
    )?;

    let table = create_field_file(&sampler, &spec, out)?;
    for (i, region) in table.regions().enumerate() {
        let [nx, ny, nz] = region.counts();
        info!(
            "region {}: {:?} to {:?}, {}x{}x{} samples",
            i,
            region.min,
            region.upper(),
            nx,
            ny,
            nz
        );
    }
    println!("wrote {}", out.display());
    Ok(())
}

fn probe(file: &Path, r: DVec3, species: usize) -> Result<(), Box<dyn std::error::Error>> {
    let lookup: ForceLookup<()> = ForceLookup::load(file)?;
    let a = lookup.accel(r, DVec3::ZERO, 0.0, 0.0, species)?;
    let v = lookup.potential(r, DVec3::ZERO, 0.0, species)?;
    println!("accel = {} {} {}", a.x, a.y, a.z);
    println!("potential = {}", v);
    Ok(())
}
