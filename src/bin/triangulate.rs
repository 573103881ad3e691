//! `triangulate`: triangulate scattered points, grid them, or write their
//! edges, polygons, index table or Voronoi diagram.
//!
//! Input records are read from the files given on the command line, or from
//! standard input when none are given. Records go to standard output and
//! diagnostics to standard error.

use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use trigrid::core::config::{Axis, TriangulateOptions};
use trigrid::core::grid::{Region, Registration};
use trigrid::core::pipeline::{Pipeline, TriangulateError};
use trigrid::io::records::PointReader;

/// Delaunay triangulation, gridding and Voronoi edges of scattered points
#[derive(Parser, Debug)]
#[command(name = "triangulate")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Triangulate scattered points and grid or segment the result", long_about = None)]
struct Cli {
    /// Input files of x y [z] [h v] records (default: standard input)
    inputs: Vec<PathBuf>,

    /// Grid the partial derivative along x or y instead of the value
    #[arg(short = 'D', value_name = "x|y")]
    derivative: Option<Axis>,

    /// Value for grid nodes outside every triangle (number or NaN)
    #[arg(short = 'E', value_name = "VALUE", value_parser = parse_empty_value)]
    empty_value: Option<f64>,

    /// Write the gridded triangulation to this ESRI ASCII grid file
    #[arg(short = 'G', value_name = "FILE")]
    grid_output: Option<PathBuf>,

    /// Grid spacing dx[/dy]
    #[arg(short = 'I', value_name = "dx[/dy]", value_parser = parse_increment)]
    increment: Option<[f64; 2]>,

    /// Region west/east/south/north
    #[arg(short = 'R', value_name = "w/e/s/n", value_parser = parse_region)]
    region: Option<Region>,

    /// Use pixel registration instead of gridline registration
    #[arg(short = 'r')]
    pixel: bool,

    /// Write the unique triangle edges as segments
    #[arg(short = 'M')]
    edges: bool,

    /// Write the triangle vertex index table
    #[arg(short = 'N')]
    index_table: bool,

    /// Write the Voronoi edges instead of the triangulation
    #[arg(short = 'Q')]
    voronoi: bool,

    /// Write each triangle as a polygon segment
    #[arg(short = 'S')]
    polygons: bool,

    /// Slope grid (radians); grid propagated uncertainty from x y z h v records
    #[arg(short = 'u', value_name = "FILE")]
    slope_grid: Option<PathBuf>,

    /// Records carry an elevation column
    #[arg(short = 'Z')]
    elevation: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

impl Cli {
    fn options(&self) -> TriangulateOptions {
        TriangulateOptions {
            derivative: self.derivative,
            empty_value: self.empty_value,
            grid_output: self.grid_output.clone(),
            increment: self.increment,
            region: self.region,
            registration: if self.pixel {
                Registration::Pixel
            } else {
                Registration::Gridline
            },
            edges: self.edges,
            index_table: self.index_table,
            polygons: self.polygons,
            voronoi: self.voronoi,
            elevation: self.elevation,
            slope_grid: self.slope_grid.clone(),
        }
    }
}

fn parse_empty_value(s: &str) -> Result<f64, String> {
    if s.starts_with(['N', 'n']) {
        return Ok(f64::NAN);
    }
    s.parse().map_err(|_| format!("expected a number or NaN, got {s:?}"))
}

fn parse_increment(s: &str) -> Result<[f64; 2], String> {
    let parse = |v: &str| {
        v.parse::<f64>()
            .map_err(|_| format!("expected dx[/dy], got {s:?}"))
    };
    match s.split_once('/') {
        Some((dx, dy)) => Ok([parse(dx)?, parse(dy)?]),
        None => {
            let d = parse(s)?;
            Ok([d, d])
        }
    }
}

/// Parses the four bounds; ordering is checked later with the other options.
fn parse_region(s: &str) -> Result<Region, String> {
    let bounds: Vec<f64> = s
        .split('/')
        .map(str::parse)
        .collect::<Result<_, _>>()
        .map_err(|_| format!("expected w/e/s/n, got {s:?}"))?;
    match bounds[..] {
        [west, east, south, north] => Ok(Region {
            west,
            east,
            south,
            north,
        }),
        _ => Err(format!("expected four bounds w/e/s/n, got {s:?}")),
    }
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<(), TriangulateError> {
    let plan = cli.options().plan()?;

    tracing::info!("Processing input table data");
    let mut reader = PointReader::new(plan.layout);
    if cli.inputs.is_empty() {
        reader.read("<stdin>", io::stdin().lock())?;
    } else {
        for path in &cli.inputs {
            reader.read_path(path)?;
        }
    }

    let products = Pipeline::new(plan).run(reader.finish())?;
    products.write(BufWriter::new(io::stdout().lock()))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err}");
            ExitCode::from(err.status().exit_code())
        }
    }
}
