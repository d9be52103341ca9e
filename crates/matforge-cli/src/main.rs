mod logging;

use clap::{Parser, Subcommand, ValueEnum};
use matforge_expr::{DenseStorage, SparseStorage, Storage};
use matforge_highs::HighsSolver;
use matforge_net::{
    Construction, FieldArithmetic, GfMatrix, Orchestrator, OrchestratorConfig, Program, Registry,
    parse_matrices, same_size,
};
use matforge_solver::SolverConfig;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

type BoxError = Box<dyn std::error::Error>;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Build generator matrices of digital nets with integer programming"
)]
struct Cli {
    /// Log filter (overrides MATFORGE_TRACE)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Construct matrices for a program and print them
    Solve(SolveArgs),
    /// Write the model of the next row for previously built matrices
    Export(ExportArgs),
}

#[derive(Parser, Debug)]
struct SolveArgs {
    /// Program file
    #[arg(short = 'i', long)]
    input: PathBuf,

    /// Output file (stdout when omitted)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Override the target row count
    #[arg(short = 'm', long = "rows")]
    rows: Option<usize>,

    /// Override the number of dimensions
    #[arg(short = 's', long = "dimensions")]
    dimensions: Option<usize>,

    /// Override the base
    #[arg(short = 'b', long)]
    base: Option<u32>,

    /// Attempts before giving up
    #[arg(short = 'n', long, default_value_t = 50)]
    trials: u32,

    /// Failed steps tolerated per attempt
    #[arg(long, default_value_t = 15)]
    backtracks: u32,

    /// Solver threads (0 = solver default)
    #[arg(long, default_value_t = 0)]
    threads: u32,

    /// Relative objective gap accepted by the solver
    #[arg(long, default_value_t = 0.01)]
    tolerance: f64,

    /// Time limit per solve, in seconds
    #[arg(short = 't', long, default_value_t = 1e10)]
    timeout: f64,

    #[arg(long, default_value_t = OrchestratorConfig::DEFAULT_SEED)]
    seed: u64,

    /// Disable the seeded tie-break objective
    #[arg(long)]
    no_seed: bool,

    /// Prefix the output with the program as comment lines
    #[arg(long)]
    header: bool,

    #[arg(long, value_enum, default_value = "sparse")]
    storage: StorageKind,

    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Parser, Debug)]
struct ExportArgs {
    /// Program file
    #[arg(short = 'i', long)]
    input: PathBuf,

    /// Matrices built so far, in `solve` text format
    #[arg(long)]
    matrices: PathBuf,

    /// Output file (stdout when omitted)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    #[arg(long, value_enum, default_value = "lp")]
    format: ExportFormat,

    #[arg(long, default_value_t = OrchestratorConfig::DEFAULT_SEED)]
    seed: u64,

    /// Disable the seeded tie-break objective
    #[arg(long)]
    no_seed: bool,

    #[arg(long, value_enum, default_value = "sparse")]
    storage: StorageKind,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, ValueEnum)]
enum StorageKind {
    Sparse,
    Dense,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, ValueEnum)]
enum ExportFormat {
    Lp,
    Mps,
}

/// Machine-readable result of `solve --format json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SolveReport {
    complete: bool,
    dimensions: usize,
    base: u32,
    target_rows: usize,
    rows_reached: usize,
    restarts: u32,
    backtracks: u32,
    seed: u64,
    matrices: Vec<Vec<Vec<u32>>>,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), BoxError> {
    let cli = Cli::parse();
    logging::init(cli.log_level.as_deref())?;
    match cli.command {
        Command::Solve(args) => match args.storage {
            StorageKind::Sparse => solve_command::<SparseStorage>(&args),
            StorageKind::Dense => solve_command::<DenseStorage>(&args),
        },
        Command::Export(args) => match args.storage {
            StorageKind::Sparse => export_command::<SparseStorage>(&args),
            StorageKind::Dense => export_command::<DenseStorage>(&args),
        },
    }
}

fn solve_command<S: Storage + 'static>(args: &SolveArgs) -> Result<(), BoxError> {
    let text = fs::read_to_string(&args.input)?;
    let program = apply_overrides(Program::<S>::parse(&text, &Registry::new())?, args);
    let seed = args.seed;

    let solver = HighsSolver::new(solver_config(args));
    let mut orchestrator: Orchestrator<S, HighsSolver> =
        Orchestrator::new(solver, orchestrator_config(args));
    let started = Instant::now();
    let construction = orchestrator.construct(&program)?;
    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;

    if construction.is_complete() {
        info!(
            component = "cli",
            operation = "solve",
            status = "success",
            rows = construction.rows_reached,
            restarts = construction.restarts,
            backtracks = construction.backtracks,
            seed,
            elapsed_ms,
            "Construction finished"
        );
    } else {
        warn!(
            component = "cli",
            operation = "solve",
            status = "incomplete",
            rows_reached = construction.rows_reached,
            target_rows = construction.target_rows,
            restarts = construction.restarts,
            seed,
            elapsed_ms,
            "Construction gave up"
        );
    }

    let rendered = match args.format {
        OutputFormat::Text => {
            let header = args.header.then(|| program.to_string());
            render_text(&construction.matrices, header.as_deref())
        }
        OutputFormat::Json => {
            let report = build_report(&construction, &program, seed);
            let mut json = serde_json::to_string_pretty(&report)?;
            json.push('\n');
            json
        }
    };
    write_output(args.output.as_deref(), &rendered)?;

    construction.into_matrices()?;
    Ok(())
}

fn export_command<S: Storage + 'static>(args: &ExportArgs) -> Result<(), BoxError> {
    let text = fs::read_to_string(&args.input)?;
    let program = Program::<S>::parse(&text, &Registry::new())?;
    let matrices = fs::read_to_string(&args.matrices)?;
    let name = args
        .output
        .as_ref()
        .map_or_else(|| "matforge".to_string(), |path| path.display().to_string());

    let rendered = export_model(
        &program,
        &matrices,
        tie_break_config(args.seed, args.no_seed),
        args.format,
        &name,
    )?;
    write_output(args.output.as_deref(), &rendered)?;
    Ok(())
}

fn apply_overrides<S: Storage + 'static>(mut program: Program<S>, args: &SolveArgs) -> Program<S> {
    if let Some(dimensions) = args.dimensions {
        program = program.with_dimensions(dimensions);
    }
    if let Some(base) = args.base {
        program = program.with_base(base);
    }
    if let Some(rows) = args.rows {
        program = program.with_target_rows(rows);
    }
    program
}

/// `--no-seed` drops the tie-break objective; the seed itself is kept.
fn tie_break_config(seed: u64, no_seed: bool) -> OrchestratorConfig {
    OrchestratorConfig::new()
        .with_seed(seed)
        .with_tie_break(!no_seed)
}

fn solver_config(args: &SolveArgs) -> SolverConfig {
    SolverConfig::new()
        .with_time_limit(args.timeout)
        .with_mip_gap(args.tolerance)
        .with_threads(args.threads)
        .with_log_to_console(false)
}

fn orchestrator_config(args: &SolveArgs) -> OrchestratorConfig {
    tie_break_config(args.seed, args.no_seed)
        .with_greedy_fail_max(args.trials)
        .with_backtrack_max(args.backtracks)
}

/// Model for the row after `matrices`, as LP or MPS text.
///
/// An empty matrix file stands for no rows in every dimension. The sampler
/// skips one raw engine draw per committed entry before the model is built.
fn export_model<S: Storage + 'static>(
    program: &Program<S>,
    matrices_text: &str,
    config: OrchestratorConfig,
    format: ExportFormat,
    name: &str,
) -> Result<String, BoxError> {
    let field = program.validate()?;
    let dimensions = program.dimensions();

    let mut matrices = parse_matrices(matrices_text)?;
    if matrices.is_empty() {
        matrices = vec![GfMatrix::new(0); dimensions];
    }
    if matrices.len() != dimensions {
        return Err(boxed_input_error(&format!(
            "expected {dimensions} matrices, found {}",
            matrices.len()
        )));
    }
    if !same_size(&matrices) {
        return Err(boxed_input_error("matrices must all have the same size"));
    }
    for matrix in &matrices {
        matrix.check_entries(field.order())?;
    }

    let size = matrices.first().map_or(0, GfMatrix::size);
    let config = config.with_burn_in((size * matrices.len()) as u64);
    let mut orchestrator: Orchestrator<S, HighsSolver> =
        Orchestrator::new(HighsSolver::default(), config);
    let model = orchestrator.build_model(program, &field, &matrices, size + 1)?;

    let rendered = match format {
        ExportFormat::Lp => model.to_lp(name)?,
        ExportFormat::Mps => model.to_mps(name)?,
    };
    debug!(
        component = "cli",
        operation = "export",
        status = "success",
        step = size + 1,
        variables = model.num_variables(),
        constraints = model.num_constraints(),
        "Exported step model"
    );
    Ok(rendered)
}

/// Matrices separated by blank lines, optionally after the program as `# `
/// comments.
fn render_text(matrices: &[GfMatrix], header: Option<&str>) -> String {
    let mut out = String::new();
    if let Some(header) = header {
        for line in header.lines() {
            out.push_str("# ");
            out.push_str(line);
            out.push('\n');
        }
    }
    for matrix in matrices {
        out.push_str(&matrix.to_string());
        out.push('\n');
    }
    out
}

fn build_report<S: Storage>(construction: &Construction, program: &Program<S>, seed: u64) -> SolveReport {
    SolveReport {
        complete: construction.is_complete(),
        dimensions: program.dimensions(),
        base: program.base(),
        target_rows: construction.target_rows,
        rows_reached: construction.rows_reached,
        restarts: construction.restarts,
        backtracks: construction.backtracks,
        seed,
        matrices: construction
            .matrices
            .iter()
            .map(|matrix| {
                (0..matrix.size())
                    .filter_map(|row| matrix.row(row))
                    .map(<[u32]>::to_vec)
                    .collect()
            })
            .collect(),
    }
}

fn write_output(path: Option<&Path>, contents: &str) -> io::Result<()> {
    match path {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            let mut writer = BufWriter::new(File::create(path)?);
            writer.write_all(contents.as_bytes())?;
            writer.flush()
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle.write_all(contents.as_bytes())?;
            handle.flush()
        }
    }
}

fn boxed_input_error(message: &str) -> BoxError {
    Box::new(io::Error::new(
        io::ErrorKind::InvalidInput,
        message.to_string(),
    ))
}
