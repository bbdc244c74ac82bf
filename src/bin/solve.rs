//! Command-line front end for the sparse BiCGSTAB solver.
//!
//! Reads a CRS system from plain text files (dimensions, values, column
//! indices, row pointers, right-hand side), solves `A * x = b`, prints the
//! solve diagnostics, and writes the solution vector to a file with 12
//! significant digits, one value per line.
//!
//! The solution file is written even when the solver stops on breakdown or
//! the iteration budget, since the library always returns the best
//! available iterate; the exit code is nonzero in that case so scripted
//! callers can tell the difference.

use anyhow::{Context, Result, bail};
use clap::Parser;
use sparse_bicgstab::{
    SolveSession, SolverConfig, SolverStatus,
    utils::data_loader::{self, RawSystem},
};
use std::path::PathBuf;

/// Solves a sparse linear system given in compressed-row-storage text files.
#[derive(Parser, Debug)]
#[clap(name = "solve", about = "Solves A*x = b with unpreconditioned BiCGSTAB.")]
struct SolveArgs {
    /// File with the matrix dimensions: rows then cols.
    #[clap(long, default_value = "dimensions.txt")]
    dimensions: PathBuf,
    /// File with the nonzero values.
    #[clap(long, default_value = "values.txt")]
    values: PathBuf,
    /// File with the column index of each nonzero.
    #[clap(long, default_value = "column_indices.txt")]
    column_indices: PathBuf,
    /// File with the per-row offsets into the value array.
    #[clap(long, default_value = "row_pointers.txt")]
    row_pointers: PathBuf,
    /// File with the right-hand-side vector.
    #[clap(long, default_value = "rhs.txt")]
    rhs: PathBuf,
    /// Output file for the solution vector.
    #[clap(long, default_value = "solution.txt")]
    solution: PathBuf,
    /// Relative residual tolerance.
    #[clap(long, default_value_t = 1e-6)]
    tolerance: f64,
    /// Maximum number of iterations.
    #[clap(long, default_value_t = 1000)]
    max_iterations: usize,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = SolveArgs::parse();

    let RawSystem {
        rows,
        cols,
        values,
        column_indices,
        row_pointers,
        rhs,
    } = data_loader::load_system(
        &args.dimensions,
        &args.values,
        &args.column_indices,
        &args.row_pointers,
        &args.rhs,
    )
    .context("failed to load the CRS system")?;

    println!("Matrix size: {rows} x {cols}");
    println!("Number of non-zero elements: {}", values.len());

    let session = SolveSession::new(SolverConfig::new(args.tolerance, args.max_iterations));
    let report = session
        .solve(rows, cols, row_pointers, column_indices, values, rhs)
        .context("failed to solve the system")?;

    println!("Number of iterations: {}", report.iterations);
    println!("Solver status: {}", report.status);
    println!("Estimated error: {:e}", report.error_estimate);
    println!("Residual: {:e}", report.residual_norm);

    data_loader::write_solution(&args.solution, report.x.as_slice())
        .with_context(|| format!("failed to write {}", args.solution.display()))?;

    if report.status != SolverStatus::Converged {
        bail!("solver did not converge: {}", report.status);
    }
    Ok(())
}
