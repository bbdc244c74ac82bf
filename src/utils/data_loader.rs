//! This module provides utilities for loading CRS systems from text files
//! and writing the solution vector back.
//!
//! Each input file holds plain whitespace-separated numbers: a dimensions
//! file with the two matrix extents, one file per CRS array (`values`,
//! `column_indices`, `row_pointers`), and the right-hand side. Every failure
//! is reported as a [`DataLoaderError`] value propagated to the caller;
//! nothing here terminates the process.

use std::{
    fs::File,
    io::{self, BufRead, BufReader, BufWriter, Write},
    path::Path,
    str::FromStr,
};
use thiserror::Error;

/// Represents all possible errors that can occur during data loading and
/// writing.
#[derive(Error, Debug)]
pub enum DataLoaderError {
    /// Wraps a standard I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// Occurs when a token cannot be parsed into an integer.
    #[error("Parse error: Failed to parse integer from '{0}'")]
    ParseInt(String),
    /// Occurs when a token cannot be parsed into a float.
    #[error("Parse error: Failed to parse float from '{0}'")]
    ParseFloat(String),
    /// Occurs when the end of a file is reached before the expected data.
    #[error("Format error: Unexpected end of file while reading data.")]
    UnexpectedEof,
}

/// The raw, already-parsed arrays describing one CRS system, exactly as the
/// core expects them. No validation beyond parsing happens here; the CRS
/// invariants are checked when the matrix is built.
#[derive(Debug, Clone)]
pub struct RawSystem {
    pub rows: usize,
    pub cols: usize,
    pub values: Vec<f64>,
    pub column_indices: Vec<usize>,
    pub row_pointers: Vec<usize>,
    pub rhs: Vec<f64>,
}

/// Reads every whitespace-separated integer in a file.
pub fn read_indices(path: impl AsRef<Path>) -> Result<Vec<usize>, DataLoaderError> {
    read_tokens(path, |tok| {
        usize::from_str(tok).map_err(|_| DataLoaderError::ParseInt(tok.to_string()))
    })
}

/// Reads every whitespace-separated real number in a file.
pub fn read_scalars(path: impl AsRef<Path>) -> Result<Vec<f64>, DataLoaderError> {
    read_tokens(path, |tok| {
        f64::from_str(tok).map_err(|_| DataLoaderError::ParseFloat(tok.to_string()))
    })
}

/// Reads the matrix dimensions file: two positive integers, rows then cols.
pub fn read_dimensions(path: impl AsRef<Path>) -> Result<(usize, usize), DataLoaderError> {
    let dims = read_indices(path)?;
    if dims.len() < 2 {
        return Err(DataLoaderError::UnexpectedEof);
    }
    Ok((dims[0], dims[1]))
}

/// Loads the five files describing one CRS system.
pub fn load_system(
    dimensions: impl AsRef<Path>,
    values: impl AsRef<Path>,
    column_indices: impl AsRef<Path>,
    row_pointers: impl AsRef<Path>,
    rhs: impl AsRef<Path>,
) -> Result<RawSystem, DataLoaderError> {
    let (rows, cols) = read_dimensions(dimensions)?;
    Ok(RawSystem {
        rows,
        cols,
        values: read_scalars(values)?,
        column_indices: read_indices(column_indices)?,
        row_pointers: read_indices(row_pointers)?,
        rhs: read_scalars(rhs)?,
    })
}

/// Writes the solution vector, one value per line in index order, with 12
/// significant digits.
pub fn write_solution(path: impl AsRef<Path>, x: &[f64]) -> Result<(), DataLoaderError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    for value in x {
        writeln!(writer, "{value:.12e}")?;
    }
    writer.flush()?;
    Ok(())
}

/// Reads a file token by token, converting each with `parse`.
fn read_tokens<T>(
    path: impl AsRef<Path>,
    parse: impl Fn(&str) -> Result<T, DataLoaderError>,
) -> Result<Vec<T>, DataLoaderError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let mut out = Vec::new();
    for line in reader.lines() {
        let line = line?;
        for token in line.split_whitespace() {
            out.push(parse(token)?);
        }
    }
    Ok(out)
}
