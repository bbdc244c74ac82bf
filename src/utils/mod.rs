//! Common utilities for reading and writing the flat text files the solve
//! binary exchanges with the outside world.
//!
//! - **`data_loader`**: Parses the whitespace-separated number files that
//!   describe a CRS system (dimensions, values, column indices, row
//!   pointers, right-hand side) and writes the solution vector back with
//!   high precision.

pub mod data_loader;
