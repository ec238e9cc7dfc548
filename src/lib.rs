//! Martlens — sales analytics over retail transaction logs.
//!
//! The crate is split into a pure reporting core and a thin shell:
//! - [`data`] loads and normalizes the raw CSV into a canonical table
//! - [`filter`] composes row predicates into borrowed views
//! - [`aggregate`] groups and reduces views along report dimensions
//! - [`rank`] orders groups and assigns ranks
//! - [`report`] assembles the figures each report presents
//! - [`cli`] and [`web`] render reports; [`config`] merges settings
//!
//! The core never prints, never reads the terminal, and never touches the
//! network. Everything user-facing lives in the shell.

pub mod aggregate;
pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod filter;
pub mod rank;
pub mod report;
pub mod web;

pub use error::{Error, Result};
