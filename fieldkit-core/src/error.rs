//! Error types for force evaluation and lookup tables

use glam::DVec3;
use thiserror::Error;

/// Failure while evaluating a force or field
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldError {
    /// The query point lies outside every region of a lookup table
    #[error("position ({}, {}, {}) is outside every table region", .position.x, .position.y, .position.z)]
    OutOfDomain { position: DVec3 },

    /// A source needed species properties but no database was bound to its context
    #[error("no species database bound to the evaluation context")]
    MissingDatabase,

    /// The species index is not present in the bound database
    #[error("species index {species} not found (database holds {count} species)")]
    UnknownSpecies { species: usize, count: usize },
}

/// Failure while parsing one sample record from text
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    #[error("expected {expected} numbers, found {found}")]
    Count { expected: usize, found: usize },

    #[error("invalid number '{token}'")]
    Number { token: String },
}

/// Failure while building, reading or writing a lookup table
#[derive(Debug, Error)]
pub enum TableError {
    #[error("table i/o failed: {0}")]
    Io(#[from] std::io::Error),

    /// The table text could not be parsed; the whole load is rejected
    #[error("malformed table at line {line}: {reason}")]
    Malformed { line: usize, reason: String },

    /// The file describes a different record shape than the one requested
    #[error("table holds records with L={found_l}, N={found_n} but L={expected_l}, N={expected_n} was requested")]
    Shape {
        expected_l: usize,
        expected_n: usize,
        found_l: usize,
        found_n: usize,
    },

    #[error("invalid region: {reason}")]
    InvalidRegion { reason: String },

    #[error("bad record at line {line}: {source}")]
    Record { line: usize, source: RecordError },

    /// The source being sampled failed at a grid point
    #[error("sampling failed: {0}")]
    Sampling(#[from] FieldError),
}

impl TableError {
    pub fn malformed(line: usize, reason: impl Into<String>) -> Self {
        Self::Malformed {
            line,
            reason: reason.into(),
        }
    }

    pub fn invalid_region(reason: impl Into<String>) -> Self {
        Self::InvalidRegion {
            reason: reason.into(),
        }
    }
}
