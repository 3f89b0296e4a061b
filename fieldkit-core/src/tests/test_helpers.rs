//! Test helper utilities for fieldkit tests

use crate::record::Record;
use crate::table::{FieldTable, Region};
use glam::DVec3;

/// Check if two floating point values are approximately equal within tolerance
pub fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol
}

/// Componentwise [`approx_eq`] for vectors
pub fn approx_eq_vec(a: DVec3, b: DVec3, tol: f64) -> bool {
    (a - b).abs().max_element() <= tol
}

/// Single-region table holding the same acceleration and potential at every point
pub fn uniform_table(region: Region, a: DVec3, v: f64) -> FieldTable {
    let mut record: Record = Record::new();
    *record.vector_mut(0) = a.to_array();
    *record.scalar_mut(0) = v;
    let mut table = FieldTable::new();
    table
        .push_region(region, vec![record; region.len()])
        .expect("record count matches region");
    table
}
