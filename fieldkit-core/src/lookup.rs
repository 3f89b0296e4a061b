//! Tabulated sources

use crate::context::Context;
use crate::error::{FieldError, TableError};
use crate::force::Force;
use crate::table::FieldTable;
use glam::DVec3;
use std::fmt;
use std::marker::PhantomData;
use std::path::Path;

/// A precomputed [`FieldTable`] exposed as a source.
///
/// Values come straight from the table: no unit conversion, and a query
/// outside every region is [`FieldError::OutOfDomain`]. Velocity, time and
/// dt are ignored. The context type only decides which sources the lookup
/// can be summed with; the table never reads it.
pub struct ForceLookup<C = Context<'static>, const N: usize = 1> {
    table: FieldTable<3, N>,
    _ctx: PhantomData<fn() -> C>,
}

impl<C, const N: usize> ForceLookup<C, N> {
    pub fn from_table(table: FieldTable<3, N>) -> Self {
        Self {
            table,
            _ctx: PhantomData,
        }
    }

    /// Read a table file written by [`create_field_file`](crate::grid::create_field_file)
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TableError> {
        Ok(Self::from_table(FieldTable::load(path)?))
    }

    pub fn table(&self) -> &FieldTable<3, N> {
        &self.table
    }
}

impl<C, const N: usize> Clone for ForceLookup<C, N> {
    fn clone(&self) -> Self {
        Self::from_table(self.table.clone())
    }
}

impl<C, const N: usize> Default for ForceLookup<C, N> {
    fn default() -> Self {
        Self::from_table(FieldTable::new())
    }
}

impl<C, const N: usize> fmt::Debug for ForceLookup<C, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForceLookup")
            .field("species", &N)
            .field("regions", &self.table.region_count())
            .finish()
    }
}

impl<C: Copy + Default, const N: usize> Force for ForceLookup<C, N> {
    type Context = C;

    fn accel(
        &self,
        r: DVec3,
        _v: DVec3,
        _t: f64,
        _dt: f64,
        species: usize,
    ) -> Result<DVec3, FieldError> {
        self.table.vector_lookup(r, species).map(DVec3::from_array)
    }

    fn potential(&self, r: DVec3, _v: DVec3, _t: f64, species: usize) -> Result<f64, FieldError> {
        self.table.scalar_lookup(r, species)
    }
}
