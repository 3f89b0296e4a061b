//! Multi-resolution table generation
//!
//! A [`GridSpec`] lists the regions to sample. Each region is sampled on
//! its own, point by point in storage order, so overlapping regions each
//! get their own samples and the written file is deterministic.

use crate::error::TableError;
use crate::force::Force;
use crate::sampler::TableSampler;
use crate::table::{FieldTable, Region};
use glam::DVec3;
use log::{debug, info};
use std::path::Path;

/// Regions to sample, in resolution order: earlier regions win lookups
/// where they overlap later ones.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GridSpec {
    pub regions: Vec<Region>,
}

impl GridSpec {
    pub fn new(regions: Vec<Region>) -> Self {
        Self { regions }
    }

    /// A fine region around the sources followed by a coarse region
    /// covering the whole domain
    pub fn two_level(
        fine_min: DVec3,
        fine_max: DVec3,
        fine_step: DVec3,
        coarse_min: DVec3,
        coarse_max: DVec3,
        coarse_step: DVec3,
    ) -> Result<Self, TableError> {
        Ok(Self::new(vec![
            Region::new(fine_min, fine_max, fine_step)?,
            Region::new(coarse_min, coarse_max, coarse_step)?,
        ]))
    }

    pub fn push(&mut self, region: Region) -> &mut Self {
        self.regions.push(region);
        self
    }

    /// Total number of samples over every region
    pub fn sample_count(&self) -> usize {
        self.regions.iter().map(Region::len).sum()
    }
}

/// Evaluate `sampler` at every grid point of every region
pub fn sample_table<F: Force, const N: usize>(
    sampler: &TableSampler<F, N>,
    spec: &GridSpec,
) -> Result<FieldTable<3, N>, TableError> {
    let mut table = FieldTable::new();
    for (i, region) in spec.regions.iter().enumerate() {
        let [nx, ny, nz] = region.counts();
        debug!(
            "sampling region {} ({}x{}x{} points, step {:?})",
            i, nx, ny, nz, region.step
        );
        let records = region
            .points()
            .map(|r| sampler.record(r))
            .collect::<Result<Vec<_>, _>>()?;
        table.push_region(*region, records)?;
    }
    Ok(table)
}

/// Sample every region and write the table to `path`
pub fn create_field_file<F: Force, const N: usize>(
    sampler: &TableSampler<F, N>,
    spec: &GridSpec,
    path: impl AsRef<Path>,
) -> Result<FieldTable<3, N>, TableError> {
    info!(
        "sampling {} points over {} region(s)",
        spec.sample_count(),
        spec.regions.len()
    );
    let table = sample_table(sampler, spec)?;
    table.save(path)?;
    Ok(table)
}
