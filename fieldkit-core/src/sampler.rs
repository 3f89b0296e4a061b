//! Sampling a source into table records

use crate::error::FieldError;
use crate::force::Force;
use crate::record::Record;
use glam::DVec3;

/// Evaluates a source at single points to fill [`Record`]s.
///
/// Tables are static snapshots, so velocity, time and dt are always zero.
/// The sampler does not know or care how the source is composed.
#[derive(Debug, Clone, Default)]
pub struct TableSampler<F, const N: usize = 1> {
    pub force: F,
}

impl<F: Force, const N: usize> TableSampler<F, N> {
    pub fn new(force: F) -> Self {
        Self { force }
    }

    /// Acceleration and potential of every species at `r`
    pub fn record(&self, r: DVec3) -> Result<Record<3, N>, FieldError> {
        let mut record = Record::new();
        if N == 1 {
            self.fill(&mut record, r, 0)?;
        } else {
            for species in 0..N {
                self.fill(&mut record, r, species)?;
            }
        }
        Ok(record)
    }

    fn fill(&self, record: &mut Record<3, N>, r: DVec3, species: usize) -> Result<(), FieldError> {
        let a = self.force.accel(r, DVec3::ZERO, 0.0, 0.0, species)?;
        *record.vector_mut(species) = a.to_array();
        *record.scalar_mut(species) = self.force.potential(r, DVec3::ZERO, 0.0, species)?;
        Ok(())
    }
}
