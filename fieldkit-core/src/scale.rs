//! Time-dependent scaling of any source or field

use crate::error::FieldError;
use crate::field::Field;
use crate::force::{Force, Particle};
use crate::timing::{Envelope, Timing};
use glam::DVec3;

/// Multiplies a wrapped source or field by the current value of an envelope.
///
/// The envelope does not follow the simulation clock on its own: call
/// [`Scale::set_time`] on every `Scale` in a composed tree once per step,
/// before evaluating anything for that step.
#[derive(Debug, Clone)]
pub struct Scale<F, E = Timing> {
    pub force: F,
    pub envelope: E,
}

impl<F> Scale<F, Timing> {
    /// Wrap `force` with the unity envelope; until an envelope is
    /// configured the wrapper passes values through unchanged.
    pub fn new(force: F) -> Self {
        let mut envelope = Timing::unity();
        envelope.set_time(0.0);
        Self { force, envelope }
    }
}

impl<F: Default> Default for Scale<F, Timing> {
    fn default() -> Self {
        Self::new(F::default())
    }
}

impl<F, E: Envelope> Scale<F, E> {
    pub fn with_envelope(force: F, envelope: E) -> Self {
        Self { force, envelope }
    }

    pub fn set_time(&mut self, t: f64) {
        self.envelope.set_time(t);
    }

    /// Current scale factor
    pub fn factor(&self) -> f64 {
        self.envelope.value()
    }
}

impl<F: Force, E: Envelope> Force for Scale<F, E> {
    type Context = F::Context;

    fn set_context(&mut self, ctx: Self::Context) {
        self.force.set_context(ctx);
    }

    fn accel(
        &self,
        r: DVec3,
        v: DVec3,
        t: f64,
        dt: f64,
        species: usize,
    ) -> Result<DVec3, FieldError> {
        Ok(self.force.accel(r, v, t, dt, species)? * self.factor())
    }

    fn accel_of<P: Particle + ?Sized>(
        &self,
        r: DVec3,
        v: DVec3,
        t: f64,
        dt: f64,
        particle: &P,
    ) -> Result<DVec3, FieldError> {
        Ok(self.force.accel_of(r, v, t, dt, particle)? * self.factor())
    }

    fn potential(&self, r: DVec3, v: DVec3, t: f64, species: usize) -> Result<f64, FieldError> {
        Ok(self.factor() * self.force.potential(r, v, t, species)?)
    }

    fn potential_of<P: Particle + ?Sized>(
        &self,
        r: DVec3,
        v: DVec3,
        t: f64,
        particle: &P,
    ) -> Result<f64, FieldError> {
        Ok(self.factor() * self.force.potential_of(r, v, t, particle)?)
    }

    /// Statistical effects are integrated over `dt`, so the time step is
    /// scaled rather than a returned force.
    fn apply_statistical_force<P: Particle + ?Sized>(
        &self,
        xv: &mut [f64],
        t: f64,
        dt: f64,
        particle: &mut P,
    ) -> Result<(), FieldError> {
        self.force
            .apply_statistical_force(xv, t, self.factor() * dt, particle)
    }
}

impl<F: Field, E: Envelope> Field for Scale<F, E> {
    type Value = F::Value;

    fn value(&self, r: DVec3) -> Result<F::Value, FieldError> {
        Ok(self.force.value(r)? * self.factor())
    }
}
