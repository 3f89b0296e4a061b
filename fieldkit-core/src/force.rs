//! The force/field capability contract
//!
//! Every source (analytic, composite or tabulated) implements [`Force`].
//! Composition is static: combinators are generic over their children, so
//! evaluation inside a particle loop involves no dynamic dispatch.

use crate::error::FieldError;
use glam::DVec3;
use std::fmt;
use std::marker::PhantomData;

/// Anything that can report which species it belongs to
pub trait Particle {
    fn species(&self) -> usize;
}

impl Particle for usize {
    fn species(&self) -> usize {
        *self
    }
}

/// Acceleration and potential energy as a function of position, velocity,
/// time and species.
///
/// The species-indexed methods are required. The particle forms default to
/// looking up the species and forwarding, which covers sources that do not
/// care about anything else a particle carries.
pub trait Force {
    /// Evaluation context shared by every source in one composition
    type Context: Copy + Default;

    /// True only for the identity element of composition
    const IS_NULL: bool = false;

    /// Attach an evaluation context. Sources that never read species
    /// properties may ignore it.
    fn set_context(&mut self, _ctx: Self::Context) {}

    fn accel(
        &self,
        r: DVec3,
        v: DVec3,
        t: f64,
        dt: f64,
        species: usize,
    ) -> Result<DVec3, FieldError>;

    fn accel_of<P: Particle + ?Sized>(
        &self,
        r: DVec3,
        v: DVec3,
        t: f64,
        dt: f64,
        particle: &P,
    ) -> Result<DVec3, FieldError> {
        self.accel(r, v, t, dt, particle.species())
    }

    fn potential(&self, r: DVec3, v: DVec3, t: f64, species: usize) -> Result<f64, FieldError>;

    fn potential_of<P: Particle + ?Sized>(
        &self,
        r: DVec3,
        v: DVec3,
        t: f64,
        particle: &P,
    ) -> Result<f64, FieldError> {
        self.potential(r, v, t, particle.species())
    }

    /// Stochastic or collisional kick applied directly to a phase-space
    /// state over `dt`. Most sources have none.
    fn apply_statistical_force<P: Particle + ?Sized>(
        &self,
        _xv: &mut [f64],
        _t: f64,
        _dt: f64,
        _particle: &mut P,
    ) -> Result<(), FieldError> {
        Ok(())
    }
}

impl<F: Force> Force for &F {
    type Context = F::Context;
    const IS_NULL: bool = F::IS_NULL;

    fn accel(
        &self,
        r: DVec3,
        v: DVec3,
        t: f64,
        dt: f64,
        species: usize,
    ) -> Result<DVec3, FieldError> {
        (**self).accel(r, v, t, dt, species)
    }

    fn accel_of<P: Particle + ?Sized>(
        &self,
        r: DVec3,
        v: DVec3,
        t: f64,
        dt: f64,
        particle: &P,
    ) -> Result<DVec3, FieldError> {
        (**self).accel_of(r, v, t, dt, particle)
    }

    fn potential(&self, r: DVec3, v: DVec3, t: f64, species: usize) -> Result<f64, FieldError> {
        (**self).potential(r, v, t, species)
    }

    fn potential_of<P: Particle + ?Sized>(
        &self,
        r: DVec3,
        v: DVec3,
        t: f64,
        particle: &P,
    ) -> Result<f64, FieldError> {
        (**self).potential_of(r, v, t, particle)
    }

    fn apply_statistical_force<P: Particle + ?Sized>(
        &self,
        xv: &mut [f64],
        t: f64,
        dt: f64,
        particle: &mut P,
    ) -> Result<(), FieldError> {
        (**self).apply_statistical_force(xv, t, dt, particle)
    }
}

/// Identity element for [`Sum`](crate::sum::Sum): no acceleration, no
/// potential, no statistical kick.
pub struct Null<C> {
    _ctx: PhantomData<fn() -> C>,
}

impl<C> Null<C> {
    pub fn new() -> Self {
        Self { _ctx: PhantomData }
    }
}

impl<C> Default for Null<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Clone for Null<C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for Null<C> {}

impl<C> fmt::Debug for Null<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Null")
    }
}

impl<C: Copy + Default> Force for Null<C> {
    type Context = C;
    const IS_NULL: bool = true;

    fn accel(
        &self,
        _r: DVec3,
        _v: DVec3,
        _t: f64,
        _dt: f64,
        _species: usize,
    ) -> Result<DVec3, FieldError> {
        Ok(DVec3::ZERO)
    }

    fn potential(
        &self,
        _r: DVec3,
        _v: DVec3,
        _t: f64,
        _species: usize,
    ) -> Result<f64, FieldError> {
        Ok(0.0)
    }
}

/// Phase-space derivatives `(dx/dt, dv/dt)` of the state `x = (r, v)` for
/// use by an external integrator.
pub fn derivs<F: Force, P: Particle + ?Sized>(
    force: &F,
    x: &[f64; 6],
    t: f64,
    dt: f64,
    particle: &P,
) -> Result<[f64; 6], FieldError> {
    let r = DVec3::new(x[0], x[1], x[2]);
    let v = DVec3::new(x[3], x[4], x[5]);
    let a = force.accel_of(r, v, t, dt, particle)?;
    Ok([v.x, v.y, v.z, a.x, a.y, a.z])
}
