//! Simple analytic sources
//!
//! These are ordinary implementations of [`Force`]; the composition and
//! lookup machinery treats them no differently from any other source.

use crate::context::{Context, SpeciesDb, SpeciesTable};
use crate::error::FieldError;
use crate::force::Force;
use glam::DVec3;
use std::marker::PhantomData;

/// Standard gravitational acceleration (m/s²)
pub const G_EARTH: f64 = 9.81;

/// Uniform gravitational field.
///
/// The potential energy is referenced to the origin: `V = -m g·r`, which
/// needs the species mass from the bound database.
#[derive(Debug)]
pub struct Gravity<'db, D: ?Sized = SpeciesTable> {
    pub g: DVec3,
    ctx: Context<'db, D>,
}

impl<D: ?Sized> Clone for Gravity<'_, D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<D: ?Sized> Copy for Gravity<'_, D> {}

impl<'db, D: ?Sized> Gravity<'db, D> {
    pub fn new(g: DVec3) -> Self {
        Self {
            g,
            ctx: Context::unbound(),
        }
    }

    /// Earth gravity along -z
    pub fn earth() -> Self {
        Self::new(DVec3::new(0.0, 0.0, -G_EARTH))
    }

    pub fn with_context(g: DVec3, ctx: Context<'db, D>) -> Self {
        Self { g, ctx }
    }

    pub fn context(&self) -> Context<'db, D> {
        self.ctx
    }
}

impl<'db, D: ?Sized> Default for Gravity<'db, D> {
    fn default() -> Self {
        Self::earth()
    }
}

impl<'db, D: SpeciesDb + ?Sized> Force for Gravity<'db, D> {
    type Context = Context<'db, D>;

    fn set_context(&mut self, ctx: Self::Context) {
        self.ctx = ctx;
    }

    fn accel(
        &self,
        _r: DVec3,
        _v: DVec3,
        _t: f64,
        _dt: f64,
        _species: usize,
    ) -> Result<DVec3, FieldError> {
        Ok(self.g)
    }

    fn potential(&self, r: DVec3, _v: DVec3, _t: f64, species: usize) -> Result<f64, FieldError> {
        let mass = self.ctx.mass(species)?;
        Ok(-mass * self.g.dot(r))
    }
}

/// A field with the same acceleration and potential everywhere and for
/// every species. Does not read the evaluation context.
pub struct ConstantField<C = Context<'static>> {
    pub a: DVec3,
    pub v0: f64,
    _ctx: PhantomData<fn() -> C>,
}

impl<C> ConstantField<C> {
    pub fn new(a: DVec3, v0: f64) -> Self {
        Self {
            a,
            v0,
            _ctx: PhantomData,
        }
    }
}

impl<C> Clone for ConstantField<C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for ConstantField<C> {}

impl<C> Default for ConstantField<C> {
    fn default() -> Self {
        Self::new(DVec3::ZERO, 0.0)
    }
}

impl<C> std::fmt::Debug for ConstantField<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConstantField")
            .field("a", &self.a)
            .field("v0", &self.v0)
            .finish()
    }
}

impl<C: Copy + Default> Force for ConstantField<C> {
    type Context = C;

    fn accel(
        &self,
        _r: DVec3,
        _v: DVec3,
        _t: f64,
        _dt: f64,
        _species: usize,
    ) -> Result<DVec3, FieldError> {
        Ok(self.a)
    }

    fn potential(&self, _r: DVec3, _v: DVec3, _t: f64, _species: usize) -> Result<f64, FieldError> {
        Ok(self.v0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gravity_accel_is_constant() {
        let gravity: Gravity<'_> = Gravity::earth();
        let a = gravity
            .accel(DVec3::new(3.0, -2.0, 7.0), DVec3::X, 1.0, 0.01, 0)
            .expect("accel");
        assert_eq!(a, DVec3::new(0.0, 0.0, -G_EARTH));
    }

    #[test]
    fn test_gravity_potential_uses_species_mass() {
        let mut db = SpeciesTable::new();
        db.add("light", 1.0);
        db.add("heavy", 4.0);

        let mut gravity: Gravity<'_> = Gravity::earth();
        gravity.set_context(Context::new(&db));

        let r = DVec3::new(0.0, 0.0, 2.0);
        let v_light = gravity.potential(r, DVec3::ZERO, 0.0, 0).expect("potential");
        let v_heavy = gravity.potential(r, DVec3::ZERO, 0.0, 1).expect("potential");
        assert_eq!(v_light, 2.0 * G_EARTH);
        assert_eq!(v_heavy, 8.0 * G_EARTH);
    }

    #[test]
    fn test_gravity_potential_without_database() {
        let gravity: Gravity<'_> = Gravity::earth();
        assert_eq!(
            gravity.potential(DVec3::Z, DVec3::ZERO, 0.0, 0),
            Err(FieldError::MissingDatabase)
        );
    }
}
