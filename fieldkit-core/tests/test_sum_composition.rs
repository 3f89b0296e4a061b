//! Composition properties of Add and Sum

use fieldkit_core::tests::test_helpers::{approx_eq, approx_eq_vec};
use fieldkit_core::{sum, Add, ConstantField, Context, FieldError, Force, Gravity, Null, SpeciesTable};
use glam::DVec3;
use proptest::prelude::*;

type Ctx<'db> = Context<'db, SpeciesTable>;

/// Harmonic trap centred on the origin: a = -k r, V = k r² / 2
#[derive(Debug, Clone, Copy)]
struct Trap {
    k: f64,
}

impl Force for Trap {
    type Context = Ctx<'static>;

    fn accel(
        &self,
        r: DVec3,
        _v: DVec3,
        _t: f64,
        _dt: f64,
        _species: usize,
    ) -> Result<DVec3, FieldError> {
        Ok(-self.k * r)
    }

    fn potential(&self, r: DVec3, _v: DVec3, _t: f64, _species: usize) -> Result<f64, FieldError> {
        Ok(0.5 * self.k * r.length_squared())
    }
}

fn constant(a: DVec3, v0: f64) -> ConstantField<Ctx<'static>> {
    ConstantField::new(a, v0)
}

fn sample_points() -> Vec<DVec3> {
    vec![
        DVec3::ZERO,
        DVec3::new(1.0, -2.0, 0.5),
        DVec3::new(-30.0, 12.5, 7.25),
        DVec3::new(1e-3, 4e2, -9.0),
    ]
}

#[test]
fn test_null_is_identity() {
    let trap = Trap { k: 3.5 };
    let padded = sum![trap, Null::new()];
    for r in sample_points() {
        for t in [0.0, 1e-3, 2.0] {
            assert_eq!(
                padded.accel(r, DVec3::X, t, 1e-4, 0),
                trap.accel(r, DVec3::X, t, 1e-4, 0)
            );
            assert_eq!(padded.potential(r, DVec3::X, t, 0), trap.potential(r, DVec3::X, t, 0));
        }
    }
}

#[test]
fn test_two_argument_form_matches_sum() {
    let a = Trap { k: 2.0 };
    let b = constant(DVec3::new(0.0, 0.0, -9.81), 4.0);
    let add = Add::new(a, b);
    let sum = sum![a, b];
    for r in sample_points() {
        assert_eq!(add.accel(r, DVec3::ZERO, 0.0, 0.0, 0), sum.accel(r, DVec3::ZERO, 0.0, 0.0, 0));
        assert_eq!(add.potential(r, DVec3::ZERO, 0.0, 0), sum.potential(r, DVec3::ZERO, 0.0, 0));
    }
}

#[test]
fn test_nested_adds_match_flat_sum() {
    let a = Trap { k: 0.7 };
    let b = constant(DVec3::new(0.1, 0.2, 0.3), -1.25);
    let c = Trap { k: 11.0 };

    let left = Add::new(Add::new(a, b), c);
    let right = Add::new(a, Add::new(b, c));
    let flat = sum![a, b, c];

    for r in sample_points() {
        let expected = flat.accel(r, DVec3::ZERO, 0.0, 0.0, 0).unwrap();
        let tol = 1e-12 * (1.0 + expected.abs().max_element());
        for nested in [
            left.accel(r, DVec3::ZERO, 0.0, 0.0, 0).unwrap(),
            right.accel(r, DVec3::ZERO, 0.0, 0.0, 0).unwrap(),
        ] {
            assert!(approx_eq_vec(nested, expected, tol));
        }

        let expected = flat.potential(r, DVec3::ZERO, 0.0, 0).unwrap();
        let tol = 1e-12 * (1.0 + expected.abs());
        assert!(approx_eq(left.potential(r, DVec3::ZERO, 0.0, 0).unwrap(), expected, tol));
        assert!(approx_eq(right.potential(r, DVec3::ZERO, 0.0, 0).unwrap(), expected, tol));
    }
}

#[test]
fn test_gravity_sum_with_database() {
    let mut db = SpeciesTable::new();
    let light = db.add("light", 1.0);
    let heavy = db.add("heavy", 4.0);

    let mut sum = sum![Gravity::earth(), ConstantField::new(DVec3::ZERO, 0.0)];
    sum.set_context(Context::new(&db));

    let r = DVec3::new(0.0, 0.0, 2.0);
    let v_light = sum.potential(r, DVec3::ZERO, 0.0, light).unwrap();
    let v_heavy = sum.potential(r, DVec3::ZERO, 0.0, heavy).unwrap();
    assert_eq!(v_heavy, 4.0 * v_light);
    assert_eq!(
        sum.potential(r, DVec3::ZERO, 0.0, 7),
        Err(FieldError::UnknownSpecies {
            species: 7,
            count: 2
        })
    );
}

#[test]
fn test_particle_form_matches_species_form() {
    let sum = sum![Trap { k: 1.5 }, constant(DVec3::Y, 2.0)];
    let r = DVec3::new(1.0, 2.0, 3.0);
    assert_eq!(
        sum.accel_of(r, DVec3::ZERO, 0.0, 0.0, &0usize),
        sum.accel(r, DVec3::ZERO, 0.0, 0.0, 0)
    );
    assert_eq!(
        sum.potential_of(r, DVec3::ZERO, 0.0, &0usize),
        sum.potential(r, DVec3::ZERO, 0.0, 0)
    );
}

fn coord() -> impl Strategy<Value = f64> {
    -1e3..1e3f64
}

proptest! {
    #[test]
    fn sum_is_commutative(
        x in coord(), y in coord(), z in coord(),
        k in 0.0..50.0f64,
        ax in coord(), ay in coord(), az in coord(),
    ) {
        let trap = Trap { k };
        let field = constant(DVec3::new(ax, ay, az), ax);
        let ab = sum![trap, field];
        let ba = sum![field, trap];
        let r = DVec3::new(x, y, z);

        // Two-term floating-point addition is commutative.
        prop_assert_eq!(ab.accel(r, DVec3::ZERO, 0.0, 0.0, 0), ba.accel(r, DVec3::ZERO, 0.0, 0.0, 0));
        prop_assert_eq!(ab.potential(r, DVec3::ZERO, 0.0, 0), ba.potential(r, DVec3::ZERO, 0.0, 0));
    }
}
