//! Sampling sources into multi-region tables and reading them back

use fieldkit_core::tests::test_helpers::{approx_eq, approx_eq_vec};
use fieldkit_core::{
    create_field_file, sample_table, sum, ConstantField, Context, FieldError, FieldTable, Force,
    ForceLookup, Gravity, GridSpec, Region, SpeciesTable, TableError, TableSampler,
};
use glam::DVec3;
use std::fs;

type Ctx = Context<'static, SpeciesTable>;

fn g() -> DVec3 {
    DVec3::new(0.0, 0.0, -9.81)
}

fn stitched_spec() -> GridSpec {
    GridSpec::new(vec![
        Region::cube(-20.0, 20.0, 5.0).unwrap(),
        Region::cube(-100.0, 100.0, 20.0).unwrap(),
    ])
}

#[test]
fn test_sampling_a_constant_field() {
    let sampler: TableSampler<_> = TableSampler::new(ConstantField::<Ctx>::new(g(), 0.0));
    for r in [DVec3::ZERO, DVec3::new(-13.0, 2.5, 99.0), DVec3::splat(1e6)] {
        let record = sampler.record(r).unwrap();
        assert_eq!(record.vector(0), &g().to_array());
        assert_eq!(record.scalar(0), 0.0);
    }
}

#[test]
fn test_sampling_gravity_matches_analytic_potential() {
    let mut db = SpeciesTable::new();
    db.add("Rb87", 1.4e-25);
    let gravity = Gravity::with_context(g(), Context::new(&db));
    let sampler: TableSampler<_> = TableSampler::new(gravity);

    let r = DVec3::new(3.0, -4.0, 12.0);
    let record = sampler.record(r).unwrap();
    assert_eq!(record.vector(0), &g().to_array());
    assert_eq!(
        record.scalar(0),
        gravity.potential(r, DVec3::ZERO, 0.0, 0).unwrap()
    );
}

#[test]
fn test_two_region_stitching() {
    let sampler: TableSampler<_> = TableSampler::new(ConstantField::<Ctx>::new(g(), -2.5));
    let table = sample_table(&sampler, &stitched_spec()).unwrap();
    let lookup: ForceLookup<Ctx> = ForceLookup::from_table(table);

    // Grid points of the fine region, then of the coarse region only.
    let fine = [DVec3::ZERO, DVec3::new(-20.0, 15.0, 20.0), DVec3::new(5.0, -5.0, 10.0)];
    let coarse = [DVec3::new(40.0, 0.0, 0.0), DVec3::splat(-100.0), DVec3::new(100.0, 60.0, -80.0)];
    for r in fine.into_iter().chain(coarse) {
        assert_eq!(lookup.accel(r, DVec3::ZERO, 0.0, 0.0, 0), Ok(g()), "at {}", r);
        assert_eq!(lookup.potential(r, DVec3::ZERO, 0.0, 0), Ok(-2.5), "at {}", r);
    }
    assert_eq!(lookup.table().locate(DVec3::ZERO), Some(0));
    assert_eq!(lookup.table().locate(DVec3::new(40.0, 0.0, 0.0)), Some(1));

    // Between grid points the value is still close.
    let a = lookup
        .accel(DVec3::new(33.3, -71.2, 5.5), DVec3::ZERO, 0.0, 0.0, 0)
        .unwrap();
    assert!(approx_eq_vec(a, g(), 1e-12));

    for r in [DVec3::new(100.5, 0.0, 0.0), DVec3::new(0.0, -150.0, 0.0)] {
        assert_eq!(
            lookup.accel(r, DVec3::ZERO, 0.0, 0.0, 0),
            Err(FieldError::OutOfDomain { position: r })
        );
    }
}

#[test]
fn test_field_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gravity.fieldkit");

    let mut db = SpeciesTable::new();
    db.add("particle", 2.0);
    let gravity = Gravity::with_context(g(), Context::new(&db));
    let sampler: TableSampler<_> = TableSampler::new(gravity);
    let written = create_field_file(&sampler, &stitched_spec(), &path).unwrap();

    let read: FieldTable = FieldTable::load(&path).unwrap();
    assert_eq!(read.region_count(), 2);
    assert!(read.regions().eq(written.regions()));
    for i in 0..2 {
        assert_eq!(read.records(i), written.records(i));
    }

    // The potential is linear in z, so interpolation reproduces it.
    let lookup: ForceLookup = ForceLookup::load(&path).unwrap();
    let r = DVec3::new(7.0, -3.0, 12.5);
    let expected = gravity.potential(r, DVec3::ZERO, 0.0, 0).unwrap();
    let found = lookup.potential(r, DVec3::ZERO, 0.0, 0).unwrap();
    assert!(approx_eq(found, expected, 1e-9));
}

#[test]
fn test_lookup_composes_with_analytic_sources() {
    let region = Region::cube(-1.0, 1.0, 1.0).unwrap();
    let sampler: TableSampler<_> = TableSampler::new(ConstantField::<Ctx>::new(DVec3::X, 1.0));
    let table = sample_table(&sampler, &GridSpec::new(vec![region])).unwrap();

    let total = sum![ForceLookup::<Ctx>::from_table(table), ConstantField::<Ctx>::new(g(), 0.5)];
    let a = total.accel(DVec3::ZERO, DVec3::ZERO, 0.0, 0.0, 0).unwrap();
    assert_eq!(a, DVec3::new(1.0, 0.0, -9.81));
    assert_eq!(total.potential(DVec3::ZERO, DVec3::ZERO, 0.0, 0), Ok(1.5));
}

#[test]
fn test_corrupt_file_is_rejected_whole() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("table.txt");

    let sampler: TableSampler<_> = TableSampler::new(ConstantField::<Ctx>::new(g(), 0.0));
    let spec = GridSpec::new(vec![Region::cube(0.0, 2.0, 1.0).unwrap()]);
    create_field_file(&sampler, &spec, &path).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    let corrupted = text.replacen("-9.81", "-9.81e", 1);
    fs::write(&path, corrupted).unwrap();

    let err = ForceLookup::<Ctx>::load(&path).unwrap_err();
    assert!(matches!(err, TableError::Record { line: 3, .. }), "{}", err);
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = FieldTable::<3, 1>::load(dir.path().join("absent")).unwrap_err();
    assert!(matches!(err, TableError::Io(_)));
}

#[test]
fn test_wrong_species_count_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("table.txt");
    let sampler: TableSampler<_> = TableSampler::new(ConstantField::<Ctx>::new(g(), 0.0));
    create_field_file(&sampler, &GridSpec::new(vec![Region::cube(0.0, 1.0, 1.0).unwrap()]), &path)
        .unwrap();

    let err = ForceLookup::<Ctx, 4>::load(&path).unwrap_err();
    assert!(matches!(err, TableError::Shape { found_n: 1, .. }));
}
