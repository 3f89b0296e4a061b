//! Multi-region lookup tables
//!
//! A [`FieldTable`] is one or more axis-aligned, uniformly stepped regions
//! of [`Record`]s. Regions may have different resolutions and may overlap;
//! a query resolves to the first region, in table order, whose grid
//! contains the point, and is interpolated trilinearly from the eight
//! surrounding samples of that region only.
//!
//! Text format:
//!
//! ```text
//! fieldkit-table 1 <L> <N> <region count>
//! region <min x y z> <max x y z> <step x y z> <nx> <ny> <nz>
//! <record>            (nx * ny * nz lines, x outermost, z fastest)
//! ...
//! ```

use crate::error::{FieldError, TableError};
use crate::record::Record;
use glam::DVec3;
use log::{debug, info};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Format tag on the first line of a table file
pub const TABLE_MAGIC: &str = "fieldkit-table";
pub const TABLE_VERSION: u32 = 1;

/// Fraction of a step by which the upper bound is extended so the last
/// grid line survives floating-point drift in `(max - min) / step`
pub const STEP_EPSILON: f64 = 1e-9;

/// Largest number of samples one region may hold
pub const MAX_REGION_SAMPLES: usize = u32::MAX as usize;

// Records reserved up front while reading a region; the rest grow on demand.
const READ_RESERVE: usize = 1 << 16;

/// Grid lines per axis, or `None` if the region holds more than
/// [`MAX_REGION_SAMPLES`] samples
fn grid_counts(min: DVec3, max: DVec3, step: DVec3) -> Option<[usize; 3]> {
    let n = ((max - min) / step + STEP_EPSILON).floor();
    let mut counts = [0usize; 3];
    for (d, c) in counts.iter_mut().enumerate() {
        if !(n[d] < MAX_REGION_SAMPLES as f64) {
            return None;
        }
        *c = n[d] as usize + 1;
    }
    counts
        .iter()
        .try_fold(1usize, |total, &c| total.checked_mul(c))
        .filter(|&total| total <= MAX_REGION_SAMPLES)
        .map(|_| counts)
}

/// An axis-aligned box sampled every `step`, upper bound inclusive
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    pub min: DVec3,
    pub max: DVec3,
    pub step: DVec3,
}

impl Region {
    pub fn new(min: DVec3, max: DVec3, step: DVec3) -> Result<Self, TableError> {
        if !(min.is_finite() && max.is_finite() && step.is_finite()) {
            return Err(TableError::invalid_region("bounds and step must be finite"));
        }
        if step.cmple(DVec3::ZERO).any() {
            return Err(TableError::invalid_region(format!(
                "step must be positive on every axis, got {}",
                step
            )));
        }
        if max.cmplt(min).any() {
            return Err(TableError::invalid_region(format!(
                "max {} is below min {}",
                max, min
            )));
        }
        if grid_counts(min, max, step).is_none() {
            return Err(TableError::invalid_region(format!(
                "more than {} samples between {} and {} at step {}",
                MAX_REGION_SAMPLES, min, max, step
            )));
        }
        Ok(Self { min, max, step })
    }

    /// A cube `[lo, hi]` on every axis
    pub fn cube(lo: f64, hi: f64, step: f64) -> Result<Self, TableError> {
        Self::new(DVec3::splat(lo), DVec3::splat(hi), DVec3::splat(step))
    }

    /// Number of grid lines on each axis
    pub fn counts(&self) -> [usize; 3] {
        let n = ((self.max - self.min) / self.step + STEP_EPSILON).floor();
        [
            (n.x as usize).saturating_add(1),
            (n.y as usize).saturating_add(1),
            (n.z as usize).saturating_add(1),
        ]
    }

    /// Number of samples in the region
    pub fn len(&self) -> usize {
        self.counts()
            .iter()
            .try_fold(1usize, |total, &c| total.checked_mul(c))
            .unwrap_or(usize::MAX)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Position of grid point `(i, j, k)`
    pub fn point(&self, idx: [usize; 3]) -> DVec3 {
        self.min + self.step * DVec3::new(idx[0] as f64, idx[1] as f64, idx[2] as f64)
    }

    /// Last grid line on each axis
    pub fn upper(&self) -> DVec3 {
        let [nx, ny, nz] = self.counts();
        self.point([nx - 1, ny - 1, nz - 1])
    }

    /// Whether `r` lies within the sampled grid (boundary included)
    pub fn contains(&self, r: DVec3) -> bool {
        let slack = self.step * STEP_EPSILON;
        r.cmpge(self.min - slack).all() && r.cmple(self.upper() + slack).all()
    }

    /// Grid points in storage order: x outermost, z fastest
    pub fn points(&self) -> impl Iterator<Item = DVec3> + '_ {
        let [nx, ny, nz] = self.counts();
        (0..nx).flat_map(move |i| {
            (0..ny).flat_map(move |j| (0..nz).map(move |k| self.point([i, j, k])))
        })
    }

    fn flat_index(counts: [usize; 3], idx: [usize; 3]) -> usize {
        (idx[0] * counts[1] + idx[1]) * counts[2] + idx[2]
    }

    /// Interpolation stencil for a point known to be inside the region:
    /// flat sample index and weight for each of the eight cell corners.
    fn stencil(&self, r: DVec3) -> [(usize, f64); 8] {
        let counts = self.counts();
        let u = (r - self.min) / self.step;
        let mut cell = [(0usize, 0.0f64); 3];
        for d in 0..3 {
            let n = counts[d];
            if n < 2 {
                continue;
            }
            let i = (u[d].floor().max(0.0) as usize).min(n - 2);
            cell[d] = (i, (u[d] - i as f64).clamp(0.0, 1.0));
        }

        let mut out = [(0usize, 0.0f64); 8];
        for (corner, slot) in out.iter_mut().enumerate() {
            let mut idx = [0usize; 3];
            let mut w = 1.0;
            for d in 0..3 {
                let (i, f) = cell[d];
                if (corner >> d) & 1 == 1 {
                    idx[d] = (i + 1).min(counts[d] - 1);
                    w *= f;
                } else {
                    idx[d] = i;
                    w *= 1.0 - f;
                }
            }
            *slot = (Self::flat_index(counts, idx), w);
        }
        out
    }
}

#[derive(Debug, Clone)]
struct Grid<const L: usize, const N: usize> {
    region: Region,
    records: Vec<Record<L, N>>,
}

/// Sampled records over one or more regions
#[derive(Debug, Clone, Default)]
pub struct FieldTable<const L: usize = 3, const N: usize = 1> {
    grids: Vec<Grid<L, N>>,
}

impl<const L: usize, const N: usize> FieldTable<L, N> {
    pub fn new() -> Self {
        Self { grids: Vec::new() }
    }

    /// Append a region with its samples in storage order. Earlier regions
    /// take precedence where regions overlap.
    pub fn push_region(
        &mut self,
        region: Region,
        records: Vec<Record<L, N>>,
    ) -> Result<(), TableError> {
        if records.len() != region.len() {
            return Err(TableError::invalid_region(format!(
                "region has {} grid points but {} records were supplied",
                region.len(),
                records.len()
            )));
        }
        self.grids.push(Grid { region, records });
        Ok(())
    }

    pub fn regions(&self) -> impl Iterator<Item = &Region> + '_ {
        self.grids.iter().map(|g| &g.region)
    }

    /// Samples of the `index`-th region, in storage order
    pub fn records(&self, index: usize) -> Option<&[Record<L, N>]> {
        self.grids.get(index).map(|g| g.records.as_slice())
    }

    pub fn region_count(&self) -> usize {
        self.grids.len()
    }

    /// Index of the region a point resolves to
    pub fn locate(&self, r: DVec3) -> Option<usize> {
        self.grids.iter().position(|g| g.region.contains(r))
    }

    fn resolve(&self, r: DVec3) -> Result<&Grid<L, N>, FieldError> {
        self.locate(r)
            .map(|i| &self.grids[i])
            .ok_or(FieldError::OutOfDomain { position: r })
    }

    /// Interpolated acceleration of one species at `r`
    pub fn vector_lookup(&self, r: DVec3, species: usize) -> Result<[f64; L], FieldError> {
        let grid = self.resolve(r)?;
        let mut out = [0.0; L];
        for (idx, w) in grid.region.stencil(r) {
            let a = grid.records[idx].vector(species);
            for (o, c) in out.iter_mut().zip(a) {
                *o += w * c;
            }
        }
        Ok(out)
    }

    /// Interpolated potential of one species at `r`
    pub fn scalar_lookup(&self, r: DVec3, species: usize) -> Result<f64, FieldError> {
        let grid = self.resolve(r)?;
        let mut out = 0.0;
        for (idx, w) in grid.region.stencil(r) {
            out += w * grid.records[idx].scalar(species);
        }
        Ok(out)
    }

    pub fn write_to<W: Write>(&self, mut out: W) -> Result<(), TableError> {
        writeln!(
            out,
            "{} {} {} {} {}",
            TABLE_MAGIC,
            TABLE_VERSION,
            L,
            N,
            self.grids.len()
        )?;
        for grid in &self.grids {
            let r = &grid.region;
            let [nx, ny, nz] = r.counts();
            writeln!(
                out,
                "region {} {} {} {} {} {} {} {} {} {} {} {}",
                r.min.x, r.min.y, r.min.z, r.max.x, r.max.y, r.max.z, r.step.x, r.step.y,
                r.step.z, nx, ny, nz
            )?;
            for record in &grid.records {
                writeln!(out, "{}", record)?;
            }
        }
        out.flush()?;
        Ok(())
    }

    /// Parse a table. Any malformed line rejects the whole table.
    pub fn read_from<R: BufRead>(input: R) -> Result<Self, TableError> {
        let mut lines = input.lines().enumerate().map(|(i, l)| (i + 1, l));

        let (line_no, header) = next_line(&mut lines)?
            .ok_or_else(|| TableError::malformed(1, "empty table"))?;
        let region_count = parse_header::<L, N>(line_no, &header)?;

        let mut table = Self::new();
        for _ in 0..region_count {
            let (line_no, text) = next_line(&mut lines)?
                .ok_or_else(|| TableError::malformed(line_no, "missing region header"))?;
            let region = parse_region(line_no, &text)?;

            let mut records = Vec::with_capacity(region.len().min(READ_RESERVE));
            for _ in 0..region.len() {
                let (line_no, text) = next_line(&mut lines)?.ok_or_else(|| {
                    TableError::malformed(line_no, "table ends inside a region")
                })?;
                let record = text
                    .parse()
                    .map_err(|source| TableError::Record {
                        line: line_no,
                        source,
                    })?;
                records.push(record);
            }
            debug!(
                "read region {:?}..{:?} step {:?} ({} samples)",
                region.min,
                region.max,
                region.step,
                records.len()
            );
            table.push_region(region, records)?;
        }

        if let Some((line_no, _)) = next_line(&mut lines)? {
            return Err(TableError::malformed(line_no, "unexpected data after last region"));
        }
        Ok(table)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), TableError> {
        let path = path.as_ref();
        self.write_to(BufWriter::new(File::create(path)?))?;
        info!(
            "wrote {} region(s) to {}",
            self.grids.len(),
            path.display()
        );
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, TableError> {
        let path = path.as_ref();
        let table = Self::read_from(BufReader::new(File::open(path)?))?;
        info!(
            "loaded {} region(s) from {}",
            table.grids.len(),
            path.display()
        );
        Ok(table)
    }
}

/// Next non-blank line with its 1-based number
fn next_line<I>(lines: &mut I) -> Result<Option<(usize, String)>, TableError>
where
    I: Iterator<Item = (usize, std::io::Result<String>)>,
{
    for (line_no, line) in lines {
        let line = line?;
        if !line.trim().is_empty() {
            return Ok(Some((line_no, line)));
        }
    }
    Ok(None)
}

fn parse_num<T: std::str::FromStr>(line: usize, token: Option<&str>, what: &str) -> Result<T, TableError> {
    let token = token.ok_or_else(|| TableError::malformed(line, format!("missing {}", what)))?;
    token
        .parse()
        .map_err(|_| TableError::malformed(line, format!("invalid {} '{}'", what, token)))
}

fn parse_header<const L: usize, const N: usize>(line: usize, text: &str) -> Result<usize, TableError> {
    let mut tokens = text.split_whitespace();
    if tokens.next() != Some(TABLE_MAGIC) {
        return Err(TableError::malformed(line, "not a fieldkit table"));
    }
    let version: u32 = parse_num(line, tokens.next(), "version")?;
    if version != TABLE_VERSION {
        return Err(TableError::malformed(
            line,
            format!("unsupported version {}", version),
        ));
    }
    let found_l: usize = parse_num(line, tokens.next(), "vector length")?;
    let found_n: usize = parse_num(line, tokens.next(), "species count")?;
    if found_l != L || found_n != N {
        return Err(TableError::Shape {
            expected_l: L,
            expected_n: N,
            found_l,
            found_n,
        });
    }
    let regions = parse_num(line, tokens.next(), "region count")?;
    if tokens.next().is_some() {
        return Err(TableError::malformed(line, "trailing tokens in header"));
    }
    Ok(regions)
}

fn parse_region(line: usize, text: &str) -> Result<Region, TableError> {
    let mut tokens = text.split_whitespace();
    if tokens.next() != Some("region") {
        return Err(TableError::malformed(line, "expected region header"));
    }
    let mut v = [0.0f64; 9];
    for x in v.iter_mut() {
        *x = parse_num(line, tokens.next(), "region bound")?;
    }
    let mut counts = [0usize; 3];
    for n in counts.iter_mut() {
        *n = parse_num(line, tokens.next(), "grid count")?;
    }
    if tokens.next().is_some() {
        return Err(TableError::malformed(line, "trailing tokens in region header"));
    }

    let region = Region::new(
        DVec3::new(v[0], v[1], v[2]),
        DVec3::new(v[3], v[4], v[5]),
        DVec3::new(v[6], v[7], v[8]),
    )
    .map_err(|e| TableError::malformed(line, e.to_string()))?;

    if region.counts() != counts {
        return Err(TableError::malformed(
            line,
            format!(
                "grid counts {:?} do not match bounds (expected {:?})",
                counts,
                region.counts()
            ),
        ));
    }
    Ok(region)
}
