//! Per-point sample records for lookup tables
//!
//! A [`Record`] holds, for one grid point, an `L`-component acceleration
//! and a scalar potential for each of `N` species. With `N == 1` the arrays
//! have a single element and the record is laid out exactly like a bare
//! vector followed by a scalar.
//!
//! Text form: for each species in index order, the `L` components then the
//! potential, all tab separated. The species count is not written; the
//! table header carries it.

use crate::error::RecordError;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Record<const L: usize = 3, const N: usize = 1> {
    a: [[f64; L]; N],
    v: [f64; N],
}

impl<const L: usize, const N: usize> Record<L, N> {
    const HAS_SPECIES: () = assert!(N > 0, "a record needs at least one species");

    /// Number of numeric tokens in the text form
    pub const TOKENS: usize = N * (L + 1);

    /// All-zero record
    pub fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::HAS_SPECIES;
        Self {
            a: [[0.0; L]; N],
            v: [0.0; N],
        }
    }

    // Single-species records ignore the index.
    #[inline(always)]
    fn slot(species: usize) -> usize {
        if N == 1 {
            0
        } else {
            species
        }
    }

    /// Acceleration of one species.
    ///
    /// Panics if `species >= N` and `N > 1`.
    #[inline]
    pub fn vector(&self, species: usize) -> &[f64; L] {
        &self.a[Self::slot(species)]
    }

    #[inline]
    pub fn vector_mut(&mut self, species: usize) -> &mut [f64; L] {
        &mut self.a[Self::slot(species)]
    }

    /// Potential of one species.
    ///
    /// Panics if `species >= N` and `N > 1`.
    #[inline]
    pub fn scalar(&self, species: usize) -> f64 {
        self.v[Self::slot(species)]
    }

    #[inline]
    pub fn scalar_mut(&mut self, species: usize) -> &mut f64 {
        &mut self.v[Self::slot(species)]
    }

    /// Overwrite every field from whitespace-delimited numeric tokens.
    ///
    /// Consumes exactly [`Self::TOKENS`] tokens. On error the record is left
    /// unchanged.
    pub fn read_tokens<'a, I>(&mut self, tokens: &mut I) -> Result<(), RecordError>
    where
        I: Iterator<Item = &'a str>,
    {
        let mut parsed = Self::new();
        let mut found = 0;
        for s in 0..N {
            for k in 0..L {
                parsed.a[s][k] = next_number(tokens, &mut found, Self::TOKENS)?;
            }
            parsed.v[s] = next_number(tokens, &mut found, Self::TOKENS)?;
        }
        *self = parsed;
        Ok(())
    }
}

fn next_number<'a, I>(tokens: &mut I, found: &mut usize, expected: usize) -> Result<f64, RecordError>
where
    I: Iterator<Item = &'a str>,
{
    let token = tokens.next().ok_or(RecordError::Count {
        expected,
        found: *found,
    })?;
    *found += 1;
    token.parse().map_err(|_| RecordError::Number {
        token: token.to_string(),
    })
}

impl<const L: usize, const N: usize> Default for Record<L, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const L: usize, const N: usize> fmt::Display for Record<L, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for s in 0..N {
            if s > 0 {
                f.write_str("\t")?;
            }
            for c in &self.a[s] {
                write!(f, "{}\t", c)?;
            }
            write!(f, "{}", self.v[s])?;
        }
        Ok(())
    }
}

impl<const L: usize, const N: usize> FromStr for Record<L, N> {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut tokens = s.split_whitespace();
        let mut record = Self::new();
        record.read_tokens(&mut tokens)?;
        let extra = tokens.count();
        if extra > 0 {
            return Err(RecordError::Count {
                expected: Self::TOKENS,
                found: Self::TOKENS + extra,
            });
        }
        Ok(record)
    }
}
