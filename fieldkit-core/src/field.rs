//! Plain fields: a value at each point, with no species or particle
//!
//! Fields sit beside [`Force`](crate::force::Force) sources for quantities
//! such as a bias magnetic field or a scalar light intensity. They share
//! the time-scaling wrapper [`Scale`](crate::scale::Scale).

use crate::error::FieldError;
use glam::DVec3;
use std::ops::Mul;

/// A scalar or vector quantity as a function of position
pub trait Field {
    type Value: Copy + Mul<f64, Output = Self::Value>;

    fn value(&self, r: DVec3) -> Result<Self::Value, FieldError>;
}

impl<F: Field> Field for &F {
    type Value = F::Value;

    fn value(&self, r: DVec3) -> Result<Self::Value, FieldError> {
        (**self).value(r)
    }
}

/// A uniform background field
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BgField<T> {
    pub bg: T,
}

impl<T> BgField<T> {
    pub fn new(bg: T) -> Self {
        Self { bg }
    }
}

impl<T: Copy + Mul<f64, Output = T>> Field for BgField<T> {
    type Value = T;

    fn value(&self, _r: DVec3) -> Result<T, FieldError> {
        Ok(self.bg)
    }
}

/// Euclidean length of a vector field, as a scalar field
#[derive(Debug, Clone, Copy, Default)]
pub struct Magnitude<F> {
    pub field: F,
}

impl<F> Magnitude<F> {
    pub fn new(field: F) -> Self {
        Self { field }
    }
}

impl<F: Field<Value = DVec3>> Field for Magnitude<F> {
    type Value = f64;

    fn value(&self, r: DVec3) -> Result<f64, FieldError> {
        Ok(self.field.value(r)?.length())
    }
}
