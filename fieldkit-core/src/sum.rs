//! Summing sources into one
//!
//! [`Add`] combines exactly two sources and nests for sums of any degree.
//! [`Sum`] holds up to ten, with unused slots padded by [`Null`]; the
//! [`sum!`](crate::sum!) macro does the padding.
//!
//! Every child must use the same `Context` type. A mismatch does not compile:
//!
//! ```compile_fail
//! use fieldkit_core::{sum, ConstantField, Context};
//! use glam::DVec3;
//!
//! let a: ConstantField<Context<'static>> = ConstantField::new(DVec3::Z, 0.0);
//! let b: ConstantField<()> = ConstantField::new(DVec3::X, 0.0);
//! let _ = sum![a, b];
//! ```
//!
//! These sums are only physically meaningful for disjoint forces. Two
//! magnetic sources must have their fields added before the force is
//! computed, not their forces.

use crate::error::FieldError;
use crate::force::{Force, Null, Particle};
use glam::DVec3;
use std::fmt;

#[inline(always)]
fn add_accel<F: Force>(
    f: &F,
    a: &mut DVec3,
    r: DVec3,
    v: DVec3,
    t: f64,
    dt: f64,
    species: usize,
) -> Result<(), FieldError> {
    if !F::IS_NULL {
        *a += f.accel(r, v, t, dt, species)?;
    }
    Ok(())
}

#[inline(always)]
fn add_accel_of<F: Force, P: Particle + ?Sized>(
    f: &F,
    a: &mut DVec3,
    r: DVec3,
    v: DVec3,
    t: f64,
    dt: f64,
    particle: &P,
) -> Result<(), FieldError> {
    if !F::IS_NULL {
        *a += f.accel_of(r, v, t, dt, particle)?;
    }
    Ok(())
}

#[inline(always)]
fn add_potential<F: Force>(
    f: &F,
    total: &mut f64,
    r: DVec3,
    v: DVec3,
    t: f64,
    species: usize,
) -> Result<(), FieldError> {
    if !F::IS_NULL {
        *total += f.potential(r, v, t, species)?;
    }
    Ok(())
}

#[inline(always)]
fn add_potential_of<F: Force, P: Particle + ?Sized>(
    f: &F,
    total: &mut f64,
    r: DVec3,
    v: DVec3,
    t: f64,
    particle: &P,
) -> Result<(), FieldError> {
    if !F::IS_NULL {
        *total += f.potential_of(r, v, t, particle)?;
    }
    Ok(())
}

#[inline(always)]
fn statistical<F: Force, P: Particle + ?Sized>(
    f: &F,
    xv: &mut [f64],
    t: f64,
    dt: f64,
    particle: &mut P,
) -> Result<(), FieldError> {
    if !F::IS_NULL {
        f.apply_statistical_force(xv, t, dt, particle)?;
    }
    Ok(())
}

#[inline(always)]
fn bind<F: Force>(f: &mut F, ctx: F::Context) {
    if !F::IS_NULL {
        f.set_context(ctx);
    }
}

/// Sum of two sources.
#[derive(Clone, Default)]
pub struct Add<A: Force, B> {
    ctx: A::Context,
    pub f0: A,
    pub f1: B,
}

impl<A: Force + fmt::Debug, B: fmt::Debug> fmt::Debug for Add<A, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Add")
            .field("f0", &self.f0)
            .field("f1", &self.f1)
            .finish()
    }
}

impl<A, B> Add<A, B>
where
    A: Force,
    B: Force<Context = A::Context>,
{
    pub fn new(f0: A, f1: B) -> Self {
        Self::with_context(A::Context::default(), f0, f1)
    }

    /// Store `ctx` as the composite's context. Children keep whatever
    /// context they were built with; use [`Force::set_context`] to push it
    /// down to them.
    pub fn with_context(ctx: A::Context, f0: A, f1: B) -> Self {
        Self { ctx, f0, f1 }
    }

    pub fn context(&self) -> A::Context {
        self.ctx
    }
}

impl<A, B> Force for Add<A, B>
where
    A: Force,
    B: Force<Context = A::Context>,
{
    type Context = A::Context;

    fn set_context(&mut self, ctx: Self::Context) {
        self.ctx = ctx;
        bind(&mut self.f0, ctx);
        bind(&mut self.f1, ctx);
    }

    fn accel(
        &self,
        r: DVec3,
        v: DVec3,
        t: f64,
        dt: f64,
        species: usize,
    ) -> Result<DVec3, FieldError> {
        let mut a = DVec3::ZERO;
        add_accel(&self.f0, &mut a, r, v, t, dt, species)?;
        add_accel(&self.f1, &mut a, r, v, t, dt, species)?;
        Ok(a)
    }

    fn accel_of<P: Particle + ?Sized>(
        &self,
        r: DVec3,
        v: DVec3,
        t: f64,
        dt: f64,
        particle: &P,
    ) -> Result<DVec3, FieldError> {
        let mut a = DVec3::ZERO;
        add_accel_of(&self.f0, &mut a, r, v, t, dt, particle)?;
        add_accel_of(&self.f1, &mut a, r, v, t, dt, particle)?;
        Ok(a)
    }

    fn potential(&self, r: DVec3, v: DVec3, t: f64, species: usize) -> Result<f64, FieldError> {
        let mut total = 0.0;
        add_potential(&self.f0, &mut total, r, v, t, species)?;
        add_potential(&self.f1, &mut total, r, v, t, species)?;
        Ok(total)
    }

    fn potential_of<P: Particle + ?Sized>(
        &self,
        r: DVec3,
        v: DVec3,
        t: f64,
        particle: &P,
    ) -> Result<f64, FieldError> {
        let mut total = 0.0;
        add_potential_of(&self.f0, &mut total, r, v, t, particle)?;
        add_potential_of(&self.f1, &mut total, r, v, t, particle)?;
        Ok(total)
    }

    fn apply_statistical_force<P: Particle + ?Sized>(
        &self,
        xv: &mut [f64],
        t: f64,
        dt: f64,
        particle: &mut P,
    ) -> Result<(), FieldError> {
        statistical(&self.f0, &mut *xv, t, dt, &mut *particle)?;
        statistical(&self.f1, xv, t, dt, particle)
    }
}

/// Run `$body` once per slot, in slot order, with `$f` bound to the slot.
macro_rules! each_slot {
    ($s:ident, $f:ident => $body:expr) => {{
        each_slot!(@ $s, $f, $body, f0 f1 f2 f3 f4 f5 f6 f7 f8 f9);
    }};
    (mut $s:ident, $f:ident => $body:expr) => {{
        each_slot!(@mut $s, $f, $body, f0 f1 f2 f3 f4 f5 f6 f7 f8 f9);
    }};
    (@ $s:ident, $f:ident, $body:expr, $($slot:ident)*) => {
        $({
            let $f = &$s.$slot;
            $body;
        })*
    };
    (@mut $s:ident, $f:ident, $body:expr, $($slot:ident)*) => {
        $({
            let $f = &mut $s.$slot;
            $body;
        })*
    };
}

/// Sum of two to ten sources sharing the context type `C`.
///
/// Slots past the last supplied source hold [`Null`] and are skipped
/// entirely during evaluation.
#[derive(Debug, Clone, Default)]
pub struct Sum<
    C,
    F0,
    F1,
    F2 = Null<C>,
    F3 = Null<C>,
    F4 = Null<C>,
    F5 = Null<C>,
    F6 = Null<C>,
    F7 = Null<C>,
    F8 = Null<C>,
    F9 = Null<C>,
> {
    ctx: C,
    pub f0: F0,
    pub f1: F1,
    pub f2: F2,
    pub f3: F3,
    pub f4: F4,
    pub f5: F5,
    pub f6: F6,
    pub f7: F7,
    pub f8: F8,
    pub f9: F9,
}

impl<C, F0, F1, F2, F3, F4, F5, F6, F7, F8, F9> Sum<C, F0, F1, F2, F3, F4, F5, F6, F7, F8, F9>
where
    C: Copy + Default,
    F0: Force<Context = C>,
    F1: Force<Context = C>,
    F2: Force<Context = C>,
    F3: Force<Context = C>,
    F4: Force<Context = C>,
    F5: Force<Context = C>,
    F6: Force<Context = C>,
    F7: Force<Context = C>,
    F8: Force<Context = C>,
    F9: Force<Context = C>,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(f0: F0, f1: F1, f2: F2, f3: F3, f4: F4, f5: F5, f6: F6, f7: F7, f8: F8, f9: F9) -> Self {
        Self {
            ctx: C::default(),
            f0,
            f1,
            f2,
            f3,
            f4,
            f5,
            f6,
            f7,
            f8,
            f9,
        }
    }

    /// Replace the composite's own context without touching the children
    pub fn with_context(mut self, ctx: C) -> Self {
        self.ctx = ctx;
        self
    }

    pub fn context(&self) -> C {
        self.ctx
    }

    /// Number of non-null slots
    pub fn degree(&self) -> usize {
        let mut n = 0;
        each_slot!(self, f => n += usize::from(!is_null(f)));
        n
    }
}

#[inline(always)]
fn is_null<F: Force>(_f: &F) -> bool {
    F::IS_NULL
}

impl<C, F0, F1, F2, F3, F4, F5, F6, F7, F8, F9> Force
    for Sum<C, F0, F1, F2, F3, F4, F5, F6, F7, F8, F9>
where
    C: Copy + Default,
    F0: Force<Context = C>,
    F1: Force<Context = C>,
    F2: Force<Context = C>,
    F3: Force<Context = C>,
    F4: Force<Context = C>,
    F5: Force<Context = C>,
    F6: Force<Context = C>,
    F7: Force<Context = C>,
    F8: Force<Context = C>,
    F9: Force<Context = C>,
{
    type Context = C;

    fn set_context(&mut self, ctx: C) {
        self.ctx = ctx;
        each_slot!(mut self, f => bind(f, ctx));
    }

    fn accel(
        &self,
        r: DVec3,
        v: DVec3,
        t: f64,
        dt: f64,
        species: usize,
    ) -> Result<DVec3, FieldError> {
        let mut a = DVec3::ZERO;
        each_slot!(self, f => add_accel(f, &mut a, r, v, t, dt, species)?);
        Ok(a)
    }

    fn accel_of<P: Particle + ?Sized>(
        &self,
        r: DVec3,
        v: DVec3,
        t: f64,
        dt: f64,
        particle: &P,
    ) -> Result<DVec3, FieldError> {
        let mut a = DVec3::ZERO;
        each_slot!(self, f => add_accel_of(f, &mut a, r, v, t, dt, particle)?);
        Ok(a)
    }

    fn potential(&self, r: DVec3, v: DVec3, t: f64, species: usize) -> Result<f64, FieldError> {
        let mut total = 0.0;
        each_slot!(self, f => add_potential(f, &mut total, r, v, t, species)?);
        Ok(total)
    }

    fn potential_of<P: Particle + ?Sized>(
        &self,
        r: DVec3,
        v: DVec3,
        t: f64,
        particle: &P,
    ) -> Result<f64, FieldError> {
        let mut total = 0.0;
        each_slot!(self, f => add_potential_of(f, &mut total, r, v, t, particle)?);
        Ok(total)
    }

    fn apply_statistical_force<P: Particle + ?Sized>(
        &self,
        xv: &mut [f64],
        t: f64,
        dt: f64,
        particle: &mut P,
    ) -> Result<(), FieldError> {
        each_slot!(self, f => statistical(f, &mut *xv, t, dt, &mut *particle)?);
        Ok(())
    }
}

/// Build a [`Sum`] from two to ten sources, padding the rest with `Null`.
///
/// More than ten sources is a compile error; nest sums instead.
#[macro_export]
macro_rules! sum {
    ($f0:expr, $($f:expr),+ $(,)?) => {
        $crate::__sum_slots!([$f0, $($f,)+] [_ _ _ _ _ _ _ _ _ _] [])
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __sum_slots {
    (@null _) => {
        $crate::force::Null::new()
    };
    ([] [$($pad:tt)*] [$($done:expr,)*]) => {
        $crate::sum::Sum::new($($done,)* $($crate::__sum_slots!(@null $pad),)*)
    };
    ([$head:expr, $($rest:expr,)*] [_ $($pad:tt)*] [$($done:expr,)*]) => {
        $crate::__sum_slots!([$($rest,)*] [$($pad)*] [$($done,)* $head,])
    };
}
