// ============================================================================
// AFFINE TRANSFORMS
// ============================================================================

use std::ops::{Deref, DerefMut};

use crate::surface::Surface;

/// 2D affine matrix in canvas layout:
///
/// ```text
/// | a c e |
/// | b d f |
/// | 0 0 1 |
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    /// Post-multiplies a translation, like `ctx.translate`. Non-finite
    /// offsets leave the matrix unchanged.
    pub fn translate(self, tx: f64, ty: f64) -> Self {
        if !(tx.is_finite() && ty.is_finite()) {
            return self;
        }
        Self {
            e: self.a * tx + self.c * ty + self.e,
            f: self.b * tx + self.d * ty + self.f,
            ..self
        }
    }

    /// Post-multiplies a rotation, like `ctx.rotate`. A non-finite angle
    /// leaves the matrix unchanged.
    pub fn rotate(self, angle: f64) -> Self {
        if !angle.is_finite() {
            return self;
        }
        let (sin, cos) = angle.sin_cos();
        Self {
            a: self.a * cos + self.c * sin,
            b: self.b * cos + self.d * sin,
            c: self.c * cos - self.a * sin,
            d: self.d * cos - self.b * sin,
            ..self
        }
    }

    /// Maps a point from local to device coordinates.
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    pub fn invert(&self) -> Option<Self> {
        let det = self.a * self.d - self.b * self.c;
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        Some(Self {
            a: self.d / det,
            b: -self.b / det,
            c: -self.c / det,
            d: self.a / det,
            e: (self.c * self.f - self.d * self.e) / det,
            f: (self.b * self.e - self.a * self.f) / det,
        })
    }

    /// Rotation of the local x-axis in device space, in `(-PI, PI]`.
    pub fn rotation(&self) -> f64 {
        self.b.atan2(self.a)
    }

    /// Length of a unit local x-vector in device space.
    pub fn scale(&self) -> f64 {
        self.a.hypot(self.b)
    }

    pub fn is_finite(&self) -> bool {
        [self.a, self.b, self.c, self.d, self.e, self.f]
            .iter()
            .all(|v| v.is_finite())
    }
}

/// Borrows a surface and restores its transform when dropped.
///
/// Every translate/rotate issued through the scope is undone on all exit
/// paths, so render steps never leak transform state to the next one.
pub struct TransformScope<'a, S: Surface + ?Sized> {
    surface: &'a mut S,
    saved: Transform,
}

impl<'a, S: Surface + ?Sized> TransformScope<'a, S> {
    pub fn new(surface: &'a mut S) -> Self {
        let saved = surface.transform();
        Self { surface, saved }
    }
}

impl<S: Surface + ?Sized> Deref for TransformScope<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.surface
    }
}

impl<S: Surface + ?Sized> DerefMut for TransformScope<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.surface
    }
}

impl<S: Surface + ?Sized> Drop for TransformScope<'_, S> {
    fn drop(&mut self) {
        self.surface.set_transform(self.saved);
    }
}
