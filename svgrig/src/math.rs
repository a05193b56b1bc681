use crate::Error;
use std::ops::{Add, Neg, Sub};
use std::str::FromStr;

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl Add for Point2D {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point2D {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for Point2D {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

/// Parses a coordinate token of the form `x,y`.
///
/// Exactly one comma and two finite numbers are accepted; anything else is a
/// [`Error::MalformedPoint`].
impl FromStr for Point2D {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_pair_f64(s)
            .map(|(x, y)| Self::new(x, y))
            .ok_or_else(|| Error::MalformedPoint {
                token: s.to_string(),
            })
    }
}

fn parse_pair_f64(value: &str) -> Option<(f64, f64)> {
    let mut it = value.split(',');
    let a = it.next()?;
    let b = it.next()?;
    if it.next().is_some() {
        return None;
    }
    let a: f64 = a.trim().parse().ok()?;
    let b: f64 = b.trim().parse().ok()?;
    (a.is_finite() && b.is_finite()).then_some((a, b))
}

/// 2D affine transform `[a c tx; b d ty]`.
///
/// Points map as `(a*x + c*y + tx, b*x + d*y + ty)`, the same layout as a
/// bone's world matrix.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Affine {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub tx: f64,
    pub ty: f64,
}

impl Default for Affine {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Affine {
    pub const IDENTITY: Self = Self {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        tx: 0.0,
        ty: 0.0,
    };

    pub const fn new(a: f64, b: f64, c: f64, d: f64, tx: f64, ty: f64) -> Self {
        Self { a, b, c, d, tx, ty }
    }

    pub const fn translate(tx: f64, ty: f64) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    pub fn translate_by(offset: Point2D) -> Self {
        Self::translate(offset.x, offset.y)
    }

    pub fn rotate(radians: f64) -> Self {
        let (sin, cos) = radians.sin_cos();
        Self::new(cos, sin, -sin, cos, 0.0, 0.0)
    }

    /// Returns `self ∘ inner`: `inner` applies first, then `self`.
    ///
    /// This is right-multiplication, so an element's own transform composes
    /// onto its ancestors' in document order.
    pub fn then_inner(&self, inner: &Affine) -> Affine {
        Affine {
            a: self.a * inner.a + self.c * inner.b,
            b: self.b * inner.a + self.d * inner.b,
            c: self.a * inner.c + self.c * inner.d,
            d: self.b * inner.c + self.d * inner.d,
            tx: self.a * inner.tx + self.c * inner.ty + self.tx,
            ty: self.b * inner.tx + self.d * inner.ty + self.ty,
        }
    }

    pub fn apply(&self, p: Point2D) -> Point2D {
        Point2D::new(
            self.a * p.x + self.c * p.y + self.tx,
            self.b * p.x + self.d * p.y + self.ty,
        )
    }

    pub fn translation(&self) -> Point2D {
        Point2D::new(self.tx, self.ty)
    }

    pub fn determinant(&self) -> f64 {
        self.a * self.d - self.b * self.c
    }

    pub fn inverse(&self) -> Option<Affine> {
        let det = self.determinant();
        if det.abs() <= f64::EPSILON || !det.is_finite() {
            return None;
        }
        let inv = 1.0 / det;
        let a = self.d * inv;
        let b = -self.b * inv;
        let c = -self.c * inv;
        let d = self.a * inv;
        Some(Affine {
            a,
            b,
            c,
            d,
            tx: -(a * self.tx + c * self.ty),
            ty: -(b * self.tx + d * self.ty),
        })
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}

#[cfg(feature = "glam")]
impl From<Point2D> for glam::DVec2 {
    fn from(p: Point2D) -> Self {
        glam::DVec2::new(p.x, p.y)
    }
}

#[cfg(feature = "glam")]
impl From<glam::DVec2> for Point2D {
    fn from(v: glam::DVec2) -> Self {
        Point2D::new(v.x, v.y)
    }
}

#[cfg(feature = "glam")]
impl From<Affine> for glam::DAffine2 {
    fn from(t: Affine) -> Self {
        glam::DAffine2::from_cols_array(&[t.a, t.b, t.c, t.d, t.tx, t.ty])
    }
}
