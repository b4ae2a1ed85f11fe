//! Affine transforms applied to a page when it is rasterized.
//!
//! Matrices use the row-vector convention of most PDF engines:
//! `x' = a*x + c*y + e` and `y' = b*x + d*y + f`, with y pointing down in
//! device space, so positive angles turn the page clockwise on screen.

/// Axis-aligned rectangle in page or device space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl Rect {
    pub fn from_size(width: f32, height: f32) -> Self {
        Self {
            x0: 0.0,
            y0: 0.0,
            x1: width,
            y1: height,
        }
    }

    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }
}

/// A 2x3 affine matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub e: f32,
    pub f: f32,
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

    /// The render transform for a zoom percentage and a rotation in degrees.
    ///
    /// Scaling comes first; the rotation is applied in the already-scaled space.
    pub fn build(zoom_percent: f32, rotation_degrees: f32) -> Self {
        let factor = zoom_percent / 100.0;
        Self::scale(factor, factor).pre_rotate(rotation_degrees)
    }

    pub fn scale(sx: f32, sy: f32) -> Self {
        Self {
            a: sx,
            d: sy,
            ..Self::IDENTITY
        }
    }

    /// Pure rotation. Quarter turns produce exact matrices so that rotated
    /// bitmaps keep integral dimensions.
    pub fn rotate(degrees: f32) -> Self {
        let degrees = degrees.rem_euclid(360.0);
        let (sin, cos) = if degrees == 0.0 {
            (0.0, 1.0)
        } else if degrees == 90.0 {
            (1.0, 0.0)
        } else if degrees == 180.0 {
            (0.0, -1.0)
        } else if degrees == 270.0 {
            (-1.0, 0.0)
        } else {
            degrees.to_radians().sin_cos()
        };
        Self {
            a: cos,
            b: sin,
            c: -sin,
            d: cos,
            e: 0.0,
            f: 0.0,
        }
    }

    /// `self` followed by `next`.
    pub fn concat(&self, next: &Transform) -> Self {
        Self {
            a: self.a * next.a + self.b * next.c,
            b: self.a * next.b + self.b * next.d,
            c: self.c * next.a + self.d * next.c,
            d: self.c * next.b + self.d * next.d,
            e: self.e * next.a + self.f * next.c + next.e,
            f: self.e * next.b + self.f * next.d + next.f,
        }
    }

    /// Rotate before applying `self`.
    pub fn pre_rotate(&self, degrees: f32) -> Self {
        Self::rotate(degrees).concat(self)
    }

    pub fn transform_point(&self, x: f32, y: f32) -> (f32, f32) {
        (
            x * self.a + y * self.c + self.e,
            x * self.b + y * self.d + self.f,
        )
    }

    /// Bounding box of `rect` after transformation.
    pub fn transform_rect(&self, rect: &Rect) -> Rect {
        let corners = [
            self.transform_point(rect.x0, rect.y0),
            self.transform_point(rect.x1, rect.y0),
            self.transform_point(rect.x0, rect.y1),
            self.transform_point(rect.x1, rect.y1),
        ];
        let mut out = Rect {
            x0: f32::INFINITY,
            y0: f32::INFINITY,
            x1: f32::NEG_INFINITY,
            y1: f32::NEG_INFINITY,
        };
        for (x, y) in corners {
            out.x0 = out.x0.min(x);
            out.y0 = out.y0.min(y);
            out.x1 = out.x1.max(x);
            out.y1 = out.y1.max(y);
        }
        out
    }

    /// Uniform scale factor carried by the linear part.
    pub fn expansion(&self) -> f32 {
        (self.a * self.d - self.b * self.c).abs().sqrt()
    }

    /// The linear part with the scale divided out and no translation.
    pub fn normalized(&self) -> Self {
        let s = self.expansion();
        if s == 0.0 {
            return Self::IDENTITY;
        }
        Self {
            a: self.a / s,
            b: self.b / s,
            c: self.c / s,
            d: self.d / s,
            e: 0.0,
            f: 0.0,
        }
    }

    pub fn invert(&self) -> Option<Self> {
        let det = self.a * self.d - self.b * self.c;
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        let a = self.d / det;
        let b = -self.b / det;
        let c = -self.c / det;
        let d = self.a / det;
        Some(Self {
            a,
            b,
            c,
            d,
            e: -(self.e * a + self.f * c),
            f: -(self.e * b + self.f * d),
        })
    }

    /// True when the linear part only permutes or mirrors axes.
    pub fn is_quarter_turn(&self) -> bool {
        (self.a == 0.0 && self.d == 0.0) || (self.b == 0.0 && self.c == 0.0)
    }
}
