/// A 2D position in font design units. Contour points are decoded as 16-bit
/// integers, but implied on-curve points sit at midpoints between them, so
/// curve vertices live on a half-unit grid and are kept as floats.
#[derive(Debug, PartialEq, Clone, Copy, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Point { x, y }
    }
}

/// One segment of a glyph contour.
///
/// With `is_curve` set, the segment is the quadratic Bézier from `p0` to `p2`
/// with control point `p1`. Without it, the segment is the straight line
/// `p0`→`p1`, and `p2` carries the glyph-center fan anchor a downstream
/// renderer uses to triangulate the glyph interior as a fan.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Curve {
    pub p0: Point,
    pub p1: Point,
    pub p2: Point,
    pub is_curve: bool,
}

impl Curve {
    /// The point where this segment ends on the outline (`p2` for a Bézier,
    /// `p1` for a line, whose `p2` is the fan anchor).
    pub fn end_point(&self) -> Point {
        if self.is_curve {
            self.p2
        } else {
            self.p1
        }
    }
}

/// One closed contour of a glyph, as a sequence of curves in outline order.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct Path {
    pub curves: Vec<Curve>,
}

/// Affine transform applied to component glyphs inside a composite:
/// `(x, y)` maps to `(a·x + b·y + tx, c·x + d·y + ty)`.
#[derive(Debug, PartialEq, Clone, Copy)]
pub(crate) struct Transform {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub tx: f32,
    pub ty: f32,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        tx: 0.0,
        ty: 0.0,
    };

    pub fn apply(&self, p: Point) -> Point {
        Point {
            x: p.x * self.a + p.y * self.b + self.tx,
            y: p.x * self.c + p.y * self.d + self.ty,
        }
    }

    pub fn apply_curve(&self, curve: &Curve) -> Curve {
        Curve {
            p0: self.apply(curve.p0),
            p1: self.apply(curve.p1),
            p2: self.apply(curve.p2),
            is_curve: curve.is_curve,
        }
    }

    pub fn apply_path(&self, path: &Path) -> Path {
        Path {
            curves: path.curves.iter().map(|c| self.apply_curve(c)).collect(),
        }
    }
}
