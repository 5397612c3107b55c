/// A 2D affine transformation matrix `[a b c d e f]`.
///
/// Uses the PDF row-vector convention: a point `(x, y)` maps to
/// `(a·x + c·y + e, b·x + d·y + f)`. `e` and `f` are the translation
/// components; for a text rendering matrix `f` is the baseline.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Matrix {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Default for Matrix {
    fn default() -> Self {
        Self::identity()
    }
}

impl Matrix {
    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }

    /// A pure translation by `(tx, ty)`.
    pub fn translation(tx: f64, ty: f64) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    /// Build a matrix from its six coefficients in PDF order.
    pub fn from_array(m: [f64; 6]) -> Self {
        Self::new(m[0], m[1], m[2], m[3], m[4], m[5])
    }

    /// The six coefficients in PDF order.
    pub fn to_array(&self) -> [f64; 6] {
        [self.a, self.b, self.c, self.d, self.e, self.f]
    }

    /// Compute `self × other`: apply `self` first, then `other`.
    pub fn concat(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_is_neutral() {
        let m = Matrix::new(2.0, 0.0, 0.0, 3.0, 10.0, 20.0);
        assert_eq!(m.concat(&Matrix::identity()), m);
        assert_eq!(Matrix::identity().concat(&m), m);
    }

    #[test]
    fn translation_then_scale() {
        let t = Matrix::translation(10.0, 5.0);
        let s = Matrix::new(2.0, 0.0, 0.0, 2.0, 0.0, 0.0);
        let m = t.concat(&s);
        assert_eq!(m.to_array(), [2.0, 0.0, 0.0, 2.0, 20.0, 10.0]);
    }

    #[test]
    fn scale_then_translation() {
        let s = Matrix::new(2.0, 0.0, 0.0, 2.0, 0.0, 0.0);
        let t = Matrix::translation(10.0, 5.0);
        let m = s.concat(&t);
        assert_eq!(m.to_array(), [2.0, 0.0, 0.0, 2.0, 10.0, 5.0]);
    }

    #[test]
    fn array_round_trip() {
        let coefficients = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        assert_eq!(Matrix::from_array(coefficients).to_array(), coefficients);
    }
}
