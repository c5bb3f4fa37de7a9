// crypto/curve.rs
//! secp256k1 point arithmetic: y² = x³ + 7 over F_p.
//!
//! Points are exposed in affine form. Scalar multiplication runs in
//! Jacobian coordinates so a whole ladder costs one field inversion.

use std::sync::LazyLock;

use num_bigint::BigUint;
use num_traits::{One, Zero};

use super::field::PrimeField;

fn from_hex(digits: &str) -> BigUint {
    BigUint::parse_bytes(digits.as_bytes(), 16).expect("curve constant is valid hex")
}

/// Field of coordinates, p = 2^256 - 2^32 - 977.
pub static CURVE_P: LazyLock<PrimeField> = LazyLock::new(|| {
    PrimeField::new(from_hex(
        "fffffffffffffffffffffffffffffffffffffffffffffffffffffffefffffc2f",
    ))
});

/// Scalars, modulo the group order n.
pub static CURVE_N: LazyLock<PrimeField> = LazyLock::new(|| {
    PrimeField::new(from_hex(
        "fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141",
    ))
});

pub static GENERATOR: LazyLock<AffinePoint> = LazyLock::new(|| AffinePoint {
    x: from_hex("79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798"),
    y: from_hex("483ada7726a3c4655da4fbfc0e1108a8fd17b448a68554199c47d08ffb10d4b8"),
});

const CURVE_B: u32 = 7;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AffinePoint {
    pub x: BigUint,
    pub y: BigUint,
}

/// A curve point or the identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CurvePoint {
    Infinity,
    Affine(AffinePoint),
}

impl AffinePoint {
    pub fn new(x: BigUint, y: BigUint) -> Self {
        AffinePoint { x, y }
    }

    pub fn is_on_curve(&self) -> bool {
        let field = &*CURVE_P;
        if !field.contains(&self.x) || !field.contains(&self.y) {
            return false;
        }
        field.square(&self.y) == curve_rhs(&self.x)
    }

    /// 64 bytes: big-endian x then y, no 0x04 prefix.
    pub fn to_uncompressed_xy(&self) -> [u8; 64] {
        let mut out = [0u8; 64];
        write_be32(&self.x, &mut out[..32]);
        write_be32(&self.y, &mut out[32..]);
        out
    }
}

impl CurvePoint {
    pub fn generator() -> Self {
        CurvePoint::Affine(GENERATOR.clone())
    }

    pub fn is_infinity(&self) -> bool {
        matches!(self, CurvePoint::Infinity)
    }

    pub fn is_on_curve(&self) -> bool {
        match self {
            CurvePoint::Infinity => true,
            CurvePoint::Affine(p) => p.is_on_curve(),
        }
    }

    pub fn negate(&self) -> Self {
        match self {
            CurvePoint::Infinity => CurvePoint::Infinity,
            CurvePoint::Affine(p) => {
                CurvePoint::Affine(AffinePoint::new(p.x.clone(), CURVE_P.neg(&p.y)))
            }
        }
    }

    pub fn double(&self) -> Self {
        let p = match self {
            CurvePoint::Infinity => return CurvePoint::Infinity,
            CurvePoint::Affine(p) => p,
        };
        if p.y.is_zero() {
            return CurvePoint::Infinity;
        }

        let field = &*CURVE_P;
        // λ = 3x² / 2y
        let numerator = field.mul(&BigUint::from(3u32), &field.square(&p.x));
        let denominator = field.add(&p.y, &p.y);
        let lambda = match field.inverse(&denominator) {
            Some(inv) => field.mul(&numerator, &inv),
            None => return CurvePoint::Infinity,
        };

        let x3 = field.sub(&field.square(&lambda), &field.add(&p.x, &p.x));
        let y3 = field.sub(&field.mul(&lambda, &field.sub(&p.x, &x3)), &p.y);
        CurvePoint::Affine(AffinePoint::new(x3, y3))
    }

    pub fn add(&self, other: &CurvePoint) -> Self {
        let (p, q) = match (self, other) {
            (CurvePoint::Infinity, _) => return other.clone(),
            (_, CurvePoint::Infinity) => return self.clone(),
            (CurvePoint::Affine(p), CurvePoint::Affine(q)) => (p, q),
        };

        let field = &*CURVE_P;
        if p.x == q.x {
            if p.y == q.y {
                return self.double();
            }
            // P = -Q
            return CurvePoint::Infinity;
        }

        // λ = (y2 - y1) / (x2 - x1)
        let lambda = match field.inverse(&field.sub(&q.x, &p.x)) {
            Some(inv) => field.mul(&field.sub(&q.y, &p.y), &inv),
            None => return CurvePoint::Infinity,
        };

        let x3 = field.sub(&field.sub(&field.square(&lambda), &p.x), &q.x);
        let y3 = field.sub(&field.mul(&lambda, &field.sub(&p.x, &x3)), &p.y);
        CurvePoint::Affine(AffinePoint::new(x3, y3))
    }

    /// Double-and-add over the bits of `k mod n`, most significant first.
    pub fn scalar_multiply(&self, k: &BigUint) -> Self {
        let point = match self {
            CurvePoint::Infinity => return CurvePoint::Infinity,
            CurvePoint::Affine(p) => p,
        };
        let k = CURVE_N.reduce(k);
        if k.is_zero() {
            return CurvePoint::Infinity;
        }

        let mut acc = JacobianPoint::infinity();
        for byte in k.to_bytes_be() {
            for bit in (0..8).rev() {
                acc = acc.double();
                if (byte >> bit) & 1 == 1 {
                    acc = acc.add_affine(point);
                }
            }
        }
        acc.to_affine()
    }
}

/// `a·P + b·Q` in a single double-and-add pass (Strauss-Shamir).
pub fn multi_scalar_multiply(
    a: &BigUint,
    p: &CurvePoint,
    b: &BigUint,
    q: &CurvePoint,
) -> CurvePoint {
    let mut a_bytes = [0u8; 32];
    let mut b_bytes = [0u8; 32];
    write_be32(&CURVE_N.reduce(a), &mut a_bytes);
    write_be32(&CURVE_N.reduce(b), &mut b_bytes);
    let sum = p.add(q);

    let mut acc = JacobianPoint::infinity();
    for (a_byte, b_byte) in a_bytes.iter().zip(b_bytes.iter()) {
        for bit in (0..8).rev() {
            acc = acc.double();
            let addend = match ((a_byte >> bit) & 1, (b_byte >> bit) & 1) {
                (1, 1) => &sum,
                (1, 0) => p,
                (0, 1) => q,
                _ => continue,
            };
            if let CurvePoint::Affine(point) = addend {
                acc = acc.add_affine(point);
            }
        }
    }
    acc.to_affine()
}

/// (X, Y, Z) standing for (X/Z², Y/Z³). Z = 0 is the identity.
#[derive(Debug, Clone)]
struct JacobianPoint {
    x: BigUint,
    y: BigUint,
    z: BigUint,
}

impl JacobianPoint {
    fn infinity() -> Self {
        JacobianPoint {
            x: BigUint::one(),
            y: BigUint::one(),
            z: BigUint::zero(),
        }
    }

    fn from_affine(p: &AffinePoint) -> Self {
        JacobianPoint {
            x: p.x.clone(),
            y: p.y.clone(),
            z: BigUint::one(),
        }
    }

    fn is_infinity(&self) -> bool {
        self.z.is_zero()
    }

    fn double(&self) -> Self {
        if self.is_infinity() || self.y.is_zero() {
            return Self::infinity();
        }

        let field = &*CURVE_P;
        let yy = field.square(&self.y);
        // S = 4·X·Y², M = 3·X² (a = 0)
        let s = field.mul(&BigUint::from(4u32), &field.mul(&self.x, &yy));
        let m = field.mul(&BigUint::from(3u32), &field.square(&self.x));

        let x3 = field.sub(&field.square(&m), &field.add(&s, &s));
        let yyyy8 = field.mul(&BigUint::from(8u32), &field.square(&yy));
        let y3 = field.sub(&field.mul(&m, &field.sub(&s, &x3)), &yyyy8);
        let z3 = field.mul(&field.add(&self.y, &self.y), &self.z);
        JacobianPoint { x: x3, y: y3, z: z3 }
    }

    /// Mixed addition with an affine point (its Z is 1).
    fn add_affine(&self, q: &AffinePoint) -> Self {
        if self.is_infinity() {
            return Self::from_affine(q);
        }

        let field = &*CURVE_P;
        let z1z1 = field.square(&self.z);
        let u2 = field.mul(&q.x, &z1z1);
        let s2 = field.mul(&q.y, &field.mul(&self.z, &z1z1));
        let h = field.sub(&u2, &self.x);
        let r = field.sub(&s2, &self.y);

        if h.is_zero() {
            return if r.is_zero() {
                self.double()
            } else {
                Self::infinity()
            };
        }

        let hh = field.square(&h);
        let hhh = field.mul(&h, &hh);
        let v = field.mul(&self.x, &hh);

        let x3 = field.sub(&field.sub(&field.square(&r), &hhh), &field.add(&v, &v));
        let y3 = field.sub(&field.mul(&r, &field.sub(&v, &x3)), &field.mul(&self.y, &hhh));
        let z3 = field.mul(&self.z, &h);
        JacobianPoint { x: x3, y: y3, z: z3 }
    }

    fn to_affine(&self) -> CurvePoint {
        let field = &*CURVE_P;
        let z_inv = match field.inverse(&self.z) {
            Some(inv) => inv,
            None => return CurvePoint::Infinity,
        };
        let z_inv2 = field.square(&z_inv);
        let x = field.mul(&self.x, &z_inv2);
        let y = field.mul(&self.y, &field.mul(&z_inv2, &z_inv));
        CurvePoint::Affine(AffinePoint::new(x, y))
    }
}

/// Recovers the point with x-coordinate `x` whose y has the given parity.
pub fn decompress(x: &BigUint, y_is_odd: bool) -> Option<AffinePoint> {
    let field = &*CURVE_P;
    if !field.contains(x) {
        return None;
    }

    let beta = field.sqrt(&curve_rhs(x))?;
    let beta_is_odd = beta.to_bytes_le().first().map_or(false, |b| b & 1 == 1);
    let y = if beta_is_odd == y_is_odd {
        beta
    } else {
        field.neg(&beta)
    };

    let point = AffinePoint::new(x.clone(), y);
    if point.is_on_curve() {
        Some(point)
    } else {
        None
    }
}

fn curve_rhs(x: &BigUint) -> BigUint {
    let field = &*CURVE_P;
    field.add(&field.mul(&field.square(x), x), &BigUint::from(CURVE_B))
}

fn write_be32(value: &BigUint, out: &mut [u8]) {
    let bytes = value.to_bytes_be();
    let start = out.len().saturating_sub(bytes.len());
    let skip = bytes.len().saturating_sub(out.len());
    out[start..].copy_from_slice(&bytes[skip..]);
}
