// crypto/field.rs
//! Modular arithmetic over a prime modulus.
//!
//! Values are `BigUint`s already reduced below the modulus. Nothing here is
//! constant time; the crate only verifies signatures, it never holds keys.

use num_bigint::BigUint;
use num_traits::{One, Zero};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimeField {
    modulus: BigUint,
}

impl PrimeField {
    pub fn new(modulus: BigUint) -> Self {
        PrimeField { modulus }
    }

    pub fn modulus(&self) -> &BigUint {
        &self.modulus
    }

    /// Reduces an arbitrary integer into `[0, modulus)`.
    pub fn reduce(&self, value: &BigUint) -> BigUint {
        value % &self.modulus
    }

    pub fn contains(&self, value: &BigUint) -> bool {
        value < &self.modulus
    }

    pub fn add(&self, a: &BigUint, b: &BigUint) -> BigUint {
        (a + b) % &self.modulus
    }

    pub fn sub(&self, a: &BigUint, b: &BigUint) -> BigUint {
        let a = self.reduce(a);
        let b = self.reduce(b);
        if a >= b {
            a - b
        } else {
            &self.modulus - (b - a)
        }
    }

    pub fn neg(&self, a: &BigUint) -> BigUint {
        let a = self.reduce(a);
        if a.is_zero() {
            a
        } else {
            &self.modulus - a
        }
    }

    pub fn mul(&self, a: &BigUint, b: &BigUint) -> BigUint {
        (a * b) % &self.modulus
    }

    pub fn square(&self, a: &BigUint) -> BigUint {
        self.mul(a, a)
    }

    pub fn pow(&self, base: &BigUint, exponent: &BigUint) -> BigUint {
        base.modpow(exponent, &self.modulus)
    }

    /// Inverse by the extended Euclidean algorithm. `None` for zero, or
    /// when `a` shares a factor with the modulus.
    pub fn inverse(&self, a: &BigUint) -> Option<BigUint> {
        let a = self.reduce(a);
        if a.is_zero() {
            return None;
        }
        a.modinv(&self.modulus)
    }

    /// Square root for moduli with `m ≡ 3 (mod 4)`, computed as
    /// `a^((m+1)/4)`. Returns `None` when `a` is not a quadratic residue.
    pub fn sqrt(&self, a: &BigUint) -> Option<BigUint> {
        let a = self.reduce(a);
        let exponent = (&self.modulus + BigUint::one()) >> 2;
        let candidate = self.pow(&a, &exponent);
        if self.square(&candidate) == a {
            Some(candidate)
        } else {
            None
        }
    }
}
