//! GF(2^k) arithmetic backed by log/antilog tables.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Primitive polynomials `x^k + …` used to build GF(2^k), indexed by `k`.
const PRIMITIVE_POLYNOMIALS: [(u32, u32); 15] = [
    (2, 0x7),
    (3, 0xb),
    (4, 0x13),
    (5, 0x25),
    (6, 0x43),
    (7, 0x83),
    (8, 0x11d),
    (9, 0x211),
    (10, 0x409),
    (11, 0x805),
    (12, 0x1053),
    (13, 0x201b),
    (14, 0x4443),
    (15, 0x8003),
    (16, 0x1100b),
];

/// Errors raised by field arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FieldError {
    /// Division by, or inversion of, the zero element.
    #[error("division by zero in GF(2^k)")]
    DivisionByZero,

    /// No primitive polynomial is tabulated for this exponent.
    #[error("unsupported field exponent {exponent} (supported: 2..=16)")]
    UnsupportedExponent {
        /// Requested exponent `k`.
        exponent: u32,
    },

    /// An integer does not name an element of the field.
    #[error("value {value} is not an element of a field of order {order}")]
    ElementOutOfRange {
        /// Rejected integer.
        value: u32,
        /// Field order `2^k`.
        order: u32,
    },

    /// A decoded matrix holds a number of entries other than `size²`.
    #[error("matrix of size {size} decoded with {entries} entries")]
    MatrixShape {
        /// Declared side length.
        size: usize,
        /// Number of entries present.
        entries: usize,
    },
}

/// Element of GF(2^k), identified by the bit pattern of its polynomial coefficients.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FieldElement(u16);

impl FieldElement {
    /// Additive identity.
    pub const ZERO: Self = Self(0);
    /// Multiplicative identity.
    pub const ONE: Self = Self(1);

    /// Integer identifier of the element.
    #[inline]
    pub const fn value(self) -> u16 {
        self.0
    }

    /// Returns true for the additive identity.
    #[inline]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }
}

/// The field GF(2^k) for a fixed primitive polynomial.
///
/// Elements are only combined through the named operations below; the tables map
/// each non-zero element to its discrete logarithm base `x` and back.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GaloisField {
    exponent: u32,
    modulus: u32,
    exp: Vec<u16>,
    log: Vec<u16>,
}

impl GaloisField {
    /// Builds GF(2^exponent).
    pub fn new(exponent: u32) -> Result<Self, FieldError> {
        let modulus = PRIMITIVE_POLYNOMIALS
            .iter()
            .find(|(k, _)| *k == exponent)
            .map(|(_, poly)| *poly)
            .ok_or(FieldError::UnsupportedExponent { exponent })?;

        let order = 1u32 << exponent;
        let group_order = (order - 1) as usize;
        // Doubled so that exp[log a + log b] never wraps.
        let mut exp = vec![0u16; 2 * group_order];
        let mut log = vec![0u16; order as usize];

        let mut x = 1u32;
        for i in 0..group_order {
            exp[i] = x as u16;
            log[x as usize] = i as u16;
            x <<= 1;
            if x & order != 0 {
                x ^= modulus;
            }
        }
        for i in group_order..exp.len() {
            exp[i] = exp[i - group_order];
        }

        Ok(Self {
            exponent,
            modulus,
            exp,
            log,
        })
    }

    /// Exponent `k` of the field GF(2^k).
    pub fn exponent(&self) -> u32 {
        self.exponent
    }

    /// Number of elements, `2^k`.
    pub fn order(&self) -> u32 {
        1u32 << self.exponent
    }

    /// Bit pattern of the primitive polynomial.
    pub fn modulus(&self) -> u32 {
        self.modulus
    }

    /// Interprets an integer as a field element.
    pub fn element(&self, value: u32) -> Result<FieldElement, FieldError> {
        if value >= self.order() {
            return Err(FieldError::ElementOutOfRange {
                value,
                order: self.order(),
            });
        }
        Ok(FieldElement(value as u16))
    }

    /// Returns true if `value` names an element of this field.
    pub fn contains(&self, value: FieldElement) -> bool {
        u32::from(value.0) < self.order()
    }

    /// Field addition (bitwise XOR).
    #[inline]
    pub fn add(&self, a: FieldElement, b: FieldElement) -> FieldElement {
        FieldElement(a.0 ^ b.0)
    }

    /// Field subtraction; identical to addition in characteristic 2.
    #[inline]
    pub fn sub(&self, a: FieldElement, b: FieldElement) -> FieldElement {
        self.add(a, b)
    }

    /// Field multiplication.
    #[inline]
    pub fn mul(&self, a: FieldElement, b: FieldElement) -> FieldElement {
        if a.is_zero() || b.is_zero() {
            return FieldElement::ZERO;
        }
        let idx = self.log[a.0 as usize] as usize + self.log[b.0 as usize] as usize;
        FieldElement(self.exp[idx])
    }

    /// Multiplicative inverse.
    pub fn inverse(&self, a: FieldElement) -> Result<FieldElement, FieldError> {
        if a.is_zero() {
            return Err(FieldError::DivisionByZero);
        }
        let group_order = (self.order() - 1) as usize;
        let idx = (group_order - self.log[a.0 as usize] as usize) % group_order;
        Ok(FieldElement(self.exp[idx]))
    }

    /// Field division `a / b`.
    pub fn div(&self, a: FieldElement, b: FieldElement) -> Result<FieldElement, FieldError> {
        let inv = self.inverse(b)?;
        Ok(self.mul(a, inv))
    }

    /// Renders an element as a polynomial in `x`, e.g. `x^4 + x + 1`.
    pub fn polynomial_string(&self, a: FieldElement) -> String {
        if a.is_zero() {
            return "0".to_string();
        }
        let terms: Vec<String> = (0..self.exponent)
            .rev()
            .filter(|bit| (a.0 >> bit) & 1 == 1)
            .map(|bit| match bit {
                0 => "1".to_string(),
                1 => "x".to_string(),
                _ => format!("x^{bit}"),
            })
            .collect();
        terms.join(" + ")
    }
}
