//! Public parameters shared by signer and verifier.

use serde::{Deserialize, Serialize};

use crate::cloak::find_t_ones;
use crate::emult::EvaluationContext;
use crate::error::WalnutError;
use crate::field::GaloisField;
use crate::rewrite::Partition;

/// Scheme identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SchemeId {
    /// WalnutDSA over the colored Burau representation with E-Multiplication.
    WalnutDsa,
}

/// Parameters every party must agree on.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicParams {
    /// Braid group degree `N`.
    pub degree: usize,
    /// Exponent `k` of the field GF(2^k).
    pub field_exponent: u32,
    /// Evaluation value of each strand, read as an element of GF(2^k).
    pub t_values: Vec<u32>,
    /// Rewriter partition of `N - 1`.
    pub partition: Vec<usize>,
    /// Generator squared inside every cloaking element.
    pub cloak_seed_generator: usize,
    /// Scheme identifier.
    pub scheme: SchemeId,
    /// Version tag for future compatibility changes.
    pub version: u32,
}

impl PublicParams {
    /// `N = 8`, GF(32), t-values `[6, 1, 1, 9, 19, 14, 29, 30]`, partition `[3, 4]`.
    pub fn reference() -> Self {
        Self {
            degree: 8,
            field_exponent: 5,
            t_values: vec![6, 1, 1, 9, 19, 14, 29, 30],
            partition: vec![3, 4],
            cloak_seed_generator: 3,
            scheme: SchemeId::WalnutDsa,
            version: 1,
        }
    }

    /// Checks that the parameters can drive key generation, signing, and verification.
    pub fn validate(&self) -> Result<(), WalnutError> {
        if self.degree < 5 {
            return Err(WalnutError::params(format!(
                "degree {} is below 5; the encoder needs four pure generators",
                self.degree
            )));
        }
        let field = self.field()?;
        if self.t_values.len() != self.degree {
            return Err(WalnutError::params(format!(
                "{} t-values for degree {}",
                self.t_values.len(),
                self.degree
            )));
        }
        if let Some(&t) = self
            .t_values
            .iter()
            .find(|&&t| t == 0 || t >= field.order())
        {
            return Err(WalnutError::params(format!(
                "t-value {t} outside [1, {})",
                field.order()
            )));
        }
        self.rewrite_partition()?;
        if self.cloak_seed_generator < 1 || self.cloak_seed_generator >= self.degree {
            return Err(WalnutError::params(format!(
                "cloak seed generator {} outside [1, {}]",
                self.cloak_seed_generator,
                self.degree - 1
            )));
        }
        find_t_ones(&self.evaluation_context()?, self.degree)?;
        Ok(())
    }

    /// The field GF(2^k).
    pub fn field(&self) -> Result<GaloisField, WalnutError> {
        Ok(GaloisField::new(self.field_exponent)?)
    }

    /// The t-values as field elements.
    pub fn evaluation_context(&self) -> Result<EvaluationContext, WalnutError> {
        Ok(EvaluationContext::new(self.field()?, &self.t_values)?)
    }

    /// The validated rewriter partition.
    pub fn rewrite_partition(&self) -> Result<Partition, WalnutError> {
        Partition::new(self.partition.clone(), self.degree)
    }

    /// Serializes the parameters with `bincode`.
    pub fn to_bytes(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    /// Deserializes parameters with `bincode`. The result is not validated.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, bincode::Error> {
        bincode::deserialize(bytes)
    }
}

impl Default for PublicParams {
    fn default() -> Self {
        Self::reference()
    }
}
