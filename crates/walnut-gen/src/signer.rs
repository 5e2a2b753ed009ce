//! Key generation and signing.

use braid_core::{free_reduce, BraidWord};
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cloak::{generate_cloak, CloakConfig};
use crate::emult::{e_multiply, EvaluationContext, RepresentationState};
use crate::encoder::{encode_message, EncoderBasis};
use crate::error::WalnutError;
use crate::keys::{KeyPair, PrivateKey, PublicKey};
use crate::params::PublicParams;
use crate::rewrite::{Partition, RewriteConfig, StochasticRewriter};
use crate::signature::Signature;

/// Configuration for the signer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignerConfig {
    /// Shortest private word drawn, before free reduction.
    pub min_key_length: usize,
    /// Longest private word drawn, before free reduction.
    pub max_key_length: usize,
    /// Cloaking element search bounds.
    pub cloak: CloakConfig,
    /// Stochastic rewriter settings.
    pub rewriter: RewriteConfig,
    /// Whether signature words are passed through the rewriter.
    pub rewrite: bool,
}

impl Default for SignerConfig {
    fn default() -> Self {
        Self {
            min_key_length: 25,
            max_key_length: 50,
            cloak: CloakConfig::default(),
            rewriter: RewriteConfig::default(),
            rewrite: true,
        }
    }
}

/// WalnutDSA key generator and signer parametrized by an RNG.
pub struct Signer<R: RngCore + CryptoRng> {
    rng: R,
    config: SignerConfig,
    params: PublicParams,
    context: EvaluationContext,
    partition: Partition,
}

impl<R: RngCore + CryptoRng> Signer<R> {
    /// Creates a signer with default configuration after validating `params`.
    pub fn new(rng: R, params: PublicParams) -> Result<Self, WalnutError> {
        Self::with_config(rng, params, SignerConfig::default())
    }

    /// Creates a signer with explicit configuration.
    pub fn with_config(
        rng: R,
        params: PublicParams,
        config: SignerConfig,
    ) -> Result<Self, WalnutError> {
        params.validate()?;
        let context = params.evaluation_context()?;
        let partition = params.rewrite_partition()?;
        Ok(Self {
            rng,
            config,
            params,
            context,
            partition,
        })
    }

    /// Returns a mutable reference to the configuration.
    pub fn config_mut(&mut self) -> &mut SignerConfig {
        &mut self.config
    }

    /// Public parameters in use.
    pub fn params(&self) -> &PublicParams {
        &self.params
    }

    /// Draws two private words and computes their public images.
    pub fn generate_keypair(&mut self) -> Result<KeyPair, WalnutError> {
        let (min, max) = (self.config.min_key_length, self.config.max_key_length);
        if min > max {
            return Err(WalnutError::params(format!(
                "private key length range {min}..={max} is empty"
            )));
        }
        let degree = self.params.degree;
        let trivial = RepresentationState::identity(degree);

        let w = BraidWord::random(&mut self.rng, degree, min..=max)?.free_reduce();
        let w_prime = BraidWord::random(&mut self.rng, degree, min..=max)?.free_reduce();
        let pw = e_multiply(&trivial, &w, &self.context)?;
        let pw_prime = e_multiply(&trivial, &w_prime, &self.context)?;
        debug!(w = w.len(), w_prime = w_prime.len(), "generated key pair");

        Ok(KeyPair {
            private: PrivateKey { w, w_prime },
            public: PublicKey { pw, pw_prime },
        })
    }

    /// Signs `message`, returning the signature and the encoder basis it used.
    ///
    /// The signature word is `v₁ · w⁻¹ · v · E(m) · w′ · v₂`, freely reduced and
    /// then rewritten, where the cloaks `v`, `v₁`, `v₂` fix the trivial state,
    /// `P(w)`, and `P(w′)` respectively.
    pub fn sign(
        &mut self,
        private: &PrivateKey,
        public: &PublicKey,
        message: &[u8],
    ) -> Result<(Signature, EncoderBasis), WalnutError> {
        private.validate(&self.params)?;
        public.validate(&self.params)?;
        let degree = self.params.degree;
        let seed = self.params.cloak_seed_generator;
        let trivial = RepresentationState::identity(degree);

        let v = generate_cloak(&mut self.rng, &trivial, &self.context, seed, &self.config.cloak)?;
        let v1 = generate_cloak(&mut self.rng, &public.pw, &self.context, seed, &self.config.cloak)?;
        let v2 = generate_cloak(
            &mut self.rng,
            &public.pw_prime,
            &self.context,
            seed,
            &self.config.cloak,
        )?;

        let (digest, encoded, basis) = encode_message(&mut self.rng, message, degree)?;

        let raw = v1
            .concatenate(&private.w.inverse())
            .concatenate(&v)
            .concatenate(&encoded)
            .concatenate(&private.w_prime)
            .concatenate(&v2);
        let reduced = BraidWord::new(degree, free_reduce(raw.generators()))?;

        let word = if self.config.rewrite {
            let rewriter = StochasticRewriter::new(&self.partition, self.config.rewriter.clone())?;
            rewriter.rewrite(&mut self.rng, &reduced)?
        } else {
            reduced.clone()
        };
        debug!(
            encoded = encoded.len(),
            reduced = reduced.len(),
            signature = word.len(),
            "signed message"
        );

        Ok((Signature::new(digest, word), basis))
    }
}
