//! Signature verifier.

use tracing::debug;
use walnut_gen::{
    e_multiply, encode_digest, Digest, EncoderBasis, EvaluationContext, PublicKey,
    PublicParams, RepresentationState, Signature, WalnutError,
};

/// Verifier bound to a set of validated public parameters.
#[derive(Clone, Debug)]
pub struct Verifier {
    params: PublicParams,
    context: EvaluationContext,
}

impl Verifier {
    /// Validates `params` and prepares the evaluation context.
    pub fn new(params: PublicParams) -> Result<Self, WalnutError> {
        params.validate()?;
        let context = params.evaluation_context()?;
        Ok(Self { params, context })
    }

    /// Public parameters in use.
    pub fn params(&self) -> &PublicParams {
        &self.params
    }

    /// Checks `signature` against `public`.
    ///
    /// Returns `Ok(false)` when the verification equation fails; errors are kept
    /// for malformed inputs.
    pub fn verify(
        &self,
        public: &PublicKey,
        signature: &Signature,
        basis: &EncoderBasis,
    ) -> Result<bool, WalnutError> {
        public.validate(&self.params)?;
        let degree = self.params.degree;
        let encoded = encode_digest(signature.digest(), degree, basis)?;
        let pe = e_multiply(&RepresentationState::identity(degree), &encoded, &self.context)?;
        let lhs = e_multiply(&public.pw, signature.word(), &self.context)?;
        let rhs = pe.matrix.mul(&public.pw_prime.matrix, self.context.field());
        let accepted = lhs.matrix == rhs;
        debug!(
            digest = %signature.digest(),
            length = signature.word().len(),
            accepted,
            "verified signature"
        );
        Ok(accepted)
    }

    /// Checks the signature word against the digest of `message` rather than the
    /// digest carried in `signature`.
    pub fn verify_message(
        &self,
        public: &PublicKey,
        message: &[u8],
        signature: &Signature,
        basis: &EncoderBasis,
    ) -> Result<bool, WalnutError> {
        let rebound = Signature::new(Digest::of(message), signature.word().clone());
        self.verify(public, &rebound, basis)
    }
}
