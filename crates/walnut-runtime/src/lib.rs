//! Verification of WalnutDSA signatures.
//!
//! A signature `(digest, sig)` for public key `(P(w), P(w′))` is accepted iff the
//! matrix of `P(w) ⋆ sig` equals the matrix of `(I, id) ⋆ E(digest)` times the
//! matrix of `P(w′)`, where `E` is the digest encoder run with the signer's basis.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod verifier;

pub use verifier::Verifier;
