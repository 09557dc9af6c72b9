// Copyright (c) Facebook, Inc. and its affiliates.
// Modifications Copyright (c) 2022-2023 Bolt Labs Holdings, Inc
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

//! Paillier square-freeness proof.
//!
//! Knowing the factorization of `N = pq` with safe-prime factors makes
//! `N` invertible modulo `φ(N)`, so the prover can extract N-th roots of
//! arbitrary challenge values. The verifier re-derives the challenges and
//! checks `y_i^N == x_i (mod N)`; a modulus sharing a factor with its
//! totient would leave some challenge without a root.
//!
//! Challenges are bound to the session by hashing the participant's
//! position, the joint public key, the curve parameters, and the modulus.

use crate::curve::{CurvePoint, CurveTag};
use crate::errors::{Error, Result};
use crate::paillier::{DecryptionKey, EncryptionKey};
use crate::parameters::PSF_PROOF_LENGTH;
use crate::utils::{bn_mod, modpow};
use libpaillier::unknown_order::BigNumber;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::error;

/// A vector of `PSF_PROOF_LENGTH` N-th roots, one per derived challenge.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PsfProof(Vec<BigNumber>);

/// Everything the prover needs: the curve, its Paillier secret key, its
/// 1-based position `pi`, and the joint public key `y`.
pub struct PsfProofParams<'a> {
    pub curve: CurveTag,
    pub secret_key: &'a DecryptionKey,
    pub pi: u32,
    pub y: &'a CurvePoint,
}

/// The verifier's view: the prover's public key in place of the secret.
pub struct PsfVerifyParams<'a> {
    pub curve: CurveTag,
    pub public_key: &'a EncryptionKey,
    pub pi: u32,
    pub y: &'a CurvePoint,
}

impl PsfProofParams<'_> {
    pub fn prove(&self) -> Result<PsfProof> {
        let n = self.secret_key.modulus();
        let challenges = generate_challenges(self.curve, n, self.pi, self.y)?;

        let totient = self.secret_key.totient();
        // Invertibility here is exactly the square-freeness being proven.
        let root_exponent = n.invert(&totient).ok_or(Error::CouldNotInvertBigNumber)?;

        let proof = challenges
            .iter()
            .map(|x| modpow(x, &root_exponent, n))
            .collect();
        Ok(PsfProof(proof))
    }
}

impl PsfProof {
    pub fn verify(&self, params: &PsfVerifyParams) -> Result<()> {
        let n = params.public_key.n();
        let challenges = generate_challenges(params.curve, n, params.pi, params.y)?;
        if self.0.len() != PSF_PROOF_LENGTH {
            return Err(Error::IncorrectCount {
                expected: PSF_PROOF_LENGTH,
                actual: self.0.len(),
            });
        }
        for (root, challenge) in self.0.iter().zip(challenges.iter()) {
            if root <= &BigNumber::zero() || root >= n {
                return verify_err!("proof element outside (0, N)");
            }
            if &modpow(root, n, n) != challenge {
                error!("square-freeness root failed to reproduce its challenge");
                return verify_err!("proof element is not an N-th root of its challenge");
            }
        }
        Ok(())
    }
}

/// Derive the `PSF_PROOF_LENGTH` challenge values in `[1, n)`.
///
/// Each challenge hashes `(pi, y, curve parameters, n, index)` and reduces
/// the digest modulo `n`; a zero residue re-hashes with a bumped attempt
/// counter, which also lets moduli smaller than the digest work.
pub(crate) fn generate_challenges(
    curve: CurveTag,
    n: &BigNumber,
    pi: u32,
    y: &CurvePoint,
) -> Result<Vec<BigNumber>> {
    if pi == 0 {
        return Err(Error::NilArgument);
    }
    if y.is_identity() || y.curve() != curve {
        return Err(Error::NilArgument);
    }
    if n <= &BigNumber::one() {
        return Err(Error::DomainFailure("modulus must exceed one".into()));
    }

    let y_bytes = y.to_uncompressed_bytes()?;
    let g_bytes = curve.generator().to_uncompressed_bytes()?;
    let mut challenges = Vec::with_capacity(PSF_PROOF_LENGTH);
    for index in 0..PSF_PROOF_LENGTH as u32 {
        let mut attempt = 0u32;
        loop {
            let digest = Sha256::new()
                .chain_update(pi.to_be_bytes())
                .chain_update(&y_bytes)
                .chain_update(curve.field_prime().to_bytes())
                .chain_update(curve.order().to_bytes())
                .chain_update(&g_bytes)
                .chain_update(n.to_bytes())
                .chain_update(index.to_be_bytes())
                .chain_update(attempt.to_be_bytes())
                .finalize();
            let x = bn_mod(&BigNumber::from_slice(digest.as_slice()), n);
            if x > BigNumber::zero() {
                challenges.push(x);
                break;
            }
            attempt += 1;
        }
    }
    Ok(challenges)
}
