// Copyright (c) Facebook, Inc. and its affiliates.
// Modifications Copyright (c) 2022-2023 Bolt Labs Holdings, Inc
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

//! Composite discrete log proof.
//!
//! A Schnorr-style Σ-protocol over the quadratic-residue subgroup of
//! `Z*_Ñ`: the prover knows `α` with `h2 = h1^α mod Ñ` and convinces a
//! verifier who cannot factor `Ñ`. Made non-interactive with a
//! Fiat-Shamir transform over `(g, q, h1, h2, Ñ)`; the challenge lives in
//! `[0, q)` for the session's curve order `q`.
//!
//! Key generation verifies a pair of these per peer, once for each
//! direction between `h1` and `h2`.

use crate::curve::CurveTag;
use crate::errors::*;
use crate::utils::{modpow, positive_bn_random_from_transcript, random_positive_bn};
use crate::zkp::Proof;
use libpaillier::unknown_order::BigNumber;
use merlin::Transcript;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CdlProof {
    /// Commitment to the masking exponent (`u = h1^r`).
    commitment: BigNumber,
    /// Fiat-Shamir challenge.
    challenge: BigNumber,
    /// Response binding the mask, challenge, and secret exponent.
    response: BigNumber,
}

/// Common input known to both the prover and verifier.
#[derive(Clone, Serialize)]
pub struct CdlStatement {
    curve: CurveTag,
    n: BigNumber,
    h1: BigNumber,
    h2: BigNumber,
}

impl CdlStatement {
    pub(crate) fn new(curve: CurveTag, n: &BigNumber, h1: &BigNumber, h2: &BigNumber) -> Self {
        Self {
            curve,
            n: n.clone(),
            h1: h1.clone(),
            h2: h2.clone(),
        }
    }
}

/// The prover's secret: the exponent and the order of the subgroup
/// generated by `h1`, both derived from the factorization of `Ñ`.
pub(crate) struct CdlSecret {
    exponent: BigNumber,
    subgroup_order: BigNumber,
}

impl CdlSecret {
    pub(crate) fn new(exponent: &BigNumber, subgroup_order: &BigNumber) -> Self {
        Self {
            exponent: exponent.clone(),
            subgroup_order: subgroup_order.clone(),
        }
    }
}

impl Debug for CdlSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("cdl::CdlSecret")
            .field("exponent", &"[redacted]")
            .field("subgroup_order", &"[redacted]")
            .finish()
    }
}

fn fill_transcript(transcript: &mut Transcript, input: &CdlStatement, commitment: &BigNumber) -> Result<()> {
    transcript.append_message(b"CdlProof statement", &serialize!(input)?);
    transcript.append_message(
        b"generator",
        &input.curve.generator().to_uncompressed_bytes()?,
    );
    transcript.append_message(b"group order", &input.curve.order().to_bytes());
    transcript.append_message(b"u", &commitment.to_bytes());
    Ok(())
}

impl Proof for CdlProof {
    type CommonInput = CdlStatement;
    type ProverSecret = CdlSecret;

    fn prove<R: RngCore + CryptoRng>(
        rng: &mut R,
        input: &Self::CommonInput,
        secret: &Self::ProverSecret,
    ) -> Result<Self> {
        // Mask sampled over the full subgroup order, so the reduced
        // response reveals nothing about the exponent.
        let mask = random_positive_bn(rng, &secret.subgroup_order);
        let commitment = modpow(&input.h1, &mask, &input.n);

        let mut transcript = Transcript::new(b"CdlProof");
        fill_transcript(&mut transcript, input, &commitment)?;
        let challenge = positive_bn_random_from_transcript(&mut transcript, &input.curve.order());

        let response = mask.modadd(
            &challenge.modmul(&secret.exponent, &secret.subgroup_order),
            &secret.subgroup_order,
        );

        Ok(Self {
            commitment,
            challenge,
            response,
        })
    }

    fn verify(&self, input: &Self::CommonInput) -> Result<()> {
        if input.n <= BigNumber::one() {
            return Err(Error::DomainFailure("modulus must exceed one".into()));
        }
        for value in [&input.h1, &input.h2, &self.commitment] {
            if value <= &BigNumber::zero() || value >= &input.n {
                return verify_err!("group element outside Z*_n");
            }
        }
        if self.response < BigNumber::zero() || self.response >= input.n {
            return verify_err!("response out of range");
        }

        let mut transcript = Transcript::new(b"CdlProof");
        fill_transcript(&mut transcript, input, &self.commitment)?;
        let challenge = positive_bn_random_from_transcript(&mut transcript, &input.curve.order());
        if challenge != self.challenge {
            return verify_err!("Fiat-Shamir challenge mismatch");
        }

        // h1^z == u * h2^e (mod n)
        let lhs = modpow(&input.h1, &self.response, &input.n);
        let rhs = self
            .commitment
            .modmul(&modpow(&input.h2, &challenge, &input.n), &input.n);
        if lhs != rhs {
            return verify_err!("response equation failed");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::testing::get_test_rng;

    // A fixed pair of small safe primes keeps these tests quick; the full
    // parameter sizes are exercised by the proof-params tests.
    fn small_setup(rng: &mut impl rand::RngCore) -> (CdlStatement, CdlSecret) {
        let p = BigNumber::from(1283u64);
        let q = BigNumber::from(1319u64);
        let n = &p * &q;
        let subgroup_order: BigNumber = ((&p - 1) / 2) * ((&q - 1) / 2);
        let f = BigNumber::from_rng(&n, rng);
        let h1 = f.modpow(&BigNumber::from(2u64), &n);
        let alpha = BigNumber::from_rng(&subgroup_order, rng);
        let h2 = h1.modpow(&alpha, &n);
        (
            CdlStatement::new(CurveTag::Secp256k1, &n, &h1, &h2),
            CdlSecret::new(&alpha, &subgroup_order),
        )
    }

    #[test]
    fn cdl_proof_round_trips() {
        let mut rng = get_test_rng();
        let (statement, secret) = small_setup(&mut rng);
        let proof = CdlProof::prove(&mut rng, &statement, &secret).unwrap();
        proof.verify(&statement).unwrap();

        let round: CdlProof = bincode::deserialize(&bincode::serialize(&proof).unwrap()).unwrap();
        round.verify(&statement).unwrap();
    }

    #[test]
    fn wrong_exponent_fails() {
        let mut rng = get_test_rng();
        let (statement, secret) = small_setup(&mut rng);
        let bad = CdlSecret::new(
            &(&secret.exponent + 1),
            &secret.subgroup_order,
        );
        let proof = CdlProof::prove(&mut rng, &statement, &bad).unwrap();
        assert!(proof.verify(&statement).is_err());
    }

    #[test]
    fn tampered_fields_fail() {
        let mut rng = get_test_rng();
        let (statement, secret) = small_setup(&mut rng);
        let proof = CdlProof::prove(&mut rng, &statement, &secret).unwrap();

        let mut bad = proof.clone();
        bad.response = bad.response.modadd(&BigNumber::one(), &statement.n);
        assert!(bad.verify(&statement).is_err());

        let mut bad = proof;
        bad.commitment = bad.commitment.modadd(&BigNumber::one(), &statement.n);
        assert!(bad.verify(&statement).is_err());
    }
}
