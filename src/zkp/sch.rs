// Copyright (c) Facebook, Inc. and its affiliates.
// Modifications Copyright (c) 2022-2023 Bolt Labs Holdings, Inc
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

//! Schnorr's identification protocol over the session curve, made
//! non-interactive with a Fiat-Shamir transform.
//!
//! Signing round four uses this to prove knowledge of the nonce share
//! behind the revealed commitment `Γ_i = γ_i·G`.

use crate::curve::{CurvePoint, CurveScalar};
use crate::errors::*;
use crate::utils::positive_bn_random_from_transcript;
use crate::zkp::Proof;
use merlin::Transcript;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SchnorrProof {
    /// Commitment to the mask (`A = a·G`).
    commitment: CurvePoint,
    /// Fiat-Shamir challenge.
    challenge: CurveScalar,
    /// Response `z = a + e·x`.
    response: CurveScalar,
}

/// The statement: a group element `X` whose discrete log the prover
/// knows.
#[derive(Clone, Debug, Serialize)]
pub struct SchnorrStatement {
    public: CurvePoint,
}

impl SchnorrStatement {
    pub(crate) fn new(public: &CurvePoint) -> Self {
        Self { public: *public }
    }
}

pub(crate) struct SchnorrSecret {
    witness: CurveScalar,
}

impl SchnorrSecret {
    pub(crate) fn new(witness: &CurveScalar) -> Self {
        Self {
            witness: witness.clone(),
        }
    }
}

impl Debug for SchnorrSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("sch::SchnorrSecret")
            .field("witness", &"[redacted]")
            .finish()
    }
}

fn challenge_scalar(input: &SchnorrStatement, commitment: &CurvePoint) -> Result<CurveScalar> {
    let curve = input.public.curve();
    let mut transcript = Transcript::new(b"SchnorrProof");
    transcript.append_message(b"statement", &serialize!(input)?);
    transcript.append_message(b"generator", &curve.generator().to_uncompressed_bytes()?);
    transcript.append_message(b"group order", &curve.order().to_bytes());
    transcript.append_message(b"A", &serialize!(commitment)?);
    let e = positive_bn_random_from_transcript(&mut transcript, &curve.order());
    curve.scalar_from_bn(&e)
}

impl Proof for SchnorrProof {
    type CommonInput = SchnorrStatement;
    type ProverSecret = SchnorrSecret;

    fn prove<R: RngCore + CryptoRng>(
        rng: &mut R,
        input: &Self::CommonInput,
        secret: &Self::ProverSecret,
    ) -> Result<Self> {
        let curve = input.public.curve();
        let mask = curve.random_nonzero_scalar(rng);
        let commitment = curve.base_mul(&mask)?;
        let challenge = challenge_scalar(input, &commitment)?;
        let response = mask.add(&challenge.mul(&secret.witness)?)?;
        Ok(Self {
            commitment,
            challenge,
            response,
        })
    }

    fn verify(&self, input: &Self::CommonInput) -> Result<()> {
        let curve = input.public.curve();
        if input.public.is_identity() {
            return Err(Error::DomainFailure("statement is the identity".into()));
        }
        let challenge = challenge_scalar(input, &self.commitment)?;
        if challenge != self.challenge {
            return verify_err!("Fiat-Shamir challenge mismatch");
        }
        // z·G == A + e·X
        let lhs = curve.base_mul(&self.response)?;
        let rhs = self.commitment.add(&input.public.mul(&challenge)?)?;
        if lhs != rhs {
            return verify_err!("response equation failed");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::CurveTag;
    use crate::utils::testing::get_test_rng;

    #[test]
    fn schnorr_round_trips_on_both_curves() {
        let mut rng = get_test_rng();
        for curve in [CurveTag::Secp256k1, CurveTag::NistP256] {
            let x = curve.random_nonzero_scalar(&mut rng);
            let big_x = curve.base_mul(&x).unwrap();
            let statement = SchnorrStatement::new(&big_x);
            let proof = SchnorrProof::prove(&mut rng, &statement, &SchnorrSecret::new(&x)).unwrap();
            proof.verify(&statement).unwrap();

            let round: SchnorrProof =
                bincode::deserialize(&bincode::serialize(&proof).unwrap()).unwrap();
            round.verify(&statement).unwrap();
        }
    }

    #[test]
    fn wrong_witness_fails() {
        let mut rng = get_test_rng();
        let curve = CurveTag::Secp256k1;
        let x = curve.random_nonzero_scalar(&mut rng);
        let big_x = curve.base_mul(&x).unwrap();
        let statement = SchnorrStatement::new(&big_x);

        let wrong = x.add(&curve.scalar_from_u64(1)).unwrap();
        let proof =
            SchnorrProof::prove(&mut rng, &statement, &SchnorrSecret::new(&wrong)).unwrap();
        assert!(proof.verify(&statement).is_err());
    }

    #[test]
    fn proof_is_bound_to_its_statement() {
        let mut rng = get_test_rng();
        let curve = CurveTag::NistP256;
        let x = curve.random_nonzero_scalar(&mut rng);
        let statement = SchnorrStatement::new(&curve.base_mul(&x).unwrap());
        let proof = SchnorrProof::prove(&mut rng, &statement, &SchnorrSecret::new(&x)).unwrap();

        let other = SchnorrStatement::new(
            &curve
                .base_mul(&curve.random_nonzero_scalar(&mut rng))
                .unwrap(),
        );
        assert!(proof.verify(&other).is_err());
    }
}
