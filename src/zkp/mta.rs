// Copyright (c) Facebook, Inc. and its affiliates.
// Modifications Copyright (c) 2022-2023 Bolt Labs Holdings, Inc
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

//! Multiplicative-to-additive conversion with range proofs.
//!
//! Alice holds `a` and publishes `c1 = Enc_A(a)`; Bob holds `b`. Bob
//! computes `c2 = c1^b ⊕ Enc_A(β')` and returns it, keeping `β = -β' mod q`.
//! Alice decrypts `α = a·b + β' mod q`, so `α + β = a·b` with both summands
//! uniform. Three proofs keep the parties honest:
//!
//! * [`Range1Proof`] — Alice's plaintext lies in `[-q³, q³]`.
//! * [`ResponseProof`] via [`ResponseProofParams::prove`] — Bob's factor
//!   lies in `[-q³, q³]` and his mask in `[-q⁷, q⁷]`.
//! * The same proof via [`ResponseProofParams::prove_wc`] — additionally
//!   binds Bob's factor to a public point `B = b·G`.
//!
//! All three are Σ-protocols in the prover-chosen Paillier group crossed
//! with the verifier's ring `(Ñ, h1, h2)`, following the classic MtA
//! constructions. Honest inputs are far inside the proven ranges; the
//! cubic and seventh-power slack is what the soundness argument loses.

use crate::curve::{CurvePoint, CurveScalar, CurveTag};
use crate::errors::*;
use crate::paillier::{Ciphertext, DecryptionKey, EncryptionKey};
use crate::proof_params::ProofParams;
use crate::utils::{
    modpow, positive_bn_random_from_transcript, random_bn_in_z_star, random_nonzero_bn,
};
use crate::zkp::Proof;
use libpaillier::unknown_order::BigNumber;
use merlin::Transcript;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Proof that the plaintext of a Paillier ciphertext lies in `[-q³, q³]`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range1Proof {
    z: BigNumber,
    u: BigNumber,
    w: BigNumber,
    s: BigNumber,
    s1: BigNumber,
    s2: BigNumber,
    e: BigNumber,
}

/// Common input for [`Range1Proof`]: the prover's encryption key and
/// ciphertext, under the *verifier's* ring parameters.
#[derive(Clone, Serialize)]
pub(crate) struct Range1Statement {
    pub curve: CurveTag,
    pub proof_params: ProofParams,
    pub pk: EncryptionKey,
    pub ciphertext: Ciphertext,
}

impl Range1Statement {
    pub(crate) fn new(
        curve: CurveTag,
        proof_params: &ProofParams,
        pk: &EncryptionKey,
        ciphertext: &Ciphertext,
    ) -> Self {
        Self {
            curve,
            proof_params: proof_params.clone(),
            pk: pk.clone(),
            ciphertext: ciphertext.clone(),
        }
    }
}

pub(crate) struct Range1Secret {
    message: BigNumber,
    nonce: BigNumber,
}

impl Range1Secret {
    pub(crate) fn new(message: &BigNumber, nonce: &BigNumber) -> Self {
        Self {
            message: message.clone(),
            nonce: nonce.clone(),
        }
    }
}

impl Debug for Range1Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("mta::Range1Secret")
            .field("message", &"[redacted]")
            .field("nonce", &"[redacted]")
            .finish()
    }
}

fn range1_challenge(
    input: &Range1Statement,
    z: &BigNumber,
    u: &BigNumber,
    w: &BigNumber,
) -> Result<BigNumber> {
    let mut transcript = Transcript::new(b"Range1Proof");
    transcript.append_message(b"statement", &serialize!(input)?);
    transcript.append_message(
        b"(z, u, w)",
        &[z.to_bytes(), u.to_bytes(), w.to_bytes()].concat(),
    );
    Ok(positive_bn_random_from_transcript(
        &mut transcript,
        &input.curve.order(),
    ))
}

impl Proof for Range1Proof {
    type CommonInput = Range1Statement;
    type ProverSecret = Range1Secret;

    fn prove<R: RngCore + CryptoRng>(
        rng: &mut R,
        input: &Self::CommonInput,
        secret: &Self::ProverSecret,
    ) -> Result<Self> {
        let q = input.curve.order();
        let q3 = &q * &q * &q;
        let n_tilde = &input.proof_params.n;
        let h1 = &input.proof_params.h1;
        let h2 = &input.proof_params.h2;

        let alpha = random_nonzero_bn(rng, &q3);
        let beta = random_bn_in_z_star(rng, input.pk.n())?;
        let gamma = random_nonzero_bn(rng, &(&q3 * n_tilde));
        let rho = random_nonzero_bn(rng, &(&q * n_tilde));

        let z = modpow(h1, &secret.message, n_tilde).modmul(&modpow(h2, &rho, n_tilde), n_tilde);
        let u = input.pk.encrypt_with_nonce(&alpha, &beta)?.0;
        let w = modpow(h1, &alpha, n_tilde).modmul(&modpow(h2, &gamma, n_tilde), n_tilde);

        let e = range1_challenge(input, &z, &u, &w)?;

        let s = modpow(&secret.nonce, &e, input.pk.n()).modmul(&beta, input.pk.n());
        let s1 = &e * &secret.message + &alpha;
        let s2 = &e * &rho + &gamma;

        Ok(Self {
            z,
            u,
            w,
            s,
            s1,
            s2,
            e,
        })
    }

    fn verify(&self, input: &Self::CommonInput) -> Result<()> {
        let q = input.curve.order();
        let q3 = &q * &q * &q;
        let n_tilde = &input.proof_params.n;
        let h1 = &input.proof_params.h1;
        let h2 = &input.proof_params.h2;
        let nn = input.pk.nn();

        for (value, bound) in [
            (&self.z, n_tilde),
            (&self.w, n_tilde),
            (&self.u, nn),
            (&self.s, input.pk.n()),
            (&input.ciphertext.0, nn),
        ] {
            if value <= &BigNumber::zero() || value >= bound {
                return verify_err!("proof element outside its group");
            }
        }
        if self.s1 < BigNumber::zero() || self.s2 < BigNumber::zero() {
            return verify_err!("negative response");
        }
        if self.s1 > q3 {
            return verify_err!("plaintext outside [-q^3, q^3]");
        }

        let e = range1_challenge(input, &self.z, &self.u, &self.w)?;
        if e != self.e {
            return verify_err!("Fiat-Shamir challenge mismatch");
        }

        // Γ^{s1} s^N == u * c^e (mod N²)
        let lhs = input.pk.encrypt_with_nonce(&self.s1, &self.s)?.0;
        let rhs = self
            .u
            .modmul(&modpow(&input.ciphertext.0, &e, nn), nn);
        if lhs != rhs {
            return verify_err!("ciphertext equation failed");
        }

        // h1^{s1} h2^{s2} == z^e * w (mod Ñ)
        let lhs = modpow(h1, &self.s1, n_tilde).modmul(&modpow(h2, &self.s2, n_tilde), n_tilde);
        let rhs = modpow(&self.z, &e, n_tilde).modmul(&self.w, n_tilde);
        if lhs != rhs {
            return verify_err!("ring equation failed");
        }
        Ok(())
    }
}

/// Bob's MtA response: the combined ciphertext `c2` plus the proof that
/// his inputs were in range. When produced by
/// [`ResponseProofParams::prove_wc`], the extra commitment `u` binds his
/// factor to a public point.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResponseProof {
    pub(crate) c2: Ciphertext,
    z: BigNumber,
    z_prime: BigNumber,
    t: BigNumber,
    v: BigNumber,
    w: BigNumber,
    s: BigNumber,
    s1: BigNumber,
    s2: BigNumber,
    t1: BigNumber,
    t2: BigNumber,
    e: BigNumber,
    u: Option<CurvePoint>,
}

/// Bob's response along with his additive share `beta`, which stays
/// local; only the proof travels.
pub(crate) struct MtaResponse {
    pub proof: ResponseProof,
    pub beta: CurveScalar,
}

/// Prover-side inputs for the MtA response.
///
/// `proof_params` and `pk` belong to the *recipient* (Alice): the
/// response re-randomizes her ciphertext `c1` under her key, and the
/// range commitments land in her ring.
pub(crate) struct ResponseProofParams<'a> {
    pub curve: CurveTag,
    pub proof_params: &'a ProofParams,
    pub pk: &'a EncryptionKey,
    pub c1: &'a Ciphertext,
    pub small_b: &'a CurveScalar,
    pub b_point: Option<&'a CurvePoint>,
}

/// Verifier-side (Alice's) inputs for finalizing an MtA response.
pub(crate) struct ResponseVerifyParams<'a> {
    pub curve: CurveTag,
    pub proof_params: &'a ProofParams,
    pub sk: &'a DecryptionKey,
    pub c1: &'a Ciphertext,
    pub b_point: Option<&'a CurvePoint>,
}

#[derive(Serialize)]
struct ResponseStatement<'a> {
    curve: CurveTag,
    proof_params: &'a ProofParams,
    n: &'a BigNumber,
    c1: &'a Ciphertext,
    c2: &'a Ciphertext,
    b_point: Option<&'a CurvePoint>,
}

#[allow(clippy::too_many_arguments)]
fn response_challenge(
    statement: &ResponseStatement<'_>,
    z: &BigNumber,
    z_prime: &BigNumber,
    t: &BigNumber,
    v: &BigNumber,
    w: &BigNumber,
    u: &Option<CurvePoint>,
) -> Result<BigNumber> {
    let mut transcript = Transcript::new(b"MtaResponseProof");
    transcript.append_message(b"statement", &serialize!(statement)?);
    transcript.append_message(
        b"(z, z', t, v, w)",
        &[
            z.to_bytes(),
            z_prime.to_bytes(),
            t.to_bytes(),
            v.to_bytes(),
            w.to_bytes(),
        ]
        .concat(),
    );
    transcript.append_message(b"u", &serialize!(u)?);
    Ok(positive_bn_random_from_transcript(
        &mut transcript,
        &statement.curve.order(),
    ))
}

impl ResponseProofParams<'_> {
    /// The plain MtA response, used for the nonce-times-nonce conversion.
    pub(crate) fn prove<R: RngCore + CryptoRng>(&self, rng: &mut R) -> Result<MtaResponse> {
        self.prove_inner(rng, false)
    }

    /// The "with check" MtA response: the witness is additionally bound
    /// to the public point supplied in `b_point`.
    pub(crate) fn prove_wc<R: RngCore + CryptoRng>(&self, rng: &mut R) -> Result<MtaResponse> {
        if self.b_point.is_none() {
            return Err(Error::NilArgument);
        }
        self.prove_inner(rng, true)
    }

    fn prove_inner<R: RngCore + CryptoRng>(
        &self,
        rng: &mut R,
        with_check: bool,
    ) -> Result<MtaResponse> {
        let q = self.curve.order();
        let q3 = &q * &q * &q;
        let q5 = &q3 * &q * &q;
        let q7 = &q5 * &q * &q;
        let n_tilde = &self.proof_params.n;
        let h1 = &self.proof_params.h1;
        let h2 = &self.proof_params.h2;

        let b = self.small_b.to_bn();
        // The additive mask. Sampled far below the proven q^7 bound so the
        // masked response never overflows it.
        let beta_prime = random_nonzero_bn(rng, &q5);
        let r = random_bn_in_z_star(rng, self.pk.n())?;

        let c2 = self.pk.add(
            &self.pk.mul(self.c1, &b)?,
            &self.pk.encrypt_with_nonce(&beta_prime, &r)?,
        )?;

        let alpha = random_nonzero_bn(rng, &q3);
        let rho = random_nonzero_bn(rng, &(&q * n_tilde));
        let rho_prime = random_nonzero_bn(rng, &(&q3 * n_tilde));
        let sigma = random_nonzero_bn(rng, &(&q * n_tilde));
        let tau = random_nonzero_bn(rng, &(&q3 * n_tilde));
        let gamma = random_nonzero_bn(rng, &q7);
        let beta = random_bn_in_z_star(rng, self.pk.n())?;

        let z = modpow(h1, &b, n_tilde).modmul(&modpow(h2, &rho, n_tilde), n_tilde);
        let z_prime = modpow(h1, &alpha, n_tilde).modmul(&modpow(h2, &rho_prime, n_tilde), n_tilde);
        let t = modpow(h1, &beta_prime, n_tilde).modmul(&modpow(h2, &sigma, n_tilde), n_tilde);
        let v = self
            .pk
            .add(
                &self.pk.mul(self.c1, &alpha)?,
                &self.pk.encrypt_with_nonce(&gamma, &beta)?,
            )?
            .0;
        let w = modpow(h1, &gamma, n_tilde).modmul(&modpow(h2, &tau, n_tilde), n_tilde);

        let u = if with_check {
            Some(self.curve.base_mul(&self.curve.scalar_from_bn(&alpha)?)?)
        } else {
            None
        };

        let statement = ResponseStatement {
            curve: self.curve,
            proof_params: self.proof_params,
            n: self.pk.n(),
            c1: self.c1,
            c2: &c2,
            b_point: if with_check { self.b_point } else { None },
        };
        let e = response_challenge(&statement, &z, &z_prime, &t, &v, &w, &u)?;

        let s = modpow(&r, &e, self.pk.n()).modmul(&beta, self.pk.n());
        let s1 = &e * &b + &alpha;
        let s2 = &e * &rho + &rho_prime;
        let t1 = &e * &beta_prime + &gamma;
        let t2 = &e * &sigma + &tau;

        // Alice learns a·b + β'; holding -β' makes the shares sum to a·b.
        let beta_share = self.curve.scalar_from_bn(&beta_prime)?.negate();

        Ok(MtaResponse {
            proof: ResponseProof {
                c2,
                z,
                z_prime,
                t,
                v,
                w,
                s,
                s1,
                s2,
                t1,
                t2,
                e,
                u,
            },
            beta: beta_share,
        })
    }
}

impl ResponseProof {
    /// Verify the plain response and decrypt Alice's additive share.
    pub(crate) fn finalize(&self, params: &ResponseVerifyParams) -> Result<CurveScalar> {
        if self.u.is_some() {
            return verify_err!("unexpected binding commitment");
        }
        self.verify_inner(params, false)?;
        self.decrypt_share(params)
    }

    /// Verify the "with check" response against `b_point` and decrypt.
    pub(crate) fn finalize_wc(&self, params: &ResponseVerifyParams) -> Result<CurveScalar> {
        if params.b_point.is_none() {
            return Err(Error::NilArgument);
        }
        if self.u.is_none() {
            return verify_err!("missing binding commitment");
        }
        self.verify_inner(params, true)?;
        self.decrypt_share(params)
    }

    fn decrypt_share(&self, params: &ResponseVerifyParams) -> Result<CurveScalar> {
        let plaintext = params.sk.decrypt(&self.c2)?;
        params.curve.scalar_from_bn(&plaintext)
    }

    fn verify_inner(&self, params: &ResponseVerifyParams, with_check: bool) -> Result<()> {
        let q = params.curve.order();
        let q3 = &q * &q * &q;
        let q7 = &q3 * &q3 * &q;
        let n_tilde = &params.proof_params.n;
        let h1 = &params.proof_params.h1;
        let h2 = &params.proof_params.h2;
        let pk = params.sk.encryption_key();
        let nn = pk.nn();

        for (value, bound) in [
            (&self.z, n_tilde),
            (&self.z_prime, n_tilde),
            (&self.t, n_tilde),
            (&self.w, n_tilde),
            (&self.v, nn),
            (&self.s, pk.n()),
            (&params.c1.0, nn),
            (&self.c2.0, nn),
        ] {
            if value <= &BigNumber::zero() || value >= bound {
                return verify_err!("proof element outside its group");
            }
        }
        for value in [&self.s1, &self.s2, &self.t1, &self.t2] {
            if value < &BigNumber::zero() {
                return verify_err!("negative response");
            }
        }
        if self.s1 > q3 {
            return verify_err!("factor outside [-q^3, q^3]");
        }
        if self.t1 > q7 {
            return verify_err!("mask outside [-q^7, q^7]");
        }

        let statement = ResponseStatement {
            curve: params.curve,
            proof_params: params.proof_params,
            n: pk.n(),
            c1: params.c1,
            c2: &self.c2,
            b_point: if with_check { params.b_point } else { None },
        };
        let e = response_challenge(
            &statement,
            &self.z,
            &self.z_prime,
            &self.t,
            &self.v,
            &self.w,
            &self.u,
        )?;
        if e != self.e {
            return verify_err!("Fiat-Shamir challenge mismatch");
        }

        // h1^{s1} h2^{s2} == z^e * z' (mod Ñ)
        let lhs = modpow(h1, &self.s1, n_tilde).modmul(&modpow(h2, &self.s2, n_tilde), n_tilde);
        let rhs = modpow(&self.z, &e, n_tilde).modmul(&self.z_prime, n_tilde);
        if lhs != rhs {
            return verify_err!("factor ring equation failed");
        }

        // h1^{t1} h2^{t2} == t^e * w (mod Ñ)
        let lhs = modpow(h1, &self.t1, n_tilde).modmul(&modpow(h2, &self.t2, n_tilde), n_tilde);
        let rhs = modpow(&self.t, &e, n_tilde).modmul(&self.w, n_tilde);
        if lhs != rhs {
            return verify_err!("mask ring equation failed");
        }

        // c1^{s1} Γ^{t1} s^N == c2^e * v (mod N²)
        let lhs = pk
            .add(
                &pk.mul(params.c1, &self.s1)?,
                &pk.encrypt_with_nonce(&self.t1, &self.s)?,
            )?
            .0;
        let rhs = modpow(&self.c2.0, &e, nn).modmul(&self.v, nn);
        if lhs != rhs {
            return verify_err!("ciphertext equation failed");
        }

        if with_check {
            let b_point = params.b_point.ok_or(Error::NilArgument)?;
            let u = self.u.as_ref().ok_or(Error::NilArgument)?;
            // s1·G == e·B + u
            let e_scalar = params.curve.scalar_from_bn(&e)?;
            let s1_scalar = params.curve.scalar_from_bn(&self.s1)?;
            let lhs = params.curve.base_mul(&s1_scalar)?;
            let rhs = b_point.mul(&e_scalar)?.add(u)?;
            if lhs != rhs {
                return verify_err!("factor is not bound to the public point");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::testing::get_test_rng;

    struct MtaFixture {
        curve: CurveTag,
        alice_sk: DecryptionKey,
        alice_pk: EncryptionKey,
        alice_params: ProofParams,
    }

    fn fixture(curve: CurveTag) -> MtaFixture {
        let mut rng = get_test_rng();
        let alice_sk = DecryptionKey::generate(&mut rng).unwrap();
        let alice_pk = alice_sk.encryption_key();
        let (alice_params, _, _) = ProofParams::generate(curve, &mut rng).unwrap();
        MtaFixture {
            curve,
            alice_sk,
            alice_pk,
            alice_params,
        }
    }

    #[test]
    fn mta_produces_additive_shares_of_the_product() {
        let mut rng = get_test_rng();
        let fx = fixture(CurveTag::NistP256);

        // a = 17, b = 23: the shares must sum to 391.
        let a = BigNumber::from(17u64);
        let (c1, nonce) = fx.alice_pk.encrypt(&mut rng, &a).unwrap();

        let range1 = Range1Proof::prove(
            &mut rng,
            &Range1Statement::new(fx.curve, &fx.alice_params, &fx.alice_pk, &c1),
            &Range1Secret::new(&a, &nonce),
        )
        .unwrap();
        range1
            .verify(&Range1Statement::new(
                fx.curve,
                &fx.alice_params,
                &fx.alice_pk,
                &c1,
            ))
            .unwrap();

        let b = fx.curve.scalar_from_u64(23);
        let response = ResponseProofParams {
            curve: fx.curve,
            proof_params: &fx.alice_params,
            pk: &fx.alice_pk,
            c1: &c1,
            small_b: &b,
            b_point: None,
        }
        .prove(&mut rng)
        .unwrap();

        // The proof is what travels; it must survive the wire.
        let wire: ResponseProof =
            bincode::deserialize(&bincode::serialize(&response.proof).unwrap()).unwrap();
        assert_eq!(wire, response.proof);

        let alpha = wire
            .finalize(&ResponseVerifyParams {
                curve: fx.curve,
                proof_params: &fx.alice_params,
                sk: &fx.alice_sk,
                c1: &c1,
                b_point: None,
            })
            .unwrap();

        let sum = alpha.add(&response.beta).unwrap();
        assert_eq!(sum, fx.curve.scalar_from_u64(391));
    }

    #[test]
    fn mta_with_check_binds_the_factor_to_its_point() {
        let mut rng = get_test_rng();
        let fx = fixture(CurveTag::Secp256k1);

        let a = fx.curve.random_nonzero_scalar(&mut rng);
        let (c1, _) = fx.alice_pk.encrypt(&mut rng, &a.to_bn()).unwrap();

        let b = fx.curve.random_nonzero_scalar(&mut rng);
        let b_point = fx.curve.base_mul(&b).unwrap();
        let response = ResponseProofParams {
            curve: fx.curve,
            proof_params: &fx.alice_params,
            pk: &fx.alice_pk,
            c1: &c1,
            small_b: &b,
            b_point: Some(&b_point),
        }
        .prove_wc(&mut rng)
        .unwrap();

        let mu = response
            .proof
            .finalize_wc(&ResponseVerifyParams {
                curve: fx.curve,
                proof_params: &fx.alice_params,
                sk: &fx.alice_sk,
                c1: &c1,
                b_point: Some(&b_point),
            })
            .unwrap();

        // α + β == a·b in F_q.
        let sum = mu.add(&response.beta).unwrap();
        assert_eq!(sum, a.mul(&b).unwrap());

        // The same response must not pass against a different point.
        let wrong = fx
            .curve
            .base_mul(&fx.curve.random_nonzero_scalar(&mut rng))
            .unwrap();
        assert!(response
            .proof
            .finalize_wc(&ResponseVerifyParams {
                curve: fx.curve,
                proof_params: &fx.alice_params,
                sk: &fx.alice_sk,
                c1: &c1,
                b_point: Some(&wrong),
            })
            .is_err());
    }

    #[test]
    fn range1_rejects_an_oversized_plaintext() {
        let mut rng = get_test_rng();
        let fx = fixture(CurveTag::NistP256);

        let q = fx.curve.order();
        let oversized = &q * &q * &q * &q;
        let (c1, nonce) = fx.alice_pk.encrypt(&mut rng, &oversized).unwrap();
        let statement = Range1Statement::new(fx.curve, &fx.alice_params, &fx.alice_pk, &c1);
        let proof =
            Range1Proof::prove(&mut rng, &statement, &Range1Secret::new(&oversized, &nonce))
                .unwrap();
        assert!(proof.verify(&statement).is_err());
    }

    #[test]
    fn tampered_range1_proof_fails() {
        let mut rng = get_test_rng();
        let fx = fixture(CurveTag::NistP256);

        let a = BigNumber::from(99u64);
        let (c1, nonce) = fx.alice_pk.encrypt(&mut rng, &a).unwrap();
        let statement = Range1Statement::new(fx.curve, &fx.alice_params, &fx.alice_pk, &c1);
        let proof =
            Range1Proof::prove(&mut rng, &statement, &Range1Secret::new(&a, &nonce)).unwrap();
        proof.verify(&statement).unwrap();

        let mut bad = proof.clone();
        bad.s1 = &bad.s1 + 1;
        assert!(bad.verify(&statement).is_err());

        let mut bad = proof.clone();
        bad.z = bad.z.modadd(&BigNumber::one(), &fx.alice_params.n);
        assert!(bad.verify(&statement).is_err());

        let mut bad = proof;
        bad.e = &bad.e + 1;
        assert!(bad.verify(&statement).is_err());
    }

    #[test]
    fn response_with_oversized_mask_is_rejected() {
        let mut rng = get_test_rng();
        let fx = fixture(CurveTag::Secp256k1);

        let a = fx.curve.random_nonzero_scalar(&mut rng);
        let (c1, _) = fx.alice_pk.encrypt(&mut rng, &a.to_bn()).unwrap();
        let b = fx.curve.random_nonzero_scalar(&mut rng);
        let response = ResponseProofParams {
            curve: fx.curve,
            proof_params: &fx.alice_params,
            pk: &fx.alice_pk,
            c1: &c1,
            small_b: &b,
            b_point: None,
        }
        .prove(&mut rng)
        .unwrap();

        let verify_params = ResponseVerifyParams {
            curve: fx.curve,
            proof_params: &fx.alice_params,
            sk: &fx.alice_sk,
            c1: &c1,
            b_point: None,
        };
        response.proof.finalize(&verify_params).unwrap();

        // Push the mask response beyond the q^7 bound.
        let q = fx.curve.order();
        let q7 = &q * &q * &q * &q * &q * &q * &q;
        let mut bad = response.proof.clone();
        bad.t1 = &bad.t1 + &q7;
        match bad.finalize(&verify_params) {
            Err(Error::ProofFailure(_)) => {}
            other => panic!("expected proof failure, got {other:?}"),
        }

        // And tamper the ciphertext itself.
        let mut bad = response.proof;
        bad.c2 = Ciphertext(bad.c2.0.modadd(&BigNumber::one(), fx.alice_pk.nn()));
        assert!(bad.finalize(&verify_params).is_err());
    }
}
