// Copyright (c) Facebook, Inc. and its affiliates.
// Modifications Copyright (c) 2022-2023 Bolt Labs Holdings, Inc
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

use super::signer::Signer;
use crate::commit::{commit, Commitment};
use crate::errors::Result;
use crate::paillier::Ciphertext;
use crate::zkp::mta::{Range1Proof, Range1Secret, Range1Statement};
use crate::zkp::Proof;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::instrument;

/// Broadcast after round one: the encrypted nonce share and the
/// commitment to `Γ_i`. In trusted-dealer mode the range proof rides
/// along, since one proof verifies everywhere.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SignRound1Bcast {
    pub ciphertext: Ciphertext,
    pub commitment: Commitment,
    pub proof: Option<Range1Proof>,
}

/// Sent point-to-point after round one in distributed-keys mode: the
/// range proof for `c_i` produced under the recipient's ring.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SignRound1P2pSend {
    pub proof: Range1Proof,
}

impl Signer {
    /// Round one: sample the nonce shares and commit to them.
    ///
    /// Chooses `k_i, γ_i ∈ F_q*`, encrypts `k_i` under the signer's own
    /// Paillier key, and commits to `Γ_i = γ_i·G`. The range proof for
    /// the ciphertext is broadcast in trusted-dealer mode and produced
    /// once per recipient otherwise.
    #[instrument(skip_all, fields(id = self.id), err)]
    pub fn round1<R: RngCore + CryptoRng>(
        &mut self,
        rng: &mut R,
    ) -> Result<(SignRound1Bcast, Option<HashMap<u32, SignRound1P2pSend>>)> {
        self.verify_round(1)?;

        let k = self.curve.random_nonzero_scalar(rng);
        let gamma = self.curve.random_nonzero_scalar(rng);

        let own_pk = self.keys.public_key(self.id)?.clone();
        let (ciphertext, nonce) = own_pk.encrypt(rng, &k.to_bn())?;

        let big_gamma = self.curve.base_mul(&gamma)?;
        let (commitment, witness) = commit(rng, &big_gamma.to_uncompressed_bytes()?)?;

        let secret = Range1Secret::new(&k.to_bn(), &nonce);
        let (bcast_proof, p2p) = if self.keys.is_trusted_dealer() {
            let statement =
                Range1Statement::new(self.curve, self.own_proof_params()?, &own_pk, &ciphertext);
            (Some(Range1Proof::prove(rng, &statement, &secret)?), None)
        } else {
            let mut sends = HashMap::with_capacity(self.cosigners.len());
            for &j in &self.cosigners {
                let statement = Range1Statement::new(
                    self.curve,
                    self.keys.proof_params(j)?,
                    &own_pk,
                    &ciphertext,
                );
                sends.insert(
                    j,
                    SignRound1P2pSend {
                        proof: Range1Proof::prove(rng, &statement, &secret)?,
                    },
                );
            }
            (None, Some(sends))
        };

        let bcast = SignRound1Bcast {
            ciphertext: ciphertext.clone(),
            commitment,
            proof: bcast_proof,
        };

        self.state.k = Some(k);
        self.state.gamma = Some(gamma);
        self.state.nonce = Some(nonce);
        self.state.ciphertext = Some(ciphertext);
        self.state.big_gamma = Some(big_gamma);
        self.state.witness = Some(witness);
        self.round = 2;

        Ok((bcast, p2p))
    }
}
