// Copyright (c) Facebook, Inc. and its affiliates.
// Modifications Copyright (c) 2022-2023 Bolt Labs Holdings, Inc
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

use super::round_one::{SignRound1Bcast, SignRound1P2pSend};
use super::signer::Signer;
use crate::errors::{Error, FaultList, Result};
use crate::zkp::mta::{Range1Statement, ResponseProof, ResponseProofParams};
use crate::zkp::Proof;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{error, instrument};

/// Sent point-to-point after round two: the two MtA responses for the
/// recipient's encrypted nonce, one against `γ_i` and one against `w_i`.
/// The responder's additive shares never leave its state.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SignRound2P2pSend {
    pub proof2: ResponseProof,
    pub proof3: ResponseProof,
}

impl Signer {
    /// Round two: validate every cosigner's encrypted nonce and answer
    /// both MtA conversions.
    ///
    /// The range proof for `c_j` is taken from the broadcast in
    /// trusted-dealer mode and from the point-to-point channel otherwise,
    /// and is always checked against this signer's own ring. The second
    /// response binds `w_i` to this signer's public share, which is what
    /// lets the recipient check it in round three.
    #[instrument(skip_all, fields(id = self.id), err)]
    pub fn round2<R: RngCore + CryptoRng>(
        &mut self,
        rng: &mut R,
        inbound_bcast: &HashMap<u32, SignRound1Bcast>,
        inbound_p2p: Option<&HashMap<u32, SignRound1P2pSend>>,
    ) -> Result<HashMap<u32, SignRound2P2pSend>> {
        self.verify_round(2)?;
        let cosigner_ids = self.cosigner_ids(inbound_bcast)?;
        // Without a trusted dealer the range proofs travel separately and
        // the point-to-point map must be populated.
        let p2p = if self.keys.is_trusted_dealer() {
            None
        } else {
            let p2p = inbound_p2p.ok_or(Error::NilArgument)?;
            if self.cosigner_ids(p2p)? != cosigner_ids {
                return Err(Error::IncorrectCount {
                    expected: cosigner_ids.len(),
                    actual: p2p.len(),
                });
            }
            Some(p2p)
        };

        let gamma = self.state.gamma.clone().ok_or(Error::InternalInvariantFailed)?;
        let own_share = self.share.clone();
        let own_point = *self.own_public_share()?;

        let mut faults = FaultList::new();
        let mut sends = HashMap::with_capacity(cosigner_ids.len());
        let mut ciphertexts = HashMap::with_capacity(cosigner_ids.len());
        let mut commitments = HashMap::with_capacity(cosigner_ids.len());
        let mut betas = HashMap::with_capacity(cosigner_ids.len());
        let mut nus = HashMap::with_capacity(cosigner_ids.len());

        for &j in &cosigner_ids {
            let bcast = &inbound_bcast[&j];

            let statement = Range1Statement::new(
                self.curve,
                self.own_proof_params()?,
                self.keys.public_key(j)?,
                &bcast.ciphertext,
            );
            let range1 = match p2p {
                Some(p2p) => Some(&p2p[&j].proof),
                None => bcast.proof.as_ref(),
            };
            let Some(range1) = range1 else {
                faults.record(j, Error::NilArgument);
                continue;
            };
            if let Err(cause) = range1.verify(&statement) {
                error!(peer = j, "range proof for encrypted nonce failed");
                faults.record(j, cause);
                continue;
            }

            let mut params = ResponseProofParams {
                curve: self.curve,
                proof_params: self.keys.proof_params(j)?,
                pk: self.keys.public_key(j)?,
                c1: &bcast.ciphertext,
                small_b: &gamma,
                b_point: None,
            };
            let gamma_response = match params.prove(rng) {
                Ok(response) => response,
                Err(cause) => {
                    faults.record(j, cause);
                    continue;
                }
            };

            params.small_b = &own_share;
            params.b_point = Some(&own_point);
            let share_response = match params.prove_wc(rng) {
                Ok(response) => response,
                Err(cause) => {
                    faults.record(j, cause);
                    continue;
                }
            };

            ciphertexts.insert(j, bcast.ciphertext.clone());
            commitments.insert(j, bcast.commitment.clone());
            betas.insert(j, gamma_response.beta);
            nus.insert(j, share_response.beta);
            sends.insert(
                j,
                SignRound2P2pSend {
                    proof2: gamma_response.proof,
                    proof3: share_response.proof,
                },
            );
        }

        faults.into_result()?;

        self.state.cosigner_ciphertexts = ciphertexts;
        self.state.cosigner_commitments = commitments;
        self.state.beta = betas;
        self.state.nu = nus;
        self.round = 3;

        Ok(sends)
    }
}
