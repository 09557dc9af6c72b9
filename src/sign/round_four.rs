// Copyright (c) Facebook, Inc. and its affiliates.
// Modifications Copyright (c) 2022-2023 Bolt Labs Holdings, Inc
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

use super::round_three::SignRound3Bcast;
use super::signer::Signer;
use crate::commit::Witness;
use crate::errors::{Error, Result};
use crate::zkp::sch::{SchnorrProof, SchnorrSecret, SchnorrStatement};
use crate::zkp::Proof;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::instrument;

/// Broadcast after round four: the opening of the `Γ_i` commitment and a
/// proof of knowledge of `γ_i` behind it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SignRound4Bcast {
    pub witness: Witness,
    pub proof: SchnorrProof,
}

impl Signer {
    /// Round four: combine the `δ` shares and reveal `Γ_i`.
    ///
    /// With every `δ_j` in hand the signer knows `δ = kγ`; opening the
    /// round-one commitments afterwards is what keeps any party from
    /// biasing the nonce point.
    #[instrument(skip_all, fields(id = self.id), err)]
    pub fn round4<R: RngCore + CryptoRng>(
        &mut self,
        rng: &mut R,
        inbound: &HashMap<u32, SignRound3Bcast>,
    ) -> Result<SignRound4Bcast> {
        self.verify_round(4)?;
        let cosigner_ids = self.cosigner_ids(inbound)?;

        let mut delta = self
            .state
            .delta_i
            .clone()
            .ok_or(Error::InternalInvariantFailed)?;
        for &j in &cosigner_ids {
            delta = delta.add(&inbound[&j].delta)?;
        }
        if delta.is_zero() {
            return Err(Error::DomainFailure("combined delta is zero".into()));
        }

        let gamma = self.state.gamma.clone().ok_or(Error::InternalInvariantFailed)?;
        let big_gamma = self
            .state
            .big_gamma
            .ok_or(Error::InternalInvariantFailed)?;
        let proof = SchnorrProof::prove(
            rng,
            &SchnorrStatement::new(&big_gamma),
            &SchnorrSecret::new(&gamma),
        )?;
        let witness = self
            .state
            .witness
            .clone()
            .ok_or(Error::InternalInvariantFailed)?;

        self.state.delta = Some(delta);
        self.round = 5;

        Ok(SignRound4Bcast { witness, proof })
    }
}
