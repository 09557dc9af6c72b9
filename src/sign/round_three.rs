// Copyright (c) Facebook, Inc. and its affiliates.
// Modifications Copyright (c) 2022-2023 Bolt Labs Holdings, Inc
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

use super::round_two::SignRound2P2pSend;
use super::signer::Signer;
use crate::curve::CurveScalar;
use crate::errors::{Error, FaultList, Result};
use crate::zkp::mta::ResponseVerifyParams;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{error, instrument};

/// Broadcast after round three: this signer's element of the `δ` vector.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SignRound3Bcast {
    pub delta: CurveScalar,
}

impl Signer {
    /// Round three: finalize both MtA conversions with every cosigner and
    /// aggregate the additive products.
    ///
    /// For each cosigner this recovers `α_{ji}` from the plain response
    /// and `μ_{ji}` from the checked response, the latter verified
    /// against the cosigner's public share `W_j`. The signer then folds
    /// everything into
    /// `δ_i = k_iγ_i + Σ(α + β)` and `σ_i = k_iw_i + Σ(μ + ν)`.
    #[instrument(skip_all, fields(id = self.id), err)]
    pub fn round3(
        &mut self,
        inbound: &HashMap<u32, SignRound2P2pSend>,
    ) -> Result<SignRound3Bcast> {
        self.verify_round(3)?;
        let cosigner_ids = self.cosigner_ids(inbound)?;

        let k = self.state.k.clone().ok_or(Error::InternalInvariantFailed)?;
        let gamma = self.state.gamma.clone().ok_or(Error::InternalInvariantFailed)?;
        let own_ciphertext = self
            .state
            .ciphertext
            .clone()
            .ok_or(Error::InternalInvariantFailed)?;

        let mut delta_i = k.mul(&gamma)?;
        let mut sigma_i = k.mul(&self.share)?;

        let mut faults = FaultList::new();
        for &j in &cosigner_ids {
            let message = &inbound[&j];
            let mut verify_params = ResponseVerifyParams {
                curve: self.curve,
                proof_params: self.own_proof_params()?,
                sk: &self.secret_key,
                c1: &own_ciphertext,
                b_point: None,
            };

            let alpha = match message.proof2.finalize(&verify_params) {
                Ok(alpha) => alpha,
                Err(cause) => {
                    error!(peer = j, "MtA response for the nonce product failed");
                    faults.record(j, cause);
                    continue;
                }
            };

            let w_j = self
                .public_shares
                .get(&j)
                .ok_or(Error::InternalInvariantFailed)?;
            verify_params.b_point = Some(w_j);
            let mu = match message.proof3.finalize_wc(&verify_params) {
                Ok(mu) => mu,
                Err(cause) => {
                    error!(peer = j, "MtA response for the key product failed");
                    faults.record(j, cause);
                    continue;
                }
            };

            let beta = self.state.beta.get(&j).ok_or(Error::InternalInvariantFailed)?;
            let nu = self.state.nu.get(&j).ok_or(Error::InternalInvariantFailed)?;
            delta_i = delta_i.add(&alpha)?.add(beta)?;
            sigma_i = sigma_i.add(&mu)?.add(nu)?;
        }

        faults.into_result()?;

        self.state.delta_i = Some(delta_i.clone());
        self.state.sigma_i = Some(sigma_i);
        self.round = 4;

        Ok(SignRound3Bcast { delta: delta_i })
    }
}
