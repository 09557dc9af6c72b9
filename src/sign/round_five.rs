// Copyright (c) Facebook, Inc. and its affiliates.
// Modifications Copyright (c) 2022-2023 Bolt Labs Holdings, Inc
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

use super::round_four::SignRound4Bcast;
use super::signer::Signer;
use crate::curve::CurveScalar;
use crate::errors::{Error, FaultList, Result};
use crate::zkp::sch::SchnorrStatement;
use crate::zkp::Proof;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{error, instrument};

/// Broadcast after round five: this signer's signature share.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SignRound5Bcast {
    pub sig_share: CurveScalar,
}

impl Signer {
    /// Round five: open every cosigner's `Γ_j`, derive the signature
    /// point, and produce a signature share.
    ///
    /// Each opened commitment must parse to a curve point matching the
    /// cosigner's proof of knowledge. Then `R = δ⁻¹·ΣΓ_j`, `r` is its
    /// X coordinate mod `q`, and the share is `s_i = m·k_i + r·σ_i`.
    #[instrument(skip_all, fields(id = self.id), err)]
    pub fn round5(
        &mut self,
        inbound: &HashMap<u32, SignRound4Bcast>,
    ) -> Result<SignRound5Bcast> {
        self.verify_round(5)?;
        let cosigner_ids = self.cosigner_ids(inbound)?;

        let mut big_gamma_sum = self
            .state
            .big_gamma
            .ok_or(Error::InternalInvariantFailed)?;

        let mut faults = FaultList::new();
        for &j in &cosigner_ids {
            let message = &inbound[&j];
            let commitment = self
                .state
                .cosigner_commitments
                .get(&j)
                .ok_or(Error::InternalInvariantFailed)?;

            if let Err(cause) = crate::commit::open(commitment, &message.witness) {
                error!(peer = j, "commitment to the nonce point failed to open");
                faults.record(j, cause);
                continue;
            }
            let big_gamma_j = match self.curve.point_from_uncompressed(&message.witness.message) {
                Ok(point) => point,
                Err(cause) => {
                    error!(peer = j, "opened nonce point failed to parse");
                    faults.record(j, cause);
                    continue;
                }
            };
            if let Err(cause) = message.proof.verify(&SchnorrStatement::new(&big_gamma_j)) {
                error!(peer = j, "proof of knowledge of the nonce share failed");
                faults.record(j, cause);
                continue;
            }

            big_gamma_sum = big_gamma_sum.add(&big_gamma_j)?;
        }

        faults.into_result()?;

        let delta = self
            .state
            .delta
            .clone()
            .ok_or(Error::InternalInvariantFailed)?;
        let big_r = big_gamma_sum.mul(&delta.invert()?)?;
        let r = self.curve.scalar_from_bn(&big_r.x_coordinate()?)?;
        if r.is_zero() {
            return Err(Error::DomainFailure("signature point has zero X".into()));
        }

        let k = self.state.k.clone().ok_or(Error::InternalInvariantFailed)?;
        let sigma_i = self
            .state
            .sigma_i
            .clone()
            .ok_or(Error::InternalInvariantFailed)?;
        let sig_share = self.digest.mul(&k)?.add(&r.mul(&sigma_i)?)?;

        self.state.r = Some(r);
        self.state.sig_share = Some(sig_share.clone());
        self.round = 6;

        Ok(SignRound5Bcast { sig_share })
    }
}
