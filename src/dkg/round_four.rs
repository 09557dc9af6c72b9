// Copyright (c) Facebook, Inc. and its affiliates.
// Modifications Copyright (c) 2022-2023 Bolt Labs Holdings, Inc
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

use super::round_three::DkgRound3Bcast;
use super::DkgParticipant;
use crate::curve::CurvePoint;
use crate::errors::{Error, FaultList, Result};
use crate::paillier::{DecryptionKey, EncryptionKey};
use crate::proof_params::ProofParams;
use crate::vss::ShamirShare;
use crate::zkp::psf::PsfVerifyParams;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{error, instrument};

/// A participant's public material carried out of key generation: what
/// cosigners need to run MtA against it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DkgParticipantData {
    pub public_key: EncryptionKey,
    pub proof_params: ProofParams,
}

/// Everything a participant takes away from a completed key generation.
///
/// The Paillier secret key and the Shamir share are secrets; this type
/// intentionally implements no serde so they cannot leave through a
/// result envelope.
#[derive(Debug)]
pub struct DkgResult {
    /// The joint ECDSA verification key.
    pub verification_key: CurvePoint,
    /// Every participant's public share; index `k` belongs to
    /// participant `k + 1`.
    pub public_shares: Vec<CurvePoint>,
    /// This participant's additive share of the joint secret.
    pub shamir_share: ShamirShare,
    /// This participant's Paillier secret key.
    pub secret_key: DecryptionKey,
    /// Public data of every participant, own entry included.
    pub participant_data: HashMap<u32, DkgParticipantData>,
}

impl DkgParticipant {
    /// Round four: verify every peer's square-freeness proof and freeze
    /// the result.
    ///
    /// Each proof is checked against the peer's Paillier modulus, its
    /// position, and the joint public key derived in round three.
    /// Failing peers are collected into an aggregate fault.
    #[instrument(skip_all, fields(id = self.id), err)]
    pub fn round4(&mut self, inbound: &HashMap<u32, DkgRound3Bcast>) -> Result<DkgResult> {
        self.verify_round(4)?;
        let peer_ids = self.peer_ids(inbound)?;
        let y = self.state.y.ok_or(Error::InternalInvariantFailed)?;

        let mut faults = FaultList::new();
        for &id in &peer_ids {
            let record = self
                .state
                .others
                .get(&id)
                .ok_or(Error::InternalInvariantFailed)?;
            let result = inbound[&id].psf_proof.verify(&PsfVerifyParams {
                curve: self.curve,
                public_key: &record.public_key,
                pi: id,
                y: &y,
            });
            if let Err(cause) = result {
                error!(peer = id, "square-freeness proof failed");
                faults.record(id, cause);
            }
        }
        faults.into_result()?;

        let mut participant_data: HashMap<u32, DkgParticipantData> = self
            .state
            .others
            .iter()
            .map(|(&id, record)| {
                (
                    id,
                    DkgParticipantData {
                        public_key: record.public_key.clone(),
                        proof_params: record.proof_params.clone(),
                    },
                )
            })
            .collect();
        let secret_key = self
            .state
            .secret_key
            .clone()
            .ok_or(Error::InternalInvariantFailed)?;
        participant_data.insert(
            self.id,
            DkgParticipantData {
                public_key: secret_key.encryption_key(),
                proof_params: self
                    .state
                    .proof_params
                    .clone()
                    .ok_or(Error::InternalInvariantFailed)?,
            },
        );

        let result = DkgResult {
            verification_key: y,
            public_shares: self.state.public_shares.clone(),
            shamir_share: self
                .state
                .shamir_share
                .clone()
                .ok_or(Error::InternalInvariantFailed)?,
            secret_key,
            participant_data,
        };

        // The participant is now frozen; no further rounds apply.
        self.round = 5;
        Ok(result)
    }
}
