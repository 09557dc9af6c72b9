// Copyright (c) Facebook, Inc. and its affiliates.
// Modifications Copyright (c) 2022-2023 Bolt Labs Holdings, Inc
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

use super::round_two::{DkgRound2Bcast, DkgRound2P2pSend};
use super::DkgParticipant;
use crate::commit::open;
use crate::curve::CurvePoint;
use crate::errors::{Error, FaultList, Result};
use crate::vss::{Feldman, ShamirShare};
use crate::zkp::psf::{PsfProof, PsfProofParams};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{error, instrument};

/// Broadcast after round three: the sender's Paillier square-freeness
/// proof, bound to the freshly derived joint public key.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DkgRound3Bcast {
    pub psf_proof: PsfProof,
}

impl DkgParticipant {
    /// Round three: open every peer's verifier commitment, check the
    /// dealt shares, and aggregate the joint key material.
    ///
    /// Each peer's witness must open its round-one commitment and parse
    /// into exactly `threshold` verifier points; the share that peer
    /// dealt must Feldman-verify against them. The participant then sums
    /// its dealt shares into its signing share, sums the verifier vectors
    /// into the joint polynomial commitment, reads the public key off its
    /// constant term, and derives every participant's public share by
    /// evaluating the committed polynomial in the exponent.
    #[instrument(skip_all, fields(id = self.id), err)]
    pub fn round3(
        &mut self,
        inbound_bcast: &HashMap<u32, DkgRound2Bcast>,
        inbound_p2p: &HashMap<u32, DkgRound2P2pSend>,
    ) -> Result<DkgRound3Bcast> {
        self.verify_round(3)?;
        let peer_ids = self.peer_ids(inbound_bcast)?;
        if self.peer_ids(inbound_p2p)? != peer_ids {
            return Err(Error::IncorrectCount {
                expected: peer_ids.len(),
                actual: inbound_p2p.len(),
            });
        }

        let feldman = Feldman::new(self.state.threshold, self.state.limit, self.curve)?;
        let verifier_size = 2 * self.curve.field_size();

        let mut faults = FaultList::new();
        let mut verifiers_by_peer: HashMap<u32, Vec<CurvePoint>> =
            HashMap::with_capacity(peer_ids.len());
        let mut xi = self.state.shares[(self.id - 1) as usize].value.clone();

        for &id in &peer_ids {
            let record = self
                .state
                .others
                .get(&id)
                .ok_or(Error::InternalInvariantFailed)?;
            let witness = &inbound_bcast[&id].witness;

            if let Err(cause) = open(&record.commitment, witness) {
                error!(peer = id, "commitment opening failed");
                faults.record(id, cause);
                continue;
            }

            let verifiers = match self.unmarshal_verifiers(&witness.message, verifier_size) {
                Ok(verifiers) => verifiers,
                Err(cause) => {
                    error!(peer = id, "committed verifier vector failed to parse");
                    faults.record(id, cause);
                    continue;
                }
            };

            let share = &inbound_p2p[&id].share;
            if share.id != self.id {
                faults.record(id, Error::DomainFailure("share dealt to the wrong id".into()));
                continue;
            }
            if let Err(cause) = feldman.verify(share, &verifiers) {
                error!(peer = id, "dealt share failed Feldman verification");
                faults.record(id, cause);
                continue;
            }

            xi = xi.add(&share.value)?;
            verifiers_by_peer.insert(id, verifiers);
        }

        faults.into_result()?;

        // Joint verifier polynomial: coefficient-wise sum over all
        // dealers, own vector included.
        let mut joint = self.state.verifiers.clone();
        for verifiers in verifiers_by_peer.values() {
            for (k, v) in verifiers.iter().enumerate() {
                joint[k] = joint[k].add(v)?;
            }
        }

        let y = joint[0];
        if y.is_identity() {
            return Err(Error::DomainFailure("joint public key is the identity".into()));
        }

        // Public share of participant j is the committed polynomial
        // evaluated at j in the exponent.
        let mut public_shares = Vec::with_capacity(self.state.limit);
        for j in 1..=self.state.limit as u64 {
            let x = self.curve.scalar_from_u64(j);
            let mut share = self.curve.identity();
            let mut power = self.curve.scalar_from_u64(1);
            for v in &joint {
                share = share.add(&v.mul(&power)?)?;
                power = power.mul(&x)?;
            }
            public_shares.push(share);
        }

        let psf_proof = PsfProofParams {
            curve: self.curve,
            secret_key: self
                .state
                .secret_key
                .as_ref()
                .ok_or(Error::InternalInvariantFailed)?,
            pi: self.id,
            y: &y,
        }
        .prove()?;

        self.state.y = Some(y);
        self.state.shamir_share = Some(ShamirShare {
            id: self.id,
            value: xi,
        });
        self.state.public_shares = public_shares;
        self.round = 4;

        Ok(DkgRound3Bcast { psf_proof })
    }

    /// Splits a committed verifier vector back into points.
    fn unmarshal_verifiers(&self, msg: &[u8], verifier_size: usize) -> Result<Vec<CurvePoint>> {
        if msg.is_empty() || msg.len() % verifier_size != 0 {
            return Err(Error::DomainFailure(
                "committed verifier bytes have invalid length".into(),
            ));
        }
        let count = msg.len() / verifier_size;
        if count != self.state.threshold {
            return Err(Error::IncorrectCount {
                expected: self.state.threshold,
                actual: count,
            });
        }
        msg.chunks(verifier_size)
            .map(|chunk| self.curve.point_from_uncompressed(chunk))
            .collect()
    }
}
