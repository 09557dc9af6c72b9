// Copyright (c) Facebook, Inc. and its affiliates.
// Modifications Copyright (c) 2022-2023 Bolt Labs Holdings, Inc
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

use super::participant::{DkgParticipant, DkgRound1Bcast, PeerRecord};
use crate::commit::Witness;
use crate::errors::{Error, FaultList, Result};
use crate::paillier::modulus_size_acceptable;
use crate::vss::ShamirShare;
use crate::zkp::cdl::CdlStatement;
use crate::zkp::Proof;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{error, instrument};

/// Echo-broadcast after round two: the opening of the round-one
/// commitment.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DkgRound2Bcast {
    pub witness: Witness,
}

/// Sent privately to each participant: their share of the sender's
/// polynomial.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DkgRound2P2pSend {
    pub share: ShamirShare,
}

impl DkgParticipant {
    /// Round two: validate every peer's round-one broadcast, then reveal
    /// the commitment opening and distribute shares.
    ///
    /// Per peer, this checks that the Paillier modulus has the expected
    /// size (undersized moduli break the range-proof soundness) and that
    /// both composite discrete log proofs verify; the second check runs
    /// with `h1` and `h2` swapped, pinning both directions. Failing peers
    /// are collected rather than aborting at the first, and any fault
    /// fails the round with the full list.
    #[instrument(skip_all, fields(id = self.id), err)]
    pub fn round2(
        &mut self,
        inbound: &HashMap<u32, DkgRound1Bcast>,
    ) -> Result<(DkgRound2Bcast, HashMap<u32, DkgRound2P2pSend>)> {
        self.verify_round(2)?;
        let peer_ids = self.peer_ids(inbound)?;

        let mut faults = FaultList::new();
        let mut records = HashMap::with_capacity(peer_ids.len());
        let mut p2p = HashMap::with_capacity(peer_ids.len());

        for &id in &peer_ids {
            let bcast = &inbound[&id];

            // An undersized modulus is how a malicious peer escapes the
            // MtA range bounds later, so it is rejected here, once.
            if !modulus_size_acceptable(bcast.public_key.n()) {
                error!(peer = id, "peer sent a Paillier modulus of unexpected size");
                faults.record(id, Error::DomainFailure("invalid paillier key size".into()));
                continue;
            }

            let forward = CdlStatement::new(
                self.curve,
                &bcast.proof_params.n,
                &bcast.proof_params.h1,
                &bcast.proof_params.h2,
            );
            if let Err(cause) = bcast.proof1.verify(&forward) {
                error!(peer = id, "forward composite discrete log proof failed");
                faults.record(id, cause);
                continue;
            }

            // Note the swapped generators on the second verification.
            let reverse = CdlStatement::new(
                self.curve,
                &bcast.proof_params.n,
                &bcast.proof_params.h2,
                &bcast.proof_params.h1,
            );
            if let Err(cause) = bcast.proof2.verify(&reverse) {
                error!(peer = id, "reverse composite discrete log proof failed");
                faults.record(id, cause);
                continue;
            }

            p2p.insert(
                id,
                DkgRound2P2pSend {
                    share: self.state.shares[(id - 1) as usize].clone(),
                },
            );
            records.insert(
                id,
                PeerRecord {
                    public_key: bcast.public_key.clone(),
                    commitment: bcast.commitment.clone(),
                    proof_params: bcast.proof_params.clone(),
                },
            );
        }

        faults.into_result()?;

        let witness = self
            .state
            .witness
            .clone()
            .ok_or(Error::InternalInvariantFailed)?;
        self.state.others = records;
        self.round = 3;

        Ok((DkgRound2Bcast { witness }, p2p))
    }
}
