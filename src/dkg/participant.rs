// Copyright (c) Facebook, Inc. and its affiliates.
// Modifications Copyright (c) 2022-2023 Bolt Labs Holdings, Inc
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

use crate::commit::{commit, Commitment, Witness};
use crate::curve::{CurvePoint, CurveTag};
use crate::errors::{Error, Result};
use crate::paillier::{DecryptionKey, EncryptionKey};
use crate::proof_params::ProofParams;
use crate::vss::{Feldman, ShamirShare};
use crate::zkp::cdl::CdlProof;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::instrument;
use zeroize::Zeroize;

/// Values echo-broadcast to every other participant after round one.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DkgRound1Bcast {
    /// The sender's Paillier public key.
    pub public_key: EncryptionKey,
    /// The sender's range-proof ring `(Ñ, h1, h2)`.
    pub proof_params: ProofParams,
    /// Composite discrete log proof for `log_{h1}(h2)`.
    pub proof1: CdlProof,
    /// Composite discrete log proof for `log_{h2}(h1)`.
    pub proof2: CdlProof,
    /// Commitment to the sender's Feldman verifier vector.
    pub commitment: Commitment,
}

/// What round two records about each peer.
#[derive(Clone, Debug)]
pub(crate) struct PeerRecord {
    pub public_key: EncryptionKey,
    pub commitment: Commitment,
    pub proof_params: ProofParams,
}

/// One participant's view of a distributed key generation session.
///
/// A participant is single-owner: rounds borrow it mutably and must be
/// applied in order, each consuming the complete message set of the
/// previous round. On any returned error the state is unchanged.
#[derive(Debug)]
pub struct DkgParticipant {
    pub(crate) id: u32,
    pub(crate) curve: CurveTag,
    pub(crate) round: u32,
    pub(crate) state: DkgState,
}

#[derive(Default)]
pub(crate) struct DkgState {
    pub threshold: usize,
    pub limit: usize,
    pub secret_key: Option<DecryptionKey>,
    pub proof_params: Option<ProofParams>,
    /// Opening of the verifier-vector commitment, revealed in round two.
    pub witness: Option<Witness>,
    pub commitment: Option<Commitment>,
    /// Shares dealt by this participant, indexed by recipient id minus
    /// one.
    pub shares: Vec<ShamirShare>,
    pub verifiers: Vec<CurvePoint>,
    pub others: HashMap<u32, PeerRecord>,
    pub y: Option<CurvePoint>,
    pub shamir_share: Option<ShamirShare>,
    pub public_shares: Vec<CurvePoint>,
}

impl Drop for DkgState {
    fn drop(&mut self) {
        self.shares.zeroize();
        self.shamir_share.zeroize();
    }
}

impl std::fmt::Debug for DkgState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DkgState")
            .field("threshold", &self.threshold)
            .field("limit", &self.limit)
            .field("shares", &"[redacted]")
            .field("y", &self.y)
            .finish()
    }
}

impl DkgParticipant {
    /// Create a participant at position `id` of an `(threshold, limit)`
    /// session over `curve`.
    pub fn new(id: u32, threshold: usize, limit: usize, curve: CurveTag) -> Result<Self> {
        if id == 0 {
            return Err(Error::NilArgument);
        }
        if id as usize > limit {
            return Err(Error::DomainFailure(
                "participant id exceeds the session size".into(),
            ));
        }
        // Feldman::new re-validates threshold against limit.
        Feldman::new(threshold, limit, curve)?;
        Ok(Self {
            id,
            curve,
            round: 1,
            state: DkgState {
                threshold,
                limit,
                secret_key: None,
                proof_params: None,
                witness: None,
                commitment: None,
                shares: Vec::new(),
                verifiers: Vec::new(),
                others: HashMap::new(),
                y: None,
                shamir_share: None,
                public_shares: Vec::new(),
            },
        })
    }

    /// This participant's 1-based position.
    pub fn id(&self) -> u32 {
        self.id
    }

    /// The joint verification key, available after round three.
    pub fn public_key(&self) -> Option<&CurvePoint> {
        self.state.y.as_ref()
    }

    /// Round one: generate all local key material and broadcast the
    /// public parts.
    ///
    /// Samples a Paillier keypair and range-proof ring (with proofs for
    /// both discrete log directions), deals a Feldman sharing of a fresh
    /// random secret, and commits to the verifier vector.
    #[instrument(skip_all, fields(id = self.id), err)]
    pub fn round1<R: RngCore + CryptoRng>(&mut self, rng: &mut R) -> Result<DkgRound1Bcast> {
        self.verify_round(1)?;

        let secret_key = DecryptionKey::generate(rng)?;
        let (proof_params, proof1, proof2) = ProofParams::generate(self.curve, rng)?;

        let feldman = Feldman::new(self.state.threshold, self.state.limit, self.curve)?;
        let mut secret = self.curve.random_nonzero_scalar(rng);
        let (shares, verifiers) = feldman.split(&secret, rng)?;
        secret.zeroize();

        let mut verifier_bytes = Vec::with_capacity(verifiers.len() * 2 * self.curve.field_size());
        for v in &verifiers {
            verifier_bytes.extend_from_slice(&v.to_uncompressed_bytes()?);
        }
        let (commitment, witness) = commit(rng, &verifier_bytes)?;

        let bcast = DkgRound1Bcast {
            public_key: secret_key.encryption_key(),
            proof_params: proof_params.clone(),
            proof1,
            proof2,
            commitment: commitment.clone(),
        };

        self.state.secret_key = Some(secret_key);
        self.state.proof_params = Some(proof_params);
        self.state.witness = Some(witness);
        self.state.commitment = Some(commitment);
        self.state.shares = shares;
        self.state.verifiers = verifiers;
        self.round = 2;

        Ok(bcast)
    }

    pub(crate) fn verify_round(&self, expected: u32) -> Result<()> {
        if self.round != expected {
            return Err(Error::InvalidRound {
                expected,
                actual: self.round,
            });
        }
        Ok(())
    }

    /// Validates that `inbound` holds exactly one message from every
    /// other participant and returns their ids in ascending order.
    ///
    /// Entries keyed by the receiving participant itself are tolerated
    /// and skipped, matching how broadcast layers often echo a sender its
    /// own message.
    pub(crate) fn peer_ids<T>(&self, inbound: &HashMap<u32, T>) -> Result<Vec<u32>> {
        let mut ids: Vec<u32> = inbound.keys().copied().filter(|&id| id != self.id).collect();
        if ids.len() != self.state.limit - 1 {
            return Err(Error::IncorrectCount {
                expected: self.state.limit - 1,
                actual: ids.len(),
            });
        }
        if ids.iter().any(|&id| id == 0 || id as usize > self.state.limit) {
            return Err(Error::NilArgument);
        }
        ids.sort_unstable();
        Ok(ids)
    }
}
