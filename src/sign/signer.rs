// Copyright (c) Facebook, Inc. and its affiliates.
// Modifications Copyright (c) 2022-2023 Bolt Labs Holdings, Inc
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

use crate::commit::{Commitment, Witness};
use crate::curve::{CurvePoint, CurveScalar, CurveTag};
use crate::dkg::DkgResult;
use crate::errors::{Error, Result};
use crate::paillier::{Ciphertext, DecryptionKey, EncryptionKey};
use crate::proof_params::ProofParams;
use crate::vss::{lagrange_coefficient, ShamirShare};
use libpaillier::unknown_order::BigNumber;
use std::collections::HashMap;
use std::fmt::Debug;
use zeroize::Zeroize;

/// Where cosigners' Paillier keys and range-proof rings come from.
///
/// With a trusted dealer every signer verifies range proofs against one
/// shared ring, so round-one proofs can be broadcast. After distributed
/// key generation each participant brought its own ring, and proofs must
/// be produced per recipient and sent point-to-point.
#[derive(Clone, Debug)]
pub enum SigningKeys {
    TrustedDealer {
        public_keys: HashMap<u32, EncryptionKey>,
        proof_params: ProofParams,
    },
    Distributed {
        participant_data: HashMap<u32, crate::dkg::DkgParticipantData>,
    },
}

impl SigningKeys {
    pub(crate) fn is_trusted_dealer(&self) -> bool {
        matches!(self, SigningKeys::TrustedDealer { .. })
    }

    pub(crate) fn public_key(&self, id: u32) -> Result<&EncryptionKey> {
        match self {
            SigningKeys::TrustedDealer { public_keys, .. } => {
                public_keys.get(&id).ok_or(Error::NilArgument)
            }
            SigningKeys::Distributed { participant_data } => participant_data
                .get(&id)
                .map(|data| &data.public_key)
                .ok_or(Error::NilArgument),
        }
    }

    pub(crate) fn proof_params(&self, id: u32) -> Result<&ProofParams> {
        match self {
            SigningKeys::TrustedDealer { proof_params, .. } => Ok(proof_params),
            SigningKeys::Distributed { participant_data } => participant_data
                .get(&id)
                .map(|data| &data.proof_params)
                .ok_or(Error::NilArgument),
        }
    }
}

/// Per-session transient values; scrubbed when the signer goes away.
#[derive(Default)]
pub(crate) struct SigningState {
    /// Nonce share `k_i`.
    pub k: Option<CurveScalar>,
    /// Blinding nonce share `γ_i`.
    pub gamma: Option<CurveScalar>,
    /// Paillier nonce under `c_i`.
    pub nonce: Option<BigNumber>,
    /// Own `c_i = Enc(k_i)`.
    pub ciphertext: Option<Ciphertext>,
    /// `Γ_i = γ_i·G`.
    pub big_gamma: Option<CurvePoint>,
    /// Opening of the commitment to `Γ_i`.
    pub witness: Option<Witness>,
    pub cosigner_ciphertexts: HashMap<u32, Ciphertext>,
    pub cosigner_commitments: HashMap<u32, Commitment>,
    /// MtA shares `β_{ji}` from responding with `γ_i`.
    pub beta: HashMap<u32, CurveScalar>,
    /// MtA shares `ν_{ji}` from responding with `w_i`.
    pub nu: HashMap<u32, CurveScalar>,
    pub delta_i: Option<CurveScalar>,
    pub sigma_i: Option<CurveScalar>,
    pub delta: Option<CurveScalar>,
    pub r: Option<CurveScalar>,
    pub sig_share: Option<CurveScalar>,
}

impl Drop for SigningState {
    fn drop(&mut self) {
        self.k.zeroize();
        self.gamma.zeroize();
        self.nonce.zeroize();
        self.sigma_i.zeroize();
        for value in self.beta.values_mut() {
            value.zeroize();
        }
        for value in self.nu.values_mut() {
            value.zeroize();
        }
    }
}

impl Debug for SigningState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningState")
            .field("k", &"[redacted]")
            .field("gamma", &"[redacted]")
            .field("delta", &self.delta)
            .field("r", &self.r)
            .finish()
    }
}

/// One cosigner's view of a signing session.
///
/// Constructed from key-generation output for a chosen qualified set and
/// a message digest; discarded, along with all transient nonces and MtA
/// shares, when the session completes or aborts. Rounds must be applied
/// in order and the state never changes on a returned error.
pub struct Signer {
    pub(crate) id: u32,
    pub(crate) curve: CurveTag,
    pub(crate) round: u32,
    /// The other members of the signing set, ascending.
    pub(crate) cosigners: Vec<u32>,
    pub(crate) keys: SigningKeys,
    pub(crate) secret_key: DecryptionKey,
    /// Additive share `w_i`: the Shamir share scaled by this signer's
    /// Lagrange coefficient over the signing set.
    pub(crate) share: CurveScalar,
    /// Additive public shares `W_j` for the whole signing set.
    pub(crate) public_shares: HashMap<u32, CurvePoint>,
    pub(crate) verification_key: CurvePoint,
    /// The message digest folded into the scalar field.
    pub(crate) digest: CurveScalar,
    pub(crate) state: SigningState,
}

impl Drop for Signer {
    fn drop(&mut self) {
        self.share.zeroize();
    }
}

impl Debug for Signer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signer")
            .field("id", &self.id)
            .field("curve", &self.curve)
            .field("round", &self.round)
            .field("cosigners", &self.cosigners)
            .field("share", &"[redacted]")
            .finish()
    }
}

impl Signer {
    /// Build a signer for `participants` (which must include the owner of
    /// `shamir_share`) over the digest of the message being signed.
    ///
    /// Converts the polynomial share into an additive share by scaling
    /// with the Lagrange coefficient of the signing set at zero, and does
    /// the same in the exponent for every participant's public share.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        curve: CurveTag,
        shamir_share: &ShamirShare,
        secret_key: DecryptionKey,
        keys: SigningKeys,
        verification_key: &CurvePoint,
        all_public_shares: &[CurvePoint],
        participants: &[u32],
        digest: &[u8],
    ) -> Result<Self> {
        let id = shamir_share.id;
        if id == 0 || digest.is_empty() {
            return Err(Error::NilArgument);
        }
        if verification_key.is_identity() {
            return Err(Error::DomainFailure("verification key is the identity".into()));
        }

        let mut set: Vec<u32> = participants.to_vec();
        set.sort_unstable();
        set.dedup();
        if set.len() != participants.len() || set.len() < 2 {
            return Err(Error::DomainFailure(
                "signing set must name at least two distinct participants".into(),
            ));
        }
        if !set.contains(&id) {
            return Err(Error::DomainFailure(
                "signing set does not include this signer".into(),
            ));
        }
        for &j in &set {
            if j == 0 || j as usize > all_public_shares.len() {
                return Err(Error::NilArgument);
            }
            // Every member must be usable for MtA.
            keys.public_key(j)?;
            keys.proof_params(j)?;
        }

        let mut public_shares = HashMap::with_capacity(set.len());
        for &j in &set {
            let lambda = lagrange_coefficient(curve, j, &set)?;
            let w = all_public_shares[(j - 1) as usize].mul(&lambda)?;
            public_shares.insert(j, w);
        }
        let lambda = lagrange_coefficient(curve, id, &set)?;
        let share = lambda.mul(&shamir_share.value)?;

        let cosigners: Vec<u32> = set.iter().copied().filter(|&j| j != id).collect();
        let digest_scalar = curve.scalar_from_bn(&BigNumber::from_slice(digest))?;

        Ok(Self {
            id,
            curve,
            round: 1,
            cosigners,
            keys,
            secret_key,
            share,
            public_shares,
            verification_key: *verification_key,
            digest: digest_scalar,
            state: SigningState::default(),
        })
    }

    /// Convenience constructor straight from a key-generation result.
    pub fn from_dkg_result(
        curve: CurveTag,
        dkg: &DkgResult,
        participants: &[u32],
        digest: &[u8],
    ) -> Result<Self> {
        Self::new(
            curve,
            &dkg.shamir_share,
            dkg.secret_key.clone(),
            SigningKeys::Distributed {
                participant_data: dkg.participant_data.clone(),
            },
            &dkg.verification_key,
            &dkg.public_shares,
            participants,
            digest,
        )
    }

    /// This signer's 1-based position.
    pub fn id(&self) -> u32 {
        self.id
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

    /// Validates that `inbound` holds exactly one message per cosigner
    /// and returns the cosigner ids in ascending order. An echo of the
    /// signer's own message is tolerated and skipped.
    pub(crate) fn cosigner_ids<T>(&self, inbound: &HashMap<u32, T>) -> Result<Vec<u32>> {
        let mut ids: Vec<u32> = inbound.keys().copied().filter(|&id| id != self.id).collect();
        if ids.len() != self.cosigners.len() {
            return Err(Error::IncorrectCount {
                expected: self.cosigners.len(),
                actual: ids.len(),
            });
        }
        if ids.iter().any(|id| !self.cosigners.contains(id)) {
            return Err(Error::NilArgument);
        }
        ids.sort_unstable();
        Ok(ids)
    }

    /// Own proof params: where incoming range proofs must land.
    pub(crate) fn own_proof_params(&self) -> Result<&ProofParams> {
        self.keys.proof_params(self.id)
    }

    pub(crate) fn own_public_share(&self) -> Result<&CurvePoint> {
        self.public_shares.get(&self.id).ok_or(Error::InternalInvariantFailed)
    }
}
