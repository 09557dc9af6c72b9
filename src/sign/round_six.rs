// Copyright (c) Facebook, Inc. and its affiliates.
// Modifications Copyright (c) 2022-2023 Bolt Labs Holdings, Inc
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

use super::round_five::SignRound5Bcast;
use super::signature::Signature;
use super::signer::Signer;
use crate::errors::{Error, Result};
use tracing::instrument;

use std::collections::HashMap;

impl Signer {
    /// Round six: combine the signature shares and check the result.
    ///
    /// `s = Σ s_j mod q`, folded into the low half of the field, must
    /// verify with `r` as a standard ECDSA signature under the joint
    /// verification key; anything else means some share was malformed and
    /// the session aborts.
    #[instrument(skip_all, fields(id = self.id), err)]
    pub fn round6(&mut self, inbound: &HashMap<u32, SignRound5Bcast>) -> Result<Signature> {
        self.verify_round(6)?;
        let cosigner_ids = self.cosigner_ids(inbound)?;

        let mut s = self
            .state
            .sig_share
            .clone()
            .ok_or(Error::InternalInvariantFailed)?;
        for &j in &cosigner_ids {
            s = s.add(&inbound[&j].sig_share)?;
        }
        if s.is_zero() {
            return Err(Error::DomainFailure("combined signature scalar is zero".into()));
        }

        let r = self.state.r.clone().ok_or(Error::InternalInvariantFailed)?;
        let signature = Signature { r, s }.normalize();
        signature.verify(&self.verification_key, &self.digest.to_bytes())?;

        // Session complete; no further rounds apply.
        self.round = 7;
        Ok(signature)
    }
}
