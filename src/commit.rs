// Copyright (c) Facebook, Inc. and its affiliates.
// Modifications Copyright (c) 2022-2023 Bolt Labs Holdings, Inc
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

//! Hash commitments with a blinding witness.
//!
//! `commit` binds a message under a fresh 32-byte blinding; `open` rebuilds
//! the digest from the witness and compares in constant time.

use crate::errors::{Error, Result};
use crate::parameters::COMMITMENT_BLINDING_BYTES;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// A binding, hiding digest over a message and blinding.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commitment([u8; 32]);

/// The opening of a [`Commitment`]: the committed message together with
/// its blinding factor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Witness {
    pub(crate) message: Vec<u8>,
    blinding: Vec<u8>,
}

/// Commit to `message` under a freshly sampled blinding.
pub fn commit<R: RngCore + CryptoRng>(
    rng: &mut R,
    message: &[u8],
) -> Result<(Commitment, Witness)> {
    if message.is_empty() {
        return Err(Error::NilArgument);
    }
    let mut blinding = vec![0u8; COMMITMENT_BLINDING_BYTES];
    rng.fill_bytes(&mut blinding);
    let commitment = digest(message, &blinding);
    Ok((
        commitment,
        Witness {
            message: message.to_vec(),
            blinding,
        },
    ))
}

/// Check that `witness` opens `commitment`.
pub fn open(commitment: &Commitment, witness: &Witness) -> Result<()> {
    if witness.message.is_empty() || witness.blinding.len() < COMMITMENT_BLINDING_BYTES {
        return Err(Error::NilArgument);
    }
    let rebuilt = digest(&witness.message, &witness.blinding);
    if rebuilt.0.ct_eq(&commitment.0).into() {
        Ok(())
    } else {
        verify_err!("commitment opening does not match")
    }
}

fn digest(message: &[u8], blinding: &[u8]) -> Commitment {
    let hash = Sha256::new()
        .chain_update(message)
        .chain_update(blinding)
        .finalize();
    Commitment(hash.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::testing::get_test_rng;

    #[test]
    fn commit_open_round_trip() {
        let mut rng = get_test_rng();
        let (c, d) = commit(&mut rng, b"a message worth keeping").unwrap();
        assert!(open(&c, &d).is_ok());
    }

    #[test]
    fn tampered_message_fails_to_open() {
        let mut rng = get_test_rng();
        let (c, mut d) = commit(&mut rng, b"a message worth keeping").unwrap();
        d.message[0] ^= 1;
        assert!(open(&c, &d).is_err());
    }

    #[test]
    fn wrong_witness_fails_to_open() {
        let mut rng = get_test_rng();
        let (c, _) = commit(&mut rng, b"first").unwrap();
        let (_, d) = commit(&mut rng, b"second").unwrap();
        assert!(open(&c, &d).is_err());
    }

    #[test]
    fn degenerate_witnesses_are_rejected() {
        let mut rng = get_test_rng();
        assert_eq!(commit(&mut rng, b""), Err(Error::NilArgument));

        let (c, d) = commit(&mut rng, b"msg").unwrap();
        let empty = Witness {
            message: vec![],
            blinding: vec![0u8; COMMITMENT_BLINDING_BYTES],
        };
        assert_eq!(open(&c, &empty), Err(Error::NilArgument));
        let short = Witness {
            message: d.message.clone(),
            blinding: vec![0u8; COMMITMENT_BLINDING_BYTES - 1],
        };
        assert_eq!(open(&c, &short), Err(Error::NilArgument));
    }

    #[test]
    fn witness_serde_round_trip() {
        let mut rng = get_test_rng();
        let (c, d) = commit(&mut rng, b"round trip").unwrap();
        let d2: Witness = bincode::deserialize(&bincode::serialize(&d).unwrap()).unwrap();
        let c2: Commitment = bincode::deserialize(&bincode::serialize(&c).unwrap()).unwrap();
        assert_eq!(d, d2);
        assert!(open(&c2, &d2).is_ok());
    }
}
