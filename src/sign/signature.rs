// Copyright (c) Facebook, Inc. and its affiliates.
// Modifications Copyright (c) 2022-2023 Bolt Labs Holdings, Inc
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

use crate::curve::{CurvePoint, CurveScalar};
use crate::errors::{Error, Result};
use libpaillier::unknown_order::BigNumber;
use serde::{Deserialize, Serialize};

/// A standard ECDSA signature, produced by signing round six.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Signature {
    pub r: CurveScalar,
    pub s: CurveScalar,
}

impl Signature {
    /// Verify against a public key and a message digest, the textbook
    /// way: `R' = (m/s)·G + (r/s)·Y` must reproduce `r`.
    pub fn verify(&self, public_key: &CurvePoint, digest: &[u8]) -> Result<()> {
        let curve = public_key.curve();
        if public_key.is_identity() {
            return Err(Error::DomainFailure("public key is the identity".into()));
        }
        if digest.is_empty() {
            return Err(Error::NilArgument);
        }
        if self.r.is_zero() || self.s.is_zero() {
            return Err(Error::DomainFailure("signature scalar is zero".into()));
        }

        let m = curve.scalar_from_bn(&BigNumber::from_slice(digest))?;
        let s_inv = self.s.invert()?;
        let u1 = m.mul(&s_inv)?;
        let u2 = self.r.mul(&s_inv)?;
        let point = curve.base_mul(&u1)?.add(&public_key.mul(&u2)?)?;
        if point.is_identity() {
            return verify_err!("signature produced the identity point");
        }
        let rx = curve.scalar_from_bn(&point.x_coordinate()?)?;
        if rx == self.r {
            Ok(())
        } else {
            verify_err!("signature does not verify")
        }
    }

    /// Whether `s` lies in the low half of the scalar field. Round six
    /// normalizes its output, so freshly produced signatures always do.
    pub fn is_low_s(&self) -> bool {
        let half = self.s.curve().order() / 2;
        self.s.to_bn() <= half
    }

    /// Fold `s` into the low half of the field if needed; `(r, -s)` is
    /// equally valid and verifiers commonly insist on the canonical half.
    pub fn normalize(self) -> Signature {
        if self.is_low_s() {
            self
        } else {
            Signature {
                r: self.r,
                s: self.s.negate(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::CurveTag;
    use crate::utils::testing::get_test_rng;
    use sha2::{Digest, Sha256};

    /// Sign with a plain (non-threshold) key, the textbook way.
    fn ecdsa_sign(
        curve: CurveTag,
        x: &CurveScalar,
        digest: &[u8],
        rng: &mut (impl rand::RngCore + rand::CryptoRng),
    ) -> Signature {
        let m = curve
            .scalar_from_bn(&BigNumber::from_slice(digest))
            .unwrap();
        loop {
            let k = curve.random_nonzero_scalar(rng);
            let big_r = curve.base_mul(&k.invert().unwrap()).unwrap();
            let r = curve
                .scalar_from_bn(&big_r.x_coordinate().unwrap())
                .unwrap();
            if r.is_zero() {
                continue;
            }
            let s = k.mul(&m.add(&r.mul(x).unwrap()).unwrap()).unwrap();
            if s.is_zero() {
                continue;
            }
            return Signature { r, s };
        }
    }

    #[test]
    fn textbook_signatures_verify() {
        let mut rng = get_test_rng();
        let digest = Sha256::digest(b"abc");
        for curve in [CurveTag::Secp256k1, CurveTag::NistP256] {
            let x = curve.random_nonzero_scalar(&mut rng);
            let y = curve.base_mul(&x).unwrap();
            let sig = ecdsa_sign(curve, &x, &digest, &mut rng).normalize();
            assert!(sig.is_low_s());
            sig.verify(&y, &digest).unwrap();

            // Wrong key and wrong message both fail.
            let other = curve
                .base_mul(&curve.random_nonzero_scalar(&mut rng))
                .unwrap();
            assert!(sig.verify(&other, &digest).is_err());
            let other_digest = Sha256::digest(b"abd");
            assert!(sig.verify(&y, &other_digest).is_err());
        }
    }

    #[test]
    fn normalization_preserves_validity() {
        let mut rng = get_test_rng();
        let curve = CurveTag::Secp256k1;
        let digest = Sha256::digest(b"normalize me");
        let x = curve.random_nonzero_scalar(&mut rng);
        let y = curve.base_mul(&x).unwrap();
        let sig = ecdsa_sign(curve, &x, &digest, &mut rng);
        let flipped = Signature {
            r: sig.r.clone(),
            s: sig.s.negate(),
        };
        flipped.verify(&y, &digest).unwrap();
        let normalized = flipped.normalize();
        assert!(normalized.is_low_s());
        normalized.verify(&y, &digest).unwrap();
    }

    #[test]
    fn signature_serde_round_trip() {
        let mut rng = get_test_rng();
        let curve = CurveTag::NistP256;
        let digest = Sha256::digest(b"serde");
        let x = curve.random_nonzero_scalar(&mut rng);
        let y = curve.base_mul(&x).unwrap();
        let sig = ecdsa_sign(curve, &x, &digest, &mut rng);
        let round: Signature = bincode::deserialize(&bincode::serialize(&sig).unwrap()).unwrap();
        assert_eq!(sig, round);
        round.verify(&y, &digest).unwrap();
    }
}
