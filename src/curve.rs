// Copyright (c) Facebook, Inc. and its affiliates.
// Modifications Copyright (c) 2022-2023 Bolt Labs Holdings, Inc
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

//! Curve-tagged group and scalar-field arithmetic.
//!
//! The protocol runs over either secp256k1 or NIST P-256. Rather than
//! threading a generic curve parameter through every type, a small
//! [`CurveTag`] selects the curve and [`CurvePoint`]/[`CurveScalar`]
//! dispatch statically into the `k256` and `p256` backends. Combining
//! values from different curves is a [`Error::CurveMismatch`].

use crate::errors::{Error, Result};
use k256::elliptic_curve::{
    bigint::Encoding,
    group::GroupEncoding as _,
    sec1::{FromEncodedPoint, ToEncodedPoint},
    Curve, Field, Group, PrimeField,
};
use libpaillier::unknown_order::BigNumber;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::Zeroize;

/// secp256k1 field prime, big-endian.
const SECP256K1_FIELD_PRIME: &str =
    "fffffffffffffffffffffffffffffffffffffffffffffffffffffffefffffc2f";
/// NIST P-256 field prime, big-endian.
const NIST_P256_FIELD_PRIME: &str =
    "ffffffff00000001000000000000000000000000ffffffffffffffffffffffff";

/// Identifies which of the two supported curves a value belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CurveTag {
    Secp256k1,
    NistP256,
}

impl CurveTag {
    /// The group order `q`.
    pub fn order(&self) -> BigNumber {
        let bytes: [u8; 32] = match self {
            CurveTag::Secp256k1 => k256::Secp256k1::ORDER.to_be_bytes(),
            CurveTag::NistP256 => p256::NistP256::ORDER.to_be_bytes(),
        };
        BigNumber::from_slice(bytes)
    }

    /// The prime of the underlying field.
    pub fn field_prime(&self) -> BigNumber {
        let hex = match self {
            CurveTag::Secp256k1 => SECP256K1_FIELD_PRIME,
            CurveTag::NistP256 => NIST_P256_FIELD_PRIME,
        };
        let mut bytes = [0u8; 32];
        for (i, chunk) in hex.as_bytes().chunks(2).enumerate() {
            bytes[i] = u8::from_str_radix(std::str::from_utf8(chunk).unwrap(), 16).unwrap();
        }
        BigNumber::from_slice(bytes)
    }

    /// Byte length of a field element.
    pub fn field_size(&self) -> usize {
        32
    }

    pub fn generator(&self) -> CurvePoint {
        match self {
            CurveTag::Secp256k1 => CurvePoint::Secp256k1(k256::ProjectivePoint::GENERATOR),
            CurveTag::NistP256 => CurvePoint::NistP256(p256::ProjectivePoint::GENERATOR),
        }
    }

    pub fn identity(&self) -> CurvePoint {
        match self {
            CurveTag::Secp256k1 => CurvePoint::Secp256k1(k256::ProjectivePoint::IDENTITY),
            CurveTag::NistP256 => CurvePoint::NistP256(p256::ProjectivePoint::IDENTITY),
        }
    }

    /// Computes `k·G`.
    pub fn base_mul(&self, k: &CurveScalar) -> Result<CurvePoint> {
        self.generator().mul(k)
    }

    pub fn random_scalar<R: RngCore + CryptoRng>(&self, rng: &mut R) -> CurveScalar {
        match self {
            CurveTag::Secp256k1 => CurveScalar::Secp256k1(k256::Scalar::random(&mut *rng)),
            CurveTag::NistP256 => CurveScalar::NistP256(p256::Scalar::random(&mut *rng)),
        }
    }

    /// Samples from `F_q*`.
    pub fn random_nonzero_scalar<R: RngCore + CryptoRng>(&self, rng: &mut R) -> CurveScalar {
        loop {
            let s = self.random_scalar(rng);
            if !s.is_zero() {
                return s;
            }
        }
    }

    pub fn scalar_from_u64(&self, v: u64) -> CurveScalar {
        match self {
            CurveTag::Secp256k1 => CurveScalar::Secp256k1(k256::Scalar::from(v)),
            CurveTag::NistP256 => CurveScalar::NistP256(p256::Scalar::from(v)),
        }
    }

    pub fn scalar_zero(&self) -> CurveScalar {
        self.scalar_from_u64(0)
    }

    /// Reduces a possibly-negative integer into the scalar field.
    pub fn scalar_from_bn(&self, x: &BigNumber) -> Result<CurveScalar> {
        let reduced = x % self.order();
        let bytes = reduced.to_bytes();
        if bytes.len() > 32 {
            return Err(Error::InternalInvariantFailed);
        }
        let mut repr = [0u8; 32];
        repr[32 - bytes.len()..].copy_from_slice(&bytes);
        let mut scalar = match self {
            CurveTag::Secp256k1 => {
                let s: Option<k256::Scalar> =
                    k256::Scalar::from_repr(repr.into()).into();
                CurveScalar::Secp256k1(s.ok_or(Error::InternalInvariantFailed)?)
            }
            CurveTag::NistP256 => {
                let s: Option<p256::Scalar> =
                    p256::Scalar::from_repr(repr.into()).into();
                CurveScalar::NistP256(s.ok_or(Error::InternalInvariantFailed)?)
            }
        };
        // `%` keeps the sign of the dividend; the magnitude bytes above lose
        // it, so negate the result for negative inputs.
        if x < &BigNumber::zero() {
            scalar = scalar.negate();
        }
        Ok(scalar)
    }

    /// Decodes an uncompressed point: the X and Y coordinates concatenated,
    /// `2 * field_size` bytes, no SEC1 tag byte. Rejects encodings that do
    /// not name a point on the curve.
    pub fn point_from_uncompressed(&self, bytes: &[u8]) -> Result<CurvePoint> {
        if bytes.len() != 2 * self.field_size() {
            return Err(Error::DomainFailure(
                "uncompressed point has wrong length".into(),
            ));
        }
        let (x, y) = bytes.split_at(self.field_size());
        match self {
            CurveTag::Secp256k1 => {
                let encoded = k256::EncodedPoint::from_affine_coordinates(
                    k256::FieldBytes::from_slice(x),
                    k256::FieldBytes::from_slice(y),
                    false,
                );
                let affine: Option<k256::AffinePoint> =
                    k256::AffinePoint::from_encoded_point(&encoded).into();
                Ok(CurvePoint::Secp256k1(
                    affine
                        .ok_or_else(|| Error::DomainFailure("point not on curve".into()))?
                        .into(),
                ))
            }
            CurveTag::NistP256 => {
                let encoded = p256::EncodedPoint::from_affine_coordinates(
                    p256::FieldBytes::from_slice(x),
                    p256::FieldBytes::from_slice(y),
                    false,
                );
                let affine: Option<p256::AffinePoint> =
                    p256::AffinePoint::from_encoded_point(&encoded).into();
                Ok(CurvePoint::NistP256(
                    affine
                        .ok_or_else(|| Error::DomainFailure("point not on curve".into()))?
                        .into(),
                ))
            }
        }
    }
}

/// A point on one of the supported curves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CurvePoint {
    Secp256k1(k256::ProjectivePoint),
    NistP256(p256::ProjectivePoint),
}

impl CurvePoint {
    pub fn curve(&self) -> CurveTag {
        match self {
            CurvePoint::Secp256k1(_) => CurveTag::Secp256k1,
            CurvePoint::NistP256(_) => CurveTag::NistP256,
        }
    }

    pub fn add(&self, rhs: &CurvePoint) -> Result<CurvePoint> {
        match (self, rhs) {
            (CurvePoint::Secp256k1(a), CurvePoint::Secp256k1(b)) => {
                Ok(CurvePoint::Secp256k1(a + b))
            }
            (CurvePoint::NistP256(a), CurvePoint::NistP256(b)) => Ok(CurvePoint::NistP256(a + b)),
            _ => Err(Error::CurveMismatch),
        }
    }

    pub fn mul(&self, k: &CurveScalar) -> Result<CurvePoint> {
        match (self, k) {
            (CurvePoint::Secp256k1(p), CurveScalar::Secp256k1(s)) => {
                Ok(CurvePoint::Secp256k1(p * s))
            }
            (CurvePoint::NistP256(p), CurveScalar::NistP256(s)) => Ok(CurvePoint::NistP256(p * s)),
            _ => Err(Error::CurveMismatch),
        }
    }

    pub fn is_identity(&self) -> bool {
        match self {
            CurvePoint::Secp256k1(p) => p.is_identity().into(),
            CurvePoint::NistP256(p) => p.is_identity().into(),
        }
    }

    /// The X and Y coordinates concatenated, `2 * field_size` bytes. The
    /// identity has no affine encoding and is rejected.
    pub fn to_uncompressed_bytes(&self) -> Result<Vec<u8>> {
        if self.is_identity() {
            return Err(Error::DomainFailure(
                "identity point has no uncompressed encoding".into(),
            ));
        }
        let encoded = match self {
            CurvePoint::Secp256k1(p) => p.to_affine().to_encoded_point(false).as_bytes().to_vec(),
            CurvePoint::NistP256(p) => p.to_affine().to_encoded_point(false).as_bytes().to_vec(),
        };
        // Strip the SEC1 uncompressed tag byte.
        Ok(encoded[1..].to_vec())
    }

    /// The affine X coordinate as an unsigned integer.
    pub fn x_coordinate(&self) -> Result<BigNumber> {
        let bytes = self.to_uncompressed_bytes()?;
        Ok(BigNumber::from_slice(&bytes[..self.curve().field_size()]))
    }
}

impl Serialize for CurvePoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let bytes = match self {
            CurvePoint::Secp256k1(p) => p.to_bytes().to_vec(),
            CurvePoint::NistP256(p) => p.to_bytes().to_vec(),
        };
        (self.curve(), bytes).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for CurvePoint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let (tag, bytes): (CurveTag, Vec<u8>) = Deserialize::deserialize(deserializer)?;
        let point = match tag {
            CurveTag::Secp256k1 => {
                if bytes.len() != 33 {
                    return Err(serde::de::Error::custom("invalid point encoding"));
                }
                let mut repr = k256::CompressedPoint::default();
                repr.copy_from_slice(&bytes);
                let p: Option<k256::ProjectivePoint> =
                    k256::ProjectivePoint::from_bytes(&repr).into();
                CurvePoint::Secp256k1(
                    p.ok_or_else(|| serde::de::Error::custom("invalid point encoding"))?,
                )
            }
            CurveTag::NistP256 => {
                if bytes.len() != 33 {
                    return Err(serde::de::Error::custom("invalid point encoding"));
                }
                let mut repr = p256::CompressedPoint::default();
                repr.copy_from_slice(&bytes);
                let p: Option<p256::ProjectivePoint> =
                    p256::ProjectivePoint::from_bytes(&repr).into();
                CurvePoint::NistP256(
                    p.ok_or_else(|| serde::de::Error::custom("invalid point encoding"))?,
                )
            }
        };
        Ok(point)
    }
}

/// An element of the scalar field of one of the supported curves.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CurveScalar {
    Secp256k1(k256::Scalar),
    NistP256(p256::Scalar),
}

impl CurveScalar {
    pub fn curve(&self) -> CurveTag {
        match self {
            CurveScalar::Secp256k1(_) => CurveTag::Secp256k1,
            CurveScalar::NistP256(_) => CurveTag::NistP256,
        }
    }

    pub fn add(&self, rhs: &CurveScalar) -> Result<CurveScalar> {
        match (self, rhs) {
            (CurveScalar::Secp256k1(a), CurveScalar::Secp256k1(b)) => {
                Ok(CurveScalar::Secp256k1(a + b))
            }
            (CurveScalar::NistP256(a), CurveScalar::NistP256(b)) => {
                Ok(CurveScalar::NistP256(a + b))
            }
            _ => Err(Error::CurveMismatch),
        }
    }

    pub fn sub(&self, rhs: &CurveScalar) -> Result<CurveScalar> {
        match (self, rhs) {
            (CurveScalar::Secp256k1(a), CurveScalar::Secp256k1(b)) => {
                Ok(CurveScalar::Secp256k1(a - b))
            }
            (CurveScalar::NistP256(a), CurveScalar::NistP256(b)) => {
                Ok(CurveScalar::NistP256(a - b))
            }
            _ => Err(Error::CurveMismatch),
        }
    }

    pub fn mul(&self, rhs: &CurveScalar) -> Result<CurveScalar> {
        match (self, rhs) {
            (CurveScalar::Secp256k1(a), CurveScalar::Secp256k1(b)) => {
                Ok(CurveScalar::Secp256k1(a * b))
            }
            (CurveScalar::NistP256(a), CurveScalar::NistP256(b)) => {
                Ok(CurveScalar::NistP256(a * b))
            }
            _ => Err(Error::CurveMismatch),
        }
    }

    pub fn negate(&self) -> CurveScalar {
        match self {
            CurveScalar::Secp256k1(s) => CurveScalar::Secp256k1(-*s),
            CurveScalar::NistP256(s) => CurveScalar::NistP256(-*s),
        }
    }

    pub fn invert(&self) -> Result<CurveScalar> {
        match self {
            CurveScalar::Secp256k1(s) => {
                let inv: Option<k256::Scalar> = s.invert().into();
                Ok(CurveScalar::Secp256k1(
                    inv.ok_or(Error::CouldNotInvertScalar)?,
                ))
            }
            CurveScalar::NistP256(s) => {
                let inv: Option<p256::Scalar> = s.invert().into();
                Ok(CurveScalar::NistP256(
                    inv.ok_or(Error::CouldNotInvertScalar)?,
                ))
            }
        }
    }

    pub fn is_zero(&self) -> bool {
        match self {
            CurveScalar::Secp256k1(s) => s.is_zero().into(),
            CurveScalar::NistP256(s) => s.is_zero().into(),
        }
    }

    /// Big-endian canonical encoding, 32 bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            CurveScalar::Secp256k1(s) => s.to_repr().to_vec(),
            CurveScalar::NistP256(s) => s.to_repr().to_vec(),
        }
    }

    pub fn to_bn(&self) -> BigNumber {
        BigNumber::from_slice(self.to_bytes())
    }
}

impl Zeroize for CurveScalar {
    fn zeroize(&mut self) {
        match self {
            CurveScalar::Secp256k1(s) => *s = k256::Scalar::ZERO,
            CurveScalar::NistP256(s) => *s = p256::Scalar::ZERO,
        }
    }
}

impl Serialize for CurveScalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        (self.curve(), self.to_bytes()).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for CurveScalar {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let (tag, bytes): (CurveTag, Vec<u8>) = Deserialize::deserialize(deserializer)?;
        if bytes.len() != tag.field_size() {
            return Err(serde::de::Error::custom("invalid scalar encoding"));
        }
        // A canonical encoding is non-negative and below the order, so the
        // unsigned conversion round-trips.
        tag.scalar_from_bn(&BigNumber::from_slice(&bytes))
            .map_err(serde::de::Error::custom)
    }
}
