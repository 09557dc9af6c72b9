// Copyright (c) Facebook, Inc. and its affiliates.
// Modifications Copyright (c) 2022-2023 Bolt Labs Holdings, Inc
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

//! Feldman verifiable secret sharing.
//!
//! A dealer splits a secret scalar into `limit` shares of a random
//! polynomial of degree `threshold - 1`, publishing one group-element
//! verifier per coefficient. Any shareholder can check its share against
//! the verifiers, and `threshold` shares recombine to the secret.

use crate::curve::{CurvePoint, CurveScalar, CurveTag};
use crate::errors::{Error, Result};
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

/// One evaluation of the dealer's polynomial: `(id, f(id))`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShamirShare {
    pub id: u32,
    pub value: CurveScalar,
}

impl Zeroize for ShamirShare {
    fn zeroize(&mut self) {
        self.value.zeroize();
    }
}

/// Dealer parameters for one sharing.
#[derive(Clone, Copy, Debug)]
pub struct Feldman {
    threshold: usize,
    limit: usize,
    curve: CurveTag,
}

impl Feldman {
    pub fn new(threshold: usize, limit: usize, curve: CurveTag) -> Result<Self> {
        if threshold == 0 || limit < 2 {
            return Err(Error::NilArgument);
        }
        if threshold > limit {
            return Err(Error::DomainFailure(
                "threshold cannot exceed the number of shareholders".into(),
            ));
        }
        Ok(Self {
            threshold,
            limit,
            curve,
        })
    }

    /// Split `secret` into `limit` shares, returning them together with
    /// the `threshold` coefficient verifiers `V_k = f_k·G`.
    pub fn split<R: RngCore + CryptoRng>(
        &self,
        secret: &CurveScalar,
        rng: &mut R,
    ) -> Result<(Vec<ShamirShare>, Vec<CurvePoint>)> {
        if secret.curve() != self.curve {
            return Err(Error::CurveMismatch);
        }
        let mut coefficients = vec![secret.clone()];
        for _ in 1..self.threshold {
            coefficients.push(self.curve.random_scalar(rng));
        }

        let mut shares = Vec::with_capacity(self.limit);
        for id in 1..=self.limit as u64 {
            let x = self.curve.scalar_from_u64(id);
            // Horner evaluation of f at the shareholder id.
            let mut value = coefficients[self.threshold - 1].clone();
            for k in (0..self.threshold - 1).rev() {
                value = value.mul(&x)?.add(&coefficients[k])?;
            }
            shares.push(ShamirShare {
                id: id as u32,
                value,
            });
        }

        let verifiers = coefficients
            .iter()
            .map(|c| self.curve.base_mul(c))
            .collect::<Result<Vec<_>>>()?;

        for c in coefficients.iter_mut().skip(1) {
            c.zeroize();
        }
        Ok((shares, verifiers))
    }

    /// Check a share against the published verifiers:
    /// `x_j·G == Σ_k j^k · V_k`.
    pub fn verify(&self, share: &ShamirShare, verifiers: &[CurvePoint]) -> Result<()> {
        if share.id == 0 {
            return Err(Error::NilArgument);
        }
        if verifiers.len() != self.threshold {
            return Err(Error::IncorrectCount {
                expected: self.threshold,
                actual: verifiers.len(),
            });
        }
        let lhs = self.curve.base_mul(&share.value)?;

        let x = self.curve.scalar_from_u64(share.id as u64);
        let mut rhs = self.curve.identity();
        let mut power = self.curve.scalar_from_u64(1);
        for v in verifiers {
            rhs = rhs.add(&v.mul(&power)?)?;
            power = power.mul(&x)?;
        }

        if lhs == rhs {
            Ok(())
        } else {
            verify_err!("share does not match verifiers")
        }
    }
}

/// The Lagrange coefficient of `id` when interpolating at zero over the
/// participant set `ids`.
pub(crate) fn lagrange_coefficient(
    curve: CurveTag,
    id: u32,
    ids: &[u32],
) -> Result<CurveScalar> {
    if id == 0 || !ids.contains(&id) {
        return Err(Error::NilArgument);
    }
    let xi = curve.scalar_from_u64(id as u64);
    let mut coefficient = curve.scalar_from_u64(1);
    for &j in ids {
        if j == id {
            continue;
        }
        let xj = curve.scalar_from_u64(j as u64);
        let numerator = xj.clone();
        let denominator = xj.sub(&xi)?.invert()?;
        coefficient = coefficient.mul(&numerator)?.mul(&denominator)?;
    }
    Ok(coefficient)
}

/// Interpolate the dealt secret from a qualified set of shares.
pub fn combine(curve: CurveTag, shares: &[ShamirShare]) -> Result<CurveScalar> {
    if shares.len() < 2 {
        return Err(Error::IncorrectCount {
            expected: 2,
            actual: shares.len(),
        });
    }
    let ids: Vec<u32> = shares.iter().map(|s| s.id).collect();
    let mut secret = curve.scalar_zero();
    for share in shares {
        let lambda = lagrange_coefficient(curve, share.id, &ids)?;
        secret = secret.add(&lambda.mul(&share.value)?)?;
    }
    Ok(secret)
}
