// Copyright (c) Facebook, Inc. and its affiliates.
// Modifications Copyright (c) 2022-2023 Bolt Labs Holdings, Inc
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

//! Auxiliary range-proof parameters `(Ñ, h1, h2)`.
//!
//! Each participant publishes a safe-prime composite `Ñ` with two
//! generators of its quadratic-residue subgroup, `h2 = h1^α`. The
//! discrete logs between `h1` and `h2` stay unknown to everyone else,
//! which is what makes the MtA range proofs binding. Two composite
//! discrete log proofs, one per direction, accompany the parameters.

use crate::curve::CurveTag;
use crate::errors::{Error, Result};
use crate::paillier::modulus_size_acceptable;
use crate::utils::{random_bn_in_z_star, random_nonzero_bn, CRYPTOGRAPHIC_RETRY_MAX};
use crate::zkp::cdl::{CdlProof, CdlSecret, CdlStatement};
use crate::zkp::Proof;
use libpaillier::unknown_order::BigNumber;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

/// Public range-proof parameters for one participant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofParams {
    pub(crate) n: BigNumber,
    pub(crate) h1: BigNumber,
    pub(crate) h2: BigNumber,
}

impl ProofParams {
    /// Generate fresh parameters along with the two composite discrete log
    /// proofs pinning both directions between `h1` and `h2`.
    pub fn generate<R: RngCore + CryptoRng>(
        curve: CurveTag,
        rng: &mut R,
    ) -> Result<(Self, CdlProof, CdlProof)> {
        let (p, q) = std::iter::repeat_with(|| Self::prime_pair(rng))
            .take(CRYPTOGRAPHIC_RETRY_MAX)
            .find(|result| match result {
                Ok((p, q)) => modulus_size_acceptable(&(p * q)),
                Err(_) => true,
            })
            .ok_or(Error::RetryFailed)??;

        let n = &p * &q;
        // Order of the quadratic-residue subgroup of Z*_n.
        let mut subgroup_order: BigNumber = ((&p - 1) / 2) * ((&q - 1) / 2);

        let f = random_bn_in_z_star(rng, &n)?;
        let h1 = f.modpow(&BigNumber::from(2u64), &n);

        // The exponent must be invertible mod the subgroup order so the
        // reverse-direction proof exists.
        let mut alpha = random_nonzero_bn(rng, &subgroup_order);
        while alpha.gcd(&subgroup_order) != BigNumber::one() {
            alpha = random_nonzero_bn(rng, &subgroup_order);
        }
        let h2 = h1.modpow(&alpha, &n);
        let mut alpha_inv = alpha
            .invert(&subgroup_order)
            .ok_or(Error::CouldNotInvertBigNumber)?;

        let params = Self {
            n: n.clone(),
            h1: h1.clone(),
            h2: h2.clone(),
        };

        let forward = CdlProof::prove(
            rng,
            &CdlStatement::new(curve, &n, &h1, &h2),
            &CdlSecret::new(&alpha, &subgroup_order),
        )?;
        let reverse = CdlProof::prove(
            rng,
            &CdlStatement::new(curve, &n, &h2, &h1),
            &CdlSecret::new(&alpha_inv, &subgroup_order),
        )?;

        alpha.zeroize();
        alpha_inv.zeroize();
        subgroup_order.zeroize();

        Ok((params, forward, reverse))
    }

    fn prime_pair<R: RngCore + CryptoRng>(rng: &mut R) -> Result<(BigNumber, BigNumber)> {
        #[cfg(not(test))]
        {
            use crate::parameters::PRIME_BITS;
            Ok((
                crate::primes::generate_safe_prime(PRIME_BITS, rng)?,
                crate::primes::generate_safe_prime(PRIME_BITS, rng)?,
            ))
        }
        #[cfg(test)]
        {
            crate::paillier::prime_gen::pair_from_pool_insecure(rng)
        }
    }

    pub fn modulus(&self) -> &BigNumber {
        &self.n
    }
}
