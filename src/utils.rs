// Copyright (c) Facebook, Inc. and its affiliates.
// Modifications Copyright (c) 2022-2023 Bolt Labs Holdings, Inc
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

use crate::errors::{Error, Result};
use libpaillier::unknown_order::BigNumber;
use merlin::Transcript;
use rand::{CryptoRng, RngCore};

pub(crate) const CRYPTOGRAPHIC_RETRY_MAX: usize = 500usize;

/// Compute a^e (mod n).
pub(crate) fn modpow(a: &BigNumber, e: &BigNumber, n: &BigNumber) -> BigNumber {
    a.modpow(e, n)
}

/// Normalize `a` into `[0, n)`.
pub(crate) fn bn_mod(a: &BigNumber, n: &BigNumber) -> BigNumber {
    a.modadd(&BigNumber::zero(), n)
}

/// Sample a number uniformly at random from the range [0, n).
pub(crate) fn random_positive_bn<R: RngCore + CryptoRng>(rng: &mut R, n: &BigNumber) -> BigNumber {
    BigNumber::from_rng(n, rng)
}

/// Sample a number uniformly at random from the range [1, n).
pub(crate) fn random_nonzero_bn<R: RngCore + CryptoRng>(rng: &mut R, n: &BigNumber) -> BigNumber {
    loop {
        let b = BigNumber::from_rng(n, rng);
        if b != BigNumber::zero() {
            return b;
        }
    }
}

/// Generate a random `BigNumber` in the multiplicative group of integers
/// modulo `n`.
///
/// Note: when `n` is someone else's Paillier modulus, an element sharing a
/// factor with `n` would reveal its factorization; the chance is negligible
/// and such elements are dropped anyway.
pub(crate) fn random_bn_in_z_star<R: RngCore + CryptoRng>(
    rng: &mut R,
    n: &BigNumber,
) -> Result<BigNumber> {
    std::iter::repeat_with(|| BigNumber::from_rng(n, rng))
        .take(CRYPTOGRAPHIC_RETRY_MAX)
        .find(|result| result != &BigNumber::zero() && result.gcd(n) == BigNumber::one())
        .ok_or(Error::RetryFailed)
}

/// Derive a deterministic pseudorandom value in `[0, n)` from the
/// [`Transcript`].
///
/// Rejection-samples rather than reducing mod `n`, which would bias small
/// values.
pub(crate) fn positive_bn_random_from_transcript(
    transcript: &mut Transcript,
    n: &BigNumber,
) -> BigNumber {
    let len = n.to_bytes().len();
    let mut t = vec![0u8; len];
    loop {
        transcript.challenge_bytes(b"sampling randomness", t.as_mut_slice());
        let b = BigNumber::from_slice(t.as_slice());
        if &b < n {
            return b;
        }
    }
}

////////////////////////////
// Test Utility Functions //
////////////////////////////


#[cfg(test)]
mod tests {
    use super::*;
    use testing::get_test_rng;

    #[test]
    fn sampled_values_stay_in_range() {
        let mut rng = get_test_rng();
        let n = BigNumber::from(1_000_000u64);
        for _ in 0..100 {
            let b = random_positive_bn(&mut rng, &n);
            assert!(b < n);
            let b = random_nonzero_bn(&mut rng, &n);
            assert!(b > BigNumber::zero() && b < n);
        }
    }

    #[test]
    fn transcript_sampling_is_deterministic() {
        let n = BigNumber::one() << 256;
        let mut t1 = merlin::Transcript::new(b"test");
        let mut t2 = merlin::Transcript::new(b"test");
        assert_eq!(
            positive_bn_random_from_transcript(&mut t1, &n),
            positive_bn_random_from_transcript(&mut t2, &n)
        );
    }

    #[test]
    fn bn_mod_normalizes_negatives() {
        let n = BigNumber::from(7u64);
        let x = BigNumber::zero() - BigNumber::from(3u64);
        assert_eq!(bn_mod(&x, &n), BigNumber::from(4u64));
    }
}
