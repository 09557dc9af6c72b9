// Copyright (c) Facebook, Inc. and its affiliates.
// Modifications Copyright (c) 2022-2023 Bolt Labs Holdings, Inc
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

//! Safe-prime generation, serial and parallel.
//!
//! A safe prime is a prime `p` where `(p - 1) / 2` is also prime. The
//! Paillier moduli and the auxiliary range-proof moduli are both products
//! of two safe primes; at 1024 bits each this dominates key-generation
//! time, which is why a worker-pool variant exists.

use crate::errors::{Error, Result};
use crate::parameters::MIN_SAFE_PRIME_BITS;
use libpaillier::unknown_order::BigNumber;
use rand::{CryptoRng, RngCore};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use tracing::debug;

/// Generate a prime `p` of exactly `bits` bits where `(p - 1) / 2` is also
/// prime.
///
/// Samples a Sophie Germain prime `q` of `bits - 1` bits and tests the
/// candidate `p = 2q + 1`, repeating until the candidate is prime.
pub fn generate_safe_prime<R: RngCore + CryptoRng>(bits: usize, _rng: &mut R) -> Result<BigNumber> {
    if bits < MIN_SAFE_PRIME_BITS {
        return Err(Error::DomainFailure(
            "safe prime size must be at least 3 bits".into(),
        ));
    }

    loop {
        let q: BigNumber = BigNumber::prime(bits - 1);
        let p: BigNumber = BigNumber::from(2u64) * &q + 1;
        if p.is_prime() && p.bit_length() == bits {
            return Ok(p);
        }
    }
}

/// Parallel form of [`generate_safe_prime`].
///
/// Spawns `workers` threads that each sample `2q + 1` candidates and
/// forward them over a channel; the receiver runs the final primality
/// check, and the first candidate that passes wins. Workers observe a
/// shared stop flag and exit before producing another candidate; there is
/// no ordering guarantee among them.
pub fn generate_safe_prime_parallel(bits: usize, workers: usize) -> Result<BigNumber> {
    if bits < MIN_SAFE_PRIME_BITS {
        return Err(Error::DomainFailure(
            "safe prime size must be at least 3 bits".into(),
        ));
    }
    if workers == 0 {
        return Err(Error::NilArgument);
    }

    let stop = Arc::new(AtomicBool::new(false));
    let (candidates, results) = mpsc::channel();

    let handles: Vec<_> = (0..workers)
        .map(|_| {
            let stop = Arc::clone(&stop);
            let candidates = candidates.clone();
            std::thread::spawn(move || {
                while !stop.load(Ordering::Relaxed) {
                    let q: BigNumber = BigNumber::prime(bits - 1);
                    let p: BigNumber = BigNumber::from(2u64) * &q + 1;
                    // The receiver hanging up is another worker winning.
                    if candidates.send(p).is_err() {
                        break;
                    }
                }
            })
        })
        .collect();
    drop(candidates);

    let mut winner = None;
    for p in results.iter() {
        if p.is_prime() && p.bit_length() == bits {
            stop.store(true, Ordering::Relaxed);
            winner = Some(p);
            break;
        }
    }
    drop(results);

    for handle in handles {
        if handle.join().is_err() {
            debug!("safe prime worker panicked");
        }
    }

    // Workers only stop producing once a candidate passed, so the channel
    // cannot drain without a winner.
    winner.ok_or(Error::InternalInvariantFailed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::testing::get_test_rng;

    // Small enough to keep these fast; the pre-generated pool covers the
    // sizes used by key generation.
    const TEST_BITS: usize = 256;

    #[test]
    fn generated_primes_are_safe_and_sized() {
        let mut rng = get_test_rng();
        let p = generate_safe_prime(TEST_BITS, &mut rng).unwrap();
        assert!(p.is_prime());
        assert_eq!(p.bit_length(), TEST_BITS);
        let q: BigNumber = (&p - 1) / 2;
        assert!(q.is_prime());
    }

    #[test]
    fn tiny_sizes_are_rejected() {
        let mut rng = get_test_rng();
        assert!(generate_safe_prime(2, &mut rng).is_err());
        assert!(generate_safe_prime_parallel(2, 4).is_err());
    }

    #[test]
    fn zero_workers_is_rejected() {
        assert!(generate_safe_prime_parallel(TEST_BITS, 0).is_err());
    }

    #[test]
    fn parallel_generation_terminates_with_a_safe_prime() {
        let p = generate_safe_prime_parallel(TEST_BITS, 4).unwrap();
        assert!(p.is_prime());
        assert_eq!(p.bit_length(), TEST_BITS);
        let q: BigNumber = (&p - 1) / 2;
        assert!(q.is_prime());
    }
}
