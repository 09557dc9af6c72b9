// Copyright (c) Facebook, Inc. and its affiliates.
// Modifications Copyright (c) 2022-2023 Bolt Labs Holdings, Inc
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

//! Paillier keys and the additively homomorphic ciphertext group.
//!
//! Encryption is done by hand rather than through `libpaillier`'s
//! byte-oriented API so that callers control the nonce; the range proofs
//! re-randomize and re-derive ciphertexts from their components.

use crate::errors::{Error, Result};
use crate::parameters::PRIME_BITS;
use crate::utils::{bn_mod, random_bn_in_z_star, CRYPTOGRAPHIC_RETRY_MAX};
use libpaillier::unknown_order::BigNumber;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use thiserror::Error;
use zeroize::Zeroize;

/// Paillier-specific errors
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaillierError {
    #[error("Failed to create a Paillier decryption key from inputs")]
    CouldNotCreateKey,
    #[error("The inputs to a homomorphic operation on a Paillier ciphertext were malformed")]
    InvalidOperation,
    #[error("The attempted decryption of a Paillier ciphertext failed")]
    DecryptionFailed,
}

/// An element of `[1, N^2)` produced by [`EncryptionKey::encrypt`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ciphertext(pub(crate) BigNumber);

impl Ciphertext {
    pub(crate) fn to_bytes(&self) -> Vec<u8> {
        self.0.to_bytes()
    }
}

/// The public half of a Paillier keypair: the modulus `N`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EncryptionKey(libpaillier::EncryptionKey);

impl PartialEq for EncryptionKey {
    fn eq(&self, other: &Self) -> bool {
        self.n() == other.n()
    }
}
impl Eq for EncryptionKey {}

impl EncryptionKey {
    pub fn n(&self) -> &BigNumber {
        self.0.n()
    }

    pub(crate) fn nn(&self) -> &BigNumber {
        self.0.nn()
    }

    /// Encrypt `x`, returning the ciphertext and the nonce used.
    pub(crate) fn encrypt<R: RngCore + CryptoRng>(
        &self,
        rng: &mut R,
        x: &BigNumber,
    ) -> Result<(Ciphertext, BigNumber)> {
        let nonce = random_bn_in_z_star(rng, self.n())?;
        let c = self.encrypt_with_nonce(x, &nonce)?;
        Ok((c, nonce))
    }

    /// Encrypt `x` under a caller-supplied nonce:
    /// `c = (1 + N)^x * nonce^N mod N^2`.
    ///
    /// `x` is first normalized into `[0, N)`, which is also where the
    /// homomorphism operates, so negative inputs encrypt their residue.
    pub(crate) fn encrypt_with_nonce(&self, x: &BigNumber, nonce: &BigNumber) -> Result<Ciphertext> {
        if nonce <= &BigNumber::zero() || nonce >= self.n() {
            return Err(PaillierError::InvalidOperation)?;
        }
        let x = bn_mod(x, self.n());
        let one = BigNumber::one();
        let base = one + self.n();
        let a = base.modpow(&x, self.nn());
        let b = nonce.modpow(self.n(), self.nn());
        Ok(Ciphertext(a.modmul(&b, self.nn())))
    }

    /// Homomorphic addition of plaintexts: `c1 * c2 mod N^2`.
    pub(crate) fn add(&self, c1: &Ciphertext, c2: &Ciphertext) -> Result<Ciphertext> {
        self.check_ciphertext(c1)?;
        self.check_ciphertext(c2)?;
        Ok(Ciphertext(c1.0.modmul(&c2.0, self.nn())))
    }

    /// Homomorphic scalar multiplication of the plaintext: `c^a mod N^2`.
    pub(crate) fn mul(&self, c: &Ciphertext, a: &BigNumber) -> Result<Ciphertext> {
        if a < &BigNumber::zero() {
            return Err(PaillierError::InvalidOperation)?;
        }
        self.check_ciphertext(c)?;
        Ok(Ciphertext(c.0.modpow(a, self.nn())))
    }

    fn check_ciphertext(&self, c: &Ciphertext) -> Result<()> {
        if c.0 <= BigNumber::zero() || &c.0 >= self.nn() {
            return Err(PaillierError::InvalidOperation)?;
        }
        Ok(())
    }
}

/// A Paillier keypair with its factorization retained.
///
/// The factors back the square-freeness proof and the totient-order
/// arithmetic in the range proofs; they are scrubbed when the key is
/// dropped. This type deliberately implements no serde: secret keys do
/// not leave the process through any result envelope.
#[derive(Clone)]
pub struct DecryptionKey {
    inner: libpaillier::DecryptionKey,
    p: BigNumber,
    q: BigNumber,
}

impl Debug for DecryptionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecryptionKey")
            .field("n", self.inner.n())
            .field("p", &"[redacted]")
            .field("q", &"[redacted]")
            .finish()
    }
}

impl Drop for DecryptionKey {
    fn drop(&mut self) {
        self.p.zeroize();
        self.q.zeroize();
    }
}

impl DecryptionKey {
    /// Generate a fresh keypair from two random safe primes.
    ///
    /// The factors are `PRIME_BITS` long; the modulus lands at
    /// `2 * PRIME_BITS` or `2 * PRIME_BITS - 1` bits, and the generation
    /// retries on the (rare) draw outside that window.
    pub fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Result<Self> {
        let make_pair = |rng: &mut R| -> Result<(BigNumber, BigNumber)> {
            #[cfg(not(test))]
            let (p, q) = (
                crate::primes::generate_safe_prime(PRIME_BITS, rng)?,
                crate::primes::generate_safe_prime(PRIME_BITS, rng)?,
            );
            // Safe primes this size take minutes each; tests draw from a
            // pre-generated pool instead.
            #[cfg(test)]
            let (p, q) = prime_gen::pair_from_pool_insecure(rng)?;

            if modulus_size_acceptable(&(&p * &q)) {
                Ok((p, q))
            } else {
                Err(PaillierError::CouldNotCreateKey)?
            }
        };

        let (p, q) = std::iter::repeat_with(|| make_pair(rng))
            .take(CRYPTOGRAPHIC_RETRY_MAX)
            .find(|result| result.is_ok())
            .ok_or(Error::RetryFailed)??;

        Self::from_primes(p, q)
    }

    /// Build a keypair from two known safe primes.
    pub fn from_primes(p: BigNumber, q: BigNumber) -> Result<Self> {
        let inner = libpaillier::DecryptionKey::with_primes_unchecked(&p, &q)
            .ok_or(PaillierError::CouldNotCreateKey)?;
        Ok(Self { inner, p, q })
    }

    pub fn encryption_key(&self) -> EncryptionKey {
        EncryptionKey(libpaillier::EncryptionKey::from(&self.inner))
    }

    /// The modulus `N = pq`.
    pub fn modulus(&self) -> &BigNumber {
        self.inner.n()
    }

    /// Euler's totient of the modulus, `(p - 1)(q - 1)`.
    pub(crate) fn totient(&self) -> BigNumber {
        (&self.p - 1) * (&self.q - 1)
    }

    pub(crate) fn decrypt(&self, c: &Ciphertext) -> Result<BigNumber> {
        let bytes = self
            .inner
            .decrypt(&c.0)
            .ok_or(PaillierError::DecryptionFailed)?;
        Ok(BigNumber::from_slice(bytes))
    }
}

/// Returns whether `n` can serve as a Paillier or range-proof modulus.
pub(crate) fn modulus_size_acceptable(n: &BigNumber) -> bool {
    let bits = n.bit_length();
    bits == 2 * PRIME_BITS || bits == 2 * PRIME_BITS - 1
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::testing::get_test_rng;

    #[test]
    fn keygen_produces_a_modulus_in_the_accepted_window() {
        let mut rng = get_test_rng();
        let sk = DecryptionKey::generate(&mut rng).unwrap();
        assert!(modulus_size_acceptable(sk.modulus()));
        assert_eq!(sk.modulus(), sk.encryption_key().n());
    }

    #[test]
    fn encrypt_decrypt_round_trip() {
        let mut rng = get_test_rng();
        let sk = DecryptionKey::generate(&mut rng).unwrap();
        let pk = sk.encryption_key();

        let x = BigNumber::from(4_815_162_342u64);
        let (c, _) = pk.encrypt(&mut rng, &x).unwrap();
        assert_eq!(sk.decrypt(&c).unwrap(), x);
    }

    #[test]
    fn homomorphic_add_and_scalar_mul() {
        let mut rng = get_test_rng();
        let sk = DecryptionKey::generate(&mut rng).unwrap();
        let pk = sk.encryption_key();

        let a = BigNumber::from(1234u64);
        let b = BigNumber::from(5678u64);
        let (ca, _) = pk.encrypt(&mut rng, &a).unwrap();
        let (cb, _) = pk.encrypt(&mut rng, &b).unwrap();

        let sum = pk.add(&ca, &cb).unwrap();
        assert_eq!(sk.decrypt(&sum).unwrap(), &a + &b);

        let three = BigNumber::from(3u64);
        let scaled = pk.mul(&ca, &three).unwrap();
        assert_eq!(sk.decrypt(&scaled).unwrap(), &a * &three);
    }

    #[test]
    fn malformed_ciphertexts_are_rejected() {
        let mut rng = get_test_rng();
        let sk = DecryptionKey::generate(&mut rng).unwrap();
        let pk = sk.encryption_key();

        let zero = Ciphertext(BigNumber::zero());
        let huge = Ciphertext(pk.nn().clone());
        let (good, _) = pk.encrypt(&mut rng, &BigNumber::one()).unwrap();
        assert!(pk.add(&zero, &good).is_err());
        assert!(pk.add(&good, &huge).is_err());
        assert!(pk.mul(&good, &(BigNumber::zero() - BigNumber::one())).is_err());
    }
}
