// Copyright (c) Facebook, Inc. and its affiliates.
// Modifications Copyright (c) 2022-2023 Bolt Labs Holdings, Inc
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

//! End-to-end runs of key generation and signing with honest and
//! misbehaving participants.

use crate::curve::CurveTag;
use crate::dkg::{
    DkgParticipant, DkgResult, DkgRound1Bcast, DkgRound2Bcast, DkgRound2P2pSend, DkgRound3Bcast,
};
use crate::errors::Error;
use crate::paillier::{DecryptionKey, EncryptionKey};
use crate::proof_params::ProofParams;
use crate::sign::{
    SignRound1Bcast, SignRound1P2pSend, SignRound2P2pSend, SignRound3Bcast, SignRound4Bcast,
    SignRound5Bcast, Signature, Signer, SigningKeys,
};
use crate::utils::testing::get_test_rng;
use crate::vss;
use sha2::{Digest, Sha256};
use std::collections::HashMap;

/// Run an honest key generation to completion, returning the frozen
/// participants and their results.
fn run_dkg(
    curve: CurveTag,
    threshold: usize,
    limit: usize,
) -> (Vec<DkgParticipant>, Vec<DkgResult>) {
    let mut rng = get_test_rng();
    let mut participants: Vec<DkgParticipant> = (1..=limit as u32)
        .map(|id| DkgParticipant::new(id, threshold, limit, curve).unwrap())
        .collect();

    let mut round1_bcasts: HashMap<u32, DkgRound1Bcast> = HashMap::new();
    for p in &mut participants {
        round1_bcasts.insert(p.id(), p.round1(&mut rng).unwrap());
    }

    let mut round2_bcasts: HashMap<u32, DkgRound2Bcast> = HashMap::new();
    let mut round2_p2p: HashMap<u32, HashMap<u32, DkgRound2P2pSend>> = HashMap::new();
    for p in &mut participants {
        let (bcast, p2p) = p.round2(&round1_bcasts).unwrap();
        round2_bcasts.insert(p.id(), bcast);
        round2_p2p.insert(p.id(), p2p);
    }

    let mut round3_bcasts: HashMap<u32, DkgRound3Bcast> = HashMap::new();
    for p in &mut participants {
        let me = p.id();
        let p2p_inbound: HashMap<u32, DkgRound2P2pSend> = round2_p2p
            .iter()
            .filter(|(&sender, _)| sender != me)
            .map(|(&sender, sends)| (sender, sends[&me].clone()))
            .collect();
        round3_bcasts.insert(me, p.round3(&round2_bcasts, &p2p_inbound).unwrap());
    }

    let mut results = Vec::new();
    for p in &mut participants {
        results.push(p.round4(&round3_bcasts).unwrap());
    }
    (participants, results)
}

/// Run an honest signing session among `signer_ids` over `digest`.
fn run_sign(
    curve: CurveTag,
    results: &[DkgResult],
    signer_ids: &[u32],
    digest: &[u8],
) -> Vec<Signature> {
    let mut rng = get_test_rng();
    let mut signers: Vec<Signer> = signer_ids
        .iter()
        .map(|&id| {
            Signer::from_dkg_result(curve, &results[(id - 1) as usize], signer_ids, digest)
                .unwrap()
        })
        .collect();

    let mut round1_bcasts: HashMap<u32, SignRound1Bcast> = HashMap::new();
    let mut round1_p2p: HashMap<u32, HashMap<u32, SignRound1P2pSend>> = HashMap::new();
    for s in &mut signers {
        let (bcast, p2p) = s.round1(&mut rng).unwrap();
        // Keys came from distributed generation, so the range proofs are
        // per-recipient.
        assert!(bcast.proof.is_none());
        round1_bcasts.insert(s.id(), bcast);
        round1_p2p.insert(s.id(), p2p.unwrap());
    }

    let mut round2_sends: HashMap<u32, HashMap<u32, SignRound2P2pSend>> = HashMap::new();
    for s in &mut signers {
        let me = s.id();
        let p2p_inbound: HashMap<u32, SignRound1P2pSend> = round1_p2p
            .iter()
            .filter(|(&sender, _)| sender != me)
            .map(|(&sender, sends)| (sender, sends[&me].clone()))
            .collect();
        let sends = s
            .round2(&mut rng, &round1_bcasts, Some(&p2p_inbound))
            .unwrap();
        round2_sends.insert(me, sends);
    }

    let mut round3_bcasts: HashMap<u32, SignRound3Bcast> = HashMap::new();
    for s in &mut signers {
        let me = s.id();
        let p2p_inbound: HashMap<u32, SignRound2P2pSend> = round2_sends
            .iter()
            .filter(|(&sender, _)| sender != me)
            .map(|(&sender, sends)| (sender, sends[&me].clone()))
            .collect();
        round3_bcasts.insert(me, s.round3(&p2p_inbound).unwrap());
    }

    let mut round4_bcasts: HashMap<u32, SignRound4Bcast> = HashMap::new();
    for s in &mut signers {
        round4_bcasts.insert(s.id(), s.round4(&mut rng, &round3_bcasts).unwrap());
    }

    let mut round5_bcasts: HashMap<u32, SignRound5Bcast> = HashMap::new();
    for s in &mut signers {
        round5_bcasts.insert(s.id(), s.round5(&round4_bcasts).unwrap());
    }

    signers
        .iter_mut()
        .map(|s| s.round6(&round5_bcasts).unwrap())
        .collect()
}

#[test]
fn dkg_2_of_3_over_p256_agrees_on_the_key() {
    let curve = CurveTag::NistP256;
    let (_, results) = run_dkg(curve, 2, 3);

    let y = results[0].verification_key;
    assert!(!y.is_identity());
    for result in &results {
        assert_eq!(result.verification_key, y);
        assert_eq!(result.public_shares.len(), 3);
        assert_eq!(result.participant_data.len(), 3);
    }

    // Public share k belongs to participant k + 1 and commits to that
    // participant's secret share.
    for result in &results {
        let own = &result.shamir_share;
        assert_eq!(
            result.public_shares[(own.id - 1) as usize],
            curve.base_mul(&own.value).unwrap()
        );
    }

    // Any two of the three shares interpolate to the discrete log of y.
    let shares: Vec<_> = results.iter().map(|r| r.shamir_share.clone()).collect();
    for pair in [[0usize, 1], [0, 2], [1, 2]] {
        let subset = [shares[pair[0]].clone(), shares[pair[1]].clone()];
        let secret = vss::combine(curve, &subset).unwrap();
        assert_eq!(curve.base_mul(&secret).unwrap(), y);
    }
}

#[test]
fn sign_with_two_of_three_over_p256() {
    let curve = CurveTag::NistP256;
    let (_, results) = run_dkg(curve, 2, 3);
    let y = results[0].verification_key;

    let digest = Sha256::digest(b"abc");
    let signatures = run_sign(curve, &results, &[1, 2], &digest);

    assert_eq!(signatures[0], signatures[1]);
    for signature in &signatures {
        assert!(signature.is_low_s());
        signature.verify(&y, &digest).unwrap();
    }
    // Binding: the signature must not verify for another message.
    let other = Sha256::digest(b"abd");
    assert!(signatures[0].verify(&y, &other).is_err());
}

#[test]
fn end_to_end_over_secp256k1() {
    let curve = CurveTag::Secp256k1;
    let (_, results) = run_dkg(curve, 2, 2);
    let y = results[0].verification_key;

    let digest = Sha256::digest(b"end to end over secp256k1");
    let signatures = run_sign(curve, &results, &[1, 2], &digest);
    signatures[0].verify(&y, &digest).unwrap();
    assert_eq!(signatures[0], signatures[1]);
}

#[test]
fn a_bit_flipped_cdl_proof_blames_exactly_that_party() {
    let curve = CurveTag::NistP256;
    let mut rng = get_test_rng();
    let mut participants: Vec<DkgParticipant> = (1..=3u32)
        .map(|id| DkgParticipant::new(id, 2, 3, curve).unwrap())
        .collect();

    let mut round1_bcasts: HashMap<u32, DkgRound1Bcast> = HashMap::new();
    for p in &mut participants {
        round1_bcasts.insert(p.id(), p.round1(&mut rng).unwrap());
    }

    // Flip one bit inside party 2's forward proof.
    let tampered = {
        let mut bytes = bincode::serialize(&round1_bcasts[&2].proof1).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 1;
        bincode::deserialize(&bytes).unwrap()
    };
    round1_bcasts.get_mut(&2).unwrap().proof1 = tampered;

    for p in &mut participants {
        if p.id() == 2 {
            continue;
        }
        let err = p.round2(&round1_bcasts).unwrap_err();
        assert_eq!(err.fault_ids(), vec![2]);
        match &err {
            Error::Faults(faults) => {
                assert!(matches!(*faults[0].cause, Error::ProofFailure(_)));
            }
            other => panic!("expected aggregate fault, got {other:?}"),
        }
        // The round did not advance; the honest party still expects
        // round-two input.
        assert_eq!(
            p.round3(&HashMap::new(), &HashMap::new()).unwrap_err(),
            Error::InvalidRound {
                expected: 3,
                actual: 2
            }
        );
    }
}

#[test]
fn rounds_reject_out_of_order_and_miscounted_input() {
    let curve = CurveTag::NistP256;
    let mut rng = get_test_rng();
    let mut participants: Vec<DkgParticipant> = (1..=3u32)
        .map(|id| DkgParticipant::new(id, 2, 3, curve).unwrap())
        .collect();

    // Round-two input before round one has run.
    assert_eq!(
        participants[0].round2(&HashMap::new()).unwrap_err(),
        Error::InvalidRound {
            expected: 2,
            actual: 1
        }
    );

    let mut round1_bcasts: HashMap<u32, DkgRound1Bcast> = HashMap::new();
    for p in &mut participants {
        round1_bcasts.insert(p.id(), p.round1(&mut rng).unwrap());
    }

    // A missing peer message is an incorrect count, not a fault list.
    let mut missing = round1_bcasts.clone();
    missing.remove(&3);
    assert_eq!(
        participants[0].round2(&missing).unwrap_err(),
        Error::IncorrectCount {
            expected: 2,
            actual: 1
        }
    );
}

#[test]
fn dkg_message_envelopes_round_trip() {
    let curve = CurveTag::Secp256k1;
    let mut rng = get_test_rng();
    let mut participant = DkgParticipant::new(1, 2, 2, curve).unwrap();
    let bcast = participant.round1(&mut rng).unwrap();

    let bytes = bincode::serialize(&bcast).unwrap();
    let round: DkgRound1Bcast = bincode::deserialize(&bytes).unwrap();
    assert_eq!(bincode::serialize(&round).unwrap(), bytes);
    assert_eq!(round.public_key.n(), bcast.public_key.n());
    assert_eq!(round.proof_params, bcast.proof_params);
    assert_eq!(round.commitment, bcast.commitment);
}

#[test]
fn trusted_dealer_mode_signs_with_broadcast_proofs() {
    let curve = CurveTag::Secp256k1;
    let mut rng = get_test_rng();

    // A dealer splits the key and hands out one shared ring.
    let secret = curve.random_nonzero_scalar(&mut rng);
    let y = curve.base_mul(&secret).unwrap();
    let feldman = vss::Feldman::new(2, 3, curve).unwrap();
    let (shares, _) = feldman.split(&secret, &mut rng).unwrap();
    let public_shares: Vec<_> = shares
        .iter()
        .map(|s| curve.base_mul(&s.value).unwrap())
        .collect();

    let (dealer_params, _, _) = ProofParams::generate(curve, &mut rng).unwrap();
    let secret_keys: Vec<DecryptionKey> = (0..2)
        .map(|_| DecryptionKey::generate(&mut rng).unwrap())
        .collect();
    let public_keys: HashMap<u32, EncryptionKey> = [
        (1u32, secret_keys[0].encryption_key()),
        (2u32, secret_keys[1].encryption_key()),
    ]
    .into();
    let keys = SigningKeys::TrustedDealer {
        public_keys,
        proof_params: dealer_params,
    };

    let digest = Sha256::digest(b"dealer mode");
    let ids = [1u32, 2];
    let mut signers: Vec<Signer> = ids
        .iter()
        .enumerate()
        .map(|(index, &id)| {
            Signer::new(
                curve,
                &shares[(id - 1) as usize],
                secret_keys[index].clone(),
                keys.clone(),
                &y,
                &public_shares,
                &ids,
                &digest,
            )
            .unwrap()
        })
        .collect();

    // Round one: the range proof is broadcast and nothing goes
    // point-to-point.
    let mut round1_bcasts: HashMap<u32, SignRound1Bcast> = HashMap::new();
    for s in &mut signers {
        let (bcast, p2p) = s.round1(&mut rng).unwrap();
        assert!(bcast.proof.is_some());
        assert!(p2p.is_none());
        round1_bcasts.insert(s.id(), bcast);
    }

    let mut round2_sends: HashMap<u32, HashMap<u32, SignRound2P2pSend>> = HashMap::new();
    for s in &mut signers {
        round2_sends.insert(s.id(), s.round2(&mut rng, &round1_bcasts, None).unwrap());
    }
    let mut round3_bcasts: HashMap<u32, SignRound3Bcast> = HashMap::new();
    for s in &mut signers {
        let me = s.id();
        let inbound: HashMap<u32, SignRound2P2pSend> = round2_sends
            .iter()
            .filter(|(&sender, _)| sender != me)
            .map(|(&sender, sends)| (sender, sends[&me].clone()))
            .collect();
        round3_bcasts.insert(me, s.round3(&inbound).unwrap());
    }
    let mut round4_bcasts: HashMap<u32, SignRound4Bcast> = HashMap::new();
    for s in &mut signers {
        round4_bcasts.insert(s.id(), s.round4(&mut rng, &round3_bcasts).unwrap());
    }
    let mut round5_bcasts: HashMap<u32, SignRound5Bcast> = HashMap::new();
    for s in &mut signers {
        round5_bcasts.insert(s.id(), s.round5(&round4_bcasts).unwrap());
    }
    for s in &mut signers {
        let signature = s.round6(&round5_bcasts).unwrap();
        signature.verify(&y, &digest).unwrap();
    }
}

#[test]
fn signer_requires_a_qualified_set() {
    let curve = CurveTag::NistP256;
    let (_, results) = run_dkg(curve, 2, 3);
    let digest = Sha256::digest(b"abc");

    // The signing set must include the signer itself.
    assert!(Signer::from_dkg_result(curve, &results[0], &[2, 3], &digest).is_err());
    // Duplicates are rejected.
    assert!(Signer::from_dkg_result(curve, &results[0], &[1, 1], &digest).is_err());
    // A single signer is not a threshold.
    assert!(Signer::from_dkg_result(curve, &results[0], &[1], &digest).is_err());
    // An out-of-session id is rejected.
    assert!(Signer::from_dkg_result(curve, &results[0], &[1, 9], &digest).is_err());

    // A valid set enforces round order from the start.
    let mut signer = Signer::from_dkg_result(curve, &results[0], &[1, 2], &digest).unwrap();
    assert_eq!(
        signer.round3(&HashMap::new()).unwrap_err(),
        Error::InvalidRound {
            expected: 3,
            actual: 1
        }
    );
}
