// Copyright (c) Facebook, Inc. and its affiliates.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Six-round threshold ECDSA signing.
//!
//! A qualified set of key-generation participants converts their
//! polynomial shares to additive shares and runs two MtA conversions per
//! pair, one for the nonce product `k·γ` and one for the nonce-times-key
//! product `k·x`. Revealing `δ = k·γ` lets everyone compute the ECDSA
//! `R` point without any party knowing `k`, after which signature shares
//! combine linearly. The protocol is not robust: any misbehavior aborts
//! the session, naming the offending cosigners.

mod round_five;
mod round_four;
mod round_one;
mod round_six;
mod round_three;
mod round_two;
mod signature;
mod signer;

pub use round_five::SignRound5Bcast;
pub use round_four::SignRound4Bcast;
pub use round_one::{SignRound1Bcast, SignRound1P2pSend};
pub use round_three::SignRound3Bcast;
pub use round_two::SignRound2P2pSend;
pub use signature::Signature;
pub use signer::{Signer, SigningKeys};
