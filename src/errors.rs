// Copyright (c) Facebook, Inc. and its affiliates.
// Modifications Copyright (c) 2022-2023 Bolt Labs Holdings, Inc
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

//! Error types produced during an execution of the protocol.

use thiserror::Error;

/// The default Result type used in this crate
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error encountered while running the distributed key
/// generation or signing protocols, or one of their building blocks.
#[derive(Clone, Eq, PartialEq, Error, Debug)]
pub enum Error {
    /// A required argument was absent or zero-valued.
    #[error("A required argument was missing or zero")]
    NilArgument,
    /// The number of messages supplied to a round does not match the
    /// expected participant count.
    #[error("Expected `{expected}` messages but got `{actual}`")]
    IncorrectCount { expected: usize, actual: usize },
    /// A round was invoked out of order.
    #[error("Protocol is at round `{actual}`, but round `{expected}` input was supplied")]
    InvalidRound { expected: u32, actual: u32 },
    /// A zero-knowledge proof, commitment opening, or share verification
    /// failed.
    #[error("Failed to verify proof: `{0}`")]
    ProofFailure(String),
    /// A value fell outside its required domain: an off-curve point, an
    /// identity public key, a modulus of the wrong size, a zero scalar.
    #[error("Value outside its required domain: `{0}`")]
    DomainFailure(String),
    /// Group elements from different curves were combined.
    #[error("Curve mismatch between operands")]
    CurveMismatch,
    #[error("Serialization error")]
    Serialization,
    #[error("Could not invert a BigNumber")]
    CouldNotInvertBigNumber,
    #[error("Could not invert a scalar")]
    CouldNotInvertScalar,
    #[error("Reached the maximum allowed number of retries")]
    RetryFailed,
    #[error("Paillier error: `{0}`")]
    PaillierError(#[from] crate::paillier::PaillierError),
    /// Some code assumption that was checked at runtime failed to be true.
    #[error("Internal invariant failed")]
    InternalInvariantFailed,
    /// One or more participants failed validation within a round. The
    /// faults appear in order of discovery; the round as a whole failed
    /// and must be restarted without the listed participants.
    #[error("Participants failed validation: {}", format_faults(.0))]
    Faults(Vec<Fault>),
}

/// A single participant's validation failure within a round.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Fault {
    /// The 1-based id of the participant that failed validation.
    pub id: u32,
    /// What the participant did wrong.
    pub cause: Box<Error>,
}

fn format_faults(faults: &[Fault]) -> String {
    faults
        .iter()
        .map(|f| format!("participant {}: {}", f.id, f.cause))
        .collect::<Vec<_>>()
        .join("; ")
}

impl Error {
    /// The ids of the participants blamed by this error, in order of
    /// discovery. Empty unless the error is an aggregate fault.
    pub fn fault_ids(&self) -> Vec<u32> {
        match self {
            Error::Faults(faults) => faults.iter().map(|f| f.id).collect(),
            _ => vec![],
        }
    }
}

/// Accumulates per-participant faults over the course of a round.
///
/// Checks within a round append here instead of returning early so that a
/// caller learns about every misbehaving participant at once.
#[derive(Debug, Default)]
pub(crate) struct FaultList {
    faults: Vec<Fault>,
}

impl FaultList {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(&mut self, id: u32, cause: Error) {
        self.faults.push(Fault {
            id,
            cause: Box::new(cause),
        });
    }

    /// Errors with the accumulated faults if any were recorded.
    pub(crate) fn into_result(self) -> Result<()> {
        if self.faults.is_empty() {
            Ok(())
        } else {
            Err(Error::Faults(self.faults))
        }
    }
}

macro_rules! serialize {
    ($x:expr) => {{
        bincode::serialize($x).or(Err(crate::errors::Error::Serialization))
    }};
}

macro_rules! verify_err {
    ($x:expr) => {{
        Err(crate::errors::Error::ProofFailure(String::from($x)))
    }};
}
