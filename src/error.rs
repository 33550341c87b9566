// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

/// Typed failures surfaced by the analytics engines. Per-record problems are
/// logged and skipped instead; only structural conditions end up here.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The supplied batch had no usable transactions. Distinct from an
    /// analysis whose totals happen to be zero.
    #[error("no transactions to analyze")]
    EmptyBatch,

    #[error("invalid loan terms: {0}")]
    InvalidLoanTerms(String),
}
