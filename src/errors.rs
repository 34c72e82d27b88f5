// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

/// Domain failures that callers present as a rejected request rather than a
/// crash. They travel inside `anyhow::Error` and are recovered with
/// `downcast_ref::<LedgerError>()`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("grand total is zero, there is nothing to allocate")]
    ZeroTotal,

    #[error("no holdings recorded, nothing to snapshot")]
    NoHoldings,

    #[error("unknown category '{0}' (expected NASDAQ, SP, CONSERVATIVE or CASH)")]
    UnknownCategory(String),

    #[error("amount arithmetic overflowed while computing {0}")]
    Overflow(&'static str),
}

/// Returns the domain error carried by `err`, if any.
pub fn ledger_error(err: &anyhow::Error) -> Option<&LedgerError> {
    err.downcast_ref::<LedgerError>()
}
