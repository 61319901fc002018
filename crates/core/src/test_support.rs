// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Proptest strategies shared with other crates' tests.

use proptest::prelude::*;

use crate::{Provider, SessionId};

/// Session ids that pass [`SessionId::validate`].
pub fn arb_session_id() -> impl Strategy<Value = SessionId> {
    "[A-Za-z0-9_-]{1,64}".prop_map(SessionId::new)
}

/// Any supported provider.
pub fn arb_provider() -> impl Strategy<Value = Provider> {
    proptest::sample::select(Provider::ALL.to_vec())
}

/// Command names and printable arguments.
pub fn arb_argv() -> impl Strategy<Value = (String, Vec<String>)> {
    ("[a-z][a-z0-9_-]{0,15}", proptest::collection::vec("[a-zA-Z0-9 ._/=-]{0,24}", 0..6))
}
