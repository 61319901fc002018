// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Generic row store and the activity log written through it.

mod activity;
mod backup;
mod file;
mod memory;
mod query;
mod store;
mod wal;

pub use activity::{ActivityLog, ACTIVITY_TABLE};
pub use file::{FileStore, CHECKPOINT_EVERY};
pub use memory::MemoryStore;
pub use query::{Order, Query};
pub use store::{Row, Store, StoreError};
