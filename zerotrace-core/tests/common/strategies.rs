// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Proptest Strategies

use proptest::prelude::*;

/// Hex identity hashes of varying length.
pub fn identity_hash_strategy() -> impl Strategy<Value = String> {
    "[0-9a-f]{1,64}"
}

/// Two distinct identity hashes.
pub fn distinct_pair_strategy() -> impl Strategy<Value = (String, String)> {
    (identity_hash_strategy(), identity_hash_strategy()).prop_filter("distinct", |(a, b)| a != b)
}

/// Message previews, including empty ones.
pub fn preview_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 !?]{0,40}"
}

/// Two distinct millisecond timestamps.
pub fn distinct_timestamps_strategy() -> impl Strategy<Value = (u64, u64)> {
    (1u64..4_000_000_000_000, 1u64..4_000_000_000_000).prop_filter("distinct", |(a, b)| a != b)
}
