// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Thread Addressing
//!
//! A two-party thread is addressed by a canonical identifier derived from both
//! identity hashes, so either party computes the same id.

/// Separator between the two identity hashes of a thread id.
pub const THREAD_ID_SEPARATOR: char = ':';

/// Derives the canonical thread id for a pair of identity hashes.
///
/// The two hashes are sorted lexicographically and joined with
/// [`THREAD_ID_SEPARATOR`], so `canonical_thread_id(a, b) == canonical_thread_id(b, a)`.
///
/// A self-addressed pair (`a == b`) still yields a well-formed id; callers
/// reject self connections before reaching this point.
///
/// # Example
/// ```
/// use zerotrace_core::canonical_thread_id;
///
/// assert_eq!(canonical_thread_id("bb22", "aa11"), "aa11:bb22");
/// assert_eq!(canonical_thread_id("aa11", "bb22"), "aa11:bb22");
/// ```
pub fn canonical_thread_id(hash_a: &str, hash_b: &str) -> String {
    let (low, high) = if hash_a <= hash_b {
        (hash_a, hash_b)
    } else {
        (hash_b, hash_a)
    };
    format!("{}{}{}", low, THREAD_ID_SEPARATOR, high)
}

/// Splits a thread id into its two identity hashes.
///
/// Returns `None` unless the id has exactly two non-empty halves.
pub fn thread_participants(thread_id: &str) -> Option<(&str, &str)> {
    let (first, second) = thread_id.split_once(THREAD_ID_SEPARATOR)?;
    if first.is_empty() || second.is_empty() || second.contains(THREAD_ID_SEPARATOR) {
        return None;
    }
    Some((first, second))
}

/// Returns the participant of `thread_id` that is not `own_hash`.
pub fn other_participant<'a>(thread_id: &'a str, own_hash: &str) -> Option<&'a str> {
    let (first, second) = thread_participants(thread_id)?;
    if first == own_hash {
        Some(second)
    } else if second == own_hash {
        Some(first)
    } else {
        None
    }
}

/// Re-derives the canonical form of an existing thread id.
///
/// Ids produced by [`canonical_thread_id`] map to themselves.
pub fn normalize_thread_id(thread_id: &str) -> Option<String> {
    let (first, second) = thread_participants(thread_id)?;
    Some(canonical_thread_id(first, second))
}

/// Shortens a hash for display: first 8 characters, `...`, last 6.
///
/// Hashes of 16 characters or fewer are returned unchanged.
pub fn short_hash(hash: &str) -> String {
    let chars: Vec<char> = hash.chars().collect();
    if chars.len() <= 16 {
        return hash.to_string();
    }
    let head: String = chars[..8].iter().collect();
    let tail: String = chars[chars.len() - 6..].iter().collect();
    format!("{}...{}", head, tail)
}
