//! Content fingerprints of message lists.
//!
//! Change detection hashes the ordered message set instead of counting it, so
//! two different lists of equal length are told apart.

use ring::digest::{Context, SHA256};

use crate::types::Message;

/// SHA-256 over an ordered message list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MessageFingerprint(String);

impl MessageFingerprint {
    /// Computes the fingerprint of `messages`.
    ///
    /// Every field is length-prefixed so adjacent fields cannot run together.
    pub fn of(messages: &[Message]) -> Self {
        let mut context = Context::new(&SHA256);
        context.update(&(messages.len() as u64).to_be_bytes());
        for message in messages {
            for field in [message.sender.as_bytes(), message.text.as_bytes()] {
                context.update(&(field.len() as u64).to_be_bytes());
                context.update(field);
            }
            context.update(&message.timestamp.to_be_bytes());
            context.update(&[message.proof_present as u8]);
        }
        MessageFingerprint(hex::encode(context.finish().as_ref()))
    }

    /// Hex form of the digest.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
