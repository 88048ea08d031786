//! Sender signatures for outgoing messages.

/// Signature value accepted by the current service, which verifies
/// signatures on its side.
pub const STUB_SIGNATURE: &str = "sig_stub";

/// Produces the `sender_signature` field of a send request.
pub trait MessageSigner: Send + Sync {
    fn sign(&self, sender_identity_hash: &str, thread_id: &str, plaintext: &str) -> String;
}

/// Signer that always returns [`STUB_SIGNATURE`].
#[derive(Debug, Default, Clone, Copy)]
pub struct StubSigner;

impl MessageSigner for StubSigner {
    fn sign(&self, _sender_identity_hash: &str, _thread_id: &str, _plaintext: &str) -> String {
        STUB_SIGNATURE.to_string()
    }
}
