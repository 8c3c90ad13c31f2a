use sha2::{Digest, Sha256};

/// Idempotency key for one entry credit.
///
/// `key = sha256( 0x00 || len(payment_id)_u32_be || payment_id || user_id )`
///
/// The length prefix keeps `("ab", "c")` and `("a", "bc")` apart. Keys are a
/// fixed 32 bytes regardless of how long the payment or user ids are.
pub fn credit_key(payment_id: &str, user_id: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update([0x00]);
    hasher.update((payment_id.len() as u32).to_be_bytes());
    hasher.update(payment_id.as_bytes());
    hasher.update(user_id.as_bytes());
    hasher.finalize().into()
}

pub fn credit_key_hex(payment_id: &str, user_id: &str) -> String {
    hex::encode(credit_key(payment_id, user_id))
}
