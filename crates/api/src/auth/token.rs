//! Opaque bearer-token generation.
//!
//! Tokens are not structured or signed: a user's token is issued once at
//! phone validation, stored on the user row, and checked by exact string
//! comparison on every privileged call. There is no expiry and no
//! revocation.

use rand::RngCore;

/// Number of random bytes per token; hex-encoded to 64 characters.
const TOKEN_BYTES: usize = 32;

/// Generate a cryptographically random opaque token.
pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
