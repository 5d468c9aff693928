//! Login challenge response
//!
//! Older devices answer the first `/login` with a hex nonce in `=ret`. The
//! client proves knowledge of the password with
//! `00 ++ hex(md5(0x00 ++ password ++ nonce))`.

use md5::{Digest, Md5};

use crate::error::Result;

/// Reply attribute carrying the challenge nonce
pub const CHALLENGE_KEY: &str = "=ret";

/// Compute the `=response` value for a hex-encoded challenge
pub fn challenge_response(password: &str, challenge_hex: &str) -> Result<String> {
    let nonce = hex::decode(challenge_hex)?;

    let mut hasher = Md5::new();
    hasher.update([0u8]);
    hasher.update(password.as_bytes());
    hasher.update(&nonce);
    let digest = hasher.finalize();

    Ok(format!("00{}", hex::encode(digest)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;

    #[test]
    fn test_known_response() {
        let response =
            challenge_response("secret", "0123456789abcdef0123456789abcdef").unwrap();
        assert_eq!(response, "00ebbe7c3df6b3d902bfd1f355c6e63289");
    }

    #[test]
    fn test_empty_password_and_nonce() {
        assert_eq!(
            challenge_response("", "").unwrap(),
            "0093b885adfe0da089cdf634904fd59f71"
        );
    }

    #[test]
    fn test_invalid_hex_rejected() {
        assert!(matches!(
            challenge_response("secret", "not-hex"),
            Err(ApiError::Challenge(_))
        ));
    }
}
