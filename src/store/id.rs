//! Screenshot ids
//!
//! Eight bytes (four random, then the big-endian unix time in seconds)
//! base32 encoded without padding: 13 lowercase characters from `a-z2-7`.

/// Length of an encoded id
pub const ID_LEN: usize = 13;

const ALPHABET: &[u8; 32] = b"abcdefghijklmnopqrstuvwxyz234567";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
    #[error("image id must be {ID_LEN} characters, got {0}")]
    Length(usize),
    #[error("image id contains invalid character {0:?}")]
    Character(char),
}

/// Generate a fresh id
pub fn make_id() -> String {
    let seconds = chrono::Utc::now().timestamp() as u32;
    id_from_parts(rand::random::<[u8; 4]>(), seconds)
}

/// Encode the random prefix and timestamp into an id
pub fn id_from_parts(random: [u8; 4], seconds: u32) -> String {
    let mut bytes = [0u8; 8];
    bytes[..4].copy_from_slice(&random);
    bytes[4..].copy_from_slice(&seconds.to_be_bytes());
    base32_lower(&bytes)
}

/// Check that `id` has the shape produced by [`make_id`]
pub fn validate_id(id: &str) -> Result<(), IdError> {
    if let Some(c) = id.chars().find(|c| !c.is_ascii() || !ALPHABET.contains(&(*c as u8))) {
        return Err(IdError::Character(c));
    }
    if id.len() != ID_LEN {
        return Err(IdError::Length(id.len()));
    }
    Ok(())
}

/// RFC 4648 base32, lowercase, padding stripped
fn base32_lower(bytes: &[u8]) -> String {
    let mut out = String::with_capacity((bytes.len() * 8).div_ceil(5));
    let mut buffer = 0u16;
    let mut bits = 0;
    for &byte in bytes {
        buffer = (buffer << 8) | u16::from(byte);
        bits += 8;
        while bits >= 5 {
            bits -= 5;
            out.push(ALPHABET[usize::from((buffer >> bits) & 0x1f)] as char);
        }
    }
    if bits > 0 {
        out.push(ALPHABET[usize::from((buffer << (5 - bits)) & 0x1f)] as char);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base32_vectors() {
        // RFC 4648 test vectors, lowercased and unpadded
        assert_eq!(base32_lower(b""), "");
        assert_eq!(base32_lower(b"f"), "my");
        assert_eq!(base32_lower(b"fo"), "mzxq");
        assert_eq!(base32_lower(b"foo"), "mzxw6");
        assert_eq!(base32_lower(b"foob"), "mzxw6yq");
        assert_eq!(base32_lower(b"fooba"), "mzxw6ytb");
        assert_eq!(base32_lower(b"foobar"), "mzxw6ytboi");
    }

    #[test]
    fn test_id_layout() {
        assert_eq!(id_from_parts([0; 4], 0), "aaaaaaaaaaaaa");
        assert_eq!(id_from_parts([0xff; 4], u32::MAX), "7777777777776");
    }

    #[test]
    fn test_make_id_is_valid() {
        for _ in 0..20 {
            let id = make_id();
            assert_eq!(id.len(), ID_LEN);
            assert_eq!(validate_id(&id), Ok(()));
        }
        assert_ne!(make_id(), make_id());
    }

    #[test]
    fn test_validate_rejects() {
        assert_eq!(validate_id("abc"), Err(IdError::Length(3)));
        assert_eq!(validate_id("aaaaaaaaaaaa1"), Err(IdError::Character('1')));
        assert_eq!(validate_id("AAAAAAAAAAAAA"), Err(IdError::Character('A')));
        assert_eq!(validate_id("../aaaaaaaaaa"), Err(IdError::Character('.')));
    }
}
