//! One-time code rules: input shape, backup-code hashing and TOTP checking.

use sha2::{Digest, Sha256};

use crate::domain::types::{CodeKind, TOTP_DIGITS, TOTP_SKEW_STEPS, TOTP_STEP_SECS};

/// `true` if `code` has the shape required for `kind`.
///
/// TOTP: exactly six ASCII digits. Backup: `XXXX-XXXX-XXXX`, uppercase
/// alphanumeric groups.
pub fn is_well_formed(kind: CodeKind, code: &str) -> bool {
    match kind {
        CodeKind::Totp => {
            code.len() == TOTP_DIGITS as usize && code.bytes().all(|b| b.is_ascii_digit())
        }
        CodeKind::Backup => {
            let groups: Vec<&str> = code.split('-').collect();
            groups.len() == 3
                && groups.iter().all(|g| {
                    g.len() == 4
                        && g
                            .bytes()
                            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
                })
        }
    }
}

/// Storage encoding of a backup code: lowercase hex SHA-256 of the code.
/// Generation and verification must both go through this.
pub fn hash_backup_code(code: &str) -> String {
    format!("{:x}", Sha256::digest(code.as_bytes()))
}

/// Decode a base32 secret, tolerating lowercase, spaces and padding.
fn decode_secret(secret: &str) -> Option<Vec<u8>> {
    let normalized: String = secret
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '=')
        .map(|c| c.to_ascii_uppercase())
        .collect();
    if normalized.is_empty() {
        return None;
    }
    base32::decode(base32::Alphabet::RFC4648 { padding: false }, &normalized)
}

/// Six-digit SHA-1 TOTP for the step containing `unix_secs`.
pub fn totp_at(secret: &str, unix_secs: u64) -> anyhow::Result<String> {
    let key = decode_secret(secret).ok_or_else(|| anyhow::anyhow!("invalid base32 TOTP secret"))?;
    Ok(totp_lite::totp_custom::<totp_lite::Sha1>(
        TOTP_STEP_SECS,
        TOTP_DIGITS,
        &key,
        unix_secs,
    ))
}

/// Check `code` against the current step and one step either side.
pub fn verify_totp(secret: &str, code: &str, unix_secs: u64) -> anyhow::Result<bool> {
    let key = decode_secret(secret).ok_or_else(|| anyhow::anyhow!("invalid base32 TOTP secret"))?;
    let step = TOTP_STEP_SECS as i64;
    let now = i64::try_from(unix_secs)?;
    for offset in -TOTP_SKEW_STEPS..=TOTP_SKEW_STEPS {
        let at = now + offset * step;
        if at < 0 {
            continue;
        }
        let expected =
            totp_lite::totp_custom::<totp_lite::Sha1>(TOTP_STEP_SECS, TOTP_DIGITS, &key, at as u64);
        if expected == code {
            return Ok(true);
        }
    }
    Ok(false)
}
