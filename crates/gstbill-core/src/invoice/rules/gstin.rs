//! GSTIN (GST Identification Number) validation and formatting.

const CHARSET: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Strip spaces/dashes and upper-case a GSTIN.
pub fn format_gstin(gstin: &str) -> String {
    gstin
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Two-digit state code of a well-formed GSTIN.
pub fn state_code(gstin: &str) -> Option<u8> {
    let normalized = format_gstin(gstin);
    if normalized.len() != 15 {
        return None;
    }
    normalized[0..2].parse().ok()
}

/// Validate a GSTIN: layout plus the mod-36 check character.
///
/// Layout: 2-digit state code, 10-character PAN (5 letters, 4 digits,
/// 1 letter), entity code, literal `Z`, check character.
pub fn validate_gstin(gstin: &str) -> bool {
    let normalized = format_gstin(gstin);
    let bytes = normalized.as_bytes();

    if bytes.len() != 15 {
        return false;
    }

    match state_code(&normalized) {
        Some(1..=38) | Some(97) | Some(99) => {}
        _ => return false,
    }

    let pan = &bytes[2..12];
    let pan_ok = pan[0..5].iter().all(u8::is_ascii_uppercase)
        && pan[5..9].iter().all(u8::is_ascii_digit)
        && pan[9].is_ascii_uppercase();
    if !pan_ok {
        return false;
    }

    if bytes[12] == b'0' || bytes[13] != b'Z' {
        return false;
    }

    check_character(&bytes[..14]) == Some(bytes[14])
}

fn check_character(body: &[u8]) -> Option<u8> {
    let mut sum = 0u32;
    for (i, c) in body.iter().enumerate() {
        let value = CHARSET.iter().position(|x| x == c)? as u32;
        let factor = if i % 2 == 0 { 1 } else { 2 };
        let product = value * factor;
        sum += product / 36 + product % 36;
    }
    let check = (36 - sum % 36) % 36;
    Some(CHARSET[check as usize])
}
