//! Commit id extraction from `git submodule status` output.

/// Length of a full SHA-1 hex digest.
pub const COMMIT_ID_LEN: usize = 40;

/// Returns the first run of at least 40 hex digits in `output`, truncated to
/// 40 and lowercased. Whatever precedes the run is ignored, so status markers
/// (`-` not initialized, `+` differs, `U` conflicts) and any other prefix
/// punctuation fall away.
pub fn extract_commit_id(output: &str) -> Option<String> {
    let bytes = output.as_bytes();
    let mut start = 0;
    while start < bytes.len() {
        if !bytes[start].is_ascii_hexdigit() {
            start += 1;
            continue;
        }
        let run = bytes[start..]
            .iter()
            .take_while(|b| b.is_ascii_hexdigit())
            .count();
        if run >= COMMIT_ID_LEN {
            return Some(output[start..start + COMMIT_ID_LEN].to_ascii_lowercase());
        }
        start += run;
    }
    None
}

/// True if `s` is exactly 40 lowercase hex digits.
pub fn is_commit_id(s: &str) -> bool {
    s.len() == COMMIT_ID_LEN
        && s.bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}
