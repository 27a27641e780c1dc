/// Cuts `s` to at most `max` bytes on a char boundary and appends a note with the
/// number of bytes left out. `None` keeps the whole string.
pub fn preview_text(s: &str, max: Option<usize>) -> String {
    let Some(max) = max else {
        return s.to_string();
    };
    if s.len() <= max {
        return s.to_string();
    }
    let end = s
        .char_indices()
        .take_while(|(i, c)| i + c.len_utf8() <= max)
        .last()
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0);
    let mut out = s[..end].to_string();
    out.push_str(&format!("… ({} more bytes)", s.len() - end));
    out
}

/// Byte-level counterpart of [`preview_text`] for raw stream data. The cut is made
/// on the input bytes before lossy decoding, so the omitted count is in source bytes
/// even when the data is not UTF-8. A cut that would split a multi-byte sequence
/// backs off to its start.
pub fn preview_bytes(bytes: &[u8], max: Option<usize>) -> String {
    let Some(max) = max else {
        return String::from_utf8_lossy(bytes).into_owned();
    };
    if bytes.len() <= max {
        return String::from_utf8_lossy(bytes).into_owned();
    }
    let mut end = max;
    // at most three continuation bytes follow a lead byte
    while end > 0 && max - end < 3 && is_continuation(bytes[end]) {
        end -= 1;
    }
    if is_continuation(bytes[end]) {
        end = max;
    }
    let mut out = String::from_utf8_lossy(&bytes[..end]).into_owned();
    out.push_str(&format!("… ({} more bytes)", bytes.len() - end));
    out
}

fn is_continuation(b: u8) -> bool {
    b & 0xC0 == 0x80
}
