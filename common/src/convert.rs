// legacy string-to-bytes conversion: every UTF-16 code unit of the string
// is written as one 16-bit little-endian element
pub fn str_to_utf16_bytes(value: &str) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(value.len() * 2);
    for unit in value.encode_utf16() {
        bytes.extend_from_slice(&unit.to_le_bytes());
    }
    bytes
}

// reverse of `str_to_utf16_bytes`, a trailing odd byte is ignored
pub fn utf16_bytes_to_string(bytes: &[u8]) -> String {
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    String::from_utf16_lossy(&units)
}

// parse a single `Name: value` header line
pub fn parse_header_line(line: &str) -> Option<(String, String)> {
    let (name, value) = line.split_once(':')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }

    Some((name.to_string(), value.trim().to_string()))
}

// RFC 9110 token characters
fn is_header_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b))
}

// parse `Name: value; Other: value` into header pairs. A segment that does not
// open with `Name:` belongs to the previous value (`Accept: text/html; q=0.9`),
// a leading one with nothing to attach to is skipped.
pub fn parse_header_list(value: &str) -> Vec<(String, String)> {
    let mut headers: Vec<(String, String)> = Vec::new();
    for segment in value.split(';') {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }

        match segment.split_once(':') {
            Some((name, rest)) if is_header_name(name.trim_end()) => {
                headers.push((name.trim_end().to_string(), rest.trim().to_string()));
            }
            _ => {
                if let Some((_, previous)) = headers.last_mut() {
                    previous.push_str("; ");
                    previous.push_str(segment);
                }
            }
        }
    }
    headers
}
