//! Minimal multipart/form-data reader for the single upload field.

/// One file part of a multipart body.
#[derive(Debug, Clone, PartialEq)]
pub struct FilePart {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Returns the index of the first occurrence of `needle` in `haystack`.
pub fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Splits `haystack` on every occurrence of `needle`, returning the pieces
/// between occurrences (excluding the needle itself).
pub fn split_on<'a>(haystack: &'a [u8], needle: &[u8]) -> Vec<&'a [u8]> {
    let mut result = Vec::new();
    let mut start = 0;
    while start <= haystack.len() {
        if let Some(pos) = find_subsequence(&haystack[start..], needle) {
            result.push(&haystack[start..start + pos]);
            start += pos + needle.len();
        } else {
            result.push(&haystack[start..]);
            break;
        }
    }
    result
}

/// Extracts the boundary token from a Content-Type header value like
/// `multipart/form-data; boundary=----WebKitFormBoundaryXXX`.
pub fn extract_boundary(content_type: &str) -> Option<String> {
    content_type
        .split(';')
        .map(|s| s.trim())
        .find(|s| s.starts_with("boundary="))
        .map(|s| s["boundary=".len()..].trim_matches('"').to_owned())
        .filter(|b| !b.is_empty())
}

/// Extracts the file part whose `name="<field_name>"` matches, along with
/// its claimed filename. Parts without `filename=` are skipped.
pub fn extract_file_part(body: &[u8], boundary: &str, field_name: &str) -> Option<FilePart> {
    let delimiter = format!("--{}", boundary);
    let parts = split_on(body, delimiter.as_bytes());
    let sep = b"\r\n\r\n";

    for part in parts {
        let Some(sep_pos) = find_subsequence(part, sep) else { continue };
        let headers = String::from_utf8_lossy(&part[..sep_pos]);
        if parse_quoted(&headers, "name").as_deref() != Some(field_name) {
            continue;
        }
        let Some(filename) = parse_quoted(&headers, "filename") else { continue };

        let raw = &part[sep_pos + sep.len()..];
        let bytes = raw.strip_suffix(b"\r\n").unwrap_or(raw).to_vec();
        return Some(FilePart { filename, bytes });
    }
    None
}

/// Parses `key="..."` out of a Content-Disposition header, matching the key
/// exactly so `name` does not pick up `filename`.
fn parse_quoted(headers: &str, key: &str) -> Option<String> {
    let needle = format!("{}=\"", key);
    let mut search = 0;
    while let Some(found) = headers[search..].find(&needle) {
        let pos = search + found;
        let preceded_ok = pos == 0
            || matches!(headers.as_bytes()[pos - 1], b' ' | b';' | b'\t');
        let rest = &headers[pos + needle.len()..];
        if preceded_ok {
            let end = rest.find('"')?;
            return Some(rest[..end].to_owned());
        }
        search = pos + needle.len();
    }
    None
}
