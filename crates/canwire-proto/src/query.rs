//! Query-string escaping for header key/value fields.
//!
//! Status and metadata travel as `key=value&key=value` text. `%`, `&`, `=`
//! and bytes outside printable ASCII are `%XX`-escaped. Decoding is lenient:
//! a stray `%` without two hex digits passes through verbatim.

const HEX: &[u8; 16] = b"0123456789ABCDEF";

fn must_escape(b: u8) -> bool {
    matches!(b, b'%' | b'&' | b'=') || !(0x20..=0x7e).contains(&b)
}

/// Escape one component (a key or a value) into `out`.
pub fn escape_into(out: &mut String, component: &str) {
    for &b in component.as_bytes() {
        if must_escape(b) {
            out.push('%');
            out.push(HEX[(b >> 4) as usize] as char);
            out.push(HEX[(b & 0x0f) as usize] as char);
        } else {
            out.push(b as char);
        }
    }
}

/// Unescape one component. Invalid escapes are kept as literal text.
pub fn unescape(component: &[u8]) -> String {
    let mut out = Vec::with_capacity(component.len());
    let mut i = 0;
    while i < component.len() {
        let b = component[i];
        if b == b'%' && i + 2 < component.len() {
            let hi = (component[i + 1] as char).to_digit(16);
            let lo = (component[i + 2] as char).to_digit(16);
            if let (Some(hi), Some(lo)) = (hi, lo) {
                out.push((hi * 16 + lo) as u8);
                i += 3;
                continue;
            }
        }
        out.push(b);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// Encode `(key, value)` pairs as a query string.
pub fn encode_pairs<'a>(pairs: impl Iterator<Item = (&'a str, &'a str)>) -> String {
    let mut out = String::new();
    for (key, value) in pairs {
        if !out.is_empty() {
            out.push('&');
        }
        escape_into(&mut out, key);
        out.push('=');
        escape_into(&mut out, value);
    }
    out
}

/// Decode a query string into `(key, value)` pairs.
///
/// Pairs without `=` decode as a key with an empty value; empty segments
/// are skipped.
pub fn decode_pairs(data: &[u8]) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for segment in data.split(|&b| b == b'&') {
        if segment.is_empty() {
            continue;
        }
        match segment.iter().position(|&b| b == b'=') {
            Some(eq) => pairs.push((unescape(&segment[..eq]), unescape(&segment[eq + 1..]))),
            None => pairs.push((unescape(segment), String::new())),
        }
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_pairs_round_trip() {
        let encoded = encode_pairs([("a", "1"), ("b", "two")].into_iter());
        assert_eq!(encoded, "a=1&b=two");
        assert_eq!(
            decode_pairs(encoded.as_bytes()),
            vec![("a".into(), "1".into()), ("b".into(), "two".into())]
        );
    }

    #[test]
    fn reserved_and_binary_bytes_escape() {
        let encoded = encode_pairs([("k&y", "a=b%c\n")].into_iter());
        assert_eq!(encoded, "k%26y=a%3Db%25c%0A");
        assert_eq!(
            decode_pairs(encoded.as_bytes()),
            vec![("k&y".into(), "a=b%c\n".into())]
        );
    }

    #[test]
    fn empty_input_decodes_to_no_pairs() {
        assert!(decode_pairs(b"").is_empty());
    }

    #[test]
    fn stray_percent_passes_through() {
        assert_eq!(unescape(b"100%"), "100%");
        assert_eq!(unescape(b"%zz"), "%zz");
    }

    #[test]
    fn missing_value_decodes_empty() {
        assert_eq!(
            decode_pairs(b"flag&k=v"),
            vec![("flag".into(), String::new()), ("k".into(), "v".into())]
        );
    }
}
