use percent_encoding::percent_decode_str;

/// Canonicalize a string for matching: lower-case, attempt URL percent
/// decoding, then flatten accented Latin characters to their base letter.
///
/// Decoding failures (bad escapes, non-UTF-8 payloads) fall back to the raw
/// lower-cased string, so this never fails. Idempotent.
pub fn normalize(input: &str) -> String {
    let lowered = input.to_lowercase();
    let decoded = match percent_decode_str(&lowered).decode_utf8() {
        Ok(text) => text.into_owned(),
        Err(_) => lowered,
    };
    decoded.chars().map(flatten_char).collect()
}

fn flatten_char(c: char) -> char {
    match c {
        '\u{e0}'..='\u{e6}' => 'a',
        '\u{e8}'..='\u{eb}' => 'e',
        '\u{ec}'..='\u{ef}' => 'i',
        '\u{f2}'..='\u{f6}' => 'o',
        '\u{f9}'..='\u{fc}' => 'u',
        '\u{f1}' => 'n',
        _ => c,
    }
}

/// Inverse-direction helper for highlighting: turns a flattened string into
/// a regex character-class pattern matching any accented variant of each
/// vowel (and n). `expand("cafe")` matches "café" as well as "cafe".
pub fn expand(input: &str) -> String {
    let mut pattern = String::with_capacity(input.len());
    for c in input.to_lowercase().chars() {
        match c {
            'a' => pattern.push_str("[a\u{e0}\u{e1}\u{e2}\u{e3}\u{e4}\u{e5}\u{e6}]"),
            'e' => pattern.push_str("[e\u{e8}\u{e9}\u{ea}\u{eb}]"),
            'i' => pattern.push_str("[i\u{ec}\u{ed}\u{ee}\u{ef}]"),
            'o' => pattern.push_str("[o\u{f2}\u{f3}\u{f4}\u{f5}\u{f6}]"),
            'u' => pattern.push_str("[u\u{f9}\u{fa}\u{fb}\u{fc}]"),
            'n' => pattern.push_str("[n\u{f1}]"),
            _ => pattern.push(c),
        }
    }
    pattern
}
