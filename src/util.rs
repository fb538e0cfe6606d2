/// Check whether file content looks binary by probing the first 512 bytes
/// for a null byte.
pub fn is_binary(bytes: &[u8]) -> bool {
    let probe = &bytes[..bytes.len().min(512)];
    probe.contains(&0)
}

/// FNV-1a hash over raw bytes. Stable and deterministic across runs, used
/// for content hashes and cheap byte-identity checks.
pub fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf29ce484222325;
    for byte in bytes {
        hash ^= *byte as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}

/// Replace the contents of string and char literals with spaces so that
/// keywords and braces inside literals are not classified as code.
pub fn mask_strings(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut chars = line.chars();
    while let Some(ch) = chars.next() {
        if ch == '"' || ch == '\'' {
            out.push(ch);
            let quote = ch;
            while let Some(inner) = chars.next() {
                if inner == '\\' {
                    out.push(' ');
                    if chars.next().is_some() {
                        out.push(' ');
                    }
                } else if inner == quote {
                    out.push(quote);
                    break;
                } else {
                    out.push(' ');
                }
            }
        } else {
            out.push(ch);
        }
    }
    out
}

/// Extract the contents of double- and single-quoted string literals from a
/// line, in source order. Escaped quotes stay inside their literal;
/// unterminated literals run to the end of the line.
pub fn string_literals(line: &str) -> Vec<String> {
    let mut literals = Vec::new();
    let mut chars = line.chars();
    while let Some(ch) = chars.next() {
        if ch == '"' || ch == '\'' {
            let quote = ch;
            let mut lit = String::new();
            let mut escaped = false;
            for inner in chars.by_ref() {
                if escaped {
                    lit.push(inner);
                    escaped = false;
                } else if inner == '\\' {
                    escaped = true;
                } else if inner == quote {
                    break;
                } else {
                    lit.push(inner);
                }
            }
            literals.push(lit);
        }
    }
    literals
}
