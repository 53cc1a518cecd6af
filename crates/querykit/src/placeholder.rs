//! Positional placeholder scanning.
//!
//! Statements are rendered with `?` placeholders. tokio-postgres expects
//! numbered `$n` placeholders, so the driver-facing client rewrites them at
//! hand-off, numbering strictly left to right. `?` inside single-quoted
//! literals or double-quoted identifiers is left alone.

/// Rewrite every `?` into `$1, $2, ...` in order of appearance.
pub fn to_numbered(sql: &str) -> String {
    let mut out = String::with_capacity(sql.len() + 8);
    let mut idx = 0usize;
    scan(sql, |segment| match segment {
        Segment::Text(s) => out.push_str(s),
        Segment::Placeholder => {
            idx += 1;
            out.push('$');
            out.push_str(&idx.to_string());
        }
    });
    out
}

/// Count `?` placeholders outside quoted text.
pub fn count(sql: &str) -> usize {
    let mut n = 0;
    scan(sql, |segment| {
        if matches!(segment, Segment::Placeholder) {
            n += 1;
        }
    });
    n
}

enum Segment<'a> {
    Text(&'a str),
    Placeholder,
}

fn scan<'a>(sql: &'a str, mut emit: impl FnMut(Segment<'a>)) {
    let bytes = sql.as_bytes();
    let mut start = 0;
    let mut quote: Option<u8> = None;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        match quote {
            Some(q) if b == q => {
                // Doubled quote is an escape.
                if bytes.get(i + 1) == Some(&q) {
                    i += 1;
                } else {
                    quote = None;
                }
            }
            Some(_) => {}
            None => match b {
                b'\'' | b'"' => quote = Some(b),
                b'?' => {
                    emit(Segment::Text(&sql[start..i]));
                    emit(Segment::Placeholder);
                    start = i + 1;
                }
                _ => {}
            },
        }
        i += 1;
    }
    emit(Segment::Text(&sql[start..]));
}
