/// Escapes text for an OOXML `<t>` element.
///
/// - XML metacharacters use entity references
/// - carriage returns become `&#xD;` so readers do not fold them into `\n`
/// - other control characters and the noncharacters U+FFFE/U+FFFF use the
///   `_xHHHH_` form
/// - a literal `_xHHHH_` in the input gets its underscore escaped as `_x005F_`
pub fn escape_cell_text(text: &str) -> String {
    let mut encoded = String::with_capacity(text.len());
    let bytes = text.as_bytes();

    for (index, ch) in text.char_indices() {
        match ch {
            '_' if is_escape_sequence(&bytes[index..]) => encoded.push_str("_x005F_"),
            '\t' | '\n' | '\r' => encoded.push(ch),
            c if (c as u32) < 0x20 || matches!(c, '\u{7F}' | '\u{FFFE}' | '\u{FFFF}') => {
                encoded.push_str(&format!("_x{:04X}_", c as u32));
            }
            c => encoded.push(c),
        }
    }

    quick_xml::escape::escape(encoded.as_str()).replace('\r', "&#xD;")
}

/// True when `bytes` starts with `_xHHHH_`.
fn is_escape_sequence(bytes: &[u8]) -> bool {
    bytes.len() >= 7
        && bytes[0] == b'_'
        && bytes[1] == b'x'
        && bytes[2..6].iter().all(u8::is_ascii_hexdigit)
        && bytes[6] == b'_'
}

/// Spreadsheet column letters for a zero-based index (`0 -> A`, `26 -> AA`).
pub fn column_name(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    letters.reverse();
    String::from_utf8_lossy(&letters).into_owned()
}
