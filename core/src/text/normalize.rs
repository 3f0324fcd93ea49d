/// Replaces literal `\r\n`, `\n` and `\t` escape sequences with the control
/// characters they spell.
///
/// Models frequently return JSON-escaped text inside plain responses, so the
/// two-character sequence `\` `n` shows up where a newline was meant. The scan
/// is a single left-to-right pass over non-overlapping sequences, which makes
/// the function idempotent.
pub fn normalize_escapes(text: &str) -> String {
    if !text.contains('\\') {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(pos) = rest.find('\\') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];

        if tail.starts_with("\\r\\n") {
            out.push_str("\r\n");
            rest = &tail[4..];
        } else if tail.starts_with("\\n") {
            out.push('\n');
            rest = &tail[2..];
        } else if tail.starts_with("\\t") {
            out.push('\t');
            rest = &tail[2..];
        } else {
            out.push('\\');
            rest = &tail[1..];
        }
    }

    out.push_str(rest);
    out
}
