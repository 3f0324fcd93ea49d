use regex::Regex;
use std::sync::OnceLock;

fn enumeration_prefix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[\d.、\s]+").expect("enumeration regex"))
}

fn title_label() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^(?:\*\*)?(?:title|标题)(?:\*\*)?\s*[:：]\s*").expect("title label regex")
    })
}

fn parenthetical() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[(（].*[)）]").expect("parenthetical regex"))
}

/// Strips enumeration prefixes ("1. "), an inline `Title:` label, bold
/// markers and parenthetical remarks from a raw title line.
pub fn clean_title(raw: &str) -> String {
    let s = raw.trim();
    let s = enumeration_prefix().replace(s, "");
    let s = title_label().replace(&s, "");
    let s = enumeration_prefix().replace(&s, "");
    let s = parenthetical().replace(&s, "");
    s.trim().trim_matches('*').trim().to_string()
}

/// Synthetic title for the `n`-th (1-based) task of a strategy run.
pub fn fallback_title(n: usize) -> String {
    format!("Poster {n}")
}

/// `clean_title`, or the synthetic label when nothing is left.
pub fn title_or_fallback(raw: &str, n: usize) -> String {
    let cleaned = clean_title(raw);
    if cleaned.is_empty() {
        fallback_title(n)
    } else {
        cleaned
    }
}
