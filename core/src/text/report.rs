use regex::Regex;
use std::sync::OnceLock;

fn report_header() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)#{1,6}[ \t]*(?:🛍\x{FE0F}?[ \t]*)?(?:产品分析报告|Product Analysis Report)")
            .expect("report header regex")
    })
}

/// Second-stage headings and horizontal rules close the report section.
fn section_boundary() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?im)(?:#{1,6}[ \t]*)?STEP[ \t]*2|第二步|^[ \t]*-{3,}[ \t\r]*$")
            .expect("section boundary regex")
    })
}

/// Returns the "product analysis report" section of a model response.
///
/// The span starts at the first recognised report header and runs up to the
/// next second-stage heading, horizontal rule, or end of input. Returns an
/// empty string when no header is present.
pub fn extract_report(text: &str) -> String {
    let Some(header) = report_header().find(text) else {
        return String::new();
    };

    let end = section_boundary()
        .find_at(text, header.end())
        .map(|m| m.start())
        .unwrap_or(text.len());

    text[header.start()..end].trim().to_string()
}
