/// Marker appended to every generated summary.
pub const SUMMARY_SUFFIX: &str = ". (AI Summary)";

/// Sample text summarized when a blog's content could not be obtained.
pub const FALLBACK_CONTENT: &str = "
  Mindfulness has become a major focus in recent years.
  It helps people manage stress, increase focus, and improve emotional health.
";

struct PredefinedSummary {
    url: &'static str,
    summary: &'static str,
    urdu: &'static str,
}

const PREDEFINED: &[PredefinedSummary] = &[
    PredefinedSummary {
        url: "https://example.com/blog1",
        summary: "This blog explores how early rising boosts productivity through structure and focus. (AI Summary)",
        urdu: "یہ بلاگ بتاتا ہے کہ جلدی اٹھنا کس طرح نظم و ضبط اور توجہ کے ذریعے پیداواریت کو بڑھاتا ہے۔",
    },
    PredefinedSummary {
        url: "https://example.com/blog2",
        summary: "This blog discusses the impact of digital detox on mental clarity and overall well-being. (AI Summary)",
        urdu: "یہ بلاگ ڈیجیٹل ڈٹاکس کے ذہنی وضاحت اور مجموعی صحت پر اثرات پر روشنی ڈالتا ہے۔",
    },
];

/// URLs with a canned summary, in display order.
pub fn demo_urls() -> impl Iterator<Item = &'static str> {
    PREDEFINED.iter().map(|entry| entry.url)
}

/// Looks up the canned `(summary, urdu)` pair for a URL.
pub fn predefined(url: &str) -> Option<(&'static str, &'static str)> {
    let url = url.trim();
    PREDEFINED
        .iter()
        .find(|entry| entry.url == url)
        .map(|entry| (entry.summary, entry.urdu))
}

/// First-sentence summary: everything before the first `.`, trimmed, plus the suffix.
pub fn summarize(content: &str) -> String {
    let first_sentence = content.split('.').next().unwrap_or_default();
    format!("{}{}", first_sentence.trim(), SUMMARY_SUFFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn takes_text_before_first_period() {
        let summary = summarize("  Rust is fast. It is also safe. ");
        assert_eq!(summary, "Rust is fast. (AI Summary)");
    }

    #[test]
    fn whole_text_when_no_period() {
        assert_eq!(summarize("  no sentence end here "), "no sentence end here. (AI Summary)");
    }

    #[test]
    fn leading_period_yields_bare_suffix() {
        assert_eq!(summarize(".hidden"), ". (AI Summary)");
    }

    #[test]
    fn fallback_content_summary() {
        assert_eq!(
            summarize(FALLBACK_CONTENT),
            "Mindfulness has become a major focus in recent years. (AI Summary)"
        );
    }

    #[test]
    fn predefined_lookup_trims_url() {
        let (summary, _) = predefined("  https://example.com/blog1 ").unwrap();
        assert!(summary.starts_with("This blog explores how early rising"));
        assert!(predefined("https://example.com/blog3").is_none());
    }

    #[test]
    fn demo_urls_match_predefined_entries() {
        for url in demo_urls() {
            assert!(predefined(url).is_some());
        }
    }
}
