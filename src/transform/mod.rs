//! Canned "AI" output: static lookup, first-sentence summary and dictionary translation.

mod summarizer;
mod translator;

pub use summarizer::{demo_urls, predefined, summarize, FALLBACK_CONTENT, SUMMARY_SUFFIX};
pub use translator::translate_to_urdu;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transformed {
    pub summary: String,
    pub urdu: String,
}

/// Produces the summary and translation for a submitted URL.
///
/// URLs with a predefined entry return it verbatim. Anything else is
/// summarized from `content` and the summary is translated.
pub fn transform(url: &str, content: &str) -> Transformed {
    if let Some((summary, urdu)) = predefined(url) {
        return Transformed {
            summary: summary.to_string(),
            urdu: urdu.to_string(),
        };
    }

    let summary = summarize(content);
    let urdu = translate_to_urdu(&summary);
    Transformed { summary, urdu }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predefined_url_skips_generic_path() {
        let result = transform("https://example.com/blog1", "Ignored content. Really.");
        assert_eq!(
            result.summary,
            "This blog explores how early rising boosts productivity through structure and focus. (AI Summary)"
        );
        assert_eq!(
            result.urdu,
            "یہ بلاگ بتاتا ہے کہ جلدی اٹھنا کس طرح نظم و ضبط اور توجہ کے ذریعے پیداواریت کو بڑھاتا ہے۔"
        );
    }

    #[test]
    fn generic_path_translates_the_summary() {
        let result = transform("https://blog.example.org/post", "This blog discusses stress. More text.");
        assert_eq!(result.summary, "This blog discusses stress. (AI Summary)");
        assert_eq!(result.urdu, "یہ بلاگ بیان کرتا ہے تناؤ (AI Summary)");
    }
}
