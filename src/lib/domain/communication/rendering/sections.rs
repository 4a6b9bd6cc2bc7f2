//! Decomposition of an email body into greeting, lead paragraph, body sections and
//! signature.

use lazy_static::lazy_static;
use regex::Regex;

use super::EmailDraft;

lazy_static! {
    static ref LABEL_REGEX: Regex =
        Regex::new(r"(?i)(GREETING|LEAD_PARAGRAPH|BODY_SECTION_\d+|SIGNATURE):").unwrap();
}

/// Lead paragraph used when the body doesn't provide one
pub const DEFAULT_LEAD_PARAGRAPH: &str = "I hope this message finds you well.";

/// How a body is laid out
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContentStyle {
    /// Uppercase section labels such as `GREETING:` and `SIGNATURE:`
    Tagged,

    /// Paragraphs separated by blank lines
    Freeform,
}

impl ContentStyle {
    /// A body is tagged if it contains both the `GREETING:` and `SIGNATURE:` labels.
    pub fn detect(body: &str) -> Self {
        if body.contains("GREETING:") && body.contains("SIGNATURE:") {
            Self::Tagged
        } else {
            Self::Freeform
        }
    }
}

/// The four parts of an email body.
///
/// Every part is populated: anything missing from the source is replaced with a
/// fallback, so parsing never fails.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedSections {
    /// Opening line, e.g. "Hi Sam,"
    pub greeting: String,

    /// First paragraph after the greeting
    pub lead_paragraph: String,

    /// Remaining paragraphs in document order, possibly empty
    pub body_sections: Vec<String>,

    /// Closing lines
    pub signature: String,
}

impl ParsedSections {
    /// Parses a body in either [`ContentStyle`].
    ///
    /// # Arguments
    /// * `body` - The text to decompose.
    /// * `recipient_name` - Used by the fallback greeting.
    /// * `sender_name` - Used by the fallback signature.
    pub fn parse(body: &str, recipient_name: &str, sender_name: &str) -> Self {
        let extracted = match ContentStyle::detect(body) {
            ContentStyle::Tagged => extract_tagged(body),
            ContentStyle::Freeform => extract_freeform(body),
        };

        Self {
            greeting: extracted
                .greeting
                .unwrap_or_else(|| format!("Hi {recipient_name},")),
            lead_paragraph: extracted
                .lead_paragraph
                .unwrap_or_else(|| DEFAULT_LEAD_PARAGRAPH.to_string()),
            body_sections: extracted.body_sections,
            signature: extracted
                .signature
                .unwrap_or_else(|| format!("Best regards,\n{sender_name}")),
        }
    }

    /// Parses the body of a draft.
    pub fn from_draft(draft: &EmailDraft) -> Self {
        Self::parse(&draft.body, &draft.recipient_name, &draft.sender_name)
    }
}

#[derive(Debug, Default)]
struct Extracted {
    greeting: Option<String>,
    lead_paragraph: Option<String>,
    body_sections: Vec<String>,
    signature: Option<String>,
}

#[derive(Debug, PartialEq, Eq)]
enum Label {
    Greeting,
    LeadParagraph,
    BodySection,
    Signature,
}

impl Label {
    fn from_match(raw: &str) -> Self {
        let name = raw.trim_end_matches(':');

        if name.eq_ignore_ascii_case("GREETING") {
            Self::Greeting
        } else if name.eq_ignore_ascii_case("LEAD_PARAGRAPH") {
            Self::LeadParagraph
        } else if name.eq_ignore_ascii_case("SIGNATURE") {
            Self::Signature
        } else {
            Self::BodySection
        }
    }
}

fn non_empty(text: &str) -> Option<String> {
    let trimmed = text.trim();

    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Each label's content runs until the next recognised label or the end of the body.
fn extract_tagged(body: &str) -> Extracted {
    let labels: Vec<_> = LABEL_REGEX.find_iter(body).collect();
    let mut extracted = Extracted::default();

    for (index, label) in labels.iter().enumerate() {
        let end = labels
            .get(index + 1)
            .map_or(body.len(), |next| next.start());
        let content = &body[label.end()..end];

        match Label::from_match(label.as_str()) {
            Label::Greeting => {
                extracted.greeting = extracted.greeting.or_else(|| non_empty(content));
            }
            Label::LeadParagraph => {
                extracted.lead_paragraph = extracted.lead_paragraph.or_else(|| non_empty(content));
            }
            Label::BodySection => extracted.body_sections.extend(non_empty(content)),
            Label::Signature => {
                extracted.signature = extracted.signature.or_else(|| non_empty(content));
            }
        }
    }

    extracted
}

/// First paragraph is the greeting, second the lead, last the signature and everything
/// from the third up to the last the body. Short bodies reuse paragraphs across slots.
fn extract_freeform(body: &str) -> Extracted {
    let normalized = body.replace("\r\n", "\n");
    let paragraphs: Vec<&str> = normalized
        .split("\n\n")
        .map(str::trim)
        .filter(|paragraph| !paragraph.is_empty())
        .collect();

    let body_sections = paragraphs
        .get(2..paragraphs.len().saturating_sub(1))
        .unwrap_or_default();

    Extracted {
        greeting: paragraphs.first().map(|p| p.to_string()),
        lead_paragraph: paragraphs.get(1).map(|p| p.to_string()),
        body_sections: body_sections.iter().map(|p| p.to_string()).collect(),
        signature: paragraphs.last().map(|p| p.to_string()),
    }
}
