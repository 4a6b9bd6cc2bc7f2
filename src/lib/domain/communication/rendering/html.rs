//! HTML email emitter
//!
//! Layout is built from nested tables with inline styles, which is what older clients
//! render reliably. The head `<style>` block is inlined onto elements and dropped before
//! the document is returned.

use askama::Template;
use lazy_static::lazy_static;
use regex::Regex;

use super::{EmailDraft, ParsedSections, RenderError};

lazy_static! {
    static ref SUBJECT_TAG_REGEX: Regex = Regex::new(r"^\s*\[[^\]]*\]\s*").unwrap();
}

/// Inbox preview snippets longer than this are cut off
pub const PREHEADER_MAX_CHARS: usize = 90;

/// Presentation constants shared by every rendered email
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Theme {
    /// Page background
    pub background: &'static str,

    /// Card background
    pub surface: &'static str,

    /// Brand header and call-to-action color
    pub primary: &'static str,

    /// Subject line color
    pub heading: &'static str,

    /// Body copy color
    pub text: &'static str,

    /// Footer color
    pub muted: &'static str,

    /// Test-mode banner background
    pub notice_background: &'static str,

    /// Test-mode banner text color
    pub notice_text: &'static str,

    /// CSS font-family value
    pub font_stack: &'static str,

    /// Width of the centered card, in pixels
    pub container_width: u32,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: "#f4f4f7",
            surface: "#ffffff",
            primary: "#4f46e5",
            heading: "#111827",
            text: "#374151",
            muted: "#6b7280",
            notice_background: "#fef3c7",
            notice_text: "#92400e",
            font_stack: "-apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Helvetica, Arial, sans-serif",
            container_width: 600,
        }
    }
}

/// Branded email template
#[derive(Debug, Template)]
#[template(path = "emails/branded_email.html")]
pub struct BrandedEmailTemplate {
    /// Colors, fonts and width
    pub theme: Theme,

    /// Hidden inbox preview text, built from the full subject
    pub preheader: String,

    /// Brand shown in the header and footer
    pub brand_name: String,

    /// Subject without its leading `[...]` tag
    pub display_subject: String,

    /// Opening line
    pub greeting: String,

    /// First paragraph
    pub lead_paragraph: String,

    /// Body sections, each split into lines
    pub body_sections: Vec<Vec<String>>,

    /// `mailto:` link of the call-to-action
    pub reply_href: String,

    /// Call-to-action label
    pub reply_label: String,

    /// Signature, split into lines
    pub signature: Vec<String>,

    /// Address shown in the footer
    pub sender_email: String,

    /// `mailto:` link of the footer
    pub contact_href: String,

    /// Optional banner above the content
    pub notice: Option<String>,
}

impl BrandedEmailTemplate {
    /// Creates a new `BrandedEmailTemplate`
    pub fn new(
        draft: &EmailDraft,
        sections: &ParsedSections,
        notice: Option<&str>,
        theme: Theme,
    ) -> Self {
        let display_subject = strip_subject_tag(&draft.subject).to_string();
        let brand_name = draft.brand().to_string();

        Self {
            theme,
            preheader: preheader(&draft.subject, &brand_name),
            brand_name,
            display_subject,
            greeting: sections.greeting.clone(),
            lead_paragraph: sections.lead_paragraph.clone(),
            body_sections: sections.body_sections.iter().map(|s| lines(s)).collect(),
            reply_href: reply_href(&draft.sender_email, &draft.subject),
            reply_label: format!("Reply to {}", draft.sender_name),
            signature: lines(&sections.signature),
            sender_email: draft.sender_email.clone(),
            contact_href: format!("mailto:{}", draft.sender_email),
            notice: notice.map(String::from),
        }
    }
}

/// Renders the complete HTML document with every style inlined.
pub fn render_html(
    draft: &EmailDraft,
    sections: &ParsedSections,
    notice: Option<&str>,
) -> Result<String, RenderError> {
    let template = BrandedEmailTemplate::new(draft, sections, notice, Theme::default());

    Ok(css_inline::inline(&template.render()?)?)
}

/// `"{subject} - Message from {brand}"`, cut to [`PREHEADER_MAX_CHARS`] characters.
pub fn preheader(subject: &str, brand_name: &str) -> String {
    format!("{subject} - Message from {brand_name}")
        .chars()
        .take(PREHEADER_MAX_CHARS)
        .collect()
}

/// Removes a leading bracketed tag such as `[Invoice]` from a subject.
///
/// A subject made only of a tag is returned unchanged.
pub fn strip_subject_tag(subject: &str) -> &str {
    match SUBJECT_TAG_REGEX.find(subject) {
        Some(tag) if tag.end() < subject.len() => subject[tag.end()..].trim_end(),
        _ => subject.trim(),
    }
}

/// A `mailto:` link back to the sender with a `Re:` subject.
pub fn reply_href(sender_email: &str, subject: &str) -> String {
    let subject = format!("Re: {}", strip_subject_tag(subject));

    format!("mailto:{sender_email}?subject={}", urlencoding::encode(&subject))
}

fn lines(text: &str) -> Vec<String> {
    text.lines().map(|line| line.trim_end().to_string()).collect()
}
