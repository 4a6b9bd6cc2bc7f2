//! Email content rendering
//!
//! A draft body is decomposed into [`ParsedSections`], which both emitters consume: the
//! HTML emitter produces a table-based document with every style inlined, the plain text
//! emitter its markup-free equivalent. Variable substitution is independent of both and
//! is usually applied to a draft before it gets here.

mod draft;
mod errors;
mod html;
mod plain;
mod sections;
mod variables;

pub use draft::{EmailDraft, DEFAULT_SENDER_ROLE};
pub use errors::RenderError;
pub use html::{
    preheader, render_html, reply_href, strip_subject_tag, BrandedEmailTemplate, Theme,
    PREHEADER_MAX_CHARS,
};
pub use plain::{render_plain, SEPARATOR};
pub use sections::{ContentStyle, ParsedSections, DEFAULT_LEAD_PARAGRAPH};
pub use variables::{placeholders, substitute, TemplateVariables};

/// The final HTML and plain text bodies of an email
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedEmail {
    /// Complete, self-contained HTML document
    pub html: String,

    /// Plain text fallback
    pub text: String,
}

/// Parses the draft body and renders both versions of the email.
///
/// # Arguments
/// * `draft` - The [`EmailDraft`] to render.
/// * `notice` - An optional banner shown above the content, e.g. when delivery is redirected.
pub fn render_email(draft: &EmailDraft, notice: Option<&str>) -> Result<RenderedEmail, RenderError> {
    let sections = ParsedSections::from_draft(draft);

    render_sections(draft, &sections, notice)
}

/// Renders both versions of the email from already parsed sections.
pub fn render_sections(
    draft: &EmailDraft,
    sections: &ParsedSections,
    notice: Option<&str>,
) -> Result<RenderedEmail, RenderError> {
    Ok(RenderedEmail {
        html: render_html(draft, sections, notice)?,
        text: render_plain(draft, sections, notice),
    })
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn draft(body: &str) -> EmailDraft {
        EmailDraft {
            subject: "Project kickoff".to_string(),
            body: body.to_string(),
            recipient_name: "Sam".to_string(),
            recipient_email: "sam@example.com".to_string(),
            sender_name: "Alex Rivera".to_string(),
            sender_email: "alex@example.com".to_string(),
            brand_name: Some("Rivera Studio".to_string()),
            sender_role: None,
        }
    }

    #[test]
    fn test_render_email_produces_both_versions() -> TestResult {
        let rendered = render_email(
            &draft("GREETING: Hi Sam,\n\nLEAD_PARAGRAPH: Thanks for reaching out.\n\nBODY_SECTION_1: Here is the plan.\n\nSIGNATURE: Best,\nAlex"),
            None,
        )?;

        assert!(rendered.html.contains("Thanks for reaching out."));
        assert!(rendered.html.contains("Here is the plan."));
        assert!(rendered.text.contains("Thanks for reaching out."));
        assert!(rendered.text.contains("Best,\nAlex"));

        Ok(())
    }

    #[test]
    fn test_render_email_from_empty_body_uses_fallbacks() -> TestResult {
        let rendered = render_email(&draft(""), None)?;

        assert!(rendered.html.contains("Hi Sam,"));
        assert!(rendered.html.contains(DEFAULT_LEAD_PARAGRAPH));
        assert!(rendered.text.contains("Best regards,\nAlex Rivera"));

        Ok(())
    }

    #[test]
    fn test_render_email_with_notice() -> TestResult {
        let rendered = render_email(&draft("Hello,\n\nThanks!"), Some("Redirected for testing"))?;

        assert!(rendered.html.contains("Redirected for testing"));
        assert!(rendered
            .text
            .starts_with("Project kickoff\n===============\n\nRedirected for testing\n\n"));

        Ok(())
    }
}
