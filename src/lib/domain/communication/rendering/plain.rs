//! Plain text email emitter

use super::{EmailDraft, ParsedSections};

/// Line separating the signature from the footer
pub const SEPARATOR: &str = "---";

/// Renders the plain text version of an email.
///
/// The subject is underlined with `=`, followed by the notice if there is one. Each part
/// of the body follows as its own block, and a footer carries the brand, the sender's role
/// and their address.
pub fn render_plain(draft: &EmailDraft, sections: &ParsedSections, notice: Option<&str>) -> String {
    let subject = draft.subject.trim();
    let mut blocks: Vec<String> = Vec::with_capacity(sections.body_sections.len() + 6);

    blocks.push(format!(
        "{subject}\n{}",
        "=".repeat(subject.chars().count())
    ));

    if let Some(notice) = notice {
        blocks.push(notice.to_string());
    }

    blocks.push(sections.greeting.clone());
    blocks.push(sections.lead_paragraph.clone());
    blocks.extend(sections.body_sections.iter().cloned());
    blocks.push(sections.signature.clone());
    blocks.push(format!(
        "{SEPARATOR}\n{}\n{}\n{}",
        draft.brand(),
        draft.role(),
        draft.sender_email
    ));

    blocks.join("\n\n")
}
