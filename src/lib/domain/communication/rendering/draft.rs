//! Email draft

/// Role line used in the plain text footer when the draft doesn't specify one
pub const DEFAULT_SENDER_ROLE: &str = "Freelance Professional";

/// The subject, body and participants of an email before rendering.
///
/// Addresses are opaque here, they are only checked by the delivery layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmailDraft {
    /// The subject line
    pub subject: String,

    /// Free-form or section-tagged body text
    pub body: String,

    /// The recipient's name
    pub recipient_name: String,

    /// The recipient's email address
    pub recipient_email: String,

    /// The sender's name
    pub sender_name: String,

    /// The sender's email address
    pub sender_email: String,

    /// The brand the sender works under
    pub brand_name: Option<String>,

    /// The sender's role, shown in the plain text footer
    pub sender_role: Option<String>,
}

impl EmailDraft {
    /// The brand name, falling back to the sender's name.
    pub fn brand(&self) -> &str {
        self.brand_name
            .as_deref()
            .map(str::trim)
            .filter(|brand| !brand.is_empty())
            .unwrap_or(&self.sender_name)
    }

    /// The sender's role, falling back to [`DEFAULT_SENDER_ROLE`].
    pub fn role(&self) -> &str {
        self.sender_role
            .as_deref()
            .map(str::trim)
            .filter(|role| !role.is_empty())
            .unwrap_or(DEFAULT_SENDER_ROLE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(brand_name: Option<&str>, sender_role: Option<&str>) -> EmailDraft {
        EmailDraft {
            subject: "Hello".to_string(),
            body: "Body".to_string(),
            recipient_name: "Sam".to_string(),
            recipient_email: "sam@example.com".to_string(),
            sender_name: "Alex".to_string(),
            sender_email: "alex@example.com".to_string(),
            brand_name: brand_name.map(String::from),
            sender_role: sender_role.map(String::from),
        }
    }

    #[test]
    fn test_brand_falls_back_to_sender_name() {
        assert_eq!(draft(None, None).brand(), "Alex");
        assert_eq!(draft(Some("  "), None).brand(), "Alex");
        assert_eq!(draft(Some("Alex & Co"), None).brand(), "Alex & Co");
    }

    #[test]
    fn test_role_falls_back_to_default() {
        assert_eq!(draft(None, None).role(), DEFAULT_SENDER_ROLE);
        assert_eq!(draft(None, Some("Designer")).role(), "Designer");
    }
}
