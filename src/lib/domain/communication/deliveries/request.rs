//! Email requests and the drafts they compose into

use std::{fmt, str::FromStr};

use crate::domain::communication::{
    email_addresses::EmailAddress,
    rendering::{EmailDraft, ParsedSections, TemplateVariables},
};

use super::EmailRequestError;

const GREETING: &str = "Hi {{clientName}},";
const SIGNATURE: &str = "Best regards,\n{{freelancerName}}";

const WELCOME_SUBJECT: &str = "Welcome aboard, {{clientName}}!";
const WELCOME_LEAD: &str =
    "Welcome! I'm excited to start working with you and wanted to share how we'll get going.";
const WELCOME_SECTIONS: [&str; 2] = [
    "Over the next few days I'll send over everything we need to kick things off, along with a short questionnaire about your goals.",
    "If anything comes up in the meantime, just reply to this email and it will come straight to me.",
];

const ONBOARDING_SUBJECT: &str = "Getting started with {{brandName}}";
const ONBOARDING_LEAD: &str =
    "Thanks for choosing to work with me. Here's what happens next so we can hit the ground running.";
const ONBOARDING_INTRO: &str = "I've put together a short onboarding process covering your goals, timelines and the materials I'll need from you.";
const ONBOARDING_LINK: &str = "You can complete the onboarding steps here: {{onboardingUrl}}";
const ONBOARDING_OUTRO: &str =
    "Once that's done I'll review everything and follow up with next steps.";

const INVOICE_SUBJECT: &str = "Invoice {{invoiceNumber}} from {{brandName}}";
const INVOICE_LEAD: &str =
    "Thank you for your business. Here are the details of invoice {{invoiceNumber}}.";
const INVOICE_SUMMARY: &str = "Amount due: {{amount}}\nDue date: {{dueDate}}";
const INVOICE_PAYMENT_LINK: &str = "You can pay online here: {{paymentUrl}}";
const INVOICE_OUTRO: &str = "If you have any questions about this invoice, just reply to this email.";

const PARTICIPANT_FIELDS: [&str; 4] = [
    "clientEmail",
    "clientName",
    "freelancerName",
    "freelancerEmail",
];

/// The kinds of email that can be sent
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EmailKind {
    /// Onboarding instructions for a new client
    Onboarding,

    /// An invoice notification
    Invoice,

    /// A welcome message
    Welcome,

    /// A message written (or generated) by the freelancer
    Custom,
}

impl EmailKind {
    /// The wire name of the kind
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Onboarding => "onboarding",
            Self::Invoice => "invoice",
            Self::Welcome => "welcome",
            Self::Custom => "custom",
        }
    }

    /// Fields that must be present and non-blank, using their wire names.
    pub fn required_fields(&self) -> Vec<&'static str> {
        let extra: &[&'static str] = match self {
            Self::Onboarding | Self::Welcome => &[],
            Self::Invoice => &["invoiceNumber", "amount", "dueDate"],
            Self::Custom => &["subject", "content"],
        };

        PARTICIPANT_FIELDS.iter().chain(extra).copied().collect()
    }
}

impl FromStr for EmailKind {
    type Err = EmailRequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "onboarding" => Ok(Self::Onboarding),
            "invoice" => Ok(Self::Invoice),
            "welcome" => Ok(Self::Welcome),
            "custom" => Ok(Self::Custom),
            other => Err(EmailRequestError::UnsupportedType(other.to_string())),
        }
    }
}

impl fmt::Display for EmailKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Raw, unvalidated request fields
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EmailFields {
    /// The client's email address
    pub client_email: Option<String>,

    /// The client's name
    pub client_name: Option<String>,

    /// The freelancer's name
    pub freelancer_name: Option<String>,

    /// The freelancer's email address
    pub freelancer_email: Option<String>,

    /// The freelancer's role
    pub freelancer_role: Option<String>,

    /// The brand the freelancer works under
    pub brand_name: Option<String>,

    /// Subject of a custom email
    pub subject: Option<String>,

    /// Body of a custom email, or the lead paragraph of an onboarding email
    pub content: Option<String>,

    /// Link to the onboarding steps
    pub onboarding_url: Option<String>,

    /// The invoice number
    pub invoice_number: Option<String>,

    /// The formatted amount due
    pub amount: Option<String>,

    /// The formatted due date
    pub due_date: Option<String>,

    /// Link to pay the invoice online
    pub payment_url: Option<String>,
}

impl EmailFields {
    /// Returns the trimmed value of a field by its wire name, treating blanks as absent.
    pub fn get(&self, name: &str) -> Option<&str> {
        let value = match name {
            "clientEmail" => &self.client_email,
            "clientName" => &self.client_name,
            "freelancerName" => &self.freelancer_name,
            "freelancerEmail" => &self.freelancer_email,
            "freelancerRole" => &self.freelancer_role,
            "brandName" => &self.brand_name,
            "subject" => &self.subject,
            "content" => &self.content,
            "onboardingUrl" => &self.onboarding_url,
            "invoiceNumber" => &self.invoice_number,
            "amount" => &self.amount,
            "dueDate" => &self.due_date,
            "paymentUrl" => &self.payment_url,
            _ => return None,
        };

        value
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    fn owned(&self, name: &str) -> Option<String> {
        self.get(name).map(String::from)
    }

    fn required(&self, name: &str) -> String {
        self.owned(name).unwrap_or_default()
    }

    fn email_address(&self, field: &'static str) -> Result<EmailAddress, EmailRequestError> {
        EmailAddress::new(self.get(field).unwrap_or_default())
            .map_err(|source| EmailRequestError::InvalidEmailAddress { field, source })
    }
}

/// The client and freelancer an email is exchanged between
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Participants {
    /// The client's name
    pub client_name: String,

    /// The client's email address
    pub client_email: EmailAddress,

    /// The freelancer's name
    pub freelancer_name: String,

    /// The freelancer's email address
    pub freelancer_email: EmailAddress,

    /// The freelancer's role
    pub freelancer_role: Option<String>,

    /// The brand the freelancer works under
    pub brand_name: Option<String>,
}

impl Participants {
    /// The brand name, falling back to the freelancer's name.
    pub fn brand(&self) -> &str {
        self.brand_name.as_deref().unwrap_or(&self.freelancer_name)
    }

    fn variables(&self) -> TemplateVariables {
        TemplateVariables::new()
            .with("clientName", self.client_name.as_str())
            .with("clientEmail", self.client_email.to_string())
            .with("freelancerName", self.freelancer_name.as_str())
            .with("freelancerEmail", self.freelancer_email.to_string())
            .with("brandName", self.brand())
    }
}

/// A draft together with the sections it is rendered from
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComposedEmail {
    /// Subject, body and participants
    pub draft: EmailDraft,

    /// The decomposed body
    pub sections: ParsedSections,
}

/// A validated request to send an email
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EmailRequest {
    /// Onboarding instructions
    Onboarding {
        /// Client and freelancer
        participants: Participants,

        /// Link to the onboarding steps
        onboarding_url: Option<String>,

        /// Replaces the default lead paragraph
        message: Option<String>,
    },

    /// Invoice notification
    Invoice {
        /// Client and freelancer
        participants: Participants,

        /// The invoice number
        invoice_number: String,

        /// The formatted amount due
        amount: String,

        /// The formatted due date
        due_date: String,

        /// Link to pay online
        payment_url: Option<String>,
    },

    /// Welcome message
    Welcome {
        /// Client and freelancer
        participants: Participants,
    },

    /// Freelancer-authored message
    Custom {
        /// Client and freelancer
        participants: Participants,

        /// Subject, may contain `{{variables}}`
        subject: String,

        /// Body in either content style, may contain `{{variables}}`
        content: String,
    },
}

impl EmailRequest {
    /// Validates raw fields into a request.
    ///
    /// # Arguments
    /// * `kind` - The wire name of the email type.
    /// * `fields` - The remaining request fields.
    ///
    /// # Returns
    /// An [`EmailRequestError`] naming every missing field at once, or the first invalid
    /// email address.
    pub fn from_fields(kind: Option<&str>, fields: EmailFields) -> Result<Self, EmailRequestError> {
        let kind: EmailKind = kind
            .map(str::trim)
            .filter(|kind| !kind.is_empty())
            .ok_or_else(|| EmailRequestError::MissingFields(vec!["type"]))?
            .parse()?;

        let missing: Vec<&'static str> = kind
            .required_fields()
            .into_iter()
            .filter(|field| fields.get(field).is_none())
            .collect();

        if !missing.is_empty() {
            return Err(EmailRequestError::MissingFields(missing));
        }

        let participants = Participants {
            client_name: fields.required("clientName"),
            client_email: fields.email_address("clientEmail")?,
            freelancer_name: fields.required("freelancerName"),
            freelancer_email: fields.email_address("freelancerEmail")?,
            freelancer_role: fields.owned("freelancerRole"),
            brand_name: fields.owned("brandName"),
        };

        Ok(match kind {
            EmailKind::Onboarding => Self::Onboarding {
                participants,
                onboarding_url: fields.owned("onboardingUrl"),
                message: fields.owned("content"),
            },
            EmailKind::Invoice => Self::Invoice {
                participants,
                invoice_number: fields.required("invoiceNumber"),
                amount: fields.required("amount"),
                due_date: fields.required("dueDate"),
                payment_url: fields.owned("paymentUrl"),
            },
            EmailKind::Welcome => Self::Welcome { participants },
            EmailKind::Custom => Self::Custom {
                participants,
                subject: fields.required("subject"),
                content: fields.required("content"),
            },
        })
    }

    /// The kind of email requested
    pub fn kind(&self) -> EmailKind {
        match self {
            Self::Onboarding { .. } => EmailKind::Onboarding,
            Self::Invoice { .. } => EmailKind::Invoice,
            Self::Welcome { .. } => EmailKind::Welcome,
            Self::Custom { .. } => EmailKind::Custom,
        }
    }

    /// The client and freelancer
    pub fn participants(&self) -> &Participants {
        match self {
            Self::Onboarding { participants, .. }
            | Self::Invoice { participants, .. }
            | Self::Welcome { participants }
            | Self::Custom { participants, .. } => participants,
        }
    }

    /// Variables available to the subject and body of this request.
    pub fn variables(&self) -> TemplateVariables {
        let mut variables = self.participants().variables();

        match self {
            Self::Onboarding { onboarding_url, .. } => {
                if let Some(url) = onboarding_url {
                    variables.insert("onboardingUrl", url.as_str());
                }
            }
            Self::Invoice {
                invoice_number,
                amount,
                due_date,
                payment_url,
                ..
            } => {
                variables
                    .insert("invoiceNumber", invoice_number.as_str())
                    .insert("amount", amount.as_str())
                    .insert("dueDate", due_date.as_str());

                if let Some(url) = payment_url {
                    variables.insert("paymentUrl", url.as_str());
                }
            }
            Self::Welcome { .. } | Self::Custom { .. } => {}
        }

        variables
    }

    /// Builds the draft for this request with every known variable substituted, along
    /// with the sections it will be rendered from.
    ///
    /// Built-in kinds assemble their sections directly, so values supplied by the caller
    /// are never scanned for section labels. Only `custom` content is parsed.
    pub fn compose(&self) -> ComposedEmail {
        let variables = self.variables();
        let participants = self.participants();

        let (subject, (body, sections)) = match self {
            Self::Onboarding {
                onboarding_url,
                message,
                ..
            } => {
                let mut sections = vec![ONBOARDING_INTRO];
                if onboarding_url.is_some() {
                    sections.push(ONBOARDING_LINK);
                }
                sections.push(ONBOARDING_OUTRO);

                let lead = message.as_deref().unwrap_or(ONBOARDING_LEAD);

                (ONBOARDING_SUBJECT, built_in(&variables, lead, &sections))
            }
            Self::Invoice { payment_url, .. } => {
                let mut sections = vec![INVOICE_SUMMARY];
                if payment_url.is_some() {
                    sections.push(INVOICE_PAYMENT_LINK);
                }
                sections.push(INVOICE_OUTRO);

                (INVOICE_SUBJECT, built_in(&variables, INVOICE_LEAD, &sections))
            }
            Self::Welcome { .. } => (
                WELCOME_SUBJECT,
                built_in(&variables, WELCOME_LEAD, &WELCOME_SECTIONS),
            ),
            Self::Custom {
                subject, content, ..
            } => {
                let body = variables.apply(content);
                let sections = ParsedSections::parse(
                    &body,
                    &participants.client_name,
                    &participants.freelancer_name,
                );

                (subject.as_str(), (body, sections))
            }
        };

        ComposedEmail {
            draft: EmailDraft {
                subject: variables.apply(subject),
                body,
                recipient_name: participants.client_name.clone(),
                recipient_email: participants.client_email.to_string(),
                sender_name: participants.freelancer_name.clone(),
                sender_email: participants.freelancer_email.to_string(),
                brand_name: participants.brand_name.clone(),
                sender_role: participants.freelancer_role.clone(),
            },
            sections,
        }
    }
}

/// Substitutes each part of a built-in email separately and joins them into a freeform
/// body for reference.
fn built_in(
    variables: &TemplateVariables,
    lead: &str,
    body_sections: &[&str],
) -> (String, ParsedSections) {
    let sections = ParsedSections {
        greeting: variables.apply(GREETING),
        lead_paragraph: variables.apply(lead),
        body_sections: body_sections
            .iter()
            .map(|section| variables.apply(section))
            .collect(),
        signature: variables.apply(SIGNATURE),
    };

    let body = [&sections.greeting, &sections.lead_paragraph]
        .into_iter()
        .chain(&sections.body_sections)
        .chain([&sections.signature])
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("\n\n");

    (body, sections)
}
