//! Email delivery contract consumed by event handlers.
//!
//! The transport itself is an external collaborator; this module only
//! defines the message shape and the service trait.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;

use crate::error::ValidationError;
use crate::value_object::is_well_formed_email;

/// External email/transport failure. Surfaced, never retried, by this core.
#[derive(Debug, Clone, Error)]
pub enum DeliveryError {
    /// The transport reported a failure.
    #[error("Email transport failure: {0}")]
    Transport(String),
}

/// A file attached to an outgoing email.
///
/// The referenced file must exist and be readable at construction time.
#[derive(Debug, Clone)]
pub struct EmailAttachment {
    path: PathBuf,
    name: Option<String>,
    content_type: Option<String>,
}

impl EmailAttachment {
    /// Validates the path and wraps it. `name` defaults to the file name,
    /// `content_type` is left to the transport to detect when absent.
    pub fn new(
        path: impl Into<PathBuf>,
        name: Option<String>,
        content_type: Option<String>,
    ) -> Result<Self, ValidationError> {
        let path = path.into();
        if std::fs::File::open(&path).is_err() {
            return Err(ValidationError::UnreadableAttachment {
                path: path.display().to_string(),
            });
        }
        Ok(Self {
            path,
            name,
            content_type,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The attachment name: the explicit one, or the file name on disk.
    pub fn name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .or_else(|| self.path.file_name().and_then(|n| n.to_str()))
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }
}

/// An outgoing email message.
///
/// Built through [`EmailMessage::builder`]; validation runs once at
/// `build()`.
#[derive(Debug, Clone)]
pub struct EmailMessage {
    to: Vec<String>,
    from: String,
    from_name: String,
    subject: String,
    body: String,
    cc: Vec<String>,
    bcc: Vec<String>,
    attachments: Vec<EmailAttachment>,
    is_html: bool,
}

impl EmailMessage {
    pub fn builder() -> EmailMessageBuilder {
        EmailMessageBuilder::default()
    }

    pub fn to(&self) -> &[String] {
        &self.to
    }

    pub fn from(&self) -> &str {
        &self.from
    }

    pub fn from_name(&self) -> &str {
        &self.from_name
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn cc(&self) -> &[String] {
        &self.cc
    }

    pub fn bcc(&self) -> &[String] {
        &self.bcc
    }

    pub fn attachments(&self) -> &[EmailAttachment] {
        &self.attachments
    }

    pub fn is_html(&self) -> bool {
        self.is_html
    }
}

/// Builder for [`EmailMessage`].
#[derive(Debug, Default)]
pub struct EmailMessageBuilder {
    to: Vec<String>,
    from: String,
    from_name: String,
    subject: String,
    body: String,
    cc: Vec<String>,
    bcc: Vec<String>,
    attachments: Vec<EmailAttachment>,
    is_html: bool,
}

impl EmailMessageBuilder {
    pub fn to(mut self, address: impl Into<String>) -> Self {
        self.to.push(address.into());
        self
    }

    pub fn from(mut self, address: impl Into<String>) -> Self {
        self.from = address.into();
        self
    }

    pub fn from_name(mut self, name: impl Into<String>) -> Self {
        self.from_name = name.into();
        self
    }

    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn cc(mut self, address: impl Into<String>) -> Self {
        self.cc.push(address.into());
        self
    }

    pub fn bcc(mut self, address: impl Into<String>) -> Self {
        self.bcc.push(address.into());
        self
    }

    pub fn attachment(mut self, attachment: EmailAttachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    pub fn html(mut self, is_html: bool) -> Self {
        self.is_html = is_html;
        self
    }

    /// Validates recipients and sender shape and builds the message.
    pub fn build(self) -> Result<EmailMessage, ValidationError> {
        if self.to.is_empty() {
            return Err(ValidationError::NoRecipients);
        }
        Self::check_addresses("to", &self.to)?;
        Self::check_addresses("cc", &self.cc)?;
        Self::check_addresses("bcc", &self.bcc)?;
        if !is_well_formed_email(&self.from) {
            return Err(ValidationError::InvalidRecipient {
                field: "from",
                value: self.from,
            });
        }

        Ok(EmailMessage {
            to: self.to,
            from: self.from,
            from_name: self.from_name,
            subject: self.subject,
            body: self.body,
            cc: self.cc,
            bcc: self.bcc,
            attachments: self.attachments,
            is_html: self.is_html,
        })
    }

    fn check_addresses(field: &'static str, addresses: &[String]) -> Result<(), ValidationError> {
        for address in addresses {
            if !is_well_formed_email(address) {
                return Err(ValidationError::InvalidRecipient {
                    field,
                    value: address.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Trait for sending email messages.
#[async_trait]
pub trait EmailService: Send + Sync {
    /// Sends a message, failing with [`DeliveryError`] on transport failure.
    async fn send(&self, message: &EmailMessage) -> Result<(), DeliveryError>;
}
