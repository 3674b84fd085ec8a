//! Send documents by email

use std::fmt;

use crate::application::dto::{EmailData, SendDocumentsRequest};
use crate::domain::value_objects::{EmailAddress, EmailError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendError {
    NoDocuments,
    NoRecipient,
    InvalidAddress { address: String, reason: EmailError },
    MissingSubject,
}

impl std::error::Error for SendError {}

impl fmt::Display for SendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoDocuments => write!(f, "Select at least one document"),
            Self::NoRecipient => write!(f, "At least one 'to' address is required"),
            Self::InvalidAddress { address, reason } => write!(f, "{}: {}", address, reason),
            Self::MissingSubject => write!(f, "Subject is required"),
        }
    }
}

/// Email form for one or more documents
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SendDocumentsForm {
    pub document_ids: Vec<String>,
    pub company_id: Option<String>,
    pub from: Option<String>,
    pub to: Vec<String>,
    pub recipients: Vec<String>,
    pub subject: String,
    pub message: String,
}

impl SendDocumentsForm {
    pub fn new<I, S>(document_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            document_ids: document_ids.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    pub fn add_to(&mut self, address: impl Into<String>) {
        self.to.push(address.into());
    }

    pub fn add_recipient(&mut self, address: impl Into<String>) {
        self.recipients.push(address.into());
    }

    /// Parse a comma or semicolon separated address list
    pub fn split_addresses(input: &str) -> Vec<String> {
        input
            .split([',', ';'])
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn build(&self) -> Result<SendDocumentsRequest, SendError> {
        if self.document_ids.is_empty() {
            return Err(SendError::NoDocuments);
        }

        let to = Self::parse_all(&self.to)?;
        if to.is_empty() {
            return Err(SendError::NoRecipient);
        }
        let recipients = Self::parse_all(&self.recipients)?;
        let from = match self.from.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(address) => Some(Self::parse_one(address)?),
            None => None,
        };

        let subject = self.subject.trim();
        if subject.is_empty() {
            return Err(SendError::MissingSubject);
        }

        Ok(SendDocumentsRequest {
            document_ids: self.document_ids.clone(),
            email_data: EmailData {
                company_id: self.company_id.clone(),
                from,
                to,
                recipients,
                subject: subject.to_string(),
                message: self.message.clone(),
            },
        })
    }

    fn parse_all(addresses: &[String]) -> Result<Vec<String>, SendError> {
        addresses
            .iter()
            .map(|a| a.trim())
            .filter(|a| !a.is_empty())
            .map(Self::parse_one)
            .collect()
    }

    fn parse_one(address: &str) -> Result<String, SendError> {
        EmailAddress::parse(address)
            .map(|email| email.to_string())
            .map_err(|reason| SendError::InvalidAddress { address: address.to_string(), reason })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> SendDocumentsForm {
        let mut form = SendDocumentsForm::new(["d1", "d2"]);
        form.add_to("ana@example.com");
        form.subject = "Contracts".into();
        form.message = "See attached".into();
        form
    }

    #[test]
    fn test_valid_form_builds_payload() {
        let mut form = valid_form();
        form.company_id = Some("c1".into());
        form.add_recipient(" ops@example.com ");
        let request = form.build().unwrap();
        assert_eq!(request.document_ids, vec!["d1", "d2"]);
        assert_eq!(request.email_data.recipients, vec!["ops@example.com"]);

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["documentIds"][0], "d1");
        assert_eq!(json["emailData"]["companyId"], "c1");
        assert_eq!(json["emailData"]["subject"], "Contracts");
    }

    #[test]
    fn test_requires_documents() {
        let mut form = valid_form();
        form.document_ids.clear();
        assert_eq!(form.build(), Err(SendError::NoDocuments));
    }

    #[test]
    fn test_requires_to_address() {
        let mut form = valid_form();
        form.to = vec!["  ".into()];
        assert_eq!(form.build(), Err(SendError::NoRecipient));
    }

    #[test]
    fn test_rejects_invalid_addresses() {
        let mut form = valid_form();
        form.from = Some("not-an-email".into());
        assert!(matches!(form.build(), Err(SendError::InvalidAddress { .. })));

        let mut form = valid_form();
        form.add_recipient("bad@");
        assert!(matches!(form.build(), Err(SendError::InvalidAddress { .. })));
    }

    #[test]
    fn test_requires_subject() {
        let mut form = valid_form();
        form.subject = "   ".into();
        assert_eq!(form.build(), Err(SendError::MissingSubject));
    }

    #[test]
    fn test_split_addresses() {
        assert_eq!(
            SendDocumentsForm::split_addresses("a@x.com, b@y.com;;c@z.com "),
            vec!["a@x.com", "b@y.com", "c@z.com"]
        );
    }
}
