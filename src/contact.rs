//! Contact form submissions.
//!
//! The contact page's form and the `contact` CLI command both create a
//! record in the CMS contact collection:
//!
//! ```json
//! { "data": { "name": "...", "email": "...", "phone": null,
//!             "subject": "bagis", "message": "...", "contactStatus": "new" } }
//! ```

use crate::client::{self, ClientError, ContentSource};
use crate::config::CmsConfig;
use serde::Serialize;
use thiserror::Error;

/// Subject keys and their labels, in form order.
pub const SUBJECTS: [(&str, &str); 5] = [
    ("genel", "Genel Bilgi"),
    ("bagis", "Bağış Yapmak İstiyorum"),
    ("gonullu", "Gönüllü Olmak İstiyorum"),
    ("proje", "Proje Hakkında"),
    ("diger", "Diğer"),
];

/// Status every new submission is created with.
pub const NEW_STATUS: &str = "new";

#[derive(Error, Debug)]
pub enum ContactError {
    #[error("invalid submission: {0}")]
    Invalid(String),
    #[error(transparent)]
    Client(#[from] ClientError),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: String,
    pub message: String,
    pub contact_status: &'static str,
}

impl ContactSubmission {
    /// Build a submission, trimming fields and treating a blank phone as absent.
    pub fn new(
        name: &str,
        email: &str,
        phone: Option<&str>,
        subject: &str,
        message: &str,
    ) -> Self {
        Self {
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            phone: phone
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(String::from),
            subject: subject.trim().to_string(),
            message: message.trim().to_string(),
            contact_status: NEW_STATUS,
        }
    }

    /// Required fields, email shape and a known subject key.
    pub fn validate(&self) -> Result<(), ContactError> {
        for (field, value) in [
            ("name", &self.name),
            ("email", &self.email),
            ("subject", &self.subject),
            ("message", &self.message),
        ] {
            if value.is_empty() {
                return Err(ContactError::Invalid(format!("{field} is required")));
            }
        }
        if !looks_like_email(&self.email) {
            return Err(ContactError::Invalid(format!(
                "'{}' is not an email address",
                self.email
            )));
        }
        if subject_label(&self.subject).is_none() {
            let keys: Vec<&str> = SUBJECTS.iter().map(|(k, _)| *k).collect();
            return Err(ContactError::Invalid(format!(
                "unknown subject '{}' (expected one of: {})",
                self.subject,
                keys.join(", ")
            )));
        }
        Ok(())
    }
}

pub fn subject_label(key: &str) -> Option<&'static str> {
    SUBJECTS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, label)| *label)
}

fn looks_like_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

/// Validate and POST a submission to the configured contact collection.
pub async fn submit(
    source: &dyn ContentSource,
    config: &CmsConfig,
    submission: &ContactSubmission,
) -> Result<(), ContactError> {
    submission.validate()?;
    client::create(source, &config.contact_resource, submission).await?;
    tracing::info!(subject = %submission.subject, "contact submission created");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::StubSource;
    use serde_json::json;

    fn submission() -> ContactSubmission {
        ContactSubmission::new(
            " Ayşe Yılmaz ",
            "ayse@example.com",
            Some("  "),
            "gonullu",
            "Hafta sonları yardım edebilirim.",
        )
    }

    #[test]
    fn new_trims_and_drops_blank_phone() {
        let s = submission();
        assert_eq!(s.name, "Ayşe Yılmaz");
        assert_eq!(s.phone, None);
        assert_eq!(s.contact_status, "new");
    }

    #[test]
    fn serializes_camel_case_with_null_phone() {
        let value = serde_json::to_value(submission()).unwrap();
        assert_eq!(
            value,
            json!({
                "name": "Ayşe Yılmaz",
                "email": "ayse@example.com",
                "phone": null,
                "subject": "gonullu",
                "message": "Hafta sonları yardım edebilirim.",
                "contactStatus": "new"
            })
        );
    }

    #[test]
    fn valid_submission_passes() {
        assert!(submission().validate().is_ok());
    }

    #[test]
    fn missing_message_is_rejected() {
        let s = ContactSubmission::new("Ali", "ali@example.com", None, "genel", "   ");
        let err = s.validate().unwrap_err();
        assert!(err.to_string().contains("message is required"));
    }

    #[test]
    fn malformed_email_is_rejected() {
        for email in ["ali", "ali@", "@example.com", "ali@example", "ali@.com"] {
            let s = ContactSubmission::new("Ali", email, None, "genel", "Merhaba");
            assert!(
                matches!(s.validate(), Err(ContactError::Invalid(_))),
                "accepted {email}"
            );
        }
    }

    #[test]
    fn unknown_subject_is_rejected() {
        let s = ContactSubmission::new("Ali", "ali@example.com", None, "reklam", "Merhaba");
        let err = s.validate().unwrap_err().to_string();
        assert!(err.contains("genel, bagis, gonullu, proje, diger"));
    }

    #[test]
    fn subject_labels() {
        assert_eq!(subject_label("bagis"), Some("Bağış Yapmak İstiyorum"));
        assert_eq!(subject_label("yok"), None);
    }

    #[tokio::test]
    async fn submit_posts_to_contact_resource() {
        let source = StubSource::new();
        let config = CmsConfig::default();
        submit(&source, &config, &submission()).await.unwrap();

        let posts = source.posts();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].0, "contacts");
        assert_eq!(posts[0].1["data"]["contactStatus"], "new");
        assert_eq!(posts[0].1["data"]["name"], "Ayşe Yılmaz");
    }

    #[tokio::test]
    async fn submit_surfaces_cms_rejection() {
        let source = StubSource::new().failing("contacts", 400);
        let config = CmsConfig::default();
        let result = submit(&source, &config, &submission()).await;
        assert!(matches!(
            result,
            Err(ContactError::Client(ClientError::Status { status: 400, .. }))
        ));
    }

    #[tokio::test]
    async fn invalid_submission_is_never_sent() {
        let source = StubSource::new();
        let config = CmsConfig::default();
        let s = ContactSubmission::new("", "ali@example.com", None, "genel", "Merhaba");
        assert!(submit(&source, &config, &s).await.is_err());
        assert!(source.posts().is_empty());
    }
}
