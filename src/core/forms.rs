use crate::utils::error::Result;
use crate::utils::validation::{is_valid_australian_phone, is_valid_email};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

const GENERIC_FAILURE: &str = "Something went wrong. Please try again or contact us directly.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InquiryType {
    General,
    Demo,
    Support,
    Partnership,
}

impl InquiryType {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "general" => Some(InquiryType::General),
            "demo" => Some(InquiryType::Demo),
            "support" => Some(InquiryType::Support),
            "partnership" => Some(InquiryType::Partnership),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub phone: Option<String>,
    pub message: String,
    pub inquiry_type: InquiryType,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewsletterSubmission {
    pub email: String,
    pub source: String,
}

fn text_field(body: &Value, name: &str) -> Option<String> {
    body.get(name)
        .and_then(Value::as_str)
        .map(str::to_string)
        .filter(|s| !s.trim().is_empty())
}

impl ContactSubmission {
    /// Checks every rule and reports all failures at once.
    pub fn from_json(body: &Value) -> std::result::Result<Self, Vec<String>> {
        let mut errors = Vec::new();

        let name = text_field(body, "name").unwrap_or_default();
        if name.trim().chars().count() < 2 {
            errors.push("Name is required and must be at least 2 characters".to_string());
        }

        let email = text_field(body, "email").unwrap_or_default();
        if !is_valid_email(&email) {
            errors.push("Valid email address is required".to_string());
        }

        let message = text_field(body, "message").unwrap_or_default();
        if message.trim().chars().count() < 10 {
            errors.push("Message is required and must be at least 10 characters".to_string());
        }

        let phone = text_field(body, "phone");
        if let Some(phone) = &phone {
            if !is_valid_australian_phone(phone) {
                errors.push("Please provide a valid Australian phone number".to_string());
            }
        }

        let inquiry_type = text_field(body, "type").and_then(|t| InquiryType::parse(&t));
        if inquiry_type.is_none() {
            errors.push("Valid inquiry type is required".to_string());
        }

        match inquiry_type {
            Some(inquiry_type) if errors.is_empty() => Ok(Self {
                name,
                email,
                company: text_field(body, "company"),
                phone,
                message,
                inquiry_type,
            }),
            _ => Err(errors),
        }
    }
}

impl NewsletterSubmission {
    pub fn from_json(body: &Value) -> std::result::Result<Self, Vec<String>> {
        let email = text_field(body, "email").unwrap_or_default();
        if !is_valid_email(&email) {
            return Err(vec!["Valid email address is required".to_string()]);
        }

        Ok(Self {
            email,
            source: text_field(body, "source").unwrap_or_else(|| "website".to_string()),
        })
    }
}

/// Destination for accepted submissions (mail, CRM, ...).
#[async_trait]
pub trait SubmissionSink: Send + Sync {
    async fn accept_contact(&self, submission: &ContactSubmission) -> Result<()>;
    async fn accept_newsletter(&self, submission: &NewsletterSubmission) -> Result<()>;
}

/// Records submissions in the application log and nothing else.
#[derive(Debug, Clone, Default)]
pub struct LogSink;

#[async_trait]
impl SubmissionSink for LogSink {
    async fn accept_contact(&self, submission: &ContactSubmission) -> Result<()> {
        tracing::info!(
            contact_name = %submission.name,
            email = %submission.email,
            company = ?submission.company,
            inquiry_type = ?submission.inquiry_type,
            "Contact form submission"
        );
        Ok(())
    }

    async fn accept_newsletter(&self, submission: &NewsletterSubmission) -> Result<()> {
        tracing::info!(
            email = %submission.email,
            source = %submission.source,
            "Newsletter subscription"
        );
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormResponse {
    pub status: u16,
    pub body: Value,
}

impl FormResponse {
    fn method_not_allowed() -> Self {
        Self {
            status: 405,
            body: json!({ "message": "Method not allowed" }),
        }
    }

    fn failure() -> Self {
        Self {
            status: 500,
            body: json!({ "message": GENERIC_FAILURE, "success": false }),
        }
    }

    fn ok(message: &str) -> Self {
        Self {
            status: 200,
            body: json!({ "message": message, "success": true }),
        }
    }
}

fn parse_object(body: &str) -> Option<Value> {
    serde_json::from_str::<Value>(body)
        .ok()
        .filter(Value::is_object)
}

/// Server-agnostic handlers for the contact and newsletter endpoints.
#[derive(Debug, Clone)]
pub struct FormHandler<S: SubmissionSink> {
    sink: S,
}

impl<S: SubmissionSink> FormHandler<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    pub async fn handle_contact(&self, method: &str, body: &str) -> FormResponse {
        if method != "POST" {
            return FormResponse::method_not_allowed();
        }

        let Some(payload) = parse_object(body) else {
            return FormResponse {
                status: 400,
                body: json!({
                    "message": "Validation failed",
                    "errors": ["Request body must be a JSON object"],
                }),
            };
        };

        let submission = match ContactSubmission::from_json(&payload) {
            Ok(submission) => submission,
            Err(errors) => {
                tracing::debug!("Contact form rejected with {} errors", errors.len());
                return FormResponse {
                    status: 400,
                    body: json!({ "message": "Validation failed", "errors": errors }),
                };
            }
        };

        match self.sink.accept_contact(&submission).await {
            Ok(()) => FormResponse::ok(
                "Thank you for your inquiry. We'll get back to you within 24 hours.",
            ),
            Err(e) => {
                tracing::error!("Contact form error: {}", e);
                FormResponse::failure()
            }
        }
    }

    pub async fn handle_newsletter(&self, method: &str, body: &str) -> FormResponse {
        if method != "POST" {
            return FormResponse::method_not_allowed();
        }

        let submission = match parse_object(body).map(|p| NewsletterSubmission::from_json(&p)) {
            Some(Ok(submission)) => submission,
            Some(Err(errors)) => {
                return FormResponse {
                    status: 400,
                    body: json!({
                        "message": "Valid email address is required",
                        "errors": errors,
                        "success": false,
                    }),
                };
            }
            None => {
                return FormResponse {
                    status: 400,
                    body: json!({
                        "message": "Valid email address is required",
                        "errors": ["Request body must be a JSON object"],
                        "success": false,
                    }),
                };
            }
        };

        match self.sink.accept_newsletter(&submission).await {
            Ok(()) => {
                FormResponse::ok("Thanks for subscribing! Check your email for confirmation.")
            }
            Err(e) => {
                tracing::error!("Newsletter subscription error: {}", e);
                FormResponse {
                    status: 500,
                    body: json!({
                        "message": "Something went wrong. Please try again.",
                        "success": false,
                    }),
                }
            }
        }
    }
}
