//! Email service for portal invitations and password setup links.

use lettre::{
    AsyncFileTransport, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, header::ContentType},
    transport::smtp::authentication::Credentials,
};
use std::path::Path;

use crate::{config::Config, errors::Error};

pub struct EmailService {
    transport: EmailTransport,
    from_email: String,
    from_name: String,
    base_url: String,
}

enum EmailTransport {
    Smtp(AsyncSmtpTransport<Tokio1Executor>),
    File(AsyncFileTransport<Tokio1Executor>),
}

impl EmailService {
    pub fn new(config: &Config) -> Result<Self, Error> {
        let email_config = &config.email;

        let transport = match &email_config.transport {
            crate::config::EmailTransportConfig::Smtp {
                host,
                port,
                username,
                password,
                use_tls,
            } => {
                if !use_tls {
                    tracing::warn!("SMTP TLS is disabled - this is not recommended for production");
                }

                let smtp_builder = if *use_tls {
                    AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
                } else {
                    Ok(AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host))
                }
                .map_err(|e| Error::Internal {
                    operation: format!("create SMTP transport: {e}"),
                })?
                .port(*port)
                .credentials(Credentials::new(username.clone(), password.clone()));

                EmailTransport::Smtp(smtp_builder.build())
            }
            crate::config::EmailTransportConfig::File { path } => {
                // File transport for development/testing
                let emails_dir = Path::new(path);
                if !emails_dir.exists() {
                    std::fs::create_dir_all(emails_dir).map_err(|e| Error::Internal {
                        operation: format!("create emails directory: {e}"),
                    })?;
                }
                let file_transport = AsyncFileTransport::<Tokio1Executor>::new(emails_dir);
                EmailTransport::File(file_transport)
            }
        };

        Ok(Self {
            transport,
            from_email: email_config.from_email.clone(),
            from_name: email_config.from_name.clone(),
            base_url: config.base_url.clone(),
        })
    }

    /// Send a portal invitation with a one-time setup link.
    ///
    /// The link carries the raw setup token; the recipient uses it once on the
    /// portal setup page to choose a password.
    pub async fn send_portal_invite_email(
        &self,
        to_email: &str,
        to_name: Option<&str>,
        company_name: &str,
        token: &str,
    ) -> Result<(), Error> {
        let setup_link = format!("{}/portal/setup?token={}", self.base_url, token);

        let subject = format!("{company_name} has invited you to your project portal");
        let body = self.create_portal_invite_body(to_name, company_name, &setup_link);

        self.send_email(to_email, to_name, &subject, &body).await
    }

    /// Send a password reset link to an existing portal client.
    pub async fn send_password_reset_email(
        &self,
        to_email: &str,
        to_name: Option<&str>,
        token: &str,
    ) -> Result<(), Error> {
        let reset_link = format!("{}/portal/setup?token={}", self.base_url, token);

        let subject = "Password Reset Request";
        let body = self.create_password_reset_body(to_name, &reset_link);

        self.send_email(to_email, to_name, subject, &body).await
    }

    async fn send_email(&self, to_email: &str, to_name: Option<&str>, subject: &str, body: &str) -> Result<(), Error> {
        let from = format!("{} <{}>", self.from_name, self.from_email)
            .parse::<Mailbox>()
            .map_err(|e| Error::Internal {
                operation: format!("parse from email: {e}"),
            })?;

        let to = if let Some(name) = to_name {
            format!("{name} <{to_email}>")
        } else {
            to_email.to_string()
        }
        .parse::<Mailbox>()
        .map_err(|e| Error::Internal {
            operation: format!("parse to email: {e}"),
        })?;

        let message = Message::builder()
            .from(from)
            .to(to)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(body.to_string())
            .map_err(|e| Error::Internal {
                operation: format!("build email message: {e}"),
            })?;

        match &self.transport {
            EmailTransport::Smtp(smtp) => {
                smtp.send(message).await.map_err(|e| Error::Internal {
                    operation: format!("send SMTP email: {e}"),
                })?;
            }
            EmailTransport::File(file) => {
                file.send(message).await.map_err(|e| Error::Internal {
                    operation: format!("send file email: {e}"),
                })?;
            }
        }

        Ok(())
    }

    fn create_portal_invite_body(&self, to_name: Option<&str>, company_name: &str, setup_link: &str) -> String {
        let greeting = if let Some(name) = to_name {
            format!("Hello {name},")
        } else {
            "Hello,".to_string()
        };

        format!(
            r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>Your Project Portal Invitation</title>
    <style>
        body {{ font-family: Arial, sans-serif; line-height: 1.6; color: #333; }}
        .container {{ max-width: 600px; margin: 0 auto; padding: 20px; }}
        .footer {{ margin-top: 30px; font-size: 12px; color: #666; }}
    </style>
</head>
<body>
    <div class="container">
        <h2>Your Project Portal Invitation</h2>

        <p>{greeting}</p>

        <p>{company_name} has set up a portal where you can follow weekly progress reports,
        photos, and documents for your project.</p>

        <p>To get started, choose a password using the link below:</p>

        <p><a href="{setup_link}">Set up your portal access</a></p>

        <p>Or copy and paste this link into your browser:</p>
        <p>{setup_link}</p>

        <p>This link will expire in 24 hours.</p>

        <div class="footer">
            <p>If you're having trouble with the button above, copy and paste the URL into your web browser.</p>
            <p>This is an automated message, please do not reply to this email.</p>
        </div>
    </div>
</body>
</html>"#
        )
    }

    fn create_password_reset_body(&self, to_name: Option<&str>, reset_link: &str) -> String {
        let greeting = if let Some(name) = to_name {
            format!("Hello {name},")
        } else {
            "Hello,".to_string()
        };

        format!(
            r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>Password Reset Request</title>
    <style>
        body {{ font-family: Arial, sans-serif; line-height: 1.6; color: #333; }}
        .container {{ max-width: 600px; margin: 0 auto; padding: 20px; }}
        .footer {{ margin-top: 30px; font-size: 12px; color: #666; }}
    </style>
</head>
<body>
    <div class="container">
        <h2>Password Reset Request</h2>

        <p>{greeting}</p>

        <p>We received a request to reset your portal password. If you didn't make this request, you can safely ignore this email.</p>

        <p>To reset your password, click the link below:</p>

        <p><a href="{reset_link}">Reset your password</a></p>

        <p>Or copy and paste this link into your browser:</p>
        <p>{reset_link}</p>

        <p>This link will expire in 24 hours.</p>

        <div class="footer">
            <p>If you're having trouble with the button above, copy and paste the URL into your web browser.</p>
            <p>This is an automated message, please do not reply to this email.</p>
        </div>
    </div>
</body>
</html>"#
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::create_test_config;

    #[tokio::test]
    async fn test_email_service_creation() {
        let config = create_test_config();
        let email_service = EmailService::new(&config);
        assert!(email_service.is_ok());
    }

    #[tokio::test]
    async fn test_portal_invite_body() {
        let config = create_test_config();
        let email_service = EmailService::new(&config).unwrap();

        let body = email_service.create_portal_invite_body(Some("Jordan Smith"), "Hearthstone Builders", "https://example.com/portal/setup?token=abc123");

        assert!(body.contains("Hello Jordan Smith,"));
        assert!(body.contains("Hearthstone Builders"));
        assert!(body.contains("https://example.com/portal/setup?token=abc123"));
        assert!(body.contains("Set up your portal access"));
    }

    #[tokio::test]
    async fn test_password_reset_body_no_name() {
        let config = create_test_config();
        let email_service = EmailService::new(&config).unwrap();

        let body = email_service.create_password_reset_body(None, "https://example.com/portal/setup?token=abc123");

        assert!(body.contains("Hello,"));
        assert!(body.contains("https://example.com/portal/setup?token=abc123"));
    }
}
