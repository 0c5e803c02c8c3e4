//! Outbound applicant notifications.
//!
//! Messages are rendered by [`templates`] and handed to a [`Mailer`] on a
//! spawned task. A failed send is logged and never fails the request that
//! triggered it. The bundled [`LogMailer`] writes messages to the log; real
//! delivery plugs in behind the same trait.

pub mod templates;

use crate::config::NotificationConfig;
use common::model::application::Application;
use log::{debug, error, info};
use std::sync::Arc;
use templates::MessageContext;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
    pub text: String,
}

impl EmailMessage {
    pub fn new(to: &str, subject: String, html: String, text: String) -> Self {
        Self {
            to: to.trim().to_string(),
            subject,
            html,
            text,
        }
    }
}

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("no recipient address")]
    MissingRecipient,
}

pub trait Mailer: Send + Sync {
    fn send(&self, from: &str, message: &EmailMessage) -> Result<(), NotificationError>;
}

/// Writes messages to the log instead of delivering them.
#[derive(Debug, Default)]
pub struct LogMailer;

impl Mailer for LogMailer {
    fn send(&self, from: &str, message: &EmailMessage) -> Result<(), NotificationError> {
        info!(
            "Email from {} to {}: {} ({} bytes html)",
            from,
            message.to,
            message.subject,
            message.html.len()
        );
        debug!("{}", message.text);
        Ok(())
    }
}

#[derive(Clone)]
pub struct Notifier {
    config: NotificationConfig,
    mailer: Arc<dyn Mailer>,
}

/// Which notice to send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    SubmissionConfirmation,
    StatusUpdate,
    Award,
}

impl Notifier {
    pub fn new(config: NotificationConfig, mailer: Arc<dyn Mailer>) -> Self {
        Self { config, mailer }
    }

    pub fn render(&self, notice: Notice, application: &Application, scholarship_name: &str) -> EmailMessage {
        let ctx = MessageContext {
            application,
            scholarship_name,
            portal_url: &self.config.portal_url,
        };
        match notice {
            Notice::SubmissionConfirmation => templates::submission_confirmation(&ctx),
            Notice::StatusUpdate => templates::status_update(&ctx),
            Notice::Award => templates::award_notice(&ctx),
        }
    }

    /// Sends synchronously. Used by [`Notifier::dispatch`] and tests.
    pub fn deliver(&self, message: &EmailMessage) -> Result<(), NotificationError> {
        if message.to.is_empty() {
            return Err(NotificationError::MissingRecipient);
        }
        self.mailer.send(&self.config.from_address, message)
    }

    /// Renders the notice and sends it on a separate task.
    pub fn dispatch(&self, notice: Notice, application: &Application, scholarship_name: &str) {
        if !self.config.enabled {
            debug!("Notifications disabled, skipping {:?}", notice);
            return;
        }
        let message = self.render(notice, application, scholarship_name);
        let notifier = self.clone();
        actix_web::rt::spawn(async move {
            if let Err(e) = notifier.deliver(&message) {
                error!("Could not send '{}' to '{}': {}", message.subject, message.to, e);
            }
        });
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Keeps every message it is asked to send.
    #[derive(Default)]
    pub(crate) struct RecordingMailer {
        pub(crate) sent: Mutex<Vec<EmailMessage>>,
    }

    impl Mailer for RecordingMailer {
        fn send(&self, _from: &str, message: &EmailMessage) -> Result<(), NotificationError> {
            self.sent.lock().unwrap().push(message.clone());
            Ok(())
        }
    }

    fn config() -> NotificationConfig {
        NotificationConfig {
            enabled: true,
            from_address: "noreply@example.org".into(),
            portal_url: "http://localhost:8080".into(),
        }
    }

    #[test]
    fn missing_recipient_is_an_error() {
        let notifier = Notifier::new(config(), Arc::new(LogMailer));
        let message = notifier.render(Notice::StatusUpdate, &Application::new("s1"), "Award");
        assert!(matches!(
            notifier.deliver(&message),
            Err(NotificationError::MissingRecipient)
        ));
    }

    #[actix_web::test]
    async fn dispatch_sends_in_the_background() {
        let mailer = Arc::new(RecordingMailer::default());
        let notifier = Notifier::new(config(), mailer.clone());
        let mut app = Application::new("s1");
        app.email = "ada@example.com".into();

        notifier.dispatch(Notice::SubmissionConfirmation, &app, "STEM Award");
        actix_web::rt::task::yield_now().await;

        let sent = mailer.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].subject.contains("STEM Award"));
    }

    #[actix_web::test]
    async fn disabled_notifier_sends_nothing() {
        let mailer = Arc::new(RecordingMailer::default());
        let mut disabled = config();
        disabled.enabled = false;
        let notifier = Notifier::new(disabled, mailer.clone());
        let mut app = Application::new("s1");
        app.email = "ada@example.com".into();
        notifier.dispatch(Notice::Award, &app, "STEM Award");
        actix_web::rt::task::yield_now().await;
        assert!(mailer.sent.lock().unwrap().is_empty());
    }
}
