//! Email bodies sent to applicants.
//!
//! Every message is rendered twice, as HTML and as plain text. Values coming
//! from applicants or admins are escaped before they reach the HTML body.

use super::EmailMessage;
use common::model::application::{Application, ApplicationStatus};

/// Names and links shared by every template.
#[derive(Debug, Clone)]
pub struct MessageContext<'a> {
    pub application: &'a Application,
    pub scholarship_name: &'a str,
    pub portal_url: &'a str,
}

impl MessageContext<'_> {
    fn greeting_name(&self) -> String {
        let name = self.application.first_name.trim();
        if name.is_empty() {
            "Applicant".to_string()
        } else {
            name.to_string()
        }
    }

    fn application_id(&self) -> &str {
        self.application.id.as_deref().unwrap_or("pending")
    }

    fn link(&self) -> String {
        format!("{}/", self.portal_url.trim_end_matches('/'))
    }
}

pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn html_page(title: &str, paragraphs: &[String]) -> String {
    let body: String = paragraphs
        .iter()
        .map(|p| format!("<p>{}</p>", p))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>{}</title></head>\n<body>\n{}\n</body></html>",
        escape_html(title),
        body
    )
}

pub fn submission_confirmation(ctx: &MessageContext) -> EmailMessage {
    let subject = format!("Application received: {}", ctx.scholarship_name);
    let name = ctx.greeting_name();

    let text = format!(
        "Dear {name},\n\n\
         Thank you for applying to {scholarship}. We have received your application \
         (reference {id}).\n\n\
         You can review your application at {link}\n",
        name = name,
        scholarship = ctx.scholarship_name,
        id = ctx.application_id(),
        link = ctx.link(),
    );
    let html = html_page(
        &subject,
        &[
            format!("Dear {},", escape_html(&name)),
            format!(
                "Thank you for applying to <strong>{}</strong>. We have received your application (reference <code>{}</code>).",
                escape_html(ctx.scholarship_name),
                escape_html(ctx.application_id())
            ),
            format!("<a href=\"{0}\">{0}</a>", escape_html(&ctx.link())),
        ],
    );

    EmailMessage::new(&ctx.application.email, subject, html, text)
}

fn status_sentence(status: ApplicationStatus) -> &'static str {
    match status {
        ApplicationStatus::Draft => "is saved as a draft",
        ApplicationStatus::Submitted => "has been submitted",
        ApplicationStatus::UnderReview => "is now under review",
        ApplicationStatus::Approved => "has been approved",
        ApplicationStatus::Rejected => "was not selected this time",
        ApplicationStatus::Awarded => "has been awarded",
    }
}

pub fn status_update(ctx: &MessageContext) -> EmailMessage {
    let status = ctx.application.status;
    let subject = format!("Application update: {} ({})", ctx.scholarship_name, status.label());
    let name = ctx.greeting_name();
    let sentence = format!(
        "Your application to {} {}.",
        ctx.scholarship_name,
        status_sentence(status)
    );

    let text = format!("Dear {},\n\n{}\n\nReference: {}\n", name, sentence, ctx.application_id());
    let html = html_page(
        &subject,
        &[
            format!("Dear {},", escape_html(&name)),
            escape_html(&sentence),
            format!("Reference: <code>{}</code>", escape_html(ctx.application_id())),
        ],
    );

    EmailMessage::new(&ctx.application.email, subject, html, text)
}

pub fn award_notice(ctx: &MessageContext) -> EmailMessage {
    let subject = format!("Congratulations! You have been awarded {}", ctx.scholarship_name);
    let name = ctx.greeting_name();
    let amount = ctx
        .application
        .awarded_amount
        .map(|a| format!("${:.2}", a))
        .unwrap_or_else(|| "a scholarship".to_string());
    let date = ctx.application.awarded_date.clone().unwrap_or_default();

    let text = format!(
        "Dear {},\n\nWe are delighted to award you {} from {} (awarded {}).\n\nReference: {}\n",
        name,
        amount,
        ctx.scholarship_name,
        date,
        ctx.application_id()
    );
    let html = html_page(
        &subject,
        &[
            format!("Dear {},", escape_html(&name)),
            format!(
                "We are delighted to award you <strong>{}</strong> from {} (awarded {}).",
                escape_html(&amount),
                escape_html(ctx.scholarship_name),
                escape_html(&date)
            ),
            format!("Reference: <code>{}</code>", escape_html(ctx.application_id())),
        ],
    );

    EmailMessage::new(&ctx.application.email, subject, html, text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn application() -> Application {
        let mut app = Application::new("s1");
        app.id = Some("app-1".into());
        app.first_name = "<script>alert(1)</script>".into();
        app.email = "ada@example.com".into();
        app
    }

    #[test]
    fn escapes_untrusted_values() {
        assert_eq!(escape_html("a<b>&\"c'"), "a&lt;b&gt;&amp;&quot;c&#39;");
    }

    #[test]
    fn confirmation_escapes_html_but_not_text() {
        let app = application();
        let ctx = MessageContext {
            application: &app,
            scholarship_name: "Tom & Jerry Fund",
            portal_url: "http://localhost:8080/",
        };
        let message = submission_confirmation(&ctx);
        assert_eq!(message.to, "ada@example.com");
        assert!(message.html.contains("&lt;script&gt;"));
        assert!(!message.html.contains("<script>"));
        assert!(message.html.contains("Tom &amp; Jerry Fund"));
        assert!(message.text.contains("Tom & Jerry Fund"));
        assert!(message.text.contains("app-1"));
        assert!(message.text.contains("http://localhost:8080/"));
    }

    #[test]
    fn award_notice_mentions_amount() {
        let mut app = application();
        app.first_name = "Ada".into();
        app.status = ApplicationStatus::Awarded;
        app.awarded_amount = Some(1500.0);
        app.awarded_date = Some("2026-05-01".into());
        let ctx = MessageContext {
            application: &app,
            scholarship_name: "STEM Award",
            portal_url: "http://localhost:8080",
        };
        let message = award_notice(&ctx);
        assert!(message.text.contains("$1500.00"));
        assert!(message.text.contains("2026-05-01"));
        let update = status_update(&ctx);
        assert!(update.subject.contains("Awarded"));
    }
}
