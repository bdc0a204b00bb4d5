//! Operator notification rendered from a contact submission

use std::collections::HashMap;

use once_cell::sync::Lazy;

use super::message::ContactMessage;
use super::template::{HtmlTemplate, TemplateError};

/// Content-ID the template uses to reference the inline logo
pub const LOGO_CONTENT_ID: &str = "logo";

const CONTACT_EMAIL_HTML: &str = r#"
  <div style="
    font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif;
    max-width:600px; margin:auto;
    border:1px solid #e0e0e0;
    border-radius:16px;
    padding:30px;
    background:#ffffff;
    box-shadow: 0 4px 12px rgba(0,0,0,0.05);
  ">
    <div style="text-align:center; margin-bottom:25px;">
      <img src="cid:logo" alt="Virtua Mod Logo" style="
        width:100px;
        height:100px;
        object-fit:cover;
        border-radius:50%;
        margin-bottom:15px;
        box-shadow: 0 2px 8px rgba(79,70,229,0.3);
      "/>
      <h2 style="color:#4F46E5; margin-bottom:8px; font-weight:700; font-size:24px;">📬 New Contact Form Submission</h2>
      <p style="color:#6b7280; font-size:15px; margin-top:0; font-weight:500;">from <strong>Virtua Mod</strong> website 🌐</p>
    </div>
    <div style="color:#111827; font-size:16px; line-height:1.6;">
      <p>👤 <strong>Name:</strong> ${var:name}</p>
      <p>📧 <strong>Email:</strong> <a href="mailto:${var:email}" style="color:#4F46E5; text-decoration:none;">${var:email}</a></p>
      <p>💬 <strong>Message:</strong></p>
      <p style="
        background:#f9fafb;
        padding:20px;
        border-radius:12px;
        font-style:italic;
        color:#374151;
        white-space:pre-wrap;
        box-shadow: inset 0 0 5px #e0e0e0;
      ">${var:message}</p>
    </div>
    <hr style="margin:35px 0; border:none; border-top:1px solid #e5e7eb;" />
    <footer style="text-align:center; font-size:13px; color:#9ca3af; line-height:1.4;">
      <p style="margin:0 0 6px 0;">
        Virtua Mod &nbsp;&bull;&nbsp;
        <a href="mailto:contact@virtuamod.com" style="color:#4F46E5; text-decoration:none;">✉️ contact@virtuamod.com</a> &nbsp;&bull;&nbsp; 📞 +92 300 1234567
      </p>
      <p style="margin:0;">
        <a href="https://www.virtuamod.com" target="_blank" style="color:#4F46E5; text-decoration:none; font-weight:600;">
          🌍 www.virtuamod.com
        </a>
      </p>
    </footer>
  </div>
"#;

static CONTACT_TEMPLATE: Lazy<HtmlTemplate> = Lazy::new(|| HtmlTemplate::parse(CONTACT_EMAIL_HTML));

/// Subject line and HTML body for the operator inbox
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactEmail {
    pub subject: String,
    pub html: String,
}

impl ContactEmail {
    /// Render the fixed contact template for a submission
    pub fn render(message: &ContactMessage) -> Result<Self, TemplateError> {
        let values = HashMap::from([
            ("name", message.name()),
            ("email", message.email()),
            ("message", message.message()),
        ]);

        Ok(Self {
            subject: format!("Contact Form Submission from {}", message.name()),
            html: CONTACT_TEMPLATE.render(&values)?,
        })
    }

    /// Plain-text alternative for clients that do not render HTML
    pub fn plain_text(message: &ContactMessage) -> String {
        format!(
            "New contact form submission\n\nName: {}\nEmail: {}\n\n{}\n",
            message.name(),
            message.email(),
            message.message()
        )
    }
}
