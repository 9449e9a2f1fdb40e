//! Email templates
//!
//! Templates are rendered with Tera. A `contact` template is always
//! registered; others can be added at runtime with [`MailTemplates::add`].

use anyhow::{Context, Result};
use serde_json::Value;
use tera::Tera;

/// Name of the built-in contact notification template
pub const CONTACT_TEMPLATE: &str = "contact";

const CONTACT_TEMPLATE_BODY: &str = r#"<!DOCTYPE html>
<html>
<body>
  <h2>New contact form submission</h2>
  <p><strong>Name:</strong> {{ name }}</p>
  <p><strong>Email:</strong> {{ email }}</p>
  {% if phone %}<p><strong>Phone:</strong> {{ phone }}</p>{% endif %}
  {% if message %}<p><strong>Message:</strong></p>
  <p>{{ message }}</p>{% endif %}
</body>
</html>
"#;

/// Registry of named email templates
pub struct MailTemplates {
    tera: Tera,
}

impl MailTemplates {
    /// Create a registry holding the built-in templates
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();
        // Template names carry no file extension, so escape everything.
        tera.autoescape_on(vec![""]);
        tera.add_raw_template(CONTACT_TEMPLATE, CONTACT_TEMPLATE_BODY)
            .context("Failed to register contact template")?;
        Ok(Self { tera })
    }

    /// Register or replace a named template
    pub fn add(&mut self, name: &str, body: &str) -> Result<()> {
        self.tera
            .add_raw_template(name, body)
            .with_context(|| format!("Failed to register template '{}'", name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tera.get_template_names().any(|n| n == name)
    }

    /// Render `name` with a JSON object as context
    pub fn render(&self, name: &str, context: &Value) -> Result<String> {
        if !self.contains(name) {
            anyhow::bail!("Unknown email template: {}", name);
        }
        let ctx = tera::Context::from_value(context.clone())
            .context("Email template context must be a JSON object")?;
        self.tera
            .render(name, &ctx)
            .with_context(|| format!("Failed to render email template '{}'", name))
    }
}

impl std::fmt::Debug for MailTemplates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.tera.get_template_names().collect();
        f.debug_struct("MailTemplates").field("templates", &names).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_contact_template_renders_fields() {
        let templates = MailTemplates::new().unwrap();
        let body = templates
            .render(
                CONTACT_TEMPLATE,
                &json!({"name": "Ana", "email": "ana@example.com", "message": "Hi!"}),
            )
            .unwrap();

        assert!(body.contains("Ana"));
        assert!(body.contains("ana@example.com"));
        assert!(body.contains("Hi!"));
        assert!(!body.contains("Phone:"));
    }

    #[test]
    fn test_contact_template_escapes_html() {
        let templates = MailTemplates::new().unwrap();
        let body = templates
            .render(
                CONTACT_TEMPLATE,
                &json!({"name": "<script>", "email": "x@example.com"}),
            )
            .unwrap();

        assert!(!body.contains("<script>"));
        assert!(body.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_unknown_template_is_error() {
        let templates = MailTemplates::new().unwrap();
        assert!(templates.render("welcome", &json!({})).is_err());
    }

    #[test]
    fn test_non_object_context_is_error() {
        let templates = MailTemplates::new().unwrap();
        assert!(templates.render(CONTACT_TEMPLATE, &json!(["a"])).is_err());
    }

    #[test]
    fn test_add_custom_template() {
        let mut templates = MailTemplates::new().unwrap();
        templates.add("welcome", "Hello {{ name }}").unwrap();

        assert!(templates.contains("welcome"));
        assert_eq!(
            templates.render("welcome", &json!({"name": "Bo"})).unwrap(),
            "Hello Bo"
        );
    }
}
