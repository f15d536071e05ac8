//! HTML body for campaign emails

use serde_json::{Map, Value};

use crate::domains::emails::data::Recipient;

/// Subject as heading, a personal greeting, a fixed note, then `template_data.message`.
pub fn render_email(subject: &str, recipient: &Recipient, template_data: &Map<String, Value>) -> String {
    let message = match template_data.get("message") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    };

    format!(
        "<html><body><h1>{}</h1><p>Dear {},</p><p>This is a test email.</p><p>{}</p></body></html>",
        escape_html(subject),
        escape_html(&recipient.first_name),
        escape_html(&message),
    )
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
