//! Email ↔ Markdown serialization: YAML front matter, an H1 subject line and
//! the body as a fenced block tagged `html` or `text`.

use once_cell::sync::Lazy;
use regex::Regex;

use super::email::{ContentType, Email};
use crate::error::{Error, Result};

static FRONT_MATTER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\A---\n(.*?)\n---").unwrap());
// Greedy: the body runs to the last closing fence in the file.
static BODY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```(html|text)\n(.*)\n```").unwrap());

/// Break adjacent HTML tags onto separate lines so stored bodies stay readable.
pub fn format_html(content: &str) -> String {
    content.replace("><", ">\n<").replace("\r\n", "\n")
}

/// Serialize an email to Markdown.
pub fn email_to_markdown(email: &Email) -> Result<String> {
    let front_matter = serde_yaml::to_string(email)?;
    let body = match email.body.content_type {
        ContentType::Html => format_html(&email.body.content),
        ContentType::Text => email.body.content.clone(),
    };
    Ok(format!(
        "---\n{}---\n\n# {}\n\n```{}\n{}\n```\n",
        front_matter,
        email.display_subject(),
        email.body.content_type.as_str(),
        body
    ))
}

/// Parse a stored email file.
pub fn parse_email_markdown(text: &str) -> Result<Email> {
    let cap = FRONT_MATTER_RE
        .captures(text)
        .ok_or(Error::MissingFrontMatter)?;
    let mut email: Email = serde_yaml::from_str(&cap[1])?;

    let rest = &text[cap.get(0).map(|m| m.end()).unwrap_or(0)..];
    if let Some(body) = BODY_RE.captures(rest) {
        email.body.content_type = if &body[1] == "html" {
            ContentType::Html
        } else {
            ContentType::Text
        };
        email.body.content = body[2].to_string();
    }
    Ok(email)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::email::Body;

    fn text_email(subject: &str, content: &str) -> Email {
        Email {
            gmail_id: "18c2f0a1b2c3d4e5".to_string(),
            subject: subject.to_string(),
            body: Body {
                content_type: ContentType::Text,
                content: content.to_string(),
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_body_with_inner_fence_survives_reload() {
        let content = "before\n```\nafter";
        let md = email_to_markdown(&text_email("Code", content)).unwrap();
        let parsed = parse_email_markdown(&md).unwrap();
        assert_eq!(parsed.body.content, content);
    }

    #[test]
    fn test_layout() {
        let md = email_to_markdown(&text_email("Hello", "Hi there")).unwrap();
        assert!(md.starts_with("---\nid: "));
        assert!(md.contains("---\n\n# Hello\n\n```text\nHi there\n```\n"));
        assert!(md.contains("body:\n  contentType: text\n"));
    }

    #[test]
    fn test_empty_subject_placeholder() {
        let md = email_to_markdown(&text_email("", "x")).unwrap();
        assert!(md.contains("\n# (No Subject)\n"));
    }

    #[test]
    fn test_html_tags_split() {
        assert_eq!(format_html("<p>a</p><p>b</p>\r\n"), "<p>a</p>\n<p>b</p>\n");
    }

    #[test]
    fn test_missing_front_matter() {
        let err = parse_email_markdown("# Just a heading\n").unwrap_err();
        assert!(matches!(err, Error::MissingFrontMatter));
    }

    #[test]
    fn test_missing_body_block_yields_empty_body() {
        let email = parse_email_markdown("---\nid: abc\nsubject: Hi\n---\n\n# Hi\n").unwrap();
        assert_eq!(email.gmail_id, "abc");
        assert_eq!(email.body.content, "");
    }
}
