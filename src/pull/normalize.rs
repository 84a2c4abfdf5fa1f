//! Gmail message → Email: headers, address lists and the preferred body part.

use base64::Engine as _;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::remote::UNREAD;
use crate::remote::types::{Header, Message, MessagePart};
use crate::store::email::{Address, Body, ContentType, Email};

static NAMED_ADDR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(.+?)\s*<(.+?)>$").unwrap());
static EDGE_QUOTES_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"^["']|["']$"#).unwrap());

const LENIENT: GeneralPurposeConfig =
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent);
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::URL_SAFE, LENIENT);
const STANDARD_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::STANDARD, LENIENT);

fn header<'a>(headers: &'a [Header], name: &str) -> &'a str {
    headers
        .iter()
        .find(|h| h.name.eq_ignore_ascii_case(name))
        .map(|h| h.value.as_str())
        .unwrap_or("")
}

/// Parse `Name <addr>` or a bare address. Empty input yields `None`.
pub fn parse_address(input: &str) -> Option<Address> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    if let Some(cap) = NAMED_ADDR_RE.captures(input) {
        return Some(Address {
            name: EDGE_QUOTES_RE.replace_all(&cap[1], "").trim().to_string(),
            address: cap[2].trim().to_string(),
        });
    }
    Some(Address {
        name: String::new(),
        address: input.to_string(),
    })
}

/// Split a header value on commas that are not inside double quotes.
pub fn parse_address_list(input: &str) -> Vec<Address> {
    let mut addresses = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    for c in input.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                current.push(c);
            }
            ',' if !in_quotes => {
                addresses.extend(parse_address(&current));
                current.clear();
            }
            _ => current.push(c),
        }
    }
    addresses.extend(parse_address(&current));
    addresses
}

/// Decode Gmail's URL-safe base64 body data. Padding is optional.
pub fn decode_body_data(data: &str) -> String {
    let trimmed = data.trim();
    let bytes = URL_SAFE_LENIENT
        .decode(trimmed)
        .or_else(|_| STANDARD_LENIENT.decode(trimmed));
    match bytes {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(e) => {
            tracing::warn!("Failed to decode message body: {}", e);
            String::new()
        }
    }
}

/// Depth-first search for the first part with the given MIME type.
pub fn find_part<'a>(part: &'a MessagePart, mime_type: &str) -> Option<&'a MessagePart> {
    if part.mime_type.as_deref() == Some(mime_type) {
        return Some(part);
    }
    part.parts.iter().find_map(|p| find_part(p, mime_type))
}

fn part_data(part: &MessagePart) -> String {
    part.body
        .as_ref()
        .and_then(|b| b.data.as_deref())
        .map(decode_body_data)
        .unwrap_or_default()
}

/// Prefer HTML, then plain text, then the payload's own body.
pub fn extract_body(payload: Option<&MessagePart>) -> Body {
    let Some(payload) = payload else {
        return Body {
            content_type: ContentType::Text,
            content: String::new(),
        };
    };
    if let Some(html) = find_part(payload, "text/html") {
        return Body {
            content_type: ContentType::Html,
            content: part_data(html),
        };
    }
    if let Some(text) = find_part(payload, "text/plain") {
        return Body {
            content_type: ContentType::Text,
            content: part_data(text),
        };
    }
    Body {
        content_type: ContentType::Text,
        content: part_data(payload),
    }
}

pub fn web_link(gmail_id: &str) -> String {
    format!("https://mail.google.com/mail/u/0/#inbox/{}", gmail_id)
}

/// Convert a full Gmail message into the stored email shape.
pub fn normalize(message: &Message) -> Email {
    let headers: &[Header] = message
        .payload
        .as_ref()
        .map(|p| p.headers.as_slice())
        .unwrap_or(&[]);

    let received_date_time = message
        .internal_date
        .as_deref()
        .and_then(|ms| ms.parse::<i64>().ok())
        .and_then(DateTime::<Utc>::from_timestamp_millis);

    Email {
        gmail_id: message.id.clone(),
        thread_id: message.thread_id.clone(),
        subject: header(headers, "Subject").to_string(),
        from: parse_address(header(headers, "From")),
        to_recipients: parse_address_list(header(headers, "To")),
        cc_recipients: parse_address_list(header(headers, "Cc")),
        bcc_recipients: parse_address_list(header(headers, "Bcc")),
        received_date_time,
        is_read: !message.label_ids.iter().any(|l| l == UNREAD),
        label_ids: message.label_ids.clone(),
        snippet: message.snippet.clone(),
        web_link: web_link(&message.id),
        body: extract_body(message.payload.as_ref()),
        ..Default::default()
    }
}
