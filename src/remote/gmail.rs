//! Gmail REST client over ureq.

use std::time::Duration;

use super::Remote;
use super::types::{
    CreateLabelRequest, ErrorResponse, Label, ListLabelsResponse, ListMessagesResponse, Message,
    ModifyMessageRequest,
};
use crate::config::GmailConfig;
use crate::error::{Error, Result};

pub struct GmailClient {
    agent: ureq::Agent,
    api_base: String,
    access_token: String,
    page_size: u32,
}

impl GmailClient {
    pub fn new(config: &GmailConfig, access_token: &str) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build();
        Self {
            agent,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            access_token: access_token.to_string(),
            page_size: config.page_size,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_base, path)
    }

    fn request(&self, method: &str, path: &str) -> ureq::Request {
        tracing::debug!(method, path, "gmail request");
        self.agent
            .request(method, &self.url(path))
            .set("Authorization", &format!("Bearer {}", self.access_token))
    }
}

/// Turn a ureq failure into a remote error, keeping Gmail's own message.
fn remote_error(operation: &str, err: ureq::Error) -> Error {
    match err {
        ureq::Error::Status(code, response) => {
            let body = response.into_string().unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .ok()
                .filter(|m| !m.is_empty())
                .unwrap_or(body);
            Error::remote(operation, format!("HTTP {}: {}", code, message.trim()))
        }
        ureq::Error::Transport(t) => Error::remote(operation, t),
    }
}

fn read_json<T: serde::de::DeserializeOwned>(
    operation: &str,
    response: ureq::Response,
) -> Result<T> {
    response
        .into_json::<T>()
        .map_err(|e| Error::remote(operation, e))
}

impl Remote for GmailClient {
    fn list_messages(
        &mut self,
        query: &str,
        page_token: Option<&str>,
    ) -> Result<ListMessagesResponse> {
        let op = "list messages";
        let mut req = self
            .request("GET", "messages")
            .query("q", query)
            .query("maxResults", &self.page_size.to_string());
        if let Some(token) = page_token {
            req = req.query("pageToken", token);
        }
        let response = req.call().map_err(|e| remote_error(op, e))?;
        read_json(op, response)
    }

    fn get_message(&mut self, id: &str) -> Result<Message> {
        let op = format!("get message {}", id);
        let response = self
            .request("GET", &format!("messages/{}", id))
            .query("format", "full")
            .call()
            .map_err(|e| remote_error(&op, e))?;
        read_json(&op, response)
    }

    fn modify_message(&mut self, id: &str, add: &[&str], remove: &[&str]) -> Result<()> {
        let op = format!("modify message {}", id);
        self.request("POST", &format!("messages/{}/modify", id))
            .send_json(ModifyMessageRequest {
                add_label_ids: add,
                remove_label_ids: remove,
            })
            .map_err(|e| remote_error(&op, e))?;
        Ok(())
    }

    fn trash_message(&mut self, id: &str) -> Result<()> {
        let op = format!("trash message {}", id);
        self.request("POST", &format!("messages/{}/trash", id))
            .call()
            .map_err(|e| remote_error(&op, e))?;
        Ok(())
    }

    fn list_labels(&mut self) -> Result<Vec<Label>> {
        let op = "list labels";
        let response = self
            .request("GET", "labels")
            .call()
            .map_err(|e| remote_error(op, e))?;
        let list: ListLabelsResponse = read_json(op, response)?;
        Ok(list.labels)
    }

    fn create_label(&mut self, name: &str) -> Result<Label> {
        let op = format!("create label \"{}\"", name);
        let response = self
            .request("POST", "labels")
            .send_json(CreateLabelRequest {
                name,
                label_list_visibility: "labelShow",
                message_list_visibility: "show",
            })
            .map_err(|e| remote_error(&op, e))?;
        read_json(&op, response)
    }
}
