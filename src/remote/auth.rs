//! Gmail OAuth: client secrets, the saved refresh token, and the loopback
//! consent flow used by `google-email auth`.

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use rand::Rng;
use std::path::Path;
use std::time::Duration;

use super::gmail::GmailClient;
use crate::config::{self, GmailConfig};
use crate::error::Error;
use crate::resolve;

pub const SCOPE: &str = "https://www.googleapis.com/auth/gmail.modify";

/// Environment override for the access token; skips the OAuth exchange.
pub const ACCESS_TOKEN_ENV: &str = "GOOGLE_EMAIL_ACCESS_TOKEN";

#[derive(Debug, Clone, Deserialize)]
pub struct ClientSecret {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default)]
    pub auth_uri: Option<String>,
    #[serde(default)]
    pub token_uri: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ClientSecretsFile {
    #[serde(default)]
    installed: Option<ClientSecret>,
    #[serde(default)]
    web: Option<ClientSecret>,
}

/// Saved refresh token, in the `authorized_user` layout Google tools use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorizedUser {
    #[serde(rename = "type")]
    pub kind: String,
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
}

pub fn has_credentials() -> bool {
    resolve::credentials_json().exists()
}

/// Fail with remediation text unless credentials.json is in place.
pub fn require_credentials() -> std::result::Result<(), Error> {
    if std::env::var(ACCESS_TOKEN_ENV).is_ok_and(|t| !t.is_empty()) {
        return Ok(());
    }
    if !has_credentials() {
        return Err(Error::CredentialsMissing(resolve::credentials_json()));
    }
    Ok(())
}

pub fn load_client_secret(path: &Path) -> Result<ClientSecret> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let file: ClientSecretsFile = serde_json::from_str(&content)
        .with_context(|| format!("Invalid client secrets in {}", path.display()))?;
    file.installed.or(file.web).ok_or_else(|| {
        anyhow::anyhow!(
            "{} has neither an \"installed\" nor a \"web\" client",
            path.display()
        )
    })
}

pub fn load_token(path: &Path) -> Result<Option<AuthorizedUser>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(path)?;
    let token: AuthorizedUser = serde_json::from_str(&content)
        .with_context(|| format!("Invalid token file {}", path.display()))?;
    Ok(Some(token))
}

pub fn save_token(path: &Path, token: &AuthorizedUser) -> Result<()> {
    std::fs::write(path, serde_json::to_string_pretty(token)?)?;
    Ok(())
}

fn agent(config: &GmailConfig) -> ureq::Agent {
    ureq::AgentBuilder::new()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
}

fn post_token_form(
    agent: &ureq::Agent,
    token_uri: &str,
    form: &[(&str, &str)],
) -> Result<TokenResponse> {
    let response = match agent.post(token_uri).send_form(form) {
        Ok(r) => r,
        Err(ureq::Error::Status(code, r)) => {
            bail!(
                "Token endpoint returned HTTP {}: {}",
                code,
                r.into_string().unwrap_or_default().trim()
            );
        }
        Err(e) => return Err(e.into()),
    };
    Ok(response.into_json()?)
}

/// Exchange a refresh token for a short-lived access token.
pub fn refresh_access_token(
    agent: &ureq::Agent,
    token_uri: &str,
    user: &AuthorizedUser,
) -> Result<String> {
    let token = post_token_form(
        agent,
        token_uri,
        &[
            ("client_id", user.client_id.as_str()),
            ("client_secret", user.client_secret.as_str()),
            ("refresh_token", user.refresh_token.as_str()),
            ("grant_type", "refresh_token"),
        ],
    )?;
    Ok(token.access_token)
}

/// Build the consent URL for the loopback flow.
pub fn authorize_url(
    auth_uri: &str,
    client_id: &str,
    redirect_uri: &str,
    state: &str,
) -> Result<url::Url> {
    let url = url::Url::parse_with_params(
        auth_uri,
        &[
            ("client_id", client_id),
            ("redirect_uri", redirect_uri),
            ("response_type", "code"),
            ("scope", SCOPE),
            ("access_type", "offline"),
            ("prompt", "consent"),
            ("state", state),
        ],
    )?;
    Ok(url)
}

/// Pull `code` out of the redirect request path, checking `state`.
pub fn code_from_redirect(path: &str, expected_state: &str) -> Result<String> {
    let url = url::Url::parse(&format!("http://127.0.0.1{}", path))?;
    let mut code = None;
    let mut state = None;
    let mut error = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "code" => code = Some(value.into_owned()),
            "state" => state = Some(value.into_owned()),
            "error" => error = Some(value.into_owned()),
            _ => {}
        }
    }
    if let Some(error) = error {
        bail!("Authorization was denied: {}", error);
    }
    if state.as_deref() != Some(expected_state) {
        bail!("Authorization response has a mismatched state parameter");
    }
    code.ok_or_else(|| anyhow::anyhow!("Authorization response has no code"))
}

/// Unguessable `state` nonce for the consent redirect.
fn random_state() -> String {
    let bytes: [u8; 32] = rand::thread_rng().r#gen();
    hex::encode(bytes)
}

/// Token endpoint for a client: its own `token_uri` when the client secret
/// names one, else the configured endpoint.
pub fn token_uri<'a>(secret: Option<&'a ClientSecret>, config: &'a GmailConfig) -> &'a str {
    secret
        .and_then(|s| s.token_uri.as_deref())
        .unwrap_or(&config.token_uri)
}

/// Run the loopback consent flow and return the authorized user.
pub fn run_consent_flow(secret: &ClientSecret, config: &GmailConfig) -> Result<AuthorizedUser> {
    let server = tiny_http::Server::http("127.0.0.1:0")
        .map_err(|e| anyhow::anyhow!("Failed to start local redirect listener: {}", e))?;
    let port = server
        .server_addr()
        .to_ip()
        .map(|addr| addr.port())
        .ok_or_else(|| anyhow::anyhow!("Local redirect listener has no TCP port"))?;
    let redirect_uri = format!("http://127.0.0.1:{}", port);
    let state = random_state();
    let auth_uri = secret.auth_uri.as_deref().unwrap_or(&config.auth_uri);
    let url = authorize_url(auth_uri, &secret.client_id, &redirect_uri, &state)?;

    println!("Authorize this app by visiting this URL:\n\n  {}\n", url);
    if open::that(url.as_str()).is_err() {
        println!("(Could not open a browser; copy the URL above.)");
    }
    println!("Waiting for authorization...");

    let code = loop {
        let request = server.recv()?;
        if request.url().starts_with("/favicon") {
            let _ = request.respond(tiny_http::Response::empty(tiny_http::StatusCode(404)));
            continue;
        }
        let result = code_from_redirect(request.url(), &state);
        let page = match &result {
            Ok(_) => "Authorization complete. You can close this tab.",
            Err(_) => "Authorization failed. Check the terminal for details.",
        };
        let _ = request.respond(tiny_http::Response::from_string(page));
        break result?;
    };

    let token = post_token_form(
        &agent(config),
        token_uri(Some(secret), config),
        &[
            ("code", code.as_str()),
            ("client_id", secret.client_id.as_str()),
            ("client_secret", secret.client_secret.as_str()),
            ("redirect_uri", redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
        ],
    )?;
    let refresh_token = token.refresh_token.ok_or_else(|| {
        anyhow::anyhow!("Google did not return a refresh token; revoke access and retry")
    })?;

    Ok(AuthorizedUser {
        kind: "authorized_user".to_string(),
        client_id: secret.client_id.clone(),
        client_secret: secret.client_secret.clone(),
        refresh_token,
    })
}

/// Obtain an access token: env override, then the saved refresh token, then
/// the consent flow (saving the new token).
pub fn access_token(config: &GmailConfig) -> Result<String> {
    if let Ok(token) = std::env::var(ACCESS_TOKEN_ENV) {
        if !token.is_empty() {
            return Ok(token);
        }
    }
    let token_path = resolve::token_json();
    let secret = load_client_secret(&resolve::credentials_json())?;
    let user = match load_token(&token_path)? {
        Some(user) => user,
        None => {
            let user = run_consent_flow(&secret, config)?;
            save_token(&token_path, &user)?;
            user
        }
    };
    refresh_access_token(&agent(config), token_uri(Some(&secret), config), &user)
}

/// Connect to Gmail for a live operation. Checks credentials before anything
/// touches the network.
pub fn connect() -> Result<GmailClient> {
    require_credentials()?;
    let config = config::load()?;
    let token = access_token(&config.gmail)?;
    Ok(GmailClient::new(&config.gmail, &token))
}

/// google-email auth
pub fn run() -> Result<()> {
    require_credentials()?;
    let config = config::load()?;
    let secret = load_client_secret(&resolve::credentials_json())?;
    let user = run_consent_flow(&secret, &config.gmail)?;
    let token_path = resolve::token_json();
    save_token(&token_path, &user)?;
    println!("\u{2713} Saved token to {}", token_path.display());
    Ok(())
}
