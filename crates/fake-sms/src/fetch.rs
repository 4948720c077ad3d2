//! HTTP access to the listing and messages pages.
//!
//! Not a browser. Plain GET requests with a desktop user-agent. There are
//! no retries; a failed request surfaces as [`SmsError::Fetch`] and the
//! caller decides whether to try again.

use std::time::Duration;

use reqwest::header::{COOKIE, SET_COOKIE};

use crate::types::{SmsError, SmsResult};

pub const DEFAULT_BASE_URL: &str = "https://receive-smss.com/";
pub const DEFAULT_SMS_PATH: &str = "sms/";
pub const DEFAULT_COOKIE_NAME: &str = "__cfduid";
pub const DEFAULT_TIMEOUT_MS: u64 = 15_000;

const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
                          AppleWebKit/537.36 (KHTML, like Gecko) \
                          Chrome/131.0.0.0 Safari/537.36";

/// Where and how to reach the remote site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    /// Listing page URL; also the prefix of every messages page.
    pub base_url: String,
    /// Path segment between the base URL and the number.
    pub sms_path: String,
    /// Cookie harvested from the listing page and sent with message requests.
    pub cookie_name: String,
    pub timeout_ms: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            sms_path: DEFAULT_SMS_PATH.to_string(),
            cookie_name: DEFAULT_COOKIE_NAME.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl FetchConfig {
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        let mut url = url.into();
        if !url.ends_with('/') {
            url.push('/');
        }
        self.base_url = url;
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }
}

/// Session cookie carried from the listing response to a messages request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCookie {
    pub name: String,
    /// Empty when the site did not set the cookie.
    pub value: String,
}

impl SessionCookie {
    /// `name=value`, ready for a `Cookie` header.
    pub fn header_value(&self) -> String {
        format!("{}={}", self.name, self.value)
    }
}

/// HTTP client for the two remote pages.
#[derive(Clone)]
pub struct Fetcher {
    client: reqwest::Client,
    config: FetchConfig,
}

impl Fetcher {
    pub fn new(config: FetchConfig) -> SmsResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .redirect(reqwest::redirect::Policy::limited(5))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| SmsError::Fetch {
                url: config.base_url.clone(),
                message: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// URL of the messages page for `number`, with every `+` stripped.
    pub fn messages_url(&self, number: &str) -> String {
        format!(
            "{}{}{}/",
            self.config.base_url,
            self.config.sms_path,
            number.replace('+', "")
        )
    }

    /// GET the listing page body.
    pub async fn fetch_number_listing(&self) -> SmsResult<String> {
        let url = &self.config.base_url;
        let resp = self.get(url, None).await?;
        read_body(url, resp).await
    }

    /// GET the listing page only to pick up the session cookie.
    ///
    /// The site does not always set it, so a missing cookie yields an empty
    /// value rather than an error.
    pub async fn harvest_session_cookie(&self) -> SmsResult<SessionCookie> {
        let url = &self.config.base_url;
        let resp = self.get(url, None).await?;

        let set_cookies: Vec<&str> = resp
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect();
        let value = find_cookie(&set_cookies, &self.config.cookie_name).unwrap_or_default();
        if value.is_empty() {
            tracing::debug!("Listing response did not set '{}'", self.config.cookie_name);
        }

        Ok(SessionCookie {
            name: self.config.cookie_name.clone(),
            value,
        })
    }

    /// GET the messages page for `number`, presenting `cookie`.
    pub async fn fetch_messages_page(
        &self,
        number: &str,
        cookie: &SessionCookie,
    ) -> SmsResult<String> {
        let url = self.messages_url(number);
        let resp = self.get(&url, Some(cookie)).await?;
        read_body(&url, resp).await
    }

    /// Harvest the session cookie, then fetch the messages page with it.
    pub async fn fetch_messages_for(&self, number: &str) -> SmsResult<String> {
        let cookie = self.harvest_session_cookie().await?;
        self.fetch_messages_page(number, &cookie).await
    }

    async fn get(
        &self,
        url: &str,
        cookie: Option<&SessionCookie>,
    ) -> SmsResult<reqwest::Response> {
        tracing::debug!("GET {url}");
        let mut builder = self.client.get(url);
        if let Some(cookie) = cookie {
            builder = builder.header(COOKIE, cookie.header_value());
        }

        let resp = builder.send().await.map_err(|e| fetch_error(url, e))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(SmsError::Fetch {
                url: url.to_string(),
                message: format!("HTTP {status}"),
            });
        }
        Ok(resp)
    }
}

async fn read_body(url: &str, resp: reqwest::Response) -> SmsResult<String> {
    resp.text().await.map_err(|e| fetch_error(url, e))
}

fn fetch_error(url: &str, err: reqwest::Error) -> SmsError {
    let message = if err.is_timeout() {
        "request timed out".to_string()
    } else if err.is_connect() {
        format!("connection failed: {err}")
    } else {
        err.to_string()
    };
    SmsError::Fetch {
        url: url.to_string(),
        message,
    }
}

/// Value of the cookie `name` among raw `Set-Cookie` header values.
/// The last occurrence wins.
fn find_cookie(set_cookies: &[&str], name: &str) -> Option<String> {
    set_cookies
        .iter()
        .filter_map(|header| {
            let pair = header.split(';').next()?;
            let (key, value) = pair.split_once('=')?;
            (key.trim() == name).then(|| value.trim().to_string())
        })
        .last()
}
