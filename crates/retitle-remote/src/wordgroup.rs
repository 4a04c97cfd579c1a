use reqwest::blocking::Client;
use reqwest::header::AUTHORIZATION;
use retitle_core::{RenameRule, RuleGroup, RuleStore};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{RemoteError, Result};

/// Envelope code the rule API uses for success.
pub const SUCCESS_CODE: i64 = 20000;

/// Word unit type for a plain replacement.
pub const UNIT_TYPE_PLAIN: u16 = 200;

/// Word unit type for a replacement followed by episode offset arithmetic.
pub const UNIT_TYPE_OFFSET: u16 = 300;

const API_SUFFIX: &str = "/api/v1";

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    code: i64,
    #[serde(default)]
    message: String,
    data: Option<T>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordGroup {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub word_group_type: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordGroupPage {
    #[serde(default)]
    pub total: i64,
    #[serde(default)]
    pub page_num: i64,
    #[serde(default)]
    pub page_size: i64,
    #[serde(default)]
    pub list: Vec<WordGroup>,
}

/// One stored rule, as the rule API expects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordUnit {
    pub id: i64,
    pub word_group_id: i64,
    pub be_replaced: String,
    pub replace: String,
    pub front: String,
    pub back: String,
    pub offset: String,
    pub enabled: bool,
    #[serde(rename = "type")]
    pub unit_type: u16,
    pub regex: bool,
    pub note: String,
}

impl WordUnit {
    /// Builds the unit storing `rule` in group `word_group_id`.
    #[must_use]
    pub fn from_rule(word_group_id: i64, rule: &RenameRule) -> Self {
        Self {
            id: 0,
            word_group_id,
            be_replaced: rule.match_pattern.clone(),
            replace: rule.replace_template.clone(),
            front: rule.anchor_prefix.clone(),
            back: rule.anchor_suffix.clone(),
            offset: offset_expression(rule.offset),
            enabled: true,
            unit_type: if rule.has_offset() {
                UNIT_TYPE_OFFSET
            } else {
                UNIT_TYPE_PLAIN
            },
            regex: true,
            note: String::new(),
        }
    }
}

/// Offset arithmetic as the rule engine reads it: `""`, `EP+2` or `EP-3`.
#[must_use]
pub fn offset_expression(offset: i32) -> String {
    match offset {
        0 => String::new(),
        n if n > 0 => format!("EP+{n}"),
        n => format!("EP{n}"),
    }
}

/// Appends `/api/v1` unless the URL already ends with it.
#[must_use]
pub fn normalize_base_url(base_url: &str) -> String {
    let trimmed = base_url.trim();
    if trimmed.ends_with(API_SUFFIX) {
        trimmed.to_string()
    } else {
        format!("{}{API_SUFFIX}", trimmed.trim_end_matches('/'))
    }
}

/// Checks the HTTP status and envelope code, returning the payload.
fn decode_envelope<T: DeserializeOwned>(status: u16, body: &str) -> Result<Option<T>> {
    let envelope = serde_json::from_str::<Envelope<T>>(body);

    if !(200..300).contains(&status) {
        let message = match envelope {
            Ok(env) if !env.message.is_empty() => env.message,
            _ => body.to_string(),
        };
        return Err(RemoteError::Status { status, message });
    }

    let envelope = envelope?;
    if envelope.code != SUCCESS_CODE {
        return Err(RemoteError::Rejected {
            code: envelope.code,
            message: envelope.message,
        });
    }
    Ok(envelope.data)
}

/// Blocking client for the word-group rule API.
pub struct WordGroupClient {
    client: Client,
    base_url: String,
    auth_token: String,
}

impl WordGroupClient {
    /// Creates a client for the API at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::MissingCredential` when the URL or token is
    /// empty, or `RemoteError::Http` if the HTTP client cannot be built.
    pub fn new(base_url: &str, auth_token: impl Into<String>) -> Result<Self> {
        if base_url.trim().is_empty() {
            return Err(RemoteError::MissingCredential("API_BASE_URL"));
        }
        let auth_token = auth_token.into();
        if auth_token.trim().is_empty() {
            return Err(RemoteError::MissingCredential("AUTH_TOKEN"));
        }
        let client = Client::builder()
            .user_agent(concat!("retitle/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: normalize_base_url(base_url),
            auth_token,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::blocking::RequestBuilder,
    ) -> Result<Option<T>> {
        let response = request.header(AUTHORIZATION, &self.auth_token).send()?;
        let status = response.status().as_u16();
        let body = response.text()?;
        decode_envelope(status, &body)
    }

    /// Lists every word group.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a rejected request.
    pub fn list_groups(&self) -> Result<Vec<WordGroup>> {
        let request = self.client.get(self.url("/wordGroup/page")).query(&[
            ("pageNum", "1"),
            ("pageSize", "9999"),
            ("keyword", ""),
        ]);
        let page: Option<WordGroupPage> = self.send(request)?;
        Ok(page.unwrap_or_default().list)
    }

    /// Creates a word group titled `title`.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a rejected request, or a
    /// success envelope without the created group.
    pub fn create(&self, title: &str) -> Result<WordGroup> {
        let request = self
            .client
            .post(self.url("/wordGroup/add"))
            .json(&serde_json::json!({ "title": title }));
        self.send::<WordGroup>(request)?.ok_or(RemoteError::Rejected {
            code: SUCCESS_CODE,
            message: "response carried no word group".into(),
        })
    }

    /// Adds one word unit.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a rejected unit.
    pub fn add_unit(&self, unit: &WordUnit) -> Result<()> {
        debug!(group = unit.word_group_id, pattern = %unit.be_replaced, "adding word unit");
        let request = self.client.post(self.url("/wordUnit/add")).json(unit);
        self.send::<IgnoredAny>(request)?;
        Ok(())
    }
}

impl RuleStore for WordGroupClient {
    fn find_group(&self, title: &str) -> retitle_core::Result<Option<RuleGroup>> {
        let groups = self.list_groups().map_err(RemoteError::into_storage)?;
        Ok(groups
            .into_iter()
            .find(|g| g.title == title)
            .map(|g| RuleGroup {
                id: g.id,
                title: g.title,
            }))
    }

    fn create_group(&mut self, title: &str) -> retitle_core::Result<RuleGroup> {
        let group = self.create(title).map_err(RemoteError::into_storage)?;
        Ok(RuleGroup {
            id: group.id,
            title: group.title,
        })
    }

    fn add_rule(&mut self, group: &RuleGroup, rule: &RenameRule) -> retitle_core::Result<()> {
        self.add_unit(&WordUnit::from_rule(group.id, rule))
            .map_err(RemoteError::into_storage)
    }
}
