use charybdis::macros::charybdis_model;
use charybdis::types::{Text, Timestamp, Uuid};
use chrono::{NaiveDate, Utc};
use email_address::EmailAddress;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;

use crate::constants::INBOX;
use crate::errors::PortfolioError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Contact-form submission shown in the dashboard inbox.
#[charybdis_model(
    table_name = messages,
    partition_keys = [inbox],
    clustering_keys = [id],
    global_secondary_indexes = []
)]
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
pub struct Message {
    #[serde(skip)]
    pub inbox: Text,

    pub id: Uuid,
    pub name: Text,
    pub email: Text,
    pub subject: Text,
    pub message: Text,
    pub date: Text,
    pub read: bool,

    #[serde(skip_serializing, default = "chrono::Utc::now")]
    pub created_at: Timestamp,
}

/// Body of the inbox create and update endpoints.
///
/// `id` is kept raw: the public form sends ids of its own, which are ignored on create.
#[derive(Deserialize, Default, Debug)]
pub struct MessageParams {
    #[serde(default)]
    pub id: Option<Value>,

    #[serde(default)]
    pub name: Text,

    #[serde(default)]
    pub email: Text,

    #[serde(default)]
    pub subject: Text,

    #[serde(default)]
    pub message: Text,

    #[serde(default)]
    pub date: Text,

    #[serde(default)]
    pub read: bool,
}

impl MessageParams {
    /// Id of the stored message an update targets.
    pub fn message_id(&self) -> Result<Uuid, PortfolioError> {
        match &self.id {
            None | Some(Value::Null) => Err(PortfolioError::InvalidRequest("Message ID is required".to_string())),
            Some(Value::String(id)) => Uuid::parse_str(id)
                .map_err(|_| PortfolioError::InvalidRequest(format!("`{}` is not a message id", id))),
            Some(id) => Err(PortfolioError::InvalidRequest(format!("`{}` is not a message id", id))),
        }
    }
}

impl Message {
    /// Builds a public submission for insert. The server owns `id`, `inbox` and `created_at`.
    pub fn from_submission(params: MessageParams) -> Result<Self, PortfolioError> {
        let date = if params.date.trim().is_empty() {
            Utc::now().format(DATE_FORMAT).to_string()
        } else {
            params.date
        };

        let message = Self {
            inbox: INBOX.to_string(),
            id: Uuid::new_v4(),
            name: params.name,
            email: params.email,
            subject: params.subject,
            message: params.message,
            date,
            read: params.read,
            created_at: Utc::now(),
        };

        message.validate()?;

        Ok(message)
    }

    pub fn validate(&self) -> Result<(), PortfolioError> {
        for (field, value) in [("name", &self.name), ("email", &self.email), ("message", &self.message)] {
            if value.trim().is_empty() {
                return Err(PortfolioError::InvalidRequest(format!("{} is required", field)));
            }
        }

        if !EmailAddress::is_valid(self.email.trim()) {
            return Err(PortfolioError::InvalidRequest(format!("`{}` is not a valid email", self.email)));
        }

        if NaiveDate::parse_from_str(&self.date, DATE_FORMAT).is_err() {
            return Err(PortfolioError::InvalidRequest(format!(
                "date must be formatted as YYYY-MM-DD, got `{}`",
                self.date
            )));
        }

        Ok(())
    }

    /// Copies the fields the dashboard may edit onto a stored message.
    pub fn apply_update(&mut self, update: MessageParams) -> Result<(), PortfolioError> {
        self.name = update.name;
        self.email = update.email;
        self.subject = update.subject;
        self.message = update.message;
        self.read = update.read;

        if !update.date.trim().is_empty() {
            self.date = update.date;
        }

        self.validate()
    }

    /// Inbox order: newest `date` first, then newest `created_at`.
    pub fn newest_first(a: &Message, b: &Message) -> Ordering {
        b.date.cmp(&a.date).then_with(|| b.created_at.cmp(&a.created_at))
    }
}
