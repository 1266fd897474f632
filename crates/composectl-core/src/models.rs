//! Response models
//!
//! The API returns HAL documents: single entities at the top level, lists
//! under `_embedded.<collection>`. Models are lenient: missing
//! fields default, unknown fields are ignored, and membership lists stay raw
//! JSON so they print exactly as the server sent them.

use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

/// Ids are opaque; accept strings or numbers and keep the text as sent.
/// `null` reads as empty.
fn lenient_text<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

/// Optional text with the same leniency; `null` reads as absent.
fn lenient_opt_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    })
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Account {
    #[serde(deserialize_with = "lenient_text")]
    pub id: String,
    #[serde(deserialize_with = "lenient_opt_text")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    #[serde(deserialize_with = "lenient_text")]
    pub id: String,
    #[serde(deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(deserialize_with = "lenient_opt_text")]
    pub email: Option<String>,
    #[serde(deserialize_with = "lenient_opt_text")]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Team {
    #[serde(deserialize_with = "lenient_text")]
    pub id: String,
    #[serde(deserialize_with = "lenient_text")]
    pub name: String,
    /// Members as returned by the server
    pub users: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Deployment {
    #[serde(deserialize_with = "lenient_text")]
    pub id: String,
    #[serde(deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(rename = "type", deserialize_with = "lenient_text")]
    pub kind: String,
}

/// A user role on a deployment, with the users holding it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Role {
    #[serde(deserialize_with = "lenient_text")]
    pub name: String,
    pub users: Value,
}

/// A team role on a deployment, with the teams holding it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamRole {
    #[serde(deserialize_with = "lenient_text")]
    pub name: String,
    pub teams: Value,
}

/// Pull `_embedded.<collection>` out of a list response.
///
/// A missing or `null` collection is an empty list.
pub fn embedded<T: DeserializeOwned>(body: &Value, collection: &str) -> Result<Vec<T>> {
    match body.get("_embedded").and_then(|e| e.get(collection)) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(items) => Ok(serde_json::from_value(items.clone())?),
    }
}

/// Decode a single entity from a response body
pub fn entity<T: DeserializeOwned + Default>(body: &Value) -> Result<T> {
    if body.is_null() {
        return Ok(T::default());
    }
    Ok(serde_json::from_value(body.clone())?)
}
