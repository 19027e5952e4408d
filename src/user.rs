//! User record returned by the booking API.
//!
//! The client treats the record as opaque: it is stored, persisted and handed
//! to views, never validated. The accessors below only read the fields views
//! commonly display (`id`, `email`, names, avatar).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The authenticated user's record, as the server sent it.
///
/// Every field is kept, including ones this crate knows nothing about, so a
/// record survives a round-trip through storage unchanged.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct User {
    fields: Map<String, Value>,
}

impl User {
    /// Wraps a JSON object as a user record.
    pub fn from_fields(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Builds a user from a JSON value. Returns `None` unless it is an object.
    ///
    /// # Example
    ///
    /// ```
    /// # use dogsitter_client::User;
    /// let user = User::from_value(serde_json::json!({"id": 1})).unwrap();
    /// assert_eq!(user.id(), Some(&serde_json::json!(1)));
    /// assert!(User::from_value(serde_json::json!("nope")).is_none());
    /// ```
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self { fields }),
            _ => None,
        }
    }

    /// Raw field access.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// All fields of the record.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Consumes the record, returning its JSON representation.
    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }

    /// Server-side identifier, number or string depending on the backend.
    pub fn id(&self) -> Option<&Value> {
        self.fields.get("id").filter(|v| !v.is_null())
    }

    pub fn email(&self) -> Option<&str> {
        self.str_field("email")
    }

    pub fn first_name(&self) -> Option<&str> {
        self.str_field("first_name")
    }

    pub fn last_name(&self) -> Option<&str> {
        self.str_field("last_name")
    }

    /// Absolute avatar URL as resolved by the server.
    pub fn avatar_url(&self) -> Option<&str> {
        self.str_field("avatar_url")
    }

    /// Avatar URL, or `fallback` when the record has none.
    pub fn avatar_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.avatar_url().unwrap_or(fallback)
    }

    /// Returns a display name for the user.
    ///
    /// Prefers "first last", then whichever name part exists, then the email,
    /// and finally the id.
    ///
    /// # Example
    ///
    /// ```
    /// # use dogsitter_client::User;
    /// let user = User::from_value(serde_json::json!({
    ///     "id": 7,
    ///     "email": "anna@example.com",
    ///     "first_name": "Anna",
    ///     "last_name": "Petrova"
    /// })).unwrap();
    /// assert_eq!(user.display_name(), "Anna Petrova");
    /// ```
    pub fn display_name(&self) -> String {
        match (self.first_name(), self.last_name()) {
            (Some(first), Some(last)) => format!("{} {}", first, last),
            (Some(name), None) | (None, Some(name)) => name.to_string(),
            (None, None) => self
                .email()
                .map(str::to_string)
                .or_else(|| self.id().map(value_to_string))
                .unwrap_or_default(),
        }
    }

    /// Returns the user's initials for avatar placeholders.
    ///
    /// Uses the first letters of first and last name when both exist,
    /// otherwise the first two characters of the display name.
    pub fn initials(&self) -> String {
        if let (Some(first), Some(last)) = (self.first_name(), self.last_name()) {
            let first = first.chars().next().unwrap_or('?');
            let last = last.chars().next().unwrap_or('?');
            return format!("{}{}", first, last).to_uppercase();
        }

        let name = self.display_name();
        if name.is_empty() {
            "??".to_string()
        } else {
            name.chars().take(2).collect::<String>().to_uppercase()
        }
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.fields
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
