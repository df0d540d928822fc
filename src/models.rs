use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Display {
    #[default]
    None,
    Block,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Hidden,
    Visible,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FormValue {
    Text { value: String },
    File {
        file_name: String,
        content_type: Option<String>,
        bytes: Vec<u8>,
    },
}

impl FormValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text {
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormPayload {
    pub fields: BTreeMap<String, FormValue>,
}

impl FormPayload {
    pub fn text(&self, name: &str) -> Option<&str> {
        match self.fields.get(name)? {
            FormValue::Text { value } => Some(value),
            FormValue::File { .. } => None,
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
}

impl SelectOption {
    pub fn same(text: &str) -> Self {
        Self {
            label: text.to_string(),
            value: text.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DivisionRequest {
    pub division: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScribesProviders {
    pub scribes: Vec<String>,
    pub providers: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Event {
    default_prevented: bool,
}

impl Event {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}
