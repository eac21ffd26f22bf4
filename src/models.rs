use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ItemRepr")]
pub struct Item {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ItemRepr {
    Bare(String),
    Record {
        text: String,
        #[serde(default)]
        time: Option<String>,
        #[serde(default)]
        score: Option<Number>,
        #[serde(default)]
        date: Option<String>,
    },
}

impl From<ItemRepr> for Item {
    fn from(repr: ItemRepr) -> Self {
        match repr {
            ItemRepr::Bare(text) => Item::text(text),
            ItemRepr::Record {
                text,
                time,
                score,
                date,
            } => Item {
                text,
                time,
                score,
                date,
            },
        }
    }
}

impl Item {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            time: None,
            score: None,
            date: None,
        }
    }

    pub fn with_time(mut self, time: impl Into<String>) -> Self {
        self.time = Some(time.into());
        self
    }

    pub fn with_score(mut self, score: i64) -> Self {
        self.score = Some(Number::from(score));
        self
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }
}

pub fn items_from_value(value: Value) -> Result<Vec<Item>, serde_json::Error> {
    let array = match value {
        Value::Object(mut map) => match map.remove("history").or_else(|| map.remove("favorites")) {
            Some(Value::Null) => Value::Array(Vec::new()),
            Some(inner) => inner,
            None => Value::Object(map),
        },
        Value::Null => Value::Array(Vec::new()),
        other => other,
    };
    serde_json::from_value(array)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Excuse,
    Apology,
}

impl ContentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Excuse => "excuse",
            Self::Apology => "apology",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "excuse" => Some(Self::Excuse),
            "apology" => Some(Self::Apology),
            _ => None,
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelKind {
    History,
    Favorites,
    Rankings,
    Calendar,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExcuseRequest {
    pub scenario: String,
    pub urgency: String,
    pub language: String,
    pub style: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExcuseResponse {
    pub english: String,
    #[serde(default)]
    pub translated: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApologyRequest {
    pub context: String,
    pub tone: String,
    #[serde(rename = "type")]
    pub message_type: String,
    pub style: String,
    pub language: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdjustToneRequest {
    pub tone: String,
    pub sentence: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdjustToneResponse {
    #[serde(default)]
    pub adjusted: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompleteApologyRequest {
    pub start: String,
    pub tone: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompleteApologyResponse {
    #[serde(default)]
    pub completed: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GuiltScoreRequest {
    pub text: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GuiltScoreResponse {
    #[serde(default)]
    pub feedback: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScreenshotRequest {
    pub theme: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MemoryResponse {
    #[serde(default)]
    pub matches: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmergencyRequest {
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScheduleRequest {
    pub date: String,
    pub time: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SaveHistoryRequest {
    pub text: String,
    pub time: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LatestApologyRequest {
    pub text: String,
}
