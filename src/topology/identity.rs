use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Stable short code of a direction (e.g., `D07`).
///
/// The numeric suffix drives the final ordering of the catalog; the topology
/// loader rejects ids that do not carry one.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DirectionId(pub String);

impl DirectionId {
    /// Numeric portion of the id (`D07` -> 7), if the id is well formed.
    pub fn number(&self) -> Option<u32> {
        let digits = self.0.strip_prefix('D')?;
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DirectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DirectionId {
    fn from(value: &str) -> Self {
        DirectionId(value.to_string())
    }
}

/// Lifecycle phase of a technology or direction.
///
/// Known variants map to the labels used in the documents; `Other` keeps an
/// unexpected label verbatim so it survives into the output unchanged.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum Stage {
    #[default]
    Rough,
    Finish,
    Other(String),
}

/// Review state of a technology document.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum Status {
    #[default]
    Draft,
    Review,
    Approved,
    Other(String),
}

impl Stage {
    pub fn as_str(&self) -> &str {
        match self {
            Stage::Rough => "черновая",
            Stage::Finish => "чистовая",
            Stage::Other(value) => value.as_str(),
        }
    }

    pub fn from_label(value: &str) -> Self {
        match value {
            "черновая" => Stage::Rough,
            "чистовая" => Stage::Finish,
            other => Stage::Other(other.to_string()),
        }
    }
}

impl Status {
    pub fn as_str(&self) -> &str {
        match self {
            Status::Draft => "draft",
            Status::Review => "review",
            Status::Approved => "approved",
            Status::Other(value) => value.as_str(),
        }
    }

    pub fn from_label(value: &str) -> Self {
        match value {
            "draft" => Status::Draft,
            "review" => Status::Review,
            "approved" => Status::Approved,
            other => Status::Other(other.to_string()),
        }
    }
}

impl Serialize for Stage {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Stage {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(Self::from_label(&value))
    }
}

impl Serialize for Status {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Status {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(Self::from_label(&value))
    }
}
