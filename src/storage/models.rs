/// Catalog data models shared by both storage backends
use crate::classify::FileCategory;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// School subject, a fixed vocabulary
///
/// Stored and serialized as the Chinese labels the frontend sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Subject {
    #[serde(rename = "语文")]
    Chinese,
    #[serde(rename = "数学")]
    Math,
    #[serde(rename = "英语")]
    English,
    #[serde(rename = "科学")]
    Science,
    #[serde(rename = "历史")]
    History,
    #[serde(rename = "地理")]
    Geography,
    #[serde(rename = "道法")]
    Civics,
}

impl Subject {
    pub fn as_str(&self) -> &'static str {
        match self {
            Subject::Chinese => "语文",
            Subject::Math => "数学",
            Subject::English => "英语",
            Subject::Science => "科学",
            Subject::History => "历史",
            Subject::Geography => "地理",
            Subject::Civics => "道法",
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Subject {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "语文" => Ok(Subject::Chinese),
            "数学" => Ok(Subject::Math),
            "英语" => Ok(Subject::English),
            "科学" => Ok(Subject::Science),
            "历史" => Ok(Subject::History),
            "地理" => Ok(Subject::Geography),
            "道法" => Ok(Subject::Civics),
            _ => Err(format!("Unknown subject: {}", s)),
        }
    }
}

/// Grade level: years seven through nine, each split into a first (上)
/// and second (下) term
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    #[serde(rename = "七上")]
    G7Term1,
    #[serde(rename = "七下")]
    G7Term2,
    #[serde(rename = "八上")]
    G8Term1,
    #[serde(rename = "八下")]
    G8Term2,
    #[serde(rename = "九上")]
    G9Term1,
    #[serde(rename = "九下")]
    G9Term2,
}

impl Grade {
    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::G7Term1 => "七上",
            Grade::G7Term2 => "七下",
            Grade::G8Term1 => "八上",
            Grade::G8Term2 => "八下",
            Grade::G9Term1 => "九上",
            Grade::G9Term2 => "九下",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Grade {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "七上" => Ok(Grade::G7Term1),
            "七下" => Ok(Grade::G7Term2),
            "八上" => Ok(Grade::G8Term1),
            "八下" => Ok(Grade::G8Term2),
            "九上" => Ok(Grade::G9Term1),
            "九下" => Ok(Grade::G9Term2),
            _ => Err(format!("Unknown grade: {}", s)),
        }
    }
}

/// A cataloged resource: one uploaded file plus its descriptive metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: String,
    pub title: String,
    pub description: String,
    pub subject: Subject,
    pub grade: Grade,
    pub uploader: String,
    /// Generated name under the content directory, not the original filename
    pub file_name: String,
    pub file_type: FileCategory,
    pub file_size: i64,
    pub download_count: i64,
    pub uploaded_at: DateTime<Utc>,
}

/// Fields for a resource about to be created
///
/// Id, timestamp, and download counter are store-assigned.
#[derive(Debug, Clone)]
pub struct NewResource {
    pub title: String,
    pub description: String,
    pub subject: Subject,
    pub grade: Grade,
    pub uploader: String,
    pub file_name: String,
    pub file_type: FileCategory,
    pub file_size: i64,
}

/// A star-rated comment on a resource
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub resource_id: String,
    pub author: String,
    pub content: String,
    pub rating: i64,
    pub created_at: DateTime<Utc>,
}

/// Fields for a comment about to be created
#[derive(Debug, Clone)]
pub struct NewComment {
    pub resource_id: String,
    pub author: String,
    pub content: String,
    pub rating: i64,
}

/// Catalog listing filter; `None` fields mean no restriction
#[derive(Debug, Clone, Copy, Default)]
pub struct ResourceFilter {
    pub subject: Option<Subject>,
    pub grade: Option<Grade>,
}

impl ResourceFilter {
    pub fn matches(&self, resource: &Resource) -> bool {
        self.subject.map_or(true, |s| resource.subject == s)
            && self.grade.map_or(true, |g| resource.grade == g)
    }
}
