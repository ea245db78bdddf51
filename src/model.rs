use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Available,
    Reserved,
    Sold,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Available, Status::Reserved, Status::Sold];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Available => "available",
            Status::Reserved => "reserved",
            Status::Sold => "sold",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "available" => Ok(Status::Available),
            "reserved" => Ok(Status::Reserved),
            "sold" => Ok(Status::Sold),
            other => Err(format!("unknown status '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Mk,
    En,
    Sq,
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mk" => Ok(Language::Mk),
            "en" => Ok(Language::En),
            "sq" => Ok(Language::Sq),
            other => Err(format!("unsupported language '{}'", other)),
        }
    }
}

/// Column subject label in each supported language. Any of them may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subjects {
    pub mk: String,
    pub en: String,
    pub sq: String,
}

impl Subjects {
    pub fn get(&self, language: Language) -> &str {
        match language {
            Language::Mk => &self.mk,
            Language::En => &self.en,
            Language::Sq => &self.sq,
        }
    }

    /// Label in `language`, falling back to the canonical one when blank.
    pub fn label(&self, language: Language) -> &str {
        let l = self.get(language);
        if l.is_empty() {
            &self.mk
        } else {
            l
        }
    }

    /// All three labels lowercased and joined, for substring matching.
    pub fn haystack(&self) -> String {
        format!("{} | {} | {}", self.mk, self.en, self.sq).to_lowercase()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSchema {
    pub column_index: usize,
    pub filter_keyword: String,
    pub is_visible: bool,
    pub subjects: Subjects,
}

impl ColumnSchema {
    /// Key used in the raw-field map. Blank canonical labels get a positional key.
    pub fn field_key(&self) -> String {
        if self.subjects.mk.is_empty() {
            format!("column_{}", self.column_index)
        } else {
            self.subjects.mk.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawField {
    pub value: String,
    pub column_index: usize,
    pub filter_keyword: String,
    pub is_visible: bool,
    pub subjects: Subjects,
}

/// Which rule settled a normalized field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", content = "detail", rename_all = "snake_case")]
pub enum Detection {
    Keyword(String),
    Subject(String),
    Fallback(String),
    Ranked(String),
    Default(String),
    Exempt,
}

impl fmt::Display for Detection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Detection::Keyword(d) => write!(f, "keyword:{}", d),
            Detection::Subject(d) => write!(f, "subject:{}", d),
            Detection::Fallback(d) => write!(f, "fallback:{}", d),
            Detection::Ranked(d) => write!(f, "ranked:{}", d),
            Detection::Default(d) => write!(f, "default:{}", d),
            Detection::Exempt => f.write_str("exempt"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Provenance {
    pub bedrooms: Option<Detection>,
    pub floor: Option<Detection>,
    pub area: Option<Detection>,
    pub status: Option<Detection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApartmentRecord {
    pub id: String,
    pub row_index: usize,
    pub is_office_space: bool,
    pub bedrooms: Option<u8>,
    pub floor: Option<i32>,
    pub area: Option<f64>,
    pub status: Status,
    pub raw_fields: IndexMap<String, RawField>,
    pub provenance: Provenance,
}

impl ApartmentRecord {
    pub fn area_detection_method(&self) -> Option<String> {
        self.provenance.area.as_ref().map(|d| d.to_string())
    }

    /// Raw value of the column the status was read from, if any.
    pub fn status_code(&self) -> Option<&str> {
        match &self.provenance.status {
            Some(Detection::Keyword(label) | Detection::Subject(label) | Detection::Fallback(label)) => {
                self.raw_fields.get(label).map(|f| f.value.trim())
            }
            _ => None,
        }
    }

    /// Visible, non-empty raw fields labelled in `language`, in column order.
    pub fn visible_fields(&self, language: Language) -> Vec<(String, String)> {
        self.raw_fields
            .values()
            .filter(|f| f.is_visible && !f.value.is_empty())
            .map(|f| (f.subjects.label(language).to_string(), f.value.clone()))
            .collect()
    }
}
