use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::grouping::{GroupKey, Record};

/// A single result from the word API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordEntry {
    pub word: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<i64>,
    #[serde(
        rename = "numSyllables",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub num_syllables: Option<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl WordEntry {
    pub fn new(word: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            score: None,
            num_syllables: None,
            tags: Vec::new(),
        }
    }

    pub fn with_syllables(mut self, count: i64) -> Self {
        self.num_syllables = Some(count);
        self
    }
}

impl Record for WordEntry {
    fn field(&self, name: &str) -> Option<GroupKey> {
        match name {
            "word" => Some(GroupKey::from(self.word.as_str())),
            "score" => self.score.map(GroupKey::from),
            "numSyllables" | "num_syllables" => self.num_syllables.map(GroupKey::from),
            _ => None,
        }
    }
}

/// Which relation to ask the word API for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LookupMode {
    Rhymes,
    Synonyms,
}

impl LookupMode {
    /// Query parameter selecting this relation
    pub fn query_param(&self) -> &'static str {
        match self {
            LookupMode::Rhymes => "rel_rhy",
            LookupMode::Synonyms => "ml",
        }
    }

    /// Rhymes are shown grouped by syllable count, synonyms as a flat list
    pub fn is_grouped(&self) -> bool {
        matches!(self, LookupMode::Rhymes)
    }
}

impl fmt::Display for LookupMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupMode::Rhymes => write!(f, "rhymes"),
            LookupMode::Synonyms => write!(f, "synonyms"),
        }
    }
}

impl FromStr for LookupMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rhymes" | "rhyme" | "r" => Ok(LookupMode::Rhymes),
            "synonyms" | "synonym" | "s" => Ok(LookupMode::Synonyms),
            other => anyhow::bail!("unknown lookup mode: {}", other),
        }
    }
}
