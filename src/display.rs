//! Turning lookup results into what the user sees.

use serde::Serialize;
use std::fmt;

use crate::consts::{LOADING_TEXT, NO_RESULTS_TEXT, SYLLABLES_FIELD, SYLLABLE_UNIT};
use crate::grouping::{group, EvaluationError, GroupKey, GroupSelector};
use crate::words::{LookupMode, WordEntry};

/// Plural suffix for a count: empty only when the count is exactly 1
pub fn pluralize(count: f64) -> &'static str {
    if count == 1.0 {
        ""
    } else {
        "s"
    }
}

/// Heading for a group, e.g. "1 syllable", "3 syllables" or "unknown syllables".
/// Non-numeric keys always take the plural form.
pub fn group_heading(key: &GroupKey, unit: &str) -> String {
    let suffix = key.as_number().map(pluralize).unwrap_or("s");
    format!("{} {}{}", key, unit, suffix)
}

/// A word shown in a list, with an identity that is stable across renders
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListItem {
    pub id: String,
    pub word: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub heading: String,
    pub items: Vec<ListItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "content", rename_all = "snake_case")]
pub enum DisplayList {
    Empty,
    Grouped(Vec<Section>),
    Flat(Vec<ListItem>),
}

impl DisplayList {
    /// All items in display order
    pub fn items(&self) -> Vec<&ListItem> {
        match self {
            DisplayList::Empty => Vec::new(),
            DisplayList::Grouped(sections) => sections.iter().flat_map(|s| s.items.iter()).collect(),
            DisplayList::Flat(items) => items.iter().collect(),
        }
    }

    /// Item at a 1-based position across the whole list
    pub fn item_at(&self, position: usize) -> Option<&ListItem> {
        position
            .checked_sub(1)
            .and_then(|index| self.items().into_iter().nth(index))
    }

    pub fn len(&self) -> usize {
        self.items().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Build the display list for a lookup result.
///
/// Rhymes are grouped by syllable count; synonyms stay a flat list in API order.
pub fn build_display(entries: &[WordEntry], mode: LookupMode) -> Result<DisplayList, EvaluationError> {
    if entries.is_empty() {
        return Ok(DisplayList::Empty);
    }

    if !mode.is_grouped() {
        let items = entries
            .iter()
            .enumerate()
            .map(|(index, entry)| ListItem {
                id: index.to_string(),
                word: entry.word.clone(),
            })
            .collect();
        return Ok(DisplayList::Flat(items));
    }

    let sections = group(entries, GroupSelector::field(SYLLABLES_FIELD))?
        .into_iter()
        .map(|g| Section {
            heading: group_heading(&g.key, SYLLABLE_UNIT),
            items: g
                .members
                .iter()
                .enumerate()
                .map(|(index, entry)| ListItem {
                    id: format!("{}-{}", g.key, index),
                    word: entry.word.clone(),
                })
                .collect(),
        })
        .collect();

    Ok(DisplayList::Grouped(sections))
}

pub fn loading_description() -> String {
    LOADING_TEXT.to_string()
}

/// Description line above a finished lookup
pub fn result_description(word: &str, mode: LookupMode, display: &DisplayList) -> String {
    if display.is_empty() {
        return NO_RESULTS_TEXT.to_string();
    }
    match mode {
        LookupMode::Rhymes => format!("Words that rhyme with {}:", word),
        LookupMode::Synonyms => format!("Words with a meaning similar to {}:", word),
    }
}

/// Terminal rendering: headings for sections, items numbered by position
impl fmt::Display for DisplayList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayList::Empty => Ok(()),
            DisplayList::Flat(items) => {
                for (index, item) in items.iter().enumerate() {
                    writeln!(f, "  {:>3}. {}", index + 1, item.word)?;
                }
                Ok(())
            }
            DisplayList::Grouped(sections) => {
                let mut position = 0;
                for section in sections {
                    writeln!(f, "{}", section.heading)?;
                    for item in &section.items {
                        position += 1;
                        writeln!(f, "  {:>3}. {}", position, item.word)?;
                    }
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rhymes() -> Vec<WordEntry> {
        vec![
            WordEntry::new("cat").with_syllables(1),
            WordEntry::new("acrobat").with_syllables(3),
            WordEntry::new("hat").with_syllables(1),
            WordEntry::new("combat").with_syllables(2),
        ]
    }

    #[test]
    fn test_pluralize() {
        assert_eq!(pluralize(1.0), "");
        assert_eq!(pluralize(0.0), "s");
        assert_eq!(pluralize(2.0), "s");
    }

    #[test]
    fn test_group_heading() {
        assert_eq!(group_heading(&GroupKey::from(1i64), "syllable"), "1 syllable");
        assert_eq!(group_heading(&GroupKey::from(2i64), "syllable"), "2 syllables");
        assert_eq!(group_heading(&GroupKey::from("one"), "syllable"), "one syllables");
    }

    #[test]
    fn test_rhymes_grouped_by_syllables() {
        let display = build_display(&rhymes(), LookupMode::Rhymes).unwrap();

        let DisplayList::Grouped(sections) = &display else {
            panic!("expected grouped display, got {:?}", display);
        };
        let headings: Vec<&str> = sections.iter().map(|s| s.heading.as_str()).collect();
        assert_eq!(headings, vec!["1 syllable", "2 syllables", "3 syllables"]);

        let first: Vec<(&str, &str)> = sections[0]
            .items
            .iter()
            .map(|i| (i.id.as_str(), i.word.as_str()))
            .collect();
        assert_eq!(first, vec![("1-0", "cat"), ("1-1", "hat")]);
    }

    #[test]
    fn test_synonyms_flat() {
        let entries = vec![WordEntry::new("big"), WordEntry::new("large")];
        let display = build_display(&entries, LookupMode::Synonyms).unwrap();

        assert_eq!(
            display,
            DisplayList::Flat(vec![
                ListItem { id: "0".into(), word: "big".into() },
                ListItem { id: "1".into(), word: "large".into() },
            ])
        );
    }

    #[test]
    fn test_empty_results() {
        let display = build_display(&[], LookupMode::Rhymes).unwrap();
        assert_eq!(display, DisplayList::Empty);
        assert_eq!(result_description("xyzzy", LookupMode::Rhymes, &display), "(no results)");
    }

    #[test]
    fn test_rhyme_without_syllables_listed_last() {
        let entries = vec![
            WordEntry::new("spat"),
            WordEntry::new("hat").with_syllables(1),
            WordEntry::new("that"),
        ];

        let display = build_display(&entries, LookupMode::Rhymes).unwrap();

        let DisplayList::Grouped(sections) = &display else {
            panic!("expected grouped display, got {:?}", display);
        };
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].heading, "1 syllable");
        assert_eq!(sections[1].heading, "unknown syllables");
        assert_eq!(
            sections[1].items,
            vec![
                ListItem { id: "unknown-0".into(), word: "spat".into() },
                ListItem { id: "unknown-1".into(), word: "that".into() },
            ]
        );
    }

    #[test]
    fn test_descriptions() {
        let display = build_display(&rhymes(), LookupMode::Rhymes).unwrap();
        assert_eq!(
            result_description("bat", LookupMode::Rhymes, &display),
            "Words that rhyme with bat:"
        );
        assert_eq!(
            result_description("bat", LookupMode::Synonyms, &display),
            "Words with a meaning similar to bat:"
        );
        assert_eq!(loading_description(), "...loading");
    }

    #[test]
    fn test_positions_and_render() {
        let display = build_display(&rhymes(), LookupMode::Rhymes).unwrap();

        assert_eq!(display.len(), 4);
        assert_eq!(display.item_at(0), None);
        assert_eq!(display.item_at(3).map(|i| i.word.as_str()), Some("combat"));
        assert_eq!(display.item_at(5), None);

        let rendered = display.to_string();
        assert_eq!(
            rendered,
            "1 syllable\n    1. cat\n    2. hat\n2 syllables\n    3. combat\n3 syllables\n    4. acrobat\n"
        );
    }
}
