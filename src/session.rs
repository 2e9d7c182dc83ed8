use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

use crate::consts::SAVED_WORDS_SEPARATOR;
use crate::datamuse::WordLookup;
use crate::display::{build_display, loading_description, result_description, DisplayList};
use crate::grouping::EvaluationError;
use crate::words::{LookupMode, WordEntry};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("enter a word first")]
    EmptyWord,
    #[error("no item at position {position} (list has {len} items)")]
    NoSuchItem { position: usize, len: usize },
    #[error("word lookup failed: {0:#}")]
    Lookup(#[source] anyhow::Error),
    #[error(transparent)]
    Display(#[from] EvaluationError),
}

/// Words the user saved during this session. Append-only, duplicates allowed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SavedWords {
    words: Vec<String>,
}

impl SavedWords {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, word: impl Into<String>) {
        self.words.push(word.into());
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Saved words as one line, e.g. "cat, hat"
    pub fn joined(&self) -> String {
        self.words.join(SAVED_WORDS_SEPARATOR)
    }
}

/// What is currently on screen: a description line and the result list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct View {
    pub description: String,
    pub display: DisplayList,
}

impl Default for View {
    fn default() -> Self {
        Self {
            description: String::new(),
            display: DisplayList::Empty,
        }
    }
}

/// A lookup that has been started but whose result is not yet applied
pub struct PendingLookup {
    generation: u64,
    word: String,
    mode: LookupMode,
    lookup: Arc<dyn WordLookup>,
}

impl PendingLookup {
    /// Query the word source. Needs no access to the session.
    pub async fn fetch(&self) -> anyhow::Result<Vec<WordEntry>> {
        self.lookup.lookup(&self.word, self.mode).await
    }
}

/// Owns the session state and runs lookups against a word source
pub struct Finder {
    lookup: Arc<dyn WordLookup>,
    view: View,
    saved: SavedWords,
    generation: u64,
}

impl Finder {
    pub fn new(lookup: Arc<dyn WordLookup>) -> Self {
        Self {
            lookup,
            view: View::default(),
            saved: SavedWords::new(),
            generation: 0,
        }
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn saved(&self) -> &SavedWords {
        &self.saved
    }

    /// Look up `word` and replace the current view with the results.
    ///
    /// On a failed lookup the view is left in the loading state.
    pub async fn show(&mut self, word: &str, mode: LookupMode) -> Result<&View, SessionError> {
        let pending = self.begin(word, mode)?;
        let result = pending.fetch().await;
        self.finish(pending, result)?;
        Ok(&self.view)
    }

    /// Validate the word and switch the view to loading.
    pub fn begin(&mut self, word: &str, mode: LookupMode) -> Result<PendingLookup, SessionError> {
        let word = word.trim();
        if word.is_empty() {
            return Err(SessionError::EmptyWord);
        }

        self.generation += 1;
        self.view = View {
            description: loading_description(),
            display: DisplayList::Empty,
        };

        Ok(PendingLookup {
            generation: self.generation,
            word: word.to_string(),
            mode,
            lookup: self.lookup.clone(),
        })
    }

    /// Apply the result of a fetch started with [`Finder::begin`].
    ///
    /// The view is only replaced if no newer lookup has begun since; the
    /// built view is returned either way.
    pub fn finish(
        &mut self,
        pending: PendingLookup,
        result: anyhow::Result<Vec<WordEntry>>,
    ) -> Result<View, SessionError> {
        let PendingLookup {
            generation,
            word,
            mode,
            ..
        } = pending;

        let entries = match result {
            Ok(entries) => entries,
            Err(e) => {
                let reason = format!("{:#}", e);
                tracing::error!(%word, %mode, %reason, "word lookup failed");
                return Err(SessionError::Lookup(e));
            }
        };

        let display = build_display(&entries, mode)?;
        tracing::info!(%word, %mode, results = entries.len(), "lookup complete");

        let view = View {
            description: result_description(&word, mode, &display),
            display,
        };
        if generation == self.generation {
            self.view = view.clone();
        } else {
            tracing::debug!(%word, %mode, "newer lookup in progress, result not shown");
        }
        Ok(view)
    }

    pub async fn show_rhymes(&mut self, word: &str) -> Result<&View, SessionError> {
        self.show(word, LookupMode::Rhymes).await
    }

    pub async fn show_synonyms(&mut self, word: &str) -> Result<&View, SessionError> {
        self.show(word, LookupMode::Synonyms).await
    }

    /// Append any word to the saved list
    pub fn save(&mut self, word: &str) -> Result<&SavedWords, SessionError> {
        let word = word.trim();
        if word.is_empty() {
            return Err(SessionError::EmptyWord);
        }
        self.saved.push(word);
        tracing::debug!(%word, total = self.saved.len(), "word saved");
        Ok(&self.saved)
    }

    /// Save the word at a 1-based position of the current list
    pub fn save_item(&mut self, position: usize) -> Result<&SavedWords, SessionError> {
        let word = self
            .view
            .display
            .item_at(position)
            .map(|item| item.word.clone())
            .ok_or(SessionError::NoSuchItem {
                position,
                len: self.view.display.len(),
            })?;
        self.save(&word)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Canned word source for tests
    #[derive(Default)]
    pub(crate) struct StubLookup {
        pub rhymes: Vec<WordEntry>,
        pub synonyms: Vec<WordEntry>,
        pub fail: bool,
        pub hang: bool,
        pub calls: AtomicUsize,
    }

    impl StubLookup {
        pub(crate) fn sample() -> Self {
            Self {
                rhymes: vec![
                    WordEntry::new("hat").with_syllables(1),
                    WordEntry::new("acrobat").with_syllables(3),
                    WordEntry::new("mat").with_syllables(1),
                ],
                synonyms: vec![WordEntry::new("feline"), WordEntry::new("kitty")],
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl WordLookup for StubLookup {
        async fn lookup(&self, _word: &str, mode: LookupMode) -> anyhow::Result<Vec<WordEntry>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.hang {
                std::future::pending::<()>().await;
            }
            if self.fail {
                anyhow::bail!("connection refused");
            }
            Ok(match mode {
                LookupMode::Rhymes => self.rhymes.clone(),
                LookupMode::Synonyms => self.synonyms.clone(),
            })
        }
    }

    #[test]
    fn test_saved_words_keep_duplicates() {
        let mut saved = SavedWords::new();
        saved.push("cat");
        saved.push("hat");
        saved.push("cat");

        assert_eq!(saved.len(), 3);
        assert_eq!(saved.joined(), "cat, hat, cat");
    }

    #[tokio::test]
    async fn test_show_rhymes() {
        let mut finder = Finder::new(Arc::new(StubLookup::sample()));

        let view = finder.show_rhymes("cat").await.unwrap();

        assert_eq!(view.description, "Words that rhyme with cat:");
        assert_eq!(view.display.len(), 3);
        assert!(matches!(view.display, DisplayList::Grouped(_)));
    }

    #[tokio::test]
    async fn test_show_synonyms_flat() {
        let mut finder = Finder::new(Arc::new(StubLookup::sample()));

        let view = finder.show_synonyms("cat").await.unwrap();

        assert_eq!(view.description, "Words with a meaning similar to cat:");
        assert!(matches!(view.display, DisplayList::Flat(ref items) if items.len() == 2));
    }

    #[tokio::test]
    async fn test_empty_word_sends_no_request() {
        let stub = Arc::new(StubLookup::sample());
        let mut finder = Finder::new(stub.clone());

        let err = finder.show_rhymes("   ").await.unwrap_err();

        assert!(matches!(err, SessionError::EmptyWord));
        assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failed_lookup_stays_loading() {
        let stub = StubLookup {
            fail: true,
            ..StubLookup::sample()
        };
        let mut finder = Finder::new(Arc::new(stub));

        let err = finder.show_rhymes("cat").await.unwrap_err();

        assert!(matches!(err, SessionError::Lookup(_)));
        assert_eq!(finder.view().description, "...loading");
        assert!(finder.view().display.is_empty());
    }

    #[tokio::test]
    async fn test_rhyme_without_syllables_still_shown() {
        let stub = StubLookup {
            rhymes: vec![
                WordEntry::new("hat").with_syllables(1),
                WordEntry::new("spat"),
            ],
            ..StubLookup::default()
        };
        let mut finder = Finder::new(Arc::new(stub));

        let view = finder.show_rhymes("cat").await.unwrap();

        assert_eq!(view.description, "Words that rhyme with cat:");
        assert_eq!(view.display.len(), 2);
        assert_eq!(view.display.item_at(2).map(|i| i.word.as_str()), Some("spat"));
    }

    #[tokio::test]
    async fn test_stale_lookup_does_not_replace_newer_view() {
        let mut finder = Finder::new(Arc::new(StubLookup::sample()));

        let older = finder.begin("cat", LookupMode::Rhymes).unwrap();
        let newer = finder.begin("cat", LookupMode::Synonyms).unwrap();

        let result = newer.fetch().await;
        finder.finish(newer, result).unwrap();
        let result = older.fetch().await;
        let stale = finder.finish(older, result).unwrap();

        assert!(matches!(stale.display, DisplayList::Grouped(_)));
        assert_eq!(finder.view().description, "Words with a meaning similar to cat:");
    }

    #[tokio::test]
    async fn test_no_results() {
        let mut finder = Finder::new(Arc::new(StubLookup::default()));

        let view = finder.show_rhymes("qzx").await.unwrap();

        assert_eq!(view.description, "(no results)");
        assert_eq!(view.display, DisplayList::Empty);
    }

    #[tokio::test]
    async fn test_save_item_by_position() {
        let mut finder = Finder::new(Arc::new(StubLookup::sample()));
        finder.show_rhymes("cat").await.unwrap();

        // grouped order: hat, mat (1 syllable), acrobat (3)
        finder.save_item(2).unwrap();
        finder.save_item(3).unwrap();
        finder.save_item(2).unwrap();

        assert_eq!(finder.saved().joined(), "mat, acrobat, mat");

        let err = finder.save_item(4).unwrap_err();
        assert!(matches!(err, SessionError::NoSuchItem { position: 4, len: 3 }));
    }

    #[test]
    fn test_save_free_text() {
        let mut finder = Finder::new(Arc::new(StubLookup::default()));

        finder.save(" sonnet ").unwrap();

        assert_eq!(finder.saved().words(), &["sonnet".to_string()]);
        assert!(finder.save("").is_err());
    }
}
