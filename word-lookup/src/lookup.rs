use std::{fmt, sync::Arc};

use async_trait::async_trait;
use dictionary::{
    first_defined, suggestions, Dictionary, DictionaryError, DictionaryItem, Entry, Photo,
    PhotoSearch,
};
use thiserror::Error;
use tokio::task::{JoinError, JoinSet};
use tracing::{error, info, warn};

use crate::{
    api::{CheckResponse, WordPayload},
    storage::WordRecord,
    store_client::{StoreError, WordStoreClient},
};

#[async_trait]
pub trait WordStore: Send + Sync {
    async fn check(&self, word: &str) -> Result<CheckResponse, StoreError>;
    async fn store(&self, payload: &WordPayload) -> Result<(), StoreError>;
}

#[async_trait]
pub trait DefinitionSource: Send + Sync {
    async fn entries(&self, word: &str) -> Result<Vec<DictionaryItem>, DictionaryError>;
}

#[async_trait]
pub trait ImageSource: Send + Sync {
    async fn random_photo(&self, query: &str) -> Result<Photo, DictionaryError>;
}

#[async_trait]
impl WordStore for WordStoreClient {
    async fn check(&self, word: &str) -> Result<CheckResponse, StoreError> {
        WordStoreClient::check(self, word).await
    }

    async fn store(&self, payload: &WordPayload) -> Result<(), StoreError> {
        WordStoreClient::store(self, payload).await
    }
}

#[async_trait]
impl DefinitionSource for Dictionary {
    async fn entries(&self, word: &str) -> Result<Vec<DictionaryItem>, DictionaryError> {
        self.get_entries(word).await
    }
}

#[async_trait]
impl ImageSource for PhotoSearch {
    async fn random_photo(&self, query: &str) -> Result<Photo, DictionaryError> {
        self.get_random_photo(query).await
    }
}

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("existence check failed: {0}")]
    Store(#[from] StoreError),

    #[error("provider request failed: {0}")]
    Provider(#[from] DictionaryError),

    #[error("word store reported {0:?} as known but sent no record")]
    MissingRecord(String),

    #[error("no entry with a short definition for {word:?}")]
    NoQualifyingDefinition { word: String, suggestions: Vec<String> },
}

/// What the card shows for a resolved word.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupResult {
    pub pronunciation: String,
    pub part_of_speech: String,
    pub definitions: Vec<String>,
    pub image_url: String,
}

impl From<WordRecord> for LookupResult {
    fn from(record: WordRecord) -> Self {
        Self {
            pronunciation: record.pronunciation.unwrap_or_default(),
            part_of_speech: record.part_of_speech,
            definitions: vec![record.definition],
            image_url: record.image_url,
        }
    }
}

impl From<&WordPayload> for LookupResult {
    fn from(payload: &WordPayload) -> Self {
        Self {
            pronunciation: payload.pronunciation.clone(),
            part_of_speech: payload.part_of_speech.clone(),
            definitions: vec![payload.definition.clone()],
            image_url: payload.image_url.clone(),
        }
    }
}

impl WordPayload {
    pub fn from_entry(word: &str, entry: &Entry, photo: &Photo) -> Self {
        Self {
            word: word.to_owned(),
            pronunciation: entry.pronunciation().unwrap_or_default().to_owned(),
            part_of_speech: entry.part_of_speech().unwrap_or_default().to_owned(),
            definition: entry.first_definition().unwrap_or_default().to_owned(),
            image_url: photo.image_url().to_owned(),
        }
    }
}

/// Front-end state: the pending input, the heading of the last search and
/// the card currently on screen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct View {
    pub input: String,
    pub heading: String,
    pub result: Option<LookupResult>,
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(result) = &self.result else {
            return Ok(());
        };
        writeln!(f, "{}", self.heading)?;
        writeln!(f, "    image: {}", result.image_url)?;
        let tags = [&result.pronunciation, &result.part_of_speech]
            .into_iter()
            .filter(|tag| !tag.is_empty())
            .map(|tag| format!("[{tag}]"))
            .collect::<Vec<String>>();
        if !tags.is_empty() {
            writeln!(f, "    {}", tags.join(" "))?;
        }
        if let Some(definition) = result.definitions.first() {
            writeln!(f, "    {definition}")?;
        }
        Ok(())
    }
}

#[derive(Debug)]
pub enum SearchOutcome {
    /// Blank input, nothing happened.
    Ignored,
    /// Rendered from the word store without touching the providers.
    Cached,
    /// Rendered from the providers, the store call runs in the background
    /// until [`Lookup::finish`] collects it.
    Fetched,
    /// Nothing new to show, the reason was logged.
    Unresolved,
}

enum Resolution {
    Stored(WordRecord),
    Fetched(WordPayload),
}

pub struct Lookup {
    store: Arc<dyn WordStore>,
    dictionary: Arc<dyn DefinitionSource>,
    images: Arc<dyn ImageSource>,
    view: View,
    pending: JoinSet<()>,
}

impl Lookup {
    pub fn new(
        store: Arc<dyn WordStore>,
        dictionary: Arc<dyn DefinitionSource>,
        images: Arc<dyn ImageSource>,
    ) -> Self {
        Self {
            store,
            dictionary,
            images,
            view: View::default(),
            pending: JoinSet::new(),
        }
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn set_input(&mut self, text: &str) {
        self.view.input = text.to_owned();
    }

    /// Searches for whatever is in the input.
    pub async fn submit(&mut self) -> SearchOutcome {
        let term = std::mem::take(&mut self.view.input);
        self.search(&term).await
    }

    pub async fn search(&mut self, term: &str) -> SearchOutcome {
        let term = term.trim();
        if term.is_empty() {
            return SearchOutcome::Ignored;
        }
        self.view.heading = term.to_owned();
        self.view.input.clear();

        match self.resolve(term).await {
            Ok(Resolution::Stored(record)) => {
                info!(word = %term, "found word in store");
                self.view.result = Some(LookupResult::from(record));
                SearchOutcome::Cached
            }
            Ok(Resolution::Fetched(payload)) => {
                self.view.result = Some(LookupResult::from(&payload));
                self.persist(payload);
                SearchOutcome::Fetched
            }
            Err(LookupError::NoQualifyingDefinition { word, suggestions }) => {
                warn!(%word, ?suggestions, "no definition found");
                SearchOutcome::Unresolved
            }
            Err(error) => {
                warn!(word = %term, %error, "lookup failed");
                SearchOutcome::Unresolved
            }
        }
    }

    async fn resolve(&self, term: &str) -> Result<Resolution, LookupError> {
        let check = self.store.check(term).await?;
        if check.exists {
            return check
                .word
                .map(Resolution::Stored)
                .ok_or_else(|| LookupError::MissingRecord(term.to_owned()));
        }

        let (photo, items) = futures::try_join!(
            self.images.random_photo(term),
            self.dictionary.entries(term)
        )?;

        let entry = first_defined(&items).ok_or_else(|| LookupError::NoQualifyingDefinition {
            word: term.to_owned(),
            suggestions: suggestions(&items).map(str::to_owned).collect(),
        })?;
        Ok(Resolution::Fetched(WordPayload::from_entry(term, entry, &photo)))
    }

    /// Waits for every background store call still in flight.
    pub async fn finish(&mut self) {
        while let Some(result) = self.pending.join_next().await {
            log_abandoned(result);
        }
    }

    fn persist(&mut self, payload: WordPayload) {
        while let Some(result) = self.pending.try_join_next() {
            log_abandoned(result);
        }

        let store = Arc::clone(&self.store);
        self.pending.spawn(async move {
            match store.store(&payload).await {
                Ok(()) => info!(word = %payload.word, "stored word"),
                Err(StoreError::Validation(errors)) => {
                    warn!(word = %payload.word, %errors, "word store rejected the payload")
                }
                Err(error) => warn!(word = %payload.word, %error, "failed to store word"),
            }
        });
    }
}

fn log_abandoned(result: Result<(), JoinError>) {
    if let Err(error) = result {
        error!(%error, "store task did not finish");
    }
}
