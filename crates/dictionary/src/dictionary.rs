use serde::{Deserialize, Deserializer};

/// One element of a collegiate dictionary response.
///
/// Known words come back as a list of entries. Unknown words come back as a
/// list of spelling suggestions (plain strings) instead.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DictionaryItem {
    Entry(Entry),
    Suggestion(String),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Entry {
    #[serde(default)]
    pub hwi: Option<HeadwordInfo>,
    /// Functional label, e.g. "adjective".
    #[serde(default)]
    pub fl: Option<String>,
    #[serde(default)]
    pub shortdef: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HeadwordInfo {
    #[serde(default, deserialize_with = "one_or_many")]
    pub hw: Vec<String>,
    #[serde(default)]
    pub prs: Vec<Pronunciation>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Pronunciation {
    pub mw: Option<String>,
}

impl Entry {
    /// First headword pronunciation, falling back to the first written
    /// pronunciation.
    pub fn pronunciation(&self) -> Option<&str> {
        let hwi = self.hwi.as_ref()?;
        hwi.hw
            .first()
            .map(String::as_str)
            .or_else(|| hwi.prs.iter().find_map(|pr| pr.mw.as_deref()))
    }

    pub fn part_of_speech(&self) -> Option<&str> {
        self.fl.as_deref()
    }

    pub fn first_definition(&self) -> Option<&str> {
        self.shortdef.first().map(String::as_str)
    }

    pub fn has_definitions(&self) -> bool {
        !self.shortdef.is_empty()
    }
}

/// The first entry that carries at least one short definition.
pub fn first_defined(items: &[DictionaryItem]) -> Option<&Entry> {
    items.iter().find_map(|item| match item {
        DictionaryItem::Entry(entry) if entry.has_definitions() => Some(entry),
        _ => None,
    })
}

pub fn suggestions(items: &[DictionaryItem]) -> impl Iterator<Item = &str> {
    items.iter().filter_map(|item| match item {
        DictionaryItem::Suggestion(word) => Some(word.as_str()),
        DictionaryItem::Entry(_) => None,
    })
}

/// A single photo from the image search provider.
#[derive(Debug, Clone, Deserialize)]
pub struct Photo {
    pub urls: PhotoUrls,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PhotoUrls {
    pub small: String,
}

impl Photo {
    pub fn image_url(&self) -> &str {
        &self.urls.small
    }
}

// `hwi.hw` is a string in the collegiate API but some callers hand us a list.
fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(value) => vec![value],
        OneOrMany::Many(values) => values,
    })
}
