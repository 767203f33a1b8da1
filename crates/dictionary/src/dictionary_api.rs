// https://dictionaryapi.com/products/api-collegiate-dictionary - entries keyed by headword, needs a key

use reqwest::Url;
use tracing::debug;

use crate::{DictionaryError, DictionaryItem};

pub(crate) const COLLEGIATE_API_URL: &str =
    "https://dictionaryapi.com/api/v3/references/collegiate/json";

pub(crate) async fn get_entries(
    client: &reqwest::Client,
    base_url: &Url,
    key: &str,
    word: &str,
) -> Result<Vec<DictionaryItem>, DictionaryError> {
    let mut url = base_url.clone();
    url.path_segments_mut()
        .map_err(|_| DictionaryError::Url(base_url.to_string()))?
        .pop_if_empty()
        .push(word);
    debug!(%word, "requesting dictionary entries");

    let res: reqwest::Response = client
        .get(url)
        .query(&[("key", key)])
        .send()
        .await
        .and_then(reqwest::Response::error_for_status)
        .map_err(DictionaryError::Fetch)?;
    res.json::<Vec<DictionaryItem>>()
        .await
        .map_err(DictionaryError::Deserialize)
}
