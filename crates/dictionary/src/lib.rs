use reqwest::Url;

mod dictionary;
mod dictionary_api;
mod image_api;

pub use dictionary::{
    first_defined, suggestions, DictionaryItem, Entry, HeadwordInfo, Photo, PhotoUrls,
    Pronunciation,
};

#[derive(Debug, thiserror::Error)]
pub enum DictionaryError {
    #[error("request failed: {0}")]
    Fetch(#[source] reqwest::Error),
    #[error("unexpected response body: {0}")]
    Deserialize(#[source] reqwest::Error),
    #[error("invalid base url {0:?}")]
    Url(String),
}

/// Merriam-Webster collegiate dictionary client.
#[derive(Clone)]
pub struct Dictionary {
    client: reqwest::Client,
    base_url: Url,
    key: String,
}

impl Dictionary {
    pub fn new(client: reqwest::Client, key: impl Into<String>) -> Self {
        Self {
            client,
            base_url: Url::parse(dictionary_api::COLLEGIATE_API_URL)
                .expect("collegiate url is valid"),
            key: key.into(),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, DictionaryError> {
        self.base_url = parse_base_url(base_url)?;
        Ok(self)
    }

    pub async fn get_entries(&self, word: &str) -> Result<Vec<DictionaryItem>, DictionaryError> {
        dictionary_api::get_entries(&self.client, &self.base_url, &self.key, word).await
    }
}

/// Unsplash random photo client.
#[derive(Clone)]
pub struct PhotoSearch {
    client: reqwest::Client,
    base_url: Url,
    access_key: String,
}

impl PhotoSearch {
    pub fn new(client: reqwest::Client, access_key: impl Into<String>) -> Self {
        Self {
            client,
            base_url: Url::parse(image_api::UNSPLASH_API_URL).expect("unsplash url is valid"),
            access_key: access_key.into(),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, DictionaryError> {
        self.base_url = parse_base_url(base_url)?;
        Ok(self)
    }

    pub async fn get_random_photo(&self, query: &str) -> Result<Photo, DictionaryError> {
        image_api::get_random_photo(&self.client, &self.base_url, &self.access_key, query).await
    }
}

fn parse_base_url(base_url: &str) -> Result<Url, DictionaryError> {
    Url::parse(base_url)
        .ok()
        .filter(|url| !url.cannot_be_a_base())
        .ok_or_else(|| DictionaryError::Url(base_url.to_owned()))
}

#[cfg(test)]
pub(crate) mod test_support {
    use axum::Router;
    use tokio::net::TcpListener;

    /// Serves `router` on an ephemeral local port and returns its base url.
    pub async fn serve(router: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });
        format!("http://{addr}")
    }
}
