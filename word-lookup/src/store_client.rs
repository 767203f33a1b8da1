use reqwest::{StatusCode, Url};
use thiserror::Error;

use crate::api::{CheckRequest, CheckResponse, ErrorBody, ValidationErrors, WordPayload};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("word store unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("word store rejected the payload: {0}")]
    Validation(ValidationErrors),

    #[error("word store answered {status}: {message}")]
    Status { status: StatusCode, message: String },

    #[error("invalid word store url {0:?}")]
    Url(String),

    #[error("no word given")]
    EmptyWord,
}

/// HTTP client for the word store service.
#[derive(Clone)]
pub struct WordStoreClient {
    client: reqwest::Client,
    base_url: Url,
}

impl WordStoreClient {
    pub fn new(client: reqwest::Client, base_url: &str) -> Result<Self, StoreError> {
        let base_url = Url::parse(base_url)
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| StoreError::Url(base_url.to_owned()))?;
        Ok(Self { client, base_url })
    }

    pub async fn check(&self, word: &str) -> Result<CheckResponse, StoreError> {
        let res = self
            .client
            .post(self.endpoint(&["check"]))
            .json(&CheckRequest {
                word: word.to_owned(),
            })
            .send()
            .await?;
        let res = expect_success(res).await?;
        Ok(res.json::<CheckResponse>().await?)
    }

    pub async fn store(&self, payload: &WordPayload) -> Result<(), StoreError> {
        let res = self
            .client
            .post(self.endpoint(&["store"]))
            .json(payload)
            .send()
            .await?;
        expect_success(res).await.map(|_| ())
    }

    pub async fn remove(&self, word: &str) -> Result<(), StoreError> {
        let word = word.trim();
        if word.is_empty() {
            return Err(StoreError::EmptyWord);
        }
        let res = self
            .client
            .delete(self.endpoint(&["words", word]))
            .send()
            .await?;
        expect_success(res).await.map(|_| ())
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

async fn expect_success(res: reqwest::Response) -> Result<reqwest::Response, StoreError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }

    let body = res.json::<ErrorBody>().await.ok();
    match body {
        Some(body) if status == StatusCode::UNPROCESSABLE_ENTITY && !body.errors.is_empty() => {
            Err(StoreError::Validation(body.errors))
        }
        Some(body) => Err(StoreError::Status {
            status,
            message: body.message,
        }),
        None => Err(StoreError::Status {
            status,
            message: String::new(),
        }),
    }
}
