// https://unsplash.com/documentation#get-a-random-photo - one photo per call unless `count` is set

use reqwest::Url;
use tracing::debug;

use crate::{DictionaryError, Photo};

pub(crate) const UNSPLASH_API_URL: &str = "https://api.unsplash.com";

pub(crate) async fn get_random_photo(
    client: &reqwest::Client,
    base_url: &Url,
    access_key: &str,
    query: &str,
) -> Result<Photo, DictionaryError> {
    let mut url = base_url.clone();
    url.path_segments_mut()
        .map_err(|_| DictionaryError::Url(base_url.to_string()))?
        .pop_if_empty()
        .extend(["photos", "random"]);
    debug!(%query, "requesting random photo");

    let res: reqwest::Response = client
        .get(url)
        .query(&[("query", query), ("client_id", access_key)])
        .send()
        .await
        .and_then(reqwest::Response::error_for_status)
        .map_err(DictionaryError::Fetch)?;
    res.json::<Photo>().await.map_err(DictionaryError::Deserialize)
}

#[cfg(test)]
mod tests {
    use axum::{extract::Query, http::StatusCode, routing::get, Json, Router};
    use serde_json::json;
    use std::collections::HashMap;

    use crate::{test_support::serve, DictionaryError, PhotoSearch};

    fn router() -> Router {
        Router::new().route(
            "/photos/random",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                if params.get("client_id").map(String::as_str) != Some("access") {
                    return Err(StatusCode::UNAUTHORIZED);
                }
                match params.get("query").map(String::as_str) {
                    Some("ephemeral") => Ok(Json(json!({
                        "id": "p1",
                        "urls": {"small": "https://img/1.jpg", "regular": "https://img/1-large.jpg"}
                    }))),
                    _ => Err(StatusCode::NOT_FOUND),
                }
            }),
        )
    }

    #[tokio::test]
    async fn fetches_random_photo_for_query() {
        let base = serve(router()).await;
        let photos = PhotoSearch::new(reqwest::Client::new(), "access")
            .with_base_url(&base)
            .unwrap();

        let photo = photos.get_random_photo("ephemeral").await.unwrap();
        assert_eq!(photo.image_url(), "https://img/1.jpg");
    }

    #[tokio::test]
    async fn missing_photo_is_a_fetch_error() {
        let base = serve(router()).await;
        let photos = PhotoSearch::new(reqwest::Client::new(), "access")
            .with_base_url(&base)
            .unwrap();

        let error = photos.get_random_photo("xyzzy").await.unwrap_err();
        assert!(matches!(error, DictionaryError::Fetch(_)));
    }

    #[tokio::test]
    async fn bad_access_key_is_a_fetch_error() {
        let base = serve(router()).await;
        let photos = PhotoSearch::new(reqwest::Client::new(), "nope")
            .with_base_url(&base)
            .unwrap();

        assert!(photos.get_random_photo("ephemeral").await.is_err());
    }
}
