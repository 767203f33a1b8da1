use reqwest::Url;
use serde::Deserialize;

use crate::{
    api::ValidationErrors,
    storage::{NewWord, WordChanges},
};

const MAX_LENGTH: usize = 255;

#[derive(Debug, Default, Deserialize)]
pub struct StoreRequest {
    pub word: Option<String>,
    pub pronunciation: Option<String>,
    pub definition: Option<String>,
    pub part_of_speech: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateRequest {
    pub pronunciation: Option<String>,
    pub definition: Option<String>,
    pub part_of_speech: Option<String>,
    pub image_url: Option<String>,
}

impl StoreRequest {
    pub fn validate(self) -> Result<NewWord, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let word = required(&mut errors, "word", self.word)
            .filter(|word| max_length(&mut errors, "word", word));
        let pronunciation = filled(self.pronunciation)
            .filter(|pronunciation| max_length(&mut errors, "pronunciation", pronunciation));
        let part_of_speech = required(&mut errors, "part_of_speech", self.part_of_speech)
            .filter(|part| max_length(&mut errors, "part_of_speech", part));
        let definition = required(&mut errors, "definition", self.definition);
        let image_url = required(&mut errors, "image_url", self.image_url)
            .filter(|url| valid_url(&mut errors, "image_url", url));

        match (word, part_of_speech, definition, image_url) {
            (Some(word), Some(part_of_speech), Some(definition), Some(image_url)) => errors
                .into_result(NewWord {
                    word,
                    pronunciation,
                    part_of_speech,
                    definition,
                    image_url,
                }),
            _ => Err(errors),
        }
    }
}

impl UpdateRequest {
    /// Absent fields are left alone, present fields follow the store rules.
    pub fn validate(self) -> Result<WordChanges, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let pronunciation = filled(self.pronunciation)
            .filter(|pronunciation| max_length(&mut errors, "pronunciation", pronunciation));
        let part_of_speech = self
            .part_of_speech
            .and_then(|part| required(&mut errors, "part_of_speech", Some(part)))
            .filter(|part| max_length(&mut errors, "part_of_speech", part));
        let definition = self
            .definition
            .and_then(|definition| required(&mut errors, "definition", Some(definition)));
        let image_url = self
            .image_url
            .and_then(|url| required(&mut errors, "image_url", Some(url)))
            .filter(|url| valid_url(&mut errors, "image_url", url));

        errors.into_result(WordChanges {
            pronunciation,
            part_of_speech,
            definition,
            image_url,
        })
    }
}

fn filled(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

fn required(errors: &mut ValidationErrors, field: &str, value: Option<String>) -> Option<String> {
    let value = filled(value);
    if value.is_none() {
        errors.add(field, format!("The {} field is required.", label(field)));
    }
    value
}

fn max_length(errors: &mut ValidationErrors, field: &str, value: &str) -> bool {
    let fits = value.chars().count() <= MAX_LENGTH;
    if !fits {
        errors.add(
            field,
            format!(
                "The {} field must not be greater than {MAX_LENGTH} characters.",
                label(field)
            ),
        );
    }
    fits
}

fn valid_url(errors: &mut ValidationErrors, field: &str, value: &str) -> bool {
    let valid = Url::parse(value)
        .map(|url| matches!(url.scheme(), "http" | "https") && url.has_host())
        .unwrap_or(false);
    if !valid {
        errors.add(field, format!("The {} field must be a valid URL.", label(field)));
    }
    valid
}

fn label(field: &str) -> String {
    field.replace('_', " ")
}
