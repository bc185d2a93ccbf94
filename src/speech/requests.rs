//! Request constructors for every customization operation.
//!
//! Each function maps one (resource, action) pair to exactly one `ApiRequest`.
//! Identifiers and resource names supplied by the operator are percent-encoded
//! before being placed in the path.

use anyhow::anyhow;
use serde_json::{json, Map, Value};
use urlencoding::encode;

use super::api::ApiRequest;
use super::kind::CustomizationKind;

/// Parameters for creating a custom model
#[derive(Debug, Clone, Default)]
pub struct NewModel {
    pub name: String,
    /// Base model to customize, e.g. `es-CO_NarrowbandModel`
    pub base_model_name: String,
    pub description: Option<String>,
    /// Dialect of the base model's language (language models only)
    pub dialect: Option<String>,
}

/// Optional training parameters.
///
/// `word_type_to_add` and `customization_weight` apply to language models,
/// `custom_language_model_id` and `strict` to acoustic models.
#[derive(Debug, Clone, Default)]
pub struct TrainOptions {
    pub word_type_to_add: Option<String>,
    pub customization_weight: Option<f64>,
    pub custom_language_model_id: Option<String>,
    pub strict: Option<bool>,
}

/// A custom word definition
#[derive(Debug, Clone, Default)]
pub struct WordEntry {
    pub sounds_like: Vec<String>,
    pub display_as: Option<String>,
}

fn model_path(kind: CustomizationKind, customization_id: &str) -> String {
    format!("{}/{}", kind.collection_path(), encode(customization_id))
}

fn language_path(customization_id: &str) -> String {
    model_path(CustomizationKind::Language, customization_id)
}

fn acoustic_path(customization_id: &str) -> String {
    model_path(CustomizationKind::Acoustic, customization_id)
}

// Models

pub fn create_model(kind: CustomizationKind, model: &NewModel) -> ApiRequest {
    let mut body = Map::new();
    body.insert("name".to_string(), json!(model.name));
    body.insert("base_model_name".to_string(), json!(model.base_model_name));
    if let Some(description) = &model.description {
        body.insert("description".to_string(), json!(description));
    }
    if kind == CustomizationKind::Language {
        if let Some(dialect) = &model.dialect {
            body.insert("dialect".to_string(), json!(dialect));
        }
    }
    ApiRequest::post(kind.collection_path()).json(Value::Object(body))
}

pub fn list_models(kind: CustomizationKind, language: Option<&str>) -> ApiRequest {
    ApiRequest::get(kind.collection_path()).query_opt("language", language)
}

pub fn get_model(kind: CustomizationKind, customization_id: &str) -> ApiRequest {
    ApiRequest::get(model_path(kind, customization_id))
}

pub fn delete_model(kind: CustomizationKind, customization_id: &str) -> ApiRequest {
    ApiRequest::delete(model_path(kind, customization_id))
}

pub fn train_model(
    kind: CustomizationKind,
    customization_id: &str,
    options: &TrainOptions,
) -> ApiRequest {
    let request = ApiRequest::post(format!("{}/train", model_path(kind, customization_id)));
    match kind {
        CustomizationKind::Language => request
            .query_opt("word_type_to_add", options.word_type_to_add.as_deref())
            .query_opt("customization_weight", options.customization_weight),
        CustomizationKind::Acoustic => request
            .query_opt(
                "custom_language_model_id",
                options.custom_language_model_id.as_deref(),
            )
            .query_opt("strict", options.strict),
    }
}

pub fn reset_model(kind: CustomizationKind, customization_id: &str) -> ApiRequest {
    ApiRequest::post(format!("{}/reset", model_path(kind, customization_id)))
}

pub fn upgrade_model(
    kind: CustomizationKind,
    customization_id: &str,
    custom_language_model_id: Option<&str>,
) -> ApiRequest {
    let request = ApiRequest::post(format!(
        "{}/upgrade_model",
        model_path(kind, customization_id)
    ));
    match kind {
        CustomizationKind::Language => request,
        CustomizationKind::Acoustic => {
            request.query_opt("custom_language_model_id", custom_language_model_id)
        }
    }
}

// Corpora

pub fn list_corpora(customization_id: &str) -> ApiRequest {
    ApiRequest::get(format!("{}/corpora", language_path(customization_id)))
}

pub fn add_corpus(
    customization_id: &str,
    corpus_name: &str,
    text: Vec<u8>,
    allow_overwrite: bool,
) -> ApiRequest {
    ApiRequest::post(format!(
        "{}/corpora/{}",
        language_path(customization_id),
        encode(corpus_name)
    ))
    .query("allow_overwrite", allow_overwrite)
    .bytes("text/plain", text)
}

pub fn get_corpus(customization_id: &str, corpus_name: &str) -> ApiRequest {
    ApiRequest::get(format!(
        "{}/corpora/{}",
        language_path(customization_id),
        encode(corpus_name)
    ))
}

pub fn delete_corpus(customization_id: &str, corpus_name: &str) -> ApiRequest {
    ApiRequest::delete(format!(
        "{}/corpora/{}",
        language_path(customization_id),
        encode(corpus_name)
    ))
}

// Words

pub fn list_words(
    customization_id: &str,
    word_type: Option<&str>,
    sort: Option<&str>,
) -> ApiRequest {
    ApiRequest::get(format!("{}/words", language_path(customization_id)))
        .query_opt("word_type", word_type)
        .query_opt("sort", sort)
}

pub fn add_word(customization_id: &str, word: &str, entry: &WordEntry) -> ApiRequest {
    let mut body = Map::new();
    if !entry.sounds_like.is_empty() {
        body.insert("sounds_like".to_string(), json!(entry.sounds_like));
    }
    if let Some(display_as) = &entry.display_as {
        body.insert("display_as".to_string(), json!(display_as));
    }
    ApiRequest::put(format!(
        "{}/words/{}",
        language_path(customization_id),
        encode(word)
    ))
    .json(Value::Object(body))
}

/// Extracts the word objects from a words document.
///
/// Accepts either `{"words": [...]}` or a bare array of word objects.
///
/// # Errors
/// - If the document is neither shape, or a word object lacks a `word` field
pub fn parse_words(words: Value) -> anyhow::Result<Vec<Value>> {
    let entries = match words {
        Value::Array(entries) => entries,
        Value::Object(mut object) => match object.remove("words") {
            Some(Value::Array(entries)) => entries,
            _ => return Err(anyhow!("Words document must contain a \"words\" array")),
        },
        _ => {
            return Err(anyhow!(
                "Words document must be an array or an object with a \"words\" array"
            ))
        }
    };

    if let Some(position) = entries
        .iter()
        .position(|entry| !entry.get("word").is_some_and(Value::is_string))
    {
        return Err(anyhow!(
            "Word entry #{} has no \"word\" string",
            position + 1
        ));
    }

    Ok(entries)
}

/// Builds a batch word upload from entries checked by `parse_words`.
pub fn add_words(customization_id: &str, entries: Vec<Value>) -> ApiRequest {
    ApiRequest::post(format!("{}/words", language_path(customization_id)))
        .json(json!({ "words": entries }))
}

pub fn get_word(customization_id: &str, word: &str) -> ApiRequest {
    ApiRequest::get(format!(
        "{}/words/{}",
        language_path(customization_id),
        encode(word)
    ))
}

pub fn delete_word(customization_id: &str, word: &str) -> ApiRequest {
    ApiRequest::delete(format!(
        "{}/words/{}",
        language_path(customization_id),
        encode(word)
    ))
}

// Grammars

pub fn list_grammars(customization_id: &str) -> ApiRequest {
    ApiRequest::get(format!("{}/grammars", language_path(customization_id)))
}

pub fn add_grammar(
    customization_id: &str,
    grammar_name: &str,
    content_type: &str,
    grammar: Vec<u8>,
    allow_overwrite: bool,
) -> ApiRequest {
    ApiRequest::post(format!(
        "{}/grammars/{}",
        language_path(customization_id),
        encode(grammar_name)
    ))
    .query("allow_overwrite", allow_overwrite)
    .bytes(content_type, grammar)
}

pub fn get_grammar(customization_id: &str, grammar_name: &str) -> ApiRequest {
    ApiRequest::get(format!(
        "{}/grammars/{}",
        language_path(customization_id),
        encode(grammar_name)
    ))
}

pub fn delete_grammar(customization_id: &str, grammar_name: &str) -> ApiRequest {
    ApiRequest::delete(format!(
        "{}/grammars/{}",
        language_path(customization_id),
        encode(grammar_name)
    ))
}

// Audio resources

pub fn list_audio(customization_id: &str) -> ApiRequest {
    ApiRequest::get(format!("{}/audio", acoustic_path(customization_id)))
}

pub fn add_audio(
    customization_id: &str,
    audio_name: &str,
    content_type: &str,
    audio: Vec<u8>,
    allow_overwrite: bool,
) -> ApiRequest {
    ApiRequest::post(format!(
        "{}/audio/{}",
        acoustic_path(customization_id),
        encode(audio_name)
    ))
    .query("allow_overwrite", allow_overwrite)
    .bytes(content_type, audio)
}

pub fn get_audio(customization_id: &str, audio_name: &str) -> ApiRequest {
    ApiRequest::get(format!(
        "{}/audio/{}",
        acoustic_path(customization_id),
        encode(audio_name)
    ))
}

pub fn delete_audio(customization_id: &str, audio_name: &str) -> ApiRequest {
    ApiRequest::delete(format!(
        "{}/audio/{}",
        acoustic_path(customization_id),
        encode(audio_name)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::speech::api::RequestBody;
    use reqwest::Method;

    const LANG_ID: &str = "7fa5d91f-be33-4903-9c26-8b0bdeb3fb2f";

    #[test]
    fn test_create_language_model_body() {
        let model = NewModel {
            name: "IGS lang model".to_string(),
            base_model_name: "es-CO_NarrowbandModel".to_string(),
            description: None,
            dialect: Some("es-LA".to_string()),
        };
        let request = create_model(CustomizationKind::Language, &model);

        assert_eq!(request.method, Method::POST);
        assert_eq!(request.path, "/v1/customizations");
        assert_eq!(
            request.body,
            RequestBody::Json(json!({
                "name": "IGS lang model",
                "base_model_name": "es-CO_NarrowbandModel",
                "dialect": "es-LA"
            }))
        );
    }

    #[test]
    fn test_create_acoustic_model_ignores_dialect() {
        let model = NewModel {
            name: "IGS acoustic model".to_string(),
            base_model_name: "es-CO_NarrowbandModel".to_string(),
            description: Some("call center".to_string()),
            dialect: Some("es-LA".to_string()),
        };
        let request = create_model(CustomizationKind::Acoustic, &model);

        assert_eq!(request.path, "/v1/acoustic_customizations");
        assert_eq!(
            request.body,
            RequestBody::Json(json!({
                "name": "IGS acoustic model",
                "base_model_name": "es-CO_NarrowbandModel",
                "description": "call center"
            }))
        );
    }

    #[test]
    fn test_train_options_follow_kind() {
        let options = TrainOptions {
            word_type_to_add: Some("user".to_string()),
            customization_weight: Some(0.5),
            custom_language_model_id: Some(LANG_ID.to_string()),
            strict: None,
        };

        let language = train_model(CustomizationKind::Language, "abc", &options);
        assert_eq!(language.path, "/v1/customizations/abc/train");
        assert_eq!(
            language.query,
            vec![
                ("word_type_to_add".to_string(), "user".to_string()),
                ("customization_weight".to_string(), "0.5".to_string()),
            ]
        );

        let acoustic = train_model(CustomizationKind::Acoustic, "def", &options);
        assert_eq!(acoustic.path, "/v1/acoustic_customizations/def/train");
        assert_eq!(
            acoustic.query,
            vec![("custom_language_model_id".to_string(), LANG_ID.to_string())]
        );
    }

    #[test]
    fn test_model_lifecycle_paths() {
        let kind = CustomizationKind::Acoustic;
        assert_eq!(reset_model(kind, "def").path, "/v1/acoustic_customizations/def/reset");
        assert_eq!(
            upgrade_model(kind, "def", None).path,
            "/v1/acoustic_customizations/def/upgrade_model"
        );
        assert_eq!(delete_model(kind, "def").method, Method::DELETE);
        assert_eq!(
            list_models(CustomizationKind::Language, Some("es-CO")).query,
            vec![("language".to_string(), "es-CO".to_string())]
        );
    }

    #[test]
    fn test_add_corpus_encodes_name_and_sets_overwrite() {
        let request = add_corpus(LANG_ID, "express 2020/09", b"hola".to_vec(), true);

        assert_eq!(
            request.path,
            format!("/v1/customizations/{LANG_ID}/corpora/express%202020%2F09")
        );
        assert_eq!(
            request.query,
            vec![("allow_overwrite".to_string(), "true".to_string())]
        );
        assert_eq!(
            request.body,
            RequestBody::Bytes {
                content_type: "text/plain".to_string(),
                data: b"hola".to_vec(),
            }
        );
    }

    #[test]
    fn test_add_word_uses_put() {
        let entry = WordEntry {
            sounds_like: vec!["i triple e".to_string()],
            display_as: Some("IEEE".to_string()),
        };
        let request = add_word("abc", "IEEE", &entry);

        assert_eq!(request.method, Method::PUT);
        assert_eq!(request.path, "/v1/customizations/abc/words/IEEE");
        assert_eq!(
            request.body,
            RequestBody::Json(json!({
                "sounds_like": ["i triple e"],
                "display_as": "IEEE"
            }))
        );
    }

    #[test]
    fn test_add_words_accepts_both_document_shapes() {
        let bare = json!([{ "word": "HHonors", "sounds_like": ["hilton honors"] }]);
        let wrapped = json!({ "words": [{ "word": "HHonors", "sounds_like": ["hilton honors"] }] });

        let from_bare = add_words("abc", parse_words(bare).unwrap());
        let from_wrapped = add_words("abc", parse_words(wrapped).unwrap());

        assert_eq!(from_bare, from_wrapped);
        assert_eq!(from_bare.path, "/v1/customizations/abc/words");
    }

    #[test]
    fn test_parse_words_rejects_entries_without_word() {
        let err = parse_words(json!([{ "word": "ok" }, { "sounds_like": [] }])).unwrap_err();
        assert!(err.to_string().contains("#2"));

        assert!(parse_words(json!("HHonors")).is_err());
        assert!(parse_words(json!({ "items": [] })).is_err());
    }

    #[test]
    fn test_grammar_and_audio_uploads() {
        let grammar = add_grammar("abc", "confirm", "application/srgs", b"#ABNF".to_vec(), false);
        assert_eq!(grammar.path, "/v1/customizations/abc/grammars/confirm");
        assert_eq!(
            grammar.query,
            vec![("allow_overwrite".to_string(), "false".to_string())]
        );

        let audio = add_audio("def", "call-01", "audio/mp3", vec![1, 2, 3], true);
        assert_eq!(audio.path, "/v1/acoustic_customizations/def/audio/call-01");
        assert!(matches!(
            audio.body,
            RequestBody::Bytes { ref content_type, .. } if content_type == "audio/mp3"
        ));
    }
}
