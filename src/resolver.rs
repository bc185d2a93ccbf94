//! Customization identifier resolution.
//!
//! Turns a listing of customizations into the single id an action operates on.
//! A listing with one entry resolves on its own; a listing with several asks the
//! operator through a `ChoicePrompt` and accepts only an exact id match.

use std::io;

use thiserror::Error;

use crate::speech::{CustomizationKind, CustomizationRecord};

/// Capability for asking the operator which customization to use.
pub trait ChoicePrompt {
    /// Shows the rendered records and returns the operator's raw answer.
    fn choose(&mut self, kind: CustomizationKind, choices: &[String]) -> io::Result<String>;
}

/// Reasons a customization id could not be resolved. All of them abort the
/// requested action.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("No {} found for this account", .kind.name())]
    NoCustomizationsFound { kind: CustomizationKind },

    #[error("Customization id '{id}' was not found in the listing")]
    IdNotFound { id: String },

    #[error("Customization selection cancelled")]
    Cancelled,

    #[error("Could not read the customization selection: {0}")]
    Prompt(#[source] io::Error),
}

/// Resolves the customization to operate on.
///
/// The returned id is always the `id` of one of `records`, compared
/// byte-for-byte against the operator's input.
pub fn resolve<P>(
    kind: CustomizationKind,
    records: &[CustomizationRecord],
    prompt: &mut P,
) -> Result<String, ResolveError>
where
    P: ChoicePrompt + ?Sized,
{
    match records {
        [] => Err(ResolveError::NoCustomizationsFound { kind }),
        [only] => {
            tracing::debug!("Single {} found, using {}", only.kind.name(), only.id);
            Ok(only.id.clone())
        }
        _ => {
            let choices: Vec<String> = records.iter().map(ToString::to_string).collect();
            let candidate = prompt.choose(kind, &choices).map_err(|e| match e.kind() {
                io::ErrorKind::Interrupted => ResolveError::Cancelled,
                _ => ResolveError::Prompt(e),
            })?;

            match records.iter().find(|record| record.id == candidate) {
                Some(record) => {
                    tracing::info!("Operator selected {} {}", kind.name(), record.id);
                    Ok(record.id.clone())
                }
                None => Err(ResolveError::IdNotFound { id: candidate }),
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::VecDeque;

    /// Prompt returning scripted answers and recording what it was shown.
    #[derive(Default)]
    pub(crate) struct ScriptedPrompt {
        answers: VecDeque<String>,
        failure: Option<io::ErrorKind>,
        pub shown: Vec<Vec<String>>,
    }

    impl ScriptedPrompt {
        pub(crate) fn answering(answer: &str) -> Self {
            Self {
                answers: VecDeque::from([answer.to_string()]),
                ..Self::default()
            }
        }

        pub(crate) fn failing(kind: io::ErrorKind) -> Self {
            Self {
                failure: Some(kind),
                ..Self::default()
            }
        }

        pub(crate) fn calls(&self) -> usize {
            self.shown.len()
        }
    }

    impl ChoicePrompt for ScriptedPrompt {
        fn choose(&mut self, _kind: CustomizationKind, choices: &[String]) -> io::Result<String> {
            self.shown.push(choices.to_vec());
            if let Some(kind) = self.failure {
                return Err(io::Error::new(kind, "prompt unavailable"));
            }
            self.answers
                .pop_front()
                .ok_or_else(|| io::Error::new(io::ErrorKind::Interrupted, "operator cancelled"))
        }
    }

    pub(crate) fn record(id: &str, name: &str) -> CustomizationRecord {
        CustomizationRecord {
            id: id.to_string(),
            display_name: name.to_string(),
            kind: CustomizationKind::Language,
        }
    }

    #[test]
    fn test_empty_listing_fails_without_prompt() {
        let mut prompt = ScriptedPrompt::answering("abc");
        let result = resolve(CustomizationKind::Language, &[], &mut prompt);

        assert!(matches!(
            result,
            Err(ResolveError::NoCustomizationsFound {
                kind: CustomizationKind::Language
            })
        ));
        assert_eq!(prompt.calls(), 0);
    }

    #[test]
    fn test_single_record_resolves_without_prompt() {
        let mut prompt = ScriptedPrompt::default();
        let records = [record("abc", "only model")];

        let id = resolve(CustomizationKind::Language, &records, &mut prompt).unwrap();

        assert_eq!(id, "abc");
        assert_eq!(prompt.calls(), 0);
    }

    #[test]
    fn test_multiple_records_prompt_once_and_match() {
        let mut prompt = ScriptedPrompt::answering("def");
        let records = [record("abc", "first"), record("def", "second")];

        let id = resolve(CustomizationKind::Language, &records, &mut prompt).unwrap();

        assert_eq!(id, "def");
        assert_eq!(prompt.calls(), 1);
        assert_eq!(prompt.shown[0], vec!["abc  first", "def  second"]);
    }

    #[test]
    fn test_unknown_id_is_rejected() {
        let mut prompt = ScriptedPrompt::answering("xyz");
        let records = [record("abc", "first"), record("def", "second")];

        let result = resolve(CustomizationKind::Language, &records, &mut prompt);

        match result {
            Err(ResolveError::IdNotFound { id }) => assert_eq!(id, "xyz"),
            other => panic!("expected IdNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_match_is_case_sensitive() {
        let mut prompt = ScriptedPrompt::answering("abc");
        let records = [record("ABC", "upper"), record("DEF", "other")];

        let result = resolve(CustomizationKind::Acoustic, &records, &mut prompt);

        assert!(matches!(result, Err(ResolveError::IdNotFound { .. })));
    }

    #[test]
    fn test_input_is_not_trimmed() {
        let mut prompt = ScriptedPrompt::answering(" def ");
        let records = [record("abc", "first"), record("def", "second")];

        let result = resolve(CustomizationKind::Language, &records, &mut prompt);

        assert!(matches!(result, Err(ResolveError::IdNotFound { id }) if id == " def "));
    }

    #[test]
    fn test_display_name_does_not_match() {
        let mut prompt = ScriptedPrompt::answering("shared");
        let records = [record("abc", "shared"), record("def", "shared")];

        let result = resolve(CustomizationKind::Language, &records, &mut prompt);

        assert!(matches!(result, Err(ResolveError::IdNotFound { .. })));
    }

    #[test]
    fn test_operator_cancel_aborts() {
        let mut prompt = ScriptedPrompt::default();
        let records = [record("abc", "first"), record("def", "second")];

        let result = resolve(CustomizationKind::Language, &records, &mut prompt);

        assert!(matches!(result, Err(ResolveError::Cancelled)));
        assert_eq!(prompt.calls(), 1);
    }

    #[test]
    fn test_prompt_failure_is_not_a_cancel() {
        let mut prompt = ScriptedPrompt::failing(io::ErrorKind::NotConnected);
        let records = [record("abc", "first"), record("def", "second")];

        let err = resolve(CustomizationKind::Language, &records, &mut prompt).unwrap_err();

        assert!(matches!(&err, ResolveError::Prompt(e) if e.kind() == io::ErrorKind::NotConnected));
        assert!(!err.to_string().contains("cancelled"));
    }

    #[test]
    fn test_resolved_id_always_comes_from_listing() {
        let records = [record("abc", "a"), record("def", "d"), record("ghi", "g")];
        for answer in ["abc", "def", "ghi", "ab", "abcd", "", "DEF"] {
            let mut prompt = ScriptedPrompt::answering(answer);
            if let Ok(id) = resolve(CustomizationKind::Language, &records, &mut prompt) {
                assert!(records.iter().any(|r| r.id == id));
                assert_eq!(id, answer);
            }
        }
    }

    #[test]
    fn test_error_messages() {
        let err = ResolveError::NoCustomizationsFound {
            kind: CustomizationKind::Acoustic,
        };
        assert_eq!(err.to_string(), "No custom acoustic model found for this account");

        let err = ResolveError::IdNotFound { id: "xyz".to_string() };
        assert!(err.to_string().contains("'xyz'"));
    }
}
