//! Corpus actions of a custom language model.

use std::io::Write;
use std::path::PathBuf;

use clap::Subcommand;

use super::output::emit;
use super::{read_upload, resolve_target, Target};
use crate::resolver::ChoicePrompt;
use crate::speech::requests;
use crate::speech::{CustomizationApi, CustomizationKind};

#[derive(Debug, Clone, Subcommand)]
pub enum CorpusAction {
    /// List the corpora of a custom language model
    List {
        #[command(flatten)]
        target: Target,
    },

    /// Add a plain-text corpus to a custom language model
    Add {
        #[command(flatten)]
        target: Target,

        /// Name of the corpus
        #[arg(long)]
        name: String,

        /// Text file with the corpus contents
        #[arg(long, value_name = "FILE")]
        file: PathBuf,

        /// Fail instead of replacing an existing corpus with the same name
        #[arg(long)]
        no_overwrite: bool,
    },

    /// Show a corpus and its analysis status
    Get {
        #[command(flatten)]
        target: Target,

        /// Name of the corpus
        #[arg(long)]
        name: String,
    },

    /// Delete a corpus
    Delete {
        #[command(flatten)]
        target: Target,

        /// Name of the corpus
        #[arg(long)]
        name: String,
    },
}

/// Runs a corpus action.
///
/// # Errors
/// - If the corpus file cannot be read
/// - If the target customization cannot be resolved
/// - If the API call fails
pub async fn handle_corpus<A, P, W>(
    api: &A,
    prompt: &mut P,
    action: CorpusAction,
    out: &mut W,
) -> anyhow::Result<()>
where
    A: CustomizationApi,
    P: ChoicePrompt + ?Sized,
    W: Write + ?Sized,
{
    let kind = CustomizationKind::Language;

    match action {
        CorpusAction::List { target } => {
            let id = resolve_target(api, prompt, kind, target).await?;
            let response = api.send(requests::list_corpora(&id)).await?;
            emit(out, &response, &format!("No corpora for {id}"))
        }
        CorpusAction::Add {
            target,
            name,
            file,
            no_overwrite,
        } => {
            let text = read_upload(&file)?;
            let id = resolve_target(api, prompt, kind, target).await?;
            let response = api
                .send(requests::add_corpus(&id, &name, text, !no_overwrite))
                .await?;
            tracing::info!("Added corpus {} to {}", name, id);
            emit(
                out,
                &response,
                &format!("Added corpus {name} to {id}. Check its status with 'corpus get' before training."),
            )
        }
        CorpusAction::Get { target, name } => {
            let id = resolve_target(api, prompt, kind, target).await?;
            let response = api.send(requests::get_corpus(&id, &name)).await?;
            emit(out, &response, &format!("No details returned for corpus {name}"))
        }
        CorpusAction::Delete { target, name } => {
            let id = resolve_target(api, prompt, kind, target).await?;
            let response = api.send(requests::delete_corpus(&id, &name)).await?;
            tracing::info!("Deleted corpus {} from {}", name, id);
            emit(out, &response, &format!("Deleted corpus {name} from {id}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{listing, FakeApi};
    use crate::resolver::tests::ScriptedPrompt;
    use crate::speech::RequestBody;

    #[tokio::test]
    async fn test_add_uploads_file_with_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("express-2020-09-08.txt");
        std::fs::write(&file, "buenos días\nquiero un plan express\n").unwrap();

        let api = FakeApi::with_responses(vec![listing(&["7fa5d91f"])]);
        let mut prompt = ScriptedPrompt::default();
        let mut out = Vec::new();

        handle_corpus(
            &api,
            &mut prompt,
            CorpusAction::Add {
                target: Target::default(),
                name: "express-2020-09-08".to_string(),
                file,
                no_overwrite: false,
            },
            &mut out,
        )
        .await
        .unwrap();

        let sent = api.sent.borrow();
        assert_eq!(sent.len(), 2);
        assert_eq!(
            sent[1].path,
            "/v1/customizations/7fa5d91f/corpora/express-2020-09-08"
        );
        assert_eq!(
            sent[1].query,
            vec![("allow_overwrite".to_string(), "true".to_string())]
        );
        assert!(matches!(
            &sent[1].body,
            RequestBody::Bytes { content_type, data }
                if content_type == "text/plain" && data.starts_with("buenos".as_bytes())
        ));
    }

    #[tokio::test]
    async fn test_add_missing_file_makes_no_calls() {
        let dir = tempfile::tempdir().unwrap();
        let api = FakeApi::default();
        let mut prompt = ScriptedPrompt::default();
        let mut out = Vec::new();

        let result = handle_corpus(
            &api,
            &mut prompt,
            CorpusAction::Add {
                target: Target::default(),
                name: "missing".to_string(),
                file: dir.path().join("missing.txt"),
                no_overwrite: true,
            },
            &mut out,
        )
        .await;

        assert!(result.is_err());
        assert!(api.sent.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_delete_reports_confirmation() {
        let api = FakeApi::default();
        let mut prompt = ScriptedPrompt::default();
        let mut out = Vec::new();

        handle_corpus(
            &api,
            &mut prompt,
            CorpusAction::Delete {
                target: Target {
                    id: Some("abc".to_string()),
                },
                name: "old".to_string(),
            },
            &mut out,
        )
        .await
        .unwrap();

        assert_eq!(api.paths(), vec!["DELETE /v1/customizations/abc/corpora/old"]);
        assert_eq!(String::from_utf8(out).unwrap(), "Deleted corpus old from abc\n");
    }
}
