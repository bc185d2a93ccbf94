//! Grammar actions of a custom language model.

use std::io::Write;
use std::path::PathBuf;

use clap::{Subcommand, ValueEnum};

use super::output::emit;
use super::{read_upload, resolve_target, Target};
use crate::resolver::ChoicePrompt;
use crate::speech::requests;
use crate::speech::{CustomizationApi, CustomizationKind};

/// Grammar file format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum GrammarFormat {
    /// Augmented Backus-Naur Form
    #[default]
    Abnf,
    /// XML Form
    Xml,
}

impl GrammarFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            GrammarFormat::Abnf => "application/srgs",
            GrammarFormat::Xml => "application/srgs+xml",
        }
    }
}

#[derive(Debug, Clone, Subcommand)]
pub enum GrammarAction {
    /// List the grammars of a custom language model
    List {
        #[command(flatten)]
        target: Target,
    },

    /// Add a grammar file to a custom language model
    Add {
        #[command(flatten)]
        target: Target,

        /// Name of the grammar
        #[arg(long)]
        name: String,

        /// Grammar file
        #[arg(long, value_name = "FILE")]
        file: PathBuf,

        /// Grammar file format
        #[arg(long, value_enum, default_value_t = GrammarFormat::Abnf)]
        format: GrammarFormat,

        /// Fail instead of replacing an existing grammar with the same name
        #[arg(long)]
        no_overwrite: bool,
    },

    /// Show a grammar and its analysis status
    Get {
        #[command(flatten)]
        target: Target,

        /// Name of the grammar
        #[arg(long)]
        name: String,
    },

    /// Delete a grammar
    Delete {
        #[command(flatten)]
        target: Target,

        /// Name of the grammar
        #[arg(long)]
        name: String,
    },
}

/// Runs a grammar action.
///
/// # Errors
/// - If the grammar file cannot be read
/// - If the target customization cannot be resolved
/// - If the API call fails
pub async fn handle_grammar<A, P, W>(
    api: &A,
    prompt: &mut P,
    action: GrammarAction,
    out: &mut W,
) -> anyhow::Result<()>
where
    A: CustomizationApi,
    P: ChoicePrompt + ?Sized,
    W: Write + ?Sized,
{
    let kind = CustomizationKind::Language;

    match action {
        GrammarAction::List { target } => {
            let id = resolve_target(api, prompt, kind, target).await?;
            let response = api.send(requests::list_grammars(&id)).await?;
            emit(out, &response, &format!("No grammars for {id}"))
        }
        GrammarAction::Add {
            target,
            name,
            file,
            format,
            no_overwrite,
        } => {
            let grammar = read_upload(&file)?;
            let id = resolve_target(api, prompt, kind, target).await?;
            let response = api
                .send(requests::add_grammar(
                    &id,
                    &name,
                    format.content_type(),
                    grammar,
                    !no_overwrite,
                ))
                .await?;
            tracing::info!("Added grammar {} to {}", name, id);
            emit(out, &response, &format!("Added grammar {name} to {id}"))
        }
        GrammarAction::Get { target, name } => {
            let id = resolve_target(api, prompt, kind, target).await?;
            let response = api.send(requests::get_grammar(&id, &name)).await?;
            emit(out, &response, &format!("No details returned for grammar {name}"))
        }
        GrammarAction::Delete { target, name } => {
            let id = resolve_target(api, prompt, kind, target).await?;
            let response = api.send(requests::delete_grammar(&id, &name)).await?;
            emit(out, &response, &format!("Deleted grammar {name} from {id}"))
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
    async fn test_add_xml_grammar() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("confirm.xml");
        std::fs::write(&file, "<grammar/>").unwrap();

        let api = FakeApi::with_responses(vec![listing(&["abc", "def"])]);
        let mut prompt = ScriptedPrompt::answering("abc");
        let mut out = Vec::new();

        handle_grammar(
            &api,
            &mut prompt,
            GrammarAction::Add {
                target: Target::default(),
                name: "confirm".to_string(),
                file,
                format: GrammarFormat::Xml,
                no_overwrite: true,
            },
            &mut out,
        )
        .await
        .unwrap();

        let sent = api.sent.borrow();
        assert_eq!(sent[1].path, "/v1/customizations/abc/grammars/confirm");
        assert_eq!(
            sent[1].query,
            vec![("allow_overwrite".to_string(), "false".to_string())]
        );
        assert!(matches!(
            &sent[1].body,
            RequestBody::Bytes { content_type, .. } if content_type == "application/srgs+xml"
        ));
    }

    #[test]
    fn test_default_format_is_abnf() {
        assert_eq!(GrammarFormat::default().content_type(), "application/srgs");
    }
}
