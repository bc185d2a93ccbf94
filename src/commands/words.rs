//! Custom word actions of a custom language model.

use std::io::Write;
use std::path::PathBuf;

use anyhow::anyhow;
use clap::Subcommand;
use serde_json::Value;

use super::output::emit;
use super::{read_upload, resolve_target, Target};
use crate::resolver::ChoicePrompt;
use crate::speech::requests::{self, WordEntry};
use crate::speech::{CustomizationApi, CustomizationKind};

#[derive(Debug, Clone, Subcommand)]
pub enum WordsAction {
    /// List the words of a custom language model
    List {
        #[command(flatten)]
        target: Target,

        /// Which words to list: all, user, corpora or grammars
        #[arg(long, value_name = "TYPE")]
        word_type: Option<String>,

        /// Sort order: alphabetical or count (prefix with - for descending)
        #[arg(long)]
        sort: Option<String>,
    },

    /// Add or replace a single word
    Add {
        #[command(flatten)]
        target: Target,

        /// The word to add
        #[arg(long)]
        word: String,

        /// Pronunciation hint; repeat for several
        #[arg(long, value_name = "SOUNDS")]
        sounds_like: Vec<String>,

        /// Spelling to use in transcripts
        #[arg(long, value_name = "TEXT")]
        display_as: Option<String>,
    },

    /// Add several words from a JSON file
    ///
    /// The file holds either {"words": [...]} or a bare array of
    /// {"word", "sounds_like", "display_as"} objects.
    Import {
        #[command(flatten)]
        target: Target,

        /// JSON file with the words
        #[arg(long, value_name = "FILE")]
        file: PathBuf,
    },

    /// Show a word
    Get {
        #[command(flatten)]
        target: Target,

        #[arg(long)]
        word: String,
    },

    /// Delete a word
    Delete {
        #[command(flatten)]
        target: Target,

        #[arg(long)]
        word: String,
    },
}

/// Runs a words action.
///
/// # Errors
/// - If the words file cannot be read or parsed
/// - If the target customization cannot be resolved
/// - If the API call fails
pub async fn handle_words<A, P, W>(
    api: &A,
    prompt: &mut P,
    action: WordsAction,
    out: &mut W,
) -> anyhow::Result<()>
where
    A: CustomizationApi,
    P: ChoicePrompt + ?Sized,
    W: Write + ?Sized,
{
    let kind = CustomizationKind::Language;

    match action {
        WordsAction::List {
            target,
            word_type,
            sort,
        } => {
            let id = resolve_target(api, prompt, kind, target).await?;
            let response = api
                .send(requests::list_words(&id, word_type.as_deref(), sort.as_deref()))
                .await?;
            emit(out, &response, &format!("No words for {id}"))
        }
        WordsAction::Add {
            target,
            word,
            sounds_like,
            display_as,
        } => {
            let entry = WordEntry {
                sounds_like,
                display_as,
            };
            let id = resolve_target(api, prompt, kind, target).await?;
            let response = api.send(requests::add_word(&id, &word, &entry)).await?;
            tracing::info!("Added word {} to {}", word, id);
            emit(out, &response, &format!("Added word {word} to {id}"))
        }
        WordsAction::Import { target, file } => {
            let content = read_upload(&file)?;
            let words: Value = serde_json::from_slice(&content)
                .map_err(|e| anyhow!("Invalid words file {}: {e}", file.display()))?;
            let entries = requests::parse_words(words)
                .map_err(|e| anyhow!("Invalid words file {}: {e}", file.display()))?;
            let count = entries.len();

            let id = resolve_target(api, prompt, kind, target).await?;
            let response = api.send(requests::add_words(&id, entries)).await?;
            tracing::info!("Added {} words to {}", count, id);
            emit(out, &response, &format!("Added {count} words to {id}"))
        }
        WordsAction::Get { target, word } => {
            let id = resolve_target(api, prompt, kind, target).await?;
            let response = api.send(requests::get_word(&id, &word)).await?;
            emit(out, &response, &format!("No details returned for word {word}"))
        }
        WordsAction::Delete { target, word } => {
            let id = resolve_target(api, prompt, kind, target).await?;
            let response = api.send(requests::delete_word(&id, &word)).await?;
            emit(out, &response, &format!("Deleted word {word} from {id}"))
        }
    }
}
