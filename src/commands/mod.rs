//! Command handlers for stt-customizer.
//!
//! Each submodule dispatches the actions of one resource family to a single API
//! call. Every action other than create and list first resolves which
//! customization it targets.
//!
//! # Commands
//! - `model`: custom language and acoustic models (create, list, get, delete, train, reset, upgrade)
//! - `corpus`: corpora of a custom language model
//! - `words`: custom words of a custom language model
//! - `grammar`: grammars of a custom language model
//! - `audio`: audio resources of a custom acoustic model

pub mod audio;
pub mod corpus;
pub mod grammar;
pub mod model;
pub mod output;
pub mod words;

pub use audio::{handle_audio, AudioAction};
pub use corpus::{handle_corpus, CorpusAction};
pub use grammar::{handle_grammar, GrammarAction};
pub use model::{handle_model, ModelAction};
pub use words::{handle_words, WordsAction};

use std::path::Path;

use anyhow::anyhow;
use clap::Args;

use crate::resolver::{self, ChoicePrompt};
use crate::speech::{CustomizationApi, CustomizationKind};

/// Selects the customization an action operates on.
#[derive(Debug, Clone, Default, Args)]
pub struct Target {
    /// Customization id; when omitted the customizations are listed and a
    /// single one is used, or you are asked to pick
    #[arg(long)]
    pub id: Option<String>,
}

/// Resolves the customization id for an action.
///
/// An explicit id is used as given. Otherwise the customizations of `kind` are
/// listed and handed to the resolver.
///
/// # Errors
/// - If the listing request fails
/// - If no customization exists or the operator picks an unknown id
pub(crate) async fn resolve_target<A, P>(
    api: &A,
    prompt: &mut P,
    kind: CustomizationKind,
    target: Target,
) -> anyhow::Result<String>
where
    A: CustomizationApi,
    P: ChoicePrompt + ?Sized,
{
    if let Some(id) = target.id {
        tracing::debug!("Using explicit {} id {}", kind.name(), id);
        return Ok(id);
    }

    let records = api.list_records(kind).await?;
    tracing::debug!("Listed {} {}(s)", records.len(), kind.name());

    let id = resolver::resolve(kind, &records, prompt)?;
    Ok(id)
}

/// Reads a file to upload.
///
/// # Errors
/// - If the file cannot be read
pub(crate) fn read_upload(path: &Path) -> anyhow::Result<Vec<u8>> {
    let data = std::fs::read(path)
        .map_err(|e| anyhow!("Failed to read {}: {e}", path.display()))?;
    tracing::debug!("Read {} bytes from {}", data.len(), path.display());
    Ok(data)
}
