//! Audio resource actions of a custom acoustic model.

use std::io::Write;
use std::path::PathBuf;

use clap::Subcommand;

use super::output::emit;
use super::{read_upload, resolve_target, Target};
use crate::resolver::ChoicePrompt;
use crate::speech::requests;
use crate::speech::{CustomizationApi, CustomizationKind};

#[derive(Debug, Clone, Subcommand)]
pub enum AudioAction {
    /// List the audio resources of a custom acoustic model
    List {
        #[command(flatten)]
        target: Target,
    },

    /// Add an audio file or archive to a custom acoustic model
    Add {
        #[command(flatten)]
        target: Target,

        /// Name of the audio resource
        #[arg(long)]
        name: String,

        /// Audio file or archive (.zip, .tar.gz)
        #[arg(long, value_name = "FILE")]
        file: PathBuf,

        /// Content type of the upload (e.g. audio/wav, application/zip)
        #[arg(long, default_value = "audio/mp3")]
        content_type: String,

        /// Fail instead of replacing an existing audio resource with the same name
        #[arg(long)]
        no_overwrite: bool,
    },

    /// Show an audio resource and its status
    Get {
        #[command(flatten)]
        target: Target,

        /// Name of the audio resource
        #[arg(long)]
        name: String,
    },

    /// Delete an audio resource
    Delete {
        #[command(flatten)]
        target: Target,

        /// Name of the audio resource
        #[arg(long)]
        name: String,
    },
}

/// Runs an audio resource action.
///
/// # Errors
/// - If the audio file cannot be read
/// - If the target customization cannot be resolved
/// - If the API call fails
pub async fn handle_audio<A, P, W>(
    api: &A,
    prompt: &mut P,
    action: AudioAction,
    out: &mut W,
) -> anyhow::Result<()>
where
    A: CustomizationApi,
    P: ChoicePrompt + ?Sized,
    W: Write + ?Sized,
{
    let kind = CustomizationKind::Acoustic;

    match action {
        AudioAction::List { target } => {
            let id = resolve_target(api, prompt, kind, target).await?;
            let response = api.send(requests::list_audio(&id)).await?;
            emit(out, &response, &format!("No audio resources for {id}"))
        }
        AudioAction::Add {
            target,
            name,
            file,
            content_type,
            no_overwrite,
        } => {
            let audio = read_upload(&file)?;
            let id = resolve_target(api, prompt, kind, target).await?;
            let response = api
                .send(requests::add_audio(
                    &id,
                    &name,
                    &content_type,
                    audio,
                    !no_overwrite,
                ))
                .await?;
            tracing::info!("Added audio resource {} to {}", name, id);
            emit(out, &response, &format!("Added audio resource {name} to {id}"))
        }
        AudioAction::Get { target, name } => {
            let id = resolve_target(api, prompt, kind, target).await?;
            let response = api.send(requests::get_audio(&id, &name)).await?;
            emit(out, &response, &format!("No details returned for audio resource {name}"))
        }
        AudioAction::Delete { target, name } => {
            let id = resolve_target(api, prompt, kind, target).await?;
            let response = api.send(requests::delete_audio(&id, &name)).await?;
            emit(out, &response, &format!("Deleted audio resource {name} from {id}"))
        }
    }
}
