//! Custom language and acoustic model actions.

use std::io::Write;

use clap::Subcommand;

use super::output::emit;
use super::{resolve_target, Target};
use crate::resolver::ChoicePrompt;
use crate::speech::requests::{self, NewModel, TrainOptions};
use crate::speech::{CustomizationApi, CustomizationKind};

#[derive(Debug, Clone, Subcommand)]
pub enum ModelAction {
    /// Create a custom model
    Create {
        /// Name of the new model
        #[arg(long)]
        name: String,

        /// Base model to customize (e.g. es-CO_NarrowbandModel)
        #[arg(long, value_name = "MODEL")]
        base_model: String,

        /// Free-form description
        #[arg(long)]
        description: Option<String>,

        /// Dialect of the base model's language (language models only)
        #[arg(long)]
        dialect: Option<String>,
    },

    /// List custom models
    List {
        /// Only list models for this language (e.g. es-CO)
        #[arg(long)]
        language: Option<String>,
    },

    /// Show a custom model and its status
    Get {
        #[command(flatten)]
        target: Target,
    },

    /// Delete a custom model
    Delete {
        #[command(flatten)]
        target: Target,
    },

    /// Start training a custom model on its resources
    Train {
        #[command(flatten)]
        target: Target,

        /// Words to train on: all or user (language models only)
        #[arg(long, value_name = "TYPE")]
        word_type_to_add: Option<String>,

        /// Weight of custom data against base model data, 0.0 to 1.0 (language models only)
        #[arg(long, value_name = "WEIGHT")]
        customization_weight: Option<f64>,

        /// Custom language model to train alongside (acoustic models only)
        #[arg(long, value_name = "ID")]
        custom_language_model_id: Option<String>,

        /// Fail if the audio resources are insufficient (acoustic models only)
        #[arg(long)]
        strict: Option<bool>,
    },

    /// Remove all training data from a custom model
    Reset {
        #[command(flatten)]
        target: Target,
    },

    /// Upgrade a custom model to the latest version of its base model
    Upgrade {
        #[command(flatten)]
        target: Target,

        /// Custom language model trained with the acoustic model (acoustic models only)
        #[arg(long, value_name = "ID")]
        custom_language_model_id: Option<String>,
    },
}

/// Runs a model action against the `kind` collection.
///
/// # Errors
/// - If the target customization cannot be resolved
/// - If the API call fails
pub async fn handle_model<A, P, W>(
    api: &A,
    prompt: &mut P,
    kind: CustomizationKind,
    action: ModelAction,
    out: &mut W,
) -> anyhow::Result<()>
where
    A: CustomizationApi,
    P: ChoicePrompt + ?Sized,
    W: Write + ?Sized,
{
    match action {
        ModelAction::Create {
            name,
            base_model,
            description,
            dialect,
        } => {
            if kind == CustomizationKind::Acoustic && dialect.is_some() {
                tracing::warn!("--dialect only applies to language models; ignoring it");
            }
            let model = NewModel {
                name,
                base_model_name: base_model,
                description,
                dialect,
            };
            let response = api.send(requests::create_model(kind, &model)).await?;
            emit(out, &response, &format!("Created {} {}", kind.name(), model.name))
        }
        ModelAction::List { language } => {
            let response = api
                .send(requests::list_models(kind, language.as_deref()))
                .await?;
            emit(out, &response, &format!("No {}s", kind.name()))
        }
        ModelAction::Get { target } => {
            let id = resolve_target(api, prompt, kind, target).await?;
            let response = api.send(requests::get_model(kind, &id)).await?;
            emit(out, &response, &format!("No details returned for {id}"))
        }
        ModelAction::Delete { target } => {
            let id = resolve_target(api, prompt, kind, target).await?;
            let response = api.send(requests::delete_model(kind, &id)).await?;
            tracing::info!("Deleted {} {}", kind.name(), id);
            emit(out, &response, &format!("Deleted {} {id}", kind.name()))
        }
        ModelAction::Train {
            target,
            word_type_to_add,
            customization_weight,
            custom_language_model_id,
            strict,
        } => {
            let options = TrainOptions {
                word_type_to_add,
                customization_weight,
                custom_language_model_id,
                strict,
            };
            warn_ignored_train_options(kind, &options);
            let id = resolve_target(api, prompt, kind, target).await?;
            let response = api.send(requests::train_model(kind, &id, &options)).await?;
            tracing::info!("Training started for {} {}", kind.name(), id);
            emit(out, &response, &format!("Training started for {} {id}", kind.name()))
        }
        ModelAction::Reset { target } => {
            let id = resolve_target(api, prompt, kind, target).await?;
            let response = api.send(requests::reset_model(kind, &id)).await?;
            emit(out, &response, &format!("Reset {} {id}", kind.name()))
        }
        ModelAction::Upgrade {
            target,
            custom_language_model_id,
        } => {
            if kind == CustomizationKind::Language && custom_language_model_id.is_some() {
                tracing::warn!("--custom-language-model-id only applies to acoustic models; ignoring it");
            }
            let id = resolve_target(api, prompt, kind, target).await?;
            let response = api
                .send(requests::upgrade_model(
                    kind,
                    &id,
                    custom_language_model_id.as_deref(),
                ))
                .await?;
            emit(out, &response, &format!("Upgrade started for {} {id}", kind.name()))
        }
    }
}

fn warn_ignored_train_options(kind: CustomizationKind, options: &TrainOptions) {
    match kind {
        CustomizationKind::Language => {
            if options.custom_language_model_id.is_some() || options.strict.is_some() {
                tracing::warn!("Acoustic training options ignored for a language model");
            }
        }
        CustomizationKind::Acoustic => {
            if options.word_type_to_add.is_some() || options.customization_weight.is_some() {
                tracing::warn!("Language training options ignored for an acoustic model");
            }
        }
    }
}
