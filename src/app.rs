//! Application orchestration and command routing.
//!
//! Parses the command line, selects the credentials provider, and hands the
//! requested action to its command handler.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::anyhow;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};

use crate::commands::{self, AudioAction, CorpusAction, GrammarAction, ModelAction, WordsAction};
use crate::config::{
    self, ConfigFileCredentials, CredentialsProvider, CustomizerConfig, EnvFileCredentials,
    ServiceSettings,
};
use crate::logging;
use crate::resolver::ChoicePrompt;
use crate::setup;
use crate::speech::{CustomizationApi, CustomizationKind, WatsonClient};
use crate::ui::ConsolePrompt;

/// Manage IBM Watson Speech to Text customizations
#[derive(Parser)]
#[command(name = "stt-customizer")]
#[command(version)]
#[command(about = "Manage IBM Watson Speech to Text custom language and acoustic models")]
#[command(long_about = "Manage IBM Watson Speech to Text custom language and acoustic models,\ntheir corpora, words, grammars and audio resources.\n\nActions that target an existing model take --id. Without it the models are\nlisted: a single model is used directly, otherwise you are asked for the id.\n\nEXAMPLES:\n    # Create a custom language model\n    $ stt-customizer language create --name \"IGS lang model\" --base-model es-CO_NarrowbandModel\n\n    # Add a corpus and train\n    $ stt-customizer corpus add --name express-2020-09-08 --file corpora/express-2020-09-08.txt\n    $ stt-customizer corpus get --name express-2020-09-08\n    $ stt-customizer language train\n\n    # Use credentials from an env file instead of the config file\n    $ stt-customizer --env-file .env acoustic list")]
#[command(
    after_help = "CONFIGURATION:\n    Config file:        ~/.config/stt-customizer/stt-customizer.toml\n    Logs:               ~/.local/state/stt-customizer/stt-customizer.log.*"
)]
struct Cli {
    /// Read API_KEY and API_URL from this env file instead of the config file
    #[arg(long, value_name = "FILE", global = true, conflicts_with = "campaign")]
    env_file: Option<PathBuf>,

    /// Campaign from the config file (defaults to default_campaign)
    #[arg(long, value_name = "NAME", global = true)]
    campaign: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage custom language models
    #[command(visible_alias = "lm")]
    Language {
        #[command(subcommand)]
        action: ModelAction,
    },

    /// Manage custom acoustic models
    #[command(visible_alias = "am")]
    Acoustic {
        #[command(subcommand)]
        action: ModelAction,
    },

    /// Manage corpora of a custom language model
    Corpus {
        #[command(subcommand)]
        action: CorpusAction,
    },

    /// Manage custom words of a custom language model
    Words {
        #[command(subcommand)]
        action: WordsAction,
    },

    /// Manage grammars of a custom language model
    Grammar {
        #[command(subcommand)]
        action: GrammarAction,
    },

    /// Manage audio resources of a custom acoustic model
    Audio {
        #[command(subcommand)]
        action: AudioAction,
    },

    /// Generate shell completion script
    ///
    /// Examples:
    ///   stt-customizer completions bash > stt-customizer.bash
    ///   stt-customizer completions zsh > _stt-customizer
    Completions {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Runs the application based on command-line arguments.
///
/// # Errors
/// - If logging initialization fails
/// - If credentials cannot be loaded
/// - If the requested action fails
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Commands::Completions { shell } = &cli.command {
        generate(*shell, &mut Cli::command(), "stt-customizer", &mut io::stdout());
        return Ok(());
    }

    logging::init_logging()?;
    tracing::info!("=== stt-customizer {} ===", env!("CARGO_PKG_VERSION"));

    let (provider, settings) = select_credentials(cli.env_file, cli.campaign)?;
    let credentials = provider.load().map_err(|e| {
        tracing::error!("Failed to load credentials from {}: {e}", provider.describe());
        e
    })?;
    tracing::info!(
        "Using {} ({})",
        provider.describe(),
        credentials.service_url
    );

    let client = WatsonClient::new(&credentials, &settings)?;
    let mut prompt = ConsolePrompt;
    let mut stdout = io::stdout();

    dispatch(&client, &mut prompt, cli.command, &mut stdout)
        .await
        .map_err(|e| {
            tracing::error!("Command failed: {e:#}");
            e
        })
}

/// Picks the credentials provider and the service settings.
///
/// `--env-file` selects the env-file provider and reads service settings from the
/// config file when one exists. Otherwise the config file is required; it is
/// created from the template on first use.
fn select_credentials(
    env_file: Option<PathBuf>,
    campaign: Option<String>,
) -> anyhow::Result<(Box<dyn CredentialsProvider>, ServiceSettings)> {
    let config_path = config::get_config_path()?;

    if let Some(path) = env_file {
        let config = CustomizerConfig::load_or_default(&config_path)?;
        return Ok((Box::new(EnvFileCredentials::new(path)), config.service));
    }

    if setup::ensure_config(&config_path)? {
        return Err(anyhow!(
            "Created config file at {}. Fill in a campaign's api_key and url, or pass --env-file.",
            config_path.display()
        ));
    }

    let config = CustomizerConfig::load_from(&config_path)?;
    let settings = config.service.clone();
    Ok((Box::new(ConfigFileCredentials::new(config, campaign)), settings))
}

/// Routes a command to its handler.
async fn dispatch<A, P, W>(
    api: &A,
    prompt: &mut P,
    command: Commands,
    out: &mut W,
) -> anyhow::Result<()>
where
    A: CustomizationApi,
    P: ChoicePrompt + ?Sized,
    W: Write + ?Sized,
{
    match command {
        Commands::Language { action } => {
            commands::handle_model(api, prompt, CustomizationKind::Language, action, out).await
        }
        Commands::Acoustic { action } => {
            commands::handle_model(api, prompt, CustomizationKind::Acoustic, action, out).await
        }
        Commands::Corpus { action } => commands::handle_corpus(api, prompt, action, out).await,
        Commands::Words { action } => commands::handle_words(api, prompt, action, out).await,
        Commands::Grammar { action } => commands::handle_grammar(api, prompt, action, out).await,
        Commands::Audio { action } => commands::handle_audio(api, prompt, action, out).await,
        Commands::Completions { .. } => unreachable!("Completions are handled before dispatch"),
    }
}
