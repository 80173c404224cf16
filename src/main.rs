// SPDX-License-Identifier: MIT

use clap::{Parser, Subcommand};
use dotenv::dotenv;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use emoji_oracle::game::engine::{GuessOutcome, Round};
use emoji_oracle::game::settings::SettingsStore;
use emoji_oracle::game::stats::StatsStore;
use emoji_oracle::game::text::UiText;
use emoji_oracle::gateway::{Language, Provider, PuzzleGateway, Topic};

#[derive(Parser, Debug)]
#[command(author, version, about = "An LLM-powered emoji guessing game", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Play rounds of the guessing game
    Play {
        /// Topic to play (movies, food, animals, actions, objects); prompts when omitted
        #[arg(short, long)]
        topic: Option<Topic>,

        /// Set and persist the puzzle language (en or zh-CN)
        #[arg(short, long)]
        language: Option<Language>,

        /// Set and persist creativity; clamped to [0.2, 1.0]
        #[arg(short, long)]
        creativity: Option<f64>,
    },
    /// Show aggregate game statistics
    Stats,
    /// Manage model configurations
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// List configs; the active one is marked with *
    List,
    /// Add a config seeded from the provider's defaults and make it active
    Add {
        /// Provider key (google, openai, deepseek, anthropic, ollama, groq)
        provider: Provider,

        /// Human label; defaults to "New <provider label>"
        #[arg(short, long)]
        name: Option<String>,

        #[arg(short, long)]
        api_key: Option<String>,
    },
    /// Update fields of an existing config
    Set {
        id: String,

        #[arg(long)]
        name: Option<String>,

        /// Switching provider re-seeds base URL and model from its defaults
        #[arg(long)]
        provider: Option<Provider>,

        #[arg(long)]
        api_key: Option<String>,

        #[arg(long)]
        base_url: Option<String>,

        #[arg(long)]
        model: Option<String>,
    },
    /// Select the active config
    Use { id: String },
    /// Delete a config; the last remaining one cannot be deleted
    Remove { id: String },
}

type MainResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[tokio::main]
async fn main() -> MainResult {
    dotenv().ok();
    env_logger::init();

    let args = Args::parse();

    let data_dir = data_dir();
    let settings_store = SettingsStore::new(data_dir.join("settings.yaml"));
    let stats_store = StatsStore::new(data_dir.join("stats.json"));

    match args.command {
        Commands::Play {
            topic,
            language,
            creativity,
        } => play(&settings_store, &stats_store, topic, language, creativity).await,
        Commands::Stats => show_stats(&settings_store, &stats_store),
        Commands::Config { command } => run_config(&settings_store, command),
    }
}

fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("emoji-oracle")
}

/// Process-level default credential for the Google adapter, passed into the
/// gateway explicitly so nothing below main reads the environment.
fn default_google_key() -> Option<String> {
    std::env::var("GEMINI_API_KEY")
        .or_else(|_| std::env::var("API_KEY"))
        .ok()
        .filter(|key| !key.is_empty())
}

async fn play(
    settings_store: &SettingsStore,
    stats_store: &StatsStore,
    topic: Option<Topic>,
    language: Option<Language>,
    creativity: Option<f64>,
) -> MainResult {
    let mut settings = settings_store.load()?;
    if language.is_some() || creativity.is_some() {
        if let Some(language) = language {
            settings.set_language(language);
        }
        if let Some(creativity) = creativity {
            settings.set_creativity(creativity);
        }
        settings_store.save(&settings)?;
    }

    let text = UiText::for_language(settings.language);
    let topic = match topic {
        Some(topic) => topic,
        None => prompt_topic(text)?,
    };

    let gateway = PuzzleGateway::new(default_google_key())?;
    let config = settings.active_config().clone();
    let mut stats = stats_store.load()?;

    log::info!(
        "starting game: topic={} config={} ({})",
        topic,
        config.name,
        config.provider
    );
    println!("{} - {}", text.title, topic);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    'rounds: loop {
        println!("\n{}", text.generating);
        let puzzle = gateway
            .generate_puzzle(topic, settings.language, settings.creativity, &config)
            .await;
        let mut round = Round::new(puzzle);

        if round.is_error() {
            // The sentinel's hint carries the provider error message.
            println!("{}: {}", text.generation_failed, round.hint());
            break;
        }

        println!("\n  {}\n", round.emojis());
        println!("{}", text.commands_help);

        loop {
            print!("{}> ", text.guess_prompt);
            io::stdout().flush()?;
            let Some(line) = lines.next() else {
                break 'rounds;
            };
            let input = line?;

            match input.trim().to_lowercase().as_str() {
                "" => {}
                "quit" | "exit" | "q" => break 'rounds,
                "hint" | "h" => println!("{}: {}", text.hint_label, round.hint()),
                "skip" | "next" | "s" => {
                    println!("{}: {}", text.answer_was, round.answer());
                    stats.record_loss();
                    stats_store.save(&stats)?;
                    continue 'rounds;
                }
                guess => match round.check(guess) {
                    GuessOutcome::Correct { points } => {
                        println!("{} +{}", text.correct, points);
                        stats.record_win(points);
                        stats_store.save(&stats)?;
                        continue 'rounds;
                    }
                    GuessOutcome::Wrong => println!("{}", text.wrong),
                },
            }
        }
    }

    println!("{}", text.goodbye);
    Ok(())
}

fn prompt_topic(text: &UiText) -> Result<Topic, Box<dyn std::error::Error + Send + Sync>> {
    println!("{}", text.choose_topic);
    for (index, topic) in Topic::ALL.iter().enumerate() {
        println!("  {}. {}", index + 1, topic);
    }

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let mut line = String::new();
        if stdin.read_line(&mut line)? == 0 {
            return Err("no topic selected".into());
        }

        let input = line.trim();
        if let Ok(index) = input.parse::<usize>() {
            if (1..=Topic::ALL.len()).contains(&index) {
                return Ok(Topic::ALL[index - 1]);
            }
        }
        if let Ok(topic) = input.parse::<Topic>() {
            return Ok(topic);
        }
        println!("{}", text.invalid_topic);
    }
}

fn show_stats(settings_store: &SettingsStore, stats_store: &StatsStore) -> MainResult {
    let settings = settings_store.load()?;
    let text = UiText::for_language(settings.language);
    let stats = stats_store.load()?;

    println!("{}", text.stats_title);
    println!("  {:<14} {}", text.total_games, stats.total_games);
    println!("  {:<14} {}%", text.win_rate, stats.win_rate());
    println!("  {:<14} {}", text.best_streak, stats.best_streak);
    println!("  {:<14} {}", text.total_score, stats.total_score);
    Ok(())
}

fn run_config(store: &SettingsStore, command: ConfigCommands) -> MainResult {
    let mut settings = store.load()?;

    match command {
        ConfigCommands::List => {
            for config in &settings.model_configs {
                let marker = if config.id == settings.active_config_id {
                    "*"
                } else {
                    " "
                };
                let key = if config.api_key.is_empty() {
                    "no key"
                } else {
                    "key set"
                };
                println!(
                    "{} {}  {} [{} / {}] ({})",
                    marker, config.id, config.name, config.provider, config.model_name, key
                );
            }
            return Ok(());
        }
        ConfigCommands::Add {
            provider,
            name,
            api_key,
        } => {
            let id = settings.add_config(provider, name);
            if let Some(key) = api_key {
                settings.set_api_key(&id, &key)?;
            }
            println!("added config {} (now active)", id);
        }
        ConfigCommands::Set {
            id,
            name,
            provider,
            api_key,
            base_url,
            model,
        } => {
            // Provider first: it re-seeds base URL and model, which explicit
            // flags on the same invocation then override.
            if let Some(provider) = provider {
                settings.set_provider(&id, provider)?;
            }
            if let Some(name) = name {
                settings.set_name(&id, &name)?;
            }
            if let Some(key) = api_key {
                settings.set_api_key(&id, &key)?;
            }
            if let Some(url) = base_url {
                settings.set_base_url(&id, &url)?;
            }
            if let Some(model) = model {
                settings.set_model_name(&id, &model)?;
            }
            println!("updated config {}", id);
        }
        ConfigCommands::Use { id } => {
            settings.set_active(&id)?;
            println!("active config is now {}", id);
        }
        ConfigCommands::Remove { id } => {
            settings.remove_config(&id)?;
            println!("removed config {}", id);
        }
    }

    store.save(&settings)?;
    Ok(())
}
