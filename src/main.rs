use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use wordharvest::{
    browser::ChromiumSession,
    config::Config,
    session::{RunSettings, SectionPlan, SiteProfiles, run_harvest, run_translation, settle},
    wordfile::load_word_list,
};

#[derive(Parser)]
#[command(
    name = "wordharvest",
    about = "Harvest vocabulary from an online encyclopedia and translate it",
    version
)]
struct Cli {
    /// JSON file overriding the built-in site profiles
    #[arg(long, global = true)]
    profile: Option<PathBuf>,

    /// Chrome or Chromium executable
    #[arg(long, global = true)]
    chrome_path: Option<PathBuf>,

    /// Show the browser window
    #[arg(long, global = true)]
    headed: bool,

    /// Seconds to wait for a page or element
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    /// Directory word files are written to
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    /// Log as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Collect words from random encyclopedia articles
    Harvest {
        /// Number of articles to visit
        #[arg(long, default_value_t = 100)]
        articles: usize,

        /// Output file name, without extension
        #[arg(long, default_value = "english")]
        output: String,
    },
    /// Translate a word file
    Translate {
        /// Word file to translate (`word, id` per line)
        #[arg(long)]
        input: PathBuf,

        /// Output file name, without extension
        #[arg(long, default_value = "chinese")]
        output: String,

        /// Number of sections the word list is split into
        #[arg(long, default_value_t = 100)]
        sections: usize,

        /// First section to translate
        #[arg(long, default_value_t = 0)]
        start_section: usize,
    },
}

impl Cli {
    fn config(&self) -> Result<Config> {
        let mut config = Config::from_env()?;
        if let Some(path) = &self.chrome_path {
            config = config.with_chrome_path(path.clone());
        }
        if self.headed {
            config = config.with_headless(false);
        }
        if let Some(secs) = self.timeout_secs {
            config = config.with_timeout(Duration::from_secs(secs))?;
        }
        if let Some(dir) = &self.output_dir {
            config = config.with_output_dir(dir.clone());
        }
        Ok(config)
    }

    fn profiles(&self) -> Result<SiteProfiles> {
        match &self.profile {
            Some(path) => SiteProfiles::load(path)
                .with_context(|| format!("failed to load profile {}", path.display())),
            None => Ok(SiteProfiles::default()),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    if cli.log_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    let config = cli.config()?;
    let profiles = cli.profiles()?;
    let settings = RunSettings::from(&config);

    match &cli.command {
        Command::Harvest { articles, output } => {
            let mut browser = ChromiumSession::launch(&config).await?;
            let outcome =
                run_harvest(&mut browser, &profiles.encyclopedia, &settings, *articles, output)
                    .await;
            let summary = settle(outcome, browser.close().await)?;
            info!(
                articles = summary.articles,
                skipped = summary.skipped,
                words = summary.words_written,
                "done"
            );
        }
        Command::Translate {
            input,
            output,
            sections,
            start_section,
        } => {
            // Read the word list before starting a browser.
            let words = load_word_list(input)
                .with_context(|| format!("failed to load word list {}", input.display()))?;

            let mut browser = ChromiumSession::launch(&config).await?;
            let outcome = run_translation(
                &mut browser,
                &profiles.translator,
                &settings,
                &words,
                SectionPlan::new(*sections, *start_section),
                output,
            )
            .await;
            let summary = settle(outcome, browser.close().await)?;
            info!(
                translated = summary.translated,
                failed = summary.failed,
                words = summary.words_written,
                "done"
            );
        }
    }

    Ok(())
}
