use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "scorecard-tui", version, about = "South Asia regional scorecard TUI")]
pub struct CliArgs {
    /// Print dataset stats and exit
    #[arg(long)]
    pub headless: bool,

    /// Print headless stats as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Override the backend base URL
    #[arg(long, value_name = "URL")]
    pub api: Option<String>,

    /// Load observations from a local JSON snapshot instead of the backend
    #[arg(long, value_name = "PATH")]
    pub data: Option<String>,
}

impl CliArgs {
    pub fn apply_env_overrides(&self) {
        if let Some(url) = &self.api {
            std::env::set_var("SCORECARD_API_URL", url);
        }
        if let Some(path) = &self.data {
            std::env::set_var("SCORECARD_DATA", path);
        }
        if self.debug {
            std::env::set_var("DEBUG", "1");
        }
    }
}
