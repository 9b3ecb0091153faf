use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::io;

use crate::commands::{
    NoteEdits, cmd_add, cmd_colors, cmd_config_path, cmd_config_set, cmd_config_show, cmd_edit,
    cmd_login, cmd_logout, cmd_ls, cmd_rm, cmd_signup,
};
use crate::note::normalize_color;

#[derive(Parser)]
#[command(name = "quicknotes")]
#[command(about = "Quick rich-text notes synced with your note service")]
#[command(version)]
pub struct Cli {
    /// Log requests and state changes to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create an account
    Signup {
        /// Display name (prompted when omitted)
        #[arg(long)]
        name: Option<String>,

        /// Email address (prompted when omitted)
        #[arg(long)]
        email: Option<String>,

        /// Password (prompted when omitted)
        #[arg(long)]
        password: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Log in and remember the session for 7 days
    Login {
        /// Email address (prompted when omitted)
        #[arg(long)]
        email: Option<String>,

        /// Password (prompted when omitted)
        #[arg(long)]
        password: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Log out and forget the session
    Logout {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List your notes
    #[command(visible_alias = "list")]
    Ls {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create a note
    #[command(visible_alias = "new")]
    Add {
        /// Note title
        #[arg(short, long)]
        title: String,

        /// Note content, rich text allowed (reads from stdin if not provided)
        #[arg(short, long)]
        content: Option<String>,

        /// Note color as hex, e.g. #fff475 (default: #ffffff)
        #[arg(long, value_parser = parse_color)]
        color: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Edit a note
    Edit {
        /// Note ID
        #[arg(value_parser = parse_note_id)]
        id: String,

        /// New title
        #[arg(short, long)]
        title: Option<String>,

        /// New content
        #[arg(short, long)]
        content: Option<String>,

        /// New color as hex
        #[arg(long, value_parser = parse_color)]
        color: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete a note
    #[command(visible_alias = "delete")]
    Rm {
        /// Note ID
        #[arg(value_parser = parse_note_id)]
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the preset note colors
    Colors {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for [possible values: bash, zsh, fish, powershell, elvish]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Set a configuration value (api_url, request_timeout_secs)
    Set {
        /// Configuration key
        key: String,

        /// Value to set
        value: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the config and session file paths
    Path {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Commands {
    /// Execute the command
    pub async fn run(self) -> crate::error::Result<()> {
        match self {
            Commands::Signup {
                name,
                email,
                password,
                json,
            } => cmd_signup(name, email, password, json).await,
            Commands::Login {
                email,
                password,
                json,
            } => cmd_login(email, password, json).await,
            Commands::Logout { json } => cmd_logout(json).await,

            Commands::Ls { json } => cmd_ls(json).await,
            Commands::Add {
                title,
                content,
                color,
                json,
            } => cmd_add(title, content, color, json).await,
            Commands::Edit {
                id,
                title,
                content,
                color,
                json,
            } => {
                let edits = NoteEdits {
                    title,
                    content,
                    color,
                };
                cmd_edit(&id, edits, json).await
            }
            Commands::Rm { id, json } => cmd_rm(&id, json).await,
            Commands::Colors { json } => cmd_colors(json),

            Commands::Config { action } => match action {
                ConfigAction::Show { json } => cmd_config_show(json),
                ConfigAction::Set { key, value, json } => cmd_config_set(&key, &value, json),
                ConfigAction::Path { json } => cmd_config_path(json),
            },

            Commands::Completions { shell } => {
                generate_completions(shell);
                Ok(())
            }
        }
    }
}

fn parse_color(s: &str) -> Result<String, String> {
    normalize_color(s).map_err(|e| e.to_string())
}

fn parse_note_id(s: &str) -> Result<String, String> {
    if s.trim().is_empty() {
        return Err("ID cannot be empty".to_string());
    }

    if s.chars().any(char::is_control) {
        return Err("ID cannot contain control characters".to_string());
    }

    Ok(s.to_string())
}

pub fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "quicknotes", &mut io::stdout());
}
