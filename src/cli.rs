// Argument model for the `gnotes` binary. Parsing only; the handlers live
// in `commands`.

use crate::api::DEFAULT_BASE_URL;
use clap::builder::NonEmptyStringValueParser;
use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "gnotes")]
#[command(version, about = "CLI client for gopher-notes", long_about = None)]
#[command(disable_version_flag = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API base URL
    #[arg(long, global = true, env = "GNOTES_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Log requests and responses to stderr
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Print version
    #[arg(short = 'v', long, short_alias = 'V', action = ArgAction::Version)]
    pub version: Option<bool>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in and store the session token
    Login {
        /// User email
        #[arg(long, value_parser = NonEmptyStringValueParser::new())]
        email: String,

        /// User password (prompted for when omitted on a terminal)
        #[arg(long, value_parser = NonEmptyStringValueParser::new())]
        password: Option<String>,
    },

    /// Show the logged-in user
    Me,

    /// Revoke the session and forget the stored token
    Logout,

    /// Work with notes
    #[command(subcommand)]
    Notes(NotesCommand),

    /// Print the version
    Version,
}

#[derive(Subcommand, Debug)]
pub enum NotesCommand {
    /// List all notes
    List,

    /// Create a note
    Create {
        /// Note title
        #[arg(long, value_parser = NonEmptyStringValueParser::new())]
        title: String,

        /// Note body
        #[arg(long, value_parser = NonEmptyStringValueParser::new())]
        body: String,
    },

    /// Show a single note
    Get {
        /// Note id
        #[arg(allow_negative_numbers = true)]
        id: i64,
    },

    /// Delete a note
    Delete {
        /// Note id
        #[arg(allow_negative_numbers = true)]
        id: i64,
    },
}

impl Commands {
    /// Prefix used for error lines, e.g. `notes get: invalid id`.
    pub fn label(&self) -> &'static str {
        match self {
            Commands::Login { .. } => "login",
            Commands::Me => "me",
            Commands::Logout => "logout",
            Commands::Notes(NotesCommand::List) => "notes list",
            Commands::Notes(NotesCommand::Create { .. }) => "notes create",
            Commands::Notes(NotesCommand::Get { .. }) => "notes get",
            Commands::Notes(NotesCommand::Delete { .. }) => "notes delete",
            Commands::Version => "version",
        }
    }
}
