//! Command-line interface definition

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::DEFAULT_DIALOG_LIMIT;

const EXAMPLES: &str = "\
Interactive mode:
  tgsend photo.jpg              Open TUI to select contact and send

LLM-friendly commands (JSON output):
  tgsend config --api-id ID --api-hash HASH   Configure credentials
  tgsend status                               Check auth status
  tgsend auth --phone +1234567890             Start authentication
  tgsend auth --phone +1234567890 --code 12345   Complete authentication
  tgsend contacts                             List contacts
  tgsend contacts --search \"john\"             Search contacts
  tgsend send file.jpg --to \"John\"            Send file by name
  tgsend send file.jpg --to-id 123456789      Send file by ID";

#[derive(Parser, Debug)]
#[command(name = "tgsend")]
#[command(about = "📨 Send files to Telegram contacts", long_about = None)]
#[command(version, after_help = EXAMPLES)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// File to send; opens the interactive contact picker
    pub file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Configure API credentials
    Config {
        /// Telegram API ID
        #[arg(long)]
        api_id: Option<i32>,

        /// Telegram API Hash
        #[arg(long)]
        api_hash: Option<String>,
    },

    /// Check authentication status
    Status,

    /// Authenticate with Telegram
    Auth(AuthArgs),

    /// List or search contacts
    Contacts {
        /// Fuzzy search query
        #[arg(short, long)]
        search: Option<String>,

        /// Max contacts to fetch
        #[arg(short, long, default_value_t = DEFAULT_DIALOG_LIMIT)]
        limit: usize,
    },

    /// Send file (non-interactive)
    Send {
        /// Path to file to send
        file: PathBuf,

        /// Recipient name (fuzzy matched)
        #[arg(long)]
        to: Option<String>,

        /// Recipient Telegram ID
        #[arg(long, allow_negative_numbers = true)]
        to_id: Option<i64>,
    },
}

#[derive(clap::Args, Debug, Default, Clone, PartialEq, Eq)]
pub struct AuthArgs {
    /// Phone number with country code (e.g., +1234567890)
    #[arg(long)]
    pub phone: Option<String>,

    /// Verification code from Telegram
    #[arg(long)]
    pub code: Option<String>,

    /// Phone code hash from code_sent response
    #[arg(long)]
    pub phone_code_hash: Option<String>,

    /// 2FA password if enabled
    #[arg(long)]
    pub password: Option<String>,
}
