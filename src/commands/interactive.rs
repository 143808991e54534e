//! Interactive send: `tgsend <file>`
//!
//! Styled console output instead of JSON. Prompts for anything missing
//! (credentials, login), then hands over to the contact picker and the
//! upload progress bar.

use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::style::Stylize;
use crossterm::terminal::{Clear, ClearType};
use dialoguer::{Input, Password};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use crate::config::{AppPaths, CredentialStore, Credentials, DEFAULT_DIALOG_LIMIT};
use crate::error::{Error, Result};
use crate::output::format_file_size;
use crate::picker::{self, FileInfo, Outcome};
use crate::telegram::{Account, SignIn, TelegramApi};
use crate::text::{display_width, pad_to_width};
use crate::upload;

use super::send::LocalFile;
use super::Session;

/// Wrong codes tolerated before giving up.
pub const MAX_CODE_ATTEMPTS: usize = 3;

/// Source of the answers a first login needs.
#[async_trait]
pub trait Prompter: Send {
    async fn phone(&mut self) -> Result<String>;
    async fn code(&mut self) -> Result<String>;
    async fn password(&mut self) -> Result<String>;
}

/// Prompts on the controlling terminal.
pub struct TerminalPrompter;

#[async_trait]
impl Prompter for TerminalPrompter {
    async fn phone(&mut self) -> Result<String> {
        prompt(|| {
            Input::<String>::new()
                .with_prompt("Phone number")
                .interact_text()
        })
        .await
    }

    async fn code(&mut self) -> Result<String> {
        println!("\n{}", "A code was sent to your Telegram app".dark_grey());
        prompt(|| Input::<String>::new().with_prompt("Enter code").interact_text()).await
    }

    async fn password(&mut self) -> Result<String> {
        println!("\n{}", "Your account has 2FA enabled".dark_grey());
        prompt(|| Password::new().with_prompt("Telegram 2FA password").interact()).await
    }
}

/// Run a blocking dialoguer prompt off the async workers so Ctrl-C stays observable.
async fn prompt<T, F>(ask: F) -> Result<T>
where
    F: FnOnce() -> dialoguer::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(ask)
        .await
        .map_err(|e| Error::IoError(io::Error::other(e)))?
        .map_err(prompt_error)
}

/// Ctrl-C inside a prompt reaches us as an interrupted read.
fn prompt_error(err: dialoguer::Error) -> Error {
    let dialoguer::Error::IO(err) = err;
    if err.kind() == io::ErrorKind::Interrupted {
        Error::Interrupted
    } else {
        Error::IoError(err)
    }
}

/// Sign in from scratch: phone, code (retried on a wrong code), then 2FA if asked.
pub async fn login(api: &dyn TelegramApi, prompter: &mut dyn Prompter) -> Result<Account> {
    let phone = prompter.phone().await?;
    let phone = phone.trim();
    let phone_code_hash = api.send_code(phone).await?;

    for attempt in 1..=MAX_CODE_ATTEMPTS {
        let code = prompter.code().await?;
        match api.sign_in(phone, code.trim(), &phone_code_hash).await {
            Ok(SignIn::Authorized(account)) => return Ok(account),
            Ok(SignIn::PasswordRequired) => {
                let password = prompter.password().await?;
                return api.check_password(&password).await;
            }
            Err(Error::InvalidCode) if attempt < MAX_CODE_ATTEMPTS => {
                warn!(attempt, "wrong login code");
                println!("{}", "✗ Invalid code, try again".red());
            }
            Err(err) => return Err(err),
        }
    }

    Err(Error::InvalidCode)
}

pub fn parse_api_id(input: &str) -> Result<i32> {
    input
        .trim()
        .parse()
        .map_err(|_| Error::InvalidArgument("API ID must be a number".to_string()))
}

/// One console line describing a failed interactive run.
pub fn error_line(err: &Error) -> String {
    match err {
        Error::InvalidArgument(message) => format!("{}", format!("✗ {message}").red()),
        other => format!("{} {other}", "✗ Error:".red().bold()),
    }
}

/// Box `lines` the way a fitted panel looks: one space-padded column per side.
fn panel(lines: &[&str]) -> Vec<String> {
    let inner = lines.iter().map(|l| display_width(l)).max().unwrap_or(0) + 4;
    let rule = "─".repeat(inner);

    let mut out = Vec::with_capacity(lines.len() + 2);
    out.push(format!("╭{rule}╮"));
    for line in lines {
        out.push(format!("│  {}│", pad_to_width(line, inner - 2)));
    }
    out.push(format!("╰{rule}╯"));
    out
}

fn print_header() {
    for line in panel(&["📨 Telegram File Sender"]) {
        println!("{}", line.as_str().cyan().bold());
    }
    println!();
}

fn clear_screen() -> Result<()> {
    let mut stdout = io::stdout();
    execute!(stdout, Clear(ClearType::All), MoveTo(0, 0))?;
    stdout.flush()?;
    Ok(())
}

fn spinner(message: &'static str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .template("{spinner:.cyan} {msg:.bold.cyan}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    bar.set_style(style);
    bar.set_message(message);
    bar.enable_steady_tick(Duration::from_millis(80));
    bar
}

/// Stored credentials, or ask for them on first run and store them.
async fn load_or_prompt_credentials(store: &CredentialStore) -> Result<Credentials> {
    if let Some(credentials) = store.load()? {
        return Ok(credentials);
    }

    for line in panel(&[
        "First-time setup",
        "",
        "You need Telegram API credentials.",
        "Get them at https://my.telegram.org",
    ]) {
        println!("{}", line.as_str().yellow());
    }
    println!();

    let api_id = prompt(|| Input::<String>::new().with_prompt("API ID").interact_text()).await?;
    let api_hash = prompt(|| Input::<String>::new().with_prompt("API Hash").interact_text()).await?;

    let credentials = Credentials {
        api_id: parse_api_id(&api_id)?,
        api_hash: api_hash.trim().to_string(),
    };
    store.save(&credentials)?;
    println!("{}\n", "✓ Credentials saved".green());
    Ok(credentials)
}

pub async fn run(paths: &AppPaths, file: &Path) -> Result<()> {
    paths.ensure_dir()?;
    let local = LocalFile::check(file)?;

    clear_screen()?;
    print_header();
    println!(
        "{} {} {}\n",
        "File:".dark_grey(),
        local.name.as_str().cyan(),
        format!("({})", format_file_size(local.size)).dark_grey()
    );

    let credentials = load_or_prompt_credentials(&paths.credential_store()).await?;

    let connecting = spinner("Connecting...");
    let connected = async {
        let session = Session::open(paths, &credentials)?;
        let authorized = session.is_authorized().await?;
        Ok::<_, Error>((session, authorized))
    }
    .await;
    connecting.finish_and_clear();
    let (session, authorized) = connected?;
    let api = session.api();

    if !authorized {
        println!("{}", "Authentication required".yellow());
        println!(
            "{}\n",
            "Enter phone with country code, e.g. +1234567890".dark_grey()
        );
        let account = login(api, &mut TerminalPrompter).await?;
        info!(user_id = account.id, "signed in interactively");
    }

    let loading = spinner("Loading contacts...");
    let dialogs = api.list_dialogs(DEFAULT_DIALOG_LIMIT).await;
    loading.finish_and_clear();
    let dialogs = dialogs?;

    let file_info = FileInfo {
        name: local.name.clone(),
        size: local.size,
    };
    let outcome = picker::select_contact(&dialogs, Some(file_info)).await?;

    let target = match outcome {
        Outcome::Selected(index) => dialogs.get(index),
        Outcome::Cancelled => None,
    };
    let Some(target) = target else {
        println!("\n{}", "Cancelled".yellow());
        return Ok(());
    };

    println!(
        "\n{} {}",
        "Sending to:".dark_grey(),
        target.display_name().as_str().bold()
    );
    upload::send_with_progress(api, target, &local.path).await
}
