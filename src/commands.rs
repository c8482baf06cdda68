// Command handlers: one API call per invocation.
//
// Each handler loads the session token (except `login`), builds a fresh
// `ApiClient` for the requested base URL, runs a single call under a
// 5 second `CallContext` and prints the result. Errors bubble up as
// `anyhow::Error` and are reported by `run` as `<command>: <error>` with
// exit status 1.

use crate::api::{
    check_note_id, ApiClient, CallContext, CreateNoteRequest, LoginRequest, Note,
    DEFAULT_CALL_TIMEOUT,
};
use crate::cli::{Cli, Commands, NotesCommand};
use crate::token_store::{SessionError, TokenStore};
use anyhow::{bail, Context, Result};
use dialoguer::Password;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::IsTerminal;
use std::process::ExitCode;
use std::time::Duration;
use tracing::debug;

const LOGIN_TIP: &str = "tip: run `gnotes login --email ... --password ...` first";

/// Dispatch a parsed command line and map the outcome to an exit code.
pub fn run(cli: Cli) -> ExitCode {
    let label = cli.command.label();
    let base_url = cli.base_url;

    let result = match cli.command {
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::Login { email, password } => handle_login(&base_url, email, password),
        Commands::Me => handle_me(&base_url),
        Commands::Logout => handle_logout(&base_url),
        Commands::Notes(NotesCommand::List) => handle_notes_list(&base_url),
        Commands::Notes(NotesCommand::Create { title, body }) => {
            handle_notes_create(&base_url, title, body)
        }
        Commands::Notes(NotesCommand::Get { id }) => handle_notes_get(&base_url, id),
        Commands::Notes(NotesCommand::Delete { id }) => handle_notes_delete(&base_url, id),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(label, &err);
            ExitCode::FAILURE
        }
    }
}

fn report(label: &str, err: &anyhow::Error) {
    eprintln!("{}: {:#}", label, err);
    let needs_login = err
        .downcast_ref::<SessionError>()
        .is_some_and(SessionError::needs_login);
    if needs_login {
        eprintln!("{}", LOGIN_TIP);
    }
}

fn client(base_url: &str) -> Result<ApiClient> {
    debug!(base_url, "building api client");
    Ok(ApiClient::new(base_url)?)
}

fn load_token() -> Result<String> {
    Ok(TokenStore::default_location()?.load()?)
}

/// Run `call` with a spinner on stderr. indicatif hides the spinner when
/// stderr is not a terminal.
fn with_spinner<T>(msg: &'static str, call: impl FnOnce(&CallContext) -> T) -> T {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(msg);
    spinner.enable_steady_tick(Duration::from_millis(100));

    let ctx = CallContext::with_timeout(DEFAULT_CALL_TIMEOUT);
    let out = call(&ctx);
    spinner.finish_and_clear();
    out
}

fn handle_login(base_url: &str, email: String, password: Option<String>) -> Result<()> {
    let password = match password {
        Some(p) => p,
        None if std::io::stdin().is_terminal() => {
            Password::new().with_prompt("Password").interact()?
        }
        None => bail!(
            "--email and --password are required\n\
             example: gnotes login --email a@b.com --password 123"
        ),
    };

    let store = TokenStore::default_location()?;
    let api = client(base_url)?;
    let req = LoginRequest { email, password };
    let res = with_spinner("Logging in...", |ctx| api.login(ctx, &req))?;

    store.save(&res.token).context("failed to save token")?;

    println!("login: ok");
    println!("token saved");
    println!("expires_at={}", res.expires_at);
    Ok(())
}

fn handle_me(base_url: &str) -> Result<()> {
    let token = load_token()?;
    let api = client(base_url)?;
    let me = with_spinner("Fetching profile...", |ctx| api.me(ctx, &token))?;

    println!("id={}", me.id);
    println!("email={}", me.email);
    Ok(())
}

fn handle_logout(base_url: &str) -> Result<()> {
    let store = TokenStore::default_location()?;
    let token = store.load()?;
    let api = client(base_url)?;
    with_spinner("Logging out...", |ctx| api.logout(ctx, &token))?;

    store.clear().context("failed to remove token")?;
    println!("logged out");
    Ok(())
}

fn handle_notes_list(base_url: &str) -> Result<()> {
    let token = load_token()?;
    let api = client(base_url)?;
    let res = with_spinner("Loading notes...", |ctx| api.notes_list(ctx, &token))?;

    if res.notes.is_empty() {
        println!("no notes");
        return Ok(());
    }
    for note in &res.notes {
        println!("{}", list_line(note));
    }
    Ok(())
}

fn handle_notes_create(base_url: &str, title: String, body: String) -> Result<()> {
    let token = load_token()?;
    let api = client(base_url)?;
    let req = CreateNoteRequest { title, body };
    let res = with_spinner("Creating note...", |ctx| api.create_note(ctx, &token, &req))?;

    println!("id={}", res.id);
    Ok(())
}

fn handle_notes_get(base_url: &str, id: i64) -> Result<()> {
    let id = check_note_id(id)?;
    let token = load_token()?;
    let api = client(base_url)?;
    let note = with_spinner("Loading note...", |ctx| api.get_note(ctx, &token, id))?;

    print!("{}", detail_block(&note));
    Ok(())
}

fn handle_notes_delete(base_url: &str, id: i64) -> Result<()> {
    let id = check_note_id(id)?;
    let token = load_token()?;
    let api = client(base_url)?;
    with_spinner("Deleting note...", |ctx| api.delete_note(ctx, &token, id))?;

    println!("deleted");
    Ok(())
}

fn list_line(note: &Note) -> String {
    format!("{} | {} | {}", note.id, note.created_at, note.title)
}

fn detail_block(note: &Note) -> String {
    format!(
        "id={}\ncreated_at={}\ntitle={}\nbody={}\n",
        note.id, note.created_at, note.title, note.body
    )
}
