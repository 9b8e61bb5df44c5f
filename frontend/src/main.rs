//! `qa-sync` entry point: pulls entities into the store and prints them.

use std::ffi::OsString;
use std::io::{self, Write};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr, eyre};
use mockable::DefaultClock;
use ortho_config::OrthoConfig;
use serde_json::{Value, json};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use frontend::config::ClientSettings;
use frontend::domain::{QuestionId, UserId};
use frontend::outbound::{ReqwestTransport, StaticTokenProvider};
use frontend::state::creators::{init_auth, load_question, load_questions, load_search, load_user};
use frontend::state::{Dispatched, Gateway, RootState, Store, Thunk};

#[derive(Debug, Parser)]
#[command(name = "qa-sync", about = "Synchronise Q&A entities into a local cache")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Page through the question feed.
    Questions {
        /// Pages to request before stopping.
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },
    /// Fetch one question.
    Question { id: u64 },
    /// Run a search and page through its results.
    Search {
        term: String,
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },
    /// Fetch a user profile.
    User { id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .with_writer(io::stderr)
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let cli = Cli::parse();
    let settings = ClientSettings::load_from_iter([OsString::from("qa-sync")])
        .wrap_err("loading client settings")?;
    let store = connect(&settings).await?;

    let output = match cli.command {
        Command::Questions { pages } => {
            repeat(&store, pages, load_questions).await?;
            questions_view(&store.state())
        }
        Command::Question { id } => {
            settle(store.dispatch(load_question(QuestionId::new(id))).await)?;
            let state = store.state();
            json!(state.questions.get(QuestionId::new(id)))
        }
        Command::Search { term, pages } => {
            repeat(&store, pages, || load_search(term.clone())).await?;
            search_view(&store.state())
        }
        Command::User { id } => {
            let id = UserId::new(id);
            let token = store.state().auth.access_token.clone();
            settle(store.dispatch(load_user(id.clone(), token)).await)?;
            json!(store.state().users.get(&id))
        }
    };

    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &output)?;
    writeln!(stdout)?;
    Ok(())
}

async fn connect(settings: &ClientSettings) -> Result<Store> {
    let transport = ReqwestTransport::new(settings.api_base_url()?, settings.request_timeout())
        .wrap_err("building HTTP client")?;
    let store = Store::new(Gateway::new(Arc::new(transport), Arc::new(DefaultClock)));
    let identity = init_auth(
        Arc::new(StaticTokenProvider::from_settings(settings)),
        settings.identity(),
        None,
    );
    settle(store.dispatch(identity).await)?;
    info!(
        authenticated = store.state().auth.is_authenticated,
        "client session ready"
    );
    Ok(store)
}

/// Dispatch `next` up to `pages` times, stopping once the cursor runs dry.
async fn repeat(store: &Store, pages: u32, mut next: impl FnMut() -> Thunk) -> Result<()> {
    for _ in 0..pages {
        if settle(store.dispatch(next()).await)? == Dispatched::Skipped {
            break;
        }
    }
    Ok(())
}

fn settle(outcome: Dispatched) -> Result<Dispatched> {
    match outcome.error() {
        Some(error) => Err(eyre!("{} ({:?})", error, error.code())),
        None => Ok(outcome),
    }
}

fn questions_view(state: &RootState) -> Value {
    let questions = &state.questions;
    json!({
        "no_of_questions": questions.no_of_questions,
        "pages": questions.fetched_page_count(),
        "exhausted": questions.cursor.is_exhausted(),
        "questions": questions.entities.values().collect::<Vec<_>>(),
    })
}

fn search_view(state: &RootState) -> Value {
    let search = &state.search;
    json!({
        "search_term": search.search_term,
        "no_of_questions": search.no_of_questions,
        "pages": search.page_count(),
        "questions": search.entities.values().collect::<Vec<_>>(),
    })
}
