//! Ask command implementation

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use clap::Args;

use super::utils::{load_book, resolve_config};
use super::GlobalArgs;
use crate::chat::{ChatContext, RemoteBackend, Responder};
use crate::config::CliOverrides;
use crate::domain::ChatRole;
use crate::session::ReaderState;

#[derive(Args)]
pub struct AskArgs {
    /// Question for the assistant
    #[arg(required = true, num_args = 1.., value_name = "QUESTION")]
    pub question: Vec<String>,

    /// Remote chat endpoint that answers instead of the built-in knowledge base
    #[arg(long, value_name = "URL", conflicts_with = "offline")]
    pub endpoint: Option<String>,

    /// Ignore any configured remote endpoint
    #[arg(long)]
    pub offline: bool,

    /// Print the answer as chat-widget HTML
    #[arg(long, conflicts_with = "json")]
    pub html: bool,

    /// Print the answer as JSON
    #[arg(long)]
    pub json: bool,

    /// Do not record the exchange in the chat history
    #[arg(long)]
    pub no_history: bool,
}

pub fn run(global: &GlobalArgs, args: AskArgs) -> Result<()> {
    let config = resolve_config(
        global,
        CliOverrides {
            remote_endpoint: args.endpoint.clone(),
            offline: args.offline,
            ..CliOverrides::default()
        },
    )?;

    let question = args.question.join(" ");
    let question = question.trim();
    if question.is_empty() {
        anyhow::bail!("Question is empty");
    }

    let corpus = load_book(&config)?;
    let mut state = ReaderState::load(&config.state_file)?;
    let now = Utc::now();
    state.chat_history.prune(now, Duration::hours(config.history_max_age_hours));

    let context = ChatContext {
        current_chapter_title: corpus
            .chapters
            .get(state.current_chapter)
            .map(|c| c.title.clone())
            .unwrap_or_default(),
        book_title: corpus.title.clone(),
        recent_messages: state.chat_history.recent(config.recent_context_messages).to_vec(),
    };

    let remote = config.remote_endpoint.as_deref().map(RemoteBackend::new).transpose()?;
    let responder = Responder::new(&corpus);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    let reply = runtime.block_on(async {
        let mut rng = rand::thread_rng();
        responder.respond(question, remote.as_ref(), &context, &mut rng).await
    });

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reply)?);
    } else if args.html {
        println!("{}", reply.to_html());
    } else {
        println!("{}", reply.to_plain_text());
    }

    if !args.no_history {
        state.chat_history.push(ChatRole::User, question, now, config.history_limit);
        state.chat_history.push(
            ChatRole::Assistant,
            reply.to_html(),
            Utc::now(),
            config.history_limit,
        );
        state.save(&config.state_file)?;
    }

    Ok(())
}
