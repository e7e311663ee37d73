use std::io;
use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;

use nexium::api::{build_router, AppState};
use nexium::app::App;
use nexium::config::Config;
use nexium::orchestrator::{DualWriteOutcome, SubmitRequest};
use nexium::services::{KeyScope, Services};
use nexium::session::SessionManager;
use nexium::transform;
use nexium::tui::{draw, handle_key_event};

#[derive(Parser, Debug)]
#[command(name = "nexium", version, about = "Summarize blogs and save them to two stores")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP API
    Serve {
        /// Address to bind (host:port); defaults to the configured bind address
        #[arg(long)]
        bind: Option<String>,
    },
    /// Summarize one URL and save it without the TUI
    Submit {
        url: String,
        /// Text to summarize instead of fetching the page
        #[arg(long)]
        content: Option<String>,
        /// Access token of the user to save the summary for
        #[arg(long, env = "NEXIUM_ACCESS_TOKEN")]
        token: Option<String>,
    },
    /// Print saved summaries
    List {
        /// Case-insensitive filter on url and summary
        #[arg(long, default_value = "")]
        query: String,
        #[arg(long, env = "NEXIUM_ACCESS_TOKEN")]
        token: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // The TUI owns the terminal, so it only logs warnings and errors by default
    let default_level = match cli.command {
        None => tracing::Level::WARN,
        Some(_) => tracing::Level::INFO,
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load().context("failed to load configuration")?;

    match cli.command {
        Some(Command::Serve { bind }) => serve(&config, bind).await,
        Some(Command::Submit {
            url,
            content,
            token,
        }) => submit(&config, url, content, token).await,
        Some(Command::List { query, token }) => list(&config, &query, token).await,
        None => run_tui(&config).await,
    }
}

async fn serve(config: &Config, bind: Option<String>) -> anyhow::Result<()> {
    let services = Services::from_config(config, KeyScope::Server).await?;
    let app = build_router(AppState::from_services(&services));

    let bind = bind.unwrap_or_else(|| config.bind.clone());
    let addr: SocketAddr = bind
        .parse()
        .with_context(|| format!("invalid bind address {bind}"))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("nexium listening on http://{addr}");

    axum::serve(listener, app).await.context("server shutdown")?;
    Ok(())
}

/// Signs in with `token` when given, so writes and reads are scoped to that user.
async fn session_for(services: &Services, token: Option<String>) -> anyhow::Result<SessionManager> {
    let session = SessionManager::new(services.auth.clone());
    if let Some(token) = token {
        session
            .complete_sign_in(&token)
            .await
            .context("access token was rejected")?;
        services.summaries.use_access_token(session.access_token());
    }
    Ok(session)
}

async fn submit(
    config: &Config,
    url: String,
    content: Option<String>,
    token: Option<String>,
) -> anyhow::Result<()> {
    let services = Services::from_config(config, KeyScope::Client).await?;
    let session = session_for(&services, token).await?;

    let content = match (content, &services.fetcher) {
        (Some(content), _) => Some(content),
        (None, Some(fetcher)) if transform::predefined(&url).is_none() => {
            Some(fetcher.content_or_fallback(url.trim()).await)
        }
        (None, _) => None,
    };

    let mut request = SubmitRequest::new(url);
    request.content = content;

    let user = session.current_user();
    let outcome = services.summaries.submit(request, user.as_ref()).await;

    if let Some(result) = outcome.transformed() {
        println!("Summary: {}", result.summary);
        println!("Urdu:    {}", result.urdu);
    }
    match outcome {
        DualWriteOutcome::Complete { record, .. } => {
            println!("Saved summary #{} for {}", record.id, record.url);
            Ok(())
        }
        DualWriteOutcome::Partial { error, .. } | DualWriteOutcome::Failed(error) => {
            Err(anyhow::Error::new(error))
        }
    }
}

async fn list(config: &Config, query: &str, token: Option<String>) -> anyhow::Result<()> {
    let services = Services::from_config(config, KeyScope::Client).await?;
    let session = session_for(&services, token).await?;

    let summaries = services
        .summaries
        .list(session.current_user().as_ref(), query)
        .await?;

    for summary in &summaries {
        println!("#{}  {}\n     {}", summary.id, summary.url, summary.summary);
    }
    println!("{} saved summaries", summaries.len());
    Ok(())
}

async fn run_tui(config: &Config) -> anyhow::Result<()> {
    let services = Services::from_config(config, KeyScope::Client).await?;
    let mut app = App::new(services, config).await?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    Ok(())
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> anyhow::Result<()> {
    loop {
        terminal.draw(|frame| draw(frame, app))?;

        // Advance spinner and expire the success banner
        app.tick();

        // Poll for finished submissions
        app.poll_submit_result().await?;

        // Poll for sign-in/sign-out
        app.poll_session_change().await?;

        // Poll for events with timeout to allow async operations
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if let Some(action) = handle_key_event(key, app.input_mode, app.show_help) {
                        let should_quit = app.handle_action(action).await?;
                        if should_quit {
                            return Ok(());
                        }
                    }
                }
            }
        }
    }
}
