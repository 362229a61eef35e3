use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use client_core::{
    session::JWT_KEY, DocumentRoot, HttpBillsService, InlineModal, MarkupViews,
    MemorySessionStore, Navigator, NavigatorDeps, RouteTable, SessionStore,
};
use shared::domain::User;
use tracing_subscriber::EnvFilter;

mod config;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliRole {
    Employee,
    Admin,
}

#[derive(Parser, Debug)]
#[command(about = "Render a page of the expense-report client")]
struct Args {
    /// Overrides the configured API base url.
    #[arg(long)]
    api_url: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long, value_enum, default_value_t = CliRole::Employee)]
    role: CliRole,
    #[arg(long)]
    jwt: Option<String>,
    #[arg(long, default_value = "#employee/bills")]
    path: String,
    /// Navigate without a session user.
    #[arg(long)]
    logout: bool,
    /// Click the preview icon at this position once the page settles.
    #[arg(long)]
    preview: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let args = Args::parse();

    let mut settings = config::load_settings();
    if let Some(api_url) = &args.api_url {
        settings.api_url = config::normalize_api_url(api_url);
    }

    let session = Arc::new(MemorySessionStore::new());
    if !args.logout {
        let email = args.email.clone().unwrap_or_default();
        let user = match args.role {
            CliRole::Employee => User::employee(email),
            CliRole::Admin => User::administrator(email),
        };
        session.set_user(&user);
    }
    if let Some(jwt) = &args.jwt {
        session.set_item(JWT_KEY, jwt.clone());
    }

    let store = HttpBillsService::new(
        &settings.api_url,
        session.clone(),
        settings.request_timeout(),
    )
    .with_context(|| format!("failed to set up bills store for {}", settings.api_url))?;

    let navigator = Navigator::new(NavigatorDeps {
        root: DocumentRoot::new(settings.modal_width),
        session,
        store: Some(Arc::new(store)),
        views: Arc::new(MarkupViews),
        modal: Arc::new(InlineModal),
        routes: RouteTable::default(),
        runtime: tokio::runtime::Handle::current(),
    });
    let on_navigate = navigator
        .initialize()
        .context("failed to register navigation entry point")?;

    on_navigate.on_navigate(&args.path);
    navigator.settled().await;

    let state = navigator.state();
    tracing::info!(path = %state.current_path, phase = ?state.phase, "page settled");
    println!("{}", navigator.root().snapshot().content());

    if let Some(index) = args.preview {
        let controller = navigator
            .active_bills()
            .context("preview requested but the current page has no bill list")?;
        let doc = navigator.root().snapshot();
        let icon = doc
            .preview_icons()
            .get(index)
            .with_context(|| format!("no preview icon at position {index}"))?;
        controller.handle_click_icon_eye(icon);
        println!("{}", navigator.root().snapshot().modal().content);
    }

    Ok(())
}
