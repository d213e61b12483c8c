use std::{process, sync::Arc};

use solara::{
    application::{compose::PageComposer, contact::ContactService, error::AppError},
    cache::{RenderCache, RevalidationTrigger},
    config,
    infra::{
        content::{ContentClient, HttpContentStore},
        error::InfraError,
        http::{HttpState, build_router},
        mail::SendLayerRelay,
        telemetry,
        trigger::{RevalidateClient, TriggerError},
    },
};
use tracing::{Dispatch, Level, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
        config::Command::Revalidate(args) => run_revalidate(settings, args).await,
    }
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let query_url = settings
        .content
        .query_url
        .clone()
        .ok_or_else(|| InfraError::configuration("content query url is not configured"))
        .map_err(AppError::from)?;

    let http_client = reqwest::Client::builder()
        .user_agent(RevalidateClient::user_agent())
        .build()
        .map_err(|err| AppError::unexpected(format!("failed to build http client: {err}")))?;

    let store = Arc::new(HttpContentStore::new(
        http_client.clone(),
        query_url,
        settings.content.token.clone(),
    ));
    let composer = Arc::new(PageComposer::new(ContentClient::new(store)));

    let cache = Arc::new(RenderCache::new(settings.cache.page_limit));
    let trigger = Arc::new(RevalidationTrigger::new(cache.clone()));

    let relay = Arc::new(SendLayerRelay::new(
        http_client,
        settings.contact.relay_endpoint.clone(),
        settings.contact.api_key.clone(),
    ));
    let contact = Arc::new(ContactService::new(relay));

    let state = HttpState {
        composer,
        cache,
        trigger,
        contact,
        revalidation_secret: settings.revalidation.secret.clone(),
    };
    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind(settings.server.addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;

    info!(
        target = "solara::serve",
        addr = %settings.server.addr,
        "listening"
    );

    axum::serve(listener, router.into_make_service())
        .await
        .map_err(|err| AppError::unexpected(format!("server error: {err}")))?;

    Ok(())
}

async fn run_revalidate(
    settings: config::Settings,
    args: config::RevalidateArgs,
) -> Result<(), AppError> {
    let site = args
        .site
        .ok_or_else(|| AppError::validation(TriggerError::MissingSite.to_string()))?;
    let secret = args.secret.or_else(|| settings.revalidation.secret.clone());

    let client = RevalidateClient::new(&site, secret)
        .map_err(|err| AppError::validation(err.to_string()))?;

    let confirmation = client
        .trigger()
        .await
        .map_err(|err| AppError::unexpected(format!("revalidation failed: {err}")))?;

    info!(
        target = "solara::revalidate",
        revalidated = confirmation.revalidated,
        timestamp = %confirmation.timestamp,
        message = %confirmation.message,
        "revalidation accepted"
    );
    println!("{}", confirmation.message);

    Ok(())
}
