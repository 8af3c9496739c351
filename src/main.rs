use std::{future::IntoFuture, process, sync::Arc};

use inkpost::{
    application::{
        error::AppError,
        posts::{PostRepository, StoreProbe},
    },
    config::{self, StoreBackend},
    infra::{
        db::PostgresStore,
        error::InfraError,
        http::{self, HttpState},
        store::build_live_store,
        telemetry,
    },
};
use tracing::{Dispatch, Level, dispatcher, error, info, warn};
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
        config::Command::CheckStore => run_check_store(settings).await,
        config::Command::Migrate => run_migrate(settings).await,
    }
}

fn init_repository(settings: &config::Settings) -> Result<PostRepository, AppError> {
    let store = build_live_store(&settings.store)?;
    Ok(PostRepository::new(Arc::new(settings.store.clone()), store))
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let posts = init_repository(&settings)?;
    info!(
        target = "inkpost::serve",
        source = posts.data_source().as_str(),
        "post repository ready"
    );

    let state = HttpState::new(posts, Arc::new(settings.site.clone()));
    let router = http::build_router(state);

    let listener = tokio::net::TcpListener::bind(settings.server.addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;
    info!(
        target = "inkpost::serve",
        addr = %settings.server.addr,
        "listening"
    );

    let server = axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .into_future();

    let grace = settings.server.graceful_shutdown;
    tokio::select! {
        result = server => {
            result.map_err(|err| AppError::unexpected(format!("server error: {err}")))?;
        }
        _ = async {
            shutdown_signal().await;
            tokio::time::sleep(grace).await;
        } => {
            warn!(
                target = "inkpost::serve",
                grace_secs = grace.as_secs(),
                "in-flight requests did not finish before the shutdown deadline"
            );
        }
    }

    info!(target = "inkpost::serve", "server stopped");
    Ok(())
}

async fn run_check_store(settings: config::Settings) -> Result<(), AppError> {
    let posts = init_repository(&settings)?;

    match posts.probe().await {
        StoreProbe::NotConfigured => {
            info!(
                target = "inkpost::check_store",
                "live store not configured; pages will serve the sample collection"
            );
            Ok(())
        }
        StoreProbe::Rows { backend, count } => {
            info!(
                target = "inkpost::check_store",
                backend,
                count,
                "live store answered"
            );
            Ok(())
        }
        StoreProbe::Empty { backend } => {
            warn!(
                target = "inkpost::check_store",
                backend,
                "live store answered with no posts; pages will serve the sample collection"
            );
            Ok(())
        }
        StoreProbe::Unavailable { backend, error } => Err(AppError::from(InfraError::store(
            backend,
            error.to_string(),
        ))),
    }
}

async fn run_migrate(settings: config::Settings) -> Result<(), AppError> {
    if settings.store.backend != StoreBackend::Postgres {
        return Err(AppError::validation(
            "migrate requires store.backend = \"postgres\"",
        ));
    }
    if settings.store.url.is_none() {
        return Err(AppError::validation(
            "migrate requires a store url (--store-url or SUPABASE_URL)",
        ));
    }

    let store = PostgresStore::connect_lazy(&settings.store)?;
    store.run_migrations().await?;

    info!(
        target = "inkpost::migrate",
        table = %settings.store.table,
        "migrations applied"
    );
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!(target = "inkpost::serve", "shutdown signal received");
}
