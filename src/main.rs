use bytes::Bytes;
use http_body_util::Full;
use hyper::service::Service;
use hyper::Response;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder;
use routerify_lite::{Action, HandlerGroup, RouteParams, Router, RouterConfig, RouterService};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn text(body: String) -> Result<Response<Full<Bytes>>, Infallible> {
    Ok(Response::new(Full::new(Bytes::from(body))))
}

// A handler for "/" page.
async fn home_handler(_: RouteParams) -> Result<Response<Full<Bytes>>, Infallible> {
    text("Home page".to_owned())
}

// The "Users" handler group. `POST_showUser` is picked for POST requests.
fn users() -> HandlerGroup<Infallible> {
    HandlerGroup::new()
        .handler("showUser", |params: RouteParams| async move { text(format!("Hello user {}", &params[0])) })
        .handler("POST_showUser", |params: RouteParams| async move {
            text(format!("Updated user {}", &params[0]))
        })
}

fn router() -> routerify_lite::Result<Router<Infallible>> {
    let mut config = RouterConfig::default();
    if let Ok(path) = std::env::var("ROUTERIFY_LITE_404") {
        config = config.not_found_document(path);
    }

    Router::builder()
        .config(config)
        .handler_group("Users", users)
        .handler("/", home_handler)
        .action("/users/:int", "Users.showUser")
        .get(
            "/files/:any",
            Action::handler(|params: RouteParams| async move { text(format!("File {}", &params[0])) }),
        )
        .build()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Create a Service from the router above to handle incoming requests.
    let service = Arc::new(RouterService::new(router()?)?);

    // The address on which the server will be listening.
    let addr: SocketAddr = match std::env::var("ROUTERIFY_LITE_ADDR") {
        Ok(addr) => addr.parse()?,
        Err(_) => SocketAddr::from(([127, 0, 0, 1], 3000)),
    };

    let listener = TcpListener::bind(addr).await?;
    info!(addr = %addr, "App is running");

    loop {
        match listener.accept().await {
            Ok((stream, _)) => {
                let service = Arc::clone(&service);

                tokio::task::spawn(async move {
                    let request_service = match service.call(&stream).await {
                        Ok(request_service) => request_service,
                        Err(err) => match err {},
                    };

                    let io = TokioIo::new(stream);
                    let builder = Builder::new(TokioExecutor::new());
                    if let Err(err) = builder.serve_connection(io, request_service).await {
                        error!(error = %err, "Error serving connection");
                    }
                });
            }
            Err(err) => {
                error!(error = %err, "Error accepting connection");
            }
        }
    }
}
