use crate::router::Router;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{service::Service, Request, Response};
use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;
use tracing::debug;

/// The per-connection [`Service`](https://docs.rs/hyper/1/hyper/service/trait.Service.html) which
/// hands each request's method and path to the router.
pub struct RequestService<E> {
    pub(crate) router: Arc<Router<E>>,
    pub(crate) remote_addr: SocketAddr,
}

impl<B, E> Service<Request<B>> for RequestService<E>
where
    E: Into<Box<dyn std::error::Error + Send + Sync>> + 'static,
    B: Send + 'static,
{
    type Response = Response<Full<Bytes>>;
    type Error = crate::Error;
    #[allow(clippy::type_complexity)]
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send + 'static>>;

    fn call(&self, req: Request<B>) -> Self::Future {
        let router = self.router.clone();
        let remote_addr = self.remote_addr;

        let method = req.method().clone();
        // The router strips the query string itself, if configured to.
        let target = req
            .uri()
            .path_and_query()
            .map(|pq| pq.as_str().to_owned())
            .unwrap_or_else(|| req.uri().path().to_owned());

        let fut = async move {
            debug!(remote_addr = %remote_addr, method = %method, path = %target, "Incoming request");
            router.dispatch(&method, target.as_str()).await
        };

        Box::pin(fut)
    }
}

impl<E> std::fmt::Debug for RequestService<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{ remote_addr: {:?}, router: {:?} }}", self.remote_addr, self.router)
    }
}

#[derive(Debug)]
pub struct RequestServiceBuilder<E> {
    router: Arc<Router<E>>,
}

impl<E: Into<Box<dyn std::error::Error + Send + Sync>> + 'static> RequestServiceBuilder<E> {
    pub fn new(router: Router<E>) -> crate::Result<Self> {
        Ok(Self {
            router: Arc::from(router),
        })
    }

    pub fn build(&self, remote_addr: SocketAddr) -> RequestService<E> {
        RequestService {
            router: self.router.clone(),
            remote_addr,
        }
    }
}
