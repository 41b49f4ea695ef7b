use bytes::Bytes;
use http_body_util::{BodyExt, Empty};
use hyper::service::Service;
use hyper::{Method, Request, StatusCode};
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use hyper_util::rt::TokioIo;
use hyper_util::server::conn::auto::Builder;
use routerify_lite::{Router, RouterService};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::oneshot::{self, Sender};

pub struct Serve {
    addr: SocketAddr,
    tx: Sender<()>,
}

impl Serve {
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn new_request(&self, method: Method, route: &str) -> Request<Empty<Bytes>> {
        Request::builder()
            .method(method)
            .uri(format!("http://{}{}", self.addr(), route))
            .body(Empty::new())
            .unwrap()
    }

    /// Sends a request and returns the status and the body text.
    pub async fn send(&self, method: Method, route: &str) -> (StatusCode, String) {
        let client = Client::builder(TokioExecutor::new()).build_http::<Empty<Bytes>>();
        let resp = client.request(self.new_request(method, route)).await.unwrap();
        let status = resp.status();
        (status, into_text(resp.into_body()).await)
    }

    pub fn shutdown(self) {
        self.tx.send(()).unwrap();
    }
}

pub async fn serve<E>(router: Router<E>) -> Serve
where
    E: Into<Box<dyn std::error::Error + Send + Sync>> + 'static,
{
    // Bind a TCP listener to an available port.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    // Build the router service, which must be Arc to clone into spawned tasks.
    let router_service = Arc::new(RouterService::new(router).unwrap());
    let (tx, mut rx) = oneshot::channel::<()>();

    tokio::spawn(async move {
        loop {
            let stream = tokio::select! {
                accepted = listener.accept() => accepted.unwrap().0,
                _ = &mut rx => break,
            };
            let router_service = router_service.clone();
            tokio::spawn(async move {
                let request_service = router_service.call(&stream).await.expect("RouterService failed");
                let io = TokioIo::new(stream);
                let builder = Builder::new(TokioExecutor::new());
                let _ = builder.serve_connection(io, request_service).await;
            });
        }
    });

    Serve { addr, tx }
}

pub async fn into_text<B>(body: B) -> String
where
    B: hyper::body::Body<Data = Bytes> + Send,
    B::Error: std::error::Error + Send + Sync + 'static,
{
    String::from_utf8_lossy(&body.collect().await.unwrap().to_bytes()).to_string()
}
