//! `routerify-lite` is a minimal request router for the Rust HTTP library [hyper](https://hyper.rs/): it
//! matches a request path against token patterns and dispatches to the handler of the last route
//! which matched, optionally picking a method-specific handler.
//!
//! Core features:
//!
//! - Route patterns with three placeholder tokens: `:string`, `:int` and `:any`
//!
//! - Handlers called with the captured path segments as positional parameters
//!
//! - Named handler groups with method-qualified handlers, e.g. `POST_showUser`
//!
//! - Method-only routes with `get`, `post`, `put`, ...
//!
//! - A `404 Not Found` fallback with a default page or a document from disk
//!
//! ## Route Patterns
//!
//! A pattern is a path where the following tokens capture a part of the request path:
//!
//! | Token     | Matches                                   |
//! |-----------|-------------------------------------------|
//! | `:string` | one or more characters except `/`         |
//! | `:int`    | one or more digits                        |
//! | `:any`    | one or more characters, `/` included      |
//!
//! Every pattern matches the whole request path, with an optional trailing `/`. Captures are
//! handed to the handler in left-to-right order:
//!
//! ```txt
//! Pattern: /users/:string/books/:int
//! Request path: /users/alice/books/42/
//! Params: ["alice", "42"]
//! ```
//!
//! The text between tokens is used as expression syntax, so a `.` matches any character. Enable
//! [RouterConfig::escape_literals](./struct.RouterConfig.html#method.escape_literals) to match it
//! literally. Tokens are replaced wherever they appear, even inside a literal segment.
//!
//! ## Dispatch
//!
//! Every route is tried against the request path and the **last** route which matched wins.
//! Registering a pattern again replaces its action without moving it.
//!
//! A named action refers to a handler inside a [HandlerGroup](./struct.HandlerGroup.html). For a
//! request whose method is recognized and not `GET`, the handler name is prefixed with the method:
//! a `POST` to a route bound to `Users.showUser` calls `POST_showUser`. See
//! [MethodPrefixPolicy](./enum.MethodPrefixPolicy.html) for the alternatives.
//!
//! ```
//! use http_body_util::Full;
//! use hyper::{body::Bytes, Method, Response};
//! use routerify_lite::{Action, HandlerGroup, RouteParams, Router};
//! use std::convert::Infallible;
//!
//! async fn about(_: RouteParams) -> Result<Response<Full<Bytes>>, Infallible> {
//!     Ok(Response::new(Full::new(Bytes::from("About page"))))
//! }
//!
//! fn users() -> HandlerGroup<Infallible> {
//!     HandlerGroup::new()
//!         .handler("showUser", |params: RouteParams| async move {
//!             Ok(Response::new(Full::new(Bytes::from(format!("User {}", &params[0])))))
//!         })
//!         .handler("POST_showUser", |params: RouteParams| async move {
//!             Ok(Response::new(Full::new(Bytes::from(format!("Updated user {}", &params[0])))))
//!         })
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let router: Router<Infallible> = Router::builder()
//!     .handler_group("Users", users)
//!     .handler("/about", about)
//!     .action("/users/:int", "Users.showUser")
//!     .get("/files/:any", Action::handler(|params: RouteParams| async move {
//!         Ok(Response::new(Full::new(Bytes::from(params[0].to_owned()))))
//!     }))
//!     .build()
//!     .unwrap();
//!
//! let resp = router.dispatch(&Method::POST, "/users/42").await.unwrap();
//! assert_eq!(resp.status(), 200);
//!
//! // `/files/:any` only exists for GET requests.
//! let resp = router.dispatch(&Method::POST, "/files/a/b").await.unwrap();
//! assert_eq!(resp.status(), 404);
//! # }
//! ```
//!
//! ## Serving
//!
//! A router is mounted on hyper connections through [RouterService](./struct.RouterService.html),
//! which builds a [RequestService](./struct.RequestService.html) per connection.
//!
//! ## Logging
//!
//! The router logs through [tracing](https://docs.rs/tracing): matches at `debug`, dispatches at
//! `info`, misses at `warn`, and missing handlers at `error`.

pub use self::action::{Action, HandlerGroup};
pub use self::config::{MethodPrefixPolicy, NotFound, RouterConfig};
pub use self::error::{Error, RouteError};
pub use self::regex_generator::{compile, PLACEHOLDER_TOKENS};
pub use self::route::Route;
pub use self::router::{ActionSpec, Call, Router, RouterBuilder};
#[doc(hidden)]
pub use self::service::RequestService;
pub use self::service::RequestServiceBuilder;
pub use self::service::RouterService;
pub use self::types::RouteParams;

mod action;
mod config;
mod constants;
mod error;
mod helpers;
mod regex_generator;
mod route;
mod router;
mod service;
mod types;

/// A Result type often returned from methods that can have routerify-lite errors.
pub type Result<T> = std::result::Result<T, Error>;
