use std::path::PathBuf;
use thiserror::Error as ThisError;

/// The boxed error type a route handler's own error `E` is converted into.
pub type RouteError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The error type returned from the router's builder, dispatch and service methods.
#[derive(ThisError, Debug)]
pub enum Error {
    /// The resolved action names a handler group or a handler which is not registered.
    ///
    /// This is a misconfigured route table, not a bad request, so it is surfaced to the host.
    #[error("dispatch error: {0}")]
    Dispatch(String),

    /// A route pattern could not be turned into a usable matcher.
    ///
    /// Never returned from [`Router::dispatch`](./struct.Router.html#method.dispatch): the route is
    /// skipped and the scan continues.
    #[error("match error for pattern {pattern:?}: {reason}")]
    Match { pattern: String, reason: String },

    /// The router could not be built from the registered routes and settings.
    #[error("config error: {0}")]
    Config(String),

    /// The configured not-found document could not be read.
    #[error("could not read the not-found document {}: {source}", .path.display())]
    NotFoundDocument {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The route handler returned an error.
    #[error("handler error: {0}")]
    Handler(#[source] RouteError),

    /// Failed to build the HTTP response.
    #[error("couldn't create the response: {0}")]
    Http(#[from] http::Error),
}

impl Error {
    pub(crate) fn dispatch<M: Into<String>>(msg: M) -> Error {
        Error::Dispatch(msg.into())
    }

    pub(crate) fn config<M: Into<String>>(msg: M) -> Error {
        Error::Config(msg.into())
    }

    pub(crate) fn match_error<P: Into<String>, R: ToString>(pattern: P, reason: R) -> Error {
        Error::Match {
            pattern: pattern.into(),
            reason: reason.to_string(),
        }
    }

    /// Returns `true` if this error comes from a misconfigured route table.
    pub fn is_dispatch(&self) -> bool {
        matches!(self, Error::Dispatch(_))
    }
}
