use crate::action::{Action, HandlerGroup, HandlerRegistry};
use crate::config::RouterConfig;
use crate::route::Route;
use crate::router::Router;
use crate::types::RouteParams;
use crate::Error;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Response};
use std::fmt::{self, Debug, Formatter};
use std::future::Future;
use tracing::{info, warn};

/// An action as handed to the builder: either a ready [Action](./enum.Action.html) or a
/// `"Group.handler"` string which is split when the router is built, using the configured
/// separator.
pub enum ActionSpec<E> {
    Action(Action<E>),
    Text(String),
}

impl<E> From<Action<E>> for ActionSpec<E> {
    fn from(action: Action<E>) -> Self {
        ActionSpec::Action(action)
    }
}

impl<E> From<&str> for ActionSpec<E> {
    fn from(text: &str) -> Self {
        ActionSpec::Text(text.to_owned())
    }
}

impl<E> From<String> for ActionSpec<E> {
    fn from(text: String) -> Self {
        ActionSpec::Text(text)
    }
}

impl<E> Debug for ActionSpec<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ActionSpec::Action(action) => action.fmt(f),
            ActionSpec::Text(text) => write!(f, "{:?}", text),
        }
    }
}

struct Registration<E> {
    pattern: String,
    condition: Option<Method>,
    action: ActionSpec<E>,
}

/// Builder for the [Router](./struct.Router.html) type.
///
/// This `RouterBuilder<E>` type accepts one type parameter: `E`, the error type the route
/// handlers return.
///
/// Routes are kept in registration order. Registering a pattern again replaces the earlier action
/// while keeping the earlier position, and the method helpers ([get](#method.get),
/// [post](#method.post), ...) register a route which only takes part in requests with that
/// method.
///
/// # Examples
///
/// ```
/// use http_body_util::Full;
/// use hyper::{body::Bytes, Response};
/// use routerify_lite::{Action, RouteParams, Router};
/// use std::convert::Infallible;
///
/// async fn home_handler(_: RouteParams) -> Result<Response<Full<Bytes>>, Infallible> {
///     Ok(Response::new(Full::new(Bytes::from("home"))))
/// }
///
/// fn run() -> Router<Infallible> {
///     let router = Router::builder()
///         .handler("/", home_handler)
///         .action("/users/:int", "Users.showUser")
///         .post("/contact", Action::handler(|_| async move {
///             Ok(Response::new(Full::new(Bytes::from("thanks"))))
///         }))
///         .build()
///         .unwrap();
///     router
/// }
/// # run();
/// ```
pub struct RouterBuilder<E> {
    inner: crate::Result<BuilderInner<E>>,
}

struct BuilderInner<E> {
    registrations: Vec<Registration<E>>,
    registry: HandlerRegistry<E>,
    config: RouterConfig,
}

impl<E: Into<Box<dyn std::error::Error + Send + Sync>> + 'static> RouterBuilder<E> {
    /// Creates a new `RouterBuilder` instance with default options.
    pub fn new() -> RouterBuilder<E> {
        RouterBuilder::default()
    }

    /// Creates a new [Router](./struct.Router.html) instance from the added configuration.
    ///
    /// `"Group.handler"` strings are split here. Patterns are compiled here too, but a pattern
    /// which fails to compile doesn't fail the build: the route just never matches.
    pub fn build(self) -> crate::Result<Router<E>> {
        self.inner.and_then(|inner| {
            let BuilderInner {
                registrations,
                registry,
                config,
            } = inner;

            let mut routes = Vec::with_capacity(registrations.len());
            for Registration {
                pattern,
                condition,
                action,
            } in registrations
            {
                if let Some(method) = condition.as_ref() {
                    if !config.is_recognized_method(method) {
                        return Err(Error::config(format!(
                            "Can not register {:?} for the unrecognized method {}",
                            pattern, method
                        )));
                    }
                }

                let action = match action {
                    ActionSpec::Action(action) => action,
                    ActionSpec::Text(text) => Action::parse(text.as_str(), config.separator)?,
                };

                if let Some(group) = action.group_name() {
                    if !registry.contains(group) {
                        warn!(pattern = %pattern, group = %group, "Route refers to an unregistered handler group");
                    }
                }

                let route = Route::new(pattern, condition, action, config.escape_literals);
                if !route.is_valid() {
                    warn!(pattern = %route.pattern, "Route pattern does not compile, it will never match");
                }
                routes.push(route);
            }

            info!(
                routes_count = routes.len(),
                handler_groups = ?registry.names(),
                "Routing table loaded"
            );

            Ok(Router {
                routes,
                registry,
                config,
            })
        })
    }

    fn and_then<F>(self, func: F) -> Self
    where
        F: FnOnce(BuilderInner<E>) -> crate::Result<BuilderInner<E>>,
    {
        RouterBuilder {
            inner: self.inner.and_then(func),
        }
    }

    fn push<P, A>(self, pattern: P, condition: Option<Method>, action: A) -> Self
    where
        P: Into<String>,
        A: Into<ActionSpec<E>>,
    {
        let pattern = pattern.into().trim().to_owned();
        let action = action.into();

        self.and_then(move |mut inner| {
            inner.registrations.push(Registration {
                pattern,
                condition,
                action,
            });
            Ok(inner)
        })
    }

    /// Replaces the router settings.
    pub fn config(self, config: RouterConfig) -> Self {
        self.and_then(move |mut inner| {
            inner.config = config;
            Ok(inner)
        })
    }

    /// Registers an action under the trimmed pattern, for every method.
    pub fn route<P, A>(self, pattern: P, action: A) -> Self
    where
        P: Into<String>,
        A: Into<ActionSpec<E>>,
    {
        self.push(pattern, None, action)
    }

    /// Registers a `"Group.handler"` action under the trimmed pattern, for every method.
    pub fn action<P, A>(self, pattern: P, action: A) -> Self
    where
        P: Into<String>,
        A: Into<String>,
    {
        self.push(pattern, None, ActionSpec::Text(action.into()))
    }

    /// Registers a handler function or closure under the trimmed pattern, for every method.
    pub fn handler<P, H, R>(self, pattern: P, handler: H) -> Self
    where
        P: Into<String>,
        H: Fn(RouteParams) -> R + Send + Sync + 'static,
        R: Future<Output = Result<Response<Full<Bytes>>, E>> + Send + 'static,
    {
        self.push(pattern, None, Action::handler(handler))
    }

    /// Registers many routes at once, in iteration order.
    ///
    /// # Examples
    ///
    /// ```
    /// use routerify_lite::Router;
    /// use std::convert::Infallible;
    ///
    /// let router: Router<Infallible> = Router::builder()
    ///     .routes(vec![
    ///         ("/users/:int", "Users.showUser"),
    ///         ("/users/:int/posts", "Posts.list"),
    ///     ])
    ///     .build()
    ///     .unwrap();
    ///
    /// assert_eq!(router.routes().len(), 2);
    /// ```
    pub fn routes<I, P, A>(self, routes: I) -> Self
    where
        I: IntoIterator<Item = (P, A)>,
        P: Into<String>,
        A: Into<ActionSpec<E>>,
    {
        routes
            .into_iter()
            .fold(self, |builder, (pattern, action)| builder.push(pattern, None, action))
    }

    /// Registers a route which only takes part in requests with the given method.
    ///
    /// For such a request it behaves as if [route](#method.route) had been called at this point;
    /// for any other request it is skipped.
    pub fn route_if<P, A>(self, method: Method, pattern: P, action: A) -> Self
    where
        P: Into<String>,
        A: Into<ActionSpec<E>>,
    {
        self.push(pattern, Some(method), action)
    }

    /// Registers a route for `GET` requests only.
    pub fn get<P, A>(self, pattern: P, action: A) -> Self
    where
        P: Into<String>,
        A: Into<ActionSpec<E>>,
    {
        self.route_if(Method::GET, pattern, action)
    }

    /// Registers a route for `POST` requests only.
    pub fn post<P, A>(self, pattern: P, action: A) -> Self
    where
        P: Into<String>,
        A: Into<ActionSpec<E>>,
    {
        self.route_if(Method::POST, pattern, action)
    }

    /// Registers a route for `PUT` requests only.
    pub fn put<P, A>(self, pattern: P, action: A) -> Self
    where
        P: Into<String>,
        A: Into<ActionSpec<E>>,
    {
        self.route_if(Method::PUT, pattern, action)
    }

    /// Registers a route for `DELETE` requests only.
    pub fn delete<P, A>(self, pattern: P, action: A) -> Self
    where
        P: Into<String>,
        A: Into<ActionSpec<E>>,
    {
        self.route_if(Method::DELETE, pattern, action)
    }

    /// Registers a route for `HEAD` requests only.
    pub fn head<P, A>(self, pattern: P, action: A) -> Self
    where
        P: Into<String>,
        A: Into<ActionSpec<E>>,
    {
        self.route_if(Method::HEAD, pattern, action)
    }

    /// Registers a route for `TRACE` requests only.
    pub fn trace<P, A>(self, pattern: P, action: A) -> Self
    where
        P: Into<String>,
        A: Into<ActionSpec<E>>,
    {
        self.route_if(Method::TRACE, pattern, action)
    }

    /// Registers a route for `CONNECT` requests only.
    pub fn connect<P, A>(self, pattern: P, action: A) -> Self
    where
        P: Into<String>,
        A: Into<ActionSpec<E>>,
    {
        self.route_if(Method::CONNECT, pattern, action)
    }

    /// Registers the factory of a handler group. The factory runs once per request routed to the
    /// group.
    pub fn handler_group<N, F>(self, name: N, factory: F) -> Self
    where
        N: Into<String>,
        F: Fn() -> HandlerGroup<E> + Send + Sync + 'static,
    {
        let name = name.into();
        self.and_then(move |mut inner| {
            inner.registry.register(name, factory);
            Ok(inner)
        })
    }
}

impl<E> Default for RouterBuilder<E> {
    fn default() -> RouterBuilder<E> {
        RouterBuilder {
            inner: Ok(BuilderInner {
                registrations: Vec::new(),
                registry: HandlerRegistry::default(),
                config: RouterConfig::default(),
            }),
        }
    }
}

impl<E> Debug for RouterBuilder<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.inner {
            Ok(inner) => {
                let routes: Vec<(&str, Option<&Method>, &ActionSpec<E>)> = inner
                    .registrations
                    .iter()
                    .map(|r| (r.pattern.as_str(), r.condition.as_ref(), &r.action))
                    .collect();
                write!(f, "{{ routes: {:?}, config: {:?} }}", routes, inner.config)
            }
            Err(err) => write!(f, "{{ error: {} }}", err),
        }
    }
}
