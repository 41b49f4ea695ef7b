use crate::types::RouteParams;
use crate::Error;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::collections::HashMap;
use std::fmt::{self, Debug, Formatter};
use std::future::Future;

pub(crate) type Handler<E> = Box<dyn Fn(RouteParams) -> HandlerReturn<E> + Send + Sync + 'static>;
pub(crate) type HandlerReturn<E> = Box<dyn Future<Output = Result<Response<Full<Bytes>>, E>> + Send + 'static>;

type HandlerFactory<E> = Box<dyn Fn() -> HandlerGroup<E> + Send + Sync + 'static>;

pub(crate) fn box_handler<H, R, E>(handler: H) -> Handler<E>
where
    H: Fn(RouteParams) -> R + Send + Sync + 'static,
    R: Future<Output = Result<Response<Full<Bytes>>, E>> + Send + 'static,
{
    Box::new(move |params: RouteParams| Box::new(handler(params)))
}

/// What a route dispatches to when it matches.
///
/// It is either a handler called directly with the captured parameters, or a reference to a
/// handler inside a [HandlerGroup](./struct.HandlerGroup.html) which is looked up by name when
/// the route is dispatched.
///
/// # Examples
///
/// ```
/// use http_body_util::Full;
/// use hyper::{body::Bytes, Response};
/// use routerify_lite::{Action, RouteParams};
/// use std::convert::Infallible;
///
/// let direct: Action<Infallible> = Action::handler(|params: RouteParams| async move {
///     Ok(Response::new(Full::new(Bytes::from(format!("user {}", &params[0])))))
/// });
///
/// let named: Action<Infallible> = Action::named("Users", "showUser");
/// assert_eq!(named.handler_name(), Some("showUser"));
/// assert_eq!(direct.handler_name(), None);
/// ```
pub enum Action<E> {
    /// A handler called directly with the captured parameters.
    Handler(Handler<E>),

    /// A handler group name and the handler name inside it.
    Named { group: String, handler: String },
}

impl<E> Action<E> {
    /// Creates an action from a handler function or closure.
    pub fn handler<H, R>(handler: H) -> Action<E>
    where
        H: Fn(RouteParams) -> R + Send + Sync + 'static,
        R: Future<Output = Result<Response<Full<Bytes>>, E>> + Send + 'static,
    {
        Action::Handler(box_handler(handler))
    }

    /// Creates an action which refers to the `handler` of the handler group `group`.
    pub fn named<G: Into<String>, H: Into<String>>(group: G, handler: H) -> Action<E> {
        Action::Named {
            group: group.into(),
            handler: handler.into(),
        }
    }

    /// Parses a `"Group.handler"` style action, split at the first `separator`.
    ///
    /// # Examples
    ///
    /// ```
    /// use routerify_lite::Action;
    /// use std::convert::Infallible;
    ///
    /// let action = Action::<Infallible>::parse("Users.showUser", '.').unwrap();
    /// assert_eq!(action.handler_name(), Some("showUser"));
    ///
    /// assert!(Action::<Infallible>::parse("showUser", '.').is_err());
    /// ```
    pub fn parse(action: &str, separator: char) -> crate::Result<Action<E>> {
        match action.split_once(separator) {
            Some((group, handler)) if !group.is_empty() && !handler.is_empty() => Ok(Action::named(group, handler)),
            _ => Err(Error::config(format!(
                "The action {:?} is not in the form `Group{}handler`",
                action, separator
            ))),
        }
    }

    pub fn group_name(&self) -> Option<&str> {
        match self {
            Action::Named { group, .. } => Some(group.as_str()),
            Action::Handler(_) => None,
        }
    }

    pub fn handler_name(&self) -> Option<&str> {
        match self {
            Action::Named { handler, .. } => Some(handler.as_str()),
            Action::Handler(_) => None,
        }
    }
}

impl<E> Debug for Action<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Action::Handler(_) => write!(f, "Handler"),
            Action::Named { group, handler } => write!(f, "Named({}.{})", group, handler),
        }
    }
}

/// A named set of handlers which a [Named](./enum.Action.html#variant.Named) action refers to.
///
/// A fresh group is built by its factory for every request routed to it, so a factory closure can
/// hand per-request state to its handlers.
///
/// # Examples
///
/// ```
/// use http_body_util::Full;
/// use hyper::{body::Bytes, Response};
/// use routerify_lite::{HandlerGroup, RouteParams};
/// use std::convert::Infallible;
///
/// let group: HandlerGroup<Infallible> = HandlerGroup::new()
///     .handler("showUser", |params: RouteParams| async move {
///         Ok(Response::new(Full::new(Bytes::from(format!("user {}", &params[0])))))
///     })
///     .handler("POST_showUser", |params: RouteParams| async move {
///         Ok(Response::new(Full::new(Bytes::from(format!("updated {}", &params[0])))))
///     });
///
/// assert!(group.has_handler("POST_showUser"));
/// assert!(!group.has_handler("DELETE_showUser"));
/// ```
pub struct HandlerGroup<E> {
    handlers: HashMap<String, Handler<E>>,
}

impl<E> Default for HandlerGroup<E> {
    fn default() -> Self {
        HandlerGroup {
            handlers: HashMap::new(),
        }
    }
}

impl<E> HandlerGroup<E> {
    pub fn new() -> HandlerGroup<E> {
        HandlerGroup::default()
    }

    /// Adds a handler under `name`, replacing any handler already registered with that name.
    pub fn handler<N, H, R>(mut self, name: N, handler: H) -> HandlerGroup<E>
    where
        N: Into<String>,
        H: Fn(RouteParams) -> R + Send + Sync + 'static,
        R: Future<Output = Result<Response<Full<Bytes>>, E>> + Send + 'static,
    {
        self.handlers.insert(name.into(), box_handler(handler));
        self
    }

    pub fn has_handler(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    pub(crate) fn invoke(&self, name: &str, params: RouteParams) -> Option<HandlerReturn<E>> {
        self.handlers.get(name).map(|handler| handler(params))
    }
}

impl<E> Debug for HandlerGroup<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.handlers.keys().collect();
        names.sort();
        write!(f, "{{ handlers: {:?} }}", names)
    }
}

/// Maps handler group names to the factories which build them.
pub(crate) struct HandlerRegistry<E> {
    factories: HashMap<String, HandlerFactory<E>>,
}

impl<E> Default for HandlerRegistry<E> {
    fn default() -> Self {
        HandlerRegistry {
            factories: HashMap::new(),
        }
    }
}

impl<E> HandlerRegistry<E> {
    pub(crate) fn register<N, F>(&mut self, name: N, factory: F)
    where
        N: Into<String>,
        F: Fn() -> HandlerGroup<E> + Send + Sync + 'static,
    {
        self.factories.insert(name.into(), Box::new(factory));
    }

    pub(crate) fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Builds a fresh instance of the named group.
    pub(crate) fn instantiate(&self, name: &str) -> crate::Result<HandlerGroup<E>> {
        self.factories
            .get(name)
            .map(|factory| factory())
            .ok_or_else(|| Error::dispatch(format!("The handler group {:?} is not registered", name)))
    }

    pub(crate) fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
