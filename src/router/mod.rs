use crate::action::{Action, HandlerGroup, HandlerRegistry};
use crate::config::{MethodPrefixPolicy, NotFound, RouterConfig};
use crate::constants::DEFAULT_NOT_FOUND_BODY;
use crate::helpers;
use crate::route::Route;
use crate::types::RouteParams;
use crate::Error;
use http::header::CONTENT_TYPE;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Response, StatusCode};
use std::collections::HashMap;
use std::fmt::{self, Debug, Formatter};
use std::pin::Pin;
use tracing::{debug, error, info, warn};

pub use self::builder::{ActionSpec, RouterBuilder};

mod builder;

/// Represents a modular, lightweight router which matches a request path against its route
/// patterns and dispatches to the action of the last matching route.
///
/// A `Router<E>` accepts one type parameter: `E`, the error type the route handlers return. It
/// must be convertible into a boxed [std::error::Error](https://doc.rust-lang.org/std/error/trait.Error.html).
///
/// Once built, the route table is read-only, so one router can serve many requests at once.
///
/// # Examples
///
/// ```
/// use http_body_util::Full;
/// use hyper::{body::Bytes, Method, Response};
/// use routerify_lite::{Action, HandlerGroup, RouteParams, Router};
/// use std::convert::Infallible;
///
/// fn users() -> HandlerGroup<Infallible> {
///     HandlerGroup::new()
///         .handler("showUser", |params: RouteParams| async move {
///             Ok(Response::new(Full::new(Bytes::from(format!("user {}", &params[0])))))
///         })
///         .handler("POST_showUser", |params: RouteParams| async move {
///             Ok(Response::new(Full::new(Bytes::from(format!("updated {}", &params[0])))))
///         })
/// }
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let router: Router<Infallible> = Router::builder()
///     .handler_group("Users", users)
///     .action("/users/:int", "Users.showUser")
///     .build()
///     .unwrap();
///
/// let call = router.resolve(&Method::POST, "/users/42").unwrap();
/// assert_eq!(call.handler_name(), Some("POST_showUser"));
/// assert_eq!(call.params().as_slice(), ["42"]);
///
/// let resp = router.dispatch(&Method::GET, "/nowhere").await.unwrap();
/// assert_eq!(resp.status(), 404);
/// # }
/// ```
pub struct Router<E> {
    pub(crate) routes: Vec<Route<E>>,
    pub(crate) registry: HandlerRegistry<E>,
    pub(crate) config: RouterConfig,
}

/// The match result of a request: the action of the last matching route, the parameters it
/// captured and, for a named action, the handler name to call.
pub struct Call<'a, E> {
    pattern: &'a str,
    action: &'a Action<E>,
    params: RouteParams,
    handler_name: Option<String>,
}

impl<'a, E> Call<'a, E> {
    /// The pattern of the route which matched.
    pub fn pattern(&self) -> &'a str {
        self.pattern
    }

    pub fn action(&self) -> &'a Action<E> {
        self.action
    }

    pub fn params(&self) -> &RouteParams {
        &self.params
    }

    /// The handler name after the method prefix is applied, `None` for a direct handler.
    ///
    /// With [MethodPrefixPolicy::WhenDefined](./enum.MethodPrefixPolicy.html#variant.WhenDefined)
    /// this is the prefixed candidate; the plain name is used instead when the group lacks it.
    pub fn handler_name(&self) -> Option<&str> {
        self.handler_name.as_deref()
    }
}

impl<E> Debug for Call<'_, E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{ pattern: {:?}, action: {:?}, params: {:?}, handler_name: {:?} }}",
            self.pattern, self.action, self.params, self.handler_name
        )
    }
}

impl<E: Into<Box<dyn std::error::Error + Send + Sync>> + 'static> Router<E> {
    /// Return a [RouterBuilder](./struct.RouterBuilder.html) instance to build a `Router`.
    pub fn builder() -> RouterBuilder<E> {
        RouterBuilder::new()
    }

    /// Every registration in registration order, method-conditional ones included.
    pub fn routes(&self) -> &[Route<E>] {
        self.routes.as_slice()
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// The route mapping a request with this method sees.
    ///
    /// Registrations whose method condition doesn't hold are left out. A later registration of a
    /// pattern replaces the earlier one in the earlier one's position.
    pub fn effective_routes(&self, method: &Method) -> Vec<&Route<E>> {
        let mut effective: Vec<&Route<E>> = Vec::with_capacity(self.routes.len());
        let mut positions: HashMap<&str, usize> = HashMap::with_capacity(self.routes.len());

        for route in self.routes.iter().filter(|route| route.applies_to(method)) {
            match positions.get(route.pattern.as_str()) {
                Some(&idx) => effective[idx] = route,
                None => {
                    positions.insert(route.pattern.as_str(), effective.len());
                    effective.push(route);
                }
            }
        }

        effective
    }

    /// Scans every route against the request path and returns the match result of the last
    /// route which matched, or `None` if no route matched.
    pub fn resolve(&self, method: &Method, path: &str) -> Option<Call<'_, E>> {
        let target_path = helpers::target_path(path, &self.config);
        let mut call = None;

        for route in self.effective_routes(method) {
            let params = match route.captures(target_path.as_ref()) {
                Ok(Some(params)) => params,
                Ok(None) => continue,
                Err(err) => {
                    debug!(pattern = %route.pattern, error = %err, "Skipping route with malformed pattern");
                    continue;
                }
            };

            debug!(
                method = %method,
                path = %target_path,
                pattern = %route.pattern,
                params = %params,
                "Route matched"
            );

            call = Some(Call {
                pattern: route.pattern.as_str(),
                action: &route.action,
                handler_name: self.qualify_handler_name(method, &route.action),
                params,
            });
        }

        call
    }

    fn qualify_handler_name(&self, method: &Method, action: &Action<E>) -> Option<String> {
        let name = action.handler_name()?;

        match self.config.method_prefix_for(method) {
            Some(prefix) => Some(format!("{}{}", prefix, name)),
            None => Some(name.to_owned()),
        }
    }

    /// Dispatches a request: invokes the action of the last matching route, or responds with the
    /// not-found fallback when no route matches.
    ///
    /// A [Dispatch](./enum.Error.html#variant.Dispatch) error means the route table refers to a
    /// handler group or handler which doesn't exist.
    pub async fn dispatch(&self, method: &Method, path: &str) -> crate::Result<Response<Full<Bytes>>> {
        match self.resolve(method, path) {
            Some(call) => {
                info!(
                    method = %method,
                    path = %path,
                    pattern = %call.pattern,
                    "Dispatching request"
                );
                self.invoke(call).await.inspect_err(|err| {
                    if err.is_dispatch() {
                        error!(method = %method, path = %path, error = %err, "Route table refers to a missing handler");
                    }
                })
            }
            None => {
                warn!(method = %method, path = %path, "No route matched");
                self.not_found().await
            }
        }
    }

    /// Invokes a match result returned from [resolve](#method.resolve).
    pub async fn invoke(&self, call: Call<'_, E>) -> crate::Result<Response<Full<Bytes>>> {
        let Call {
            action,
            params,
            handler_name,
            ..
        } = call;

        let fut = match action {
            Action::Handler(handler) => handler(params),
            Action::Named { group, handler } => {
                let instance = self.registry.instantiate(group)?;
                let name = self.select_handler_name(&instance, handler, handler_name.as_deref());
                info!(group = %group, handler_name = %name, "Invoking handler");

                instance.invoke(name, params).ok_or_else(|| {
                    Error::dispatch(format!("The handler group {:?} has no handler {:?}", group, name))
                })?
            }
        };

        Pin::from(fut).await.map_err(|e| Error::Handler(e.into()))
    }

    fn select_handler_name<'a>(
        &self,
        group: &HandlerGroup<E>,
        plain: &'a str,
        qualified: Option<&'a str>,
    ) -> &'a str {
        let qualified = qualified.unwrap_or(plain);

        if self.config.method_prefix == MethodPrefixPolicy::WhenDefined && !group.has_handler(qualified) {
            plain
        } else {
            qualified
        }
    }

    /// Generates the not-found response: a `404 Not Found` with either the default message or the
    /// content of the configured document.
    pub async fn not_found(&self) -> crate::Result<Response<Full<Bytes>>> {
        let body = match &self.config.not_found {
            NotFound::Default => Bytes::from_static(DEFAULT_NOT_FOUND_BODY.as_bytes()),
            NotFound::Document(path) => {
                tokio::fs::read(path)
                    .await
                    .map(Bytes::from)
                    .map_err(|source| Error::NotFoundDocument {
                        path: path.clone(),
                        source,
                    })?
            }
        };

        Response::builder()
            .status(StatusCode::NOT_FOUND)
            .header(CONTENT_TYPE, "text/html; charset=utf-8")
            .body(Full::new(body))
            .map_err(Into::into)
    }
}

impl<E> Debug for Router<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{ routes: {:?}, handler_groups: {:?}, config: {:?} }}",
            self.routes,
            self.registry.names(),
            self.config
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use std::convert::Infallible;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn text(body: String) -> Result<Response<Full<Bytes>>, Infallible> {
        Ok(Response::new(Full::new(Bytes::from(body))))
    }

    fn echo(name: &'static str) -> Action<Infallible> {
        Action::handler(move |params: RouteParams| async move { text(format!("{}{}", name, params)) })
    }

    fn users() -> HandlerGroup<Infallible> {
        HandlerGroup::new()
            .handler("showUser", |params: RouteParams| async move { text(format!("show{}", params)) })
            .handler("POST_showUser", |params: RouteParams| async move {
                text(format!("post{}", params))
            })
    }

    async fn body_of(resp: Response<Full<Bytes>>) -> String {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn resolves_get_without_prefix() {
        let router: Router<Infallible> = Router::builder()
            .handler_group("Users", users)
            .action("/users/:int", "Users.showUser")
            .build()
            .unwrap();

        let call = router.resolve(&Method::GET, "/users/42").unwrap();
        assert_eq!(call.pattern(), "/users/:int");
        assert_eq!(call.handler_name(), Some("showUser"));
        assert_eq!(call.params().as_slice(), ["42"]);
    }

    #[test]
    fn resolves_post_with_prefix() {
        let router: Router<Infallible> = Router::builder()
            .action("/users/:int", "Users.showUser")
            .build()
            .unwrap();

        let call = router.resolve(&Method::POST, "/users/42").unwrap();
        assert_eq!(call.handler_name(), Some("POST_showUser"));
        assert_eq!(call.params().as_slice(), ["42"]);
    }

    #[test]
    fn unrecognized_method_keeps_plain_name() {
        let router: Router<Infallible> = Router::builder()
            .action("/users/:int", "Users.showUser")
            .build()
            .unwrap();

        let call = router.resolve(&Method::PATCH, "/users/42").unwrap();
        assert_eq!(call.handler_name(), Some("showUser"));
    }

    #[test]
    fn last_match_wins() {
        let router: Router<Infallible> = Router::builder()
            .action("/posts/:any", "Posts.catchAll")
            .action("/posts/:int", "Posts.show")
            .action("/tags/:int", "Tags.show")
            .build()
            .unwrap();

        let call = router.resolve(&Method::GET, "/posts/7").unwrap();
        assert_eq!(call.pattern(), "/posts/:int");
        assert_eq!(call.handler_name(), Some("show"));

        let call = router.resolve(&Method::GET, "/posts/7/comments").unwrap();
        assert_eq!(call.pattern(), "/posts/:any");
    }

    #[test]
    fn re_registration_overwrites_in_place() {
        let router: Router<Infallible> = Router::builder()
            .action("/a/:string", "First.show")
            .action("/:any", "Catch.all")
            .action(" /a/:string ", "Second.show")
            .build()
            .unwrap();

        let effective = router.effective_routes(&Method::GET);
        assert_eq!(effective.len(), 2);
        assert_eq!(effective[0].action().group_name(), Some("Second"));

        // The overwritten pattern keeps its earlier position, so the catch-all still wins.
        let call = router.resolve(&Method::GET, "/a/b").unwrap();
        assert_eq!(call.action().group_name(), Some("Catch"));
    }

    #[test]
    fn method_sugar_only_applies_to_its_method() {
        let router: Router<Infallible> = Router::builder()
            .get("/form", "Form.show")
            .post("/form", "Form.submit")
            .build()
            .unwrap();

        let call = router.resolve(&Method::GET, "/form").unwrap();
        assert_eq!(call.action().handler_name(), Some("show"));

        let call = router.resolve(&Method::POST, "/form").unwrap();
        assert_eq!(call.action().handler_name(), Some("submit"));
        assert_eq!(call.handler_name(), Some("POST_submit"));

        assert!(router.resolve(&Method::PUT, "/form").is_none());
    }

    #[test]
    fn method_sugar_overwrites_plain_route_in_order() {
        let router: Router<Infallible> = Router::builder()
            .action("/x", "Plain.first")
            .post("/x", "Post.only")
            .action("/x", "Plain.last")
            .build()
            .unwrap();

        let call = router.resolve(&Method::POST, "/x").unwrap();
        assert_eq!(call.action().group_name(), Some("Plain"));
        assert_eq!(call.action().handler_name(), Some("last"));
        assert_eq!(router.routes().len(), 3);
    }

    #[test]
    fn query_string_is_ignored_by_default() {
        let router: Router<Infallible> = Router::builder()
            .route("/search/:string", echo("search"))
            .build()
            .unwrap();
        assert!(router.resolve(&Method::GET, "/search/rust?page=2").is_some());

        let router: Router<Infallible> = Router::builder()
            .config(RouterConfig::default().ignore_query_string(false))
            .route("/search/:string", echo("search"))
            .build()
            .unwrap();
        let call = router.resolve(&Method::GET, "/search/rust?page=2").unwrap();
        assert_eq!(call.params().as_slice(), ["rust?page=2"]);
    }

    #[test]
    fn malformed_routes_are_skipped() {
        let router: Router<Infallible> = Router::builder()
            .route("/a/:int", echo("ok"))
            .route("/a/(:int", echo("broken"))
            .build()
            .unwrap();

        let call = router.resolve(&Method::GET, "/a/1").unwrap();
        assert_eq!(call.pattern(), "/a/:int");
        assert!(!router.routes()[1].is_valid());
    }

    #[tokio::test]
    async fn dispatches_direct_handler_with_params() {
        let router: Router<Infallible> = Router::builder()
            .route("/files/:any", echo("file"))
            .build()
            .unwrap();

        let resp = router.dispatch(&Method::GET, "/files/a/b/c").await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_of(resp).await, "file[a/b/c]");
    }

    #[tokio::test]
    async fn dispatches_named_handler() {
        let router: Router<Infallible> = Router::builder()
            .handler_group("Users", users)
            .action("/users/:int", "Users.showUser")
            .build()
            .unwrap();

        let resp = router.dispatch(&Method::GET, "/users/42/").await.unwrap();
        assert_eq!(body_of(resp).await, "show[42]");

        let resp = router.dispatch(&Method::POST, "/users/42").await.unwrap();
        assert_eq!(body_of(resp).await, "post[42]");
    }

    #[tokio::test]
    async fn missing_prefixed_handler_is_a_dispatch_error() {
        let router: Router<Infallible> = Router::builder()
            .handler_group("Users", users)
            .action("/users/:int", "Users.showUser")
            .build()
            .unwrap();

        let err = router.dispatch(&Method::DELETE, "/users/42").await.unwrap_err();
        assert!(err.is_dispatch());
    }

    #[tokio::test]
    async fn when_defined_falls_back_to_plain_handler() {
        let router: Router<Infallible> = Router::builder()
            .config(RouterConfig::default().method_prefix(MethodPrefixPolicy::WhenDefined))
            .handler_group("Users", users)
            .action("/users/:int", "Users.showUser")
            .build()
            .unwrap();

        let resp = router.dispatch(&Method::DELETE, "/users/42").await.unwrap();
        assert_eq!(body_of(resp).await, "show[42]");

        let resp = router.dispatch(&Method::POST, "/users/42").await.unwrap();
        assert_eq!(body_of(resp).await, "post[42]");
    }

    #[test]
    fn selected_handler_name_is_the_one_invoked() {
        let router: Router<Infallible> = Router::builder()
            .config(RouterConfig::default().method_prefix(MethodPrefixPolicy::WhenDefined))
            .handler_group("Users", users)
            .action("/users/:int", "Users.showUser")
            .build()
            .unwrap();
        let group = users();

        let call = router.resolve(&Method::DELETE, "/users/42").unwrap();
        assert_eq!(call.handler_name(), Some("DELETE_showUser"));
        assert_eq!(
            router.select_handler_name(&group, "showUser", call.handler_name()),
            "showUser"
        );

        let call = router.resolve(&Method::POST, "/users/42").unwrap();
        assert_eq!(
            router.select_handler_name(&group, "showUser", call.handler_name()),
            "POST_showUser"
        );
    }

    #[test]
    fn literal_group_does_not_mask_a_swallowed_token() {
        let router: Router<Infallible> = Router::builder()
            .route("/(v1)/[:int]", echo("id"))
            .build()
            .unwrap();

        assert!(!router.routes()[0].is_valid());
        assert!(router.resolve(&Method::GET, "/v1/5").is_none());
    }

    #[tokio::test]
    async fn missing_group_is_a_dispatch_error() {
        let router: Router<Infallible> = Router::builder()
            .action("/users/:int", "Users.showUser")
            .build()
            .unwrap();

        let err = router.dispatch(&Method::GET, "/users/42").await.unwrap_err();
        assert!(matches!(err, Error::Dispatch(_)));
    }

    #[tokio::test]
    async fn not_found_invokes_no_handler() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let router: Router<Infallible> = Router::builder()
            .handler("/users/:int", move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                async move { text(String::new()) }
            })
            .build()
            .unwrap();

        let resp = router.dispatch(&Method::GET, "/users/alice").await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(resp.headers()[CONTENT_TYPE], "text/html; charset=utf-8");
        assert_eq!(body_of(resp).await, DEFAULT_NOT_FOUND_BODY);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn missing_not_found_document_is_an_error() {
        let router: Router<Infallible> = Router::builder()
            .config(RouterConfig::default().not_found_document("/definitely/not/here.html"))
            .build()
            .unwrap();

        let err = router.dispatch(&Method::GET, "/").await.unwrap_err();
        assert!(matches!(err, Error::NotFoundDocument { .. }));
    }

    #[tokio::test]
    async fn handler_errors_are_boxed() {
        let router: Router<std::io::Error> = Router::builder()
            .handler("/fail", |_| async move {
                Err::<Response<Full<Bytes>>, _>(std::io::Error::other("disk on fire"))
            })
            .build()
            .unwrap();

        let err = router.dispatch(&Method::GET, "/fail").await.unwrap_err();
        assert!(matches!(err, Error::Handler(_)));
        assert!(err.to_string().contains("disk on fire"));
    }
}
