use crate::config::RouterConfig;
use percent_encoding::percent_decode_str;
use std::borrow::Cow;

pub(crate) fn strip_query_string(path: &str) -> &str {
    match path.find('?') {
        Some(idx) => &path[..idx],
        None => path,
    }
}

pub(crate) fn percent_decode_request_path(val: &str) -> Cow<'_, str> {
    percent_decode_str(val).decode_utf8_lossy()
}

/// Turns the raw request path into the path the routes are matched against.
pub(crate) fn target_path<'a>(path: &'a str, config: &RouterConfig) -> Cow<'a, str> {
    let path = if config.ignore_query_string {
        strip_query_string(path)
    } else {
        path
    };

    if config.percent_decode {
        percent_decode_request_path(path)
    } else {
        Cow::Borrowed(path)
    }
}
