use http::header::{self, HeaderValue};
use http::Response;

/// Every response leaves the server through here: appends the three
/// cache-disabling headers without touching anything already set.
#[allow(clippy::declare_interior_mutable_const)]
pub fn disable_caching<B>(mut resp: Response<B>) -> Response<B> {
    const CACHE_CONTROL: HeaderValue = HeaderValue::from_static("no-cache, no-store, must-revalidate");
    const PRAGMA: HeaderValue = HeaderValue::from_static("no-cache");
    const EXPIRES: HeaderValue = HeaderValue::from_static("0");

    let headers = resp.headers_mut();
    headers.append(header::CACHE_CONTROL, CACHE_CONTROL);
    headers.append(header::PRAGMA, PRAGMA);
    headers.append(header::EXPIRES, EXPIRES);
    resp
}
