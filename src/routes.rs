use crate::body::{self, ResponseBody};
use crate::cache::disable_caching;
use crate::listing;
use crate::resolve::{self, ResolveError, Resolved};
use headers::{ContentLength, ContentType, HeaderMapExt};
use hyper::body::Incoming;
use hyper::header::{self, HeaderValue};
use hyper::{Method, Request, Response, StatusCode};
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs::File;

const INDEX_FILES: &[&str] = &["index.html", "index.htm"];

pub struct State {
    pub root: PathBuf,
}

pub async fn respond_to_request(req: Request<Incoming>, state: &State) -> Response<ResponseBody> {
    disable_caching(serve(&req, state).await)
}

async fn serve(req: &Request<Incoming>, state: &State) -> Response<ResponseBody> {
    let head_only = match *req.method() {
        Method::GET => false,
        Method::HEAD => true,
        _ => {
            log::warn!("{} {} -> [method not allowed]", req.method(), req.uri());
            return status_page(StatusCode::METHOD_NOT_ALLOWED, false);
        }
    };

    match resolve::resolve(&state.root, req.uri().path()).await {
        Ok(Resolved::File(path)) => file_response(req, &path, head_only).await,
        Ok(Resolved::Dir(path)) => dir_response(req, &path, head_only).await,
        Ok(Resolved::DirNoSlash) => {
            let location = format!("{}/", req.uri().path());
            log::info!("{} {} -> [redirect {}]", req.method(), req.uri(), location);
            let mut resp = status_page(StatusCode::MOVED_PERMANENTLY, head_only);
            if let Ok(value) = HeaderValue::from_str(&location) {
                resp.headers_mut().insert(header::LOCATION, value);
            }
            resp
        }
        Err(e) => error_response(req, e, head_only),
    }
}

async fn file_response(
    req: &Request<Incoming>,
    path: &Path,
    head_only: bool,
) -> Response<ResponseBody> {
    let file = match File::open(path).await {
        Ok(f) => f,
        Err(e) => return error_response(req, e.into(), head_only),
    };
    let len = match file.metadata().await {
        Ok(m) => m.len(),
        Err(e) => return error_response(req, e.into(), head_only),
    };
    let mime = mime_guess::from_path(path).first_or_octet_stream();

    log::info!("{} {} -> [found {} bytes]", req.method(), req.uri(), len);
    let mut resp = Response::new(if head_only {
        body::empty()
    } else {
        body::from_file(file)
    });
    resp.headers_mut().typed_insert(ContentType::from(mime));
    resp.headers_mut().typed_insert(ContentLength(len));
    resp
}

async fn dir_response(
    req: &Request<Incoming>,
    dir: &Path,
    head_only: bool,
) -> Response<ResponseBody> {
    for index in INDEX_FILES {
        let candidate = dir.join(index);
        match tokio::fs::metadata(&candidate).await {
            Ok(m) if m.is_file() => return file_response(req, &candidate, head_only).await,
            _ => {}
        }
    }

    match listing::render(dir, req.uri().path()).await {
        Ok(html) => {
            log::info!("{} {} -> [listing]", req.method(), req.uri());
            html_response(StatusCode::OK, html, head_only)
        }
        Err(e) => error_response(req, e.into(), head_only),
    }
}

fn error_response(
    req: &Request<Incoming>,
    e: ResolveError,
    head_only: bool,
) -> Response<ResponseBody> {
    let status = match &e {
        ResolveError::BadEncoding => StatusCode::BAD_REQUEST,
        // traversal answers like any other missing path
        ResolveError::Traversal | ResolveError::NotFound => StatusCode::NOT_FOUND,
        ResolveError::Io(e) if e.kind() == io::ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ResolveError::Io(e) if e.kind() == io::ErrorKind::PermissionDenied => StatusCode::FORBIDDEN,
        ResolveError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        log::warn!("{} {} -> [io error] {}", req.method(), req.uri(), e);
    } else {
        log::info!("{} {} -> [{}]", req.method(), req.uri(), status);
    }
    status_page(status, head_only)
}

fn status_page(status: StatusCode, head_only: bool) -> Response<ResponseBody> {
    let page = format!(
        concat!(
            "<!DOCTYPE html>",
            "<html>",
            "<head><title>{status}</title></head>",
            "<body><h1>{status}</h1></body>",
            "</html>",
        ),
        status = status,
    );
    html_response(status, page, head_only)
}

fn html_response(status: StatusCode, html: String, head_only: bool) -> Response<ResponseBody> {
    let len = html.len() as u64;
    let mut resp = Response::new(if head_only {
        body::empty()
    } else {
        body::full(html)
    });
    *resp.status_mut() = status;
    resp.headers_mut().typed_insert(ContentType::html());
    resp.headers_mut().typed_insert(ContentLength(len));
    resp
}
