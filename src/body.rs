use futures::TryStreamExt;
use http_body_util::combinators::BoxBody;
use http_body_util::{BodyExt, Empty, Full, StreamBody};
use hyper::body::{Bytes, Frame};
use std::io;
use tokio::fs::File;
use tokio_util::io::ReaderStream;

pub type ResponseBody = BoxBody<Bytes, io::Error>;

pub fn empty() -> ResponseBody {
    Empty::<Bytes>::new()
        .map_err(|never| match never {})
        .boxed()
}

pub fn full(content: impl Into<Bytes>) -> ResponseBody {
    Full::new(content.into())
        .map_err(|never| match never {})
        .boxed()
}

pub fn from_file(file: File) -> ResponseBody {
    let stream = ReaderStream::with_capacity(file, 64 * 1024);
    StreamBody::new(stream.map_ok(Frame::data)).boxed()
}
