#![allow(clippy::type_complexity)]

mod body;
mod cache;
mod err;
mod http;
mod listing;
mod opt;
mod resolve;
mod routes;

use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), err::DisplayError> {
    let opt::Options {
        verbose,
        listen,
        root,
    } = clap::Parser::parse();

    env_logger::Builder::new()
        .filter_level(match verbose {
            0 => log::LevelFilter::Info,
            1 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        })
        .init();

    let root = tokio::fs::canonicalize(root).await?;
    let listener = TcpListener::bind(listen).await?;
    let addr = listener.local_addr()?;

    log::info!("Serving {} at http://{}/", root.display(), banner_host(addr));
    log::info!("Press Ctrl-C to stop");

    http::run_server(listener, routes::State { root }, routes::respond_to_request).await?;

    Ok(())
}

/// A wildcard bind address isn't something a browser can dial; show
/// localhost in the banner instead.
fn banner_host(addr: std::net::SocketAddr) -> String {
    if addr.ip().is_unspecified() {
        format!("localhost:{}", addr.port())
    } else {
        addr.to_string()
    }
}
