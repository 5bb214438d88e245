//! Streaming download of a build archive to a staging file.

use std::path::Path;

use futures::StreamExt;
use reqwest::{header, Client, Response, StatusCode};
use thiserror::Error;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::debug;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("download failed with status {status}")]
    DownloadFailed { status: u16 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Download `url` to `dest`, following at most one redirect hop.
///
/// A first response in the 300-399 range with a `location` header is
/// followed exactly once; the second response must then be exactly 200.
/// Longer redirect chains fail with [`FetchError::DownloadFailed`] carrying
/// the intermediate status. The destination file is only created once a 200
/// response has been observed, and is flushed and closed before this
/// returns.
///
/// The shared client has automatic redirects disabled
/// ([`crate::config::SourceConfig::client`]), so the one-hop behavior holds
/// regardless of server chains.
pub async fn download(client: &Client, url: &str, dest: &Path) -> Result<(), FetchError> {
    let response = client.get(url).send().await?;
    let status = response.status();

    let response = if status.is_redirection() {
        match redirect_location(&response) {
            Some(location) => {
                debug!(%status, %location, "following redirect");
                let follow = client.get(&location).send().await?;
                if follow.status() != StatusCode::OK {
                    return Err(FetchError::DownloadFailed {
                        status: follow.status().as_u16(),
                    });
                }
                follow
            }
            None => {
                return Err(FetchError::DownloadFailed {
                    status: status.as_u16(),
                });
            }
        }
    } else if status != StatusCode::OK {
        return Err(FetchError::DownloadFailed {
            status: status.as_u16(),
        });
    } else {
        response
    };

    stream_to_file(response, dest).await
}

fn redirect_location(response: &Response) -> Option<String> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
}

async fn stream_to_file(response: Response, dest: &Path) -> Result<(), FetchError> {
    let mut file = File::create(dest).await?;
    let mut stream = response.bytes_stream();
    let mut written: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = match chunk {
            Ok(chunk) => chunk,
            Err(err) => {
                drop(file);
                tokio::fs::remove_file(dest).await.ok();
                return Err(err.into());
            }
        };
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }

    file.flush().await?;
    debug!(bytes = written, dest = %dest.display(), "download complete");
    Ok(())
}
