//! Loading the raw dataset bytes from disk or over HTTP.

mod basic;
mod client;
pub mod auth;

pub use basic::BasicClient;
pub use client::HttpClient;

use anyhow::{Context, Result};
use bytes::Bytes;
use flate2::read::GzDecoder;
use std::io::Read;
use tracing::debug;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

pub fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Bytes> {
    let req = reqwest::Request::new(reqwest::Method::GET, url.parse()?);

    let resp = client.execute(req).await?.error_for_status()?;
    Ok(resp.bytes().await?)
}

/// Inflates gzip payloads (detected by magic bytes); anything else is returned as is.
pub fn decompress(bytes: Bytes) -> Result<Bytes> {
    if !bytes.starts_with(&GZIP_MAGIC) {
        return Ok(bytes);
    }

    let mut out = Vec::new();
    GzDecoder::new(bytes.as_ref())
        .read_to_end(&mut out)
        .context("failed to decompress gzip input")?;
    debug!(compressed = bytes.len(), inflated = out.len(), "Decompressed gzip input");
    Ok(Bytes::from(out))
}

/// Reads a dataset from a local path or fetches it over HTTP, then decompresses it.
#[tracing::instrument(skip(client))]
pub async fn read_source<C: HttpClient>(client: &C, source: &str) -> Result<Bytes> {
    let bytes = if is_remote(source) {
        fetch_bytes(client, source)
            .await
            .with_context(|| format!("failed to fetch dataset from {source}"))?
    } else {
        Bytes::from(
            std::fs::read(source).with_context(|| format!("failed to read dataset {source}"))?,
        )
    };
    debug!(bytes = bytes.len(), "Dataset bytes loaded");

    decompress(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io::Write;

    struct Fixed(&'static str, u16);

    #[async_trait]
    impl HttpClient for Fixed {
        async fn execute(&self, _req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
            let resp = http::Response::builder()
                .status(self.1)
                .body(self.0)
                .unwrap();
            Ok(resp.into())
        }
    }

    fn gzip(data: &[u8]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn test_is_remote() {
        assert!(is_remote("https://example.test/all_data.csv"));
        assert!(is_remote("http://example.test/all_data.csv"));
        assert!(!is_remote("data/all_data.csv"));
    }

    #[test]
    fn test_decompress_plain_passthrough() {
        let plain = Bytes::from_static(b"date,hour\n");
        assert_eq!(decompress(plain.clone()).unwrap(), plain);
    }

    #[test]
    fn test_decompress_gzip() {
        let packed = Bytes::from(gzip(b"date,hour,weather,count\n"));
        assert_eq!(
            decompress(packed).unwrap(),
            Bytes::from_static(b"date,hour,weather,count\n")
        );
    }

    #[test]
    fn test_decompress_truncated_gzip_fails() {
        let mut packed = gzip(b"date,hour,weather,count\n");
        packed.truncate(12);
        assert!(decompress(Bytes::from(packed)).is_err());
    }

    #[tokio::test]
    async fn test_read_source_remote() {
        let client = Fixed("date,hour,weather,count\n", 200);
        let bytes = read_source(&client, "https://example.test/all_data.csv")
            .await
            .unwrap();
        assert_eq!(bytes, Bytes::from_static(b"date,hour,weather,count\n"));
    }

    #[tokio::test]
    async fn test_read_source_remote_error_status() {
        let client = Fixed("gone", 404);
        assert!(
            read_source(&client, "https://example.test/all_data.csv")
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn test_read_source_local_gzip() {
        let path = std::env::temp_dir().join("bike_dashboard_test_source.csv.gz");
        std::fs::write(&path, gzip(b"date,hour,weather,count\n")).unwrap();

        let client = Fixed("", 200);
        let bytes = read_source(&client, path.to_str().unwrap()).await.unwrap();
        assert_eq!(bytes, Bytes::from_static(b"date,hour,weather,count\n"));

        std::fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn test_read_source_missing_file() {
        let client = Fixed("", 200);
        let err = read_source(&client, "/nonexistent/bike_dashboard.csv")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("failed to read dataset"));
    }
}
