use anyhow::{anyhow, Context, Result};
use reqwest::blocking::Client;
use reqwest::Proxy;

/// Optional proxies for plain and TLS traffic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProxyConfig {
    pub http: Option<String>,
    pub https: Option<String>,
}

/// HTTP GET returning the whole body.
pub trait Downloader {
    fn fetch(&self, url: &str, proxy: &ProxyConfig) -> Result<Vec<u8>>;
}

/// Blocking reqwest client; one client is built per proxy configuration.
#[derive(Debug, Default)]
pub struct HttpDownloader;

impl HttpDownloader {
    fn client(proxy: &ProxyConfig) -> Result<Client> {
        let mut builder = Client::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(p) = &proxy.http {
            builder = builder.proxy(Proxy::http(p).with_context(|| format!("invalid HTTP proxy {p}"))?);
        }
        if let Some(p) = &proxy.https {
            builder = builder.proxy(Proxy::https(p).with_context(|| format!("invalid HTTPS proxy {p}"))?);
        }
        builder.build().with_context(|| "building HTTP client")
    }
}

impl Downloader for HttpDownloader {
    fn fetch(&self, url: &str, proxy: &ProxyConfig) -> Result<Vec<u8>> {
        let client = Self::client(proxy)?;
        let resp = client.get(url).send().with_context(|| format!("GET {url}"))?;
        if !resp.status().is_success() {
            return Err(anyhow!("download failed {}", resp.status()));
        }
        let bytes = resp.bytes().with_context(|| "reading body")?.to_vec();
        tracing::debug!(url, bytes = bytes.len(), "downloaded");
        Ok(bytes)
    }
}
