use std::{error::Error, time::Duration};

use crate::{config::UpstreamConfig, errors::FeedError};

/// Builds the item list url for `tag`.
///
/// Parameters are emitted in name order, with the tag slotted in under
/// `tag_param`. Nothing is percent-encoded: the tag goes in exactly as
/// the caller sent it.
pub fn build_url(tag: &str, config: &UpstreamConfig) -> String {
    log::debug!("building upstream url for tag {tag:?}");

    let mut params: Vec<(&str, &str)> = config
        .params
        .iter()
        .filter(|(name, _)| **name != config.tag_param)
        .map(|(name, value)| (name.as_str(), value.as_str()))
        .collect();

    let position = params
        .iter()
        .position(|(name, _)| *name > config.tag_param.as_str())
        .unwrap_or(params.len());
    params.insert(position, (config.tag_param.as_str(), tag));

    let query = params
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join("&");

    format!("{}?{query}", config.base_url)
}

pub fn get_error(error: &reqwest::Error) -> String {
    match error.source() {
        Some(e) => match e.source() {
            Some(e) => e.to_string(),
            None => e.to_string(),
        },
        None => error.to_string(),
    }
}

/// Single-shot GET against the upstream service.
///
/// Holds one pooled client for the life of the process.
#[derive(Clone, Debug)]
pub struct Fetcher {
    client: reqwest::Client,
}

impl Fetcher {
    pub fn new(config: &UpstreamConfig) -> Result<Self, FeedError> {
        let mut client = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.fetch_timeout_secs))
            .pool_idle_timeout(Duration::from_secs(10))
            .no_proxy();

        if let Some(proxy) = config.proxy.as_deref().filter(|p| !p.is_empty()) {
            log::debug!("using proxy {proxy:#?}");
            client = client.proxy(reqwest::Proxy::all(proxy)?);
        }

        let client = client.build()?;

        Ok(Self { client })
    }

    /// Sends the request and returns as soon as the status line is in.
    /// The body is left unread.
    pub async fn get(&self, url: &str) -> Result<reqwest::Response, FeedError> {
        let resp = self.client.get(url).send().await?;
        log::debug!("upstream responded with {}", resp.status());

        Ok(resp)
    }
}
