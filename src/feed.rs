use reqwest::StatusCode;

use crate::{
    config::UpstreamConfig,
    errors::FeedError,
    extract::VideoExtractor,
    upstream::{self, Fetcher},
};

/// Tag in, unique video urls out.
///
/// Everything in here is read-only after construction, so one instance
/// is shared by all requests.
#[derive(Clone, Debug)]
pub struct VideoFeed {
    upstream: UpstreamConfig,
    fetcher: Fetcher,
    extractor: VideoExtractor,
}

impl VideoFeed {
    pub fn new(upstream: UpstreamConfig) -> anyhow::Result<Self> {
        let extractor = VideoExtractor::new(&upstream.cdn_host)?;
        let fetcher = Fetcher::new(&upstream)?;

        Ok(Self {
            upstream,
            fetcher,
            extractor,
        })
    }

    pub fn url_for(&self, tag: &str) -> String {
        upstream::build_url(tag, &self.upstream)
    }

    pub async fn videos(&self, tag: &str) -> Result<Vec<String>, FeedError> {
        let url = self.url_for(tag);
        let resp = self.fetcher.get(&url).await?;

        let status = resp.status();
        if status != StatusCode::OK {
            return Err(FeedError::UpstreamStatus(status.as_u16()));
        }

        let body = resp.text().await?;

        let videos = self.extractor.extract(&body);
        log::info!("tag {tag:?}: found {} videos", videos.len());

        Ok(videos)
    }
}
