use std::collections::HashSet;

use regex::Regex;

pub const DEFAULT_CDN_HOST: &str = "v16m-default.tiktokcdn-us.com";

/// Finds direct video urls served from a single CDN host.
#[derive(Clone, Debug)]
pub struct VideoExtractor {
    regex: Regex,
}

impl VideoExtractor {
    pub fn new(cdn_host: &str) -> Result<Self, regex::Error> {
        let pattern = format!(
            r#"https://{}/[-a-zA-Z0-9()@:%_+.~#?&/=]+ve[^"]+"#,
            regex::escape(cdn_host)
        );

        Ok(Self {
            regex: Regex::new(&pattern)?,
        })
    }

    /// Every match in `body`, left to right, duplicates included.
    pub fn find_all<'a>(&self, body: &'a str) -> Vec<&'a str> {
        self.regex.find_iter(body).map(|m| m.as_str()).collect()
    }

    /// Unique matches in order of first appearance.
    pub fn extract(&self, body: &str) -> Vec<String> {
        dedup(self.find_all(body))
    }
}

/// Drops repeated entries, keeping the first occurrence of each.
pub fn dedup<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut unique = Vec::new();

    for item in items {
        let item = item.as_ref();
        if seen.insert(item.to_string()) {
            unique.push(item.to_string());
        }
    }

    unique
}
