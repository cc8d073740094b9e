//! Url

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::{ParseError, Url};

use crate::ensure_shopkit;

/// Url Error
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// Url error
    #[error(transparent)]
    Url(#[from] ParseError),
    /// Invalid URL structure
    #[error("Invalid URL")]
    InvalidUrl,
}

/// Base url of a storefront API deployment.
///
/// Stored normalized: no trailing slash, lowercase scheme and host.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StoreUrl(String);

impl Serialize for StoreUrl {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for StoreUrl {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        StoreUrl::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl StoreUrl {
    fn format_url(url: &str) -> Result<String, Error> {
        ensure_shopkit!(!url.is_empty(), Error::InvalidUrl);

        let url = url.trim_end_matches('/');
        let (protocol, rest) = url.split_once("://").ok_or(Error::InvalidUrl)?;
        let mut parts = rest.split('/');
        let host = parts.next().ok_or(Error::InvalidUrl)?;
        ensure_shopkit!(!host.is_empty(), Error::InvalidUrl);

        let path = parts.collect::<Vec<&str>>().join("/");
        let mut formatted = format!("{}://{}", protocol.to_lowercase(), host.to_lowercase());
        if !path.is_empty() {
            formatted.push('/');
            formatted.push_str(&path);
        }
        Ok(formatted)
    }

    /// Join a path onto the base url
    pub fn join(&self, path: &str) -> Result<Url, Error> {
        let url = Url::parse(&self.0)?;

        let base_path = url.path().trim_end_matches('/');
        let joined = format!("{}/{}", base_path, path.trim_start_matches('/'));

        let mut url = url;
        url.set_path(&joined);
        Ok(url)
    }
}

impl FromStr for StoreUrl {
    type Err = Error;

    fn from_str(url: &str) -> Result<Self, Self::Err> {
        let formatted = Self::format_url(url)?;
        // Reject anything the url crate cannot parse either
        Url::parse(&formatted)?;
        Ok(StoreUrl(formatted))
    }
}

impl fmt::Display for StoreUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
