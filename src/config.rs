//! Loads the view configuration from YAML. Every key is optional; see
//! [`Config`] for the defaults.

use crate::archive::{self, Order, YearRange};
use crate::feed::{Author, FeedConfig};
use serde::Deserialize;
use std::fmt;
use std::io::Read;
use url::Url;

#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct HomePageSize(pub usize);
impl Default for HomePageSize {
    fn default() -> Self {
        HomePageSize(3)
    }
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct FeedSize(pub usize);
impl Default for FeedSize {
    fn default() -> Self {
        FeedSize(10)
    }
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct StartYear(pub i32);
impl Default for StartYear {
    fn default() -> Self {
        StartYear(2014)
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct PageName(pub String);

impl PageName {
    fn new(name: &str) -> Self {
        PageName(name.to_owned())
    }
}

/// Settings for the home page's latest-posts list.
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct HomePage {
    /// The file that receives the list.
    pub page: PageName,
    pub size: HomePageSize,
}

impl Default for HomePage {
    fn default() -> Self {
        HomePage {
            page: PageName::new("index.html"),
            size: HomePageSize::default(),
        }
    }
}

/// Settings for the feed listing and, when `title` and `site_root` are both
/// set, the Atom document.
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Feed {
    /// The file that receives the list.
    pub page: PageName,
    pub size: FeedSize,
    pub title: Option<String>,
    pub site_root: Option<Url>,
    pub author: Option<Author>,
}

impl Default for Feed {
    fn default() -> Self {
        Feed {
            page: PageName::new("feed.rss"),
            size: FeedSize::default(),
            title: None,
            site_root: None,
            author: None,
        }
    }
}

/// Settings for the archive tree.
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ArchivePage {
    /// The file that receives the tree.
    pub page: PageName,
    pub start_year: StartYear,
    pub order: Order,
}

impl Default for ArchivePage {
    fn default() -> Self {
        ArchivePage {
            page: PageName::new("archive.html"),
            start_year: StartYear::default(),
            order: Order::default(),
        }
    }
}

/// The complete view configuration:
///
/// ```yaml
/// home_page:
///   page: index.html
///   size: 3
/// feed:
///   page: feed.rss
///   size: 10
///   title: My blog
///   site_root: https://example.com/
///   author: { name: Jane, email: jane@example.com }
/// archive:
///   page: archive.html
///   start_year: 2014
///   order: descending
/// ```
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub home_page: HomePage,
    pub feed: Feed,
    pub archive: ArchivePage,
}

impl Config {
    pub fn from_str(yaml: &str) -> Result<Config> {
        if yaml.trim().is_empty() {
            return Ok(Config::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_reader<R: Read>(mut reader: R) -> Result<Config> {
        let mut yaml = String::new();
        reader.read_to_string(&mut yaml)?;
        Config::from_str(&yaml)
    }

    /// The archive's years, from the configured start year through
    /// `end_year` (normally the current year).
    pub fn year_range(&self, end_year: i32) -> archive::Result<YearRange> {
        YearRange::new(self.archive.start_year.0, end_year)
    }

    /// The Atom settings, if both a title and a site root are configured.
    pub fn feed_config(&self) -> Option<FeedConfig> {
        match (&self.feed.title, &self.feed.site_root) {
            (Some(title), Some(site_root)) => Some(FeedConfig {
                title: title.clone(),
                id: site_root.to_string(),
                author: self.feed.author.clone(),
                site_root: site_root.clone(),
            }),
            _ => None,
        }
    }
}

type Result<T> = std::result::Result<T, Error>;

/// Represents an error loading the configuration.
#[derive(Debug)]
pub enum Error {
    /// Returned when the configuration isn't valid YAML or doesn't match
    /// [`Config`].
    DeserializeYaml(serde_yaml::Error),

    /// Returned when the configuration can't be read.
    Io(std::io::Error),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::DeserializeYaml(err) => write!(f, "Loading configuration: {}", err),
            Error::Io(err) => write!(f, "Reading configuration: {}", err),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::DeserializeYaml(err) => Some(err),
            Error::Io(err) => Some(err),
        }
    }
}

impl From<serde_yaml::Error> for Error {
    /// Converts a [`serde_yaml::Error`] into an [`Error`]. This allows us to
    /// use the `?` operator.
    fn from(err: serde_yaml::Error) -> Error {
        Error::DeserializeYaml(err)
    }
}

impl From<std::io::Error> for Error {
    /// Converts a [`std::io::Error`] into an [`Error`]. This allows us to use
    /// the `?` operator.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}
