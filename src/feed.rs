//! Support for rendering the feed listing as an Atom document.

use crate::file::File;
use atom_syndication::{Entry, Error as AtomError, Feed, Link, Person};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::fmt;
use std::io::Write;
use url::Url;

/// The field used as an entry's title. Entries without one are titled by
/// their path.
pub const TITLE: &str = "title";

/// The field used as an entry's summary, if present.
pub const EXCERPT: &str = "excerpt";

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Author {
    pub name: String,

    #[serde(default)]
    pub email: Option<String>,
}

/// Bundled configuration for creating a feed.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    pub title: String,
    pub id: String,
    pub author: Option<Author>,

    /// Entry links are this URL joined with the entry's output path.
    pub site_root: Url,
}

/// Creates a feed from some configuration ([`FeedConfig`]) and a list of
/// `(output path, file)` pairs, typically the
/// [`crate::latest::latest`] selection over a [`crate::file::Files`] map, and
/// writes the result to a [`std::io::Write`]. `updated` is the feed's own
/// timestamp and stands in for any entry without a creation date.
pub fn write_feed<P, W>(
    config: &FeedConfig,
    entries: &[(P, &File)],
    updated: DateTime<Utc>,
    w: W,
) -> Result<()>
where
    P: AsRef<str>,
    W: Write,
{
    feed(config, entries, updated)?.write_to(w)?;
    Ok(())
}

/// Builds the Atom [`Feed`] without writing it. See [`write_feed`].
pub fn feed<P: AsRef<str>>(
    config: &FeedConfig,
    entries: &[(P, &File)],
    updated: DateTime<Utc>,
) -> Result<Feed> {
    Ok(Feed {
        entries: feed_entries(config, entries, updated)?,
        title: config.title.clone().into(),
        id: config.id.clone(),
        updated: updated.into(),
        authors: author_to_people(config.author.clone()),
        links: vec![alternate(config.site_root.to_string())],
        ..Default::default()
    })
}

fn feed_entries<P: AsRef<str>>(
    config: &FeedConfig,
    entries: &[(P, &File)],
    updated: DateTime<Utc>,
) -> Result<Vec<Entry>> {
    let mut feed_entries: Vec<Entry> = Vec::with_capacity(entries.len());

    for (path, file) in entries {
        let path = path.as_ref();
        let url = config.site_root.join(path)?;
        let date = file.created_at.unwrap_or(updated);

        feed_entries.push(Entry {
            id: url.to_string(),
            title: file.string_field(TITLE).unwrap_or(path).to_owned().into(),
            updated: date.into(),
            published: file.created_at.map(Into::into),
            authors: author_to_people(config.author.clone()),
            links: vec![alternate(url.to_string())],
            summary: file.string_field(EXCERPT).map(|s| s.to_owned().into()),
            ..Default::default()
        })
    }
    Ok(feed_entries)
}

fn alternate(href: String) -> Link {
    Link {
        href,
        rel: "alternate".to_owned(),
        ..Default::default()
    }
}

fn author_to_people(author: Option<Author>) -> Vec<Person> {
    match author {
        Some(author) => vec![Person {
            name: author.name,
            email: author.email,
            uri: None,
        }],
        None => Vec::new(),
    }
}

type Result<T> = std::result::Result<T, Error>;

/// Represents a problem creating a feed. Variants inlude I/O, Atom, and URL
/// issues.
#[derive(Debug)]
pub enum Error {
    /// Returned when there is a generic I/O error.
    Io(std::io::Error),

    /// Returned when there is an Atom-related error.
    Atom(AtomError),

    /// Returned when an entry's path can't be joined onto the site root.
    UrlParse(url::ParseError),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io(err) => err.fmt(f),
            Error::Atom(err) => err.fmt(f),
            Error::UrlParse(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Atom(err) => Some(err),
            Error::UrlParse(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    /// Converts [`std::io::Error`]s into [`Error`]. This allows us to use the
    /// `?` operator in fallible feed operations.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<AtomError> for Error {
    /// Converts [`AtomError`]s into [`Error`]. This allows us to use the `?`
    /// operator in fallible feed operations.
    fn from(err: AtomError) -> Error {
        Error::Atom(err)
    }
}

impl From<url::ParseError> for Error {
    /// Converts [`url::ParseError`]s into [`Error`]. This allows us to use the
    /// `?` operator when joining entry URLs.
    fn from(err: url::ParseError) -> Error {
        Error::UrlParse(err)
    }
}
