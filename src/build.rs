//! Exports [`build_views`], which runs every plugin over a build's files in
//! order: the archive, then the home page and feed lists. Also exports
//! [`write_atom`] for rendering the feed listing as an Atom document.

use crate::archive::Error as ArchiveError;
use crate::config::Config;
use crate::feed::{write_feed, Error as FeedError};
use crate::file::Files;
use crate::latest::latest;
use crate::plugin::{ArchivePage, LatestPosts, Plugin};
use chrono::{DateTime, Utc};
use std::fmt;
use std::io::Write;
use tracing::{debug, instrument};

/// Builds the plugins described by `config`. `end_year` is the last year
/// shown in the archive, normally the current one.
///
/// The archive comes first: it attaches `createdAtDay` onto the posts, and
/// the latest-post lists snapshot each post's fields when they run.
pub fn plugins(config: &Config, end_year: i32) -> Result<Vec<Box<dyn Plugin>>> {
    let archive = ArchivePage {
        page: config.archive.page.0.clone(),
        range: config.year_range(end_year)?,
        order: config.archive.order,
    };
    let home_page = LatestPosts::home_page(&config.home_page.page.0, config.home_page.size.0);
    let feed = LatestPosts::rss_feed(&config.feed.page.0, config.feed.size.0);

    Ok(vec![
        Box::new(archive) as Box<dyn Plugin>,
        Box::new(home_page),
        Box::new(feed),
    ])
}

/// Attaches every derived view onto its designated file. Fails only if the
/// configured archive start year is after `end_year`, in which case `files`
/// is left untouched.
#[instrument(skip(config, files), fields(files = files.len()))]
pub fn build_views(config: &Config, end_year: i32, files: &mut Files) -> Result<()> {
    for plugin in plugins(config, end_year)? {
        debug!(plugin = plugin.name(), "running plugin");
        plugin.run(files);
    }
    Ok(())
}

/// Writes the feed listing (the same selection as the feed plugin's) as an
/// Atom document. `updated` is the feed's timestamp.
pub fn write_atom<W: Write>(
    config: &Config,
    files: &Files,
    updated: DateTime<Utc>,
    w: W,
) -> Result<()> {
    let feed_config = config.feed_config().ok_or(Error::FeedNotConfigured)?;
    let entries = latest(files.iter(), config.feed.size.0);
    write_feed(&feed_config, &entries, updated, w)?;
    Ok(())
}

type Result<T> = std::result::Result<T, Error>;

/// The error type for building views.
#[derive(Debug)]
pub enum Error {
    /// Returned when the archive's year range is invalid.
    Archive(ArchiveError),

    /// Returned for errors rendering the Atom feed.
    Feed(FeedError),

    /// Returned by [`write_atom`] when the feed has no title or site root.
    FeedNotConfigured,
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Archive(err) => err.fmt(f),
            Error::Feed(err) => err.fmt(f),
            Error::FeedNotConfigured => {
                write!(f, "The Atom feed needs both `feed.title` and `feed.site_root`")
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Archive(err) => Some(err),
            Error::Feed(err) => Some(err),
            Error::FeedNotConfigured => None,
        }
    }
}

impl From<ArchiveError> for Error {
    /// Converts [`ArchiveError`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: ArchiveError) -> Error {
        Error::Archive(err)
    }
}

impl From<FeedError> for Error {
    /// Converts [`FeedError`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: FeedError) -> Error {
        Error::Feed(err)
    }
}
