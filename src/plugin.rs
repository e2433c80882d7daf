//! The plugins that attach derived view data onto designated files. Each one
//! reads the whole [`Files`] map and writes a field onto a single file; when
//! that file isn't part of the build the plugin does nothing.

use crate::archive::{build_archive, Order, YearRange};
use crate::date::day_of_month;
use crate::file::Files;
use crate::latest::latest;
use crate::value::{flat_archive_value, list_value, CREATED_AT_DAY};
use chrono::Datelike;
use gtmpl_value::Value;
use tracing::debug;

/// The home page's short list of latest posts.
pub const HOME_PAGE_POSTS: &str = "homePagePosts";

/// The feed's longer list of latest posts.
pub const RSS_FEED_POSTS: &str = "rssFeedPosts";

/// The archive tree, year → month → posts.
pub const YEARS: &str = "years";

/// The flattened archive, year → posts.
pub const ARCHIVE_YEARS: &str = "archiveYears";

pub trait Plugin {
    /// Used in log output.
    fn name(&self) -> &'static str;

    fn run(&self, files: &mut Files);
}

/// Attaches the `size` most recent posts onto `page` under `field`.
#[derive(Debug, Clone)]
pub struct LatestPosts {
    pub page: String,
    pub field: &'static str,
    pub size: usize,
}

impl LatestPosts {
    pub fn home_page(page: &str, size: usize) -> Self {
        LatestPosts {
            page: page.to_owned(),
            field: HOME_PAGE_POSTS,
            size,
        }
    }

    pub fn rss_feed(page: &str, size: usize) -> Self {
        LatestPosts {
            page: page.to_owned(),
            field: RSS_FEED_POSTS,
            size,
        }
    }
}

impl Plugin for LatestPosts {
    fn name(&self) -> &'static str {
        self.field
    }

    fn run(&self, files: &mut Files) {
        if !files.contains_key(&self.page) {
            debug!(
                plugin = self.name(),
                page = %self.page,
                "designated page missing, skipping"
            );
            return;
        }

        let posts = list_value(&latest(files.values(), self.size));
        if let Some(file) = files.get_mut(&self.page) {
            debug!(plugin = self.name(), page = %self.page, "attaching latest posts");
            file.fields.insert(self.field.to_owned(), posts);
        }
    }
}

/// Attaches the archive tree and its flattened projection onto `page`, and
/// the `createdAtDay` display field onto every archived file.
#[derive(Debug, Clone)]
pub struct ArchivePage {
    pub page: String,
    pub range: YearRange,
    pub order: Order,
}

impl Plugin for ArchivePage {
    fn name(&self) -> &'static str {
        "archive"
    }

    fn run(&self, files: &mut Files) {
        if !files.contains_key(&self.page) {
            debug!(
                plugin = self.name(),
                page = %self.page,
                "designated page missing, skipping"
            );
            return;
        }

        let (years, flat, count) = {
            let archive = build_archive(files.values(), self.range, self.order);
            (
                Value::from(&archive),
                flat_archive_value(&archive.flatten()),
                archive.len(),
            )
        };

        for file in files.values_mut() {
            let day = file
                .created_at
                .filter(|created_at| self.range.contains(created_at.year()))
                .map(|created_at| day_of_month(&created_at));
            if let Some(day) = day {
                file.fields
                    .insert(CREATED_AT_DAY.to_owned(), Value::String(day));
            }
        }

        if let Some(file) = files.get_mut(&self.page) {
            debug!(
                plugin = self.name(),
                page = %self.page,
                posts = count,
                "attaching archive"
            );
            file.fields.insert(YEARS.to_owned(), years);
            file.fields.insert(ARCHIVE_YEARS.to_owned(), flat);
        }
    }
}
