//! The library code computing the derived views of a static blog build. The
//! build pipeline (reading sources, rendering markdown, templating, copying
//! assets) lives elsewhere; it hands this crate a map of output path to file
//! record ([`crate::file::Files`]) once per build and gets the same map back
//! with a few extra fields attached:
//!
//! 1. The home page receives the latest few posts ([`crate::latest`])
//! 2. The archive page receives every post grouped by year and month
//!    ([`crate::archive`])
//! 3. The feed receives a longer list of the latest posts, which can also be
//!    rendered as an Atom document ([`crate::feed`])
//!
//! [`crate::build::build_views`] runs all three, configured by
//! [`crate::config::Config`]. The views are plain functions of their input:
//! the only outside fact they depend on, the current year, is passed in.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod archive;
pub mod build;
pub mod config;
pub mod date;
pub mod feed;
pub mod file;
pub mod latest;
pub mod plugin;
pub mod value;
