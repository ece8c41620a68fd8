//! Repository analytics over a hosted source-code-hosting REST API.
//!
//! # Overview
//!
//! Given a validated repository reference, an optional time window and a
//! branch, the library computes three aggregates from the provider's paged
//! REST endpoints:
//!
//! * a contributor ranking by commit count ([`rank::top_contributors`]),
//! * open/closed/old statistics for pull requests ([`classify::pull_stats`]),
//! * the same statistics for issues ([`classify::issue_stats`]).
//!
//! The provider slices results into pages and advertises the last page number
//! in the `Link` response header. [`paging`] turns that into two primitives
//! everything else is built on: fetching the concatenation of all pages, and
//! estimating a total count from pages 1 and n alone.
//!
//! All requests go through the [`api::Transport`] capability; the library
//! never manages connections itself. Requests are issued strictly one at a
//! time and a single failure aborts the whole analysis run: there is no
//! caching, no retry and no parallel fetch.

#[cfg(feature = "api")]
pub mod api;

#[cfg(feature = "analytics")]
pub mod classify;
#[cfg(feature = "analytics")]
pub mod paging;
#[cfg(feature = "analytics")]
pub mod rank;
#[cfg(feature = "analytics")]
pub mod request;

#[cfg(feature = "analytics")]
pub use classify::{issue_stats, pull_stats, ItemStats};
#[cfg(feature = "analytics")]
pub use rank::{top_contributors, ContributorCommits};
#[cfg(feature = "analytics")]
pub use request::AnalysisRequest;
