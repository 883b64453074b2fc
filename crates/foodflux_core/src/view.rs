//! Stale-view hints for the presentation layer.
//!
//! After a mutation the domain service names the view whose cached
//! rendering is now stale. This is the only cache invalidation concept in
//! the tracker.

use crate::model::date_key::DateKey;
use log::info;
use std::fmt::{Display, Formatter};

/// Presentation path whose cached rendering must be recomputed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewPath {
    /// `/`: preset list, goal and the default day.
    Root,
    /// `/?date=<key>`: one day's entries and totals.
    Day(DateKey),
}

impl Display for ViewPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Root => f.write_str("/"),
            Self::Day(date_key) => write!(f, "/?date={date_key}"),
        }
    }
}

/// Receiver of stale-view hints.
pub trait ViewInvalidator {
    fn invalidate(&self, path: &ViewPath);
}

impl<V: ViewInvalidator + ?Sized> ViewInvalidator for &V {
    fn invalidate(&self, path: &ViewPath) {
        (**self).invalidate(path);
    }
}

/// Emits each hint as a `view_stale` log event.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingInvalidator;

impl ViewInvalidator for LoggingInvalidator {
    fn invalidate(&self, path: &ViewPath) {
        info!("event=view_stale module=view path={path}");
    }
}

/// Discards hints, for callers without a cached presentation layer.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopInvalidator;

impl ViewInvalidator for NoopInvalidator {
    fn invalidate(&self, _path: &ViewPath) {}
}
