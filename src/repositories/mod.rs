pub(crate) mod alerts;
pub(crate) mod analytics;
pub(crate) mod emergency;
pub(crate) mod hotspots;
pub(crate) mod reports;
pub(crate) mod users;
