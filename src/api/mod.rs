pub(crate) mod ai;
pub(crate) mod analytics;
pub(crate) mod auth;
pub(crate) mod errors;
pub(crate) mod guards;
pub(crate) mod handlers;
pub(crate) mod images;
pub(crate) mod navigation;
pub(crate) mod pagination;
pub(crate) mod reports;
pub(crate) mod router;
pub(crate) mod validation;
