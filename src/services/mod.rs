pub(crate) mod ai_client;
pub(crate) mod fallback;
pub(crate) mod maps;
pub(crate) mod uploads;
