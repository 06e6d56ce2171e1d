// Job search proxy: filter translation, upstream call, response normalization,
// and the sample-data fallback used when no upstream key is configured.

pub mod client;
pub mod fallback;
pub mod filters;
pub mod handlers;
pub mod normalize;
