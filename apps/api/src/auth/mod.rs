// Auth passthrough: thin forwarders to the managed identity provider, plus
// profile read/save on top of the provider's user metadata.

pub mod client;
pub mod handlers;
