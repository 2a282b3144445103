// Preview domain: export of processed frames for display outside the host.

pub mod snapshot;
