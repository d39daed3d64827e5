// Outbound delivery of finished reports. Both transports are optional and
// credential-gated; neither can fail the run once the report is on disk.

pub mod discord;
pub mod email;
