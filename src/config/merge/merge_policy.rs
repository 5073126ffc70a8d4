//! Merge rules: defaults, override order, conflict handling.

use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
///
/// Later sources override earlier ones key by key; tables merge rather than replace.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("http.connect_timeout_secs", 10)?
        .set_default("http.request_timeout_secs", 30)?
        .set_default("wheel.duration_ms", 4000)?
        .set_default("wheel.frame_interval_ms", 16)?
        .set_default("wheel.min_extra_revolutions", 4)?
        .set_default("wheel.max_extra_revolutions", 6)?
        .set_default("identity.scheme", "run")
}
