pub mod config;
pub mod lookup;
pub mod metrics;
pub mod testing;

pub use config::{
    load_config, load_config_from_str, load_config_or_default, validate_config, Config,
    ConfigError, SanitizedConfig, SiteConfig, SourceKind,
};
pub use lookup::{
    create_lookup_service, create_source, CacheStats, HtmlSearchSource, KeywordApiSource,
    LookupCache, LookupError, LookupOrigin, LookupOutcome, LookupResult, LookupService,
    MatchKind, MatchRecord, ResultSource, SiteProfile, SourceError,
};
