pub mod batch;
pub mod config;
pub mod fetcher;
pub mod pipeline;
pub mod playlist;
pub mod remux;
pub mod testing;
pub mod url;

pub use batch::{
    parse_entries, read_entries, BatchScheduler, BatchSummary, InputError, LedgerError, Ledgers,
};
pub use config::{
    load_config, load_config_from_env, load_config_from_str, validate_config, BatchConfig, Config,
    ConfigError,
};
pub use fetcher::{FetchError, FetchProgress, FetchResult, Fetcher, FetcherConfig, HttpFetcher};
pub use pipeline::{ItemPipeline, Outcome, PipelineError, Stage, StreamEntry};
pub use playlist::{MasterPlaylist, PlaylistError, SelectedVariant, Variant};
pub use remux::{FfmpegRemuxer, RemuxConfig, RemuxError, RemuxJob, RemuxResult, Remuxer};
