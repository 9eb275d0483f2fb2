use anyhow::{Result, anyhow};
use serde::Deserialize;
use tracing_subscriber::{
    EnvFilter, Layer, Registry, fmt, layer::Layered, layer::SubscriberExt, reload,
    util::SubscriberInitExt,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

pub struct LogConfig {
    pub filter: String,
    pub format: LogFormat,
}

type FilteredRegistry = Layered<reload::Layer<EnvFilter, Registry>, Registry>;
type FormatLayer = Box<dyn Layer<FilteredRegistry> + Send + Sync>;

pub struct Logger {
    filter_handle: reload::Handle<EnvFilter, Registry>,
    format_handle: reload::Handle<FormatLayer, FilteredRegistry>,
}

fn format_layer(format: LogFormat) -> FormatLayer {
    match format {
        LogFormat::Pretty => fmt::layer().pretty().boxed(),
        LogFormat::Json => fmt::layer().json().flatten_event(true).boxed(),
    }
}

impl Logger {
    /// Installs the global subscriber at `info` in the pretty format. Call
    /// once, before settings are known.
    pub fn new_bootstrap() -> Self {
        let filter = EnvFilter::new("info");
        let (filter, filter_handle) = reload::Layer::new(filter);
        let (format, format_handle) = reload::Layer::new(format_layer(LogFormat::Pretty));

        tracing_subscriber::registry()
            .with(filter)
            .with(format)
            .init();

        Self {
            filter_handle,
            format_handle,
        }
    }

    pub fn reload_from_config(&self, config: &LogConfig) -> Result<()> {
        let filter = EnvFilter::try_new(&config.filter).map_err(|e| anyhow!(e))?;
        self.filter_handle.reload(filter).map_err(|e| anyhow!(e))?;
        self.format_handle
            .reload(format_layer(config.format))
            .map_err(|e| anyhow!(e))?;
        Ok(())
    }
}
