use std::fs::OpenOptions;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{FormatFields, format::Writer},
    layer::{Context, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::ConvertError;

/// A single log line forwarded to an application [`Logger`].
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub line: String,
    pub level: String,
}

/// Receives the SDK's log stream, e.g. to surface it in the host application.
pub trait Logger: Send + Sync {
    fn log(&self, l: LogEntry);
}

pub(crate) struct GlobalSdkLogger {
    /// Optional external log listener, that can receive a stream of log statements
    pub(crate) log_listener: Option<Box<dyn Logger>>,
}

impl<S> Layer<S> for GlobalSdkLogger
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if event.metadata().level() <= &Level::INFO {
            if let Some(s) = self.log_listener.as_ref() {
                let mut buf = String::new();
                let writer = Writer::new(&mut buf);

                if tracing_subscriber::fmt::format::DefaultFields::new()
                    .format_fields(writer, event)
                    .is_ok()
                {
                    s.log(LogEntry {
                        line: buf,
                        level: event.metadata().level().to_string(),
                    });
                }
            }
        }
    }
}

const DEFAULT_LOG_FILTER: &str = "debug,h2=warn,hyper=warn,hyper_util=warn,reqwest=warn";

pub(crate) fn init_logging(
    log_dir: Option<String>,
    app_logger: Option<Box<dyn Logger>>,
    log_filter: Option<String>,
) -> Result<(), ConvertError> {
    let filter = log_filter.unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

    let file_layer = match log_dir {
        Some(log_dir) => {
            let log_file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(format!("{log_dir}/convert.log"))
                .map_err(|e| ConvertError::Generic(e.to_string()))?;
            Some(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_line_number(true)
                    .with_writer(log_file),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(filter))
        .with(file_layer)
        .with(GlobalSdkLogger {
            log_listener: app_logger,
        })
        .try_init()
        .map_err(|e| ConvertError::Generic(e.to_string()))?;

    Ok(())
}
