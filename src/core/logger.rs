use flexi_logger::{
    filter::{self, LogLineFilter},
    Age, Cleanup, Criterion, Duplicate, FileSpec, FlexiLoggerError, Logger, LoggerHandle, Naming,
    WriteMode,
};

use crate::core::{
    configuration::LogConfiguration,
    echo::StdoutEcho,
    filter::{RecordFilter, SuppressionRule},
};

/// Bridges [`RecordFilter`] into the flexi_logger pipeline.
///
/// The record's origin is taken from its own metadata, module path first
/// and then target, rather than from any stack introspection. Parameters
/// are the record's key-value pairs, collected in emission order.
pub struct SuppressionLineFilter {
    filter: RecordFilter<StdoutEcho>,
}

impl SuppressionLineFilter {
    pub fn new(rule: SuppressionRule) -> Self {
        Self {
            filter: RecordFilter::new(rule, StdoutEcho),
        }
    }
}

impl LogLineFilter for SuppressionLineFilter {
    fn write(
        &self,
        now: &mut flexi_logger::DeferredNow,
        record: &log::Record,
        log_line_writer: &dyn filter::LogLineWriter,
    ) -> std::io::Result<()> {
        let message = record.args().to_string();
        let origins = [record.module_path().unwrap_or_default(), record.target()];

        if self
            .filter
            .should_log(Some(&message), origins, || collect_parameters(record))
        {
            return log_line_writer.write(now, record);
        }

        Ok(())
    }
}

struct ParameterCollector {
    values: Vec<String>,
}

impl<'kvs> log::kv::VisitSource<'kvs> for ParameterCollector {
    fn visit_pair(
        &mut self,
        _key: log::kv::Key<'kvs>,
        value: log::kv::Value<'kvs>,
    ) -> Result<(), log::kv::Error> {
        self.values.push(value.to_string());
        Ok(())
    }
}

fn collect_parameters(record: &log::Record) -> Vec<String> {
    let mut collector = ParameterCollector { values: vec![] };

    // a source refusing a visit only costs the echo, never the decision
    let _ = record.key_values().visit(&mut collector);

    collector.values
}

/// Builds the logging pipeline and registers the given filter on it.
///
/// The filter instance is constructed by the caller and passed in, nothing
/// here reaches for process-wide state besides the `log` facade itself.
/// An explicit `verbosity` takes precedence over the configured level.
pub fn install(
    conf: &LogConfiguration,
    verbosity: Option<log::LevelFilter>,
    line_filter: SuppressionLineFilter,
) -> Result<LoggerHandle, FlexiLoggerError> {
    let level = match verbosity {
        Some(v) => v.to_string(),
        None => conf.level.to_owned().unwrap_or_else(|| "info".to_string()),
    };

    let mut logger = Logger::try_with_str(level)?.filter(Box::new(line_filter));

    if let Some(directory) = &conf.directory {
        logger = logger
            .log_to_file(FileSpec::default().directory(directory))
            .rotate(
                Criterion::Age(Age::Day),
                Naming::Timestamps,
                Cleanup::KeepLogFiles(conf.retention.unwrap_or(31)),
            )
            .duplicate_to_stderr(Duplicate::All)
            .write_mode(WriteMode::Async);
    }

    logger.start()
}
