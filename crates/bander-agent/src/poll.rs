//! Poll loop: scan, analyze, render, wait; one cycle at a time.
//!
//! Cadence is the configured scan interval. A failed scan is logged and
//! retried after the (shorter) backoff instead of the full interval. The
//! very first scan is a startup probe: if it fails, the agent exits, since
//! no amount of retrying fixes a missing scanner or a bad snapshot path.

use std::io::Write;
use std::time::Duration;

use bander_core::{Analyzer, ScanReport};
use tokio::sync::watch;

use crate::config::{AgentConfig, OutputFormat};
use crate::report;
use crate::source::{ObservationSource, SourceError};

pub struct Poller {
    /// `None` only while a scan is running on the blocking pool.
    source: Option<Box<dyn ObservationSource>>,
    analyzer: Analyzer,
    config: AgentConfig,
}

impl Poller {
    pub fn new(source: Box<dyn ObservationSource>, analyzer: Analyzer, config: AgentConfig) -> Self {
        Self {
            source: Some(source),
            analyzer,
            config,
        }
    }

    /// Run the source's blocking scan off the async executor.
    async fn scan(&mut self) -> Result<Vec<bander_core::NetworkObservation>, SourceError> {
        let mut source = self
            .source
            .take()
            .ok_or_else(|| SourceError::Task("source lost by a previous scan".into()))?;
        let joined = tokio::task::spawn_blocking(move || {
            let result = source.scan();
            (source, result)
        })
        .await;

        match joined {
            Ok((source, result)) => {
                self.source = Some(source);
                result
            }
            Err(e) => Err(SourceError::Task(e.to_string())),
        }
    }

    /// One scan → analysis cycle.
    pub async fn cycle(&mut self) -> Result<ScanReport, SourceError> {
        let observations = self.scan().await?;
        let report = self.analyzer.analyze(&observations);
        tracing::debug!(
            networks = report.networks.len(),
            discarded = report.discarded,
            "scan cycle complete"
        );
        Ok(report)
    }

    /// `continuous` adds the exit hint under text reports.
    fn emit(&self, report: &ScanReport, out: &mut dyn Write, continuous: bool) -> anyhow::Result<()> {
        let rendered = report::render(
            report,
            self.config.format,
            self.config.region,
            chrono::Local::now(),
        )?;
        writeln!(out, "{rendered}")?;
        if continuous && self.config.format == OutputFormat::Text {
            writeln!(out, "Press Ctrl+C to exit...")?;
        }
        out.flush()?;
        Ok(())
    }

    /// Single cycle, rendered to `out`.
    pub async fn run_once(&mut self, out: &mut dyn Write) -> anyhow::Result<()> {
        let report = self.cycle().await?;
        self.emit(&report, out, false)
    }

    /// Loop until `shutdown` flips to `true`.
    ///
    /// Returns an error only if the startup probe fails.
    pub async fn run(
        mut self,
        out: &mut dyn Write,
        mut shutdown: watch::Receiver<bool>,
    ) -> anyhow::Result<()> {
        let source_name = self.source.as_ref().map_or("unknown", |s| s.name());
        tracing::info!(source = source_name, "probing observation source");
        let first = self.cycle().await?;
        tracing::info!(
            interval_s = self.config.scan_interval.as_secs(),
            "source ready, starting continuous scan"
        );
        self.emit(&first, out, true)?;

        loop {
            if wait_or_shutdown(self.config.scan_interval, &mut shutdown).await {
                break;
            }

            loop {
                match self.cycle().await {
                    Ok(report) => {
                        if let Err(e) = self.emit(&report, out, true) {
                            tracing::warn!(error = %e, "failed to write report");
                        }
                        break;
                    }
                    Err(e) => {
                        tracing::warn!(
                            error = %e,
                            backoff_s = self.config.retry_backoff.as_secs(),
                            "scan failed, retrying"
                        );
                        if wait_or_shutdown(self.config.retry_backoff, &mut shutdown).await {
                            tracing::info!("poll loop stopped");
                            return Ok(());
                        }
                    }
                }
            }
        }

        tracing::info!("poll loop stopped");
        Ok(())
    }
}

/// Sleep for `period`; returns `true` if shutdown was requested meanwhile.
async fn wait_or_shutdown(period: Duration, shutdown: &mut watch::Receiver<bool>) -> bool {
    if *shutdown.borrow() {
        return true;
    }
    tokio::select! {
        _ = tokio::time::sleep(period) => false,
        changed = shutdown.changed() => changed.is_err() || *shutdown.borrow(),
    }
}
