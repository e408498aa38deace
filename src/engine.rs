//! Audit orchestration: baseline → concurrent fetch-and-compare → ordered report.

use crate::baseline::{self, AuditRecord};
use crate::compare::TagComparator;
use crate::config::{AuditConfig, FailurePolicy};
use crate::error::{AuditError, RecordFailure, Result};
use crate::fetchers::{Fetcher, PageFetcher};
use crate::format::ReportFormatter;
use crate::notify::{self, SlackNotifier};
use crate::parsers;
use crate::results::{AuditEntry, AuditReport, ComparisonResult};
use crate::utils::localized_timestamp;
use std::future::{Future, pending};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Outcome of one record, tagged with the URL it was produced for
type RecordOutcome = (String, Result<ComparisonResult>);

/// Runs audits over baseline tables.
///
/// The fetcher is the only state shared between per-record tasks and is
/// used read-only.
pub struct AuditEngine<F = Fetcher> {
    config: AuditConfig,
    fetcher: Arc<F>,
    comparator: TagComparator,
    notifier: Option<SlackNotifier>,
}

impl AuditEngine<Fetcher> {
    /// Builds an engine with the fetch backend the configuration selects
    pub fn new(config: AuditConfig) -> Result<Self> {
        config.validate()?;
        let fetcher = Fetcher::from_config(&config)?;
        Self::with_fetcher(config, fetcher)
    }
}

impl<F: PageFetcher + 'static> AuditEngine<F> {
    /// Builds an engine around `fetcher`; fails when the configuration is invalid
    pub fn with_fetcher(config: AuditConfig, fetcher: F) -> Result<Self> {
        config.validate()?;

        let notifier = config
            .webhook()
            .map(|url| SlackNotifier::new(url, config.request_timeout()));
        if notifier.is_none() {
            ::log::warn!("No webhook configured, notifications are disabled");
        }

        Ok(Self {
            comparator: TagComparator::new(config.absent_tag),
            config,
            fetcher: Arc::new(fetcher),
            notifier,
        })
    }

    pub fn config(&self) -> &AuditConfig {
        &self.config
    }

    /// Audits every page in `raw_table`
    pub async fn run(&self, raw_table: &[u8]) -> Result<AuditReport> {
        self.run_until(raw_table, pending::<()>()).await
    }

    /// Audits the baseline stored at the configured default location
    pub async fn run_default_source(&self) -> Result<AuditReport> {
        self.run_default_source_until(pending::<()>()).await
    }

    /// [`run_default_source`](Self::run_default_source) with the same
    /// cancellation contract as [`run_until`](Self::run_until)
    pub async fn run_default_source_until<C>(&self, cancel: C) -> Result<AuditReport>
    where
        C: Future<Output = ()>,
    {
        match self.read_default_source().await {
            Ok(raw_table) => self.run_until(&raw_table, cancel).await,
            Err(e) => {
                let outcome: Result<AuditReport> = Err(e);
                self.notify(&outcome).await;
                outcome
            }
        }
    }

    /// Audits every page in `raw_table`; when `cancel` resolves or the
    /// configured run deadline passes first, all outstanding fetches are
    /// dropped and the run fails with [`AuditError::Cancelled`].
    ///
    /// A notification is attempted whatever the outcome.
    pub async fn run_until<C>(&self, raw_table: &[u8], cancel: C) -> Result<AuditReport>
    where
        C: Future<Output = ()>,
    {
        let outcome = self.audit(raw_table, cancel).await;
        self.notify(&outcome).await;
        outcome
    }

    async fn read_default_source(&self) -> Result<Vec<u8>> {
        let path = self
            .config
            .default_baseline_path
            .as_ref()
            .ok_or_else(|| AuditError::Config("no default baseline path configured".to_string()))?;

        ::log::info!("Loading default baseline from {}", path.display());
        Ok(tokio::fs::read(path).await?)
    }

    async fn audit<C>(&self, raw_table: &[u8], cancel: C) -> Result<AuditReport>
    where
        C: Future<Output = ()>,
    {
        let records: Vec<AuditRecord> = baseline::parse(raw_table)?
            .into_iter()
            .filter(AuditRecord::has_url)
            .collect();

        ::log::info!(
            "Auditing {} pages with up to {} concurrent fetches",
            records.len(),
            self.config.max_concurrency
        );
        let start = Instant::now();

        let run_timeout = self.config.run_timeout();
        let deadline = async {
            match run_timeout {
                Some(timeout) => tokio::time::sleep(timeout).await,
                None => pending::<()>().await,
            }
        };

        let outcomes = tokio::select! {
            outcomes = self.audit_records(records) => outcomes,
            _ = cancel => {
                ::log::warn!("Audit cancelled before all pages finished");
                return Err(AuditError::Cancelled);
            }
            _ = deadline => {
                ::log::warn!("Audit deadline of {:?} passed before all pages finished", run_timeout);
                return Err(AuditError::Cancelled);
            }
        };

        let report = self.assemble(outcomes)?;
        ::log::info!(
            "Audit complete - {} pages, {} matched, {} mismatched, {} failed in {:.2} seconds",
            report.summary.total,
            report.summary.matched,
            report.summary.mismatched,
            report.summary.failed,
            start.elapsed().as_secs_f64()
        );
        Ok(report)
    }

    /// Spawns one task per record and waits for all of them. Results are
    /// slotted back by input index, so completion order never leaks into
    /// the report.
    async fn audit_records(&self, records: Vec<AuditRecord>) -> Vec<RecordOutcome> {
        let permits = Arc::new(Semaphore::new(self.config.max_concurrency));
        let mut tasks = JoinSet::new();
        let mut urls = Vec::with_capacity(records.len());

        for (index, record) in records.into_iter().enumerate() {
            urls.push(record.url.clone());

            let fetcher = Arc::clone(&self.fetcher);
            let permits = Arc::clone(&permits);
            let comparator = self.comparator;
            let utc_offset_hours = self.config.utc_offset_hours;

            tasks.spawn(async move {
                let outcome =
                    audit_record(&*fetcher, &permits, comparator, utc_offset_hours, &record)
                        .await;
                (index, outcome)
            });
        }

        let mut slots: Vec<Option<Result<ComparisonResult>>> =
            std::iter::repeat_with(|| None).take(urls.len()).collect();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, outcome)) => slots[index] = Some(outcome),
                Err(e) => ::log::error!("Audit task did not complete: {}", e),
            }
        }

        urls.into_iter()
            .zip(slots)
            .map(|(url, slot)| {
                let outcome =
                    slot.unwrap_or_else(|| Err(AuditError::fetch(&url, "audit task aborted")));
                (url, outcome)
            })
            .collect()
    }

    fn assemble(&self, outcomes: Vec<RecordOutcome>) -> Result<AuditReport> {
        let mut entries = Vec::with_capacity(outcomes.len());
        let mut failures = Vec::new();

        for (url, outcome) in outcomes {
            match outcome {
                Ok(result) => entries.push(AuditEntry::Compared(result)),
                Err(e) => {
                    ::log::error!("Audit of {} failed: {}", url, e);
                    let message = failure_message(e);
                    entries.push(AuditEntry::failed(&url, &message));
                    failures.push(RecordFailure { url, message });
                }
            }
        }

        if self.config.failure_policy == FailurePolicy::FailFast && !failures.is_empty() {
            return Err(AuditError::Batch { failures });
        }
        Ok(AuditReport::new(entries))
    }

    async fn notify(&self, outcome: &Result<AuditReport>) {
        let message = match outcome {
            Ok(report) => ReportFormatter::format_report(report),
            Err(e) => ReportFormatter::format_error(e),
        };
        notify::deliver(self.notifier.as_ref(), &message).await;
    }
}

/// Fetches one page under a concurrency permit and compares it with its record
async fn audit_record<F: PageFetcher>(
    fetcher: &F,
    permits: &Semaphore,
    comparator: TagComparator,
    utc_offset_hours: i32,
    record: &AuditRecord,
) -> Result<ComparisonResult> {
    let _permit = permits
        .acquire()
        .await
        .map_err(|_| AuditError::Cancelled)?;

    let start = Instant::now();
    ::log::debug!("Fetching {}", record.url);
    let page = fetcher.fetch(&record.url).await?;
    ::log::debug!(
        "Fetched {} in {:.2} seconds",
        record.url,
        start.elapsed().as_secs_f64()
    );

    let observed = parsers::extract(&page.html);
    let timestamp = localized_timestamp(page.fetched_at, utc_offset_hours);
    Ok(comparator.compare(record, &observed, timestamp))
}

/// Fetch errors already carry their URL in the entry; keep only the cause
fn failure_message(error: AuditError) -> String {
    match error {
        AuditError::Fetch { message, .. } => message,
        other => other.to_string(),
    }
}
