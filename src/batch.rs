use crate::config::FailureMode;
use crate::document::DocumentAccessor;
use crate::error::{BatchError, ScrapeError};
use crate::extract::scrape;
use crate::recipe::Recipe;
use futures::{StreamExt, future, stream};
use serde::Serialize;
use std::cell::Cell;
use std::io;

/// Outcome of one target, in the shape it is written out
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ScrapeReport {
    Scraped(Recipe),
    Failed(FailedTarget),
}

/// A target that could not be scraped, recorded in isolated mode
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct FailedTarget {
    pub source: String,
    pub error: String,
}

impl ScrapeReport {
    fn failed(target: &str, error: &ScrapeError) -> Self {
        Self::Failed(FailedTarget {
            source: target.to_string(),
            error: error.to_string(),
        })
    }
}

/// Counts for a completed batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchSummary {
    pub scraped: usize,
    pub failed: usize,
}

/// Scrapes a list of targets and hands each report, in input order, to a sink
pub struct Batch<'a, A> {
    accessor: &'a A,
    concurrency: usize,
    failure_mode: FailureMode,
}

impl<'a, A: DocumentAccessor> Batch<'a, A> {
    pub fn new(accessor: &'a A) -> Self {
        Self {
            accessor,
            concurrency: 1,
            failure_mode: FailureMode::Strict,
        }
    }

    /// Set how many targets may be in flight at once (at least one)
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_failure_mode(mut self, failure_mode: FailureMode) -> Self {
        self.failure_mode = failure_mode;
        self
    }

    /// Run every target through [`scrape`], passing each report to `emit`
    ///
    /// Reports arrive in input order regardless of concurrency. In strict mode
    /// the first failure (in input order) ends the run: no later target is
    /// started, targets already in flight finish and release their documents,
    /// and nothing after the failure is emitted.
    pub async fn run<F>(&self, targets: &[String], mut emit: F) -> Result<BatchSummary, BatchError>
    where
        F: FnMut(&ScrapeReport) -> io::Result<()>,
    {
        ::log::info!(
            "Scraping {} targets ({:?} mode, concurrency {})",
            targets.len(),
            self.failure_mode,
            self.concurrency
        );

        let stop = Cell::new(false);
        let mut summary = BatchSummary::default();
        let mut failure: Option<BatchError> = None;

        let mut results = stream::iter(targets)
            .take_while(|_| future::ready(!stop.get()))
            .map(|target| async move { (target, scrape(self.accessor, target).await) })
            .buffered(self.concurrency);

        while let Some((target, result)) = results.next().await {
            if failure.is_some() {
                ::log::debug!("Discarding result for {} after batch failure", target);
                continue;
            }

            match result {
                Ok(recipe) => {
                    summary.scraped += 1;
                    emit(&ScrapeReport::Scraped(recipe))?;
                }
                Err(e) => match self.failure_mode {
                    FailureMode::Strict => {
                        ::log::error!("Failed to scrape {}: {}", target, e);
                        stop.set(true);
                        failure = Some(BatchError::Scrape {
                            target: target.clone(),
                            source: e,
                        });
                    }
                    FailureMode::Isolated => {
                        ::log::error!("Failed to scrape {}, continuing: {}", target, e);
                        summary.failed += 1;
                        emit(&ScrapeReport::failed(target, &e))?;
                    }
                },
            }
        }

        match failure {
            Some(e) => Err(e),
            None => {
                ::log::info!(
                    "Batch complete: {} scraped, {} failed",
                    summary.scraped,
                    summary.failed
                );
                Ok(summary)
            }
        }
    }
}
