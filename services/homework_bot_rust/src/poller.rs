//! Poll loop
//!
//! One tick = fetch -> validate -> translate each record -> notify. Errors end
//! the tick early, leave the query window where it was, and are reported to
//! the chat at most once per distinct message. A failed delivery does not end
//! the tick but also keeps the window in place.

use homework_core::{translate, BotError, BotResult, HomeworkSource, PollState, Translation};
use log::{debug, error, info};
use std::time::Duration;

use crate::telegram_client::Notifier;

pub const FAILURE_PREFIX: &str = "Сбой в работе программы";

/// Counters for a tick that ran to the end.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickSummary {
    pub sent: usize,
    pub unchanged: usize,
    pub delivery_failures: usize,
}

#[derive(Debug)]
pub enum TickOutcome {
    Completed(TickSummary),
    Failed {
        error: BotError,
        /// Whether a failure notification went out for this tick
        reported: bool,
    },
}

pub fn failure_message(error: &BotError) -> String {
    format!("{}: {}", FAILURE_PREFIX, error)
}

pub struct HomeworkPoller<S, N> {
    source: S,
    notifier: N,
    retry_period: Duration,
    state: PollState,
}

impl<S, N> HomeworkPoller<S, N>
where
    S: HomeworkSource,
    N: Notifier,
{
    pub fn new(source: S, notifier: N, retry_period: Duration, start_timestamp: i64) -> Self {
        Self {
            source,
            notifier,
            retry_period,
            state: PollState::starting_at(start_timestamp),
        }
    }

    pub fn state(&self) -> &PollState {
        &self.state
    }

    /// Tick forever, sleeping `retry_period` after every tick.
    pub async fn run(&mut self) {
        info!(
            "Polling {} every {}s starting from {}",
            self.source.source_name(),
            self.retry_period.as_secs(),
            self.state.last_timestamp
        );
        loop {
            match self.tick().await {
                TickOutcome::Completed(summary) => debug!(
                    "Tick done: sent={} unchanged={} delivery_failures={} next from_date={}",
                    summary.sent, summary.unchanged, summary.delivery_failures, self.state.last_timestamp
                ),
                TickOutcome::Failed { reported, .. } => debug!(
                    "Tick failed (reported={}), retrying from_date={}",
                    reported, self.state.last_timestamp
                ),
            }
            tokio::time::sleep(self.retry_period).await;
        }
    }

    pub async fn tick(&mut self) -> TickOutcome {
        match self.poll_once().await {
            Ok(summary) => {
                if summary.delivery_failures == 0 {
                    self.state.last_error_message = None;
                }
                TickOutcome::Completed(summary)
            }
            Err(error) => {
                let reported = self.report_failure(&error).await;
                TickOutcome::Failed { error, reported }
            }
        }
    }

    async fn poll_once(&mut self) -> BotResult<TickSummary> {
        let result = self.source.fetch(self.state.last_timestamp).await?;

        if result.homeworks.is_empty() {
            debug!(
                "No homework status changes since {}",
                self.state.last_timestamp
            );
        }

        let mut summary = TickSummary::default();
        for record in &result.homeworks {
            let prior = self.state.prior_message(record.name.as_deref());
            let translation = translate(record, prior)?;
            match translation {
                Translation::NoChange => {
                    debug!("Status unchanged for {:?}", record.name);
                    summary.unchanged += 1;
                }
                Translation::Notification(message) => match self.notifier.notify(&message).await {
                    Ok(()) => {
                        info!("Sent status notification: {}", message);
                        if let Some(name) = &record.name {
                            self.state.last_notified.insert(name.clone(), message);
                        }
                        summary.sent += 1;
                    }
                    Err(e) => {
                        error!("Failed to send status notification: {}", e);
                        summary.delivery_failures += 1;
                    }
                },
            }
        }

        // Undelivered verdicts must be fetched again, so the window stays put
        if summary.delivery_failures > 0 {
            debug!(
                "{} notification(s) undelivered, keeping from_date={}",
                summary.delivery_failures, self.state.last_timestamp
            );
        } else {
            self.state.advance_to(result.current_date);
        }
        Ok(summary)
    }

    /// Log the failure and send it to the chat unless it repeats the last one.
    async fn report_failure(&mut self, error: &BotError) -> bool {
        let message = failure_message(error);
        error!("{}", message);

        if self.state.last_error_message.as_deref() == Some(message.as_str()) {
            debug!("Same failure already reported, not re-sending");
            return false;
        }

        match self.notifier.notify(&message).await {
            Ok(()) => {
                self.state.last_error_message = Some(message);
                true
            }
            Err(e) => {
                error!("Failed to report failure to chat: {}", e);
                false
            }
        }
    }
}
