//! Headless daily runs.
//!
//! The scheduler sleeps until the configured local wall-clock time, runs the
//! pipeline once, and goes back to sleep. Nothing carries over between runs
//! except what the store holds.

use crate::config::ScraperConfig;
use crate::fetch::PageFetcher;
use crate::pipeline::run_once;
use crate::store::ArticleStore;
use chrono::{DateTime, Duration, Local, NaiveDateTime, NaiveTime, TimeZone};
use std::error::Error;
use tokio::time::sleep;
use tracing::{debug, error, info, instrument};

/// The first occurrence of `at` strictly after `now`.
///
/// Local times skipped by a DST jump resolve to the following day's run.
pub fn next_run_after(now: DateTime<Local>, at: NaiveTime) -> DateTime<Local> {
    let mut day = now.date_naive();
    loop {
        let candidate = NaiveDateTime::new(day, at);
        if let Some(when) = Local.from_local_datetime(&candidate).earliest() {
            if when > now {
                return when;
            }
        }
        day = day + Duration::days(1);
    }
}

/// Time left until `next`, or `None` once `now` has reached it.
pub fn remaining_wait(now: DateTime<Local>, next: DateTime<Local>) -> Option<std::time::Duration> {
    (next - now).to_std().ok().filter(|d| !d.is_zero())
}

/// Run the pipeline every day at `config.schedule_at`, forever.
///
/// A failed run is logged and the loop waits for the next day.
#[instrument(level = "info", skip_all, fields(at = %config.schedule_at))]
pub async fn run_daily<F, S>(config: &ScraperConfig, fetcher: &F, store: &S) -> Result<(), Box<dyn Error>>
where
    F: PageFetcher,
    S: ArticleStore,
{
    let at = config.schedule_time()?;
    info!("Scheduler active; waiting for the next run");

    loop {
        let next = next_run_after(Local::now(), at);
        info!(next = %next.to_rfc3339(), "Sleeping until next run");
        // The wall clock can step backwards during a sleep; wait again until it
        // actually reaches `next`.
        while let Some(wait) = remaining_wait(Local::now(), next) {
            debug!(wait_secs = wait.as_secs(), "Waiting for next run");
            sleep(wait).await;
        }

        info!("Starting scheduled run");
        match run_once(config, fetcher, store).await {
            Ok(summary) => info!(
                discovered = summary.discovered,
                inserted = summary.persisted.inserted_count(),
                save_failed = summary.persisted.is_failed(),
                stored = summary.report.total_articles,
                "Scheduled run finished"
            ),
            Err(e) => error!(error = %e, "Scheduled run failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Local> {
        Local
            .from_local_datetime(&NaiveDateTime::new(
                chrono::NaiveDate::from_ymd_opt(y, m, d).unwrap(),
                NaiveTime::from_hms_opt(h, min, 0).unwrap(),
            ))
            .earliest()
            .unwrap()
    }

    #[test]
    fn test_next_run_later_today() {
        let now = local(2024, 6, 10, 5, 0);
        let at = NaiveTime::from_hms_opt(6, 0, 0).unwrap();
        assert_eq!(next_run_after(now, at), local(2024, 6, 10, 6, 0));
    }

    #[test]
    fn test_next_run_tomorrow_when_passed() {
        let now = local(2024, 6, 10, 7, 0);
        let at = NaiveTime::from_hms_opt(6, 0, 0).unwrap();
        assert_eq!(next_run_after(now, at), local(2024, 6, 11, 6, 0));
    }

    #[test]
    fn test_next_run_exactly_now_is_tomorrow() {
        let now = local(2024, 6, 10, 6, 0);
        let at = NaiveTime::from_hms_opt(6, 0, 0).unwrap();
        assert_eq!(next_run_after(now, at), local(2024, 6, 11, 6, 0));
    }

    #[test]
    fn test_remaining_wait_until_due() {
        let next = local(2024, 6, 10, 6, 0);
        assert_eq!(
            remaining_wait(local(2024, 6, 10, 5, 30), next),
            Some(std::time::Duration::from_secs(30 * 60))
        );
        assert_eq!(remaining_wait(next, next), None);
        assert_eq!(remaining_wait(local(2024, 6, 10, 6, 1), next), None);
    }

    #[test]
    fn test_early_wakeup_keeps_same_slot() {
        // Woken a minute early: still waiting for today's run, not tomorrow's.
        let at = NaiveTime::from_hms_opt(6, 0, 0).unwrap();
        let next = local(2024, 6, 10, 6, 0);
        let early = local(2024, 6, 10, 5, 59);
        assert!(remaining_wait(early, next).is_some());
        assert_eq!(next_run_after(early, at), next);
    }

    #[test]
    fn test_next_run_crosses_month() {
        let now = local(2024, 6, 30, 23, 0);
        let at = NaiveTime::from_hms_opt(6, 0, 0).unwrap();
        assert_eq!(next_run_after(now, at), local(2024, 7, 1, 6, 0));
    }
}
