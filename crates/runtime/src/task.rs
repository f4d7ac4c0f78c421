use tokio::sync::watch;

use crate::driver::Driver;
use crate::logging::{RunLogEvent, RunLogEventKind, RunLogWriter};

/// How a cooperative run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Completed,
    Stopped,
}

/// Stop flag shared between a run task and its controller. Send `true` to
/// ask the run to stop after the event it is currently processing.
pub fn stop_channel() -> (watch::Sender<bool>, watch::Receiver<bool>) {
    watch::channel(false)
}

/// Drives the run one event at a time, yielding to the executor between
/// events so a long run never starves other tasks on the same thread.
///
/// The stop flag is checked before each event, so a stop request loses at
/// most the sample that was already being produced. Start, resume, stop and
/// completion all land in the run log.
pub async fn run_cooperatively(
    driver: &mut Driver,
    stop: &watch::Receiver<bool>,
    run_log: &mut dyn RunLogWriter,
) -> RunOutcome {
    let events_at_start = driver.series().len() as u64;
    let start_kind = if events_at_start > 0 {
        RunLogEventKind::RunResumed
    } else {
        RunLogEventKind::RunStarted
    };
    run_log.write(RunLogEvent::new(events_at_start, start_kind));

    loop {
        if *stop.borrow() {
            run_log.write(RunLogEvent::new(
                driver.series().len() as u64,
                RunLogEventKind::RunStopped,
            ));
            return RunOutcome::Stopped;
        }
        if driver.step().is_none() {
            run_log.write(RunLogEvent::new(
                driver.series().len() as u64,
                RunLogEventKind::RunCompleted,
            ));
            return RunOutcome::Completed;
        }
        tokio::task::yield_now().await;
    }
}

#[cfg(test)]
mod tests {
    use core_sim::config::SimConfig;

    use crate::driver::Driver;
    use crate::logging::{InMemoryRunLogWriter, RunLogEventKind};

    use super::{run_cooperatively, stop_channel, RunOutcome};

    fn config(seed: u64) -> SimConfig {
        let mut config = SimConfig::default();
        config.runtime.seed = seed;
        config.runtime.duration_sec = 20.0;
        config
    }

    #[tokio::test(flavor = "current_thread")]
    async fn completed_run_logs_start_and_completion() {
        let mut driver = Driver::new(config(7));
        let (_tx, rx) = stop_channel();
        let mut run_log = InMemoryRunLogWriter::new();

        let outcome = run_cooperatively(&mut driver, &rx, &mut run_log).await;

        assert_eq!(outcome, RunOutcome::Completed);
        assert!(driver.is_finished());
        assert_eq!(run_log.events().len(), 2);
        assert_eq!(run_log.events()[0].kind, RunLogEventKind::RunStarted);
        assert_eq!(run_log.events()[0].events_processed, 0);
        assert_eq!(run_log.events()[1].kind, RunLogEventKind::RunCompleted);
        assert_eq!(
            run_log.events()[1].events_processed,
            driver.series().len() as u64
        );
    }

    #[tokio::test(flavor = "current_thread")]
    async fn pre_set_stop_flag_halts_before_the_first_event() {
        let mut driver = Driver::new(config(7));
        let (tx, rx) = stop_channel();
        tx.send(true).unwrap();
        let mut run_log = InMemoryRunLogWriter::new();

        let outcome = run_cooperatively(&mut driver, &rx, &mut run_log).await;

        assert_eq!(outcome, RunOutcome::Stopped);
        assert!(driver.series().is_empty());
        assert_eq!(run_log.events().len(), 2);
        assert_eq!(run_log.events()[1].kind, RunLogEventKind::RunStopped);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn stopped_run_resumes_as_a_resumed_run() {
        let base = config(7);
        let mut driver = Driver::new(base.clone());
        for _ in 0..3 {
            driver.step().unwrap();
        }
        let mut resumed = Driver::resume(base, driver.into_state());

        let (_tx, rx) = stop_channel();
        let mut run_log = InMemoryRunLogWriter::new();
        let outcome = run_cooperatively(&mut resumed, &rx, &mut run_log).await;

        assert_eq!(outcome, RunOutcome::Completed);
        assert_eq!(run_log.events()[0].kind, RunLogEventKind::RunResumed);
        assert_eq!(run_log.events()[0].events_processed, 3);
    }
}
