//! Background analysis jobs.
//!
//! Each application gets at most one live job. A job waits out the configured
//! processing delay, then runs its work future (score + persist). The wait is the
//! only cancellable part: cancelling drops the work future unpolled, so nothing is
//! scored or written. Scheduling again for the same application supersedes the
//! previous job.
//!
//! Finished and cancelled jobs stay visible only for the most recent
//! `retained` of them; older ones are evicted. The persisted `ai_*` columns are
//! the durable record of a completed analysis.

use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::Serialize;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::scoring::{ScoreResult, TriageStatus};

/// Terminal job states kept around for polling before eviction.
pub const DEFAULT_RETAINED_JOBS: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum JobState {
    Waiting,
    Running,
    Completed { score: u32, status: TriageStatus },
    Failed { error: String },
    Cancelled,
}

impl JobState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, JobState::Waiting | JobState::Running)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum CancelOutcome {
    Cancelled,
    NotWaiting(JobState),
    Unknown,
}

struct JobSlot {
    ticket: u64,
    state: JobState,
    cancel: Option<oneshot::Sender<()>>,
}

struct Registry {
    next_ticket: u64,
    slots: HashMap<Uuid, JobSlot>,
    /// Terminal jobs in the order they ended. May hold stale tickets for
    /// superseded jobs; those are skipped on eviction.
    finished: VecDeque<(Uuid, u64)>,
    retained: usize,
}

impl Registry {
    fn record_terminal(&mut self, application_id: Uuid, ticket: u64) {
        self.finished.push_back((application_id, ticket));
        while self.finished.len() > self.retained {
            let Some((id, ticket)) = self.finished.pop_front() else {
                break;
            };
            let evict = self
                .slots
                .get(&id)
                .is_some_and(|slot| slot.ticket == ticket && slot.state.is_terminal());
            if evict {
                self.slots.remove(&id);
            }
        }
    }
}

#[derive(Clone)]
pub struct AnalysisJobs {
    inner: Arc<Mutex<Registry>>,
}

impl Default for AnalysisJobs {
    fn default() -> Self {
        Self::with_retention(DEFAULT_RETAINED_JOBS)
    }
}

impl AnalysisJobs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_retention(retained: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Registry {
                next_ticket: 0,
                slots: HashMap::new(),
                finished: VecDeque::new(),
                retained,
            })),
        }
    }

    /// Spawns a job that sleeps for `delay`, then awaits `work`.
    pub fn schedule<F>(&self, application_id: Uuid, delay: Duration, work: F) -> JoinHandle<()>
    where
        F: Future<Output = Result<ScoreResult, AppError>> + Send + 'static,
    {
        let (cancel_tx, cancel_rx) = oneshot::channel();

        let ticket = {
            let mut registry = self.lock();
            registry.next_ticket += 1;
            let ticket = registry.next_ticket;
            let previous = registry.slots.insert(
                application_id,
                JobSlot {
                    ticket,
                    state: JobState::Waiting,
                    cancel: Some(cancel_tx),
                },
            );
            if let Some(prev) = previous {
                debug!(
                    "Analysis for {application_id} superseded (previous state {:?})",
                    prev.state
                );
            }
            ticket
        };

        debug!("Analysis for {application_id} scheduled in {}ms", delay.as_millis());

        let jobs = self.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                // Fires on explicit cancel and when a newer job drops our sender.
                _ = cancel_rx => {
                    debug!("Analysis for {application_id} stopped during wait");
                    return;
                }
            }

            if !jobs.begin(application_id, ticket) {
                return;
            }

            match work.await {
                Ok(result) => {
                    info!(
                        "Analysis for {application_id} completed: score {} ({})",
                        result.score,
                        result.status.as_str()
                    );
                    jobs.finish(
                        application_id,
                        ticket,
                        JobState::Completed {
                            score: result.score,
                            status: result.status,
                        },
                    );
                }
                Err(e) => {
                    error!("Analysis for {application_id} failed: {e}");
                    jobs.finish(
                        application_id,
                        ticket,
                        JobState::Failed {
                            error: e.to_string(),
                        },
                    );
                }
            }
        })
    }

    /// Cancels a job that is still waiting. Running or finished jobs are left alone.
    pub fn cancel(&self, application_id: Uuid) -> CancelOutcome {
        let mut registry = self.lock();
        let Some(slot) = registry.slots.get_mut(&application_id) else {
            return CancelOutcome::Unknown;
        };
        if slot.state != JobState::Waiting {
            return CancelOutcome::NotWaiting(slot.state.clone());
        }

        slot.state = JobState::Cancelled;
        let ticket = slot.ticket;
        if let Some(cancel) = slot.cancel.take() {
            // Receiver may already be gone if the wait just elapsed; the state
            // change above still stops `begin`.
            let _ = cancel.send(());
        }
        registry.record_terminal(application_id, ticket);
        info!("Analysis for {application_id} cancelled");
        CancelOutcome::Cancelled
    }

    pub fn state(&self, application_id: Uuid) -> Option<JobState> {
        self.lock()
            .slots
            .get(&application_id)
            .map(|slot| slot.state.clone())
    }

    /// Waiting -> Running, only for the current ticket.
    fn begin(&self, application_id: Uuid, ticket: u64) -> bool {
        let mut registry = self.lock();
        match registry.slots.get_mut(&application_id) {
            Some(slot) if slot.ticket == ticket && slot.state == JobState::Waiting => {
                slot.state = JobState::Running;
                slot.cancel = None;
                true
            }
            _ => false,
        }
    }

    fn finish(&self, application_id: Uuid, ticket: u64, state: JobState) {
        let mut registry = self.lock();
        let current = match registry.slots.get_mut(&application_id) {
            Some(slot) if slot.ticket == ticket => {
                slot.state = state;
                true
            }
            _ => false,
        };
        if current {
            registry.record_terminal(application_id, ticket);
        }
    }

    #[cfg(test)]
    fn tracked(&self) -> usize {
        self.lock().slots.len()
    }

    fn lock(&self) -> MutexGuard<'_, Registry> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn result(score: u32, status: TriageStatus) -> ScoreResult {
        ScoreResult {
            score,
            reason: String::new(),
            key_skills: vec![],
            experience_years: 0,
            status,
        }
    }

    fn tracked_work(
        ran: Arc<AtomicBool>,
        score: u32,
    ) -> impl Future<Output = Result<ScoreResult, AppError>> + Send + 'static {
        async move {
            ran.store(true, Ordering::SeqCst);
            Ok(result(score, TriageStatus::Shortlisted))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_job_waits_then_completes() {
        let jobs = AnalysisJobs::new();
        let id = Uuid::new_v4();
        let ran = Arc::new(AtomicBool::new(false));

        let handle = jobs.schedule(id, Duration::from_secs(2), tracked_work(ran.clone(), 80));
        assert_eq!(jobs.state(id), Some(JobState::Waiting));

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(jobs.state(id), Some(JobState::Waiting));
        assert!(!ran.load(Ordering::SeqCst));

        handle.await.unwrap();
        assert!(ran.load(Ordering::SeqCst));
        assert_eq!(
            jobs.state(id),
            Some(JobState::Completed {
                score: 80,
                status: TriageStatus::Shortlisted
            })
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_during_wait_skips_work() {
        let jobs = AnalysisJobs::new();
        let id = Uuid::new_v4();
        let ran = Arc::new(AtomicBool::new(false));

        let handle = jobs.schedule(id, Duration::from_secs(2), tracked_work(ran.clone(), 80));
        assert_eq!(jobs.cancel(id), CancelOutcome::Cancelled);

        handle.await.unwrap();
        assert!(!ran.load(Ordering::SeqCst));
        assert_eq!(jobs.state(id), Some(JobState::Cancelled));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_after_completion_is_rejected() {
        let jobs = AnalysisJobs::new();
        let id = Uuid::new_v4();
        let ran = Arc::new(AtomicBool::new(false));

        jobs.schedule(id, Duration::from_millis(10), tracked_work(ran, 45))
            .await
            .unwrap();

        match jobs.cancel(id) {
            CancelOutcome::NotWaiting(JobState::Completed { score, .. }) => assert_eq!(score, 45),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn test_cancel_unknown_job() {
        let jobs = AnalysisJobs::new();
        assert_eq!(jobs.cancel(Uuid::new_v4()), CancelOutcome::Unknown);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reschedule_supersedes_waiting_job() {
        let jobs = AnalysisJobs::new();
        let id = Uuid::new_v4();
        let first_ran = Arc::new(AtomicBool::new(false));
        let second_ran = Arc::new(AtomicBool::new(false));

        let first = jobs.schedule(id, Duration::from_secs(5), tracked_work(first_ran.clone(), 10));
        let second = jobs.schedule(id, Duration::from_secs(1), tracked_work(second_ran.clone(), 70));

        first.await.unwrap();
        second.await.unwrap();

        assert!(!first_ran.load(Ordering::SeqCst));
        assert!(second_ran.load(Ordering::SeqCst));
        assert_eq!(
            jobs.state(id),
            Some(JobState::Completed {
                score: 70,
                status: TriageStatus::Shortlisted
            })
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_work_is_recorded() {
        let jobs = AnalysisJobs::new();
        let id = Uuid::new_v4();

        jobs.schedule(id, Duration::from_millis(100), async {
            Err::<ScoreResult, _>(AppError::NotFound("application gone".to_string()))
        })
        .await
        .unwrap();

        match jobs.state(id) {
            Some(JobState::Failed { error }) => assert!(error.contains("application gone")),
            other => panic!("unexpected state: {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_finished_jobs_are_evicted_beyond_retention() {
        let jobs = AnalysisJobs::with_retention(3);
        let ids: Vec<Uuid> = (0..10).map(|_| Uuid::new_v4()).collect();

        for (i, id) in ids.iter().enumerate() {
            let ran = Arc::new(AtomicBool::new(false));
            jobs.schedule(*id, Duration::from_millis(10), tracked_work(ran, i as u32))
                .await
                .unwrap();
        }

        assert_eq!(jobs.tracked(), 3);
        assert_eq!(jobs.state(ids[0]), None);
        assert_eq!(jobs.state(ids[6]), None);
        assert!(matches!(
            jobs.state(ids[9]),
            Some(JobState::Completed { score: 9, .. })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_jobs_count_toward_retention() {
        let jobs = AnalysisJobs::with_retention(1);
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();

        let a = jobs.schedule(first, Duration::from_secs(1), tracked_work(Arc::default(), 1));
        let b = jobs.schedule(second, Duration::from_secs(1), tracked_work(Arc::default(), 2));
        assert_eq!(jobs.cancel(first), CancelOutcome::Cancelled);
        assert_eq!(jobs.cancel(second), CancelOutcome::Cancelled);
        a.await.unwrap();
        b.await.unwrap();

        assert_eq!(jobs.tracked(), 1);
        assert_eq!(jobs.state(first), None);
        assert_eq!(jobs.state(second), Some(JobState::Cancelled));
    }

    #[tokio::test(start_paused = true)]
    async fn test_waiting_jobs_are_never_evicted() {
        let jobs = AnalysisJobs::with_retention(1);
        let pending = Uuid::new_v4();
        let pending_handle =
            jobs.schedule(pending, Duration::from_secs(60), tracked_work(Arc::default(), 5));

        for score in 0..4 {
            let done = tracked_work(Arc::default(), score);
            jobs.schedule(Uuid::new_v4(), Duration::from_millis(1), done)
                .await
                .unwrap();
        }

        assert_eq!(jobs.state(pending), Some(JobState::Waiting));
        assert_eq!(jobs.tracked(), 2);
        pending_handle.await.unwrap();
        assert!(matches!(
            jobs.state(pending),
            Some(JobState::Completed { score: 5, .. })
        ));
    }

    #[test]
    fn test_job_state_json_is_tagged() {
        let json = serde_json::to_value(JobState::Completed {
            score: 60,
            status: TriageStatus::Shortlisted,
        })
        .unwrap();
        assert_eq!(json["state"], "completed");
        assert_eq!(json["score"], 60);
        assert_eq!(json["status"], "shortlisted");
    }
}
