// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::job::FnJob;
use crate::lock::LocalLockHandler;
use crate::metrics::JobMetrics;
use crate::test_support::{recording_job, Recorder};
use jx_core::{JobOutcome, JobStatus, ParamValue};
use std::sync::Mutex;

/// Records when it sees a run start and finish
struct Observing {
    id: i32,
    recorder: Recorder,
}

#[async_trait]
impl JobDecorator for Observing {
    async fn run(
        &self,
        _ctx: &DecorationContext,
        delegate: &dyn Job,
        params: JobParams,
    ) -> JobResult {
        self.recorder.push(format!("start {}", self.id));
        let result = delegate.run(params).await;
        self.recorder.push(format!("finish {}", self.id));
        result
    }
}

fn observing(id: i32, recorder: &Recorder) -> MappedJobDecorator {
    MappedJobDecorator::new(
        Arc::new(Observing {
            id,
            recorder: recorder.clone(),
        }),
        id,
    )
}

fn chain(decorators: Vec<MappedJobDecorator>) -> DecoratorChain {
    DecoratorChain::new(decorators)
}

#[tokio::test]
async fn lower_order_starts_first_and_finishes_last() {
    let recorder = Recorder::default();
    let chain = chain(vec![
        observing(3, &recorder),
        observing(1, &recorder),
        observing(2, &recorder),
    ]);
    let job = chain.decorate(
        recording_job(JobMetadata::named("job"), &recorder),
        None,
        JobParams::new(),
    );

    job.run(JobParams::new()).await.unwrap();
    assert_eq!(
        recorder.events(),
        vec!["start 1", "start 2", "start 3", "job", "finish 3", "finish 2", "finish 1"]
    );
}

#[test]
fn unordered_decorators_sit_innermost() {
    let recorder = Recorder::default();
    let custom = MappedJobDecorator::unordered(Arc::new(Observing {
        id: 0,
        recorder: recorder.clone(),
    }));
    let chain = chain(vec![custom, observing(LOCK_ORDER, &recorder)]);
    assert_eq!(chain.len(), 2);
    assert_eq!(chain.decorators[0].order, LOCK_ORDER);
    assert_eq!(chain.decorators[1].order, DEFAULT_ORDER);
}

#[test]
fn renamer_exposes_alias_and_keeps_lock_name() {
    let chain = chain(vec![MappedJobDecorator::new(Arc::new(JobRenamer), RENAMER_ORDER)]);
    let raw = recording_job(
        JobMetadata::builder("report").lock_name("reports").build(),
        &Recorder::default(),
    );

    let renamed = chain.decorate(Arc::clone(&raw), Some("daily"), JobParams::new());
    assert_eq!(renamed.metadata().name(), "daily");
    assert_eq!(renamed.metadata().lock_name(), "reports");

    let same = chain.decorate(raw, Some("report"), JobParams::new());
    assert_eq!(same.metadata().name(), "report");
}

#[test]
fn inapplicable_decorators_are_not_wrapped() {
    let chain = chain(vec![
        MappedJobDecorator::new(Arc::new(JobRenamer), RENAMER_ORDER),
        MappedJobDecorator::new(Arc::new(ParamsBinder), PARAMS_BINDER_ORDER),
    ]);
    let raw = recording_job(JobMetadata::named("plain"), &Recorder::default());
    let decorated = chain.decorate(Arc::clone(&raw), None, JobParams::new());
    assert!(Arc::ptr_eq(&raw, &decorated));
}

#[tokio::test]
async fn binder_fills_missing_params_and_caller_wins() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let chain = chain(vec![MappedJobDecorator::new(
        Arc::new(ParamsBinder),
        PARAMS_BINDER_ORDER,
    )]);
    let prebind = JobParams::from([
        ("region".to_string(), ParamValue::from("eu")),
        ("limit".to_string(), ParamValue::Long(10)),
    ]);
    let job = chain.decorate(
        crate::test_support::params_job(JobMetadata::named("fetch"), Arc::clone(&seen)),
        None,
        prebind,
    );

    job.run(JobParams::from([("limit".to_string(), ParamValue::Long(99))]))
        .await
        .unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(seen[0].get("region"), Some(&ParamValue::from("eu")));
    assert_eq!(seen[0].get("limit"), Some(&ParamValue::Long(99)));
}

fn guarded(job: Arc<dyn Job>) -> Arc<dyn Job> {
    chain(vec![MappedJobDecorator::new(
        Arc::new(ExceptionHandler),
        EXCEPTION_HANDLER_ORDER,
    )])
    .decorate(job, None, JobParams::new())
}

#[tokio::test]
async fn exception_handler_turns_errors_into_failures() {
    let job = guarded(FnJob::shared(JobMetadata::named("broken"), |_| async {
        let result: JobResult = Err("disk full".into());
        result
    }));
    let outcome = job.run(JobParams::new()).await.unwrap();
    assert_eq!(outcome.status(), JobStatus::Failure);
    assert_eq!(outcome.message(), Some("disk full"));
    assert!(outcome.error().is_some());
}

#[tokio::test]
async fn exception_handler_catches_panics() {
    let job = guarded(FnJob::shared(
        JobMetadata::named("panicky"),
        |params: JobParams| async move {
            if params.is_empty() {
                panic!("boom");
            }
            Ok(JobOutcome::succeeded())
        },
    ));
    let outcome = job.run(JobParams::new()).await.unwrap();
    assert_eq!(outcome, JobOutcome::failed("job panicked: boom"));
}

struct Counting {
    started: Recorder,
    panics: bool,
}

impl JobListener for Counting {
    fn on_started(&self, job: &str, _params: &JobParams) {
        if self.panics {
            panic!("listener broke");
        }
        self.started.push(format!("started {job}"));
    }

    fn on_finished(&self, job: &str, outcome: &JobOutcome) {
        self.started.push(format!("finished {job} {}", outcome.status()));
    }
}

#[tokio::test]
async fn panicking_listener_does_not_stop_others_or_the_job() {
    let recorder = Recorder::default();
    let dispatcher = ListenerDispatcher::new(vec![
        Arc::new(Counting {
            started: recorder.clone(),
            panics: true,
        }),
        Arc::new(Counting {
            started: recorder.clone(),
            panics: false,
        }),
    ]);
    let chain = chain(vec![MappedJobDecorator::new(Arc::new(dispatcher), LISTENER_ORDER)]);
    let job = chain.decorate(
        recording_job(JobMetadata::named("job"), &recorder),
        None,
        JobParams::new(),
    );

    let outcome = job.run(JobParams::new()).await.unwrap();
    assert!(outcome.is_success());
    assert_eq!(
        recorder.events(),
        vec![
            "started job",
            "job",
            "finished job success",
            "finished job success"
        ]
    );
}

#[test]
fn dispatcher_without_listeners_is_skipped() {
    let dispatcher = ListenerDispatcher::new(Vec::new());
    let ctx = DecorationContext::new(JobMetadata::named("job"), None, JobParams::new());
    assert!(!dispatcher.is_applicable(&ctx));
}

#[tokio::test]
async fn logger_feeds_metrics_under_the_exposed_name() {
    let metrics = Arc::new(JobMetrics::new());
    let chain = chain(vec![
        MappedJobDecorator::new(Arc::new(JobRenamer), RENAMER_ORDER),
        MappedJobDecorator::new(
            Arc::new(JobLogger::new(Some(Arc::clone(&metrics) as _))),
            LOGGER_ORDER,
        ),
    ]);
    let job = chain.decorate(
        recording_job(JobMetadata::named("report"), &Recorder::default()),
        Some("daily"),
        JobParams::new(),
    );

    job.run(JobParams::new()).await.unwrap();
    job.run(JobParams::new()).await.unwrap();

    let snapshot = metrics.snapshot("daily").unwrap();
    assert_eq!(snapshot.completed, 2);
    assert_eq!(snapshot.success, 2);
    assert_eq!(snapshot.active, 0);
    assert!(metrics.snapshot("report").is_none());
}

#[tokio::test(start_paused = true)]
async fn logger_closes_the_meter_of_a_dropped_run() {
    let metrics = Arc::new(JobMetrics::new());
    let chain = chain(vec![MappedJobDecorator::new(
        Arc::new(JobLogger::new(Some(Arc::clone(&metrics) as _))),
        LOGGER_ORDER,
    )]);
    let job = chain.decorate(
        FnJob::shared(JobMetadata::named("hang"), |_| async {
            std::future::pending::<()>().await;
            Ok(JobOutcome::succeeded())
        }),
        None,
        JobParams::new(),
    );

    let run = tokio::time::timeout(std::time::Duration::from_secs(1), job.run(JobParams::new()));
    assert!(run.await.is_err());

    let snapshot = metrics.snapshot("hang").unwrap();
    assert_eq!((snapshot.active, snapshot.completed, snapshot.failure), (0, 1, 1));
}

#[tokio::test]
async fn lock_is_held_during_the_run_and_released_after() {
    let handler = Arc::new(LocalLockHandler::new());
    let chain = chain(vec![MappedJobDecorator::new(
        Arc::new(LockDecorator::new(Arc::clone(&handler) as _)),
        LOCK_ORDER,
    )]);
    let inner_handler = Arc::clone(&handler);
    let job = chain.decorate(
        FnJob::shared(
            JobMetadata::builder("nested").lock_name("shared").build(),
            move |_| {
                let locked = inner_handler.is_locked("shared");
                async move { Ok(JobOutcome::new(JobStatus::Success, Some(locked.to_string()))) }
            },
        ),
        None,
        JobParams::new(),
    );

    let outcome = job.run(JobParams::new()).await.unwrap();
    assert_eq!(outcome.message(), Some("true"));
    assert!(!handler.is_locked("shared"));
}
