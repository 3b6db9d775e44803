// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Jobs and recorders shared by engine tests

use crate::job::{FnJob, Job};
use jx_core::{JobMetadata, JobOutcome, JobParams};
use std::sync::{Arc, Mutex};

/// Ordered log of what happened during a test
#[derive(Clone, Default)]
pub(crate) struct Recorder {
    events: Arc<Mutex<Vec<String>>>,
}

impl Recorder {
    pub(crate) fn push(&self, event: impl Into<String>) {
        self.events.lock().unwrap().push(event.into());
    }

    pub(crate) fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

/// Job that records its name and the params it saw, then succeeds
pub(crate) fn recording_job(metadata: JobMetadata, recorder: &Recorder) -> Arc<dyn Job> {
    let recorder = recorder.clone();
    let name = metadata.name().to_string();
    FnJob::shared(metadata, move |_| {
        let recorder = recorder.clone();
        let name = name.clone();
        async move {
            recorder.push(name);
            Ok(JobOutcome::succeeded())
        }
    })
}

/// Job that records its name and fails with `message`
pub(crate) fn failing_job(name: &str, message: &str, recorder: &Recorder) -> Arc<dyn Job> {
    let recorder = recorder.clone();
    let name = name.to_string();
    let message = message.to_string();
    FnJob::shared(JobMetadata::named(name.clone()), move |_| {
        let recorder = recorder.clone();
        let name = name.clone();
        let message = message.clone();
        async move {
            recorder.push(name);
            Ok(JobOutcome::failed(message))
        }
    })
}

/// Job that hands the params it was called with to `seen`
pub(crate) fn params_job(metadata: JobMetadata, seen: Arc<Mutex<Vec<JobParams>>>) -> Arc<dyn Job> {
    FnJob::shared(metadata, move |params: JobParams| {
        let seen = Arc::clone(&seen);
        async move {
            seen.lock().unwrap().push(params);
            Ok(JobOutcome::succeeded())
        }
    })
}
