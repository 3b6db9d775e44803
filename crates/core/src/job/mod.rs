// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job descriptions, parameters and outcomes

mod metadata;
mod outcome;
mod param;

pub use metadata::{JobMetadata, JobMetadataBuilder};
pub use outcome::{JobError, JobOutcome, JobStatus};
pub use param::{JobParams, ParamError, ParamType, ParamValue, ParameterMetadata};
