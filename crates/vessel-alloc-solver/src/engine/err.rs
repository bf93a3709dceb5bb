// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use crate::engine::pipeline::PipelineState;
use vessel_alloc_model::solution::err::AssignmentError;

/// A second run was requested while one is still in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ConcurrentRunError;

impl std::fmt::Display for ConcurrentRunError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "an optimization run is already in progress")
    }
}

impl std::error::Error for ConcurrentRunError {}

/// A pipeline stage aborted with an assignment error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageFailedError {
    stage: PipelineState,
    source: AssignmentError,
}

impl StageFailedError {
    pub fn new(stage: PipelineState, source: AssignmentError) -> Self {
        Self { stage, source }
    }

    pub fn stage(&self) -> PipelineState {
        self.stage
    }
}

impl std::fmt::Display for StageFailedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "stage {} failed: {}", self.stage, self.source)
    }
}

impl std::error::Error for StageFailedError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// Any way a pipeline run can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineError {
    ConcurrentRun(ConcurrentRunError),
    Stage(StageFailedError),
}

impl std::fmt::Display for PipelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineError::ConcurrentRun(e) => write!(f, "{}", e),
            PipelineError::Stage(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PipelineError::ConcurrentRun(e) => Some(e),
            PipelineError::Stage(e) => Some(e),
        }
    }
}

impl From<ConcurrentRunError> for PipelineError {
    fn from(err: ConcurrentRunError) -> Self {
        PipelineError::ConcurrentRun(err)
    }
}

impl From<StageFailedError> for PipelineError {
    fn from(err: StageFailedError) -> Self {
        PipelineError::Stage(err)
    }
}
