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

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::time::{Duration, Instant};

/// Cooperative cancellation flag, cheap to clone across threads.
///
/// Cancellation is one way: once set, the token stays cancelled for the
/// rest of the run.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Why a stage should stop early, if at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunSignal {
    Continue,
    Cancelled,
    BudgetExhausted,
}

/// Cancellation flag plus a shared wall clock deadline.
///
/// Stages poll [`RunControl::checkpoint`] at iteration boundaries and
/// return their best solution so far when told to stop. Cancellation
/// always wins over the budget.
#[derive(Debug, Clone)]
pub struct RunControl {
    cancel: CancelToken,
    deadline: Option<Instant>,
}

impl RunControl {
    #[inline]
    pub fn new(cancel: CancelToken, budget: Option<Duration>) -> Self {
        Self {
            cancel,
            deadline: budget.map(|b| Instant::now() + b),
        }
    }

    /// Control that never stops a stage. Useful for tests and benches.
    #[inline]
    pub fn unbounded() -> Self {
        Self::new(CancelToken::new(), None)
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    #[inline]
    pub fn checkpoint(&self) -> RunSignal {
        if self.cancel.is_cancelled() {
            return RunSignal::Cancelled;
        }
        if self.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            return RunSignal::BudgetExhausted;
        }
        RunSignal::Continue
    }
}
