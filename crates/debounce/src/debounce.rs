//! Debounced invocation of a wrapped action
//!
//! Every [`Debouncer::submit`] replaces the pending payload and restarts the
//! quiet-period timer. The action runs once the timer elapses without being
//! superseded, always with the payload recorded last.

use crate::config::{check_quiet_period, quiet_period_from_secs_f64, DebounceConfig};
use crate::error::{DebounceError, Result};
use crate::policy::InFlightPolicy;
use parking_lot::Mutex;
use serde::Serialize;
use std::fmt;
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, error, trace};

type Action<A, R> = dyn Fn(A) -> R + Send + Sync + 'static;

/// Counters describing what an invoker has done so far
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DebounceStats {
    /// Calls to `submit`
    pub submitted: u64,
    /// Pending payloads replaced by a newer submission before firing
    pub superseded: u64,
    /// Completed executions of the action
    pub executed: u64,
    /// Executions that panicked
    pub faulted: u64,
    /// Submissions dropped under [`InFlightPolicy::Ignore`]
    pub ignored: u64,
    /// Pending payloads dropped by [`Debouncer::cancel`]
    pub cancelled: u64,
}

/// Wraps an action so bursts of submissions collapse into one deferred call
///
/// Clones share the same pending call, timer and last result.
pub struct Debouncer<A, R> {
    inner: Arc<Inner<A, R>>,
}

struct Inner<A, R> {
    /// Quiet period each submission restarts
    quiet_period: Duration,

    /// Behaviour for submissions during an execution
    policy: InFlightPolicy,

    /// Wrapped action
    action: Arc<Action<A, R>>,

    /// Runtime the timers and executions are spawned on
    runtime: Handle,

    /// Pending call, timer, last result: always read and written together
    state: Mutex<State<A, R>>,

    /// Held for the whole of an execution so two never overlap.
    /// Shared with fire tasks so a queued fire holds no strong ref to `Inner`.
    gate: Arc<tokio::sync::Mutex<()>>,
}

/// Latest submitted payload awaiting its fire
struct PendingCall<A> {
    args: A,
    deadline: Instant,
}

struct State<A, R> {
    pending: Option<PendingCall<A>>,

    /// Timer for the pending call; detached once that fire takes the payload
    timer: Option<JoinHandle<()>>,

    /// Bumped on every submit/cancel; a fire only proceeds if it still matches
    generation: u64,

    in_flight: bool,
    last_result: Option<R>,
    stats: DebounceStats,
}

impl<A, R> State<A, R> {
    fn new() -> Self {
        Self {
            pending: None,
            timer: None,
            generation: 0,
            in_flight: false,
            last_result: None,
            stats: DebounceStats::default(),
        }
    }
}

impl<A, R> Debouncer<A, R>
where
    A: Send + 'static,
    R: Clone + Send + 'static,
{
    /// Create an invoker on the current tokio runtime
    ///
    /// Fails with [`DebounceError::NoRuntime`] outside a runtime.
    pub fn new<F>(quiet_period: Duration, action: F) -> Result<Self>
    where
        F: Fn(A) -> R + Send + Sync + 'static,
    {
        Self::with_policy(quiet_period, InFlightPolicy::default(), action)
    }

    /// Create an invoker on the current tokio runtime with an explicit policy
    pub fn with_policy<F>(quiet_period: Duration, policy: InFlightPolicy, action: F) -> Result<Self>
    where
        F: Fn(A) -> R + Send + Sync + 'static,
    {
        let runtime = Handle::try_current().map_err(|_| DebounceError::NoRuntime)?;
        Self::with_handle(runtime, quiet_period, policy, action)
    }

    /// Create an invoker that schedules on the given runtime
    ///
    /// Use this when submissions come from plain threads. Fails with
    /// [`DebounceError::InvalidArgument`] if the quiet period exceeds
    /// [`MAX_QUIET_PERIOD_MS`](crate::config::MAX_QUIET_PERIOD_MS).
    pub fn with_handle<F>(
        runtime: Handle,
        quiet_period: Duration,
        policy: InFlightPolicy,
        action: F,
    ) -> Result<Self>
    where
        F: Fn(A) -> R + Send + Sync + 'static,
    {
        check_quiet_period(quiet_period)?;
        Ok(Self {
            inner: Arc::new(Inner {
                quiet_period,
                policy,
                action: Arc::new(action),
                runtime,
                state: Mutex::new(State::new()),
                gate: Arc::new(tokio::sync::Mutex::new(())),
            }),
        })
    }

    /// Create an invoker from a quiet period in (possibly negative) seconds
    ///
    /// Negative, NaN and infinite values fail with
    /// [`DebounceError::InvalidArgument`].
    pub fn from_secs_f64<F>(secs: f64, action: F) -> Result<Self>
    where
        F: Fn(A) -> R + Send + Sync + 'static,
    {
        let quiet_period = quiet_period_from_secs_f64(secs)?;
        Self::new(quiet_period, action)
    }

    /// Create an invoker from a validated config
    pub fn from_config<F>(config: &DebounceConfig, action: F) -> Result<Self>
    where
        F: Fn(A) -> R + Send + Sync + 'static,
    {
        config.validate()?;
        Self::with_policy(config.quiet_period(), config.in_flight, action)
    }

    /// Submit a payload, superseding any pending one
    ///
    /// Returns the result of the last *completed* execution, never the
    /// result for this payload. `None` until the action has run once.
    /// Never blocks on the action.
    pub fn submit(&self, args: A) -> Option<R> {
        let inner = &self.inner;
        let mut state = inner.state.lock();
        state.stats.submitted += 1;

        if state.in_flight && inner.policy == InFlightPolicy::Ignore {
            state.stats.ignored += 1;
            debug!("Execution in flight; ignoring submission");
            return state.last_result.clone();
        }

        if state.pending.is_some() {
            state.stats.superseded += 1;
            debug!("Superseding pending call");
        }

        if let Some(timer) = state.timer.take() {
            timer.abort();
        }

        state.generation += 1;
        let generation = state.generation;
        state.pending = Some(PendingCall {
            args,
            deadline: Instant::now() + inner.quiet_period,
        });

        trace!(generation, "Scheduling fire in {:?}", inner.quiet_period);
        let timer = inner
            .runtime
            .spawn(fire(
                Arc::downgrade(inner),
                Arc::clone(&inner.gate),
                generation,
                inner.quiet_period,
            ));
        state.timer = Some(timer);

        state.last_result.clone()
    }
}

impl<A, R> Debouncer<A, R>
where
    R: Clone,
{
    /// Drop the pending call, if any
    ///
    /// Returns true if a call was pending. A running execution is not
    /// affected.
    pub fn cancel(&self) -> bool {
        let mut state = self.inner.state.lock();
        if let Some(timer) = state.timer.take() {
            timer.abort();
        }

        if state.pending.take().is_some() {
            state.generation += 1;
            state.stats.cancelled += 1;
            debug!("Cancelled pending call");
            true
        } else {
            false
        }
    }

    /// Result of the last completed execution
    pub fn last_result(&self) -> Option<R> {
        self.inner.state.lock().last_result.clone()
    }

    /// Whether a call is waiting for its quiet period to elapse
    pub fn is_pending(&self) -> bool {
        self.inner.state.lock().pending.is_some()
    }

    /// Whether the action is executing right now
    pub fn is_in_flight(&self) -> bool {
        self.inner.state.lock().in_flight
    }

    /// When the pending call is due to fire
    pub fn pending_deadline(&self) -> Option<Instant> {
        self.inner
            .state
            .lock()
            .pending
            .as_ref()
            .map(|pending| pending.deadline)
    }

    /// Snapshot of the counters
    pub fn stats(&self) -> DebounceStats {
        self.inner.state.lock().stats
    }

    /// Quiet period each submission restarts
    pub fn quiet_period(&self) -> Duration {
        self.inner.quiet_period
    }

    /// Behaviour for submissions during a running execution
    pub fn policy(&self) -> InFlightPolicy {
        self.inner.policy
    }
}

impl<A, R> Clone for Debouncer<A, R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A, R> fmt::Debug for Debouncer<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("Debouncer")
            .field("quiet_period", &self.inner.quiet_period)
            .field("policy", &self.inner.policy)
            .field("pending", &state.pending.is_some())
            .field("in_flight", &state.in_flight)
            .field("stats", &state.stats)
            .finish()
    }
}

impl<A, R> Drop for Inner<A, R> {
    fn drop(&mut self) {
        // Pending timers only hold a Weak; abort so they don't linger
        if let Some(timer) = self.state.get_mut().timer.take() {
            timer.abort();
        }
    }
}

/// Timer body: wait out the quiet period, then run the latest payload
async fn fire<A, R>(
    inner: Weak<Inner<A, R>>,
    gate: Arc<tokio::sync::Mutex<()>>,
    generation: u64,
    quiet_period: Duration,
) where
    A: Send + 'static,
    R: Clone + Send + 'static,
{
    tokio::time::sleep(quiet_period).await;

    // Wait for the gate holding only a Weak, so dropping every handle while
    // queued behind a running execution still cancels this fire.
    let gate_guard = gate.lock().await;

    let Some(inner) = inner.upgrade() else {
        return;
    };

    // Point of no return: once the payload is taken this fire can no longer
    // be cancelled by a later submit.
    let args = {
        let mut state = inner.state.lock();
        if state.generation != generation {
            trace!(generation, "Fire superseded before start");
            return;
        }
        let Some(pending) = state.pending.take() else {
            return;
        };
        state.timer = None;
        state.in_flight = true;
        pending.args
    };

    let action = Arc::clone(&inner.action);
    let outcome = tokio::task::spawn_blocking(move || action(args)).await;

    let mut state = inner.state.lock();
    state.in_flight = false;
    match outcome {
        Ok(result) => {
            state.stats.executed += 1;
            state.last_result = Some(result);
            trace!(generation, "Debounced action completed");
        }
        Err(e) if e.is_panic() => {
            state.stats.faulted += 1;
            error!("Debounced action panicked: {}", e);
        }
        Err(e) => {
            debug!("Debounced action cancelled: {}", e);
        }
    }

    // Release our strong ref before the gate, so a queued fire never
    // upgrades against handles that have all been dropped.
    drop(state);
    drop(inner);
    drop(gate_guard);
}

/// Shorthand for [`Debouncer::new`]
pub fn debounce<A, R, F>(quiet_period: Duration, action: F) -> Result<Debouncer<A, R>>
where
    A: Send + 'static,
    R: Clone + Send + 'static,
    F: Fn(A) -> R + Send + Sync + 'static,
{
    Debouncer::new(quiet_period, action)
}
