//! # Delay Gate Service
//!
//! Async service that wires the domain to the outbound ports and implements
//! [`DelayGateApi`].
//!
//! ## Execution Model
//!
//! The gate state sits behind a single `RwLock`. Every operation reads the
//! clock once, mutates the state under the write lock, then publishes the
//! events the domain recorded.
//!
//! `execute_next` is split in two so the lock is never held across the sink
//! call:
//!
//! 1. `begin_execution` validates the head slot and reserves it
//! 2. the sink runs with no lock held
//! 3. `complete_execution` settles the reservation with the sink outcome
//!
//! While a reservation is outstanding, `execute_next` and `set_read_cursor`
//! fail with `ExecutionInProgress` and `skip_expired` skips nothing. Steps 2
//! and 3 run on a
//! detached task, so dropping the caller's future cannot leave the
//! reservation dangling.

use crate::adapters::{BroadcastEventBus, ManualClock, RecordingSink};
use crate::config::{GateConfig, ServiceConfig};
use crate::domain::entities::{ExecutionTicket, GateSnapshot, ModulePage, ProposedCall, SlotState};
use crate::domain::gate::DelayGate;
use crate::domain::value_objects::{Address, Hash, Timestamp};
use crate::errors::{GateError, SinkError};
use crate::events::EventEnvelope;
use crate::ports::inbound::DelayGateApi;
use crate::ports::outbound::{Clock, EventPublisher, ExecutionSink};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

/// Service statistics.
#[derive(Debug, Default, Clone)]
pub struct ServiceStats {
    /// Calls queued.
    pub proposals: u64,
    /// Calls released to the target.
    pub executions: u64,
    /// Executions the target rejected.
    pub failed_executions: u64,
    /// Slots dropped by `skip_expired`.
    pub skipped: u64,
    /// Requests rejected before reaching the target.
    pub rejected_requests: u64,
}

/// Delay gate service.
pub struct DelayGateService<S, C, P>
where
    S: ExecutionSink,
    C: Clock,
    P: EventPublisher,
{
    config: ServiceConfig,
    state: Arc<RwLock<DelayGate>>,
    sink: Arc<S>,
    clock: Arc<C>,
    publisher: Arc<P>,
    stats: Arc<RwLock<ServiceStats>>,
}

impl<S, C, P> DelayGateService<S, C, P>
where
    S: ExecutionSink + 'static,
    C: Clock + 'static,
    P: EventPublisher + 'static,
{
    /// Initializes a gate from `config` and publishes `GateInitialized`.
    ///
    /// # Errors
    ///
    /// `InvalidOwner`, `ZeroTarget` or `InvalidExpiration`.
    pub fn new(
        config: ServiceConfig,
        sink: Arc<S>,
        clock: Arc<C>,
        publisher: Arc<P>,
    ) -> Result<Self, GateError> {
        let gate_config = &config.gate;
        let mut gate = DelayGate::initialize(
            gate_config.owner,
            gate_config.target,
            gate_config.cooldown_secs,
            gate_config.expiration_secs,
        )?;
        publish_events(&mut gate, publisher.as_ref(), clock.now());

        info!(
            owner = %gate_config.owner,
            target = %gate_config.target,
            cooldown_secs = gate_config.cooldown_secs,
            expiration_secs = gate_config.expiration_secs,
            "Delay gate initialized"
        );

        Ok(Self {
            config,
            state: Arc::new(RwLock::new(gate)),
            sink,
            clock,
            publisher,
            stats: Arc::new(RwLock::new(ServiceStats::default())),
        })
    }

    /// Get the configuration the gate was created with.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Get the execution sink.
    pub fn sink(&self) -> &Arc<S> {
        &self.sink
    }

    /// Get the clock.
    pub fn clock(&self) -> &Arc<C> {
        &self.clock
    }

    /// Get the event publisher.
    pub fn publisher(&self) -> &Arc<P> {
        &self.publisher
    }

    /// Get service statistics.
    pub async fn stats(&self) -> ServiceStats {
        self.stats.read().await.clone()
    }

    /// Slot currently reserved by an outstanding execution.
    pub async fn in_flight(&self) -> Option<u64> {
        self.state.read().await.in_flight()
    }

    /// Runs `op` under the write lock and publishes whatever it emitted.
    async fn mutate<T>(
        &self,
        operation: &'static str,
        op: impl FnOnce(&mut DelayGate, Timestamp) -> Result<T, GateError>,
    ) -> Result<T, GateError> {
        let now = self.clock.now();
        let result = {
            let mut gate = self.state.write().await;
            let result = op(&mut *gate, now);
            publish_events(&mut gate, self.publisher.as_ref(), now);
            metrics::queue_depth(gate.write_cursor() - gate.read_cursor());
            result
        };
        if let Err(ref e) = result {
            self.record_rejection(operation, e).await;
        }
        result
    }

    async fn record_rejection(&self, operation: &'static str, error: &GateError) {
        warn!(operation, error = %error, "Request rejected");
        self.stats.write().await.rejected_requests += 1;
    }
}

/// Drains the domain outbox into the publisher.
fn publish_events<P: EventPublisher + ?Sized>(gate: &mut DelayGate, publisher: &P, now: Timestamp) {
    for event in gate.drain_events() {
        debug!(topic = event.topic(), "Publishing gate event");
        publisher.publish(EventEnvelope::new(event, now));
    }
}

/// Calls the sink and settles the reservation.
///
/// The sink runs on its own task so a panicking sink still releases the slot.
async fn settle_execution<S, P>(
    state: Arc<RwLock<DelayGate>>,
    sink: Arc<S>,
    publisher: Arc<P>,
    ticket: ExecutionTicket,
    target: Address,
    call: ProposedCall,
    now: Timestamp,
) -> Result<u64, GateError>
where
    S: ExecutionSink + 'static,
    P: EventPublisher + 'static,
{
    let outcome = tokio::spawn(async move { sink.call(target, &call).await })
        .await
        .unwrap_or_else(|e| Err(SinkError::Unavailable(format!("sink task aborted: {e}"))));

    let mut gate = state.write().await;
    let result = gate.complete_execution(ticket, outcome);
    publish_events(&mut gate, publisher.as_ref(), now);
    metrics::queue_depth(gate.write_cursor() - gate.read_cursor());
    result
}

#[async_trait]
impl<S, C, P> DelayGateApi for DelayGateService<S, C, P>
where
    S: ExecutionSink + 'static,
    C: Clock + 'static,
    P: EventPublisher + 'static,
{
    #[instrument(skip(self, call), fields(to = %call.to, op = ?call.operation))]
    async fn propose(&self, caller: Address, call: ProposedCall) -> Result<u64, GateError> {
        let index = self
            .mutate("propose", |gate, now| gate.propose(caller, call, now))
            .await?;

        self.stats.write().await.proposals += 1;
        metrics::proposal();
        info!(index, module = %caller, "Call queued");
        Ok(index)
    }

    #[instrument(skip(self, call), fields(to = %call.to))]
    async fn execute_next(&self, call: ProposedCall) -> Result<u64, GateError> {
        let now = self.clock.now();

        let begun = {
            let mut gate = self.state.write().await;
            let target = gate.target();
            gate.begin_execution(&call, now)
                .map(|ticket| (ticket, target))
        };
        let (ticket, target) = match begun {
            Ok(reserved) => reserved,
            Err(e) => {
                metrics::execution("rejected");
                self.record_rejection("execute_next", &e).await;
                return Err(e);
            }
        };
        let index = ticket.index();
        debug!(index, "Slot reserved, forwarding to target");

        let settle = tokio::spawn(settle_execution(
            Arc::clone(&self.state),
            Arc::clone(&self.sink),
            Arc::clone(&self.publisher),
            ticket,
            target,
            call,
            now,
        ));
        let result = settle
            .await
            .map_err(|e| GateError::Internal(format!("execution task failed: {e}")))
            .and_then(|settled| settled);

        match result {
            Ok(index) => {
                self.stats.write().await.executions += 1;
                metrics::execution("success");
                info!(index, %target, "Call executed");
                Ok(index)
            }
            Err(e) => {
                self.stats.write().await.failed_executions += 1;
                metrics::execution("failed");
                warn!(index, %target, error = %e, "Execution failed, slot stays at head");
                Err(e)
            }
        }
    }

    #[instrument(skip(self))]
    async fn skip_expired(&self) -> Result<u64, GateError> {
        let skipped = self
            .mutate("skip_expired", |gate, now| gate.skip_expired(now))
            .await?;

        if skipped > 0 {
            self.stats.write().await.skipped += skipped;
            metrics::skipped(skipped);
            info!(skipped, "Expired slots skipped");
        }
        Ok(skipped)
    }

    #[instrument(skip(self))]
    async fn enable_module(&self, caller: Address, module: Address) -> Result<(), GateError> {
        self.mutate("enable_module", |gate, _| gate.enable_module(caller, module))
            .await?;
        info!(%module, "Module enabled");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn disable_module(
        &self,
        caller: Address,
        prev: Address,
        module: Address,
    ) -> Result<(), GateError> {
        self.mutate("disable_module", |gate, _| {
            gate.disable_module(caller, prev, module)
        })
        .await?;
        info!(%module, "Module disabled");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn set_cooldown(&self, caller: Address, seconds: u64) -> Result<(), GateError> {
        self.mutate("set_cooldown", |gate, _| gate.set_cooldown(caller, seconds))
            .await?;
        info!(seconds, "Cooldown updated");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn set_expiration(&self, caller: Address, seconds: u64) -> Result<(), GateError> {
        self.mutate("set_expiration", |gate, _| {
            gate.set_expiration(caller, seconds)
        })
        .await?;
        info!(seconds, "Expiration updated");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn set_read_cursor(&self, caller: Address, new_cursor: u64) -> Result<(), GateError> {
        self.mutate("set_read_cursor", |gate, _| {
            gate.set_read_cursor(caller, new_cursor)
        })
        .await?;
        info!(new_cursor, "Read cursor moved");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn transfer_ownership(
        &self,
        caller: Address,
        new_owner: Address,
    ) -> Result<(), GateError> {
        self.mutate("transfer_ownership", |gate, _| {
            gate.transfer_ownership(caller, new_owner)
        })
        .await?;
        info!(%new_owner, "Ownership transferred");
        Ok(())
    }

    async fn is_module_enabled(&self, module: Address) -> bool {
        self.state.read().await.is_module_enabled(&module)
    }

    async fn list_modules(
        &self,
        start: Address,
        page_size: usize,
    ) -> Result<ModulePage, GateError> {
        self.state.read().await.list_modules(start, page_size)
    }

    async fn hash_at(&self, index: u64) -> Hash {
        self.state.read().await.hash_at(index)
    }

    async fn created_at(&self, index: u64) -> Timestamp {
        self.state.read().await.created_at(index)
    }

    async fn read_cursor(&self) -> u64 {
        self.state.read().await.read_cursor()
    }

    async fn write_cursor(&self) -> u64 {
        self.state.read().await.write_cursor()
    }

    async fn slot_state(&self, index: u64) -> Option<SlotState> {
        let now = self.clock.now();
        self.state.read().await.slot_state(index, now)
    }

    async fn snapshot(&self) -> GateSnapshot {
        self.state.read().await.snapshot()
    }
}

// =============================================================================
// METRICS
// =============================================================================

#[cfg(feature = "metrics")]
mod metrics {
    use gate_telemetry::metric_inc;
    use gate_telemetry::metrics::{EXECUTIONS_TOTAL, PROPOSALS_TOTAL, QUEUE_DEPTH, SKIPPED_TOTAL};

    pub fn proposal() {
        metric_inc!(PROPOSALS_TOTAL);
    }

    pub fn execution(outcome: &str) {
        metric_inc!(EXECUTIONS_TOTAL, &[outcome]);
    }

    pub fn skipped(count: u64) {
        SKIPPED_TOTAL.inc_by(count);
    }

    pub fn queue_depth(depth: u64) {
        QUEUE_DEPTH.set(i64::try_from(depth).unwrap_or(i64::MAX));
    }
}

#[cfg(not(feature = "metrics"))]
mod metrics {
    pub fn proposal() {}
    pub fn execution(_outcome: &str) {}
    pub fn skipped(_count: u64) {}
    pub fn queue_depth(_depth: u64) {}
}

// =============================================================================
// TEST HELPERS
// =============================================================================

/// Service wired to the in-memory adapters.
pub type InMemoryGateService = DelayGateService<RecordingSink, ManualClock, BroadcastEventBus>;

/// Creates a service over a [`RecordingSink`], a [`ManualClock`] starting at
/// `now` and a [`BroadcastEventBus`] sized by `config.event_capacity`.
///
/// # Errors
///
/// Whatever gate initialization rejects.
pub fn create_in_memory_service(
    config: ServiceConfig,
    now: Timestamp,
) -> Result<InMemoryGateService, GateError> {
    let publisher = Arc::new(BroadcastEventBus::with_capacity(config.event_capacity));
    DelayGateService::new(
        config,
        Arc::new(RecordingSink::new()),
        Arc::new(ManualClock::new(now)),
        publisher,
    )
}

/// [`create_in_memory_service`] with default service settings.
///
/// # Errors
///
/// Whatever gate initialization rejects.
pub fn create_test_service(
    gate: GateConfig,
    now: Timestamp,
) -> Result<InMemoryGateService, GateError> {
    create_in_memory_service(ServiceConfig::for_gate(gate), now)
}

// =============================================================================
// TESTS
// =============================================================================
