//! # Gate Flows
//!
//! The documented lifecycle scenarios, run through the async service:
//!
//! 1. **Immediate execution**: zero cooldown, zero expiration
//! 2. **Cooldown**: execution blocked until the slot matures
//! 3. **Expiration**: stale slots are skipped, never executed
//! 4. **Registry**: duplicate enable and wrong predecessor
//! 5. **Read cursor override**: bounds on fast-forwarding
//!
//! Events are observed on the broadcast bus to check what executors and
//! indexers would see.

#[cfg(test)]
mod tests {
    use crate::{gate_with_module, sample_call, MODULE, OWNER, STRANGER, TARGET};
    use delay_gate::prelude::*;
    use std::time::Duration;
    use tokio::sync::broadcast::Receiver;
    use tokio::time::timeout;

    async fn next_event(rx: &mut Receiver<EventEnvelope>) -> GateEvent {
        timeout(Duration::from_secs(1), rx.recv())
            .await
            .expect("event within timeout")
            .expect("bus open")
            .event
    }

    // =========================================================================
    // QUEUE LIFECYCLE
    // =========================================================================

    #[tokio::test]
    async fn test_immediate_execution_without_delay() {
        let gate = gate_with_module(0, 0).await;

        let index = gate.propose(MODULE, sample_call(1)).await.unwrap();
        assert_eq!(index, 0);
        assert_eq!(gate.write_cursor().await, 1);

        gate.execute_next(sample_call(1)).await.unwrap();
        assert_eq!(gate.read_cursor().await, 1);
        assert_eq!(gate.sink().calls(), vec![(TARGET, sample_call(1))]);
        assert_eq!(gate.slot_state(0).await, Some(SlotState::Processed));
    }

    #[tokio::test]
    async fn test_cooldown_blocks_until_mature() {
        let gate = gate_with_module(42, 0).await;
        gate.propose(MODULE, sample_call(1)).await.unwrap();

        gate.clock().set(10);
        let err = gate.execute_next(sample_call(1)).await.unwrap_err();
        assert_eq!(
            err,
            GateError::InCooldown {
                index: 0,
                ready_at: 42,
                now: 10
            }
        );
        assert!(gate.sink().calls().is_empty());

        gate.clock().set(42);
        gate.execute_next(sample_call(1)).await.unwrap();
        assert_eq!(gate.read_cursor().await, 1);
    }

    #[tokio::test]
    async fn test_expired_slot_is_skipped_not_executed() {
        let gate = gate_with_module(0, 60).await;
        gate.propose(MODULE, sample_call(1)).await.unwrap();

        gate.clock().set(61);
        assert_eq!(gate.slot_state(0).await, Some(SlotState::Expired));
        let err = gate.execute_next(sample_call(1)).await.unwrap_err();
        assert!(matches!(err, GateError::Expired { index: 0, .. }));

        assert_eq!(gate.skip_expired().await.unwrap(), 1);
        assert_eq!(gate.read_cursor().await, 1);
        assert!(gate.sink().calls().is_empty());

        // Nothing left to skip
        assert_eq!(gate.skip_expired().await.unwrap(), 0);
        assert_eq!(
            gate.execute_next(sample_call(1)).await,
            Err(GateError::QueueEmpty)
        );
    }

    #[tokio::test]
    async fn test_fifo_order_across_modules() {
        let gate = gate_with_module(5, 0).await;
        let second_module = Address::new([0xC1; 20]);
        gate.enable_module(OWNER, second_module).await.unwrap();

        gate.propose(MODULE, sample_call(1)).await.unwrap();
        gate.propose(second_module, sample_call(2)).await.unwrap();
        gate.propose(MODULE, sample_call(3)).await.unwrap();
        gate.clock().set(5);

        // Slot 1 cannot jump the queue
        assert!(matches!(
            gate.execute_next(sample_call(2)).await,
            Err(GateError::HashMismatch { index: 0, .. })
        ));

        for seed in 1..=3 {
            gate.execute_next(sample_call(seed)).await.unwrap();
        }
        let forwarded: Vec<_> = gate.sink().calls().into_iter().map(|(_, c)| c).collect();
        assert_eq!(forwarded, vec![sample_call(1), sample_call(2), sample_call(3)]);
    }

    #[tokio::test]
    async fn test_policy_change_applies_to_queued_slots() {
        let gate = gate_with_module(1_000, 0).await;
        gate.propose(MODULE, sample_call(1)).await.unwrap();

        gate.clock().set(10);
        assert_eq!(gate.slot_state(0).await, Some(SlotState::Pending));

        gate.set_cooldown(OWNER, 10).await.unwrap();
        assert_eq!(gate.slot_state(0).await, Some(SlotState::Executable));
        gate.execute_next(sample_call(1)).await.unwrap();
    }

    #[tokio::test]
    async fn test_query_defaults_beyond_write_cursor() {
        let gate = gate_with_module(0, 0).await;
        gate.clock().set(77);
        gate.propose(MODULE, sample_call(1)).await.unwrap();

        assert_eq!(gate.hash_at(0).await, hash_call(&sample_call(1)));
        assert_eq!(gate.created_at(0).await, 77);
        assert_eq!(gate.hash_at(1).await, Hash::ZERO);
        assert_eq!(gate.created_at(1).await, 0);
        assert_eq!(gate.slot_state(1).await, None);
    }

    // =========================================================================
    // REGISTRY AND OWNER CONTROLS
    // =========================================================================

    #[tokio::test]
    async fn test_registry_rejections() {
        let gate = gate_with_module(0, 0).await;

        assert_eq!(
            gate.enable_module(OWNER, MODULE).await,
            Err(GateError::AlreadyEnabled(MODULE))
        );

        let other = Address::new([0xC1; 20]);
        gate.enable_module(OWNER, other).await.unwrap();
        // List is [other, MODULE]; MODULE's predecessor is `other`
        let err = gate
            .disable_module(OWNER, Address::SENTINEL, MODULE)
            .await
            .unwrap_err();
        assert!(matches!(err, GateError::NotEnabled { .. }));

        gate.disable_module(OWNER, other, MODULE).await.unwrap();
        assert!(!gate.is_module_enabled(MODULE).await);
        assert_eq!(
            gate.propose(MODULE, sample_call(1)).await,
            Err(GateError::Unauthorized { caller: MODULE })
        );
    }

    #[tokio::test]
    async fn test_read_cursor_bounds() {
        let gate = gate_with_module(0, 0).await;
        for seed in 0..3 {
            gate.propose(MODULE, sample_call(seed)).await.unwrap();
        }

        assert!(matches!(
            gate.set_read_cursor(OWNER, 0).await,
            Err(GateError::NonceTooLow { .. })
        ));
        assert!(matches!(
            gate.set_read_cursor(OWNER, 4).await,
            Err(GateError::NonceTooHigh { .. })
        ));
        assert_eq!(
            gate.set_read_cursor(STRANGER, 2).await,
            Err(GateError::Unauthorized { caller: STRANGER })
        );

        gate.set_read_cursor(OWNER, 3).await.unwrap();
        assert_eq!(gate.read_cursor().await, 3);
        assert_eq!(gate.execute_next(sample_call(0)).await, Err(GateError::QueueEmpty));
    }

    #[tokio::test]
    async fn test_paginate_all_modules() {
        let gate = gate_with_module(0, 0).await;
        for byte in 1..=6 {
            gate.enable_module(OWNER, Address::new([byte; 20]))
                .await
                .unwrap();
        }

        let mut seen = Vec::new();
        let mut cursor = Address::SENTINEL;
        loop {
            let page = gate.list_modules(cursor, 3).await.unwrap();
            seen.extend(page.modules.iter().copied());
            if page.is_last() {
                break;
            }
            cursor = page.next;
        }

        assert_eq!(seen.len(), 7);
        // Newest first, the fixture module last
        assert_eq!(seen[0], Address::new([6; 20]));
        assert_eq!(seen[6], MODULE);
    }

    // =========================================================================
    // EVENTS AND SNAPSHOTS
    // =========================================================================

    #[tokio::test]
    async fn test_event_stream_for_full_lifecycle() {
        let gate = gate_with_module(0, 60).await;
        let mut rx = gate.publisher().subscribe();

        gate.propose(MODULE, sample_call(1)).await.unwrap();
        gate.propose(MODULE, sample_call(2)).await.unwrap();
        gate.execute_next(sample_call(1)).await.unwrap();
        gate.clock().set(100);
        gate.skip_expired().await.unwrap();

        match next_event(&mut rx).await {
            GateEvent::TransactionAdded {
                index,
                hash,
                module,
                call,
            } => {
                assert_eq!(index, 0);
                assert_eq!(module, MODULE);
                // Executors rebuild the call from the event
                assert_eq!(hash, hash_call(&call));
                assert_eq!(call, sample_call(1));
            }
            other => panic!("unexpected event {other:?}"),
        }
        assert!(matches!(
            next_event(&mut rx).await,
            GateEvent::TransactionAdded { index: 1, .. }
        ));
        assert!(matches!(
            next_event(&mut rx).await,
            GateEvent::TransactionExecuted { index: 0, .. }
        ));
        assert_eq!(
            next_event(&mut rx).await,
            GateEvent::TransactionsSkipped { from: 1, to: 2 }
        );
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_snapshot_satisfies_invariants() {
        let gate = gate_with_module(3, 60).await;
        for seed in 0..4 {
            gate.propose(MODULE, sample_call(seed)).await.unwrap();
        }
        gate.clock().set(3);
        gate.execute_next(sample_call(0)).await.unwrap();
        gate.transfer_ownership(OWNER, STRANGER).await.unwrap();

        let snapshot = gate.snapshot().await;
        assert_eq!(snapshot.owner, STRANGER);
        assert_eq!(snapshot.read_cursor, 1);
        assert_eq!(snapshot.write_cursor, 4);
        assert!(check_all_invariants(&snapshot).is_ok());
    }

    #[tokio::test]
    async fn test_metrics_track_service_activity() {
        gate_telemetry::register_metrics().unwrap();
        let before = gate_telemetry::PROPOSALS_TOTAL.get();

        let gate = gate_with_module(0, 0).await;
        gate.propose(MODULE, sample_call(1)).await.unwrap();
        gate.execute_next(sample_call(1)).await.unwrap();

        assert!(gate_telemetry::PROPOSALS_TOTAL.get() > before);
        assert!(
            gate_telemetry::EXECUTIONS_TOTAL
                .with_label_values(&["success"])
                .get()
                >= 1
        );
        let text = gate_telemetry::encode_metrics().unwrap();
        assert!(text.contains("dg_executions_total"));
    }

    #[test]
    fn test_telemetry_installs_once() {
        let config = gate_telemetry::TelemetryConfig {
            console_output: false,
            ..gate_telemetry::TelemetryConfig::default()
        };
        let guard = gate_telemetry::init_telemetry(&config);
        assert!(guard.is_ok());
        // A second global subscriber is refused
        assert!(gate_telemetry::init_logging(&config).is_err());
    }
}
