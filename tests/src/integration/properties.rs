//! # Randomized Operation Sequences
//!
//! Drives the domain aggregate with seeded random operations and checks the
//! queue invariants after every step:
//!
//! - cursors never move backwards and `read_cursor <= write_cursor`
//! - recorded hashes and timestamps never change
//! - `skip_expired` is idempotent at a fixed time
//! - a failing target never moves the read cursor

#[cfg(test)]
mod tests {
    use crate::{sample_call, MODULE, OWNER, STRANGER, TARGET};
    use delay_gate::prelude::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const STEPS: usize = 400;

    struct Model {
        gate: DelayGate,
        calls: Vec<ProposedCall>,
        recorded: Vec<(Hash, Timestamp)>,
        now: Timestamp,
    }

    impl Model {
        fn new(cooldown: u64, expiration: u64) -> Self {
            let mut gate = DelayGate::initialize(OWNER, TARGET, cooldown, expiration).unwrap();
            gate.enable_module(OWNER, MODULE).unwrap();
            Self {
                gate,
                calls: Vec::new(),
                recorded: Vec::new(),
                now: 0,
            }
        }

        fn step(&mut self, rng: &mut StdRng) {
            let before_read = self.gate.read_cursor();
            let before_write = self.gate.write_cursor();

            match rng.gen_range(0..7) {
                0 | 1 => {
                    let call = sample_call(rng.gen());
                    let index = self.gate.propose(MODULE, call.clone(), self.now).unwrap();
                    assert_eq!(index, before_write);
                    self.recorded.push((hash_call(&call), self.now));
                    self.calls.push(call);
                }
                2 => {
                    self.now += rng.gen_range(0..90);
                }
                3 => {
                    let head = usize::try_from(before_read).unwrap();
                    if let Some(call) = self.calls.get(head).cloned() {
                        let fail = rng.gen_bool(0.3);
                        let result = self.gate.execute_next(&call, self.now, |_, _| {
                            if fail {
                                Err(SinkError::Reverted("random".into()))
                            } else {
                                Ok(())
                            }
                        });
                        match result {
                            Ok(index) => {
                                assert_eq!(index, before_read);
                                assert_eq!(self.gate.read_cursor(), before_read + 1);
                            }
                            Err(_) => assert_eq!(self.gate.read_cursor(), before_read),
                        }
                    }
                }
                4 => {
                    let skipped = self.gate.skip_expired(self.now).unwrap();
                    assert_eq!(self.gate.read_cursor(), before_read + skipped);
                    assert_eq!(self.gate.skip_expired(self.now).unwrap(), 0);
                }
                5 => {
                    let target = rng.gen_range(0..=before_write + 1);
                    let result = self.gate.set_read_cursor(OWNER, target);
                    if target > before_read && target <= before_write {
                        assert!(result.is_ok());
                    } else {
                        assert!(result.is_err());
                        assert_eq!(self.gate.read_cursor(), before_read);
                    }
                }
                _ => {
                    // Unauthorized traffic never changes anything
                    assert!(self.gate.propose(STRANGER, sample_call(0), self.now).is_err());
                    assert!(self.gate.set_cooldown(STRANGER, 0).is_err());
                    assert_eq!(self.gate.write_cursor(), before_write);
                }
            }

            self.check(before_read, before_write);
        }

        fn check(&self, before_read: u64, before_write: u64) {
            let read = self.gate.read_cursor();
            let write = self.gate.write_cursor();
            assert!(read >= before_read);
            assert!(write >= before_write);
            assert!(read <= write);

            for (index, (hash, created_at)) in self.recorded.iter().enumerate() {
                let index = index as u64;
                assert_eq!(self.gate.hash_at(index), *hash);
                assert_eq!(self.gate.created_at(index), *created_at);
            }
            assert!(check_all_invariants(&self.gate.snapshot()).is_ok());
        }
    }

    fn run(seed: u64, cooldown: u64, expiration: u64) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut model = Model::new(cooldown, expiration);
        for _ in 0..STEPS {
            model.step(&mut rng);
        }
    }

    #[test]
    fn test_random_sequences_without_delay() {
        for seed in 0..8 {
            run(seed, 0, 0);
        }
    }

    #[test]
    fn test_random_sequences_with_cooldown() {
        for seed in 100..108 {
            run(seed, 45, 0);
        }
    }

    #[test]
    fn test_random_sequences_with_expiration() {
        for seed in 200..208 {
            run(seed, 30, 60);
        }
    }

    #[test]
    fn test_skip_never_passes_live_slot() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut gate = DelayGate::initialize(OWNER, TARGET, 10, 60).unwrap();
        gate.enable_module(OWNER, MODULE).unwrap();

        let mut now = 0;
        for _ in 0..50 {
            now += rng.gen_range(0..40);
            gate.propose(MODULE, sample_call(rng.gen()), now).unwrap();
        }

        let check_at = now + 30;
        gate.skip_expired(check_at).unwrap();
        let head = gate.read_cursor();
        if let Some(state) = gate.slot_state(head, check_at) {
            assert_ne!(state, SlotState::Expired);
        }
        for index in 0..head {
            assert!(gate.created_at(index) + 10 + 60 <= check_at);
        }
    }
}
