//! Property tests for hadronisation attempt accounting.

use proptest::prelude::*;
use quench_core::rng::JetRng;
use quench_core::traits::{HadronisationError, Hadroniser};
use quench_core::types::{EventEntry, Flavour, FourMomentum, ParticleRecord};
use quench_engine::hadronise::{HadronisationRetrier, RetrierConfig};

/// Replays a script of attempt results, cycling when it runs out.
///
/// `0` is a consistency failure, `1` a success with only soft pions and
/// `2` a success with one accepted pion.
struct Scripted {
    script: Vec<u8>,
    calls: usize,
}

impl Hadroniser for Scripted {
    fn hadronise(&mut self, _partons: &[EventEntry]) -> Result<Vec<EventEntry>, HadronisationError> {
        let step = self.script[self.calls % self.script.len()];
        self.calls += 1;
        let pion = |pt: f64| EventEntry {
            pdg_id: 111,
            status: 83,
            colour: 0,
            anticolour: 0,
            momentum: FourMomentum::from_pt_rapidity(pt, 0.0, 0.0, 0.135),
            mass: 0.135,
            scale: 0.0,
        };
        match step {
            0 => Err(HadronisationError::Consistency("scripted".to_string())),
            1 => Ok(vec![pion(0.5)]),
            _ => Ok(vec![pion(2.0)]),
        }
    }
}

proptest! {
    /// attempts == successes + failures and never exceeds the budget.
    #[test]
    fn prop_attempts_within_budget(
        script in prop::collection::vec(0u8..3, 1..20),
        max_attempts in 1usize..40,
        seed in any::<u64>(),
    ) {
        let config = RetrierConfig { max_attempts, ..RetrierConfig::default() };
        let hadroniser = Scripted { script: script.clone(), calls: 0 };
        let mut retrier = HadronisationRetrier::new(hadroniser, config, JetRng::from_seed(seed)).unwrap();
        let a = ParticleRecord::new(Flavour::Gluon, 10.0, 0.0, (0.0, 0.0)).unwrap();
        let b = ParticleRecord::new(Flavour::Up, 10.0, 3.0, (0.0, 0.0)).unwrap();

        let outcome = retrier.hadronise(&a, &b, 10.0, 1.0).unwrap();

        prop_assert_eq!(outcome.attempts(), outcome.successes + outcome.failures);
        prop_assert!(outcome.attempts() <= max_attempts);
        prop_assert_eq!(outcome.attempts(), retrier.hadroniser_mut().calls);
        if outcome.is_empty() {
            prop_assert_eq!(outcome.attempts(), max_attempts);
        } else {
            let last = script[(outcome.attempts() - 1) % script.len()];
            prop_assert_eq!(last, 2);
        }
    }
}
