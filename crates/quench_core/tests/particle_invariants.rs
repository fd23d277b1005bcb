//! Property tests for parton kinematic invariants.

use proptest::prelude::*;
use quench_core::types::{Flavour, ParticleRecord};

fn any_flavour() -> impl Strategy<Value = Flavour> {
    prop::sample::select(Flavour::ALL.to_vec())
}

proptest! {
    #[test]
    fn prop_beta_bounds(flavour in any_flavour(), pt in 1e-3..1e4f64, phi in 0.0..6.28f64) {
        let parton = ParticleRecord::new(flavour, pt, phi, (0.0, 0.0)).unwrap();
        let beta = parton.beta();
        if flavour.mass() == 0.0 {
            prop_assert_eq!(beta, 1.0);
        } else {
            prop_assert!(beta > 0.0 && beta < 1.0);
        }
    }

    #[test]
    fn prop_antiparticle_mass_matches(flavour in any_flavour()) {
        prop_assert_eq!(flavour.mass(), flavour.charge_conjugate().mass());
        let conjugate_id = flavour.charge_conjugate().pdg_id();
        if flavour.is_quark() {
            prop_assert_eq!(flavour.pdg_id(), -conjugate_id);
        } else {
            prop_assert_eq!(flavour.pdg_id(), conjugate_id);
        }
    }

    #[test]
    fn prop_kicks_keep_momentum_finite(
        pt in 0.1..200.0f64,
        kicks in prop::collection::vec((-5.0..5.0f64, -5.0..5.0f64), 0..50),
    ) {
        let mut parton = ParticleRecord::new(Flavour::Down, pt, 0.0, (0.0, 0.0)).unwrap();
        for (perp, par) in kicks {
            parton.add_q_perp(perp).unwrap();
            parton.add_q_par(par).unwrap();
            prop_assert!(parton.px().is_finite() && parton.py().is_finite());
        }
        prop_assert_eq!(parton.initial_pt(), pt);
    }
}
