//! Colour assignment for a parton pair.
//!
//! Two colour lines, tagged 101 and 102, are enough for every pair of
//! light quarks, antiquarks and gluons. Pairs that are not already a
//! colour singlet are closed with beam remnants moving along the beam
//! axis.

use quench_core::types::Flavour;

use crate::error::EngineError;

/// First colour-line tag.
pub const COLOUR_LINE_A: i32 = 101;

/// Second colour-line tag.
pub const COLOUR_LINE_B: i32 = 102;

/// Colour and anticolour tags of one particle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ColourTags {
    /// Colour tag (0 for none).
    pub colour: i32,
    /// Anticolour tag (0 for none).
    pub anticolour: i32,
}

impl ColourTags {
    const fn new(colour: i32, anticolour: i32) -> Self {
        Self { colour, anticolour }
    }

    /// Returns `true` if the tags describe a quark (colour only).
    pub fn is_quark_like(&self) -> bool {
        self.colour != 0 && self.anticolour == 0
    }
}

/// Beam direction of a remnant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BeamDirection {
    /// Along +z.
    Forward,
    /// Along −z.
    Backward,
}

impl BeamDirection {
    /// Sign of `p_z`.
    pub fn sign(self) -> f64 {
        match self {
            BeamDirection::Forward => 1.0,
            BeamDirection::Backward => -1.0,
        }
    }
}

/// Remnant slot needed to close the colour flow.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RemnantSlot {
    /// Colour tags of the remnant.
    pub tags: ColourTags,
    /// Beam direction.
    pub direction: BeamDirection,
}

/// Pair category, keyed on the ordered flavour pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PairCategory {
    /// Gluon, gluon.
    GluonGluon,
    /// Quark, antiquark.
    QuarkAntiquark,
    /// Antiquark, quark.
    AntiquarkQuark,
    /// Quark, gluon.
    QuarkGluon,
    /// Gluon, quark.
    GluonQuark,
    /// Antiquark, gluon.
    AntiquarkGluon,
    /// Gluon, antiquark.
    GluonAntiquark,
    /// Quark, quark.
    QuarkQuark,
    /// Antiquark, antiquark.
    AntiquarkAntiquark,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Kind {
    Quark,
    Antiquark,
    Gluon,
}

fn kind(flavour: Flavour) -> Result<Kind, EngineError> {
    if flavour.is_gluon() {
        Ok(Kind::Gluon)
    } else if flavour.is_quark() && flavour.is_antiparticle() {
        Ok(Kind::Antiquark)
    } else if flavour.is_quark() {
        Ok(Kind::Quark)
    } else {
        Err(EngineError::UncolouredParton {
            pdg_id: flavour.pdg_id(),
        })
    }
}

impl PairCategory {
    /// Classifies an ordered flavour pair.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UncolouredParton`] for photons.
    pub fn of(a: Flavour, b: Flavour) -> Result<Self, EngineError> {
        use Kind::*;
        Ok(match (kind(a)?, kind(b)?) {
            (Gluon, Gluon) => PairCategory::GluonGluon,
            (Quark, Antiquark) => PairCategory::QuarkAntiquark,
            (Antiquark, Quark) => PairCategory::AntiquarkQuark,
            (Quark, Gluon) => PairCategory::QuarkGluon,
            (Gluon, Quark) => PairCategory::GluonQuark,
            (Antiquark, Gluon) => PairCategory::AntiquarkGluon,
            (Gluon, Antiquark) => PairCategory::GluonAntiquark,
            (Quark, Quark) => PairCategory::QuarkQuark,
            (Antiquark, Antiquark) => PairCategory::AntiquarkAntiquark,
        })
    }

    /// Returns `true` if the pair is already a colour singlet.
    pub fn is_singlet(self) -> bool {
        matches!(
            self,
            PairCategory::GluonGluon | PairCategory::QuarkAntiquark | PairCategory::AntiquarkQuark
        )
    }
}

/// Colour tags for a pair plus the remnants closing the flow.
///
/// # Examples
///
/// ```
/// use quench_core::types::Flavour;
/// use quench_engine::hadronise::ColourAssignment;
///
/// let assignment = ColourAssignment::for_pair(Flavour::Up, Flavour::Gluon).unwrap();
/// assert_eq!(assignment.remnants.len(), 1);
/// assert!(assignment.is_balanced());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColourAssignment {
    /// Pair category.
    pub category: PairCategory,
    /// Tags of the two partons, in input order.
    pub partons: [ColourTags; 2],
    /// Remnants, forward first.
    pub remnants: Vec<RemnantSlot>,
}

impl ColourAssignment {
    /// Assigns colour tags to an ordered pair.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UncolouredParton`] if either flavour carries
    /// no colour.
    pub fn for_pair(a: Flavour, b: Flavour) -> Result<Self, EngineError> {
        const A: i32 = COLOUR_LINE_A;
        const B: i32 = COLOUR_LINE_B;
        let tags = ColourTags::new;
        let forward = |colour, anticolour| RemnantSlot {
            tags: tags(colour, anticolour),
            direction: BeamDirection::Forward,
        };
        let backward = |colour, anticolour| RemnantSlot {
            tags: tags(colour, anticolour),
            direction: BeamDirection::Backward,
        };

        let category = PairCategory::of(a, b)?;
        let (partons, remnants) = match category {
            PairCategory::GluonGluon => ([tags(A, B), tags(B, A)], vec![]),
            PairCategory::QuarkAntiquark => ([tags(A, 0), tags(0, A)], vec![]),
            PairCategory::AntiquarkQuark => ([tags(0, A), tags(A, 0)], vec![]),
            PairCategory::QuarkGluon => ([tags(A, 0), tags(B, A)], vec![forward(0, B)]),
            PairCategory::GluonQuark => ([tags(A, B), tags(B, 0)], vec![forward(0, A)]),
            PairCategory::AntiquarkGluon => ([tags(0, A), tags(A, B)], vec![forward(B, 0)]),
            PairCategory::GluonAntiquark => ([tags(A, B), tags(0, A)], vec![forward(B, 0)]),
            PairCategory::QuarkQuark => (
                [tags(A, 0), tags(B, 0)],
                vec![forward(0, A), backward(0, B)],
            ),
            PairCategory::AntiquarkAntiquark => (
                [tags(0, A), tags(0, B)],
                vec![forward(A, 0), backward(B, 0)],
            ),
        };

        Ok(Self {
            category,
            partons,
            remnants,
        })
    }

    /// Returns `true` when every colour tag is matched by an anticolour tag.
    pub fn is_balanced(&self) -> bool {
        let all = self
            .partons
            .iter()
            .copied()
            .chain(self.remnants.iter().map(|r| r.tags));
        let mut colours: Vec<i32> = Vec::new();
        let mut anticolours: Vec<i32> = Vec::new();
        for tags in all {
            if tags.colour != 0 {
                colours.push(tags.colour);
            }
            if tags.anticolour != 0 {
                anticolours.push(tags.anticolour);
            }
        }
        colours.sort_unstable();
        anticolours.sort_unstable();
        colours == anticolours
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLOURED: [Flavour; 7] = [
        Flavour::Gluon,
        Flavour::Up,
        Flavour::AntiUp,
        Flavour::Down,
        Flavour::AntiDown,
        Flavour::Strange,
        Flavour::AntiStrange,
    ];

    #[test]
    fn test_every_coloured_pair_is_balanced() {
        for &a in &COLOURED {
            for &b in &COLOURED {
                let assignment = ColourAssignment::for_pair(a, b).unwrap();
                assert!(assignment.is_balanced(), "{} {} unbalanced", a, b);
                assert_eq!(
                    assignment.remnants.is_empty(),
                    assignment.category.is_singlet(),
                    "{} {}",
                    a,
                    b
                );
            }
        }
    }

    #[test]
    fn test_same_sign_pairs_get_two_remnants() {
        let qq = ColourAssignment::for_pair(Flavour::Up, Flavour::Down).unwrap();
        assert_eq!(qq.category, PairCategory::QuarkQuark);
        assert_eq!(qq.remnants.len(), 2);
        assert_eq!(qq.remnants[0].direction, BeamDirection::Forward);
        assert_eq!(qq.remnants[1].direction, BeamDirection::Backward);

        let aa = ColourAssignment::for_pair(Flavour::AntiUp, Flavour::AntiStrange).unwrap();
        assert_eq!(aa.category, PairCategory::AntiquarkAntiquark);
        assert!(aa.remnants.iter().all(|r| r.tags.is_quark_like()));
    }

    #[test]
    fn test_photon_is_rejected() {
        let err = ColourAssignment::for_pair(Flavour::Photon, Flavour::Gluon).unwrap_err();
        assert_eq!(err, EngineError::UncolouredParton { pdg_id: 22 });
    }
}
