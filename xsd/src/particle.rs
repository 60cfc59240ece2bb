use crate::element::ElementDecl;
use crate::xstypes::{QName, Sequence};

/// Occurrence bounds of a particle (`minOccurs`/`maxOccurs`).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Occurs {
    pub min: u64,
    pub max: MaxOccurs,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MaxOccurs {
    Bounded(u64),
    Unbounded,
}

impl Occurs {
    pub const ONCE: Occurs = Occurs {
        min: 1,
        max: MaxOccurs::Bounded(1),
    };

    /// A particle that may occur more than once maps to a repeated field.
    pub fn is_multiple(&self) -> bool {
        match self.max {
            MaxOccurs::Unbounded => true,
            MaxOccurs::Bounded(n) => n > 1,
        }
    }

    pub fn is_optional(&self) -> bool {
        self.min == 0
    }

    /// maxOccurs="0" excludes the particle from the content model entirely.
    pub fn is_void(&self) -> bool {
        self.max == MaxOccurs::Bounded(0)
    }
}

/// One entry in a content model. Compositors nest; `GroupRef` is expanded
/// away during resolution.
#[derive(Clone, Debug)]
pub enum Particle {
    Element(ElementDecl),
    GroupRef { ref_: QName, occurs: Occurs },
    Sequence { particles: Sequence<Particle>, occurs: Occurs },
    Choice { particles: Sequence<Particle>, occurs: Occurs },
    All { particles: Sequence<Particle>, occurs: Occurs },
}

impl Particle {
    pub fn occurs(&self) -> Occurs {
        match self {
            Self::Element(e) => e.occurs,
            Self::GroupRef { occurs, .. }
            | Self::Sequence { occurs, .. }
            | Self::Choice { occurs, .. }
            | Self::All { occurs, .. } => *occurs,
        }
    }
}
