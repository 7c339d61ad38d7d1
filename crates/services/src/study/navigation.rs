/// Which side of the card is showing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Face {
    #[default]
    Front,
    Back,
}

impl Face {
    #[must_use]
    pub fn flipped(self) -> Self {
        match self {
            Face::Front => Face::Back,
            Face::Back => Face::Front,
        }
    }

    #[must_use]
    pub fn is_back(self) -> bool {
        matches!(self, Face::Back)
    }
}

/// Position and face within a deck of `len` cards.
///
/// `position` always stays in `[0, len)`; moving off either end wraps.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Navigation {
    position: usize,
    len: usize,
    face: Face,
}

impl Navigation {
    /// Start at the first card, front up. `None` for an empty deck.
    #[must_use]
    pub fn new(len: usize) -> Option<Self> {
        (len > 0).then_some(Self {
            position: 0,
            len,
            face: Face::Front,
        })
    }

    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    #[must_use]
    pub fn deck_len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn face(&self) -> Face {
        self.face
    }

    pub fn next(&mut self) {
        self.position = (self.position + 1) % self.len;
        self.face = Face::Front;
    }

    pub fn previous(&mut self) {
        self.position = (self.position + self.len - 1) % self.len;
        self.face = Face::Front;
    }

    pub fn flip(&mut self) -> Face {
        self.face = self.face.flipped();
        self.face
    }

    /// Back to the first card, front up.
    pub fn rewind(&mut self) {
        self.position = 0;
        self.face = Face::Front;
    }

    /// `(position + 1) / len` as a percentage, capped at 100.
    #[must_use]
    pub fn percent_through(&self) -> f64 {
        let done = u32::try_from(self.position + 1).unwrap_or(u32::MAX);
        let len = u32::try_from(self.len).unwrap_or(u32::MAX);
        (f64::from(done) / f64::from(len) * 100.0).min(100.0)
    }
}
