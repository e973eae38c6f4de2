use serde::{Deserialize, Serialize};

/// The two people sharing expenses, in a fixed order.
///
/// Every per-participant column and every difference (`first - second`) follows this order.
/// Payers with any other name are tolerated in the ledger but are not either participant.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Participants {
    pub first: String,
    pub second: String,
}

/// Which of the two participants a payer is.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Slot {
    First,
    Second,
}

impl Participants {
    pub fn new<A: Into<String>, B: Into<String>>(first: A, second: B) -> Self {
        Participants {
            first: first.into(),
            second: second.into(),
        }
    }

    pub fn slot(&self, payer: &str) -> Option<Slot> {
        if payer == self.first {
            Some(Slot::First)
        } else if payer == self.second {
            Some(Slot::Second)
        } else {
            None
        }
    }

    pub fn name(&self, slot: Slot) -> &str {
        match slot {
            Slot::First => &self.first,
            Slot::Second => &self.second,
        }
    }

    pub fn is_registered(&self, payer: &str) -> bool {
        self.slot(payer).is_some()
    }
}

impl Default for Participants {
    fn default() -> Self {
        Participants::new("Katy", "Sebastien")
    }
}

impl Slot {
    pub fn other(self) -> Slot {
        match self {
            Slot::First => Slot::Second,
            Slot::Second => Slot::First,
        }
    }
}
