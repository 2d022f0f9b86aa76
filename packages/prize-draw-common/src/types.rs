use std::fmt;

use cosmwasm_schema::cw_serde;

/// Prize category. Declaration order is rank order: rank 0 is the most
/// valuable tier and is shown first, revealed last.
#[cw_serde]
#[derive(Copy, Eq, Hash, PartialOrd, Ord)]
pub enum Tier {
    Special,
    First,
    Second,
    Lucky,
}

impl Tier {
    /// All tiers by ascending rank (most valuable first).
    pub const ALL: [Tier; 4] = [Tier::Special, Tier::First, Tier::Second, Tier::Lucky];

    pub const COUNT: usize = 4;

    pub fn rank(self) -> usize {
        match self {
            Tier::Special => 0,
            Tier::First => 1,
            Tier::Second => 2,
            Tier::Lucky => 3,
        }
    }

    /// Stage at which this tier's winners become visible. The least
    /// valuable tier goes first.
    pub fn reveal_stage(self) -> u8 {
        (Self::COUNT - self.rank()) as u8
    }

    /// Label used in imported roster files.
    pub fn label(self) -> &'static str {
        match self {
            Tier::Special => "特等奖",
            Tier::First => "一等奖",
            Tier::Second => "二等奖",
            Tier::Lucky => "幸运奖",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Tier::Special => "special",
            Tier::First => "first",
            Tier::Second => "second",
            Tier::Lucky => "lucky",
        }
    }

    /// Resolve a raw tier cell. Unknown or empty labels mean "unassigned".
    pub fn from_label(raw: &str) -> Option<Tier> {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|tier| raw == tier.label() || raw.eq_ignore_ascii_case(tier.name()))
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One roster entry. `external_id` is the only key used for lookups;
/// `tier == None` means the participant has not won anything yet.
#[cw_serde]
pub struct ParticipantRecord {
    pub external_id: String,
    pub display_name: String,
    pub contact: String,
    pub tier: Option<Tier>,
}

impl ParticipantRecord {
    pub fn new(
        external_id: impl Into<String>,
        display_name: impl Into<String>,
        tier: Option<Tier>,
    ) -> Self {
        Self {
            external_id: external_id.into(),
            display_name: display_name.into(),
            contact: String::new(),
            tier,
        }
    }

    pub fn is_unassigned(&self) -> bool {
        self.tier.is_none()
    }
}

/// A revealed winner as shown to the audience.
#[cw_serde]
pub struct Winner {
    pub display_name: String,
    pub external_id: String,
    pub tier: Tier,
}
