use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::types::{ParticipantRecord, Tier, Winner};

/// How many tiers of winners are on screen. 0 means nothing has been
/// revealed; stages 1..=4 are cumulative, starting from the least valuable
/// tier.
///
/// Not `#[cw_serde]`: the cursor is stored as a bare number, and the
/// `deny_unknown_fields` that macro adds has no meaning for a newtype.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, JsonSchema)]
pub struct RevealCursor(u8);

impl RevealCursor {
    pub const IDLE: RevealCursor = RevealCursor(0);
    pub const LAST_STAGE: u8 = Tier::COUNT as u8;

    /// Cursor at `stage`, clamped to the last stage.
    pub fn at(stage: u8) -> Self {
        Self(stage.min(Self::LAST_STAGE))
    }

    pub fn stage(self) -> u8 {
        self.0
    }

    pub fn is_idle(self) -> bool {
        self.0 == 0
    }

    /// Next stage. Cycles back to stage 1 after the last one, never to idle.
    pub fn advance(self) -> Self {
        if self.0 >= Self::LAST_STAGE {
            Self(1)
        } else {
            Self(self.0 + 1)
        }
    }

    pub fn reveals(self, tier: Tier) -> bool {
        tier.reveal_stage() <= self.0
    }
}

/// Winners visible at `cursor`, grouped by tier in reveal order and kept in
/// roster order within a tier.
pub fn visible_winners(roster: &[ParticipantRecord], cursor: RevealCursor) -> Vec<Winner> {
    let mut tiers: Vec<Tier> = Tier::ALL
        .into_iter()
        .filter(|&t| cursor.reveals(t))
        .collect();
    tiers.sort_by_key(|t| t.reveal_stage());

    tiers
        .into_iter()
        .flat_map(|tier| {
            roster
                .iter()
                .filter(move |r| r.tier == Some(tier))
                .map(move |r| Winner {
                    display_name: r.display_name.clone(),
                    external_id: r.external_id.clone(),
                    tier,
                })
        })
        .collect()
}

/// Rebuild a cursor when none was kept for the session. A saved winner
/// snapshot means everything had been shown; otherwise use the highest stage
/// whose tier already has winners.
pub fn infer_cursor(roster: &[ParticipantRecord], has_winner_snapshot: bool) -> RevealCursor {
    if has_winner_snapshot {
        return RevealCursor::at(RevealCursor::LAST_STAGE);
    }
    roster
        .iter()
        .filter_map(|r| r.tier)
        .map(Tier::reveal_stage)
        .max()
        .map_or(RevealCursor::IDLE, RevealCursor::at)
}
