use cosmwasm_schema::cw_serde;

use crate::capacity::CapacityModel;
use crate::rng::DrawRng;
use crate::roster::{tier_counts, unassigned_count};
use crate::types::{ParticipantRecord, Tier};

/// Outcome of one gap-fill pass for a single tier.
#[cw_serde]
pub struct TierFill {
    pub tier: Tier,
    pub target: u32,
    /// Assigned count after the pass.
    pub assigned: u32,
    /// Records promoted by this pass.
    pub promoted: u32,
}

impl TierFill {
    pub fn shortfall(&self) -> u32 {
        self.target.saturating_sub(self.assigned)
    }
}

#[cw_serde]
pub struct FillReport {
    pub changed: bool,
    pub tiers: Vec<TierFill>,
    pub unassigned_remaining: u32,
}

impl FillReport {
    /// True when the unassigned pool ran dry before every tier reached its
    /// target.
    pub fn partial(&self) -> bool {
        self.tiers.iter().any(|t| t.shortfall() > 0)
    }

    pub fn promoted(&self) -> u32 {
        self.tiers.iter().map(|t| t.promoted).sum()
    }
}

/// Promote unassigned records until every tier reaches its target or the
/// unassigned pool is exhausted.
///
/// Tiers are served most valuable first. For each tier with a deficit the
/// pool of still-unassigned records is collected afresh and shuffled, and
/// the first `min(deficit, pool)` entries are promoted. Records that
/// already carry a tier are never touched, and no tier is pushed past its
/// target.
pub fn fill_gaps(
    roster: &mut [ParticipantRecord],
    capacity: &CapacityModel,
    rng: &mut DrawRng,
) -> FillReport {
    let before = tier_counts(roster);
    let mut tiers = Vec::with_capacity(Tier::COUNT);

    for (tier, assigned) in before {
        let target = capacity.get(tier);
        let deficit = target.saturating_sub(assigned) as usize;
        let mut promoted = 0u32;

        if deficit > 0 {
            let mut pool: Vec<usize> = roster
                .iter()
                .enumerate()
                .filter(|(_, r)| r.is_unassigned())
                .map(|(i, _)| i)
                .collect();
            rng.shuffle(&mut pool);

            for &index in pool.iter().take(deficit) {
                roster[index].tier = Some(tier);
                promoted += 1;
            }
        }

        tiers.push(TierFill {
            tier,
            target,
            assigned: assigned + promoted,
            promoted,
        });
    }

    FillReport {
        changed: tiers.iter().any(|t| t.promoted > 0),
        tiers,
        unassigned_remaining: unassigned_count(roster),
    }
}
