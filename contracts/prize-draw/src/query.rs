use cosmwasm_std::{to_json_binary, Binary, Deps, StdResult};
use prize_draw_common::roster::{display_order, tier_counts, unassigned_count};
use prize_draw_common::{infer_cursor, visible_winners};

use crate::msg::{
    CapacityResponse, RevealStateResponse, RosterResponse, TierStatus, TierSummaryResponse,
};
use crate::state::{load_capacity, load_cursor, load_roster, load_winners, CONFIG};

pub fn query_config(deps: Deps) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    to_json_binary(&config)
}

pub fn query_capacity(deps: Deps) -> StdResult<Binary> {
    let stored = load_capacity(deps.storage, deps.api);
    to_json_binary(&CapacityResponse {
        configured: stored.is_some(),
        capacity: stored.unwrap_or_default(),
    })
}

pub fn query_roster(deps: Deps) -> StdResult<Binary> {
    let roster = load_roster(deps.storage, deps.api).unwrap_or_default();
    let records = display_order(&roster).into_iter().cloned().collect();
    to_json_binary(&RosterResponse { records })
}

pub fn query_tier_summary(deps: Deps) -> StdResult<Binary> {
    let roster = load_roster(deps.storage, deps.api).unwrap_or_default();
    let capacity = load_capacity(deps.storage, deps.api).unwrap_or_default();

    let tiers = tier_counts(&roster)
        .into_iter()
        .map(|(tier, assigned)| TierStatus {
            tier,
            target: capacity.get(tier),
            assigned,
        })
        .collect();

    to_json_binary(&TierSummaryResponse {
        tiers,
        unassigned: unassigned_count(&roster),
    })
}

/// Current reveal. Without a stored cursor the stage is inferred, and a
/// saved winner list is shown as-is.
pub fn query_reveal_state(deps: Deps) -> StdResult<Binary> {
    let roster = load_roster(deps.storage, deps.api).unwrap_or_default();

    let response = match load_cursor(deps.storage, deps.api) {
        Some(cursor) => RevealStateResponse {
            stage: cursor.stage(),
            winners: visible_winners(&roster, cursor),
        },
        None => match load_winners(deps.storage, deps.api) {
            Some(winners) => RevealStateResponse {
                stage: infer_cursor(&roster, true).stage(),
                winners,
            },
            None => {
                let cursor = infer_cursor(&roster, false);
                RevealStateResponse {
                    stage: cursor.stage(),
                    winners: visible_winners(&roster, cursor),
                }
            }
        },
    };
    to_json_binary(&response)
}

pub fn query_winners(deps: Deps) -> StdResult<Binary> {
    let winners = load_winners(deps.storage, deps.api).unwrap_or_default();
    to_json_binary(&winners)
}
