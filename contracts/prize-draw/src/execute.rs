use cosmwasm_std::{
    to_json_binary, Addr, Api, DepsMut, Env, Event, MessageInfo, Response, Storage,
};
use prize_draw_common::roster::{self, unassigned_count};
use prize_draw_common::{
    fill_gaps as fill_roster_gaps, infer_cursor, normalize_batch, normalize_record,
    parse_capacity, seed_from_parts, validate_batch, visible_winners, CapacityModel, DrawError,
    DrawRng, ParticipantRecord, RawRecord, Tier,
};

use crate::error::ContractError;
use crate::msg::AdvanceResponse;
use crate::state::{
    load_capacity, load_cursor, load_roster, load_winners, DrawConfig, CAPACITY, CONFIG,
    DRAW_NONCE, REVEAL_CURSOR, ROSTER, WINNERS,
};

fn ensure_admin(config: &DrawConfig, sender: &Addr, action: &str) -> Result<(), ContractError> {
    if *sender != config.admin {
        return Err(ContractError::Unauthorized {
            reason: format!("only admin can {action}"),
        });
    }
    Ok(())
}

fn ensure_presenter(config: &DrawConfig, sender: &Addr) -> Result<(), ContractError> {
    if *sender == config.admin || config.presenter.as_ref() == Some(sender) {
        return Ok(());
    }
    Err(ContractError::Unauthorized {
        reason: "only admin or presenter can advance the reveal".to_string(),
    })
}

/// Roster and capacity must both exist before anything can be drawn.
fn load_draw_inputs(
    storage: &dyn Storage,
    api: &dyn Api,
) -> Result<(Vec<ParticipantRecord>, CapacityModel), ContractError> {
    let roster = load_roster(storage, api).ok_or(DrawError::NotConfigured {
        missing: "roster".to_string(),
    })?;
    let capacity = load_capacity(storage, api).ok_or(DrawError::NotConfigured {
        missing: "capacity".to_string(),
    })?;
    Ok((roster, capacity))
}

/// Seed for one draw, hashed from the block, the transaction, this contract,
/// a persisted nonce and optional caller entropy. The nonce keeps repeated
/// draws within one block apart.
fn draw_seed(
    storage: &mut dyn Storage,
    env: &Env,
    entropy: Option<&str>,
) -> Result<[u8; 32], ContractError> {
    let nonce = DRAW_NONCE.may_load(storage)?.unwrap_or(0);
    DRAW_NONCE.save(storage, &(nonce + 1))?;

    let tx_index = env.transaction.as_ref().map_or(0, |tx| tx.index);
    Ok(seed_from_parts(&[
        env.block.chain_id.as_bytes(),
        &env.block.height.to_be_bytes(),
        &env.block.time.nanos().to_be_bytes(),
        &tx_index.to_be_bytes(),
        env.contract.address.as_str().as_bytes(),
        &nonce.to_be_bytes(),
        entropy.unwrap_or_default().as_bytes(),
    ]))
}

/// Set one tier's target. Admin only.
pub fn update_capacity(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    tier: Tier,
    count: String,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info.sender, "update capacity")?;

    let value = parse_capacity(&count)?;
    let mut capacity = load_capacity(deps.storage, deps.api).unwrap_or_default();
    capacity.set(tier, i64::from(value))?;
    CAPACITY.save(deps.storage, &capacity)?;

    Ok(Response::new()
        .add_attribute("action", "update_capacity")
        .add_attribute("tier", tier.to_string())
        .add_event(
            Event::new("prize_capacity_updated")
                .add_attribute("tier", tier.to_string())
                .add_attribute("count", value.to_string())
                .add_attribute("total", capacity.total().to_string()),
        ))
}

/// Replace the roster with an uploaded batch. Admin only.
///
/// The batch is checked against the stored capacity (all zeros when none was
/// configured). Any violation rejects the whole batch and leaves the current
/// roster untouched.
pub fn import_roster(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    records: Vec<RawRecord>,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info.sender, "import a roster")?;

    let batch = normalize_batch(&records);
    let capacity = load_capacity(deps.storage, deps.api).unwrap_or_default();
    validate_batch(&batch, &capacity)?;
    ROSTER.save(deps.storage, &batch)?;

    let assigned: u32 = roster::tier_counts(&batch).iter().map(|(_, n)| n).sum();
    let unassigned = unassigned_count(&batch);
    Ok(Response::new()
        .add_attribute("action", "import_roster")
        .add_attribute("records", batch.len().to_string())
        .add_event(
            Event::new("prize_roster_imported")
                .add_attribute("records", batch.len().to_string())
                .add_attribute("assigned", assigned.to_string())
                .add_attribute("unassigned", unassigned.to_string()),
        ))
}

/// Append a single record. Admin only.
pub fn add_record(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    record: RawRecord,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info.sender, "add records")?;

    let record = normalize_record(&record);
    let capacity = load_capacity(deps.storage, deps.api).unwrap_or_default();
    let mut roster = load_roster(deps.storage, deps.api).unwrap_or_default();
    roster::add_record(&mut roster, record.clone(), &capacity)?;
    ROSTER.save(deps.storage, &roster)?;

    let tier = record.tier.map_or("unassigned".to_string(), |t| t.to_string());
    Ok(Response::new()
        .add_attribute("action", "add_record")
        .add_attribute("external_id", record.external_id.clone())
        .add_event(
            Event::new("prize_record_added")
                .add_attribute("external_id", record.external_id)
                .add_attribute("tier", tier)
                .add_attribute("records", roster.len().to_string()),
        ))
}

/// Remove the first record carrying `external_id`. Admin only.
pub fn remove_record(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    external_id: String,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info.sender, "remove records")?;

    let mut roster = load_roster(deps.storage, deps.api).unwrap_or_default();
    let removed = roster::remove_record(&mut roster, &external_id)?;
    ROSTER.save(deps.storage, &roster)?;

    let tier = removed.tier.map_or("unassigned".to_string(), |t| t.to_string());
    Ok(Response::new()
        .add_attribute("action", "remove_record")
        .add_attribute("external_id", external_id.clone())
        .add_event(
            Event::new("prize_record_removed")
                .add_attribute("external_id", external_id)
                .add_attribute("tier", tier)
                .add_attribute("records", roster.len().to_string()),
        ))
}

/// Randomly fill open prize slots without touching the reveal. Admin only.
pub fn fill_gaps(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    entropy: Option<String>,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info.sender, "fill prize gaps")?;

    let (mut roster, capacity) = load_draw_inputs(deps.storage, deps.api)?;
    let seed = draw_seed(deps.storage, &env, entropy.as_deref())?;
    let report = fill_roster_gaps(&mut roster, &capacity, &mut DrawRng::new(seed));
    if report.changed {
        ROSTER.save(deps.storage, &roster)?;
    }

    Ok(Response::new()
        .set_data(to_json_binary(&report)?)
        .add_attribute("action", "fill_gaps")
        .add_attribute("changed", report.changed.to_string())
        .add_event(
            Event::new("prize_gaps_filled")
                .add_attribute("promoted", report.promoted().to_string())
                .add_attribute("partial", report.partial().to_string())
                .add_attribute("unassigned_remaining", report.unassigned_remaining.to_string())
                .add_attribute("seed", hex::encode(seed)),
        ))
}

/// Fill open slots, then move the reveal to its next stage. Admin or
/// presenter.
///
/// Fails with `NotConfigured` before touching anything when the roster or
/// the capacity has never been set.
pub fn advance(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    entropy: Option<String>,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_presenter(&config, &info.sender)?;

    let (mut roster, capacity) = load_draw_inputs(deps.storage, deps.api)?;
    let cursor = match load_cursor(deps.storage, deps.api) {
        Some(cursor) => cursor,
        None => {
            let has_snapshot = load_winners(deps.storage, deps.api).is_some();
            infer_cursor(&roster, has_snapshot)
        }
    };

    let seed = draw_seed(deps.storage, &env, entropy.as_deref())?;
    let fill = fill_roster_gaps(&mut roster, &capacity, &mut DrawRng::new(seed));
    if fill.changed {
        ROSTER.save(deps.storage, &roster)?;
    }

    let next = cursor.advance();
    let winners = visible_winners(&roster, next);
    REVEAL_CURSOR.save(deps.storage, &next)?;
    WINNERS.save(deps.storage, &winners)?;

    let event = Event::new("prize_stage_advanced")
        .add_attribute("from_stage", cursor.stage().to_string())
        .add_attribute("stage", next.stage().to_string())
        .add_attribute("visible", winners.len().to_string())
        .add_attribute("promoted", fill.promoted().to_string())
        .add_attribute("partial", fill.partial().to_string())
        .add_attribute("seed", hex::encode(seed));

    let data = AdvanceResponse {
        stage: next.stage(),
        winners,
        fill,
    };

    Ok(Response::new()
        .set_data(to_json_binary(&data)?)
        .add_attribute("action", "advance")
        .add_attribute("stage", next.stage().to_string())
        .add_event(event))
}

/// Wipe the roster. Assignments go with it, and the reveal starts over.
pub fn clear_roster(deps: DepsMut, _env: Env, info: MessageInfo) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info.sender, "clear the roster")?;

    let cleared = load_roster(deps.storage, deps.api).map_or(0, |r| r.len());
    ROSTER.remove(deps.storage);
    REVEAL_CURSOR.remove(deps.storage);

    Ok(Response::new()
        .add_attribute("action", "clear_roster")
        .add_event(Event::new("prize_roster_cleared").add_attribute("records", cleared.to_string())))
}

/// Wipe the saved winner list and reset the reveal.
pub fn clear_winners(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info.sender, "clear winners")?;

    let cleared = load_winners(deps.storage, deps.api).map_or(0, |w| w.len());
    WINNERS.remove(deps.storage);
    REVEAL_CURSOR.remove(deps.storage);

    Ok(Response::new()
        .add_attribute("action", "clear_winners")
        .add_event(Event::new("prize_winners_cleared").add_attribute("winners", cleared.to_string())))
}

/// Update configuration. Admin only.
pub fn update_config(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    admin: Option<String>,
    presenter: Option<String>,
) -> Result<Response, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info.sender, "update config")?;

    if let Some(admin) = admin {
        config.admin = deps.api.addr_validate(&admin)?;
    }
    if let Some(presenter) = presenter {
        config.presenter = Some(deps.api.addr_validate(&presenter)?);
    }
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("action", "update_config")
        .add_event(
            Event::new("prize_config_updated")
                .add_attribute("admin", config.admin.to_string())
                .add_attribute(
                    "presenter",
                    config
                        .presenter
                        .as_ref()
                        .map_or(String::new(), |p| p.to_string()),
                ),
        ))
}
