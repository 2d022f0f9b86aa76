use cosmwasm_std::{entry_point, Binary, Deps, DepsMut, Env, MessageInfo, Response, StdResult};
use cw2::{get_contract_version, set_contract_version};

use crate::error::ContractError;
use crate::execute;
use crate::msg::{ExecuteMsg, InstantiateMsg, MigrateMsg, QueryMsg};
use crate::query;
use crate::state::{DrawConfig, CAPACITY, CONFIG};

const CONTRACT_NAME: &str = "crates.io:prize-draw";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[entry_point]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let presenter = msg
        .presenter
        .map(|p| deps.api.addr_validate(&p))
        .transpose()?;
    let config = DrawConfig {
        admin: info.sender.clone(),
        presenter,
    };
    CONFIG.save(deps.storage, &config)?;

    if let Some(capacity) = msg.capacity {
        CAPACITY.save(deps.storage, &capacity)?;
    }

    Ok(Response::new()
        .add_attribute("action", "instantiate")
        .add_attribute("contract", "prize-draw")
        .add_attribute("admin", info.sender.to_string()))
}

#[entry_point]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::UpdateCapacity { tier, count } => {
            execute::update_capacity(deps, env, info, tier, count)
        }
        ExecuteMsg::ImportRoster { records } => execute::import_roster(deps, env, info, records),
        ExecuteMsg::AddRecord { record } => execute::add_record(deps, env, info, record),
        ExecuteMsg::RemoveRecord { external_id } => {
            execute::remove_record(deps, env, info, external_id)
        }
        ExecuteMsg::FillGaps { entropy } => execute::fill_gaps(deps, env, info, entropy),
        ExecuteMsg::Advance { entropy } => execute::advance(deps, env, info, entropy),
        ExecuteMsg::ClearRoster {} => execute::clear_roster(deps, env, info),
        ExecuteMsg::ClearWinners {} => execute::clear_winners(deps, env, info),
        ExecuteMsg::UpdateConfig { admin, presenter } => {
            execute::update_config(deps, env, info, admin, presenter)
        }
    }
}

#[entry_point]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Config {} => query::query_config(deps),
        QueryMsg::Capacity {} => query::query_capacity(deps),
        QueryMsg::Roster {} => query::query_roster(deps),
        QueryMsg::TierSummary {} => query::query_tier_summary(deps),
        QueryMsg::RevealState {} => query::query_reveal_state(deps),
        QueryMsg::Winners {} => query::query_winners(deps),
    }
}

#[entry_point]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    let stored = get_contract_version(deps.storage)?;
    if stored.contract != CONTRACT_NAME {
        return Err(ContractError::Unauthorized {
            reason: "Cannot migrate from different contract type".to_string(),
        });
    }

    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    Ok(Response::new()
        .add_attribute("action", "migrate")
        .add_attribute("from_version", stored.version)
        .add_attribute("to_version", CONTRACT_VERSION))
}
