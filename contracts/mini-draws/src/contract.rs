use cosmwasm_std::{entry_point, Binary, Deps, DepsMut, Env, MessageInfo, Response, StdResult};
use cw2::{get_contract_version, set_contract_version};

use crate::error::ContractError;
use crate::execute;
use crate::msg::{ExecuteMsg, InstantiateMsg, MigrateMsg, QueryMsg};
use crate::query;
use crate::state::{Config, CONFIG, NEXT_MINI_DRAW_ID};

const CONTRACT_NAME: &str = "crates.io:tools-mini-draws";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[entry_point]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let config = Config {
        admin: info.sender.clone(),
        operator: deps.api.addr_validate(&msg.operator)?,
    };
    CONFIG.save(deps.storage, &config)?;
    NEXT_MINI_DRAW_ID.save(deps.storage, &0u64)?;

    Ok(Response::new()
        .add_attribute("action", "instantiate")
        .add_attribute("contract", "mini-draws")
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
        ExecuteMsg::CreateMiniDraw {
            name,
            description,
            prize,
            min_entries,
        } => execute::create_mini_draw(deps, env, info, name, description, prize, min_entries),
        ExecuteMsg::CreditMiniDrawEntries {
            mini_draw_id,
            payment_id,
            user_id,
            entries,
        } => execute::credit_mini_draw_entries(
            deps,
            env,
            info,
            mini_draw_id,
            payment_id,
            user_id,
            entries,
        ),
        ExecuteMsg::CompleteMiniDraw { mini_draw_id } => {
            execute::complete_mini_draw(deps, env, info, mini_draw_id)
        }
        ExecuteMsg::CancelMiniDraw { mini_draw_id } => {
            execute::cancel_mini_draw(deps, env, info, mini_draw_id)
        }
        ExecuteMsg::RecordMiniDrawWinner {
            mini_draw_id,
            user_id,
        } => execute::record_mini_draw_winner(deps, env, info, mini_draw_id, user_id),
        ExecuteMsg::UpdateConfig { admin, operator } => {
            execute::update_config(deps, info, admin, operator)
        }
    }
}

#[entry_point]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Config {} => query::query_config(deps),
        QueryMsg::MiniDraw { mini_draw_id } => query::query_mini_draw(deps, mini_draw_id),
        QueryMsg::MiniDraws {
            status,
            start_after,
            limit,
        } => query::query_mini_draws(deps, status, start_after, limit),
        QueryMsg::MiniDrawEntries {
            mini_draw_id,
            start_after,
            limit,
        } => query::query_mini_draw_entries(deps, mini_draw_id, start_after, limit),
        QueryMsg::UserEntry {
            mini_draw_id,
            user_id,
        } => query::query_user_entry(deps, mini_draw_id, user_id),
        QueryMsg::Credit {
            payment_id,
            user_id,
        } => query::query_credit(deps, payment_id, user_id),
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
