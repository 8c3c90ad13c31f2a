use cosmwasm_std::{entry_point, Binary, Deps, DepsMut, Env, MessageInfo, Response, StdResult};
use cw2::{get_contract_version, set_contract_version};

use crate::error::ContractError;
use crate::execute;
use crate::msg::{
    CreateDrawParams, CreditEntriesParams, ExecuteMsg, InstantiateMsg, MigrateMsg, QueryMsg,
    UpdateConfigParams, UpdateDrawParams,
};
use crate::query;
use crate::state::{Config, CONFIG, NEXT_DRAW_ID};

const CONTRACT_NAME: &str = "crates.io:tools-major-draws";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[entry_point]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let schedule = msg.schedule.unwrap_or_default();
    schedule.validate()?;

    let config = Config {
        admin: info.sender.clone(),
        operator: deps.api.addr_validate(&msg.operator)?,
        schedule,
    };
    CONFIG.save(deps.storage, &config)?;
    NEXT_DRAW_ID.save(deps.storage, &0u64)?;

    Ok(Response::new()
        .add_attribute("action", "instantiate")
        .add_attribute("contract", "major-draws")
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
        ExecuteMsg::CreateDraw {
            name,
            description,
            prize,
            draw_date,
            activation_date,
        } => execute::create_draw(
            deps,
            env,
            info,
            CreateDrawParams {
                name,
                description,
                prize,
                draw_date,
                activation_date,
            },
        ),
        ExecuteMsg::UpdateDraw {
            draw_id,
            name,
            description,
            prize,
            draw_date,
            activation_date,
        } => execute::update_draw(
            deps,
            env,
            info,
            UpdateDrawParams {
                draw_id,
                name,
                description,
                prize,
                draw_date,
                activation_date,
            },
        ),
        ExecuteMsg::LockDraw { draw_id } => execute::lock_draw(deps, env, info, draw_id),
        ExecuteMsg::CancelDraw { draw_id } => execute::cancel_draw(deps, env, info, draw_id),
        ExecuteMsg::CreditEntries {
            payment_id,
            user_id,
            entries,
            source,
            payment,
        } => execute::credit_entries(
            deps,
            env,
            info,
            CreditEntriesParams {
                payment_id,
                user_id,
                entries,
                source,
                payment,
            },
        ),
        ExecuteMsg::Tick {} => execute::tick(deps, env, info),
        ExecuteMsg::RecordWinner { draw_id, user_id } => {
            execute::record_winner(deps, env, info, draw_id, user_id)
        }
        ExecuteMsg::UpdateConfig {
            admin,
            operator,
            schedule,
        } => execute::update_config(
            deps,
            env,
            info,
            UpdateConfigParams {
                admin,
                operator,
                schedule,
            },
        ),
    }
}

#[entry_point]
pub fn query(deps: Deps, env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Config {} => query::query_config(deps),
        QueryMsg::Draw { draw_id } => query::query_draw(deps, draw_id),
        QueryMsg::Draws {
            status,
            start_after,
            limit,
        } => query::query_draws(deps, status, start_after, limit),
        QueryMsg::CurrentDraw {} => query::query_current_draw(deps),
        QueryMsg::ResolveTarget { payment } => query::query_resolve_target(deps, env, payment),
        QueryMsg::DrawEntries {
            draw_id,
            start_after,
            limit,
        } => query::query_draw_entries(deps, draw_id, start_after, limit),
        QueryMsg::UserEntry { draw_id, user_id } => query::query_user_entry(deps, draw_id, user_id),
        QueryMsg::DrawTotals { draw_id } => query::query_draw_totals(deps, draw_id),
        QueryMsg::Credit {
            payment_id,
            user_id,
        } => query::query_credit(deps, payment_id, user_id),
        QueryMsg::PendingTransitions {} => query::query_pending_transitions(deps, env),
        QueryMsg::Successor { draw_id } => query::query_successor(deps, draw_id),
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
