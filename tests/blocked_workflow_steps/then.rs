//! Then steps for blocked workflow BDD scenarios.

use super::world::BlockedWorkflowWorld;
use rstest_bdd_macros::then;

#[then(r#"the card is in column "{column}""#)]
fn card_in_column(world: &BlockedWorkflowWorld, column: String) -> Result<(), eyre::Report> {
    let card = world.stored_card()?;
    if card.column().as_str() != column {
        return Err(eyre::eyre!(
            "expected column {column}, found {}",
            card.column().as_str()
        ));
    }
    Ok(())
}

#[then(r#"the card is blocked by "{blocked_by}" because "{reason}""#)]
fn card_is_blocked(
    world: &BlockedWorkflowWorld,
    blocked_by: String,
    reason: String,
) -> Result<(), eyre::Report> {
    let card = world.stored_card()?;
    let state = card
        .blocked()
        .ok_or_else(|| eyre::eyre!("expected block metadata on stored card"))?;
    if state.blocked_by() != blocked_by || state.reason() != reason {
        return Err(eyre::eyre!(
            "expected block by {blocked_by} ({reason}), found {} ({})",
            state.blocked_by(),
            state.reason()
        ));
    }
    Ok(())
}

#[then(r#"the card was last moved by "{user}""#)]
fn card_last_moved_by(world: &BlockedWorkflowWorld, user: String) -> Result<(), eyre::Report> {
    let card = world.stored_card()?;
    match card.last_moved_by() {
        Some(mover) if mover.as_str() == user => Ok(()),
        other => Err(eyre::eyre!("expected last mover {user}, found {other:?}")),
    }
}

#[then("the card carries no block metadata")]
fn card_not_blocked(world: &BlockedWorkflowWorld) -> Result<(), eyre::Report> {
    let card = world.stored_card()?;
    if let Some(state) = card.blocked() {
        return Err(eyre::eyre!("expected no block metadata, found {state:?}"));
    }
    Ok(())
}

#[then(r#"the move fails with error code "{code}""#)]
fn move_fails_with_code(world: &BlockedWorkflowWorld, code: String) -> Result<(), eyre::Report> {
    let result = world
        .last_move
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing move result"))?;
    match result {
        Err(err) if err.kind().as_str() == code => Ok(()),
        Err(err) => Err(eyre::eyre!("expected {code}, got {}: {err}", err.kind())),
        Ok(moved) => Err(eyre::eyre!(
            "expected {code}, but the card moved to {}",
            moved.card.column().as_str()
        )),
    }
}

#[then("the block start time is unchanged")]
fn block_start_unchanged(world: &BlockedWorkflowWorld) -> Result<(), eyre::Report> {
    let before = world
        .blocked_since_before
        .ok_or_else(|| eyre::eyre!("missing initial block start"))?;
    let card = world.stored_card()?;
    let after = card
        .blocked()
        .map(|state| state.since())
        .ok_or_else(|| eyre::eyre!("expected block metadata on stored card"))?;
    if before != after {
        return Err(eyre::eyre!("block start moved from {before} to {after}"));
    }
    Ok(())
}
