//! When steps for blocked workflow BDD scenarios.

use super::world::{BlockedWorkflowWorld, run_async};
use modulor::board::{domain::UserKey, services::MoveCardRequest};
use rstest_bdd_macros::when;

fn move_card(
    world: &mut BlockedWorkflowWorld,
    target: String,
    user: &str,
    block: (Option<String>, Option<String>),
) -> Result<(), eyre::Report> {
    let board = world.board()?.clone();
    let (blocked_by, reason) = block;
    let request = MoveCardRequest::new(world.card()?.id(), target, UserKey::new(user))
        .with_block(blocked_by, reason);
    let result = run_async(world.cards.move_card(&board, request));
    if let Ok(moved) = &result {
        world.card = Some(moved.card.clone());
    }
    world.last_move = Some(result);
    Ok(())
}

#[when(
    r#"the card is moved to "{target}" by "{user}" with blocker "{blocked_by}" and reason "{reason}""#
)]
fn card_moved_with_block(
    world: &mut BlockedWorkflowWorld,
    target: String,
    user: String,
    blocked_by: String,
    reason: String,
) -> Result<(), eyre::Report> {
    move_card(world, target, &user, (Some(blocked_by), Some(reason)))
}

#[when(r#"the card is moved to "{target}" by "{user}" without block metadata"#)]
fn card_moved_without_block(
    world: &mut BlockedWorkflowWorld,
    target: String,
    user: String,
) -> Result<(), eyre::Report> {
    move_card(world, target, &user, (None, None))
}
