//! Given steps for blocked workflow BDD scenarios.

use super::world::{BlockedWorkflowWorld, run_async};
use modulor::board::{
    domain::{BoardKey, UserKey},
    services::{AddCardRequest, MoveCardRequest},
};
use eyre::WrapErr;
use rstest_bdd_macros::given;

#[given("a fresh default board")]
fn fresh_default_board(world: &mut BlockedWorkflowWorld) -> Result<(), eyre::Report> {
    let board = run_async(
        world
            .boards
            .ensure_board(&BoardKey::default_key(), &UserKey::new("scenario")),
    )
    .wrap_err("ensure default board")?;
    world.board = Some(board);
    Ok(())
}

#[given(r#"a card titled "{title}" in column "{column}""#)]
fn card_in_column(
    world: &mut BlockedWorkflowWorld,
    title: String,
    column: String,
) -> Result<(), eyre::Report> {
    let board = world.board()?.clone();
    let card = run_async(
        world
            .cards
            .add_card(&board, AddCardRequest::new(column, title)),
    )
    .wrap_err("add card for scenario")?;
    world.card = Some(card);
    Ok(())
}

#[given(r#"the card has been blocked by "{blocked_by}" because "{reason}""#)]
fn card_has_been_blocked(
    world: &mut BlockedWorkflowWorld,
    blocked_by: String,
    reason: String,
) -> Result<(), eyre::Report> {
    let board = world.board()?.clone();
    let request = MoveCardRequest::new(world.card()?.id(), "blocked", UserKey::new("scenario"))
        .with_block(Some(blocked_by), Some(reason));
    let moved = run_async(world.cards.move_card(&board, request))
        .wrap_err("block card in scenario setup")?;
    world.blocked_since_before = moved.card.blocked().map(|state| state.since());
    world.card = Some(moved.card);
    Ok(())
}
