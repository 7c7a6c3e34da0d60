use crate::{Action, ActionKind, DuelEvent, DuelState, Phase, Side};

pub fn advance_phase(phase: Phase) -> Phase {
    phase.next()
}

/// Applies one action and returns the resulting state.
///
/// Rejections (drawing outside the draw phase, unknown kinds) are recorded in
/// the log and leave everything else as it was. Calls against the same duel
/// must be serialized by the caller.
pub fn apply_action(mut state: DuelState, action: &Action) -> DuelState {
    tracing::debug!(
        duel = %state.duel_id(),
        kind = action.kind.keyword(),
        actor = %action.actor,
        phase = %state.phase,
        "apply action"
    );
    match &action.kind {
        ActionKind::EndPhase => end_phase(&mut state),
        ActionKind::DrawStep => draw_step(&mut state),
        ActionKind::Unrecognized(kind) => {
            tracing::debug!(duel = %state.duel_id(), kind = %kind, "unrecognized action");
            state.record(DuelEvent::UnknownAction);
        }
    }
    state
}

fn end_phase(state: &mut DuelState) {
    let from = state.phase;
    let to = advance_phase(from);
    state.phase = to;
    state.record(DuelEvent::PhaseChanged { from, to });
    if from == Phase::End && to == Phase::Draw {
        state.turn += 1;
        state.active = state.active.other();
        state.record(DuelEvent::TurnStarted {
            turn: state.turn,
            active: state.active,
        });
    }
}

fn draw_step(state: &mut DuelState) {
    if state.phase != Phase::Draw {
        state.record(DuelEvent::DrawRejected { phase: state.phase });
        return;
    }
    // Always the active side, whoever asked.
    let side = state.active;
    draw(state, side, 1);
    state.record(DuelEvent::CardsDrawn { side, count: 1 });
}

/// Moves up to `count` cards from the front of `side`'s deck to the end of
/// its hand. An empty deck logs a deck-out and stops the remaining draws.
pub fn draw(state: &mut DuelState, side: Side, count: usize) {
    for _ in 0..count {
        let player = state.side_mut(side);
        if player.deck.is_empty() {
            let name = player.name().to_string();
            state.record(DuelEvent::DeckOut { name });
            return;
        }
        let card = player.deck.remove(0);
        player.hand.push(card);
    }
}
