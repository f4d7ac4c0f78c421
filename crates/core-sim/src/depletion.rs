use serde::{Deserialize, Serialize};

/// Whether the active index is free to move or held at a range boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Freeze {
    InRange,
    FrozenAbove,
    FrozenBelow,
}

/// Active bin index plus its freeze flag. Persists across pause/resume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveState {
    pub active_id: i32,
    pub freeze: Freeze,
}

impl ActiveState {
    pub fn new(active_id: i32) -> Self {
        Self {
            active_id,
            freeze: Freeze::InRange,
        }
    }

    pub fn is_frozen(&self) -> bool {
        self.freeze != Freeze::InRange
    }
}

/// Outcome of applying one proposed index move under the depletion policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub state: ActiveState,
    /// The index actually changed; the driver recomputes the price.
    pub moved: bool,
    /// The volatility accumulator must be updated with the attempted delta.
    /// True on every actual crossing and on the event that enters a freeze,
    /// false on frozen no-op events.
    pub update_volatility: bool,
}

/// Stateless form of the policy: where a signed move lands, and whether it
/// froze, without freeze-direction memory.
pub fn next_id_with_depletion(
    current_id: i32,
    delta: i32,
    left: i32,
    right: i32,
    force_depletion: bool,
) -> (i32, bool) {
    let next_id = current_id + delta;
    if !force_depletion {
        return (next_id, false);
    }
    let in_range = |id: i32| id >= left && id <= right;
    if in_range(next_id) {
        return (next_id, false);
    }
    (current_id, true)
}

/// Applies one trade event's signed index delta to `state` against the
/// configured range `[left, right]`.
///
/// With `force_depletion` off the index always moves. With it on, the move is
/// refused at a range exit: the index stays put, the freeze direction is
/// recorded, and the accumulator still sees the attempted delta for that
/// crossing event. Subsequent events while frozen are no-ops until one
/// proposes an index back inside the range. An index that starts outside the
/// range freezes immediately, inferring its direction, without an
/// accumulator update.
pub fn apply_move(
    state: ActiveState,
    delta: i32,
    left: i32,
    right: i32,
    force_depletion: bool,
) -> Transition {
    let next_id = state.active_id + delta;
    let in_range = |id: i32| id >= left && id <= right;

    if !force_depletion {
        return Transition {
            state: ActiveState::new(next_id),
            moved: true,
            update_volatility: true,
        };
    }

    if state.is_frozen() {
        if in_range(next_id) {
            return Transition {
                state: ActiveState::new(next_id),
                moved: true,
                update_volatility: true,
            };
        }
        return Transition {
            state,
            moved: false,
            update_volatility: false,
        };
    }

    if in_range(state.active_id) {
        if in_range(next_id) {
            return Transition {
                state: ActiveState::new(next_id),
                moved: true,
                update_volatility: true,
            };
        }
        let freeze = if next_id > right {
            Freeze::FrozenAbove
        } else {
            Freeze::FrozenBelow
        };
        return Transition {
            state: ActiveState {
                active_id: state.active_id,
                freeze,
            },
            moved: false,
            update_volatility: true,
        };
    }

    // Configured start already outside the range: freeze in place.
    let freeze = if state.active_id < left {
        Freeze::FrozenBelow
    } else {
        Freeze::FrozenAbove
    };
    Transition {
        state: ActiveState {
            active_id: state.active_id,
            freeze,
        },
        moved: false,
        update_volatility: false,
    }
}
