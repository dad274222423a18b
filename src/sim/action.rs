//! Discrete actions issued by behaviors and the executor that steps them
//!
//! Each entity owns a FIFO [`ActionQueue`]. Only the head action is stepped;
//! it is popped when its stepping function reports completion.

use std::collections::VecDeque;

use glam::Vec2;

use super::ai_person::AiPerson;
use crate::error::{Result, SimError};

/// Discriminant of [`Action`], used to look up stepping functions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    WalkTo,
}

impl ActionKind {
    pub const COUNT: usize = 1;

    #[inline]
    fn index(self) -> usize {
        match self {
            ActionKind::WalkTo => 0,
        }
    }
}

/// A resumable unit of work
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Walk in a straight line to an absolute world position
    WalkTo { target: Vec2 },
}

impl Action {
    pub fn walk_to(x: f32, y: f32) -> Self {
        Action::WalkTo {
            target: Vec2::new(x, y),
        }
    }

    pub fn kind(&self) -> ActionKind {
        match self {
            Action::WalkTo { .. } => ActionKind::WalkTo,
        }
    }
}

/// Pending actions of one entity, oldest first
#[derive(Debug, Clone, Default)]
pub struct ActionQueue {
    actions: VecDeque<Action>,
}

impl ActionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, action: Action) {
        self.actions.push_back(action);
    }

    pub fn head(&self) -> Option<&Action> {
        self.actions.front()
    }

    pub fn pop_head(&mut self) -> Option<Action> {
        self.actions.pop_front()
    }

    pub fn clear(&mut self) {
        self.actions.clear();
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Action> {
        self.actions.iter()
    }
}

/// Steps one action for one frame; returns true when the action is done
pub type ActionHandler = fn(me: &mut AiPerson, dt_ms: f32, action: &Action) -> bool;

/// Dispatch table from action kind to stepping function
pub struct ActionExecutor {
    handlers: [Option<ActionHandler>; ActionKind::COUNT],
}

impl Default for ActionExecutor {
    fn default() -> Self {
        let mut executor = Self::empty();
        executor.register(ActionKind::WalkTo, walk_to);
        executor
    }
}

impl ActionExecutor {
    /// Table with no handlers registered
    pub fn empty() -> Self {
        Self {
            handlers: [None; ActionKind::COUNT],
        }
    }

    pub fn register(&mut self, kind: ActionKind, handler: ActionHandler) {
        self.handlers[kind.index()] = Some(handler);
    }

    /// Step the head action of `me`, popping it on completion.
    ///
    /// Returns `Ok(false)` for an empty queue.
    pub fn step_head(&self, me: &mut AiPerson, dt_ms: f32) -> Result<bool> {
        let Some(action) = me.actions().head().copied() else {
            return Ok(false);
        };
        let handler = self.handlers[action.kind().index()]
            .ok_or(SimError::MissingAction(action.kind()))?;

        let done = handler(me, dt_ms, &action);
        if done {
            me.actions_mut().pop_head();
        }
        Ok(done)
    }
}

/// Straight-line walk that snaps onto the target once within one step
pub fn walk_to(me: &mut AiPerson, dt_ms: f32, action: &Action) -> bool {
    let Action::WalkTo { target } = *action;

    let to_target = target - me.person.position;
    let squared_distance = to_target.length_squared();
    let max_step = (me.speed * dt_ms).max(0.0);

    // Also covers zero remaining distance, so nothing below divides by zero
    if squared_distance <= max_step * max_step {
        me.person.position = target;
        return true;
    }

    let direction = to_target / squared_distance.sqrt();
    me.person.position += direction * max_step;
    me.person.look_at(target);
    false
}
