//! Pluggable decision logic for autonomous entities
//!
//! A behavior observes its entity and the tunables, and appends actions to the
//! entity's queue. It never moves the entity itself; the action executor does.

use std::f32::consts::TAU;

use rand::{Rng, RngCore};

use super::Transition;
use super::action::{Action, ActionQueue};
use super::person::Person;
use crate::polar_to_cartesian;
use crate::rand_between;
use crate::tunables::Variables;

/// Shared, read-mostly inputs for behavior decisions
pub struct BehaviorContext<'a> {
    pub variables: &'a Variables,
    pub rng: &'a mut dyn RngCore,
}

pub trait Behavior {
    fn name(&self) -> &'static str;

    /// Runs after this behavior becomes active
    fn enter(&mut self, _me: &Person, _ctx: &mut BehaviorContext<'_>) {}

    /// Runs before this behavior is replaced
    fn exit(&mut self, _me: &Person, _ctx: &mut BehaviorContext<'_>) {}

    /// Decide for this frame. Returning `Switch` replaces the behavior.
    fn update(
        &mut self,
        me: &Person,
        actions: &mut ActionQueue,
        dt_ms: f32,
        ctx: &mut BehaviorContext<'_>,
    ) -> Transition<Box<dyn Behavior>>;
}

/// Does nothing; the entity stands still once its queue drains
#[derive(Debug, Default)]
pub struct IdleBehavior;

impl Behavior for IdleBehavior {
    fn name(&self) -> &'static str {
        "idle"
    }

    fn update(
        &mut self,
        _me: &Person,
        _actions: &mut ActionQueue,
        _dt_ms: f32,
        _ctx: &mut BehaviorContext<'_>,
    ) -> Transition<Box<dyn Behavior>> {
        Transition::Stay
    }
}

/// Interval and distance bounds for wandering
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WanderParams {
    pub min_interval_ms: f32,
    pub max_interval_ms: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl WanderParams {
    pub fn from_variables(variables: &Variables) -> Self {
        Self {
            min_interval_ms: variables.civilian_wander_min_ms.get(),
            max_interval_ms: variables.civilian_wander_max_ms.get(),
            min_distance: variables.civilian_wander_min_dist.get(),
            max_distance: variables.civilian_wander_max_dist.get(),
        }
    }
}

/// Where a wander behavior takes its bounds from
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WanderSource {
    /// Read the civilian wander tunables at every decision
    Tunables,
    Fixed(WanderParams),
}

/// Walk to a random nearby point every few seconds
#[derive(Debug, Clone)]
pub struct WanderBehavior {
    source: WanderSource,
    to_next_walk_ms: f32,
}

impl WanderBehavior {
    pub fn new(source: WanderSource) -> Self {
        Self {
            source,
            to_next_walk_ms: 0.0,
        }
    }

    /// Wanders with bounds taken live from the tunables
    pub fn from_tunables() -> Self {
        Self::new(WanderSource::Tunables)
    }

    pub fn to_next_walk_ms(&self) -> f32 {
        self.to_next_walk_ms
    }

    fn params(&self, variables: &Variables) -> WanderParams {
        match self.source {
            WanderSource::Tunables => WanderParams::from_variables(variables),
            WanderSource::Fixed(params) => params,
        }
    }
}

impl Behavior for WanderBehavior {
    fn name(&self) -> &'static str {
        "wander"
    }

    fn enter(&mut self, _me: &Person, ctx: &mut BehaviorContext<'_>) {
        let params = self.params(ctx.variables);
        self.to_next_walk_ms =
            rand_between(ctx.rng, params.min_interval_ms, params.max_interval_ms);
    }

    fn update(
        &mut self,
        me: &Person,
        actions: &mut ActionQueue,
        dt_ms: f32,
        ctx: &mut BehaviorContext<'_>,
    ) -> Transition<Box<dyn Behavior>> {
        self.to_next_walk_ms -= dt_ms;
        if self.to_next_walk_ms > 0.0 {
            return Transition::Stay;
        }

        let params = self.params(ctx.variables);
        // Overshoot carries into the next countdown
        self.to_next_walk_ms +=
            rand_between(ctx.rng, params.min_interval_ms, params.max_interval_ms);

        let direction = ctx.rng.random::<f32>() * TAU;
        let distance = rand_between(ctx.rng, params.min_distance, params.max_distance);
        let target = me.position + polar_to_cartesian(distance, direction);
        log::debug!(
            "wander: ({:.1}, {:.1}) -> ({:.1}, {:.1}), next in {:.0}ms",
            me.position.x,
            me.position.y,
            target.x,
            target.y,
            self.to_next_walk_ms
        );
        actions.push(Action::WalkTo { target });
        Transition::Stay
    }
}
