//! Autonomous entities: a person driven by a behavior and an action queue

use super::Transition;
use super::action::{Action, ActionExecutor, ActionQueue};
use super::behavior::{Behavior, BehaviorContext};
use super::person::Person;
use crate::error::Result;

/// A person that decides for itself
pub struct AiPerson {
    pub person: Person,
    /// Units per millisecond
    pub speed: f32,
    actions: ActionQueue,
    behavior: Option<Box<dyn Behavior>>,
}

impl AiPerson {
    pub fn new(person: Person, speed: f32) -> Self {
        Self {
            person,
            speed,
            actions: ActionQueue::new(),
            behavior: None,
        }
    }

    pub fn actions(&self) -> &ActionQueue {
        &self.actions
    }

    pub fn actions_mut(&mut self) -> &mut ActionQueue {
        &mut self.actions
    }

    /// Append to the tail of the queue
    pub fn enqueue(&mut self, action: Action) {
        self.actions.push(action);
    }

    pub fn behavior_name(&self) -> Option<&'static str> {
        self.behavior.as_ref().map(|b| b.name())
    }

    /// Replace the active behavior.
    ///
    /// The old behavior exits, its pending actions are dropped, then the new
    /// behavior enters.
    pub fn set_behavior(&mut self, mut next: Box<dyn Behavior>, ctx: &mut BehaviorContext<'_>) {
        if let Some(old) = self.behavior.as_mut() {
            old.exit(&self.person, ctx);
            log::debug!("behavior {} -> {}", old.name(), next.name());
        }
        self.actions.clear();
        next.enter(&self.person, ctx);
        self.behavior = Some(next);
    }

    /// One frame: decide, then step the head action
    pub fn update(
        &mut self,
        dt_ms: f32,
        executor: &ActionExecutor,
        ctx: &mut BehaviorContext<'_>,
    ) -> Result<()> {
        let transition = match self.behavior.as_mut() {
            Some(behavior) => behavior.update(&self.person, &mut self.actions, dt_ms, ctx),
            None => Transition::Stay,
        };
        if let Transition::Switch(next) = transition {
            self.set_behavior(next, ctx);
        }

        executor.step_head(self, dt_ms)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::Texture;
    use crate::sim::behavior::{IdleBehavior, WanderBehavior, WanderParams, WanderSource};
    use crate::sim::person::Appearance;
    use crate::tunables::Variables;
    use glam::Vec2;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<String>>>;

    /// Records lifecycle calls and the queue length seen at each
    struct Recorder {
        name: &'static str,
        log: Log,
        switch_to: Option<Box<dyn Behavior>>,
    }

    impl Behavior for Recorder {
        fn name(&self) -> &'static str {
            self.name
        }

        fn enter(&mut self, _me: &Person, _ctx: &mut BehaviorContext<'_>) {
            self.log.borrow_mut().push(format!("{}.enter", self.name));
        }

        fn exit(&mut self, _me: &Person, _ctx: &mut BehaviorContext<'_>) {
            self.log.borrow_mut().push(format!("{}.exit", self.name));
        }

        fn update(
            &mut self,
            _me: &Person,
            actions: &mut ActionQueue,
            _dt_ms: f32,
            _ctx: &mut BehaviorContext<'_>,
        ) -> Transition<Box<dyn Behavior>> {
            self.log
                .borrow_mut()
                .push(format!("{}.update({})", self.name, actions.len()));
            match self.switch_to.take() {
                Some(next) => Transition::Switch(next),
                None => Transition::Stay,
            }
        }
    }

    fn civilian() -> AiPerson {
        AiPerson::new(
            Person::new(
                Appearance {
                    body: Texture::Citizen,
                    hand: None,
                },
                Vec2::ZERO,
                32.0,
            ),
            1.0,
        )
    }

    /// Logs its entry and the queue length seen by its first update
    struct CheckQueue {
        seen: Rc<RefCell<Option<usize>>>,
        log: Log,
    }

    impl Behavior for CheckQueue {
        fn name(&self) -> &'static str {
            "next"
        }

        fn enter(&mut self, _me: &Person, _ctx: &mut BehaviorContext<'_>) {
            self.log.borrow_mut().push("next.enter".to_string());
        }

        fn update(
            &mut self,
            _me: &Person,
            actions: &mut ActionQueue,
            _dt_ms: f32,
            _ctx: &mut BehaviorContext<'_>,
        ) -> Transition<Box<dyn Behavior>> {
            self.seen.borrow_mut().get_or_insert(actions.len());
            Transition::Stay
        }
    }

    #[test]
    fn test_assigning_behavior_exits_clears_then_enters() {
        let vars = Variables::default();
        let mut rng = Pcg32::seed_from_u64(5);
        let mut ctx = BehaviorContext {
            variables: &vars,
            rng: &mut rng,
        };
        let params = WanderParams {
            min_interval_ms: 1.0,
            max_interval_ms: 1.0,
            min_distance: 100.0,
            max_distance: 100.0,
        };
        let executor = ActionExecutor::default();

        let mut me = civilian();
        me.set_behavior(
            Box::new(WanderBehavior::new(WanderSource::Fixed(params))),
            &mut ctx,
        );
        me.update(10.0, &executor, &mut ctx).unwrap();
        me.update(10.0, &executor, &mut ctx).unwrap();
        assert_eq!(me.behavior_name(), Some("wander"));
        assert_eq!(me.actions().len(), 2);

        let seen = Rc::new(RefCell::new(None));
        let log: Log = Rc::default();
        me.set_behavior(
            Box::new(CheckQueue {
                seen: seen.clone(),
                log: log.clone(),
            }),
            &mut ctx,
        );
        assert_eq!(*log.borrow(), vec!["next.enter"]);
        assert!(me.actions().is_empty());
        assert_eq!(me.behavior_name(), Some("next"));

        let before = me.person.position;
        me.update(16.0, &executor, &mut ctx).unwrap();
        assert_eq!(*seen.borrow(), Some(0));
        // Nothing left to walk
        assert_eq!(me.person.position, before);
    }

    #[test]
    fn test_switch_returned_from_update() {
        let vars = Variables::default();
        let mut rng = Pcg32::seed_from_u64(6);
        let mut ctx = BehaviorContext {
            variables: &vars,
            rng: &mut rng,
        };
        let log: Log = Rc::default();

        let mut me = civilian();
        let second = Recorder {
            name: "b",
            log: log.clone(),
            switch_to: None,
        };
        me.set_behavior(
            Box::new(Recorder {
                name: "a",
                log: log.clone(),
                switch_to: Some(Box::new(second)),
            }),
            &mut ctx,
        );
        me.enqueue(Action::walk_to(100.0, 0.0));

        me.update(10.0, &ActionExecutor::default(), &mut ctx).unwrap();
        assert_eq!(
            *log.borrow(),
            vec!["a.enter", "a.update(1)", "a.exit", "b.enter"]
        );
        // The stale walk was dropped before stepping
        assert_eq!(me.person.position, Vec2::ZERO);
        assert_eq!(me.behavior_name(), Some("b"));
    }

    #[test]
    fn test_decision_applies_before_step_in_same_frame() {
        let vars = Variables::default();
        let mut rng = Pcg32::seed_from_u64(7);
        let mut ctx = BehaviorContext {
            variables: &vars,
            rng: &mut rng,
        };
        let params = WanderParams {
            min_interval_ms: 1.0,
            max_interval_ms: 1.0,
            min_distance: 100.0,
            max_distance: 100.0,
        };
        let mut me = civilian();
        me.set_behavior(
            Box::new(WanderBehavior::new(WanderSource::Fixed(params))),
            &mut ctx,
        );

        me.update(10.0, &ActionExecutor::default(), &mut ctx).unwrap();
        // Walk issued and stepped 10 units in the same frame
        assert!((me.person.position.length() - 10.0).abs() < 1e-3);
        assert_eq!(me.actions().len(), 1);
    }

    #[test]
    fn test_no_behavior_still_steps_actions() {
        let vars = Variables::default();
        let mut rng = Pcg32::seed_from_u64(8);
        let mut ctx = BehaviorContext {
            variables: &vars,
            rng: &mut rng,
        };
        let mut me = civilian();
        me.enqueue(Action::walk_to(5.0, 0.0));
        me.update(10.0, &ActionExecutor::default(), &mut ctx).unwrap();
        assert_eq!(me.person.position, Vec2::new(5.0, 0.0));

        me.set_behavior(Box::new(IdleBehavior), &mut ctx);
        me.update(10.0, &ActionExecutor::default(), &mut ctx).unwrap();
        assert_eq!(me.behavior_name(), Some("idle"));
    }
}
