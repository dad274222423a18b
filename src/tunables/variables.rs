//! The named tunables shared by the simulation and the panel

use super::{RangeVariable, Tunable};
use crate::settings::Settings;

/// Process-scoped registry of every tunable.
///
/// Created once at startup and shared through `Rc<Variables>`.
pub struct Variables {
    pub player_speed: RangeVariable,
    pub hand_offset: RangeVariable,

    pub stage_width: RangeVariable,
    pub stage_height: RangeVariable,

    pub civilian_speed: RangeVariable,
    pub civilian_wander_min_ms: RangeVariable,
    pub civilian_wander_max_ms: RangeVariable,
    pub civilian_wander_min_dist: RangeVariable,
    pub civilian_wander_max_dist: RangeVariable,
}

impl Default for Variables {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

impl Variables {
    /// Settings values become each tunable's default
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            player_speed: RangeVariable::new("playerSpeed", settings.player_speed),
            hand_offset: RangeVariable::new("handOffset", settings.hand_offset),
            stage_width: RangeVariable::new("stageWidth", settings.stage_width),
            stage_height: RangeVariable::new("stageHeight", settings.stage_height),
            civilian_speed: RangeVariable::new("civilianSpeed", settings.civilian_speed),
            civilian_wander_min_ms: RangeVariable::new(
                "civilianWanderMinMS",
                settings.civilian_wander_min_ms,
            ),
            civilian_wander_max_ms: RangeVariable::new(
                "civilianWanderMaxMS",
                settings.civilian_wander_max_ms,
            ),
            civilian_wander_min_dist: RangeVariable::new(
                "civilianWanderMinDist",
                settings.civilian_wander_min_dist,
            ),
            civilian_wander_max_dist: RangeVariable::new(
                "civilianWanderMaxDist",
                settings.civilian_wander_max_dist,
            ),
        }
    }

    /// All tunables in panel order
    pub fn entries(&self) -> [&dyn Tunable; 9] {
        [
            &self.player_speed,
            &self.hand_offset,
            &self.stage_width,
            &self.stage_height,
            &self.civilian_speed,
            &self.civilian_wander_min_ms,
            &self.civilian_wander_max_ms,
            &self.civilian_wander_min_dist,
            &self.civilian_wander_max_dist,
        ]
    }

    pub fn find(&self, name: &str) -> Option<&dyn Tunable> {
        self.entries().into_iter().find(|t| t.name() == name)
    }

    pub fn reset_all(&self) {
        for tunable in self.entries() {
            tunable.reset();
        }
    }

    /// Current values as settings, keeping `seed`
    pub fn snapshot(&self, seed: u64) -> Settings {
        Settings {
            seed,
            player_speed: self.player_speed.get(),
            hand_offset: self.hand_offset.get(),
            stage_width: self.stage_width.get(),
            stage_height: self.stage_height.get(),
            civilian_speed: self.civilian_speed.get(),
            civilian_wander_min_ms: self.civilian_wander_min_ms.get(),
            civilian_wander_max_ms: self.civilian_wander_max_ms.get(),
            civilian_wander_min_dist: self.civilian_wander_min_dist.get(),
            civilian_wander_max_dist: self.civilian_wander_max_dist.get(),
        }
    }
}
