//! Fighting styles.
//!
//! A style owns only its aim timer and tuning; everything else lives on the
//! [`Brain`] it is handed each tick.

use crate::creature::Brain;
use crate::event::SimEvent;
use crate::projectile::{aim_projectile, LaunchRequest, DEFAULT_LAUNCH_POWER};
use crate::sim::TickContext;
use natural_core::EntityId;
use natural_physics::DVec3;
use std::fmt;
use tracing::debug;

/// Ranged creatures back off from targets closer than this.
pub const RETREAT_DISTANCE: f64 = 5.0;
/// Default ticks between melee re-aims.
pub const DEFAULT_MELEE_AIM_FLEXIBILITY: u64 = 5;
/// Default ticks between ranged re-aims.
pub const DEFAULT_RANGED_AIM_FLEXIBILITY: u64 = 10;

/// Per-tick fight decision.
pub trait BehaviorStyle: fmt::Debug {
    /// Short label for logs and reports.
    fn label(&self) -> &'static str;

    /// Ticks between orientation snaps toward the target.
    fn aim_flexibility(&self) -> u64;

    /// Aim, move and attack for one tick.
    fn on_fight_update(&mut self, brain: &mut Brain, ctx: &mut TickContext<'_>, tick_diff: u64);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct AimTimer {
    flexibility: u64,
    elapsed: u64,
}

impl AimTimer {
    // Starts full so the first update after acquiring a target aims at once.
    fn new(flexibility: u64) -> Self {
        Self {
            flexibility,
            elapsed: flexibility,
        }
    }

    fn advance(&mut self, tick_diff: u64) -> bool {
        self.elapsed += tick_diff;
        if self.elapsed < self.flexibility {
            return false;
        }
        self.elapsed -= self.flexibility;
        true
    }
}

/// Walks at the target and swings whenever in reach.
#[derive(Debug, Clone)]
pub struct MeleeStyle {
    aim: AimTimer,
}

impl MeleeStyle {
    pub fn new(aim_flexibility: u64) -> Self {
        Self {
            aim: AimTimer::new(aim_flexibility),
        }
    }
}

impl Default for MeleeStyle {
    fn default() -> Self {
        Self::new(DEFAULT_MELEE_AIM_FLEXIBILITY)
    }
}

impl BehaviorStyle for MeleeStyle {
    fn label(&self) -> &'static str {
        "melee"
    }

    fn aim_flexibility(&self) -> u64 {
        self.aim.flexibility
    }

    fn on_fight_update(&mut self, brain: &mut Brain, ctx: &mut TickContext<'_>, tick_diff: u64) {
        let Some(target) = brain.current_target(ctx.world) else {
            return;
        };
        let lift = DVec3::new(0.0, 0.5, 0.0);
        let (Some(position), Some(goal)) = (
            ctx.world.get(brain.id()).map(|body| body.position + lift),
            ctx.world.get(target).map(|body| body.position + lift),
        ) else {
            return;
        };

        let heading = brain.walk_to(ctx.world, ctx.math, goal, true);
        if self.aim.advance(tick_diff) {
            let angle = match (brain.path_provider().is_some(), heading) {
                (true, Some(dir)) => ctx
                    .math
                    .angle_horizontal(position, position + DVec3::new(dir.x, 0.0, dir.y)),
                _ => ctx.math.angle(position, goal),
            };
            brain.set_rotation(ctx.world, angle.yaw, angle.pitch);
        }

        brain.try_attack_entity(ctx, target);
    }
}

/// Keeps its distance and shoots.
#[derive(Debug, Clone)]
pub struct RangedStyle {
    aim: AimTimer,
    launch_power: f64,
}

impl RangedStyle {
    pub fn new(aim_flexibility: u64, launch_power: f64) -> Self {
        Self {
            aim: AimTimer::new(aim_flexibility),
            launch_power,
        }
    }

    pub fn launch_power(&self) -> f64 {
        self.launch_power
    }

    fn fire(&self, brain: &Brain, ctx: &mut TickContext<'_>, target: EntityId, from: DVec3, at: DVec3) {
        let (angle, velocity) = aim_projectile(ctx.math, from, at, self.launch_power);
        brain.set_rotation(ctx.world, angle.yaw, angle.pitch);
        let damage = ctx.world.get(brain.id()).map_or(0.0, |body| body.attack_damage);
        debug!(creature = brain.id().0, target = target.0, "projectile launched");
        ctx.emit(SimEvent::ProjectileLaunched(LaunchRequest {
            owner: brain.id(),
            target,
            origin: from,
            yaw: angle.yaw,
            pitch: angle.pitch,
            velocity,
            damage,
            critical: true,
        }));
    }
}

impl Default for RangedStyle {
    fn default() -> Self {
        Self::new(DEFAULT_RANGED_AIM_FLEXIBILITY, DEFAULT_LAUNCH_POWER)
    }
}

impl BehaviorStyle for RangedStyle {
    fn label(&self) -> &'static str {
        "ranged"
    }

    fn aim_flexibility(&self) -> u64 {
        self.aim.flexibility
    }

    fn on_fight_update(&mut self, brain: &mut Brain, ctx: &mut TickContext<'_>, tick_diff: u64) {
        let Some(target) = brain.current_target(ctx.world) else {
            return;
        };
        let (Some(me), Some(them)) = (ctx.world.get(brain.id()), ctx.world.get(target)) else {
            return;
        };
        let eye = me.eye_pos();
        let target_eye = them.eye_pos();
        let gap = ctx.math.distance_to_aabb(eye, &them.bounding_box());
        let separation = me.distance_to(them);

        if self.aim.advance(tick_diff) {
            brain.look_at(ctx.world, ctx.math, target_eye);
        }
        if brain.aggro.is_cooling_down() {
            return;
        }

        if gap <= brain.attack_range() {
            if separation < RETREAT_DISTANCE {
                brain.walk_backward(ctx.world, ctx.math);
            }
            self.fire(brain, ctx, target, eye, target_eye);
            brain
                .aggro
                .set_post_attack_cooldown(brain.additional_cooldown.floored());
        } else {
            brain.walk_forward(ctx.world, ctx.math, true);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aim_timer_fires_on_cadence_and_keeps_overflow() {
        let mut timer = AimTimer::new(3);
        assert!(timer.advance(1), "starts ready");
        assert_eq!(timer.elapsed, 1);
        assert!(!timer.advance(1));
        assert!(timer.advance(1));
        assert_eq!(timer.elapsed, 0);
        assert!(timer.advance(4));
        assert_eq!(timer.elapsed, 1);
    }

    #[test]
    fn zero_flexibility_aims_every_tick() {
        let mut timer = AimTimer::new(0);
        for _ in 0..5 {
            assert!(timer.advance(1));
        }
    }

    #[test]
    fn labels() {
        assert_eq!(MeleeStyle::default().label(), "melee");
        assert_eq!(RangedStyle::default().aim_flexibility(), DEFAULT_RANGED_AIM_FLEXIBILITY);
        assert_eq!(RangedStyle::default().launch_power(), DEFAULT_LAUNCH_POWER);
    }
}
