//! Enemy behaviour states.
//!
//! One state set serves every archetype. Detection ranges, attack kind,
//! cooldowns and whether a stun exists at all come from the archetype's
//! [`EnemyDefinition`].

use bevy::prelude::*;

use super::components::EnemyKit;
use super::data::{AttackKind, EnemyDefinition, StunConfig};
use crate::actor::{Actor, Effect, Faction, Hit, HitKind, ProjectileSpec, SoundId, Target, WorldQuery};
use crate::fsm::{AnimationEvent, Scope, State, StateSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnemyState {
    Idle,
    Move,
    Battle,
    Attack,
    Stunned,
    Dead,
}

/// Everything an enemy state may read or write during one call.
pub struct EnemyCtx<'a> {
    pub actor: &'a mut Actor,
    pub kit: &'a mut EnemyKit,
    pub definition: &'a EnemyDefinition,
    pub world: &'a dyn WorldQuery,
}

#[derive(Debug)]
pub struct EnemyStates {
    pub idle: IdleState,
    pub moving: PatrolState,
    pub battle: BattleState,
    pub attack: AttackState,
    /// Absent for archetypes that cannot be countered.
    pub stunned: Option<StunnedState>,
    pub dead: DeadState,
}

impl EnemyStates {
    pub fn new(definition: &EnemyDefinition) -> Self {
        Self {
            idle: IdleState,
            moving: PatrolState,
            battle: BattleState,
            attack: AttackState::default(),
            stunned: definition.stun.map(StunnedState::new),
            dead: DeadState,
        }
    }
}

impl<'a> StateSet<EnemyState, EnemyCtx<'a>> for EnemyStates {
    fn state_mut(&mut self, key: EnemyState) -> Option<&mut dyn State<EnemyState, EnemyCtx<'a>>> {
        match key {
            EnemyState::Idle => Some(&mut self.idle),
            EnemyState::Move => Some(&mut self.moving),
            EnemyState::Battle => Some(&mut self.battle),
            EnemyState::Attack => Some(&mut self.attack),
            EnemyState::Stunned => self
                .stunned
                .as_mut()
                .map(|s| s as &mut dyn State<EnemyState, EnemyCtx<'a>>),
            EnemyState::Dead => Some(&mut self.dead),
        }
    }

    fn is_terminal(&self, key: EnemyState) -> bool {
        key == EnemyState::Dead
    }
}

/// The live player, if it is close enough to notice.
///
/// Noticed from any side inside the aggro radius, and along the facing
/// direction up to the detection range.
fn spot_player(ctx: &EnemyCtx) -> Option<Target> {
    let player = ctx.world.player().filter(|p| p.alive)?;
    let own = ctx.actor.body.position;
    let offset = player.position - own;

    if offset.length() <= ctx.definition.aggro_radius {
        return Some(player);
    }
    let ahead = offset.x * ctx.actor.facing() > 0.0;
    let level = offset.y.abs() <= ctx.definition.size.1;
    (ahead && level && offset.x.abs() <= ctx.definition.detection_range).then_some(player)
}

/// Stop horizontally, keep falling.
fn halt(actor: &mut Actor) {
    let vy = actor.velocity().y;
    actor.set_velocity(0.0, vy);
}

/// Close the counter window and hide its cue.
fn close_counter_window(ctx: &mut EnemyCtx) {
    if ctx.kit.set_counter_open(false) {
        ctx.actor.emit(Effect::CounterCue(false));
    }
}

/// Standing still for a jittered pause between patrol legs.
#[derive(Debug, Default)]
pub struct IdleState;

impl<'a> State<EnemyState, EnemyCtx<'a>> for IdleState {
    fn enter(&mut self, scope: &mut Scope<'_, EnemyState>, ctx: &mut EnemyCtx<'a>) {
        let jitter = ctx.definition.idle_jitter;
        let pause = ctx.definition.idle_time + ctx.kit.roll((0.0, jitter));
        scope.set_timer(pause);
        halt(ctx.actor);
    }

    fn update(&mut self, scope: &mut Scope<'_, EnemyState>, ctx: &mut EnemyCtx<'a>) {
        halt(ctx.actor);
        if spot_player(ctx).is_some() {
            scope.change_state(EnemyState::Battle);
        } else if scope.timer_elapsed() {
            scope.change_state(EnemyState::Move);
        }
    }
}

/// Walks along the facing direction and turns around at walls, ledges and
/// patrol bounds.
#[derive(Debug, Default)]
pub struct PatrolState;

impl PatrolState {
    fn at_boundary(ctx: &EnemyCtx) -> bool {
        let body = &ctx.actor.body;
        if body.wall_ahead || (body.grounded && !body.ground_ahead) {
            return true;
        }
        let facing = ctx.actor.facing();
        ctx.definition.patrol.is_some_and(|(min, max)| {
            facing > 0.0 && body.position.x >= max || facing < 0.0 && body.position.x <= min
        })
    }
}

impl<'a> State<EnemyState, EnemyCtx<'a>> for PatrolState {
    fn update(&mut self, scope: &mut Scope<'_, EnemyState>, ctx: &mut EnemyCtx<'a>) {
        if spot_player(ctx).is_some() {
            scope.change_state(EnemyState::Battle);
            return;
        }
        if Self::at_boundary(ctx) {
            ctx.actor.flip();
            halt(ctx.actor);
            scope.change_state(EnemyState::Idle);
            return;
        }

        let vy = ctx.actor.velocity().y;
        let speed = ctx.definition.move_speed * ctx.actor.facing();
        ctx.actor.set_velocity(speed, vy);
    }
}

/// Closing in on the player and choosing when to swing.
///
/// Stays engaged for `battle_time` after last seeing the player, and gives
/// up once the player is further than `give_up_distance`.
#[derive(Debug, Default)]
pub struct BattleState;

impl<'a> State<EnemyState, EnemyCtx<'a>> for BattleState {
    fn enter(&mut self, scope: &mut Scope<'_, EnemyState>, ctx: &mut EnemyCtx<'a>) {
        scope.set_timer(ctx.definition.battle_time);
        if ctx.world.player().filter(|p| p.alive).is_none() {
            scope.defer(EnemyState::Move);
        }
    }

    fn update(&mut self, scope: &mut Scope<'_, EnemyState>, ctx: &mut EnemyCtx<'a>) {
        let Some(player) = ctx.world.player().filter(|p| p.alive) else {
            scope.change_state(EnemyState::Move);
            return;
        };

        let dx = player.position.x - ctx.actor.body.position.x;
        let in_range = dx.abs() <= ctx.definition.attack_range;
        if spot_player(ctx).is_some() {
            scope.set_timer(ctx.definition.battle_time);
            if in_range && ctx.kit.can_attack(ctx.actor.now()) {
                scope.change_state(EnemyState::Attack);
                return;
            }
        } else if scope.timer_elapsed() || dx.abs() > ctx.definition.give_up_distance {
            scope.change_state(EnemyState::Idle);
            return;
        }

        if in_range {
            halt(ctx.actor);
            ctx.actor.face(dx);
        } else {
            let vy = ctx.actor.velocity().y;
            ctx.actor.set_velocity(dx.signum() * ctx.definition.battle_speed, vy);
        }
    }
}

/// One swing or shot. The counter window opens and closes on clip markers.
#[derive(Debug, Default)]
pub struct AttackState {
    struck: bool,
}

impl AttackState {
    fn release(&mut self, ctx: &mut EnemyCtx) {
        if self.struck {
            return;
        }
        self.struck = true;

        let facing = ctx.actor.facing();
        let origin = ctx.actor.body.position;
        let damage = ctx.definition.damage;
        match ctx.definition.attack {
            AttackKind::Melee { radius, reach } => {
                let center = origin + Vec2::X * facing * reach;
                for target in ctx.world.overlap_circle(center, radius) {
                    if target.faction != Faction::Player || !target.alive {
                        continue;
                    }
                    ctx.actor.strike(Hit {
                        target: target.entity,
                        damage,
                        kind: HitKind::Strike,
                    });
                }
            }
            AttackKind::Ranged {
                projectile_speed,
                lifetime,
            } => {
                let muzzle = origin + Vec2::X * facing * ctx.definition.half_size().x;
                ctx.actor.emit(Effect::Projectile(ProjectileSpec {
                    origin: muzzle,
                    velocity: Vec2::X * facing * projectile_speed,
                    damage,
                    lifetime,
                    faction: Faction::Enemy,
                }));
            }
        }
        ctx.actor.emit(Effect::Sound(SoundId::Attack));
    }
}

impl<'a> State<EnemyState, EnemyCtx<'a>> for AttackState {
    fn enter(&mut self, _scope: &mut Scope<'_, EnemyState>, ctx: &mut EnemyCtx<'a>) {
        self.struck = false;
        halt(ctx.actor);
        if let Some(player) = ctx.world.player() {
            let dx = player.position.x - ctx.actor.body.position.x;
            ctx.actor.face(dx);
        }
    }

    fn update(&mut self, scope: &mut Scope<'_, EnemyState>, ctx: &mut EnemyCtx<'a>) {
        halt(ctx.actor);
        if scope.trigger_called() {
            scope.change_state(EnemyState::Battle);
        }
    }

    fn exit(&mut self, _scope: &mut Scope<'_, EnemyState>, ctx: &mut EnemyCtx<'a>) {
        close_counter_window(ctx);
        let (now, cooldown) = (ctx.actor.now(), ctx.definition.attack_cooldown);
        ctx.kit.finish_attack(now, cooldown);
    }

    fn on_animation_event(
        &mut self,
        event: AnimationEvent,
        _scope: &mut Scope<'_, EnemyState>,
        ctx: &mut EnemyCtx<'a>,
    ) {
        match event {
            AnimationEvent::OpenCounterWindow => {
                if ctx.definition.can_be_stunned() && ctx.kit.set_counter_open(true) {
                    ctx.actor.emit(Effect::CounterCue(true));
                }
            }
            AnimationEvent::CloseCounterWindow => close_counter_window(ctx),
            AnimationEvent::AttackHit => self.release(ctx),
            AnimationEvent::Finished => {}
        }
    }
}

/// Knocked off balance by a counter. Blinks red until the stun wears off.
#[derive(Debug)]
pub struct StunnedState {
    config: StunConfig,
}

impl StunnedState {
    pub fn new(config: StunConfig) -> Self {
        Self { config }
    }
}

impl<'a> State<EnemyState, EnemyCtx<'a>> for StunnedState {
    fn enter(&mut self, scope: &mut Scope<'_, EnemyState>, ctx: &mut EnemyCtx<'a>) {
        scope.set_timer(self.config.duration);
        close_counter_window(ctx);
        ctx.actor.hold_busy(true);

        let (x, y) = self.config.direction;
        ctx.actor.force_velocity(Vec2::new(x * ctx.kit.stun_direction(), y));
        ctx.actor.emit(Effect::Blink(true));
        ctx.actor.emit(Effect::Sound(SoundId::Stun));
    }

    fn update(&mut self, scope: &mut Scope<'_, EnemyState>, _ctx: &mut EnemyCtx<'a>) {
        if scope.timer_elapsed() {
            scope.change_state(EnemyState::Idle);
        }
    }

    fn exit(&mut self, _scope: &mut Scope<'_, EnemyState>, ctx: &mut EnemyCtx<'a>) {
        ctx.actor.hold_busy(false);
        ctx.actor.emit(Effect::Blink(false));
    }
}

/// Terminal. Drops through the floor and despawns after a delay.
#[derive(Debug, Default)]
pub struct DeadState;

impl<'a> State<EnemyState, EnemyCtx<'a>> for DeadState {
    fn enter(&mut self, _scope: &mut Scope<'_, EnemyState>, ctx: &mut EnemyCtx<'a>) {
        close_counter_window(ctx);
        ctx.actor.hold_busy(true);
        ctx.actor.body.collider_enabled = false;
        ctx.actor.body.scale_gravity(ctx.definition.death_gravity);
        ctx.actor.force_velocity(Vec2::new(0.0, ctx.definition.death_pop));
        ctx.actor.schedule_despawn(ctx.definition.despawn_delay);
        ctx.actor.emit(Effect::Sound(SoundId::Death));
    }

    fn update(&mut self, _scope: &mut Scope<'_, EnemyState>, _ctx: &mut EnemyCtx<'a>) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::Brain;
    use crate::enemies::EnemyBrain;

    const DT: f32 = 1.0 / 60.0;

    /// A player standing at a fixed spot.
    struct PlayerAt {
        position: Vec2,
        alive: bool,
    }

    impl PlayerAt {
        fn target(&self) -> Target {
            Target {
                entity: Entity::from_raw(1),
                position: self.position,
                radius: 16.0,
                faction: Faction::Player,
                alive: self.alive,
                counter_open: false,
            }
        }
    }

    impl WorldQuery for PlayerAt {
        fn overlap_circle(&self, center: Vec2, radius: f32) -> Vec<Target> {
            let target = self.target();
            if target.position.distance(center) <= radius + target.radius {
                vec![target]
            } else {
                Vec::new()
            }
        }

        fn player(&self) -> Option<Target> {
            Some(self.target())
        }
    }

    fn skeleton() -> EnemyBrain {
        let mut brain = EnemyBrain::new(EnemyDefinition::default(), Vec2::ZERO, 3);
        brain.actor_mut().body.grounded = true;
        brain
    }

    fn far_away() -> PlayerAt {
        PlayerAt {
            position: Vec2::new(-2000.0, 0.0),
            alive: true,
        }
    }

    fn run(brain: &mut EnemyBrain, world: &dyn WorldQuery, seconds: f32) {
        let ticks = (seconds / DT).ceil() as usize;
        for _ in 0..ticks {
            brain.tick(DT, world);
        }
    }

    #[test]
    fn idle_pause_leads_to_patrol() {
        let mut brain = skeleton();
        assert_eq!(brain.current(), Some(EnemyState::Idle));
        run(&mut brain, &far_away(), 2.1);
        assert_eq!(brain.current(), Some(EnemyState::Move));
        assert_eq!(brain.actor().velocity().x, 90.0);
    }

    #[test]
    fn patrol_turns_at_ledge() {
        let mut brain = skeleton();
        run(&mut brain, &far_away(), 2.1);
        assert_eq!(brain.current(), Some(EnemyState::Move));

        brain.actor_mut().body.ground_ahead = false;
        brain.tick(DT, &far_away());
        assert_eq!(brain.current(), Some(EnemyState::Idle));
        assert_eq!(brain.actor().facing(), -1.0);
    }

    #[test]
    fn patrol_respects_bounds() {
        let definition = EnemyDefinition {
            patrol: Some((-50.0, 50.0)),
            ..default()
        };
        let mut brain = EnemyBrain::new(definition, Vec2::new(60.0, 0.0), 3);
        brain.actor_mut().body.grounded = true;
        run(&mut brain, &far_away(), 2.1);
        assert_eq!(brain.current(), Some(EnemyState::Idle));
        assert_eq!(brain.actor().facing(), -1.0);
    }

    #[test]
    fn player_ahead_starts_battle_and_attack() {
        let world = PlayerAt {
            position: Vec2::new(40.0, 0.0),
            alive: true,
        };
        let mut brain = skeleton();
        brain.tick(DT, &world);
        assert_eq!(brain.current(), Some(EnemyState::Battle));
        brain.tick(DT, &world);
        assert_eq!(brain.current(), Some(EnemyState::Attack));
    }

    #[test]
    fn player_behind_outside_aggro_is_not_seen() {
        let world = PlayerAt {
            position: Vec2::new(-150.0, 0.0),
            alive: true,
        };
        let mut brain = skeleton();
        brain.tick(DT, &world);
        assert_eq!(brain.current(), Some(EnemyState::Idle));
    }

    #[test]
    fn battle_with_dead_player_defers_to_patrol() {
        let world = PlayerAt {
            position: Vec2::new(40.0, 0.0),
            alive: false,
        };
        let mut brain = skeleton();
        brain.change_state(EnemyState::Battle).unwrap();
        assert_eq!(brain.current(), Some(EnemyState::Battle));
        assert_eq!(brain.machine().pending(), Some(EnemyState::Move));

        brain.tick(DT, &world);
        assert_eq!(brain.current(), Some(EnemyState::Move));
    }

    #[test]
    fn melee_strike_lands_once_per_swing() {
        let world = PlayerAt {
            position: Vec2::new(40.0, 0.0),
            alive: true,
        };
        let mut brain = skeleton();
        run(&mut brain, &world, 2.0 * DT);
        assert_eq!(brain.current(), Some(EnemyState::Attack));

        brain.on_animation_event(AnimationEvent::AttackHit, &world);
        brain.on_animation_event(AnimationEvent::AttackHit, &world);
        let hits = brain.actor_mut().drain_hits();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].damage, 15.0);
    }

    #[test]
    fn attack_exit_closes_counter_window_and_starts_cooldown() {
        let world = PlayerAt {
            position: Vec2::new(40.0, 0.0),
            alive: true,
        };
        let mut brain = skeleton();
        run(&mut brain, &world, 2.0 * DT);
        brain.on_animation_event(AnimationEvent::OpenCounterWindow, &world);
        assert!(brain.counter_open());

        brain.on_animation_event(AnimationEvent::Finished, &world);
        brain.tick(DT, &world);
        assert_eq!(brain.current(), Some(EnemyState::Battle));
        assert!(!brain.counter_open());

        // Cooldown keeps the next swing from starting straight away.
        brain.tick(DT, &world);
        assert_eq!(brain.current(), Some(EnemyState::Battle));
    }

    #[test]
    fn archer_fires_projectile() {
        let definition = EnemyDefinition {
            attack: AttackKind::Ranged {
                projectile_speed: 400.0,
                lifetime: 2.0,
            },
            attack_range: 300.0,
            stun: None,
            ..default()
        };
        let world = PlayerAt {
            position: Vec2::new(200.0, 0.0),
            alive: true,
        };
        let mut brain = EnemyBrain::new(definition, Vec2::ZERO, 3);
        brain.actor_mut().body.grounded = true;
        run(&mut brain, &world, 2.0 * DT);
        assert_eq!(brain.current(), Some(EnemyState::Attack));

        brain.on_animation_event(AnimationEvent::OpenCounterWindow, &world);
        assert!(!brain.counter_open());

        brain.on_animation_event(AnimationEvent::AttackHit, &world);
        let fired = brain
            .actor()
            .effects()
            .iter()
            .any(|e| matches!(e, Effect::Projectile(shot) if shot.velocity == Vec2::new(400.0, 0.0)));
        assert!(fired);
        assert!(brain.actor().hits().is_empty());
    }
}
