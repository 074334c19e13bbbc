//! Player behaviour driven through the brain's public surface.

use bevy::prelude::*;
use swordfall::actor::{Brain, EmptyWorld, Intent};
use swordfall::combat::{IncomingHit, InvincibilitySource};
use swordfall::fsm::{AnimationEvent, StateMachineError};
use swordfall::player::{PlayerBrain, PlayerState, PlayerTuning};

const DT: f32 = 1.0 / 60.0;

fn player(grounded: bool) -> PlayerBrain {
    let mut brain = PlayerBrain::new(Vec2::ZERO, PlayerTuning::default());
    brain.actor_mut().body.grounded = grounded;
    brain
}

fn step(brain: &mut PlayerBrain, intent: Intent) {
    brain.set_intent(intent);
    brain.tick(DT, &EmptyWorld);
}

fn idle_for(brain: &mut PlayerBrain, seconds: f32) {
    let ticks = (seconds / DT).ceil() as usize;
    for _ in 0..ticks {
        step(brain, Intent::default());
    }
}

/// Press attack, let the swing finish, and return the combo index it used.
fn swing(brain: &mut PlayerBrain) -> usize {
    step(brain, Intent { attack_pressed: true, ..default() });
    assert_eq!(brain.current(), Some(PlayerState::PrimaryAttack));
    let index = brain.states().attack.combo().current();

    brain.on_animation_event(AnimationEvent::Finished, &EmptyWorld);
    step(brain, Intent::default());
    assert_eq!(brain.current(), Some(PlayerState::Idle));
    index
}

#[test]
fn hurt_knockback_pushes_away_and_recovers_in_the_air() {
    let mut brain = player(false);
    assert_eq!(brain.actor().facing(), 1.0);

    let attacker = Vec2::new(-40.0, 0.0);
    brain.take_damage(&IncomingHit::new(10.0).with_attacker(Entity::from_raw(7), attacker));
    assert_eq!(brain.current(), Some(PlayerState::Hurt));

    let force = brain.tuning().knockback();
    assert_eq!(brain.actor().velocity(), Vec2::new(force.x, force.y));
    assert_eq!(brain.actor().health.current, 90.0);

    // Never grounded, and still leaves Hurt for Idle once the timer runs out.
    let mut ticks = 0;
    while brain.current() == Some(PlayerState::Hurt) && ticks < 120 {
        step(&mut brain, Intent::default());
        ticks += 1;
    }
    assert_eq!(brain.current(), Some(PlayerState::Idle));
    let expected = (brain.tuning().hurt_duration / DT).ceil() as i32;
    assert!((ticks - expected).abs() <= 1, "left hurt after {ticks} ticks");
    assert!(!brain.actor().body.grounded);
}

#[test]
fn combo_resets_after_the_top_index() {
    let mut brain = player(true);
    let busy = brain.tuning().attack_busy;

    let mut indices = Vec::new();
    for _ in 0..3 {
        indices.push(swing(&mut brain));
        idle_for(&mut brain, busy + 0.05);
    }
    assert_eq!(indices, vec![0, 1, 2]);

    // Fourth attack inside the window starts over with the first movement.
    step(&mut brain, Intent { attack_pressed: true, ..default() });
    assert_eq!(brain.states().attack.combo().current(), 0);
    let first = brain.tuning().attack_step(0);
    assert_eq!(brain.actor().velocity(), first);
}

#[test]
fn combo_window_measured_from_the_last_attack() {
    let mut brain = player(true);
    assert_eq!(swing(&mut brain), 0);
    idle_for(&mut brain, 1.0);
    assert_eq!(swing(&mut brain), 1);

    let mut brain = player(true);
    assert_eq!(swing(&mut brain), 0);
    idle_for(&mut brain, 3.0);
    assert_eq!(swing(&mut brain), 0);
}

#[test]
fn one_air_dash_per_jump() {
    let mut brain = player(false);
    step(&mut brain, Intent::default());
    assert_eq!(brain.current(), Some(PlayerState::Air));
    assert_eq!(brain.tuning().max_air_dashes, 1);

    let mut dashes = 0;
    let mut last = brain.current();
    for attempt in 0..2 {
        step(&mut brain, Intent { dash_pressed: true, ..default() });
        if brain.current() == Some(PlayerState::Dash) && last != Some(PlayerState::Dash) {
            dashes += 1;
        }
        last = brain.current();

        // Outlast both the dash and its cooldown before the next try.
        if attempt == 0 {
            for _ in 0..60 {
                step(&mut brain, Intent::default());
                last = brain.current();
            }
        }
    }

    assert_eq!(dashes, 1);
    assert_eq!(brain.current(), Some(PlayerState::Air));
    assert_eq!(brain.kit().air_dashes_used, 1);

    // Touching ground refunds the budget.
    brain.actor_mut().body.grounded = true;
    step(&mut brain, Intent::default());
    assert_eq!(brain.kit().air_dashes_used, 0);
}

#[test]
fn invincibility_drops_damage_entirely() {
    let mut brain = player(true);
    brain.actor_mut().make_invincible(InvincibilitySource::Respawn, true);

    let outcome = brain.take_damage(&IncomingHit::new(50.0).with_attacker(Entity::from_raw(3), Vec2::X * 20.0));
    assert!(!outcome.landed());
    assert_eq!(brain.actor().health.current, 100.0);
    assert_eq!(brain.current(), Some(PlayerState::Idle));
}

#[test]
fn dash_ending_keeps_respawn_protection() {
    let mut brain = player(true);
    brain.actor_mut().make_invincible(InvincibilitySource::Respawn, true);

    step(&mut brain, Intent { dash_pressed: true, ..default() });
    assert_eq!(brain.current(), Some(PlayerState::Dash));
    let seconds = brain.tuning().dash_duration + 0.1;
    idle_for(&mut brain, seconds);
    assert_eq!(brain.current(), Some(PlayerState::Idle));

    assert!(brain.actor().is_invincible());
    assert!(!brain.take_damage(&IncomingHit::new(10.0)).landed());

    brain.actor_mut().make_invincible(InvincibilitySource::Respawn, false);
    assert!(brain.take_damage(&IncomingHit::new(10.0)).landed());
}

#[test]
fn death_is_terminal() {
    let mut brain = player(true);
    brain.take_damage(&IncomingHit::new(1000.0));
    assert_eq!(brain.current(), Some(PlayerState::Dead));
    assert!(!brain.actor().body.collider_enabled);
    assert!(brain.actor().body.gravity_suspended());

    for _ in 0..3 {
        assert!(!brain.take_damage(&IncomingHit::new(10.0)).landed());
    }
    for state in [PlayerState::Idle, PlayerState::Hurt, PlayerState::Dead] {
        assert!(matches!(
            brain.change_state(state),
            Err(StateMachineError::Terminal { .. })
        ));
    }

    step(&mut brain, Intent { jump_pressed: true, attack_pressed: true, ..default() });
    assert_eq!(brain.current(), Some(PlayerState::Dead));
    assert!(brain.is_busy());

    assert!(!brain.actor().despawn_due());
    let seconds = brain.tuning().despawn_delay + 0.1;
    idle_for(&mut brain, seconds);
    assert!(brain.actor().despawn_due());
    assert_eq!(brain.current(), Some(PlayerState::Dead));
    assert_eq!(brain.actor().velocity(), Vec2::ZERO);
}
