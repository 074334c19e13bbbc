//! Drains each actor's effect outbox into the sinks that realise it.

use bevy::prelude::*;
use bevy_kira_audio::Audio;

use super::audio::SfxLibrary;
use super::feedback::{spawn_dust, spawn_ghost, spawn_popup, Tint};
use crate::actor::{Brain, Effect};
use crate::core::SpawnRequest;
use crate::physics::BodyShape;

const AFTER_IMAGE_TIME: f32 = 0.25;

pub fn drain_effects<B: Brain>(
    mut commands: Commands,
    audio: Res<Audio>,
    sfx: Res<SfxLibrary>,
    mut query: Query<(Entity, &mut B, &Sprite, &BodyShape, Option<&mut Tint>)>,
    mut requests: EventWriter<SpawnRequest>,
) {
    for (entity, mut brain, sprite, shape, mut tint) in query.iter_mut() {
        let effects = brain.actor_mut().drain_effects();
        if effects.is_empty() {
            continue;
        }
        let position = brain.actor().body.position;
        let facing = brain.actor().facing();

        for effect in effects {
            match effect {
                Effect::Sound(id) => sfx.play(&audio, id),
                Effect::Flash => {
                    if let Some(tint) = tint.as_mut() {
                        tint.flash();
                    }
                }
                Effect::Blink(on) => {
                    if let Some(tint) = tint.as_mut() {
                        tint.set_blink(on);
                    }
                }
                Effect::CounterCue(on) => {
                    if let Some(tint) = tint.as_mut() {
                        tint.set_cue(on);
                    }
                }
                Effect::PopupText(text) => spawn_popup(&mut commands, position, text),
                Effect::AfterImage => spawn_ghost(&mut commands, position, sprite, AFTER_IMAGE_TIME),
                Effect::Dust => {
                    let feet = position - Vec2::Y * shape.half_size.y;
                    spawn_dust(&mut commands, feet);
                }
                effect @ (Effect::Projectile(_)
                | Effect::ThrowSword { .. }
                | Effect::RecallSword
                | Effect::CastSkill) => {
                    requests.send(SpawnRequest {
                        owner: entity,
                        position,
                        facing,
                        effect,
                    });
                }
            }
        }
    }
}
