//! Sprite feedback: hit flash, red blink, counter cue, pop-up text and
//! fading ghosts.

use bevy::prelude::*;
use rand::Rng;

use crate::world::ArenaEntity;

/// Hit flash length in seconds.
const FLASH_TIME: f32 = 0.1;
/// Half period of the red blink.
const BLINK_PERIOD: f32 = 0.1;

const FLASH_COLOR: Color = Color::WHITE;
const BLINK_COLOR: Color = Color::srgb(1.0, 0.2, 0.2);
const CUE_COLOR: Color = Color::srgb(1.0, 0.85, 0.2);

/// Colour overrides layered on an actor's sprite.
///
/// Flash wins over blink, blink over the counter cue.
#[derive(Component, Debug, Clone)]
pub struct Tint {
    base: Color,
    flash: f32,
    blink: Option<f32>,
    cue: bool,
}

impl Tint {
    pub fn new(base: Color) -> Self {
        Self {
            base,
            flash: 0.0,
            blink: None,
            cue: false,
        }
    }

    pub fn flash(&mut self) {
        self.flash = FLASH_TIME;
    }

    pub fn set_blink(&mut self, on: bool) {
        self.blink = on.then_some(0.0);
    }

    pub fn set_cue(&mut self, on: bool) {
        self.cue = on;
    }

    pub fn advance(&mut self, dt: f32) {
        self.flash = (self.flash - dt).max(0.0);
        if let Some(phase) = self.blink.as_mut() {
            *phase += dt;
        }
    }

    /// Colour to show this frame.
    pub fn color(&self) -> Color {
        if self.flash > 0.0 {
            return FLASH_COLOR;
        }
        if let Some(phase) = self.blink {
            if (phase / BLINK_PERIOD) as u32 % 2 == 0 {
                return BLINK_COLOR;
            }
        }
        if self.cue {
            return CUE_COLOR;
        }
        self.base
    }
}

/// Rising damage number.
#[derive(Component, Debug)]
pub struct FloatingText {
    pub velocity: Vec2,
    pub remaining: f32,
}

/// Sprite that fades out and despawns.
#[derive(Component, Debug)]
pub struct Fade {
    pub remaining: f32,
    pub total: f32,
    pub alpha: f32,
}

impl Fade {
    pub fn new(seconds: f32, alpha: f32) -> Self {
        Self {
            remaining: seconds,
            total: seconds,
            alpha,
        }
    }
}

pub fn update_tints(time: Res<Time>, mut query: Query<(&mut Tint, &mut Sprite)>) {
    let dt = time.delta_secs();
    for (mut tint, mut sprite) in query.iter_mut() {
        tint.advance(dt);
        sprite.color = tint.color();
    }
}

pub fn spawn_popup(commands: &mut Commands, position: Vec2, text: String) {
    let jitter = rand::thread_rng().gen_range(-20.0..20.0);
    commands.spawn((
        Text2d::new(text),
        TextFont {
            font_size: 20.0,
            ..default()
        },
        TextColor(Color::WHITE),
        Transform::from_translation((position + Vec2::new(jitter, 30.0)).extend(5.0)),
        FloatingText {
            velocity: Vec2::new(0.0, 60.0),
            remaining: 0.8,
        },
        ArenaEntity,
    ));
}

/// Faded copy of `sprite` left behind at `position`.
pub fn spawn_ghost(commands: &mut Commands, position: Vec2, sprite: &Sprite, seconds: f32) {
    let mut ghost = sprite.clone();
    ghost.color = ghost.color.with_alpha(0.5);
    commands.spawn((
        ghost,
        Transform::from_translation(position.extend(0.1)),
        Fade::new(seconds, 0.5),
        ArenaEntity,
    ));
}

pub fn spawn_dust(commands: &mut Commands, feet: Vec2) {
    commands.spawn((
        Sprite::from_color(Color::srgba(0.7, 0.7, 0.65, 0.6), Vec2::new(28.0, 8.0)),
        Transform::from_translation(feet.extend(0.2)),
        Fade::new(0.3, 0.6),
        ArenaEntity,
    ));
}

pub fn animate_floating_text(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(Entity, &mut Transform, &mut FloatingText, &mut TextColor)>,
) {
    let dt = time.delta_secs();
    for (entity, mut transform, mut text, mut color) in query.iter_mut() {
        text.remaining -= dt;
        if text.remaining <= 0.0 {
            commands.entity(entity).despawn_recursive();
            continue;
        }
        transform.translation += (text.velocity * dt).extend(0.0);
        color.0 = color.0.with_alpha(text.remaining.min(0.3) / 0.3);
    }
}

pub fn fade_out(mut commands: Commands, time: Res<Time>, mut query: Query<(Entity, &mut Fade, &mut Sprite)>) {
    let dt = time.delta_secs();
    for (entity, mut fade, mut sprite) in query.iter_mut() {
        fade.remaining -= dt;
        if fade.remaining <= 0.0 {
            commands.entity(entity).despawn_recursive();
            continue;
        }
        let alpha = fade.alpha * fade.remaining / fade.total;
        sprite.color = sprite.color.with_alpha(alpha);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flash_overrides_blink_and_expires() {
        let base = Color::srgb(0.1, 0.2, 0.3);
        let mut tint = Tint::new(base);
        tint.set_blink(true);
        tint.flash();
        assert_eq!(tint.color(), FLASH_COLOR);

        tint.advance(0.25);
        assert_eq!(tint.color(), BLINK_COLOR);
        tint.advance(0.1);
        assert_eq!(tint.color(), base);

        tint.set_blink(false);
        tint.set_cue(true);
        assert_eq!(tint.color(), CUE_COLOR);
    }
}
