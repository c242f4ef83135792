//! Built-in demo content, used when no game is linked in

use cinder_core::{Result, Vector2};
use cinder_runtime::{
    Background, FrameContext, GameContent, KeyCode, KeyFrame, ObjectBehavior, ObjectDefinition,
    ObjectInstance, Room, Sprite, TileFormat,
};
use std::sync::Arc;

const BLINK_FRAMES: i32 = 15;
const PLAYER_SPEED: i32 = 4;

/// Toggles its visibility every `BLINK_FRAMES` frames via alarm 0
struct Blinker;

impl ObjectBehavior for Blinker {
    fn on_create(&self, instance: &mut ObjectInstance, _ctx: &mut FrameContext) -> Result<()> {
        instance.timer_mut(0).set(BLINK_FRAMES);
        Ok(())
    }

    fn on_alarm(&self, instance: &mut ObjectInstance, slot: usize, _ctx: &mut FrameContext) -> Result<()> {
        if slot == 0 {
            instance.visible = !instance.visible;
            instance.timer_mut(0).set(BLINK_FRAMES);
        }
        Ok(())
    }
}

/// Moves with the arrow keys and scores on contact with blinkers
struct Player;

impl ObjectBehavior for Player {
    fn on_step(&self, instance: &mut ObjectInstance, ctx: &mut FrameContext) -> Result<()> {
        let input = ctx.input();
        let mut delta = Vector2::ZERO;
        if input.is_key_down(KeyCode::ArrowLeft) {
            delta.x -= PLAYER_SPEED;
        }
        if input.is_key_down(KeyCode::ArrowRight) {
            delta.x += PLAYER_SPEED;
        }
        if input.is_key_down(KeyCode::ArrowUp) {
            delta.y -= PLAYER_SPEED;
        }
        if input.is_key_down(KeyCode::ArrowDown) {
            delta.y += PLAYER_SPEED;
        }
        instance.position += delta;
        Ok(())
    }

    fn on_collision(
        &self,
        instance: &mut ObjectInstance,
        other: &ObjectInstance,
        _ctx: &mut FrameContext,
    ) -> Result<()> {
        if other.visible {
            instance.score += 1;
        }
        Ok(())
    }

    fn on_key_press(&self, instance: &mut ObjectInstance, key: KeyCode, _ctx: &mut FrameContext) -> Result<()> {
        if key == KeyCode::KeyR {
            log::info!("score reset at {}", instance.score);
            instance.score = 0;
        }
        Ok(())
    }
}

/// Invisible countdown that removes itself after `seconds`
struct Countdown {
    seconds: i32,
}

impl ObjectBehavior for Countdown {
    fn on_create(&self, instance: &mut ObjectInstance, ctx: &mut FrameContext) -> Result<()> {
        let speed = ctx.room().map_or(30, |room| room.speed as i32);
        instance.visible = false;
        instance.timer_mut(1).set(self.seconds * speed);
        Ok(())
    }

    fn on_alarm(&self, instance: &mut ObjectInstance, _slot: usize, _ctx: &mut FrameContext) -> Result<()> {
        instance.mark_for_deletion();
        Ok(())
    }

    fn on_destroy(&self, _instance: &mut ObjectInstance, _ctx: &mut FrameContext) -> Result<()> {
        log::info!("countdown finished after {} seconds", self.seconds);
        Ok(())
    }
}

/// Build the demo's content tables: two sprites, a tileset, three objects
/// and one room
pub fn demo_content() -> GameContent {
    let mut content = GameContent::new();

    let first = content.add_keyframes(
        ["res/spr_blink_0.bmp", "res/spr_blink_1.bmp", "res/spr_player_0.bmp"]
            .into_iter()
            .map(|path| KeyFrame { path: path.to_string() }),
    );
    let blink_sprite = content.add_sprite(Sprite::new("spr_blink", Vector2::new(16, 16), first, 2));
    let player_sprite = content.add_sprite(
        Sprite::new("spr_player", Vector2::new(24, 24), first + 2, 1).with_origin(Vector2::new(12, 12)),
    );

    content.add_background(Background::new("res/bg_tiles.bmp").with_tiles(TileFormat {
        offset: Vector2::ZERO,
        separation: Vector2::ONE,
        size: Vector2::new(16, 16),
    }));

    let blinker = content.add_object(ObjectDefinition::new("obj_blinker", Blinker).with_sprite(blink_sprite));
    let player = content.add_object(ObjectDefinition::new("obj_player", Player).with_sprite(player_sprite));
    let countdown = content.add_object(ObjectDefinition::new("obj_countdown", Countdown { seconds: 10 }));

    content.add_room(demo_room(blinker, player, countdown));
    content
}

fn demo_room(
    blinker: Arc<ObjectDefinition>,
    player: Arc<ObjectDefinition>,
    countdown: Arc<ObjectDefinition>,
) -> Room {
    Room::new("rm_demo").with_speed(30).with_setup(move |env| {
        for column in 0..4 {
            env.spawn(blinker.build_instance().at(Vector2::new(96 + column * 128, 224)))?;
        }
        env.spawn(player.build_instance().at(Vector2::new(320, 400)))?;
        env.spawn(countdown.build_instance())?;
        Ok(())
    })
}
