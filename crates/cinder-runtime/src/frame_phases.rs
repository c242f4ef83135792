//! Frame phase ordering, deferred mutation and hook dispatch

use crate::{
    EventBus, FrameContext, FrameOutcome, KeyCode, NoEvents, ObjectBehavior, ObjectDefinition,
    ObjectInstance, PlatformEvent, Room, RoomEnvironment, RuntimeConfig, Sprite, Surface,
    ZeroDurationPolicy,
};
use cinder_core::{CinderError, Color, InstanceId, Result, Vector2};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

type Log = Arc<Mutex<Vec<(InstanceId, &'static str)>>>;

/// Records every hook call it receives
#[derive(Clone, Default)]
struct Recorder {
    log: Log,
}

impl Recorder {
    fn push(&self, instance: &ObjectInstance, hook: &'static str) {
        self.log.lock().unwrap().push((instance.id(), hook));
    }

    fn calls_for(&self, id: InstanceId) -> Vec<&'static str> {
        self.log
            .lock()
            .unwrap()
            .iter()
            .filter(|(i, _)| *i == id)
            .map(|(_, hook)| *hook)
            .collect()
    }

    fn count(&self, hook: &'static str) -> usize {
        self.log.lock().unwrap().iter().filter(|(_, h)| *h == hook).count()
    }
}

impl ObjectBehavior for Recorder {
    fn on_create(&self, instance: &mut ObjectInstance, _ctx: &mut FrameContext) -> Result<()> {
        self.push(instance, "create");
        Ok(())
    }

    fn on_destroy(&self, instance: &mut ObjectInstance, _ctx: &mut FrameContext) -> Result<()> {
        self.push(instance, "destroy");
        Ok(())
    }

    fn on_begin_step(&self, instance: &mut ObjectInstance, _ctx: &mut FrameContext) -> Result<()> {
        self.push(instance, "begin_step");
        Ok(())
    }

    fn on_alarm(&self, instance: &mut ObjectInstance, _slot: usize, _ctx: &mut FrameContext) -> Result<()> {
        self.push(instance, "alarm");
        Ok(())
    }

    fn on_key_press(&self, instance: &mut ObjectInstance, _key: KeyCode, _ctx: &mut FrameContext) -> Result<()> {
        self.push(instance, "key_press");
        Ok(())
    }

    fn on_step(&self, instance: &mut ObjectInstance, _ctx: &mut FrameContext) -> Result<()> {
        self.push(instance, "step");
        Ok(())
    }

    fn on_collision(
        &self,
        instance: &mut ObjectInstance,
        _other: &ObjectInstance,
        _ctx: &mut FrameContext,
    ) -> Result<()> {
        self.push(instance, "collision");
        Ok(())
    }

    fn on_end_step(&self, instance: &mut ObjectInstance, _ctx: &mut FrameContext) -> Result<()> {
        self.push(instance, "end_step");
        Ok(())
    }

    fn on_draw(&self, instance: &ObjectInstance, _surface: &mut dyn Surface) -> Result<()> {
        self.push(instance, "draw");
        Ok(())
    }
}

#[derive(Default)]
struct RecordingSurface {
    clears: Vec<Color>,
    keyframes: Vec<(usize, Vector2)>,
}

impl Surface for RecordingSurface {
    fn clear(&mut self, color: Color) {
        self.clears.push(color);
    }

    fn draw_keyframe(&mut self, keyframe: usize, top_left: Vector2) {
        self.keyframes.push((keyframe, top_left));
    }
}

fn active_env() -> RoomEnvironment {
    let mut env = RoomEnvironment::new();
    env.activate(Some(Arc::new(Room::new("rm_test")))).unwrap();
    env
}

fn never(_: &ObjectInstance, _: &ObjectInstance) -> bool {
    false
}

fn always(_: &ObjectInstance, _: &ObjectInstance) -> bool {
    true
}

#[test]
fn test_phases_run_in_fixed_order() {
    let recorder = Recorder::default();
    let def = Arc::new(ObjectDefinition::new("obj_probe", recorder.clone()));
    let mut env = RoomEnvironment::new().with_collision(always);
    env.activate(Some(Arc::new(Room::new("rm_order")))).unwrap();

    let mut probe = def.build_instance();
    probe.timer_mut(3).set(1);
    let probe = env.spawn(probe).unwrap();
    env.spawn(def.build_instance()).unwrap();

    let mut events = EventBus::new();
    events.push(PlatformEvent::KeyDown(KeyCode::Space));
    env.update(&mut events).unwrap();

    assert_eq!(
        recorder.calls_for(probe),
        vec!["create", "begin_step", "alarm", "key_press", "step", "collision", "end_step"]
    );
}

#[test]
fn test_every_phase_completes_before_the_next() {
    let recorder = Recorder::default();
    let def = Arc::new(ObjectDefinition::new("obj_probe", recorder.clone()));
    let mut env = active_env();
    for _ in 0..3 {
        env.spawn(def.build_instance()).unwrap();
    }
    recorder.log.lock().unwrap().clear();

    env.update(&mut NoEvents).unwrap();

    let hooks: Vec<&str> = recorder.log.lock().unwrap().iter().map(|(_, h)| *h).collect();
    assert_eq!(
        hooks,
        vec![
            "begin_step", "begin_step", "begin_step", "step", "step", "step", "end_step",
            "end_step", "end_step",
        ]
    );
}

#[test]
fn test_scene_switch_clears_previous_instances() {
    let def = Arc::new(ObjectDefinition::new("obj_a", Recorder::default()));
    let spawn_def = Arc::clone(&def);
    let room = Arc::new(Room::new("rm_three").with_setup(move |env| {
        for i in 0..3 {
            env.spawn(spawn_def.build_instance().at(Vector2::new(i * 32, 0)))?;
        }
        Ok(())
    }));

    let mut env = active_env();
    for _ in 0..5 {
        env.spawn(def.build_instance()).unwrap();
    }
    assert_eq!(env.instance_count(), 5);

    env.activate(Some(Arc::clone(&room))).unwrap();
    assert_eq!(env.instance_count(), 3);

    // Re-activating the same room starts over rather than accumulating
    env.activate(Some(room)).unwrap();
    assert_eq!(env.instance_count(), 3);
}

/// Counts steps per instance and, if it has a victim, destroys it on step
struct Stepper {
    steps: Arc<Mutex<Vec<InstanceId>>>,
    victim: Arc<Mutex<Option<InstanceId>>>,
}

impl ObjectBehavior for Stepper {
    fn on_step(&self, instance: &mut ObjectInstance, ctx: &mut FrameContext) -> Result<()> {
        instance.score += 1;
        self.steps.lock().unwrap().push(instance.id());
        if let Some(victim) = self.victim.lock().unwrap().take() {
            ctx.destroy(victim);
        }
        Ok(())
    }
}

#[test]
fn test_step_reaches_every_instance_despite_deletion() {
    let steps = Arc::new(Mutex::new(Vec::new()));
    let victim = Arc::new(Mutex::new(None));
    let def = Arc::new(ObjectDefinition::new(
        "obj_stepper",
        Stepper {
            steps: Arc::clone(&steps),
            victim: Arc::clone(&victim),
        },
    ));

    let mut env = active_env();
    let ids: Vec<InstanceId> = (0..5)
        .map(|_| env.spawn(def.build_instance()).unwrap())
        .collect();
    *victim.lock().unwrap() = Some(ids[3]);

    env.update(&mut NoEvents).unwrap();

    let mut stepped = steps.lock().unwrap().clone();
    stepped.sort();
    assert_eq!(stepped, ids);
    assert_eq!(env.instance_count(), 4);
    assert!(env.instance(ids[3]).is_none());
    assert!(env.instances().iter().all(|i| i.score == 1));
}

/// Marks itself for deletion during begin-step
struct SelfDestruct {
    recorder: Recorder,
}

impl ObjectBehavior for SelfDestruct {
    fn on_begin_step(&self, instance: &mut ObjectInstance, ctx: &mut FrameContext) -> Result<()> {
        self.recorder.on_begin_step(instance, ctx)?;
        instance.mark_for_deletion();
        Ok(())
    }

    fn on_alarm(&self, instance: &mut ObjectInstance, slot: usize, ctx: &mut FrameContext) -> Result<()> {
        self.recorder.on_alarm(instance, slot, ctx)
    }

    fn on_step(&self, instance: &mut ObjectInstance, ctx: &mut FrameContext) -> Result<()> {
        self.recorder.on_step(instance, ctx)
    }

    fn on_collision(
        &self,
        instance: &mut ObjectInstance,
        other: &ObjectInstance,
        ctx: &mut FrameContext,
    ) -> Result<()> {
        self.recorder.on_collision(instance, other, ctx)
    }

    fn on_end_step(&self, instance: &mut ObjectInstance, ctx: &mut FrameContext) -> Result<()> {
        self.recorder.on_end_step(instance, ctx)
    }

    fn on_destroy(&self, instance: &mut ObjectInstance, ctx: &mut FrameContext) -> Result<()> {
        self.recorder.on_destroy(instance, ctx)
    }
}

#[test]
fn test_deletion_is_deferred_to_the_end_of_the_frame() {
    let recorder = Recorder::default();
    let doomed_def = Arc::new(ObjectDefinition::new(
        "obj_doomed",
        SelfDestruct {
            recorder: recorder.clone(),
        },
    ));
    let other_def = Arc::new(ObjectDefinition::new("obj_other", Recorder::default()));

    let mut env = RoomEnvironment::new().with_collision(always);
    env.activate(Some(Arc::new(Room::new("rm_defer")))).unwrap();

    let mut doomed = doomed_def.build_instance();
    doomed.timer_mut(0).set(1);
    let doomed = env.spawn(doomed).unwrap();
    env.spawn(other_def.build_instance()).unwrap();

    env.update(&mut NoEvents).unwrap();

    assert_eq!(
        recorder.calls_for(doomed),
        vec!["begin_step", "alarm", "step", "collision", "end_step", "destroy"]
    );
    assert!(env.instance(doomed).is_none());
    assert_eq!(env.instance_count(), 1);

    env.update(&mut NoEvents).unwrap();
    assert_eq!(recorder.count("begin_step"), 1);
}

#[test]
fn test_invisible_instances_are_never_drawn() {
    let recorder = Recorder::default();
    let def = Arc::new(ObjectDefinition::new("obj_hidden", recorder.clone()));
    let mut env = active_env();

    let mut hidden = def.build_instance();
    hidden.visible = false;
    env.spawn(hidden).unwrap();

    let mut surface = RecordingSurface::default();
    env.draw(&mut surface).unwrap();
    assert_eq!(recorder.count("draw"), 0);

    let shown = env.spawn(def.build_instance()).unwrap();
    env.draw(&mut surface).unwrap();
    assert_eq!(recorder.count("draw"), 1);
    assert_eq!(recorder.calls_for(shown).last(), Some(&"draw"));
}

#[test]
fn test_collision_checks_every_ordered_pair() {
    let checks = Arc::new(AtomicUsize::new(0));
    let pairs = Arc::new(Mutex::new(Vec::new()));
    let counter = Arc::clone(&checks);
    let seen = Arc::clone(&pairs);
    let def = Arc::new(ObjectDefinition::new("obj_pair", Recorder::default()));

    let mut env = RoomEnvironment::new().with_collision(move |a: &ObjectInstance, b: &ObjectInstance| {
        counter.fetch_add(1, Ordering::Relaxed);
        seen.lock().unwrap().push((a.id(), b.id()));
        false
    });
    env.activate(Some(Arc::new(Room::new("rm_pairs")))).unwrap();

    let n = 4;
    let ids: Vec<InstanceId> = (0..n)
        .map(|_| env.spawn(def.build_instance()).unwrap())
        .collect();
    env.update(&mut NoEvents).unwrap();

    assert_eq!(checks.load(Ordering::Relaxed), n * (n - 1));
    let pairs = pairs.lock().unwrap();
    assert!(pairs.iter().all(|(a, b)| a != b));
    assert!(pairs.contains(&(ids[0], ids[1])));
    assert!(pairs.contains(&(ids[1], ids[0])));
    // Iteration order of the collection, not sorted by any key
    assert_eq!(pairs[0], (ids[0], ids[1]));
    assert_eq!(pairs[n - 1], (ids[1], ids[0]));
}

#[test]
fn test_collision_uses_sprite_bounding_boxes_by_default() {
    let recorder = Recorder::default();
    let sprite = Arc::new(Sprite::new("spr_block", Vector2::new(16, 16), 0, 1));
    let def = Arc::new(ObjectDefinition::new("obj_block", recorder.clone()).with_sprite(sprite));
    let mut env = active_env();

    let a = env.spawn(def.build_instance().at(Vector2::new(0, 0))).unwrap();
    let b = env.spawn(def.build_instance().at(Vector2::new(8, 0))).unwrap();
    let far = env.spawn(def.build_instance().at(Vector2::new(100, 100))).unwrap();
    env.update(&mut NoEvents).unwrap();

    assert_eq!(recorder.count("collision"), 2);
    assert!(recorder.calls_for(a).contains(&"collision"));
    assert!(recorder.calls_for(b).contains(&"collision"));
    assert!(!recorder.calls_for(far).contains(&"collision"));
}

/// Sets score to 100 when alarm 0 rings
struct ScoreOnAlarm;

impl ObjectBehavior for ScoreOnAlarm {
    fn on_alarm(&self, instance: &mut ObjectInstance, slot: usize, _ctx: &mut FrameContext) -> Result<()> {
        if slot == 0 {
            instance.score = 100;
        }
        Ok(())
    }
}

#[test]
fn test_alarm_scores_only_the_armed_instance() {
    let def = Arc::new(ObjectDefinition::new("obj_scorer", ScoreOnAlarm));
    let mut env = active_env();
    let ids: Vec<InstanceId> = (0..3)
        .map(|_| env.spawn(def.build_instance()).unwrap())
        .collect();

    env.instance_mut(ids[1]).unwrap().timer_mut(0).set(2);
    env.update(&mut NoEvents).unwrap();
    assert_eq!(env.instance(ids[1]).unwrap().score, 0);
    env.update(&mut NoEvents).unwrap();

    assert_eq!(env.instance(ids[0]).unwrap().score, 0);
    assert_eq!(env.instance(ids[1]).unwrap().score, 100);
    assert_eq!(env.instance(ids[2]).unwrap().score, 0);
}

/// Re-arms alarm 0 every time it fires and counts the rings
struct Metronome {
    rings: Arc<AtomicUsize>,
}

impl ObjectBehavior for Metronome {
    fn on_alarm(&self, instance: &mut ObjectInstance, slot: usize, _ctx: &mut FrameContext) -> Result<()> {
        self.rings.fetch_add(1, Ordering::Relaxed);
        instance.timer_mut(slot).set(3);
        Ok(())
    }
}

#[test]
fn test_alarms_fire_once_per_arming() {
    let rings = Arc::new(AtomicUsize::new(0));
    let def = Arc::new(ObjectDefinition::new(
        "obj_metronome",
        Metronome {
            rings: Arc::clone(&rings),
        },
    ));
    let mut env = active_env();
    let mut instance = def.build_instance();
    instance.timer_mut(0).set(3);
    env.spawn(instance).unwrap();

    for _ in 0..9 {
        env.update(&mut NoEvents).unwrap();
    }
    assert_eq!(rings.load(Ordering::Relaxed), 3);
}

#[test]
fn test_zero_duration_policy_is_configurable() {
    let run = |policy: ZeroDurationPolicy| {
        let def = Arc::new(ObjectDefinition::new("obj_zero", ScoreOnAlarm));
        let mut env = RoomEnvironment::with_config(RuntimeConfig {
            zero_duration: policy,
            clamp_health: false,
        });
        env.activate(Some(Arc::new(Room::new("rm_zero")))).unwrap();
        let id = env.spawn(def.build_instance()).unwrap();
        env.instance_mut(id).unwrap().timer_mut(0).set(0);
        env.update(&mut NoEvents).unwrap();
        env.instance(id).unwrap().score
    };

    assert_eq!(run(ZeroDurationPolicy::Discard), 0);
    assert_eq!(run(ZeroDurationPolicy::NextAdvance), 100);
}

#[test]
fn test_quit_event_is_reported_after_the_frame_completes() {
    let recorder = Recorder::default();
    let def = Arc::new(ObjectDefinition::new("obj_probe", recorder.clone()));
    let mut env = active_env();
    let id = env.spawn(def.build_instance()).unwrap();

    let mut events = EventBus::new();
    events.push(PlatformEvent::Quit);
    let outcome = env.update(&mut events).unwrap();

    assert_eq!(outcome, FrameOutcome::Quit);
    assert!(events.is_empty());
    assert_eq!(recorder.calls_for(id).last(), Some(&"end_step"));

    assert_eq!(env.update(&mut events).unwrap(), FrameOutcome::Continue);
}

#[test]
fn test_frame_is_a_noop_without_an_active_room() {
    let recorder = Recorder::default();
    let def = Arc::new(ObjectDefinition::new("obj_probe", recorder.clone()));
    let mut env = RoomEnvironment::new();
    env.spawn(def.build_instance()).unwrap();

    let mut events = EventBus::new();
    events.push(PlatformEvent::Quit);
    assert_eq!(env.update(&mut events).unwrap(), FrameOutcome::Continue);

    let mut surface = RecordingSurface::default();
    env.draw(&mut surface).unwrap();

    assert_eq!(recorder.calls_for(env.instances()[0].id()), vec!["create"]);
    assert!(surface.clears.is_empty());
    assert_eq!(events.len(), 1);
}

/// Spawns a copy of itself on every step
struct Spawner {
    definition: Arc<Mutex<Option<Arc<ObjectDefinition>>>>,
    steps: Arc<AtomicUsize>,
}

impl ObjectBehavior for Spawner {
    fn on_step(&self, _instance: &mut ObjectInstance, ctx: &mut FrameContext) -> Result<()> {
        self.steps.fetch_add(1, Ordering::Relaxed);
        if let Some(def) = self.definition.lock().unwrap().as_ref() {
            ctx.spawn(def.build_instance());
        }
        Ok(())
    }
}

#[test]
fn test_spawns_from_hooks_join_at_the_sweep() {
    let slot = Arc::new(Mutex::new(None));
    let steps = Arc::new(AtomicUsize::new(0));
    let def = Arc::new(ObjectDefinition::new(
        "obj_spawner",
        Spawner {
            definition: Arc::clone(&slot),
            steps: Arc::clone(&steps),
        },
    ));
    *slot.lock().unwrap() = Some(Arc::clone(&def));

    let mut env = active_env();
    env.spawn(def.build_instance()).unwrap();

    env.update(&mut NoEvents).unwrap();
    assert_eq!(steps.load(Ordering::Relaxed), 1);
    assert_eq!(env.instance_count(), 2);

    env.update(&mut NoEvents).unwrap();
    assert_eq!(steps.load(Ordering::Relaxed), 3);
    assert_eq!(env.instance_count(), 4);

    // Break the Arc cycle between the definition and its behavior
    slot.lock().unwrap().take();
}

/// Fails its step hook
struct Faulty;

impl ObjectBehavior for Faulty {
    fn on_begin_step(&self, instance: &mut ObjectInstance, _ctx: &mut FrameContext) -> Result<()> {
        instance.mark_for_deletion();
        Ok(())
    }

    fn on_step(&self, _instance: &mut ObjectInstance, _ctx: &mut FrameContext) -> Result<()> {
        Err(CinderError::hook("obj_faulty", "on_step", "boom"))
    }
}

#[test]
fn test_hook_error_aborts_the_frame_but_still_sweeps() {
    let recorder = Recorder::default();
    let faulty = Arc::new(ObjectDefinition::new("obj_faulty", Faulty));
    let probe_def = Arc::new(ObjectDefinition::new("obj_probe", recorder.clone()));

    let mut env = active_env();
    let faulty_id = env.spawn(faulty.build_instance()).unwrap();
    let probe = env.spawn(probe_def.build_instance()).unwrap();

    let err = env.update(&mut NoEvents).unwrap_err();
    assert!(matches!(err, CinderError::HookError { hook: "on_step", .. }));

    // The probe sits after the faulty instance, so its step never ran
    assert_eq!(recorder.calls_for(probe), vec!["create", "begin_step"]);
    assert!(env.instance(faulty_id).is_none());

    env.update(&mut NoEvents).unwrap();
    assert!(recorder.calls_for(probe).contains(&"end_step"));
}

/// Drains health on every step
struct Bleeder;

impl ObjectBehavior for Bleeder {
    fn on_step(&self, instance: &mut ObjectInstance, _ctx: &mut FrameContext) -> Result<()> {
        instance.health -= 70;
        Ok(())
    }
}

#[test]
fn test_health_clamping_follows_config() {
    let def = Arc::new(ObjectDefinition::new("obj_bleeder", Bleeder));

    let mut loose = active_env();
    let id = loose.spawn(def.build_instance()).unwrap();
    loose.update(&mut NoEvents).unwrap();
    loose.update(&mut NoEvents).unwrap();
    assert_eq!(loose.instance(id).unwrap().health, -40);

    let mut clamped = RoomEnvironment::with_config(RuntimeConfig {
        zero_duration: ZeroDurationPolicy::Discard,
        clamp_health: true,
    });
    clamped.activate(Some(Arc::new(Room::new("rm_clamp")))).unwrap();
    let id = clamped.spawn(def.build_instance()).unwrap();
    clamped.update(&mut NoEvents).unwrap();
    clamped.update(&mut NoEvents).unwrap();
    assert_eq!(clamped.instance(id).unwrap().health, 0);
}

#[test]
fn test_draw_clears_background_and_renders_sprites() {
    let sprite = Arc::new(Sprite::new("spr_anim", Vector2::new(8, 8), 10, 2).with_origin(Vector2::new(4, 4)));
    let def = Arc::new(ObjectDefinition::new("obj_anim", crate::NoBehavior).with_sprite(sprite));
    let room = Room::new("rm_draw").with_background(Color::rgb(10, 20, 30), true);

    let mut env = RoomEnvironment::new().with_collision(never);
    env.activate(Some(Arc::new(room))).unwrap();
    env.spawn(def.build_instance().at(Vector2::new(20, 20))).unwrap();

    let mut surface = RecordingSurface::default();
    env.draw(&mut surface).unwrap();
    env.update(&mut NoEvents).unwrap();
    env.draw(&mut surface).unwrap();

    assert_eq!(surface.clears, vec![Color::rgb(10, 20, 30); 2]);
    assert_eq!(
        surface.keyframes,
        vec![(10, Vector2::new(16, 16)), (11, Vector2::new(16, 16))]
    );
}

#[test]
fn test_key_events_update_input_before_step() {
    struct HeldJump {
        seen: Arc<AtomicUsize>,
    }

    impl ObjectBehavior for HeldJump {
        fn on_step(&self, _instance: &mut ObjectInstance, ctx: &mut FrameContext) -> Result<()> {
            if ctx.input().is_key_down(KeyCode::Space) {
                self.seen.fetch_add(1, Ordering::Relaxed);
            }
            Ok(())
        }
    }

    let seen = Arc::new(AtomicUsize::new(0));
    let def = Arc::new(ObjectDefinition::new(
        "obj_jumper",
        HeldJump {
            seen: Arc::clone(&seen),
        },
    ));
    let mut env = active_env();
    env.spawn(def.build_instance()).unwrap();

    let mut events = EventBus::new();
    events.push(PlatformEvent::KeyDown(KeyCode::Space));
    env.update(&mut events).unwrap();
    env.update(&mut events).unwrap();
    events.push(PlatformEvent::KeyUp(KeyCode::Space));
    env.update(&mut events).unwrap();

    assert_eq!(seen.load(Ordering::Relaxed), 2);
    assert!(!env.input().is_key_down(KeyCode::Space));
}

/// Spawns a child and destroys it again within the same step
struct Retractor {
    child: Arc<ObjectDefinition>,
}

impl ObjectBehavior for Retractor {
    fn on_step(&self, _instance: &mut ObjectInstance, ctx: &mut FrameContext) -> Result<()> {
        let id = ctx.spawn(self.child.build_instance());
        ctx.destroy(id);
        Ok(())
    }
}

#[test]
fn test_destroying_a_queued_spawn_keeps_it_out() {
    let recorder = Recorder::default();
    let child = Arc::new(ObjectDefinition::new("obj_child", recorder.clone()));
    let parent = Arc::new(ObjectDefinition::new(
        "obj_parent",
        Retractor {
            child: Arc::clone(&child),
        },
    ));

    let mut env = active_env();
    env.spawn(parent.build_instance()).unwrap();

    env.update(&mut NoEvents).unwrap();
    assert_eq!(env.instance_count(), 1);
    env.update(&mut NoEvents).unwrap();
    assert_eq!(env.instance_count(), 1);

    // Never joined, so neither lifecycle hook ran
    assert_eq!(recorder.count("create"), 0);
    assert_eq!(recorder.count("destroy"), 0);
}
