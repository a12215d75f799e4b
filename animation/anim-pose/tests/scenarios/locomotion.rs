//! Multi-tick runs of a character animator

use anim_pose::{CharacterAnimator, LocomotionSignals, LocomotionState};
use pretty_assertions::assert_eq;

use crate::common::{SKELETON, init_logging, locomotion_fixture};

const FRAME: f32 = 1.0 / 30.0;

fn hips_x(animator: &CharacterAnimator) -> f32 {
    animator.skeleton().bones()[0].local().position.x
}

fn state_index(state: LocomotionState) -> f32 {
    LocomotionState::ALL
        .iter()
        .position(|s| *s == state)
        .unwrap_or_default() as f32
}

/// Run `script` and collect the state after every tick
fn run(
    animator: &mut CharacterAnimator,
    cache: &anim_pose::AssetCache<anim_pose::MemoryLoader>,
    script: &[(f32, LocomotionSignals)],
) -> Vec<LocomotionState> {
    script
        .iter()
        .map(|(dt, signals)| {
            let tick = animator.tick(cache, *dt, signals).unwrap();
            assert_eq!(tick.result.len(), 4);
            tick.state
        })
        .collect()
}

#[test]
fn test_walk_cycle_from_idle_and_back() {
    init_logging();
    // Four frames at 30 fps: every one-shot clip lasts 0.1 s
    let (cache, config) = locomotion_fixture(4, 0.0);
    let mut animator = CharacterAnimator::from_cache(&cache, SKELETON, config).unwrap();

    let walk = LocomotionSignals::new(false, false, 1.0);
    let still = LocomotionSignals::default();
    let script = [
        (FRAME, still),
        (FRAME, walk),
        (0.1, walk),
        (FRAME, walk),
        (0.5, walk),
        (FRAME, still),
        (0.1, still),
        (FRAME, still),
    ];

    let states = run(&mut animator, &cache, &script);

    use LocomotionState::{Idle, WalkRun, WalkStart, WalkStop};
    assert_eq!(
        states,
        vec![Idle, WalkStart, WalkStart, WalkRun, WalkRun, WalkStop, WalkStop, Idle]
    );
    assert_eq!(hips_x(&animator), state_index(Idle));
}

#[test]
fn test_jump_from_idle_lands_running() {
    init_logging();
    let (cache, config) = locomotion_fixture(4, 0.0);
    let mut animator = CharacterAnimator::from_cache(&cache, SKELETON, config).unwrap();

    let jump = LocomotionSignals::new(false, true, 0.0);
    let land_running = LocomotionSignals::new(false, false, 2.0);
    let script = [
        (FRAME, jump),
        (0.1, jump),
        (FRAME, jump),
        (0.3, jump),
        (FRAME, land_running),
        (0.1, land_running),
        (FRAME, land_running),
    ];

    let states = run(&mut animator, &cache, &script);

    use LocomotionState::{JumpEndFromIdle, JumpLoopFromIdle, JumpStartFromIdle, WalkRun};
    assert_eq!(
        states,
        vec![
            JumpStartFromIdle,
            JumpStartFromIdle,
            JumpLoopFromIdle,
            JumpLoopFromIdle,
            JumpEndFromIdle,
            JumpEndFromIdle,
            WalkRun,
        ]
    );
    assert_eq!(hips_x(&animator), state_index(WalkRun));
}

#[test]
fn test_short_jump_returns_to_idle() {
    let (cache, config) = locomotion_fixture(4, 0.0);
    let mut animator = CharacterAnimator::from_cache(&cache, SKELETON, config).unwrap();

    let jump = LocomotionSignals::new(false, true, 0.0);
    let released = LocomotionSignals::default();
    let states = run(
        &mut animator,
        &cache,
        &[(FRAME, jump), (0.1, released), (FRAME, released)],
    );

    assert_eq!(
        states,
        vec![
            LocomotionState::JumpStartFromIdle,
            LocomotionState::JumpStartFromIdle,
            LocomotionState::Idle,
        ]
    );
}

#[test]
fn test_cross_fade_has_no_pop() {
    init_logging();
    let (cache, config) = locomotion_fixture(4, 0.08);
    let mut animator = CharacterAnimator::from_cache(&cache, SKELETON, config).unwrap();

    animator
        .tick(&cache, FRAME, &LocomotionSignals::default())
        .unwrap();
    assert_eq!(hips_x(&animator), 0.0);

    let walk = LocomotionSignals::new(false, false, 1.0);
    let target = state_index(LocomotionState::WalkStart);
    let mut previous = hips_x(&animator);
    for _ in 0..3 {
        let tick = animator.tick(&cache, FRAME, &walk).unwrap();
        assert_eq!(tick.state, LocomotionState::WalkStart);

        let x = hips_x(&animator);
        assert!(x > previous, "hips went from {previous} to {x}");
        assert!(x - previous < 0.5 * target, "hips jumped from {previous} to {x}");
        previous = x;
    }

    assert!(!animator.is_fading());
    assert!((previous - target).abs() < 1e-4);
}
