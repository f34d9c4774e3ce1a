//! Fixed timestep simulation tick
//!
//! One call advances the player by exactly one step. The order of the
//! phases matters: intent, rotation, gravity, integration, collision,
//! friction, horizontal clamp, fall-through check.

use serde::{Deserialize, Serialize};

use super::collision;
use super::rotation::{Advance, Direction};
use super::state::{GameEvent, GameState, ResetReason};

/// Held-key snapshot for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    /// Tumble left (wins if right is held too)
    pub left: bool,
    /// Tumble right
    pub right: bool,
    /// Put the player back at the start
    pub reset: bool,
}

/// Advance the game state by one tick
pub fn tick(state: &mut GameState, input: &TickInput) {
    state.time_ticks += 1;

    if input.reset {
        state.reset_player(ResetReason::Requested);
        return;
    }

    let params = state.rotation_params();
    let gravity = state.settings.gravity;
    let friction = state.settings.friction;
    let friction_cutoff = state.settings.friction_cutoff;
    let mode = state.settings.collision_mode;
    let max_x = state.settings.max_x();
    let fall_threshold = state.settings.fall_threshold;

    let player = &mut state.player;
    let was_on_ground = player.on_ground;

    // Tumbles only start from solid ground
    if player.on_ground && !player.is_rotating() {
        if let Some(direction) = Direction::from_held(input.left, input.right) {
            player.start_rotation(direction, &params);
            state.events.push(GameEvent::RotationStarted(direction));
            log::debug!(
                "Tumble {:?} from x={:.1}, vx={:.3}",
                direction,
                player.pos.x,
                player.vel.x
            );
        }
    }

    if player.is_rotating() && player.advance_rotation(&params) == Advance::Completed {
        state.events.push(GameEvent::RotationCompleted);
        log::debug!("Tumble complete at angle {:.3}", player.rotation.angle);
    }

    // No terminal velocity
    player.vel.y += gravity;
    player.pos += player.vel;

    let contact = collision::resolve(player, &state.platforms, mode);
    player.on_ground = contact.on_ground;
    if contact.interrupted {
        state.events.push(GameEvent::RotationInterrupted);
        log::debug!(
            "Tumble interrupted at x={:.1}, angle {:.3}",
            player.pos.x,
            player.rotation.angle
        );
    }
    if contact.on_ground && !was_on_ground {
        let y = player.bounds().bottom();
        state.events.push(GameEvent::Landed { y });
        log::debug!("Landed at y={:.1}", y);
    }

    // Leftover sideways speed bleeds off once no tumble is driving it
    if !player.is_rotating() && player.vel.x.abs() > 0.0 {
        player.vel.x *= friction;
        if player.vel.x.abs() < friction_cutoff {
            player.vel.x = 0.0;
        }
    }

    if player.pos.x < 0.0 {
        player.pos.x = 0.0;
    }
    if player.pos.x > max_x {
        player.pos.x = max_x;
    }

    if player.pos.y > fall_threshold {
        state.reset_player(ResetReason::FellOff);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::level::Level;
    use crate::settings::Settings;
    use crate::sim::collision::CollisionMode;
    use crate::sim::platform::Platform;
    use crate::sim::rotation::move_distance;
    use glam::Vec2;
    use proptest::prelude::*;
    use std::f32::consts::FRAC_PI_2;

    const LEFT: TickInput = TickInput {
        left: true,
        right: false,
        reset: false,
    };
    const RIGHT: TickInput = TickInput {
        left: false,
        right: true,
        reset: false,
    };
    const IDLE: TickInput = TickInput {
        left: false,
        right: false,
        reset: false,
    };

    fn state_with(platforms: Vec<Platform>, settings: Settings) -> GameState {
        GameState::new(
            settings,
            Level {
                player_start: Vec2::new(PLAYER_START_X, PLAYER_START_Y),
                platforms,
            },
        )
    }

    /// Open sky: nothing to collide with
    fn empty_state() -> GameState {
        state_with(Vec::new(), Settings::default())
    }

    fn floor() -> Platform {
        Platform::new(0.0, 500.0, 800.0, 100.0)
    }

    /// Player settled on the floor at the given x
    fn resting_on_floor(x: f32, mode: CollisionMode) -> GameState {
        let settings = Settings {
            collision_mode: mode,
            ..Settings::default()
        };
        let mut state = state_with(vec![floor()], settings);
        state.player.pos = Vec2::new(x, 500.0 - PLAYER_HEIGHT);
        tick(&mut state, &IDLE);
        assert!(state.player.on_ground);
        state.drain_events();
        state
    }

    fn sweep_len() -> u32 {
        (FRAC_PI_2 / ROTATION_SPEED_DEG.to_radians()).ceil() as u32
    }

    #[test]
    fn test_tumble_left_in_open_air() {
        let mut state = empty_state();
        state.player.on_ground = true;
        let start_x = state.player.pos.x;
        let n = sweep_len();

        tick(&mut state, &LEFT);
        assert!(state.player.is_rotating());
        assert!(state.player.vel.x < 0.0);
        for _ in 1..n {
            tick(&mut state, &IDLE);
        }

        let player = &state.player;
        assert!(!player.is_rotating());
        assert_eq!(player.vel.x, 0.0);
        assert_eq!(player.rotation.angle, -FRAC_PI_2);
        let moved = start_x - player.pos.x;
        assert!(
            (moved - move_distance(player.size)).abs() < 1e-3,
            "moved {moved}"
        );
        assert_eq!(
            state.events,
            vec![
                GameEvent::RotationStarted(Direction::Left),
                GameEvent::RotationCompleted
            ]
        );
    }

    #[test]
    fn test_tumble_needs_ground() {
        let mut state = empty_state();
        tick(&mut state, &RIGHT);
        assert!(!state.player.is_rotating());
        assert_eq!(state.player.vel.x, 0.0);
        assert_eq!(state.player.pos.x, PLAYER_START_X);
    }

    #[test]
    fn test_both_held_tumbles_left() {
        let mut state = empty_state();
        state.player.on_ground = true;
        tick(
            &mut state,
            &TickInput {
                left: true,
                right: true,
                reset: false,
            },
        );
        assert_eq!(state.player.rotation.direction_sign(), -1);
    }

    #[test]
    fn test_falls_onto_platform() {
        let mut state = GameState::default();
        for _ in 0..120 {
            tick(&mut state, &IDLE);
            if state.player.on_ground {
                break;
            }
        }
        assert!(state.player.on_ground);
        assert_eq!(state.player.pos.y, 500.0 - PLAYER_HEIGHT);
        assert_eq!(state.player.vel.y, 0.0);
        assert!(state.events.contains(&GameEvent::Landed { y: 500.0 }));
    }

    #[test]
    fn test_resting_player_stays_grounded() {
        let mut state = resting_on_floor(100.0, CollisionMode::SignDriven);
        for _ in 0..10 {
            tick(&mut state, &IDLE);
            assert!(state.player.on_ground);
            assert_eq!(state.player.pos.y, 420.0);
        }
        // Still on the ground, so no new landing events
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_wall_interrupts_tumble() {
        let wall = Platform::new(60.0, 0.0, 30.0, 1000.0);
        let mut state = state_with(vec![wall], Settings::default());
        state.player.on_ground = true;

        tick(&mut state, &LEFT);
        let mut interrupted_at = None;
        for i in 0..sweep_len() {
            if state.events.contains(&GameEvent::RotationInterrupted) {
                interrupted_at = Some(i);
                break;
            }
            tick(&mut state, &IDLE);
        }

        assert!(interrupted_at.is_some());
        let player = &state.player;
        assert!(!player.is_rotating());
        assert_eq!(player.vel.x, 0.0);
        assert_eq!(player.pos.x, 90.0);
        // No snap: the quarter turn was never finished
        assert!(player.rotation.angle > -FRAC_PI_2);
    }

    #[test]
    fn test_sign_driven_floor_cuts_tumble_short() {
        // Sinking one gravity step into the floor also triggers the
        // horizontal branch, which throws the box to the floor's left edge.
        let mut state = resting_on_floor(100.0, CollisionMode::SignDriven);
        tick(&mut state, &RIGHT);
        assert!(!state.player.is_rotating());
        assert_eq!(state.player.pos.x, 0.0);
        assert!(state.events.contains(&GameEvent::RotationInterrupted));
    }

    #[test]
    fn test_min_penetration_rolls_along_floor() {
        let mut state = resting_on_floor(100.0, CollisionMode::MinimumPenetration);
        tick(&mut state, &RIGHT);
        for _ in 1..sweep_len() {
            assert!(state.player.is_rotating());
            tick(&mut state, &IDLE);
        }
        let player = &state.player;
        assert!(!player.is_rotating());
        assert!(player.on_ground);
        assert_eq!(player.pos.y, 420.0);
        assert_eq!(player.rotation.angle, FRAC_PI_2);
        assert!((player.pos.x - 165.0).abs() < 1e-3);
    }

    #[test]
    fn test_friction_bleeds_off_speed() {
        let mut state = empty_state();
        state.player.vel.x = 3.0;
        tick(&mut state, &IDLE);
        assert_eq!(state.player.pos.x, PLAYER_START_X + 3.0);
        assert!((state.player.vel.x - 3.0 * FRICTION).abs() < 1e-6);

        for _ in 0..60 {
            tick(&mut state, &IDLE);
        }
        assert_eq!(state.player.vel.x, 0.0);
    }

    #[test]
    fn test_clamps_to_screen() {
        let mut state = empty_state();
        state.player.pos.x = -30.0;
        tick(&mut state, &IDLE);
        assert_eq!(state.player.pos.x, 0.0);

        state.player.pos.x = 790.0;
        tick(&mut state, &IDLE);
        assert_eq!(state.player.pos.x, SCREEN_WIDTH - PLAYER_WIDTH);
    }

    #[test]
    fn test_explicit_reset_skips_physics() {
        let mut state = GameState::default();
        for _ in 0..30 {
            tick(&mut state, &IDLE);
        }
        tick(
            &mut state,
            &TickInput {
                reset: true,
                ..Default::default()
            },
        );
        let player = &state.player;
        assert_eq!(player.pos, Vec2::new(PLAYER_START_X, PLAYER_START_Y));
        assert_eq!(player.vel, Vec2::ZERO);
        assert_eq!(player.rotation.angle, 0.0);
        assert_eq!(state.resets, 1);
        assert_eq!(
            state.events.last(),
            Some(&GameEvent::Reset(ResetReason::Requested))
        );
    }

    #[test]
    fn test_fall_through_resets() {
        let mut state = empty_state();
        let mut fell = false;
        for _ in 0..200 {
            tick(&mut state, &IDLE);
            if state.resets > 0 {
                fell = true;
                break;
            }
        }
        assert!(fell);
        assert_eq!(state.player.pos, Vec2::new(PLAYER_START_X, PLAYER_START_Y));
        assert_eq!(state.player.vel, Vec2::ZERO);
        assert!(state.events.contains(&GameEvent::Reset(ResetReason::FellOff)));
    }

    #[test]
    fn test_no_tumble_in_mid_air_after_reset() {
        let mut state = resting_on_floor(200.0, CollisionMode::SignDriven);
        tick(
            &mut state,
            &TickInput {
                reset: true,
                ..Default::default()
            },
        );
        assert!(!state.player.on_ground);

        // Spawn point is in the air: holding right must not start a tumble
        tick(&mut state, &RIGHT);
        assert!(!state.player.is_rotating());
        assert_eq!(state.player.vel.x, 0.0);
        assert_eq!(state.player.pos.x, PLAYER_START_X);
        assert!(
            !state
                .events
                .iter()
                .any(|e| matches!(e, GameEvent::RotationStarted(_)))
        );
    }

    #[test]
    fn test_fall_through_mid_tumble_resets_rotation() {
        let mut state = empty_state();
        state.player.on_ground = true;
        state.player.pos.y = 630.0;
        state.player.vel.y = 5.0;

        tick(&mut state, &LEFT);
        assert!(state.player.is_rotating());
        assert!(state.player.rotation.angle != 0.0);

        for _ in 1..sweep_len() {
            if state.resets > 0 {
                break;
            }
            assert!(state.player.is_rotating());
            tick(&mut state, &IDLE);
        }

        assert_eq!(state.resets, 1);
        assert!(state.events.contains(&GameEvent::Reset(ResetReason::FellOff)));
        assert!(!state.events.contains(&GameEvent::RotationCompleted));
        let player = &state.player;
        assert_eq!(player.pos, Vec2::new(PLAYER_START_X, PLAYER_START_Y));
        assert_eq!(player.vel, Vec2::ZERO);
        assert_eq!(player.rotation.angle, 0.0);
        assert!(!player.is_rotating());
        assert!(!player.on_ground);
    }

    #[test]
    fn test_determinism() {
        let mut state1 = GameState::default();
        let mut state2 = GameState::default();
        let inputs = [IDLE, IDLE, RIGHT, IDLE, LEFT, LEFT, IDLE, RIGHT];
        for _ in 0..40 {
            for input in &inputs {
                tick(&mut state1, input);
                tick(&mut state2, input);
            }
        }
        assert_eq!(state1.player, state2.player);
        assert_eq!(state1.events, state2.events);
    }

    proptest! {
        #[test]
        fn prop_airborne_gravity_accumulates(y in 0.0f32..400.0, vy in -20.0f32..20.0) {
            let mut state = empty_state();
            state.player.pos.y = y;
            state.player.vel.y = vy;
            tick(&mut state, &IDLE);
            prop_assert!(!state.player.on_ground);
            prop_assert_eq!(state.player.vel.y, vy + GRAVITY);
        }

        #[test]
        fn prop_x_always_clamped(
            x in -2000.0f32..2000.0,
            vx in -50.0f32..50.0,
            left in any::<bool>(),
            right in any::<bool>(),
        ) {
            let mut state = resting_on_floor(100.0, CollisionMode::SignDriven);
            state.player.pos.x = x;
            state.player.vel.x = vx;
            tick(&mut state, &TickInput { left, right, reset: false });
            prop_assert!(state.player.pos.x >= 0.0);
            prop_assert!(state.player.pos.x <= SCREEN_WIDTH - PLAYER_WIDTH);
        }

        #[test]
        fn prop_reset_restores_start(
            x in -100.0f32..900.0,
            y in -100.0f32..640.0,
            vx in -20.0f32..20.0,
            vy in -20.0f32..20.0,
            angle in -10.0f32..10.0,
            ticks in 0usize..6,
        ) {
            let mut state = GameState::default();
            state.player.pos = Vec2::new(x, y);
            state.player.vel = Vec2::new(vx, vy);
            state.player.rotation.angle = angle;
            state.player.on_ground = true;
            tick(&mut state, &LEFT);
            for _ in 0..ticks {
                tick(&mut state, &IDLE);
            }
            tick(&mut state, &TickInput { reset: true, ..Default::default() });

            let player = &state.player;
            prop_assert_eq!(player.pos, Vec2::new(PLAYER_START_X, PLAYER_START_Y));
            prop_assert_eq!(player.vel, Vec2::ZERO);
            prop_assert_eq!(player.rotation.angle, 0.0);
            prop_assert!(!player.is_rotating());
        }

        #[test]
        fn prop_landing_snaps_bottom_to_top(
            x in 0.0f32..750.0,
            gap in 0.0f32..0.5,
            vy in 0.0f32..20.0,
        ) {
            let mut state = state_with(vec![floor()], Settings::default());
            state.player.pos = Vec2::new(x, 500.0 - PLAYER_HEIGHT - gap);
            state.player.vel.y = vy;
            tick(&mut state, &IDLE);
            prop_assert!(state.player.on_ground);
            prop_assert_eq!(state.player.vel.y, 0.0);
            prop_assert_eq!(state.player.bounds().bottom(), 500.0);
        }
    }
}
