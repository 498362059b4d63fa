use crate::domain::input::ControlState;
use crate::domain::state::Craft;
use crate::domain::tuning::craft::CraftTuning;

#[derive(Debug, Clone, Copy)]
pub struct MovementConfig {
    pub thrust: f32,      // units / interval^2
    pub retro: f32,       // units / interval^2
    pub gravity: f32,     // units / interval^2
    pub turn_rate: f32,   // rad / interval
    pub restitution: f32, // vertical velocity multiplier on bounce

    pub use_gravity: bool,
    pub allow_mixed_actions: bool,

    // Vertical bounds for gravity-mode bouncing.
    pub plane_height: f32,
    pub radius: f32,
}

impl MovementConfig {
    pub fn new(tuning: CraftTuning, plane_height: f32) -> Self {
        Self {
            thrust: tuning.thrust,
            retro: tuning.retro,
            gravity: tuning.gravity,
            turn_rate: tuning.turn_rate,
            restitution: tuning.restitution,
            use_gravity: false,
            allow_mixed_actions: true,
            plane_height,
            radius: tuning.radius,
        }
    }
}

pub fn tick_craft(c: &mut Craft, du: f32, controls: ControlState, cfg: &MovementConfig) {
    let thrust = thrust_magnitude(controls, cfg);

    // direction (0 rad = up / -Y)
    let accel_x = c.rotation.sin() * thrust;
    let mut accel_y = -c.rotation.cos() * thrust;

    if cfg.use_gravity {
        accel_y += cfg.gravity;
    }

    apply_accel(c, accel_x, accel_y, du, cfg);

    // Thrusting blocks turning unless mixed actions are allowed.
    if thrust == 0.0 || cfg.allow_mixed_actions {
        update_rotation(c, du, controls, cfg);
    }
}

/// Thrust and retro add up when both are held; they never cancel to zero.
pub fn thrust_magnitude(controls: ControlState, cfg: &MovementConfig) -> f32 {
    match (controls.thrust, controls.retro) {
        (true, true) => cfg.thrust + cfg.retro,
        (true, false) => cfg.thrust,
        (false, true) => cfg.retro,
        (false, false) => 0.0,
    }
}

fn apply_accel(c: &mut Craft, accel_x: f32, accel_y: f32, du: f32, cfg: &MovementConfig) {
    // Trapezoidal step: integrate with the mean of the old and provisional velocity.
    let next_vel_x = c.vel_x + accel_x * du;
    let next_vel_y = c.vel_y + accel_y * du;
    let vel_x = (next_vel_x + c.vel_x) / 2.0;
    let vel_y = (next_vel_y + c.vel_y) / 2.0;

    c.x += vel_x * du;
    c.y += vel_y * du;
    c.vel_x = vel_x;
    c.vel_y = vel_y;

    if cfg.use_gravity {
        bounce_vertical(c, cfg);
    }
}

fn bounce_vertical(c: &mut Craft, cfg: &MovementConfig) {
    let r = cfg.radius;

    if c.y + r >= cfg.plane_height {
        c.vel_y *= cfg.restitution;
        c.y = cfg.plane_height - r;
    }

    if c.y - r <= 0.0 {
        c.vel_y *= cfg.restitution;
        c.y = r;
    }
}

fn update_rotation(c: &mut Craft, du: f32, controls: ControlState, cfg: &MovementConfig) {
    if controls.turn_left {
        c.rotation -= cfg.turn_rate * du;
    }
    if controls.turn_right {
        c.rotation += cfg.turn_rate * du;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::state::CraftDescriptor;

    const EPS: f32 = 1e-4;

    fn cfg() -> MovementConfig {
        MovementConfig::new(CraftTuning::default(), 400.0)
    }

    fn thrusting() -> ControlState {
        ControlState {
            thrust: true,
            ..ControlState::default()
        }
    }

    fn assert_close(actual: f32, expected: f32) {
        assert!(
            (actual - expected).abs() < EPS,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn when_thrusting_from_rest_facing_up_then_first_step_moves_half_a_thrust() {
        let mut craft = Craft::new(CraftDescriptor::at(140.0, 200.0));

        craft.update(1.0, thrusting(), &cfg());

        assert_close(craft.vel_x, 0.0);
        assert_close(craft.vel_y, -0.1);
        assert_close(craft.x, 140.0);
        assert_close(craft.y, 199.9);
        assert_eq!(craft.rotation, 0.0);
    }

    #[test]
    fn integration_follows_trapezoidal_rule() {
        // (vel_x, vel_y, rotation, du)
        let cases = [
            (0.0_f32, 0.0_f32, 0.0_f32, 1.0_f32),
            (1.5, -0.75, std::f32::consts::FRAC_PI_2, 0.5),
            (-2.0, 3.0, 1.0, 2.25),
            (0.3, 0.3, std::f32::consts::PI, 0.25),
        ];

        for (vel_x, vel_y, rotation, du) in cases {
            let mut craft = Craft::new(CraftDescriptor {
                rotation: Some(rotation),
                vel_x: Some(vel_x),
                vel_y: Some(vel_y),
                ..CraftDescriptor::at(100.0, 100.0)
            });
            let accel_x = rotation.sin() * 0.2;
            let accel_y = -rotation.cos() * 0.2;

            craft.update(du, thrusting(), &cfg());

            let expected_vel_x = vel_x + accel_x * du / 2.0;
            let expected_vel_y = vel_y + accel_y * du / 2.0;
            assert_close(craft.vel_x, expected_vel_x);
            assert_close(craft.vel_y, expected_vel_y);
            assert_close(craft.x, 100.0 + expected_vel_x * du);
            assert_close(craft.y, 100.0 + expected_vel_y * du);
        }
    }

    #[test]
    fn when_no_force_acts_then_velocity_is_preserved() {
        let mut craft = Craft::new(CraftDescriptor {
            vel_x: Some(2.0),
            vel_y: Some(-1.0),
            ..CraftDescriptor::at(100.0, 100.0)
        });

        craft.update(3.0, ControlState::default(), &cfg());

        assert_close(craft.vel_x, 2.0);
        assert_close(craft.vel_y, -1.0);
        assert_close(craft.x, 106.0);
        assert_close(craft.y, 97.0);
    }

    #[test]
    fn when_thrust_and_retro_are_both_held_then_magnitudes_are_summed() {
        let cfg = cfg();
        let both = ControlState {
            thrust: true,
            retro: true,
            ..ControlState::default()
        };
        let retro = ControlState {
            retro: true,
            ..ControlState::default()
        };

        assert_close(thrust_magnitude(both, &cfg), 0.1);
        assert_close(thrust_magnitude(thrusting(), &cfg), 0.2);
        assert_close(thrust_magnitude(retro, &cfg), -0.1);
        assert_eq!(thrust_magnitude(ControlState::default(), &cfg), 0.0);
    }

    #[test]
    fn when_gravity_is_on_then_craft_accelerates_downward() {
        let mut cfg = cfg();
        cfg.use_gravity = true;
        let mut craft = Craft::new(CraftDescriptor::at(140.0, 200.0));

        craft.update(1.0, ControlState::default(), &cfg);

        assert_close(craft.vel_y, 0.06);
        assert_close(craft.y, 200.06);
    }

    #[test]
    fn when_gravity_is_on_and_bottom_edge_is_reached_then_craft_bounces() {
        let mut cfg = cfg();
        cfg.use_gravity = true;
        let mut craft = Craft::new(CraftDescriptor {
            vel_y: Some(5.0),
            ..CraftDescriptor::at(140.0, 382.0)
        });

        craft.update(1.0, ControlState::default(), &cfg);

        assert_close(craft.y, 400.0 - 16.0);
        assert_close(craft.vel_y, -0.9 * (5.0 + 0.06));
    }

    #[test]
    fn when_gravity_is_on_and_top_edge_is_reached_then_craft_bounces() {
        let mut cfg = cfg();
        cfg.use_gravity = true;
        let mut craft = Craft::new(CraftDescriptor {
            vel_y: Some(-5.0),
            ..CraftDescriptor::at(140.0, 18.0)
        });

        craft.update(1.0, ControlState::default(), &cfg);

        assert_close(craft.y, 16.0);
        assert_close(craft.vel_y, -0.9 * (-5.0 + 0.06));
    }

    #[test]
    fn when_gravity_is_off_then_edges_do_not_bounce() {
        let mut craft = Craft::new(CraftDescriptor {
            vel_y: Some(5.0),
            ..CraftDescriptor::at(140.0, 398.0)
        });

        craft.update(1.0, ControlState::default(), &cfg());

        assert_close(craft.y, 403.0);
        assert_close(craft.vel_y, 5.0);
    }

    #[test]
    fn when_turning_both_ways_then_rotations_cancel() {
        let mut craft = Craft::new(CraftDescriptor::at(0.0, 0.0));
        let controls = ControlState {
            turn_left: true,
            turn_right: true,
            ..ControlState::default()
        };

        craft.update(1.0, controls, &cfg());

        assert_close(craft.rotation, 0.0);
    }

    #[test]
    fn when_turning_right_then_rotation_scales_with_du() {
        let mut craft = Craft::new(CraftDescriptor::at(0.0, 0.0));
        let controls = ControlState {
            turn_right: true,
            ..ControlState::default()
        };

        craft.update(2.5, controls, &cfg());

        assert_close(craft.rotation, 0.25);
    }

    #[test]
    fn when_mixed_actions_are_disabled_then_thrusting_blocks_turning() {
        let mut cfg = cfg();
        cfg.allow_mixed_actions = false;
        let mut craft = Craft::new(CraftDescriptor::at(0.0, 0.0));
        let controls = ControlState {
            thrust: true,
            turn_left: true,
            ..ControlState::default()
        };

        craft.update(1.0, controls, &cfg);
        assert_eq!(craft.rotation, 0.0);

        craft.update(1.0, ControlState { thrust: false, ..controls }, &cfg);
        assert_close(craft.rotation, -0.1);
    }

    #[test]
    fn when_mixed_actions_are_enabled_then_craft_thrusts_and_turns_together() {
        let mut craft = Craft::new(CraftDescriptor::at(0.0, 0.0));
        let controls = ControlState {
            thrust: true,
            turn_left: true,
            ..ControlState::default()
        };

        craft.update(1.0, controls, &cfg());

        assert_close(craft.rotation, -0.1);
        assert_close(craft.vel_y, -0.1);
    }
}
