//! Open-loop steering shared by the movement actions.
//!
//! Every call reissues the full set of continuous controls it owns, so ticking twice against
//! the same frame sends the same commands. Turn and pitch intensities are proportional to the
//! remaining angle; a positive turn increases yaw and a positive pitch looks further down.

use voxel_core::{angle_delta, forward_step, Actuator, Observation, Position};

/// Angular error (degrees) below which the agent counts as aimed.
pub const AIM_TOLERANCE: f64 = 5.0;
/// Only walk forward when the heading error is inside this cone.
const WALK_CONE: f64 = 30.0;
/// Angular error that saturates a turn command.
const FULL_TURN: f64 = 45.0;

fn intensity(delta: f64) -> f32 {
    (delta / FULL_TURN).clamp(-1.0, 1.0) as f32
}

/// Turn and pitch the eye towards `target`; `true` once both errors are within
/// [`AIM_TOLERANCE`].
pub fn aim(obs: &Observation, actuator: &mut dyn Actuator, target: Position) -> bool {
    let Some(pos) = obs.position else {
        return false;
    };
    let eye = pos.eye();
    let yaw = angle_delta(obs.yaw, eye.yaw_towards(target));
    let pitch = eye.pitch_towards(target) - obs.pitch;
    actuator.turn(intensity(yaw));
    actuator.pitch(intensity(pitch));
    yaw.abs() <= AIM_TOLERANCE && pitch.abs() <= AIM_TOLERANCE
}

/// Pitch towards an absolute angle without turning.
pub fn look_pitch(obs: &Observation, actuator: &mut dyn Actuator, pitch: f64) -> bool {
    let delta = pitch - obs.pitch;
    actuator.pitch(intensity(delta));
    delta.abs() <= AIM_TOLERANCE
}

/// Face `yaw`, level the view and walk once roughly aligned, hopping over one-block steps.
pub fn walk_heading(obs: &Observation, actuator: &mut dyn Actuator, yaw: f64) {
    let delta = angle_delta(obs.yaw, yaw);
    actuator.turn(intensity(delta));
    actuator.pitch(intensity(-obs.pitch));
    let walking = delta.abs() <= WALK_CONE;
    actuator.move_forward(if walking { 1.0 } else { 0.0 });
    actuator.jump(walking && blocked_ahead(obs));
}

/// Walk towards `target`. Returns `false` when the agent's own position is unknown.
pub fn walk_towards(obs: &Observation, actuator: &mut dyn Actuator, target: Position) -> bool {
    let Some(pos) = obs.position else {
        return false;
    };
    walk_heading(obs, actuator, pos.yaw_towards(target));
    true
}

/// The block in front of the agent's feet is solid.
pub fn blocked_ahead(obs: &Observation) -> bool {
    let Some(pos) = obs.position else {
        return false;
    };
    let (dx, dz) = forward_step(obs.yaw);
    obs.block_at(pos.block().offset(dx, 0, dz))
        .is_some_and(|block| !block.is_passable())
}
