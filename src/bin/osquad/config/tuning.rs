use osquad::controller::TuningParams;

// corrections are in motor command units, so the output limit bounds how far
// one side can be pushed off the operating point
pub const ROLL_OUT_LIM: f32 = 20.0;
pub const PITCH_OUT_LIM: f32 = 20.0;

pub const ROLL_SETPOINT_DEG: f32 = 0.0;
pub const PITCH_SETPOINT_DEG: f32 = 0.0;

pub const ROLL_TUNING: TuningParams = TuningParams {
    kp: 0.8,
    ki: 0.05,
    kd: 0.02,
    p_lim: ROLL_OUT_LIM,
    i_lim: ROLL_OUT_LIM / 4.0,
    d_lim: ROLL_OUT_LIM,
    out_lim: ROLL_OUT_LIM,
};

pub const PITCH_TUNING: TuningParams = TuningParams {
    kp: 0.8,
    ki: 0.05,
    kd: 0.02,
    p_lim: PITCH_OUT_LIM,
    i_lim: PITCH_OUT_LIM / 4.0,
    d_lim: PITCH_OUT_LIM,
    out_lim: PITCH_OUT_LIM,
};
