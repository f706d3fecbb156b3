use pid::Pid;

/// Gains and limits of one outer-loop axis controller.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TuningParams {
    pub kp: f32,
    pub ki: f32,
    pub kd: f32,
    pub p_lim: f32,
    pub i_lim: f32,
    pub d_lim: f32,
    pub out_lim: f32,
}

impl TuningParams {
    /// Controller driving the measured angle toward `setpoint`.
    pub fn controller(&self, setpoint: f32) -> Pid<f32> {
        Pid::new(
            self.kp,
            self.ki,
            self.kd,
            self.p_lim,
            self.i_lim,
            self.d_lim,
            self.out_lim,
            setpoint,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proportional_controller_respects_output_limit() {
        let tune = TuningParams {
            kp: 2.0,
            ki: 0.0,
            kd: 0.0,
            p_lim: 100.0,
            i_lim: 100.0,
            d_lim: 100.0,
            out_lim: 15.0,
        };
        let mut pid = tune.controller(0.0);
        assert_eq!(pid.next_control_output(-3.0).output, 6.0);
        assert_eq!(pid.next_control_output(40.0).output, -15.0);
    }
}
