use embedded_hal::digital::v2::OutputPin;

use crate::interfaces::{LedSelector, StatusSignal};

/// Green, red and yellow status LEDs on push-pull outputs.
///
/// Lit LEDs latch: a fault stays visible until [`StatusLeds::clear`], so a
/// transient fault in flight can still be seen after landing.
pub struct StatusLeds<G, R, Y> {
    green: G,
    red: R,
    yellow: Y,
}

impl<G, R, Y> StatusLeds<G, R, Y>
where
    G: OutputPin,
    R: OutputPin,
    Y: OutputPin,
{
    pub fn new(green: G, red: R, yellow: Y) -> Self {
        Self { green, red, yellow }
    }

    /// Turns every LED off.
    pub fn clear(&mut self) {
        let _ = self.green.set_low();
        let _ = self.red.set_low();
        let _ = self.yellow.set_low();
    }
}

impl<G, R, Y> StatusSignal for StatusLeds<G, R, Y>
where
    G: OutputPin,
    R: OutputPin,
    Y: OutputPin,
{
    // pin errors are dropped, a dead LED must not stop the control loop
    fn error_led(&mut self, selector: LedSelector) {
        let _ = match selector {
            LedSelector::Green => self.green.set_high().map_err(|_| ()),
            LedSelector::Red => self.red.set_high().map_err(|_| ()),
            LedSelector::Yellow => self.yellow.set_high().map_err(|_| ()),
        };
    }
}
