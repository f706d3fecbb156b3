#![no_main]
#![no_std]

mod board;
mod config;

#[rtic::app(device = stm32f4xx_hal::pac, peripherals = true, dispatchers = [SPI2, SPI3])]
mod app {
    use crate::board::Board;
    use crate::config::{sys_config, tuning};
    use core::fmt::Write;
    use cortex_m::asm;
    use osquad::drivers::{QuadEsc, StatusLeds};
    use osquad::estimation::AttitudeState;
    use osquad::interfaces::{LedSelector, StatusSignal};
    use osquad::Quadcopter;
    use panic_write::PanicHandler;
    use pid::Pid;
    use stm32f4xx_hal::{
        adc::{config::AdcConfig, Adc},
        gpio::{Output, PushPull, PC0, PC1, PC2},
        i2c::{I2c, Mode as i2cMode},
        pac::{TIM1, USART2},
        prelude::*,
        serial::{Config, Serial, Tx},
        timer::{Channel1, Channel2, Channel3, Channel4, PwmChannel},
    };
    use systick_monotonic::{fugit::Duration, Systick};

    type Escs = QuadEsc<PwmChannel<TIM1, 0>, PwmChannel<TIM1, 1>, PwmChannel<TIM1, 2>, PwmChannel<TIM1, 3>>;
    type Leds = StatusLeds<PC0<Output<PushPull>>, PC1<Output<PushPull>>, PC2<Output<PushPull>>>;

    #[shared]
    struct Shared {
        attitude: AttitudeState,
    }

    #[local]
    struct Local {
        tx: core::pin::Pin<panic_write::PanicHandler<Tx<USART2>>>,
        quad: Quadcopter<Board, Escs, Leds>,
        roll_pid: Pid<f32>,
        pitch_pid: Pid<f32>,
    }

    #[monotonic(binds = SysTick, default = true)]
    type MonoTimer = Systick<1000>;

    #[init]
    fn init(ctx: init::Context) -> (Shared, Local, init::Monotonics) {
        // configure clocks
        let rcc = ctx.device.RCC.constrain();
        let mono = Systick::new(ctx.core.SYST, sys_config::SYSCLK_HZ);
        let clocks = rcc.cfgr.sysclk(sys_config::SYSCLK_HZ.Hz()).freeze();

        let gpioa = ctx.device.GPIOA.split();
        let gpiob = ctx.device.GPIOB.split();
        let gpioc = ctx.device.GPIOC.split();

        // set up uart tx
        let tx_pin = gpioa.pa2.into_alternate();
        let serial = match Serial::tx(
            ctx.device.USART2,
            tx_pin,
            Config::default()
                .baudrate(sys_config::SERIAL_BAUD.bps())
                .wordlength_8()
                .parity_none(),
            &clocks,
        ) {
            Ok(serial) => serial,
            Err(_) => panic!("usart2 setup failed"),
        };
        let mut tx = PanicHandler::new(serial);

        // configure I2C for the inertial board
        let i2c = I2c::new(
            ctx.device.I2C1,
            (gpiob.pb8, gpiob.pb9),
            i2cMode::Standard {
                frequency: sys_config::I2C_FREQ_KHZ.kHz(),
            },
            &clocks,
        );
        let adc = Adc::adc1(ctx.device.ADC1, true, AdcConfig::default());
        let sensors = Board::new(i2c, adc, gpioa.pa0.into_analog());

        // ESC outputs on TIM1
        let channels = (
            Channel1::new(gpioa.pa8),
            Channel2::new(gpioa.pa9),
            Channel3::new(gpioa.pa10),
            Channel4::new(gpioa.pa11),
        );
        let (m1, m2, m3, m4) = ctx
            .device
            .TIM1
            .pwm_hz(channels, sys_config::ESC_FREQ_HZ.Hz(), &clocks)
            .split();
        let escs = QuadEsc::new(m1, m2, m3, m4);

        let mut leds = StatusLeds::new(
            gpioc.pc0.into_push_pull_output(),
            gpioc.pc1.into_push_pull_output(),
            gpioc.pc2.into_push_pull_output(),
        );
        leds.clear();
        // green stays on while powered
        leds.error_led(LedSelector::Green);

        let mut quad = Quadcopter::new(sensors, escs, leds);
        if quad.init_sensor() {
            let offsets = quad.offsets();
            writeln!(
                tx,
                "sensors calibrated, gyro offsets {:?} deg/s\r",
                offsets.gyro
            )
            .ok();
        } else {
            writeln!(tx, "sensor initialization failed, running uncorrected\r").ok();
        }
        // a failed arm leaves the motors idle with the red LED lit
        let armed = quad.init_motors(sys_config::START_SPEED);
        if !armed {
            writeln!(tx, "motor initialization failed, staying disarmed\r").ok();
        }

        let roll_pid = tuning::ROLL_TUNING.controller(tuning::ROLL_SETPOINT_DEG);
        let pitch_pid = tuning::PITCH_TUNING.controller(tuning::PITCH_SETPOINT_DEG);

        writeln!(tx, "system initialized\r").ok();

        if armed {
            control::spawn_after(Duration::<u64, 1, 1000>::millis(sys_config::ARMING_DELAY_MS)).ok();
        }
        telemetry::spawn_after(Duration::<u64, 1, 1000>::millis(sys_config::ARMING_DELAY_MS)).ok();

        (
            Shared {
                attitude: AttitudeState::default(),
            },
            Local {
                tx,
                quad,
                roll_pid,
                pitch_pid,
            },
            init::Monotonics(mono),
        )
    }

    #[task(priority = 2, local = [quad, roll_pid, pitch_pid], shared = [attitude])]
    fn control(mut cx: control::Context) {
        let quad = cx.local.quad;
        let now_us = monotonics::now().ticks() * sys_config::MICROS_PER_TICK;
        let attitude = quad.update_attitude(now_us);
        cx.shared.attitude.lock(|shared| *shared = attitude);

        let a = cx.local.roll_pid.next_control_output(attitude.alpha).output;
        let b = cx.local.pitch_pid.next_control_output(attitude.beta).output;
        // failures already raised a status LED
        quad.update_motors(a, b).ok();

        // run at 100 Hz
        control::spawn_after(Duration::<u64, 1, 1000>::millis(sys_config::CONTROL_PERIOD_MS)).ok();
    }

    #[task(priority = 1, local = [tx], shared = [attitude])]
    fn telemetry(mut cx: telemetry::Context) {
        let attitude = cx.shared.attitude.lock(|attitude| *attitude);
        writeln!(
            cx.local.tx,
            "roll {:.2} pitch {:.2} heading {:.2}\r",
            attitude.alpha, attitude.beta, attitude.heading
        )
        .ok();

        telemetry::spawn_after(Duration::<u64, 1, 1000>::millis(sys_config::TELEMETRY_PERIOD_MS)).ok();
    }

    #[idle]
    fn idle(_ctx: idle::Context) -> ! {
        loop {
            asm::nop();
        }
    }
}
