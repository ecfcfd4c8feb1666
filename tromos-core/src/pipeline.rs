//! The polled control loop
//!
//! One `tick()` per invocation of the hosting environment's main loop:
//! apply pending cloud writes, debounce the buttons, acquire and
//! transform when the read interval has elapsed, decide, drive the
//! actuator, and report to the display and cloud collaborators.
//!
//! A sensor fault suppresses the actuation decision for that tick; the
//! last-known `ControlState` is retained and the output pin simply
//! holds its level. Persistence failures never stop the loop.

use embedded_hal::delay::DelayNs;

use crate::config::{AcquisitionMode, ConfigError, ControlConfig};
use crate::control::{classify, ControlState, TremorStatus};
use crate::input::Debouncer;
use crate::sample::Sampler;
use crate::traits::{
    ActuatorPin, Clock, CloudCommand, CloudLink, DisplaySink, PreferenceStore, SampleSource,
    SensorError,
};
use crate::transform::{Reading, Transform, TransformError};

/// Raw button levels observed this tick (true = HIGH / released)
#[derive(Debug, Clone, Copy)]
pub struct RawInputs {
    /// Mode toggle button
    pub mode_level: bool,
    /// Manual output toggle button
    pub output_level: bool,
}

impl Default for RawInputs {
    fn default() -> Self {
        // Buttons idle HIGH behind pull-ups
        Self {
            mode_level: true,
            output_level: true,
        }
    }
}

/// What one tick produced
#[derive(Debug, Clone, Copy, Default)]
pub struct TickReport {
    /// Reading acquired this tick, if the interval had elapsed
    pub reading: Option<Reading>,
    /// Band classification of this tick's reading, if spectral
    pub tremor: Option<TremorStatus>,
    /// True if the output command or state changed this tick
    pub command_changed: bool,
    /// Sensor fault that suppressed this tick's decision
    pub fault: Option<SensorError>,
}

/// Sampler → transform → decision → actuation/report, one tick at a time
pub struct ControlLoop<X, S, A, D, P, L> {
    sampler: Sampler<S>,
    transform: X,
    actuator: A,
    display: D,
    store: P,
    cloud: L,
    config: ControlConfig,
    state: ControlState,
    mode_button: Debouncer,
    output_button: Debouncer,
    last_reading: Option<Reading>,
    last_acquire_ms: Option<u64>,
    sensor_healthy: bool,
}

impl<X, S, A, D, P, L> ControlLoop<X, S, A, D, P, L>
where
    X: Transform,
    S: SampleSource,
    A: ActuatorPin,
    D: DisplaySink,
    P: PreferenceStore,
    L: CloudLink,
{
    /// Assemble a loop from its collaborators
    ///
    /// Restores persisted state and drives the actuator to the restored
    /// command before the first tick. Fails if the transform's window
    /// does not match the sampler's.
    pub fn new(
        sampler: Sampler<S>,
        transform: X,
        mut actuator: A,
        display: D,
        mut store: P,
        cloud: L,
        config: ControlConfig,
    ) -> Result<Self, ConfigError> {
        if let Some(expected) = transform.expected_len() {
            let got = match sampler.config().mode {
                AcquisitionMode::Window { samples } => samples,
                AcquisitionMode::Burst { samples, .. } => samples,
            };
            if expected != got {
                return Err(ConfigError::WindowMismatch { expected, got });
            }
        }

        let state = ControlState::load(&mut store, &config);
        actuator.set_level(config.polarity.level_for(state.output_on));

        Ok(Self {
            sampler,
            transform,
            actuator,
            display,
            store,
            cloud,
            state,
            mode_button: Debouncer::new(config.debounce_ms, true),
            output_button: Debouncer::new(config.debounce_ms, true),
            config,
            last_reading: None,
            last_acquire_ms: None,
            sensor_healthy: true,
        })
    }

    /// Current control state
    pub fn state(&self) -> &ControlState {
        &self.state
    }

    /// Most recent successful reading
    pub fn last_reading(&self) -> Option<&Reading> {
        self.last_reading.as_ref()
    }

    /// False after a failed acquisition, until the next good one
    pub fn sensor_healthy(&self) -> bool {
        self.sensor_healthy
    }

    /// Run one loop iteration
    pub fn tick(
        &mut self,
        clock: &mut impl Clock,
        delay: &mut impl DelayNs,
        inputs: RawInputs,
    ) -> TickReport {
        let now = clock.now_ms();
        let mut report = TickReport::default();

        // External writes apply before this tick's decision
        while let Some(command) = self.cloud.poll() {
            let changed = match command {
                CloudCommand::SetSetpoint(value) => self.state.set_setpoint(value, now),
                CloudCommand::SetMode(mode) => self.state.set_mode(mode, now),
                CloudCommand::SetOutput(on) => self.state.set_output(on, now),
            };
            report.command_changed |= changed;
        }

        if self.mode_button.poll(inputs.mode_level, now).is_some() {
            self.state.toggle_mode(now);
            report.command_changed = true;
        }
        if self.output_button.poll(inputs.output_level, now).is_some()
            && self.state.toggle_output(now)
        {
            report.command_changed = true;
        }

        if self.acquisition_due(now) {
            self.last_acquire_ms = Some(now);
            match self.sampler.acquire(delay) {
                Ok(buffer) => match self.transform.apply(buffer, now) {
                    Ok(reading) => {
                        self.sensor_healthy = true;
                        report.tremor = classify(&reading.derived);
                        report.command_changed |= self.state.apply_reading(&reading);
                        report.reading = Some(reading);
                        self.last_reading = Some(reading);
                    }
                    Err(TransformError::Sensor(e)) => {
                        self.sensor_healthy = false;
                        report.fault = Some(e);
                    }
                    Err(_) => {
                        self.sensor_healthy = false;
                        report.fault = Some(SensorError::ConversionError);
                    }
                },
                Err(e) => {
                    self.sensor_healthy = false;
                    report.fault = Some(e);
                }
            }
        }

        if report.command_changed {
            self.persist_state();
        }

        // Re-drive the pin from state every tick; on a faulted tick the
        // state was not re-decided, so the level holds.
        self.actuator
            .set_level(self.config.polarity.level_for(self.state.output_on));

        self.display.render(&self.state, self.last_reading.as_ref());
        self.cloud.publish(&self.state, self.last_reading.as_ref());

        report
    }

    fn acquisition_due(&self, now_ms: u64) -> bool {
        match self.last_acquire_ms {
            None => true,
            Some(last) => {
                now_ms.saturating_sub(last) >= u64::from(self.config.read_interval_ms)
            }
        }
    }

    fn persist_state(&mut self) {
        if self.state.save(&mut self.store).is_err() {
            // Keep running on in-memory state
            #[cfg(feature = "defmt")]
            defmt::warn!("preference store unavailable; state kept in memory");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ControlConfig, SamplerConfig, ThermalConfig};
    use crate::control::{Mode, KEY_MODE, KEY_OUTPUT, KEY_SETPOINT};
    use crate::traits::StorageError;
    use crate::transform::ThermalConverter;
    use core::cell::{Cell, RefCell};
    use std::vec::Vec;

    // ADC codes against the default 10k/B3950 divider:
    // 1200 ≈ 42 °C (above the 25 °C default setpoint), 3000 ≈ 0 °C.
    const ADC_HOT: f32 = 1200.0;
    const ADC_COLD: f32 = 3000.0;

    struct FakeClock(u64);

    impl Clock for FakeClock {
        fn now_ms(&mut self) -> u64 {
            self.0
        }
    }

    struct NoDelay;

    impl DelayNs for NoDelay {
        fn delay_ns(&mut self, _ns: u32) {}
    }

    struct FakeSource {
        value: f32,
        fail: bool,
    }

    impl SampleSource for FakeSource {
        fn read_raw(&mut self) -> Result<f32, SensorError> {
            if self.fail {
                Err(SensorError::Unavailable)
            } else {
                Ok(self.value)
            }
        }
    }

    // The loop takes shared references to the fakes so tests can keep
    // inspecting them from outside; interior mutability stands in for
    // the hardware the real collaborators would touch.
    #[derive(Default)]
    struct FakeStore {
        setpoint: Cell<Option<f32>>,
        auto: Cell<Option<bool>>,
        output: Cell<Option<bool>>,
        fail_puts: bool,
        puts: Cell<usize>,
    }

    impl PreferenceStore for &FakeStore {
        fn get_f32(&mut self, key: &str, default: f32) -> f32 {
            match key {
                KEY_SETPOINT => self.setpoint.get().unwrap_or(default),
                _ => default,
            }
        }

        fn get_bool(&mut self, key: &str, default: bool) -> bool {
            match key {
                KEY_MODE => self.auto.get().unwrap_or(default),
                KEY_OUTPUT => self.output.get().unwrap_or(default),
                _ => default,
            }
        }

        fn put_f32(&mut self, key: &str, value: f32) -> Result<(), StorageError> {
            if self.fail_puts {
                return Err(StorageError::Unavailable);
            }
            self.puts.set(self.puts.get() + 1);
            if key == KEY_SETPOINT {
                self.setpoint.set(Some(value));
            }
            Ok(())
        }

        fn put_bool(&mut self, key: &str, value: bool) -> Result<(), StorageError> {
            if self.fail_puts {
                return Err(StorageError::Unavailable);
            }
            self.puts.set(self.puts.get() + 1);
            match key {
                KEY_MODE => self.auto.set(Some(value)),
                KEY_OUTPUT => self.output.set(Some(value)),
                _ => {}
            }
            Ok(())
        }
    }

    #[derive(Default)]
    struct FakePin {
        level: Cell<bool>,
        writes: Cell<usize>,
    }

    impl ActuatorPin for &FakePin {
        fn set_level(&mut self, high: bool) {
            self.level.set(high);
            self.writes.set(self.writes.get() + 1);
        }

        fn level(&self) -> bool {
            self.level.get()
        }
    }

    #[derive(Default)]
    struct FakeDisplay {
        renders: Cell<usize>,
    }

    impl DisplaySink for &FakeDisplay {
        fn render(&mut self, _state: &ControlState, _reading: Option<&Reading>) {
            self.renders.set(self.renders.get() + 1);
        }
    }

    #[derive(Default)]
    struct FakeCloud {
        pending: RefCell<Vec<CloudCommand>>,
        publishes: Cell<usize>,
    }

    impl CloudLink for &FakeCloud {
        fn publish(&mut self, _state: &ControlState, _reading: Option<&Reading>) {
            self.publishes.set(self.publishes.get() + 1);
        }

        fn poll(&mut self) -> Option<CloudCommand> {
            let mut pending = self.pending.borrow_mut();
            if pending.is_empty() {
                None
            } else {
                Some(pending.remove(0))
            }
        }
    }

    type CoolerLoop<'a> = ControlLoop<
        ThermalConverter,
        FakeSource,
        &'a FakePin,
        &'a FakeDisplay,
        &'a FakeStore,
        &'a FakeCloud,
    >;

    fn cooler_loop<'a>(
        source: FakeSource,
        store: &'a FakeStore,
        pin: &'a FakePin,
        display: &'a FakeDisplay,
        cloud: &'a FakeCloud,
    ) -> CoolerLoop<'a> {
        let sampler = Sampler::new(source, SamplerConfig::thermistor_burst()).unwrap();
        let transform = ThermalConverter::new(ThermalConfig::default()).unwrap();
        ControlLoop::new(
            sampler,
            transform,
            pin,
            display,
            store,
            cloud,
            ControlConfig::default(),
        )
        .unwrap()
    }

    fn hot_source() -> FakeSource {
        FakeSource {
            value: ADC_HOT,
            fail: false,
        }
    }

    fn cold_source() -> FakeSource {
        FakeSource {
            value: ADC_COLD,
            fail: false,
        }
    }

    #[test]
    fn startup_restores_state_and_drives_relay() {
        let pin = FakePin::default();
        let display = FakeDisplay::default();
        let cloud = FakeCloud::default();
        let store = FakeStore::default();
        store.setpoint.set(Some(30.0));
        store.auto.set(Some(false));
        store.output.set(Some(true));

        let control = cooler_loop(cold_source(), &store, &pin, &display, &cloud);

        assert_eq!(control.state().setpoint, 30.0);
        assert_eq!(control.state().mode, Mode::Manual);
        assert!(control.state().output_on);
        // Active-low: ON drives the pin LOW before the first tick
        assert!(!pin.level.get());
    }

    #[test]
    fn auto_tick_decides_and_persists() {
        let pin = FakePin::default();
        let display = FakeDisplay::default();
        let cloud = FakeCloud::default();
        let store = FakeStore::default();
        let mut control = cooler_loop(hot_source(), &store, &pin, &display, &cloud);

        let report = control.tick(&mut FakeClock(1000), &mut NoDelay, RawInputs::default());

        assert!(report.command_changed);
        assert!(report.fault.is_none());
        assert!(control.state().output_on);
        assert_eq!(control.state().last_change_ms, 1000);
        assert!(!pin.level.get(), "active-low ON");
        assert_eq!(display.renders.get(), 1);
        assert_eq!(cloud.publishes.get(), 1);
        assert_eq!(store.output.get(), Some(true), "command change persisted");
    }

    #[test]
    fn cold_reading_keeps_output_off() {
        let pin = FakePin::default();
        let display = FakeDisplay::default();
        let cloud = FakeCloud::default();
        let store = FakeStore::default();
        let mut control = cooler_loop(cold_source(), &store, &pin, &display, &cloud);

        let report = control.tick(&mut FakeClock(1000), &mut NoDelay, RawInputs::default());

        assert!(!report.command_changed);
        assert!(!control.state().output_on);
        assert!(pin.level.get(), "active-low OFF holds the pin HIGH");
        assert_eq!(store.puts.get(), 0, "no change, nothing persisted");
    }

    #[test]
    fn sensor_fault_suppresses_decision_and_holds_output() {
        let pin = FakePin::default();
        let display = FakeDisplay::default();
        let cloud = FakeCloud::default();
        let store = FakeStore::default();
        store.output.set(Some(true));
        let source = FakeSource {
            value: ADC_COLD,
            fail: true,
        };
        let mut control = cooler_loop(source, &store, &pin, &display, &cloud);

        let report = control.tick(&mut FakeClock(1000), &mut NoDelay, RawInputs::default());

        assert_eq!(report.fault, Some(SensorError::Unavailable));
        assert!(!report.command_changed);
        assert!(!control.sensor_healthy());
        // A cold reading would have turned the output off; the fault
        // must leave it alone instead.
        assert!(control.state().output_on);
        assert!(!pin.level.get());
        // Reporting continues on faulted ticks
        assert_eq!(display.renders.get(), 1);
        assert_eq!(cloud.publishes.get(), 1);
    }

    #[test]
    fn cloud_setpoint_applies_before_decision() {
        let pin = FakePin::default();
        let display = FakeDisplay::default();
        let cloud = FakeCloud::default();
        let store = FakeStore::default();
        cloud
            .pending
            .borrow_mut()
            .push(CloudCommand::SetSetpoint(50.0));
        let mut control = cooler_loop(hot_source(), &store, &pin, &display, &cloud);

        let report = control.tick(&mut FakeClock(1000), &mut NoDelay, RawInputs::default());

        // ~42 °C is above the 25 °C default but below the new setpoint
        assert_eq!(control.state().setpoint, 50.0);
        assert!(!control.state().output_on);
        assert!(report.command_changed, "setpoint change persists");
        assert_eq!(store.setpoint.get(), Some(50.0));
    }

    #[test]
    fn mode_button_debounces_then_toggles() {
        let pin = FakePin::default();
        let display = FakeDisplay::default();
        let cloud = FakeCloud::default();
        let store = FakeStore::default();
        let mut control = cooler_loop(cold_source(), &store, &pin, &display, &cloud);

        let pressed = RawInputs {
            mode_level: false,
            output_level: true,
        };
        // First observation of the press: transition only, no toggle
        control.tick(&mut FakeClock(0), &mut NoDelay, pressed);
        assert_eq!(control.state().mode, Mode::Auto);

        // Held through the debounce window: toggles to manual
        let report = control.tick(&mut FakeClock(50), &mut NoDelay, pressed);
        assert!(report.command_changed);
        assert_eq!(control.state().mode, Mode::Manual);

        // Manual output now follows cloud writes
        cloud
            .pending
            .borrow_mut()
            .push(CloudCommand::SetOutput(true));
        control.tick(&mut FakeClock(120), &mut NoDelay, RawInputs::default());
        assert!(control.state().output_on);
        assert!(!pin.level.get());
    }

    #[test]
    fn persistence_failure_is_not_fatal() {
        let pin = FakePin::default();
        let display = FakeDisplay::default();
        let cloud = FakeCloud::default();
        let store = FakeStore {
            fail_puts: true,
            ..FakeStore::default()
        };
        let mut control = cooler_loop(hot_source(), &store, &pin, &display, &cloud);

        let report = control.tick(&mut FakeClock(1000), &mut NoDelay, RawInputs::default());

        // Decision still lands in memory and on the pin
        assert!(report.command_changed);
        assert!(control.state().output_on);
        assert!(!pin.level.get());
    }

    #[test]
    fn read_interval_throttles_acquisition() {
        let pin = FakePin::default();
        let display = FakeDisplay::default();
        let cloud = FakeCloud::default();
        let store = FakeStore::default();
        let mut control = cooler_loop(cold_source(), &store, &pin, &display, &cloud);

        let first = control.tick(&mut FakeClock(0), &mut NoDelay, RawInputs::default());
        assert!(first.reading.is_some());

        let second = control.tick(&mut FakeClock(500), &mut NoDelay, RawInputs::default());
        assert!(second.reading.is_none(), "interval not yet elapsed");

        let third = control.tick(&mut FakeClock(1000), &mut NoDelay, RawInputs::default());
        assert!(third.reading.is_some());
    }

    #[test]
    fn window_mismatch_fails_construction() {
        use crate::config::SpectralConfig;
        use crate::transform::SpectralAnalyzer;

        let sampler =
            Sampler::new(cold_source(), SamplerConfig::thermistor_burst()).unwrap();
        let transform = SpectralAnalyzer::new(SpectralConfig::default()).unwrap();
        let result = ControlLoop::new(
            sampler,
            transform,
            (),
            (),
            (),
            (),
            ControlConfig::default(),
        );
        assert_eq!(
            result.err(),
            Some(ConfigError::WindowMismatch {
                expected: 256,
                got: 10
            })
        );
    }
}
