//! Simulated board for host-side tests
//!
//! [`SimBoard`] implements both [`PinBank`] and [`Clock`] on a single
//! shared timeline, so a driver holding `&SimBoard` twice (once as its
//! pins, once as its clock) sees a consistent world.
//!
//! Timing model:
//! - time only moves on `busy_wait_micros` and on `read_digital`
//! - every `read_digital` samples the line, then costs [`POLL_COST_US`]
//! - `now_micros` is free
//!
//! With this model a driver that polls the echo line in a tight loop
//! measures a simulated pulse of `D` µs as exactly `D` µs.

use core::cell::{Cell, RefCell};

use heapless::Vec;

use crate::gpio::{Level, PinBank, PinId, PinMode};
use crate::time::{elapsed_since, Clock};

/// Number of pins tracked by the simulator
pub const MAX_PINS: usize = 32;

/// Capacity of the event log (further events are dropped)
pub const EVENT_LOG_LEN: usize = 64;

/// Simulated cost of one digital read in microseconds
pub const POLL_COST_US: u32 = 1;

/// Something that happened on a simulated pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinEvent {
    /// Pin mode changed
    Mode { pin: PinId, mode: PinMode, at: u32 },
    /// Digital level written
    Digital { pin: PinId, level: Level, at: u32 },
    /// PWM duty written
    Pwm { pin: PinId, duty: u8, at: u32 },
}

/// Observable state of one simulated pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinSnapshot {
    /// Configured mode, `None` until `set_pin_mode` is called
    pub mode: Option<PinMode>,
    /// Last written (or externally driven) level
    pub level: Level,
    /// Last written PWM duty, `None` if never written
    pub duty: Option<u8>,
}

impl PinSnapshot {
    const RESET: Self = Self {
        mode: None,
        level: Level::Low,
        duty: None,
    };
}

/// Behaviour of a simulated ultrasonic sensor's echo line
///
/// Times are relative to the falling edge of the trigger pulse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EchoProfile {
    /// Delay before the echo line rises (`None` = never rises)
    pub rise_delay_us: Option<u32>,
    /// How long the echo line stays high (`None` = never falls)
    pub width_us: Option<u32>,
}

impl EchoProfile {
    /// A clean echo pulse
    pub const fn pulse(rise_delay_us: u32, width_us: u32) -> Self {
        Self {
            rise_delay_us: Some(rise_delay_us),
            width_us: Some(width_us),
        }
    }

    /// Sensor missing or pulse never returned
    pub const fn silent() -> Self {
        Self {
            rise_delay_us: None,
            width_us: None,
        }
    }

    /// Echo rises but the line never falls again
    pub const fn stuck_high(rise_delay_us: u32) -> Self {
        Self {
            rise_delay_us: Some(rise_delay_us),
            width_us: None,
        }
    }

    fn level_at(&self, since_trigger_us: u32) -> Level {
        let Some(rise) = self.rise_delay_us else {
            return Level::Low;
        };
        if since_trigger_us < rise {
            return Level::Low;
        }
        match self.width_us {
            Some(width) if since_trigger_us - rise >= width => Level::Low,
            _ => Level::High,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct SonarWiring {
    trigger: PinId,
    echo: PinId,
    profile: EchoProfile,
}

/// Simulated pin bank and clock
pub struct SimBoard {
    now: Cell<u32>,
    pins: RefCell<[PinSnapshot; MAX_PINS]>,
    events: RefCell<Vec<PinEvent, EVENT_LOG_LEN>>,
    sonar: Cell<Option<SonarWiring>>,
    trigger_fell_at: Cell<Option<u32>>,
}

impl Default for SimBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl SimBoard {
    /// Create a board at time zero with all pins unconfigured and low
    pub fn new() -> Self {
        Self::starting_at(0)
    }

    /// Create a board whose clock starts at `now_us`
    ///
    /// Useful for exercising counter wrap-around.
    pub fn starting_at(now_us: u32) -> Self {
        Self {
            now: Cell::new(now_us),
            pins: RefCell::new([PinSnapshot::RESET; MAX_PINS]),
            events: RefCell::new(Vec::new()),
            sonar: Cell::new(None),
            trigger_fell_at: Cell::new(None),
        }
    }

    /// Attach a simulated ultrasonic sensor to a trigger/echo pin pair
    pub fn attach_sonar(&self, trigger: PinId, echo: PinId, profile: EchoProfile) {
        self.sonar.set(Some(SonarWiring {
            trigger,
            echo,
            profile,
        }));
        self.trigger_fell_at.set(None);
    }

    /// Change the echo behaviour of the attached sensor
    pub fn set_echo(&self, profile: EchoProfile) {
        if let Some(mut wiring) = self.sonar.get() {
            wiring.profile = profile;
            self.sonar.set(Some(wiring));
        }
    }

    /// Drive an input pin from outside the driver
    pub fn drive_input(&self, pin: PinId, level: Level) {
        if let Some(slot) = self.pins.borrow_mut().get_mut(pin as usize) {
            slot.level = level;
        }
    }

    /// Current simulated time
    pub fn now(&self) -> u32 {
        self.now.get()
    }

    /// Move simulated time forward
    pub fn advance(&self, us: u32) {
        self.now.set(self.now.get().wrapping_add(us));
    }

    /// State of one pin (a reset snapshot for out-of-range pins)
    pub fn pin(&self, pin: PinId) -> PinSnapshot {
        self.pins
            .borrow()
            .get(pin as usize)
            .copied()
            .unwrap_or(PinSnapshot::RESET)
    }

    /// Copy of every pin's state, for before/after comparisons
    pub fn snapshot(&self) -> [PinSnapshot; MAX_PINS] {
        *self.pins.borrow()
    }

    /// Copy of the event log
    pub fn events(&self) -> Vec<PinEvent, EVENT_LOG_LEN> {
        self.events.borrow().clone()
    }

    /// Forget all logged events
    pub fn clear_events(&self) {
        self.events.borrow_mut().clear();
    }

    /// Digital writes to one pin, in order, as `(level, time)` pairs
    pub fn digital_writes(&self, pin: PinId) -> Vec<(Level, u32), EVENT_LOG_LEN> {
        self.events
            .borrow()
            .iter()
            .filter_map(|event| match *event {
                PinEvent::Digital { pin: p, level, at } if p == pin => Some((level, at)),
                _ => None,
            })
            .collect()
    }

    fn log(&self, event: PinEvent) {
        // Full log: keep the earliest events, they describe the setup
        let _ = self.events.borrow_mut().push(event);
    }

    fn sonar_level(&self, pin: PinId) -> Option<Level> {
        let wiring = self.sonar.get()?;
        if wiring.echo != pin {
            return None;
        }
        let level = match self.trigger_fell_at.get() {
            Some(fell) => wiring
                .profile
                .level_at(elapsed_since(fell, self.now.get())),
            None => Level::Low,
        };
        Some(level)
    }
}

impl PinBank for &SimBoard {
    fn set_pin_mode(&mut self, pin: PinId, mode: PinMode) {
        if let Some(slot) = self.pins.borrow_mut().get_mut(pin as usize) {
            slot.mode = Some(mode);
        }
        self.log(PinEvent::Mode {
            pin,
            mode,
            at: self.now(),
        });
    }

    fn write_digital(&mut self, pin: PinId, level: Level) {
        let previous = self.pin(pin).level;
        if let Some(slot) = self.pins.borrow_mut().get_mut(pin as usize) {
            slot.level = level;
        }

        if let Some(wiring) = self.sonar.get() {
            if wiring.trigger == pin && previous == Level::High && level == Level::Low {
                self.trigger_fell_at.set(Some(self.now()));
            }
        }

        self.log(PinEvent::Digital {
            pin,
            level,
            at: self.now(),
        });
    }

    fn read_digital(&mut self, pin: PinId) -> Level {
        let level = self
            .sonar_level(pin)
            .unwrap_or_else(|| self.pin(pin).level);
        self.advance(POLL_COST_US);
        level
    }

    fn write_pwm(&mut self, pin: PinId, duty: u8) {
        if let Some(slot) = self.pins.borrow_mut().get_mut(pin as usize) {
            slot.duty = Some(duty);
        }
        self.log(PinEvent::Pwm {
            pin,
            duty,
            at: self.now(),
        });
    }
}

impl Clock for &SimBoard {
    fn now_micros(&mut self) -> u32 {
        self.now()
    }

    fn busy_wait_micros(&mut self, us: u32) {
        self.advance(us);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_cost_one_tick() {
        let board = SimBoard::new();
        let mut pins = &board;

        assert_eq!(pins.read_digital(3), Level::Low);
        assert_eq!(pins.read_digital(3), Level::Low);
        assert_eq!(board.now(), 2);
    }

    #[test]
    fn test_echo_follows_trigger_fall() {
        let board = SimBoard::new();
        board.attach_sonar(2, 3, EchoProfile::pulse(5, 3));
        let mut pins = &board;
        let mut clock = &board;

        // No trigger yet: echo idle
        assert_eq!(pins.read_digital(3), Level::Low);

        pins.write_digital(2, Level::High);
        clock.busy_wait_micros(10);
        pins.write_digital(2, Level::Low);
        let fell = board.now();

        clock.busy_wait_micros(4);
        assert_eq!(pins.read_digital(3), Level::Low); // t = fell + 4
        assert_eq!(pins.read_digital(3), Level::High); // t = fell + 5
        assert_eq!(pins.read_digital(3), Level::High);
        assert_eq!(pins.read_digital(3), Level::High);
        assert_eq!(pins.read_digital(3), Level::Low); // t = fell + 8
        assert_eq!(board.now(), fell + 9);
    }

    #[test]
    fn test_silent_and_stuck_profiles() {
        assert_eq!(EchoProfile::silent().level_at(1_000_000), Level::Low);
        assert_eq!(EchoProfile::stuck_high(10).level_at(9), Level::Low);
        assert_eq!(EchoProfile::stuck_high(10).level_at(u32::MAX), Level::High);
    }

    #[test]
    fn test_writes_are_recorded() {
        let board = SimBoard::new();
        let mut pins = &board;

        pins.set_pin_mode(9, PinMode::Output);
        pins.write_pwm(9, 128);
        pins.write_digital(8, Level::High);

        let pin = board.pin(9);
        assert_eq!(pin.mode, Some(PinMode::Output));
        assert_eq!(pin.duty, Some(128));
        assert_eq!(board.pin(8).level, Level::High);
        assert_eq!(board.events().len(), 3);
        assert_eq!(board.digital_writes(8).as_slice(), &[(Level::High, 0)]);
    }

    #[test]
    fn test_out_of_range_pin_is_ignored() {
        let board = SimBoard::new();
        let mut pins = &board;

        pins.write_digital(200, Level::High);
        assert_eq!(pins.read_digital(200), Level::Low);
        assert_eq!(board.pin(200), PinSnapshot::RESET);
    }
}
