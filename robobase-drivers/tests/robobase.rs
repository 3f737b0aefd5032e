//! Both peripherals of a robot base on one simulated board

use robobase_core::config::{CyclePolicy, RoboBaseConfig};
use robobase_core::traits::{Direction, DualMotorDriver, RangeError, RangeSensor};
use robobase_drivers::{HcSr04, L298n};
use robobase_hal::sim::{EchoProfile, SimBoard};
use robobase_hal::Level;

/// Distance below which the base turns instead of driving on (cm × 100)
const TOO_CLOSE: u32 = 2000;

#[test]
fn test_obstacle_loop_on_shared_board() {
    let config = RoboBaseConfig::default();
    config.validate().unwrap();

    let board = SimBoard::new();
    let rf = config.rangefinder;
    board.attach_sonar(rf.trigger, rf.echo, EchoProfile::pulse(150, 58 * 50));

    let mut sonar = HcSr04::with_config(&board, &board, &rf);
    let mut motors = L298n::new(&board, config.motors);
    sonar.begin();
    motors.begin();

    // Clear path at 50 cm: drive straight
    let reading = sonar.measure(rf.max_distance_cm);
    assert_eq!(reading, 5000);
    motors.set_motor(1, Direction::Forward, 180);
    motors.set_motor(2, Direction::Forward, 180);
    assert_eq!(board.pin(config.motors.motor1_pwm).duty, Some(180));
    assert_eq!(board.pin(config.motors.motor2_pwm).duty, Some(180));

    // Obstacle at 12 cm: stop, then spin
    board.set_echo(EchoProfile::pulse(150, 58 * 12));
    let reading = sonar.measure(rf.max_distance_cm);
    assert_eq!(reading, 1200);
    assert!(reading < TOO_CLOSE);
    motors.stop_all();
    motors.set_motor(1, Direction::Backward, 120);
    motors.set_motor(2, Direction::Forward, 120);
    assert_eq!(board.pin(config.motors.motor1_dir.pin).level, Level::High);
    assert_eq!(board.pin(config.motors.motor2_dir.pin).level, Level::Low);

    // Sensor unplugged: the sentinel is not a distance
    board.set_echo(EchoProfile::silent());
    assert_eq!(sonar.measure(rf.max_distance_cm), 0);
    assert_eq!(sonar.ping(rf.max_distance_cm), Err(RangeError::NoEchoDetected));

    // Ranging never touched the motor pins
    assert_eq!(board.pin(config.motors.motor1_pwm).duty, Some(120));
    assert_eq!(board.pin(rf.trigger).level, Level::Low);
}

#[test]
fn test_enforced_spacing_from_config() {
    let mut config = RoboBaseConfig::default();
    config.rangefinder.cycle = CyclePolicy::recommended();

    let board = SimBoard::new();
    let rf = config.rangefinder;
    board.attach_sonar(rf.trigger, rf.echo, EchoProfile::pulse(150, 580));
    let mut sonar = HcSr04::with_config(&board, &board, &rf);
    sonar.begin();

    let start = board.now();
    for _ in 0..3 {
        assert_eq!(sonar.measure(rf.max_distance_cm), 1000);
    }
    assert_eq!(board.now() - start, 3 * 60_000);
}
