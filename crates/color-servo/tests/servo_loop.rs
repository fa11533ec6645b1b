//! End-to-end loop scenarios on synthetic frames: a green square on black,
//! stepped through the full tracker + policy pipeline via the agent.

use color_servo::{
    Agent, AgentConfig, Calibration, Command, PolicyStep, TrackerParams, VehicleState,
};

const W: usize = 96;
const H: usize = 72;
const GREEN: [u8; 3] = [60, 190, 60];

fn black_frame() -> Vec<u8> {
    vec![0u8; W * H * 3]
}

/// Square of the given side centered at (cx, cy).
fn square_frame(cx: usize, cy: usize, side: usize) -> Vec<u8> {
    let mut buf = black_frame();
    for y in cy - side / 2..cy + side / 2 {
        for x in cx - side / 2..cx + side / 2 {
            let i = (y * W + x) * 3;
            buf[i..i + 3].copy_from_slice(&GREEN);
        }
    }
    buf
}

fn agent() -> Agent {
    Agent::new(AgentConfig {
        tracker: TrackerParams {
            min_mass: 2000.0,
            ..TrackerParams::default()
        },
        ..AgentConfig::default()
    })
}

fn command(step: PolicyStep) -> Command {
    match step {
        PolicyStep::Command(cmd) => cmd,
        PolicyStep::Terminate => panic!("unexpected terminate"),
    }
}

fn step(agent: &mut Agent, frame: &[u8], button: i32) -> PolicyStep {
    let vehicle = VehicleState {
        button,
        battery_percent: 87,
        ..VehicleState::default()
    };
    agent.step(frame, W, H, &vehicle).expect("valid frame")
}

#[test]
fn first_sighting_is_neutral_then_control_kicks_in() {
    let mut agent = agent();
    let centered = square_frame(W / 2, H / 2, 12);

    let cmd = command(step(&mut agent, &centered, 0));
    assert_eq!(cmd, Command::NEUTRAL);
    assert_eq!(agent.state().count, 1);

    // Second frame, target above center: throttle climbs.
    let high = square_frame(W / 2, H / 4, 12);
    let cmd = command(step(&mut agent, &high, 0));
    assert!(cmd.throttle > 0.0);
    assert_eq!(agent.state().count, 2);
}

#[test]
fn near_center_rolls_offcenter_yaws() {
    let mut agent = agent();
    step(&mut agent, &square_frame(W / 2, H / 2, 12), 0);

    // Slightly right of center, still in the inner region.
    let cmd = command(step(&mut agent, &square_frame(W / 2 + 8, H / 2, 12), 0));
    assert!(cmd.roll > 0.0);
    assert_eq!(cmd.yaw, 0.0);

    // Hard left, outer third: rotate instead of drifting.
    let cmd = command(step(&mut agent, &square_frame(10, H / 2, 12), 0));
    assert_eq!(cmd.roll, 0.0);
    assert!(cmd.yaw < 0.0);
}

#[test]
fn calibration_then_size_driven_pitch() {
    let mut agent = agent();
    let baseline = square_frame(W / 2, H / 2, 12);

    step(&mut agent, &baseline, 0);
    assert_eq!(agent.state().calibration, Calibration::Uncalibrated);

    // Calibrate on the baseline size; that frame is in-band by definition.
    let cmd = command(step(&mut agent, &baseline, 12));
    assert_eq!(cmd.pitch, 0.0);
    let reference = agent
        .state()
        .calibration
        .reference()
        .expect("calibrated after trigger");
    assert!(reference > 2000.0);

    // Target looms twice as large per side: way past the +25% band, back off.
    let cmd = command(step(&mut agent, &square_frame(W / 2, H / 2, 24), 0));
    assert_eq!(cmd.pitch, 0.1);

    // Target shrinks to half per side: under the -25% band, move in.
    let cmd = command(step(&mut agent, &square_frame(W / 2, H / 2, 6), 0));
    assert_eq!(cmd.pitch, -0.1);

    // Same size again: dead band, hold.
    let cmd = command(step(&mut agent, &baseline, 0));
    assert_eq!(cmd.pitch, 0.0);
}

#[test]
fn blind_frames_hold_neutral_and_freeze_state() {
    let mut agent = agent();
    step(&mut agent, &square_frame(W / 2, H / 2, 12), 0);
    step(&mut agent, &square_frame(W / 2 + 8, H / 2 - 6, 12), 0);
    let before = *agent.state();

    let cmd = command(step(&mut agent, &black_frame(), 0));
    assert_eq!(cmd, Command::NEUTRAL);
    assert_eq!(*agent.state(), before);

    // Reacquisition picks the history back up where it left off.
    let cmd = command(step(&mut agent, &square_frame(W / 2 + 8, H / 2, 12), 0));
    assert!(cmd.roll != 0.0);
    assert_eq!(agent.state().count, before.count + 1);
}

#[test]
fn shutdown_terminates_the_loop() {
    let mut agent = agent();
    let centered = square_frame(W / 2, H / 2, 12);
    step(&mut agent, &centered, 0);

    agent.shutdown_handle().request();
    assert_eq!(step(&mut agent, &centered, 0), PolicyStep::Terminate);
}

#[test]
fn mask_debug_artifacts_cover_the_blob() {
    let mut agent = agent();
    let centered = square_frame(W / 2, H / 2, 12);
    let (_, debug) = agent
        .step_debug(&centered, W, H, &VehicleState::default())
        .expect("valid frame");

    assert_eq!(debug.mask.width, W);
    assert_eq!(debug.mask.height, H);
    assert!(debug.mask.at(W / 2, H / 2) > 0);
    assert_eq!(debug.mask.at(2, 2), 0);
}
