#[macro_use]
extern crate tracing;

use arcube::{
    logging::init_logging,
    settings::{
        Settings,
        SETTINGS_FILE_NAME,
    },
    engine::{
        LimitedReason,
        SceneEvents,
        TrackingState,
    },
    gesture::{
        GestureRecognizer,
        Touch,
        TouchPhase,
    },
    headless::HeadlessEngine,
    scene::SceneController,
};
use std::{
    env::args,
    path::Path,
    process::exit,
    time::Duration,
};
use vek::*;


const CLI_INTRO: &'static str = r#"ARCube headless demo.

Drops cubes onto detected planes and blows them up, against an in-memory engine."#;

const CLI_HELP: &'static str = r#"
Examples:

    [this command]
    Run the scripted session and print every engine command.

    [this command] --settings=settings.json --log-file=log
    Run with explicit settings, also logging to a file.

Env var examples:
    RUST_LOG=arcube=trace
    Changes logging levels"#;


fn main() {
    println!("{}", CLI_INTRO);
    let args = args().collect::<Vec<_>>();
    if args.get(1).map(String::as_str) == Some("--help") {
        println!("{}", CLI_HELP);
        return;
    }

    let log_file = args.iter()
        .filter_map(|arg| arg.strip_prefix("--log-file="))
        .next();
    if let Err(e) = init_logging(log_file.map(Path::new)) {
        eprintln!("error initializing logging: {:#}", e);
        exit(1);
    }

    let settings_path = args.iter()
        .filter_map(|arg| arg.strip_prefix("--settings="))
        .next()
        .unwrap_or(SETTINGS_FILE_NAME);
    let settings = Settings::read(settings_path);

    let engine = run_demo(settings);
    for command in &engine.commands {
        println!("{:?}", command);
    }
    info!(commands=engine.commands.len(), "demo finished");
}

// scripted session: find a table, drop some cubes, blow them up, hide the planes
fn run_demo(settings: Settings) -> HeadlessEngine {
    let mut gestures = GestureRecognizer::from_settings(&settings);
    let mut scene = SceneController::new(HeadlessEngine::new(), settings);

    scene.on_tracking_state(TrackingState::Limited(LimitedReason::Initializing));
    scene.on_plane_detected("table".into(), Vec3::zero(), Extent2::new(1.0, 0.6));
    scene.on_plane_detected("table-edge".into(), Vec3::new(0.7, 0.0, 0.0), Extent2::new(0.3, 0.3));
    scene.on_tracking_state(TrackingState::Normal);
    scene.on_plane_updated("table".into(), Vec3::new(0.2, 0.0, 0.0), Extent2::new(1.6, 0.8));
    scene.on_plane_removed("table-edge".into());
    scene.on_frame(Some(1000.0));

    let mut t = Duration::ZERO;
    let mut touch = |scene: &mut SceneController<HeadlessEngine>, phase, fingers, x, y, dt_ms| {
        t += Duration::from_millis(dt_ms);
        let sample = Touch {
            phase,
            fingers,
            point: Vec2::new(x, y),
            time: t,
        };
        if let Some(gesture) = gestures.on_touch(sample) {
            scene.on_gesture(gesture);
        }
        if let Some(gesture) = gestures.poll(t) {
            scene.on_gesture(gesture);
        }
        scene.flush_deferred();
    };

    // three taps on the table, one off it
    for &(x, y) in &[(0.0, 0.0), (0.1, 0.05), (-0.2, 0.1), (3.0, 3.0)] {
        touch(&mut scene, TouchPhase::Began, 1, x, y, 100);
        touch(&mut scene, TouchPhase::Ended, 0, x, y, 80);
    }
    scene.on_frame(Some(850.0));

    // hold to blow them up
    touch(&mut scene, TouchPhase::Began, 1, 0.05, 0.0, 200);
    touch(&mut scene, TouchPhase::Moved, 1, 0.05, 0.0, 600);
    touch(&mut scene, TouchPhase::Ended, 0, 0.05, 0.0, 100);

    // one of them flew off the table and hit the floor of the world
    if let Some(key) = scene.bodies().all().first().copied() {
        scene.engine_mut().set_body_position(key, Vec3::new(1.5, -10.0, 0.0));
        if scene.engine().touches_boundary(key) {
            scene.on_boundary_contact(key);
        }
    }

    // two-finger hold to hide the planes
    touch(&mut scene, TouchPhase::Began, 1, 0.0, 0.0, 200);
    touch(&mut scene, TouchPhase::Began, 2, 0.0, 0.0, 30);
    touch(&mut scene, TouchPhase::Moved, 2, 0.0, 0.0, 1000);
    touch(&mut scene, TouchPhase::Ended, 0, 0.0, 0.0, 100);

    scene.on_session_interrupted();
    scene.on_session_interruption_ended();
    scene.on_frame(None);

    scene.into_engine()
}
