//! End-to-end flow tests: configuration → controller → session → dispatch.

use niyantra::areas::AreaInfo;
use niyantra::config::{AreaMapping, RawCardConfig};
use niyantra::device::mock::{DeviceCall, FailureKind, MockDevice};
use niyantra::sequencer::SharedDevice;
use niyantra::{
    CardConfig, CardController, CleaningMode, CommandSequencer, Error, ModePolicy, MopMode,
    RouteMode, RunOutcome, ServiceAction, Session, SessionEvent, SuctionMode,
};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn card_config() -> CardConfig {
    CardConfig::build(Some(RawCardConfig {
        entity: Some("vacuum.downstairs".to_string()),
        areas: Some(vec![
            AreaMapping {
                area_id: "kitchen".to_string(),
                device_area_id: 16,
            },
            AreaMapping {
                area_id: "living_room".to_string(),
                device_area_id: 17,
            },
            AreaMapping {
                area_id: "hallway".to_string(),
                device_area_id: 18,
            },
        ]),
        ..RawCardConfig::default()
    }))
    .unwrap()
}

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn full_pipeline_dispatches_ordered_commands() {
    init_logging();
    let device = MockDevice::reporting(SuctionMode::Balanced, MopMode::Moderate, RouteMode::Standard);
    let controller = CardController::new(card_config(), Box::new(device.clone()));

    let (mut session, events) = controller.open_session().unwrap();
    assert_eq!(session.cleaning_mode(), CleaningMode::VacAndMop);

    session.select_suction(SuctionMode::Turbo).unwrap();
    session.select_route(RouteMode::Deep).unwrap();
    session.toggle_area("kitchen");
    session.toggle_area("living_room");
    session.advance_cycles(); // 2

    assert_eq!(controller.run(&mut session).unwrap(), RunOutcome::Dispatched);

    assert_eq!(
        device.calls(),
        vec![
            DeviceCall::SetSuction(SuctionMode::Turbo),
            DeviceCall::SetMop(MopMode::Moderate),
            DeviceCall::SetRoute(RouteMode::Deep),
            DeviceCall::StartSegments {
                area_ids: vec![16, 17],
                cycles: 2,
            },
        ]
    );

    // The session announced its closure last
    let collected: Vec<_> = events.try_iter().collect();
    assert_eq!(collected.last(), Some(&SessionEvent::Closed));
    assert!(!session.is_runnable());
}

#[test]
fn mode_change_repairs_before_dispatch() {
    // Device reports a mop-only state; the operator switches to vac-only.
    let device = MockDevice::reporting(SuctionMode::Off, MopMode::Intense, RouteMode::Deep);
    let controller = CardController::new(card_config(), Box::new(device.clone()));

    let (mut session, _events) = controller.open_session().unwrap();
    assert_eq!(session.cleaning_mode(), CleaningMode::Mop);

    session.select_cleaning_mode(CleaningMode::Vac);
    // Off suction repaired to Turbo, held mop survives under the default
    // tolerant policy
    assert_eq!(session.suction_mode(), SuctionMode::Turbo);

    session.toggle_area("hallway");
    controller.run(&mut session).unwrap();

    assert_eq!(device.calls()[0], DeviceCall::SetSuction(SuctionMode::Turbo));
    assert!(matches!(
        device.calls()[3],
        DeviceCall::StartSegments { ref area_ids, cycles: 1 } if *area_ids == vec![18]
    ));
}

#[test]
fn concurrent_run_is_rejected_by_single_flight_guard() {
    let device = MockDevice::new();
    device.set_settle_delay(Duration::from_millis(40));

    let shared: SharedDevice = Arc::new(Mutex::new(Box::new(device.clone())));
    let area_map = HashMap::from([("kitchen".to_string(), 16u32), ("hallway".to_string(), 18u32)]);
    let sequencer = Arc::new(CommandSequencer::new(shared, area_map));

    let (mut first, _ev1) = Session::from_device(&device, ModePolicy::default()).unwrap();
    first.toggle_area("kitchen");

    let seq = Arc::clone(&sequencer);
    let worker = thread::spawn(move || seq.run(&mut first).unwrap());

    // Give the worker time to acquire the guard and start settling
    thread::sleep(Duration::from_millis(20));

    let (mut second, _ev2) = Session::from_device(&device, ModePolicy::default()).unwrap();
    second.toggle_area("hallway");
    assert_eq!(sequencer.run(&mut second).unwrap(), RunOutcome::Busy);

    assert_eq!(worker.join().unwrap(), RunOutcome::Dispatched);
    assert!(!sequencer.is_in_flight());

    // Only the first session's job started
    let jobs: Vec<_> = device
        .calls()
        .into_iter()
        .filter(|c| matches!(c, DeviceCall::StartSegments { .. }))
        .collect();
    assert_eq!(
        jobs,
        vec![DeviceCall::StartSegments {
            area_ids: vec![16],
            cycles: 1,
        }]
    );
}

#[test]
fn device_failure_leaves_controller_usable() {
    let device = MockDevice::new();
    let controller = CardController::new(card_config(), Box::new(device.clone()));

    let (mut session, _events) = controller.open_session().unwrap();
    session.toggle_area("kitchen");

    device.fail_call(0, FailureKind::Unreachable);
    assert!(matches!(
        controller.run(&mut session),
        Err(Error::DeviceUnreachable(_))
    ));
    assert!(!controller.is_run_in_flight());

    // Guard released; the retry goes through and the action row still works
    assert_eq!(controller.run(&mut session).unwrap(), RunOutcome::Dispatched);
    controller.call_service(ServiceAction::ReturnToBase).unwrap();
}

#[test]
fn configuration_from_toml_to_areas() {
    let toml_str = r#"
entity = "vacuum.downstairs"

[[areas]]
area_id = "kitchen"
device_area_id = 16

[[areas]]
area_id = "cellar"
device_area_id = 20
"#;
    let raw: RawCardConfig = toml::from_str(toml_str).unwrap();
    let controller = CardController::new(
        CardConfig::build(Some(raw)).unwrap(),
        Box::new(MockDevice::new()),
    );

    // Host registry only knows the kitchen
    let mut registry = HashMap::new();
    registry.insert(
        "kitchen".to_string(),
        AreaInfo {
            name: Some("Kitchen".to_string()),
            icon: None,
        },
    );

    let areas = controller.areas(&registry);
    assert_eq!(areas.len(), 1);
    assert_eq!(areas[0].device_area_id, 16);

    let ids = controller.sensor_ids();
    assert_eq!(ids.battery, "sensor.downstairs_battery");
}
