//! End-to-end lifecycle scenarios.

use service_system::observability::init_logging;
use service_system::{
    Behavior, Behaviors, LifecycleError, ServiceConfig, ServiceRecord, System, SystemError,
};

mod common;

use common::{composition_behaviors, composition_config, Recorder};

#[test]
fn test_start_single_service_starts_dependencies() {
    init_logging("service_system=debug");
    let recorder = Recorder::default();
    let mut system = System::new(composition_config(), composition_behaviors(&recorder)).unwrap();

    system.start("sum").unwrap();

    assert_eq!(recorder.events(), vec!["start x", "start y", "start sum"]);
    assert_eq!(system.get("x"), Some(&1));
    assert_eq!(system.get("y"), Some(&2));
    assert_eq!(system.get("sum"), Some(&3));
    assert_eq!(recorder.starts(), 3);

    system.start_all().unwrap();
    assert_eq!(recorder.starts(), 3);
}

#[test]
fn test_start_is_idempotent() {
    let recorder = Recorder::default();
    let mut system = System::new(composition_config(), composition_behaviors(&recorder)).unwrap();

    system.start("x").unwrap().start("x").unwrap();

    assert_eq!(recorder.starts(), 1);
    assert_eq!(system.get("x"), Some(&1));
}

#[test]
fn test_partial_start_then_bulk_start_finishes_remainder() {
    let recorder = Recorder::default();
    let mut system = System::new(composition_config(), composition_behaviors(&recorder)).unwrap();

    system.start("y").unwrap();
    assert_eq!(recorder.starts(), 2);
    assert!(!system.is_running("sum"));

    system.start_all().unwrap();
    assert_eq!(recorder.starts(), 3);
    assert_eq!(system.get("sum"), Some(&3));
}

#[test]
fn test_display_lists_running_services() {
    let recorder = Recorder::default();
    let mut system = System::new(composition_config(), composition_behaviors(&recorder)).unwrap();
    assert_eq!(system.to_string(), "System");

    system.start("sum").unwrap();
    assert_eq!(system.to_string(), "System{x, y, sum}");
}

#[test]
fn test_stop_without_running_services_is_noop() {
    let recorder = Recorder::default();
    let mut system = System::new(composition_config(), composition_behaviors(&recorder)).unwrap();

    system.stop_all().unwrap();
    system.stop("x").unwrap();

    assert_eq!(recorder.stops(), 0);
    assert_eq!(recorder.starts(), 0);
}

#[test]
fn test_start_stop_round_trip() {
    let recorder = Recorder::default();
    let mut system = System::new(composition_config(), composition_behaviors(&recorder)).unwrap();

    system.start_all().unwrap().stop_all().unwrap();

    assert_eq!(system.running().count(), 0);
    for name in ["x", "y", "sum"] {
        assert_eq!(system.get(name), None);
    }
    assert_eq!(
        recorder.events(),
        vec!["start x", "start y", "start sum", "stop 3", "stop 2", "stop 1"]
    );
}

#[test]
fn test_failed_start_keeps_dependencies_running() {
    let recorder = Recorder::default();
    let config = ServiceConfig::new()
        .service("db", ServiceRecord::new().field("val", 5))
        .service("api", ServiceRecord::new().depends_on("db"));
    let behaviors = Behaviors::new()
        .with("db", recorder.behavior(common::own_val))
        .with("api", recorder.behavior(|_| Err("port already in use".into())));

    let mut system = System::new(config, behaviors).unwrap();
    let err = system.start("api").unwrap_err();

    assert_eq!(err.to_string(), "port already in use");
    assert!(matches!(err, LifecycleError::Callback(_)));
    assert!(system.is_running("db"));
    assert!(!system.is_running("api"));
    assert_eq!(system.to_string(), "System{db}");
}

#[test]
fn test_callback_error_is_passed_through() {
    #[derive(Debug, thiserror::Error)]
    #[error("disk full")]
    struct DiskFull;

    let config = ServiceConfig::new().service("store", ServiceRecord::new());
    let behaviors: Behaviors<()> =
        Behaviors::new().with("store", Behavior::new(|_| Err(DiskFull.into())));

    let mut system = System::new(config, behaviors).unwrap();
    let source = system.start("store").unwrap_err().into_callback_error().unwrap();
    assert!(source.downcast_ref::<DiskFull>().is_some());
}

#[test]
fn test_failed_stop_keeps_service_running() {
    let config = ServiceConfig::new().service("conn", ServiceRecord::new());
    let behaviors = Behaviors::new().with(
        "conn",
        Behavior::new(|_| Ok(7)).with_stop(|_, _| Err("still draining".into())),
    );

    let mut system = System::new(config, behaviors).unwrap();
    system.start("conn").unwrap();

    assert!(system.stop("conn").is_err());
    assert_eq!(system.get("conn"), Some(&7));
}

#[test]
fn test_service_without_stop_still_stops() {
    let config = ServiceConfig::new().service("timer", ServiceRecord::new());
    let behaviors = Behaviors::new().with("timer", Behavior::new(|_| Ok("tick")));

    let mut system = System::new(config, behaviors).unwrap();
    system.start("timer").unwrap().stop("timer").unwrap();

    assert!(!system.is_running("timer"));
}

#[test]
fn test_missing_behavior_fails_eagerly_only_when_validated() {
    let config = ServiceConfig::new()
        .service("x", ServiceRecord::new().field("val", 1))
        .service("orphan", ServiceRecord::new().depends_on("x"));
    let recorder = Recorder::default();

    let validated = System::validated(
        config.clone(),
        Behaviors::new().with("x", recorder.behavior(common::own_val)),
    );
    assert!(matches!(validated, Err(SystemError::Validation(_))));

    let mut lazy = System::new(
        config,
        Behaviors::new().with("x", recorder.behavior(common::own_val)),
    )
    .unwrap();
    let err = lazy.start("orphan").unwrap_err();

    assert!(matches!(err, LifecycleError::MissingBehavior(ref name) if name == "orphan"));
    assert!(lazy.is_running("x"));
}

#[test]
fn test_start_context_exposes_full_config() {
    let config = ServiceConfig::new()
        .service("settings", ServiceRecord::new().field("port", 8080))
        .service("server", ServiceRecord::new().depends_on("settings"));
    let behaviors: Behaviors<String> = Behaviors::new()
        .with("settings", Behavior::new(|ctx| Ok(ctx.name().to_string())))
        .with(
            "server",
            Behavior::new(|ctx| {
                let port = ctx
                    .config()
                    .get("settings")
                    .and_then(|r| r.get("port"))
                    .and_then(|p| p.as_u64())
                    .ok_or("no port")?;
                let from = ctx.deps().get("settings").ok_or("settings not running")?;
                Ok(format!("{from}:{port}"))
            }),
        );

    let mut system = System::new(config, behaviors).unwrap();
    system.start("server").unwrap();

    assert_eq!(system.get("server").map(String::as_str), Some("settings:8080"));
}
