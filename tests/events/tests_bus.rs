//! Bus behavior with real commands behind it.

use std::sync::Arc;

use parking_lot::Mutex;
use rstest::rstest;

use ride::edit::{ChangeCellValue, CommandError, RenameKeywordOccurrences};
use ride::events::{HandlerError, LogLevel, Message, NotificationBus, Payload, SubscriberId, topics};

use crate::helpers::forest_builders::{grid_project, setup_scenario};
use crate::helpers::recorder::Recorder;

#[test]
fn test_parent_topic_sees_children_in_registration_order() {
    let (mut host, _, test) = setup_scenario();
    let order = Arc::new(Mutex::new(Vec::new()));
    for (label, topic) in [
        ("item", topics::ITEM),
        ("settings", topics::ITEM_SETTINGS_CHANGED),
        ("root", topics::ROOT),
    ] {
        let order = Arc::clone(&order);
        host.bus().subscribe(SubscriberId::new(), [topic], move |_| {
            order.lock().push(label);
            Ok(())
        });
    }

    host.execute(&mut RenameKeywordOccurrences::new(Some(test), "SetupKw", "Foo"))
        .unwrap();

    assert_eq!(*order.lock(), ["item", "settings", "root"]);
}

#[test]
fn test_handlers_read_the_finished_tree() {
    let (mut host, test) = grid_project();
    let forest = host.forest_handle();
    let seen = Arc::new(Mutex::new(None));
    let sink = Arc::clone(&seen);
    host.bus().subscribe(SubscriberId::new(), [topics::ITEM_STEPS_CHANGED], move |message| {
        let item = message.item().ok_or_else(|| HandlerError::new("no item"))?;
        let value = forest
            .read()
            .get(item)
            .and_then(|n| n.steps().first().and_then(|s| s.cell(0)).map(str::to_string));
        *sink.lock() = value;
        Ok(())
    });

    host.execute(&mut ChangeCellValue::new(test, 0, 0, "changed")).unwrap();

    assert_eq!(seen.lock().as_deref(), Some("changed"));
}

#[test]
fn test_failing_handler_does_not_stop_the_command() {
    let (mut host, test) = grid_project();
    host.bus().subscribe(SubscriberId::new(), [topics::ITEM_STEPS_CHANGED], |_| {
        Err(HandlerError::new("view is gone"))
    });
    let recorder = Recorder::attach(host.bus());

    host.execute(&mut ChangeCellValue::new(test, 0, 0, "x")).unwrap();

    let errors: Vec<String> = recorder
        .messages()
        .iter()
        .filter_map(|m| match m.payload() {
            Payload::Log {
                level: LogLevel::Error,
                message,
                ..
            } => Some(message.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("view is gone"));
    assert!(host.can_undo());
}

#[test]
fn test_double_fault_reaches_the_caller() {
    let (mut host, test) = grid_project();
    host.bus().subscribe(SubscriberId::new(), [topics::ITEM_STEPS_CHANGED], |_| {
        Err(HandlerError::new("first"))
    });
    host.bus()
        .subscribe(SubscriberId::new(), [topics::LOG], |_| Err(HandlerError::new("second")));

    let result = host.execute(&mut ChangeCellValue::new(test, 0, 0, "x"));

    assert!(matches!(result, Err(CommandError::DoubleFault(_))));
    // The edit itself was applied and recorded before publishing.
    assert!(host.can_undo());
}

#[test]
fn test_double_fault_does_not_drop_later_notifications() {
    let (mut host, test) = grid_project();
    host.bus().subscribe(SubscriberId::new(), [topics::ITEM_STEPS_CHANGED], |_| {
        Err(HandlerError::new("first"))
    });
    host.bus()
        .subscribe(SubscriberId::new(), [topics::LOG], |_| Err(HandlerError::new("second")));
    let recorder = Recorder::attach(host.bus());

    let result = host.execute(&mut ChangeCellValue::new(test, 0, 0, "x"));

    match result {
        Err(CommandError::DoubleFault(fault)) => assert_eq!(fault.error, HandlerError::new("second")),
        other => panic!("expected a double fault, got {other:?}"),
    }
    assert_eq!(recorder.count(topics::GRID_CELL_CHANGED), 1);
}

#[rstest]
#[case(topics::ITEM, true)]
#[case(topics::ROOT, true)]
#[case(topics::ITEM_STEPS_CHANGED, false)]
#[case("ride.item.name", false)]
fn test_topic_matching(#[case] subscribed: &str, #[case] delivered: bool) {
    let bus = NotificationBus::new();
    let hits = Arc::new(Mutex::new(0));
    let counter = Arc::clone(&hits);
    bus.subscribe(SubscriberId::new(), [subscribed], move |_| {
        *counter.lock() += 1;
        Ok(())
    });

    bus.publish(&Message::name_changed(ride::NodeId(1))).unwrap();

    assert_eq!(*hits.lock() == 1, delivered);
}

#[test]
fn test_unsubscribed_handler_is_not_called() {
    let bus = NotificationBus::new();
    let subscriber = SubscriberId::new();
    let hits = Arc::new(Mutex::new(0));
    let counter = Arc::clone(&hits);
    bus.subscribe(subscriber, [topics::ITEM, topics::LOG], move |_| {
        *counter.lock() += 1;
        Ok(())
    });

    assert_eq!(bus.unsubscribe_all(subscriber), 1);
    bus.publish(&Message::name_changed(ride::NodeId(1))).unwrap();

    assert_eq!(*hits.lock(), 0);
    assert_eq!(bus.subscription_count(), 0);
}
