use super::*;

#[test]
fn closures_act_as_notifiers_and_sinks() {
    let mut seen = Vec::new();
    {
        let mut notifier = |n: Notification| seen.push(n.message);
        notifier.notify(Notification::success("done", 3000));
    }
    assert_eq!(seen, vec!["done".to_string()]);

    let mut positions = Vec::new();
    {
        let mut sink = |p: ImagePosition| positions.push(p);
        sink.on_position_update(ImagePosition::default());
    }
    assert_eq!(positions.len(), 1);
}

#[test]
fn notification_log_filters_errors() {
    let mut log = NotificationLog::new();
    log.notify(Notification::success("ok", 2000));
    log.notify(Notification::error("bad", 4000));

    let errors: Vec<_> = log.errors().collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message, "bad");
    assert_eq!(errors[0].duration, Duration::from_secs(4));
}

#[test]
fn position_log_tracks_latest() {
    let mut log = PositionLog::new();
    assert_eq!(log.latest(), None);
    let moved = ImagePosition {
        x: 12.0,
        ..ImagePosition::default()
    };
    log.on_position_update(ImagePosition::default());
    log.on_position_update(moved);
    assert_eq!(log.latest(), Some(moved));
}
