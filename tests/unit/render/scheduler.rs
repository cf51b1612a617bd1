use super::*;

#[test]
fn many_requests_in_one_frame_draw_once() {
    let mut s = RedrawScheduler::new();
    assert!(s.request());
    for _ in 0..20 {
        assert!(!s.request());
    }

    let mut draws = 0;
    assert!(s.on_frame(|| draws += 1));
    assert!(!s.on_frame(|| draws += 1));
    assert_eq!(draws, 1);
    assert_eq!(s.counters(), (21, 1));
}

#[test]
fn each_frame_with_requests_draws_again() {
    let mut s = RedrawScheduler::new();
    let mut draws = 0;
    for _ in 0..3 {
        s.request();
        s.request();
        s.on_frame(|| draws += 1);
    }
    assert_eq!(draws, 3);
}

#[test]
fn idle_frames_do_nothing_and_cancel_clears() {
    let mut s = RedrawScheduler::new();
    assert!(!s.on_frame(|| panic!("nothing was requested")));

    s.request();
    assert!(s.is_pending());
    s.cancel();
    assert!(!s.on_frame(|| panic!("request was cancelled")));
}
