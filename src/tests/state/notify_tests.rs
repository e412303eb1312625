use super::*;

#[test]
fn messages_surface_in_fifo_order() {
    let mut queue = NotificationQueue::default();
    queue.push("first");
    queue.push("second");

    let t0 = Instant::now();
    queue.tick(t0);
    assert_eq!(queue.visible(), Some("first"));
    assert_eq!(queue.pending(), 1);

    // Still within the dwell window: the second message waits.
    queue.tick(t0 + DWELL / 2);
    assert_eq!(queue.visible(), Some("first"));

    queue.tick(t0 + DWELL);
    assert_eq!(queue.visible(), Some("second"));
    assert_eq!(queue.pending(), 0);
}

#[test]
fn the_display_empties_after_the_last_message() {
    let mut queue = NotificationQueue::default();
    queue.push("only");

    let t0 = Instant::now();
    queue.tick(t0);
    queue.tick(t0 + DWELL);
    assert_eq!(queue.visible(), None);
}

#[test]
fn duplicates_are_kept() {
    let mut queue = NotificationQueue::default();
    queue.push("same");
    queue.push("same");

    let t0 = Instant::now();
    queue.tick(t0);
    assert_eq!(queue.visible(), Some("same"));
    queue.tick(t0 + DWELL);
    assert_eq!(queue.visible(), Some("same"));
    queue.tick(t0 + DWELL * 2);
    assert_eq!(queue.visible(), None);
}

#[test]
fn nothing_surfaces_without_a_tick() {
    let mut queue = NotificationQueue::default();
    queue.push("queued");
    assert_eq!(queue.visible(), None);
}
