use super::*;

#[test]
fn controls_text_mentions_seek_step() {
    let text = controls_text(15);
    assert!(text.contains("[H/L] seek -/+15s"));
    assert!(text.starts_with("[space/p] play/pause"));
}

#[test]
fn centered_rect_stays_inside_the_area() {
    let area = Rect::new(0, 0, 40, 10);
    let r = centered_rect_sized(64, 11, area);
    assert_eq!(r, Rect::new(1, 1, 38, 8));
}

#[test]
fn centered_rect_is_clipped_on_a_tiny_terminal() {
    let area = Rect::new(0, 0, 8, 4);
    let r = centered_rect_sized(64, 11, area);
    assert_eq!(r, Rect::new(0, 0, 8, 4));
}

#[test]
fn banner_points_at_the_player_key() {
    let text: String = calm_banner()
        .spans
        .iter()
        .map(|s| s.content.as_ref())
        .collect();
    assert!(text.contains("Calm mode"));
    assert!(text.ends_with("[m]"));
}
