/// Render milliseconds as the `SS:MMM` clock shown during a session.
pub fn format_clock(ms: u64) -> String {
    format!("{:02}:{:03}", ms / 1000, ms % 1000)
}
