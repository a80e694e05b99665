/// The DOM surface the control panel reads from and writes into.
///
/// Implementations are cheap handles onto live elements; every method acts
/// on the element immediately.
pub trait DashboardView {
    fn prompt_text(&self) -> String;
    fn set_prompt_text(&self, text: &str);
    fn set_status_message(&self, text: &str);
    /// Raw value of the numeric line-count input.
    fn log_lines_input(&self) -> String;
    fn logs_text(&self) -> String;
    fn set_logs_text(&self, text: &str);
    fn scroll_logs_to_bottom(&self);
}
