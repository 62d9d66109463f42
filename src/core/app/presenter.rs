use crate::api::models::ConnectionStatus;
use crate::core::session::ChatSession;

/// Everything the front end needs to show. Implementations only display
/// what they are given; they never reach back into `App`.
pub trait Presenter {
    fn render_transcript(&mut self, session: &ChatSession);

    /// `sessions` arrive newest-first.
    fn render_session_list(&mut self, sessions: &[&ChatSession], active_id: &str);

    fn set_status(&mut self, status: &str);

    fn set_busy(&mut self, busy: bool);

    fn show_warning(&mut self, message: &str);

    /// Suggest switching to `model`, e.g. a vision model once an image is queued.
    fn recommend_model(&mut self, _model: &str) {}

    fn set_connection(&mut self, _status: &ConnectionStatus) {}
}
