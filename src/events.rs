use crate::models::{Settings, Task};
use crate::state::Navigation;

pub const EVENT_STATE_UPDATED: &str = "state_updated";

#[derive(Debug, Clone, serde::Serialize)]
pub struct StatePayload {
    pub tasks: Vec<Task>,
    pub settings: Settings,
    pub navigation: Navigation,
}
