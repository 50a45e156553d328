use crate::domain::queues::SmartQueue;
use maud::{html, Markup};

/// Small colored label showing which smart queue a lead sits in.
pub fn queue_badge(queue: SmartQueue) -> Markup {
    html! {
        span class={ "badge badge-" (queue.as_str()) } { (queue.as_str()) }
    }
}
