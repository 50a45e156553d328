use crate::domain::lead::Lead;
use crate::templates::desktop_layout;
use maud::{html, Markup};

pub struct QueueBoardVm {
    pub callback: Vec<Lead>,
    pub priority: Vec<Lead>,
    pub provisioned: Vec<Lead>,
}

pub fn queue_board_page(vm: &QueueBoardVm) -> Markup {
    desktop_layout(
        "Smart Queues",
        html! {
            main class="container" {
                h1 { "Smart Queues" }

                (queue_section("Callbacks due", "callback", &vm.callback))
                (queue_section("Priority", "priority", &vm.priority))
                (queue_section("Provisioned", "provisioned", &vm.provisioned))
            }
        },
    )
}

fn queue_section(title: &str, queue: &str, leads: &[Lead]) -> Markup {
    html! {
        section class="card" {
            h3 { (title) " (" (leads.len()) ")" }

            @if leads.is_empty() {
                p { "Nothing here." }
            } @else {
                table {
                    thead {
                        tr {
                            th { "Lead" }
                            th { "Score" }
                            th { "Status" }
                            th { "Attempts" }
                            th { "Callback" }
                        }
                    }
                    tbody {
                        @for lead in leads {
                            tr {
                                td { a href={ "/leads/" (lead.id) } { (lead.full_name()) } }
                                td { (lead.score) }
                                td { (lead.status.as_str()) }
                                td { (lead.call_attempts) }
                                @match lead.next_callback_at {
                                    Some(at) => td { (at.format("%Y-%m-%d %H:%M")) },
                                    None => td { "-" },
                                }
                            }
                        }
                    }
                }
                a href={ "/export?queue=" (queue) } { "Export to Excel" }
            }
        }
    }
}
