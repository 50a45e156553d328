use crate::domain::lead::Lead;
use crate::domain::queues::SmartQueue;
use crate::templates::components::queue_badge;
use crate::templates::desktop_layout;
use maud::{html, Markup};

pub struct LeadCardVm {
    pub lead: Lead,
    pub queue: SmartQueue,
}

pub fn lead_card_page(vm: &LeadCardVm) -> Markup {
    let lead = &vm.lead;
    desktop_layout(
        &lead.full_name(),
        html! {
            main class="container" {
                h1 { (lead.full_name()) " " (queue_badge(vm.queue)) }

                section class="card" {
                    h3 { "Profile" }
                    p { "Score: " strong { (lead.score) } }
                    p { "Status: " (lead.status.as_str()) " / " (lead.sales_stage.as_str()) }
                    p { "Call attempts: " (lead.call_attempts) }
                    @if let Some(email) = &lead.email {
                        p { "Email: " (email) }
                    }
                    @if let Some(phone) = &lead.phone {
                        p { "Phone: " (phone) }
                    }
                    @if let Some(job) = &lead.job_status {
                        p { "Job status: " (job) }
                    }
                    @if let Some(source) = &lead.source {
                        p { "Source: " (source) }
                    }
                    @if let Some(exam) = &lead.exam_id {
                        p { "Exam: " (exam) }
                    }
                    @if let Some(at) = lead.next_callback_at {
                        p { "Callback scheduled: " (at.format("%Y-%m-%d %H:%M")) }
                    }
                    @match &lead.assigned_to {
                        Some(agent) => p { "Assigned to: " strong { (agent) } },
                        None => (assign_form(&lead.id)),
                    }
                }

                (interaction_form(&lead.id))

                section class="card" {
                    h3 { "History" }
                    @if lead.history.is_empty() {
                        p { "No interactions yet." }
                    } @else {
                        ul {
                            @for entry in lead.history.iter().rev() {
                                li {
                                    (entry.timestamp.format("%Y-%m-%d %H:%M"))
                                    " [" (entry.kind.as_str()) "] "
                                    (entry.user_id) " "
                                    (entry.details.to_string())
                                }
                            }
                        }
                    }
                }
            }
        },
    )
}

fn assign_form(lead_id: &str) -> Markup {
    html! {
        form action={ "/leads/" (lead_id) "/assign" } method="post" {
            select name="mode" {
                option value="load_balanced" { "Least loaded" }
                option value="round_robin" { "Fewest today" }
            }
            button type="submit" { "Auto-assign" }
        }
    }
}

fn interaction_form(lead_id: &str) -> Markup {
    html! {
        section class="card" {
            h3 { "Log a call" }
            form action={ "/leads/" (lead_id) "/interactions" } method="post" {
                label for="outcome" { "Outcome" }
                select name="outcome" id="outcome" required {
                    option value="ANSWERED" { "Answered" }
                    option value="APPOINTMENT_SET" { "Appointment set" }
                    option value="CALLBACK_SCHEDULED" { "Callback scheduled" }
                    option value="NO_ANSWER" { "No answer" }
                    option value="BUSY" { "Busy" }
                    option value="VOICEMAIL" { "Voicemail" }
                    option value="REFUSAL" { "Refusal" }
                    option value="WRONG_NUMBER" { "Wrong number" }
                }

                label for="callback_at" { "Callback (optional)" }
                input type="datetime-local" name="callback_at" id="callback_at";

                label for="note" { "Note (optional)" }
                textarea name="note" id="note" {}

                button type="submit" { "Save" }
            }
        }
    }
}
