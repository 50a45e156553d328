use crate::templates::desktop_layout;
use maud::{html, Markup};

pub fn new_lead_page() -> Markup {
    desktop_layout(
        "New Lead",
        html! {
            main class="container" {
                h1 { "New Lead" }

                section class="card" {
                    form action="/leads" method="post" {
                        label for="first_name" { "First name" }
                        input type="text" name="first_name" id="first_name" required;

                        label for="last_name" { "Last name" }
                        input type="text" name="last_name" id="last_name" required;

                        label for="email" { "Email" }
                        input type="email" name="email" id="email";

                        label for="phone" { "Phone" }
                        input type="tel" name="phone" id="phone";

                        label for="job_status" { "Job status" }
                        input type="text" name="job_status" id="job_status" placeholder="salarie, cdi, cdd...";

                        label for="source" { "Source" }
                        input type="text" name="source" id="source" placeholder="facebook_ads, google_ads...";

                        label for="exam_id" { "Exam" }
                        input type="text" name="exam_id" id="exam_id";

                        button type="submit" { "Create" }
                    }
                }
            }
        },
    )
}
