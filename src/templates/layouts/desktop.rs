use maud::{html, Markup, DOCTYPE};

pub fn desktop_layout(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                link rel="stylesheet" href="/static/main.css";
            }
            body {
                header class="flex items-center justify-between px-6 py-3 shadow" {
                    h3 { "Leadflow" }
                    nav {
                        ul {
                            li { a href="/" { "Queues" } }
                            li { a href="/leads/new" { "New lead" } }
                            li { a href="/attribution" { "Attribution" } }
                        }
                    }
                }
                (content)
            }
        }
    }
}
