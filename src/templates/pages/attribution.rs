use crate::domain::attribution::{AttributionModel, SourceWeight};
use crate::templates::desktop_layout;
use maud::{html, Markup};

const MODELS: [AttributionModel; 4] = [
    AttributionModel::Linear,
    AttributionModel::FirstTouch,
    AttributionModel::LastTouch,
    AttributionModel::UShaped,
];

pub fn attribution_page(model: AttributionModel, weights: &[SourceWeight]) -> Markup {
    desktop_layout(
        "Attribution",
        html! {
            main class="container" {
                h1 { "Channel Attribution" }

                nav class="tabs" {
                    @for m in MODELS {
                        @if m == model {
                            strong { (m.as_str()) " " }
                        } @else {
                            a href={ "/attribution?model=" (m.as_str()) } { (m.as_str()) " " }
                        }
                    }
                }

                section class="card" {
                    @if weights.is_empty() {
                        p { "No touchpoints recorded yet." }
                    } @else {
                        table {
                            thead {
                                tr {
                                    th { "Source" }
                                    th { "Weight" }
                                }
                            }
                            tbody {
                                @for w in weights {
                                    tr {
                                        td { (w.source) }
                                        td { (format!("{:.1}%", w.weight * 100.0)) }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        },
    )
}
