use maud::{html, Markup, Render};

/// `<b>Label: </b>value<br>`, one line of a listing block.
pub fn labelled(label: &str, value: impl Render) -> Markup {
    html! {
        b { (label) ": " } (value) br;
    }
}

pub fn divider() -> Markup {
    html! {
        hr;
    }
}
