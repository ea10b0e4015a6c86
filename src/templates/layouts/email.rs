use maud::{html, Markup, DOCTYPE};

pub fn email_layout(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                title { (title) }
            }
            body style="font-family: Arial, sans-serif; line-height: 1.6; color: #333;" {
                (content)
            }
        }
    }
}
