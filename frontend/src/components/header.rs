use yew::prelude::*;

/// Title bar, with the signed-in user when the session token names one.
pub fn render_header(user_id: Option<&str>) -> Html {
    html! {
        <header class="app-header">
            <h1><i class="fa-solid fa-seedling"></i> {" CropGuard"}</h1>
            <p class="subtitle">{"Photograph a crop leaf and find out what is wrong with it"}</p>
            {
                match user_id {
                    Some(user_id) => html! {
                        <span class="user-chip">
                            <i class="fa-solid fa-user"></i>{format!(" User {}", user_id)}
                        </span>
                    },
                    None => html! {
                        <span class="user-chip signed-out">{"Not signed in"}</span>
                    },
                }
            }
        </header>
    }
}
