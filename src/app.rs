use leptos::prelude::*;

use crate::config::{Bootstrap, PageData};
use crate::pages::books::BooksPage;
use crate::pages::dashboard::DashboardPage;
use crate::pages::issued_books::IssuedBooksPage;
use crate::pages::profile::ProfilePage;
use crate::pages::students::StudentsPage;

/// Picks the page the server asked for in the bootstrap.
#[component]
pub fn App(bootstrap: Bootstrap) -> impl IntoView {
    let Bootstrap { config, page } = bootstrap;
    tracing::info!("Mounting {} page", page.kind());

    view! {
        <main class="content">
            {match page {
                PageData::Dashboard(snapshot) => view! { <DashboardPage snapshot=snapshot /> }.into_any(),
                PageData::Profile(seed) => view! { <ProfilePage seed=seed config=config /> }.into_any(),
                PageData::Books(seed) => view! { <BooksPage seed=seed config=config /> }.into_any(),
                PageData::Students(seed) => view! { <StudentsPage seed=seed config=config /> }.into_any(),
                PageData::IssuedBooks(seed) => view! { <IssuedBooksPage seed=seed config=config /> }.into_any(),
            }}
        </main>
    }
}
