//! This file defines the vertical navigation bar shown on the employee pages.

use maud::{Markup, html};

use crate::endpoints;

/// A link in the navigation bar.
///
/// It will change appearance if `is_current` is set to
/// `true`. Only one link should be set as active at any one time.
struct Link<'a> {
    url: &'a str,
    title: &'a str,
    test_id: &'a str,
    icon: Markup,
    is_current: bool,
}

impl Link<'_> {
    fn into_html(self) -> Markup {
        let style = if self.is_current {
            "flex items-center justify-center w-12 h-12 rounded-lg text-white \
            bg-blue-700 active-icon"
        } else {
            "flex items-center justify-center w-12 h-12 rounded-lg text-blue-200 \
            hover:bg-blue-800 hover:text-white"
        };

        html!(
            a
                href=(self.url)
                title=(self.title)
                data-testid=(self.test_id)
                aria-current=[self.is_current.then_some("page")]
                class=(style)
            {
                (self.icon)
            }
        )
    }
}

pub struct NavBar<'a> {
    links: Vec<Link<'a>>,
}

impl NavBar<'_> {
    /// Get the navigation bar.
    ///
    /// If a link matches `active_endpoint`, then that link will be
    /// marked as active and displayed differently in the HTML.
    pub fn new(active_endpoint: &str) -> NavBar<'_> {
        let links = vec![
            Link {
                url: endpoints::BILLS_VIEW,
                title: "Mes notes de frais",
                test_id: "icon-window",
                icon: window_icon(),
                is_current: active_endpoint == endpoints::BILLS_VIEW,
            },
            Link {
                url: endpoints::NEW_BILL_VIEW,
                title: "Nouvelle note de frais",
                test_id: "icon-mail",
                icon: mail_icon(),
                is_current: active_endpoint == endpoints::NEW_BILL_VIEW,
            },
        ];

        NavBar { links }
    }

    pub fn into_html(self) -> Markup {
        html!(
            nav
                class="flex flex-col items-center gap-6 w-20 min-h-screen py-6 bg-blue-900"
            {
                a href=(endpoints::BILLS_VIEW) class="text-lg font-bold text-white" { "Billed" }

                @for link in self.links {
                    (link.into_html())
                }

                a
                    href=(endpoints::LOG_OUT)
                    title="Se déconnecter"
                    id="layout-disconnect"
                    class="mt-auto text-xs text-blue-200 hover:text-white"
                {
                    "Déconnexion"
                }
            }
        )
    }
}

/// Wrap `content` in the page layout with the vertical navigation bar.
pub fn vertical_layout(active_endpoint: &str, content: &Markup) -> Markup {
    let nav_bar = NavBar::new(active_endpoint).into_html();

    html!(
        div class="flex"
        {
            (nav_bar)

            main class="flex-1"
            {
                (content)
            }
        }
    )
}

fn window_icon() -> Markup {
    html!(
        svg
            aria-hidden="true"
            class="w-6 h-6"
            fill="none"
            stroke="currentColor"
            stroke-width="2"
            viewBox="0 0 24 24"
            xmlns="http://www.w3.org/2000/svg"
        {
            rect x="3" y="4" width="18" height="16" rx="2" {}
            path d="M3 9h18" {}
        }
    )
}

fn mail_icon() -> Markup {
    html!(
        svg
            aria-hidden="true"
            class="w-6 h-6"
            fill="none"
            stroke="currentColor"
            stroke-width="2"
            viewBox="0 0 24 24"
            xmlns="http://www.w3.org/2000/svg"
        {
            rect x="3" y="5" width="18" height="14" rx="2" {}
            path d="M3 7l9 6 9-6" {}
        }
    )
}
