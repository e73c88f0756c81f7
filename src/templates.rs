use hypertext::prelude::*;

const TAILWIND_CDN: &str = "https://cdn.tailwindcss.com";

pub fn login_page(next: &str, error: Option<&str>) -> String {
    maud! {
        !DOCTYPE
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { "Log in | Movie admin" }
                script src=(TAILWIND_CDN) {}
            }
            body {
                div class="min-h-screen bg-gray-50 flex items-center justify-center" {
                    div class="max-w-md w-full px-6" {
                        div class="bg-white shadow rounded-lg p-8" {
                            h1 class="text-2xl font-bold text-gray-900" { "Movie admin" }
                            p class="mt-2 text-gray-600" { "Staff members only." }

                            @if let Some(error) = error {
                                p class="mt-6 rounded-md bg-red-50 px-4 py-3 text-sm text-red-700" { (error) }
                            }

                            form class="mt-8 space-y-6" method="post" action="/admin/login/" {
                                input type="hidden" name="next" value=(next);
                                div {
                                    label class="block text-sm font-medium text-gray-700" for="username" { "Username" }
                                    input class="mt-2 w-full rounded-md border border-gray-300 px-3 py-2" name="username" id="username" required;
                                }
                                div {
                                    label class="block text-sm font-medium text-gray-700" for="password" { "Password" }
                                    input class="mt-2 w-full rounded-md border border-gray-300 px-3 py-2" type="password" name="password" id="password" required;
                                }
                                button class="w-full rounded-md bg-blue-600 px-4 py-2 font-semibold text-white hover:bg-blue-700" type="submit" { "Log in" }
                            }
                        }
                    }
                }
            }
        }
    }
    .render()
    .into_inner()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_page_escapes_next_and_error() {
        let html = login_page("/api/v1/movies/?page=2&x=\"", Some("<b>nope</b>"));
        assert!(html.contains("action=\"/admin/login/\""));
        assert!(html.contains("&lt;b&gt;nope&lt;/b&gt;"));
        assert!(!html.contains("<b>nope</b>"));
        assert!(html.contains("page=2&amp;x="));
    }

    #[test]
    fn login_page_without_error_has_no_alert() {
        let html = login_page("/", None);
        assert!(!html.contains("bg-red-50"));
    }
}
