//! Layout components - page shell, header, search box

use axum::response::Html;

/// Escapes text for use in HTML content and quoted attributes.
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Renders the hero header with the search box.
pub fn hero_header(search_box: &str) -> String {
    format!(
        r#"<header class="text-center mb-12">
            <h1 class="text-4xl md:text-5xl font-bold text-white leading-tight">
                Find <span class="text-gradient">Movies</span> You'll Enjoy Without the Hassle
            </h1>
            <div class="mt-8 max-w-2xl mx-auto">{search_box}</div>
        </header>"#
    )
}

/// Renders the search input.
///
/// Typing fires an HTMX request once input has been quiet for
/// `debounce_ms`. `hx-sync="this:replace"` aborts an in-flight request when
/// a newer one starts, so results always match the latest text.
pub fn search_input(query: &str, debounce_ms: u128) -> String {
    format!(
        r##"<div class="search relative">
            <input type="search" name="query" value="{}"
                   placeholder="Search through thousands of movies"
                   autocomplete="off"
                   class="w-full px-4 py-3 bg-gray-800 border border-gray-700 rounded-lg text-white placeholder-gray-400 focus:outline-none focus:ring-2 focus:ring-marquee-500"
                   hx-get="/htmx/movies"
                   hx-trigger="input changed delay:{debounce_ms}ms, search"
                   hx-target="#all-movies"
                   hx-sync="this:replace"
                   hx-indicator="#search-spinner" />
            <div id="search-spinner" class="htmx-indicator absolute right-4 top-3">
                <div class="spinner w-6 h-6 border-2 border-marquee-400 border-t-transparent rounded-full"></div>
            </div>
        </div>"##,
        escape(query)
    )
}

/// Renders a section with a heading.
pub fn section(class: &str, heading: &str, content: &str) -> String {
    format!(
        r#"<section class="{class} mb-12">
            <h2 class="text-2xl font-semibold text-white mb-6">{heading}</h2>
            {content}
        </section>"#
    )
}

/// Wraps page content in the base document.
pub fn render_page(title: &str, content: &str) -> Html<String> {
    let html = format!(
        r#"<!DOCTYPE html>
        <html lang="en">
        <head>
            <title>{} - Marquee</title>
            <meta charset="utf-8">
            <meta name="viewport" content="width=device-width, initial-scale=1">
            <script src="https://cdn.tailwindcss.com"></script>
            <script src="https://unpkg.com/htmx.org@1.9.10"></script>
            <script>
                tailwind.config = {{
                    theme: {{
                        extend: {{
                            colors: {{
                                'marquee': {{
                                    400: '#ab8bff',
                                    500: '#9574f5',
                                    900: '#030014'
                                }}
                            }}
                        }}
                    }}
                }}
            </script>
            <style>
                .text-gradient {{ background: linear-gradient(90deg, #d6c7ff, #ab8bff); -webkit-background-clip: text; color: transparent; }}
                .htmx-indicator {{ display: none; }}
                .htmx-request.htmx-indicator {{ display: block; }}
                .htmx-request .results-list {{ opacity: 0.4; }}
                @keyframes spin {{ to {{ transform: rotate(360deg); }} }}
                .spinner {{ animation: spin 1s linear infinite; }}
            </style>
        </head>
        <body class="bg-marquee-900 text-gray-100 min-h-screen">
            <main class="max-w-7xl mx-auto px-4 py-12">
                {}
            </main>
        </body>
        </html>"#,
        escape(title),
        content
    );

    Html(html)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(
            escape(r#"<b>"Tom & Jerry's"</b>"#),
            "&lt;b&gt;&quot;Tom &amp; Jerry&#39;s&quot;&lt;/b&gt;"
        );
        assert_eq!(escape("Batman"), "Batman");
    }

    #[test]
    fn test_search_input_uses_debounce_and_sync() {
        let html = search_input("bat\"man", 500);

        assert!(html.contains("delay:500ms"));
        assert!(html.contains(r#"hx-sync="this:replace""#));
        assert!(html.contains(r#"value="bat&quot;man""#));
    }
}
