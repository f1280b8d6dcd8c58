//! Trending list component

use marquee_core::TrendingRecord;

use super::layout::escape;

/// Renders the trending list in the order given.
///
/// Renders an empty placeholder when there are no records so HTMX can still
/// swap the section in later.
pub fn trending_section(records: &[TrendingRecord]) -> String {
    let attributes = r#"id="trending" hx-get="/htmx/trending" hx-trigger="trending-updated from:body" hx-swap="outerHTML""#;

    if records.is_empty() {
        return format!(r#"<section {attributes}></section>"#);
    }

    let items: String = records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let poster = record
                .poster_url
                .as_deref()
                .map(|url| {
                    format!(
                        r#"<img src="{}" alt="{}" class="w-32 h-48 rounded-lg object-cover -ml-4" />"#,
                        escape(url),
                        escape(&record.search_term)
                    )
                })
                .unwrap_or_default();

            format!(
                r#"<li class="flex items-center min-w-[200px]" data-count="{}">
                    <p class="text-8xl font-bold text-gray-700">{}</p>
                    {poster}
                </li>"#,
                record.count,
                index + 1
            )
        })
        .collect();

    format!(
        r#"<section {attributes} class="trending mb-12">
            <h2 class="text-2xl font-semibold text-white mb-6">Trending Movies</h2>
            <ul class="flex flex-row overflow-x-auto gap-5 hide-scrollbar">{items}</ul>
        </section>"#
    )
}
