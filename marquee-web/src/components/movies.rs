//! Movie components - results area and movie cards

use marquee_core::Movie;
use marquee_search::ResultsView;

use super::layout::escape;

/// Renders the loading spinner.
pub fn spinner() -> String {
    r#"<div class="flex justify-center py-12" role="status">
            <div class="spinner w-10 h-10 border-4 border-marquee-400 border-t-transparent rounded-full"></div>
            <span class="sr-only">Loading...</span>
        </div>"#
        .to_string()
}

/// Renders one movie card.
///
/// Shows the poster, title, rating, original language and release year.
/// Missing values are shown as "N/A".
pub fn movie_card(movie: &Movie, image_base_url: &str) -> String {
    let poster = match movie.poster_url(image_base_url) {
        Some(url) => format!(
            r#"<img src="{}" alt="{}" class="rounded-lg w-full h-auto" loading="lazy" />"#,
            escape(&url),
            escape(&movie.title)
        ),
        None => r#"<div class="rounded-lg w-full aspect-[2/3] bg-gray-800 flex items-center justify-center text-gray-500">No poster</div>"#
            .to_string(),
    };

    let rating = movie
        .vote_average
        .map(|r| format!("{r:.1}"))
        .unwrap_or_else(|| "N/A".to_string());
    let language = movie
        .original_language
        .as_deref()
        .map(escape)
        .unwrap_or_else(|| "N/A".to_string());
    let year = movie
        .release_year()
        .map(|y| y.to_string())
        .unwrap_or_else(|| "N/A".to_string());

    format!(
        r#"<li class="movie-card bg-gray-900 p-4 rounded-2xl shadow-inner" data-movie-id="{}">
            {poster}
            <div class="mt-4">
                <h3 class="text-white font-bold text-base line-clamp-1">{}</h3>
                <div class="content flex items-center gap-2 mt-2 text-sm text-gray-400">
                    <span class="rating text-white">★ {rating}</span>
                    <span>•</span>
                    <span class="lang capitalize">{language}</span>
                    <span>•</span>
                    <span class="year">{year}</span>
                </div>
            </div>
        </li>"#,
        movie.id,
        escape(&movie.title)
    )
}

/// Renders the results area: a spinner, else an error message, else the
/// movie list in API order.
pub fn results_section(view: ResultsView<'_>, image_base_url: &str) -> String {
    match view {
        ResultsView::Loading => spinner(),
        ResultsView::Error(message) => {
            format!(r#"<p class="error text-red-500">{}</p>"#, escape(message))
        }
        ResultsView::Movies(movies) => {
            let cards: String = movies
                .iter()
                .map(|movie| movie_card(movie, image_base_url))
                .collect();
            format!(
                r#"<ul class="results-list grid grid-cols-1 gap-5 xs:grid-cols-2 md:grid-cols-3 lg:grid-cols-4">{cards}</ul>"#
            )
        }
    }
}
