//! Plain-text rendering of controller state for the terminal.

use std::fmt::Write as _;

use client_core::{FetchState, MovieCard, View};
use shared::domain::Movie;

pub fn render_card(card: &MovieCard) -> String {
    let mut out = String::new();
    let marker = match card.favourite {
        Some(true) => "♥ ",
        Some(false) => "♡ ",
        None => "",
    };
    let _ = writeln!(out, "{marker}{} [{}]", card.title, card.link);
    let _ = writeln!(out, "  Duration: {}", card.duration);
    let _ = writeln!(out, "  Content Rating: {}", card.content_rating);
    if let Some(storyline) = &card.storyline {
        let _ = writeln!(out, "  {storyline}");
    }
    out
}

pub fn render_list(
    state: &FetchState<Vec<Movie>>,
    is_favourite: impl Fn(&Movie) -> bool,
) -> String {
    match state.view() {
        View::Loading => "Loading...\n".to_string(),
        View::Error(error) => format!("error: {error}\n"),
        View::Empty => "No movies.\n".to_string(),
        View::Ready(movies) if movies.is_empty() => "No movies.\n".to_string(),
        View::Ready(movies) => movies
            .iter()
            .map(|movie| render_card(&MovieCard::list_item(movie, is_favourite(movie))))
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

pub fn render_detail(state: &FetchState<Movie>) -> String {
    match state.view() {
        View::Loading => "Loading...\n".to_string(),
        View::Error(error) => format!("error: {error}\n"),
        View::Empty => String::new(),
        View::Ready(movie) => render_card(&MovieCard::full_page(movie)),
    }
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
