//! Colour palette and text styles used across the UI.

use ratatui::style::{Color, Modifier, Style};

/// Central theme.  All colours are defined here.
pub struct Theme;

impl Theme {
    // ── editor ─────────────────────────────────────────────────
    pub fn text_style() -> Style {
        Style::default().fg(Color::White)
    }

    pub fn gutter_style() -> Style {
        Style::default().fg(Color::DarkGray)
    }

    pub fn current_line_number_style() -> Style {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    }

    pub fn scrollbar_thumb() -> Color {
        Color::LightBlue
    }

    pub fn scrollbar_track() -> Color {
        Color::DarkGray
    }

    // ── toolbar ────────────────────────────────────────────────
    pub fn button_style() -> Style {
        Style::default().fg(Color::White)
    }

    pub fn button_border_style() -> Style {
        Style::default().fg(Color::Gray)
    }

    pub fn hint_style() -> Style {
        Style::default().fg(Color::DarkGray)
    }

    // ── lists / popups ─────────────────────────────────────────
    pub fn dir_style() -> Style {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    }

    pub fn file_style() -> Style {
        Style::default().fg(Color::White)
    }

    pub fn selected_style() -> Style {
        Style::default()
            .fg(Color::White)
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD)
    }

    pub fn popup_title_style() -> Style {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    }

    pub fn popup_border_style() -> Style {
        Style::default().fg(Color::DarkGray)
    }

    pub fn error_title_style() -> Style {
        Style::default()
            .fg(Color::Red)
            .add_modifier(Modifier::BOLD)
    }

    pub fn error_border_style() -> Style {
        Style::default().fg(Color::Red)
    }

    pub fn warning_style() -> Style {
        Style::default().fg(Color::Yellow)
    }

    pub fn key_style() -> Style {
        Style::default().fg(Color::Yellow)
    }

    pub fn on_style() -> Style {
        Style::default().fg(Color::Green)
    }

    // ── chrome ─────────────────────────────────────────────────
    pub fn border_style() -> Style {
        Style::default().fg(Color::Gray)
    }

    pub fn title_style() -> Style {
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD)
    }

    pub fn status_bar_style() -> Style {
        Style::default().bg(Color::DarkGray).fg(Color::White)
    }

    pub fn command_input_style() -> Style {
        Style::default().fg(Color::Yellow)
    }
}
