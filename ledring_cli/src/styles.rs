use anstyle::{AnsiColor, Color, Style};
use clap::builder::Styles;

fn fg(color: AnsiColor) -> Style {
    Style::new().fg_color(Some(Color::Ansi(color)))
}

pub fn get_styles() -> Styles {
    Styles::styled()
        .usage(fg(AnsiColor::Green).bold())
        .header(fg(AnsiColor::Green).bold())
        .literal(fg(AnsiColor::Cyan).bold())
        .placeholder(fg(AnsiColor::Cyan))
        .error(fg(AnsiColor::Red).bold())
        .valid(fg(AnsiColor::Cyan).bold())
        .invalid(fg(AnsiColor::Yellow).bold())
}
