use ratatui::style::Color;

use crate::controller::SearchStatus;

pub fn color_for_status(status: SearchStatus) -> Color {
    match status {
        SearchStatus::Idle => Color::Gray,
        SearchStatus::Loading => Color::Yellow,
        SearchStatus::Ready => Color::Green,
        SearchStatus::Failed => Color::LightRed,
    }
}

pub fn icon_for_status(status: SearchStatus) -> &'static str {
    match status {
        SearchStatus::Idle => "\u{25CB}",     // white circle
        SearchStatus::Loading => "\u{23F3}",  // hourglass
        SearchStatus::Ready => "\u{2714}",    // check mark
        SearchStatus::Failed => "\u{2716}",   // heavy x
    }
}

pub fn color_for_extension(ext: &str) -> Color {
    match ext {
        "py" | "pyc" | "pyw" | "ipynb" => Color::Yellow,
        "exe" | "dll" | "bat" | "cmd" | "sh" | "msi" => Color::Cyan,
        "xml" | "html" | "htm" | "json" | "yaml" | "yml" | "toml" | "css" => Color::Green,
        "svg" | "png" | "jpg" | "jpeg" | "gif" | "bmp" | "ico" | "webp" | "tiff" => {
            Color::Magenta
        }
        "rs" | "go" | "c" | "cpp" | "h" | "hpp" | "cs" | "js" | "ts" | "java" => Color::LightBlue,
        "zip" | "tar" | "gz" | "bz2" | "7z" | "rar" | "xz" => Color::LightRed,
        "pdf" | "doc" | "docx" | "xls" | "xlsx" | "ppt" | "pptx" => Color::LightYellow,
        "md" | "txt" | "log" | "ini" | "cfg" | "conf" => Color::Gray,
        _ => Color::White,
    }
}

/// Lower-cased extension of a file-like string, empty when there is none
pub fn extension_of(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    if let Some(dot_pos) = base.rfind('.') {
        if dot_pos > 0 && dot_pos < base.len() - 1 {
            return base[dot_pos + 1..].to_lowercase();
        }
    }
    String::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_ignores_dotfiles_and_directories() {
        assert_eq!(extension_of("Report.PDF"), "pdf");
        assert_eq!(extension_of("/home/me/.bashrc"), "");
        assert_eq!(extension_of("/srv/v1.2/notes"), "");
        assert_eq!(extension_of("trailing."), "");
    }

    #[test]
    fn failed_is_red() {
        assert_eq!(color_for_status(SearchStatus::Failed), Color::LightRed);
        assert_eq!(color_for_extension("py"), Color::Yellow);
    }
}
