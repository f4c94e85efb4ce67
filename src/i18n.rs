//! Short translated labels shown by the lists and the transport bar.

use serde::Deserialize;

/// Interface language.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    En,
    #[default]
    Ru,
}

impl Lang {
    pub fn toggle(self) -> Self {
        match self {
            Self::En => Self::Ru,
            Self::Ru => Self::En,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::En => "EN",
            Self::Ru => "RU",
        }
    }

    pub fn strings(self) -> &'static Strings {
        match self {
            Self::En => &EN,
            Self::Ru => &RU,
        }
    }
}

pub struct Strings {
    pub discography: &'static str,
    pub tracklist: &'static str,
    pub loading: &'static str,
    pub error: &'static str,
    pub upcoming: &'static str,
    pub links: &'static str,
    pub no_links: &'static str,
    pub muted: &'static str,
    pub nothing_selected: &'static str,
}

static EN: Strings = Strings {
    discography: "Discography",
    tracklist: "Tracklist",
    loading: "Loading...",
    error: "Error",
    upcoming: "Upcoming",
    links: "Listen on",
    no_links: "No platform links yet",
    muted: "muted",
    nothing_selected: "Pick a track to start listening",
};

static RU: Strings = Strings {
    discography: "Дискография",
    tracklist: "Треклист",
    loading: "Загрузка...",
    error: "Ошибка",
    upcoming: "Скоро",
    links: "Слушать на",
    no_links: "Ссылок пока нет",
    muted: "без звука",
    nothing_selected: "Выберите трек, чтобы начать",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_flips_between_both_languages() {
        assert_eq!(Lang::En.toggle(), Lang::Ru);
        assert_eq!(Lang::Ru.toggle(), Lang::En);
    }

    #[test]
    fn player_labels_are_translated() {
        assert_eq!(Lang::En.strings().error, "Error");
        assert_eq!(Lang::Ru.strings().error, "Ошибка");
        assert_eq!(Lang::En.strings().loading, "Loading...");
        assert_eq!(Lang::Ru.strings().loading, "Загрузка...");
    }
}
