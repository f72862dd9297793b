use serde::{Deserialize, Serialize};

/// Display language of the gallery section.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    #[default]
    Vi,
    En,
}

/// User-facing strings of the gallery section.
pub struct GalleryText {
    pub title: &'static str,
    pub view_all: &'static str,
    pub close: &'static str,
    pub photo_alt: &'static str,
}

const VI: GalleryText = GalleryText {
    title: "Thư Viện Ảnh",
    view_all: "Xem tất cả ảnh",
    close: "Đóng thư viện ảnh",
    photo_alt: "Ảnh cưới",
};

const EN: GalleryText = GalleryText {
    title: "Gallery",
    view_all: "View All Photos",
    close: "Close Gallery",
    photo_alt: "Wedding photo",
};

impl Lang {
    pub fn text(self) -> &'static GalleryText {
        match self {
            Lang::Vi => &VI,
            Lang::En => &EN,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            Lang::Vi => "vi",
            Lang::En => "en",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Lang::Vi => Lang::En,
            Lang::En => Lang::Vi,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lang_strings_and_tags() {
        assert_eq!(Lang::default(), Lang::Vi);
        assert_eq!(Lang::Vi.text().view_all, "Xem tất cả ảnh");
        assert_eq!(Lang::En.text().close, "Close Gallery");
        assert_eq!(Lang::En.tag(), "en");
        assert_eq!(Lang::Vi.toggled(), Lang::En);
        assert_eq!(serde_json::to_string(&Lang::En).unwrap(), "\"en\"");
    }
}
