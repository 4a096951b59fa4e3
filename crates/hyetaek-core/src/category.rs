use serde::{Deserialize, Serialize};

/// Store category. Serialized as the Korean label shown to users; the
/// snake_case English key is accepted as an alias when parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "문화", alias = "culture")]
    Culture,
    #[serde(rename = "뷰티/건강", alias = "beauty_health")]
    BeautyHealth,
    #[serde(rename = "스터디", alias = "study")]
    Study,
    #[serde(rename = "쇼핑", alias = "shopping")]
    Shopping,
    #[serde(rename = "음식", alias = "food")]
    Food,
    #[serde(rename = "기타", alias = "other")]
    Other,
}

impl Category {
    /// All categories in display order.
    pub const ALL: [Category; 6] = [
        Category::Food,
        Category::Culture,
        Category::BeautyHealth,
        Category::Study,
        Category::Shopping,
        Category::Other,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Category::Culture => "문화",
            Category::BeautyHealth => "뷰티/건강",
            Category::Study => "스터디",
            Category::Shopping => "쇼핑",
            Category::Food => "음식",
            Category::Other => "기타",
        }
    }

    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Category::Culture => "culture",
            Category::BeautyHealth => "beauty_health",
            Category::Study => "study",
            Category::Shopping => "shopping",
            Category::Food => "food",
            Category::Other => "other",
        }
    }

    /// Kinds of places the seed prompt should look for in this category.
    #[must_use]
    pub fn prompt_hint(self) -> &'static str {
        match self {
            Category::Food => "레스토랑, 카페, 분식점 학생 할인",
            Category::Culture => "영화관, 공연장, 전시회 학생 할인",
            Category::BeautyHealth => "미용실, 헬스장, 화장품 가게 학생 할인",
            Category::Study => "스터디 카페, 독서실, 서점, 온라인 강의 학생 할인",
            Category::Shopping => "의류, 전자기기, 문구류 매장 학생 할인",
            Category::Other => "기타 학생 할인",
        }
    }

    /// Parse a Korean label or English key. Surrounding whitespace is ignored.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Category> {
        let raw = raw.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.label() == raw || c.key().eq_ignore_ascii_case(raw))
    }

    /// Like [`Category::parse`], but anything unrecognized becomes [`Category::Other`].
    #[must_use]
    pub fn parse_or_other(raw: &str) -> Category {
        Category::parse(raw).unwrap_or(Category::Other)
    }

    /// Labels joined with `separator`, used when prompts enumerate allowed values.
    #[must_use]
    pub fn joined_labels(separator: &str) -> String {
        Category::ALL
            .iter()
            .map(|c| c.label())
            .collect::<Vec<_>>()
            .join(separator)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Category selector input of the filter pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    #[must_use]
    pub fn matches(self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(wanted) => wanted == category,
        }
    }

    /// `"all"`/`"전체"` select everything; otherwise a category label or key.
    #[must_use]
    pub fn parse(raw: &str) -> Option<CategoryFilter> {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("all") || raw == "전체" {
            return Some(CategoryFilter::All);
        }
        Category::parse(raw).map(CategoryFilter::Only)
    }
}
