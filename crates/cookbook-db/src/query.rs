//! Listing parameters for recipes: substring filter, sort order and paging.

use std::cmp::Ordering;
use std::str::FromStr;

use cookbook_types::models::Recipe;

use crate::error::RepoError;

/// Page size of `GET /api/recipes`.
pub const DEFAULT_PAGE_SIZE: u32 = 12;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeQuery {
    /// Substring matched against `category`. Empty matches everything.
    pub filter: String,
    /// `None` keeps storage order (ascending ID).
    pub sort: Option<RecipeSort>,
    /// 1-indexed.
    pub page: u32,
    pub limit: u32,
}

impl Default for RecipeQuery {
    fn default() -> Self {
        Self {
            filter: String::new(),
            sort: None,
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl RecipeQuery {
    pub fn offset(&self) -> u64 {
        u64::from(self.page.max(1) - 1).saturating_mul(u64::from(self.limit))
    }

    /// Whether `category` passes the filter, with the ASCII case folding of
    /// SQLite's default `LIKE`.
    pub fn matches_category(&self, category: &str) -> bool {
        self.filter.is_empty()
            || category
                .to_ascii_lowercase()
                .contains(&self.filter.to_ascii_lowercase())
    }

    /// `LIKE` pattern for the filter with `%`, `_` and `\` escaped.
    pub fn like_pattern(&self) -> String {
        let mut pattern = String::with_capacity(self.filter.len() + 2);
        pattern.push('%');
        for c in self.filter.chars() {
            if matches!(c, '%' | '_' | '\\') {
                pattern.push('\\');
            }
            pattern.push(c);
        }
        pattern.push('%');
        pattern
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipeColumn {
    Id,
    Title,
    Category,
    RecipeText,
    PublisherUsername,
    PublishedDate,
    CreatedAt,
    UpdatedAt,
}

impl RecipeColumn {
    pub fn from_name(name: &str) -> Option<Self> {
        let column = match name {
            "id" => Self::Id,
            "title" => Self::Title,
            "category" => Self::Category,
            "recipe_text" | "recipeText" => Self::RecipeText,
            "publisher_username" | "publisherUsername" => Self::PublisherUsername,
            "published_date" | "publishedDate" => Self::PublishedDate,
            "created_at" | "createdAt" => Self::CreatedAt,
            "updated_at" | "updatedAt" => Self::UpdatedAt,
            _ => return None,
        };
        Some(column)
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Title => "title",
            Self::Category => "category",
            Self::RecipeText => "recipe_text",
            Self::PublisherUsername => "publisher_username",
            Self::PublishedDate => "published_date",
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
        }
    }
}

/// Ordering directive such as `title`, `title asc` or `created_at desc`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecipeSort {
    pub column: RecipeColumn,
    pub descending: bool,
}

impl RecipeSort {
    /// Empty input means "no explicit order".
    pub fn parse_optional(raw: &str) -> Result<Option<Self>, RepoError> {
        if raw.trim().is_empty() {
            return Ok(None);
        }
        raw.parse().map(Some)
    }

    pub fn order_by_sql(&self) -> String {
        let direction = if self.descending { "DESC" } else { "ASC" };
        format!("{} {}, id ASC", self.column.as_sql(), direction)
    }

    /// Same ordering as `order_by_sql`, for the in-memory store.
    pub fn compare(&self, a: &Recipe, b: &Recipe) -> Ordering {
        let ord = match self.column {
            RecipeColumn::Id => a.id.cmp(&b.id),
            RecipeColumn::Title => a.title.cmp(&b.title),
            RecipeColumn::Category => a.category.cmp(&b.category),
            RecipeColumn::RecipeText => a.recipe_text.cmp(&b.recipe_text),
            RecipeColumn::PublisherUsername => a.publisher_username.cmp(&b.publisher_username),
            RecipeColumn::PublishedDate => a.published_date.cmp(&b.published_date),
            RecipeColumn::CreatedAt => a.created_at.cmp(&b.created_at),
            RecipeColumn::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        };
        let ord = if self.descending { ord.reverse() } else { ord };
        ord.then_with(|| a.id.cmp(&b.id))
    }
}

impl FromStr for RecipeSort {
    type Err = RepoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || RepoError::Validation(format!("Invalid sort expression: {}", s.trim()));

        let mut parts = s.split_whitespace();
        let column = parts
            .next()
            .and_then(RecipeColumn::from_name)
            .ok_or_else(invalid)?;
        let descending = match parts.next().map(str::to_ascii_lowercase).as_deref() {
            None | Some("asc") => false,
            Some("desc") => true,
            Some(_) => return Err(invalid()),
        };
        if parts.next().is_some() {
            return Err(invalid());
        }

        Ok(Self { column, descending })
    }
}
