//! Portfolio projects

use crate::error::{AppError, Result};
use crate::models::{double_option, non_blank};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub title: String,
    pub slug: Option<String>,
    #[serde(default)]
    pub description: String,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub year: Option<i32>,
    pub impact_metrics: Option<String>,
    pub video_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Project {
    pub fn apply(&mut self, changes: &ProjectChanges) {
        if let Some(title) = &changes.title {
            self.title = title.clone();
        }
        if let Some(description) = &changes.description {
            self.description = description.clone();
        }
        if let Some(slug) = &changes.slug {
            self.slug = slug.clone();
        }
        if let Some(image_url) = &changes.image_url {
            self.image_url = image_url.clone();
        }
        if let Some(category) = &changes.category {
            self.category = category.clone();
        }
        if let Some(year) = changes.year {
            self.year = year;
        }
        if let Some(impact_metrics) = &changes.impact_metrics {
            self.impact_metrics = impact_metrics.clone();
        }
        if let Some(video_url) = &changes.video_url {
            self.video_url = video_url.clone();
        }
    }
}

const MIN_YEAR: i32 = 1900;
const MAX_YEAR: i32 = 2200;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct NewProject {
    #[serde(default)]
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    pub title: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    #[validate(length(max = 5000, message = "Description must not exceed 5000 characters"))]
    pub description: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    #[validate(range(min = 1900, max = 2200, message = "Year is out of range"))]
    pub year: Option<i32>,
    #[serde(default)]
    pub impact_metrics: Option<String>,
    #[serde(default)]
    pub video_url: Option<String>,
}

impl NewProject {
    /// Trims input, validates it and derives a slug from the title when none is given.
    pub fn prepare(self) -> Result<Self> {
        let title = self.title.trim().to_string();
        let slug = non_blank(self.slug)
            .map(|s| slugify(&s))
            .or_else(|| Some(slugify(&title)))
            .filter(|s| !s.is_empty());

        let project = NewProject {
            title,
            slug,
            description: self.description.trim().to_string(),
            image_url: non_blank(self.image_url),
            category: non_blank(self.category),
            year: self.year,
            impact_metrics: non_blank(self.impact_metrics),
            video_url: non_blank(self.video_url),
        };

        project.validate()?;
        Ok(project)
    }
}

/// Partial update for a project. For the optional columns, `null` clears the value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectChanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub slug: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub category: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub year: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub impact_metrics: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub video_url: Option<Option<String>>,
}

impl ProjectChanges {
    pub fn is_empty(&self) -> bool {
        *self == ProjectChanges::default()
    }

    pub fn normalized(self) -> Result<Self> {
        if self.is_empty() {
            return Err(AppError::BadRequest("No updates provided".to_string()));
        }

        let title = self.title.map(|t| t.trim().to_string());
        if let Some(title) = &title {
            if title.is_empty() || title.chars().count() > 200 {
                return Err(AppError::BadRequest(
                    "Title must be between 1 and 200 characters".to_string(),
                ));
            }
        }

        if let Some(Some(year)) = self.year {
            if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
                return Err(AppError::BadRequest("Year is out of range".to_string()));
            }
        }

        Ok(Self {
            title,
            description: self.description.map(|d| d.trim().to_string()),
            slug: self
                .slug
                .map(|s| non_blank(s).map(|s| slugify(&s)).filter(|s| !s.is_empty())),
            image_url: self.image_url.map(non_blank),
            category: self.category.map(non_blank),
            year: self.year,
            impact_metrics: self.impact_metrics.map(non_blank),
            video_url: self.video_url.map(non_blank),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProjectFilter {
    pub category: Option<String>,
    pub limit: Option<usize>,
}

impl ProjectFilter {
    pub fn matches(&self, project: &Project) -> bool {
        match self.category() {
            None => true,
            Some(category) => project.category.as_deref() == Some(category),
        }
    }

    /// Category to filter on, with the catch-all `All` treated as no filter.
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref().filter(|c| *c != "All" && !c.is_empty())
    }
}

/// `All` followed by each distinct category in first-seen order.
pub fn categories(projects: &[Project]) -> Vec<String> {
    let mut out = vec!["All".to_string()];
    for category in projects.iter().filter_map(|p| p.category.as_ref()) {
        if !out.contains(category) {
            out.push(category.clone());
        }
    }
    out
}

pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_dash = false;

    for c in input.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    slug
}
