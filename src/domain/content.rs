//! Content documents as the headless store delivers them, plus the
//! normalized aggregates the composer hands to the presentation layer.
//!
//! Every field below is independently optional: an absent field means "use
//! the compiled-in default", never an error. Documents carry an `_id`
//! presence marker; a fetch that succeeds but yields no identifier is
//! treated exactly like a missing document.

use serde::{Deserialize, Serialize};

/// Resolved image reference (asset URL plus alt text).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageRef {
    pub url: Option<String>,
    pub alt: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HeroSection {
    pub badge_text: Option<String>,
    pub main_heading: Option<String>,
    pub highlighted_text: Option<String>,
    pub description: Option<String>,
    pub button_text: Option<String>,
    pub avatar: Option<ImageRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Skill {
    pub name: Option<String>,
    pub image: Option<ImageRef>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SkillsSection {
    pub badge_text: Option<String>,
    pub main_heading: Option<String>,
    pub sub_heading: Option<String>,
    pub skills: Vec<Skill>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkItem {
    pub period: Option<String>,
    pub role: Option<String>,
    pub company: Option<String>,
    pub description: Option<String>,
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkHistorySection {
    pub title: Option<String>,
    pub work_items: Vec<WorkItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Project {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<ImageRef>,
    pub link: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectsSection {
    pub title: Option<String>,
    pub projects: Vec<Project>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NavLink {
    pub title: Option<String>,
    pub link: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SocialLink {
    pub name: Option<String>,
    pub icon_name: Option<String>,
    pub icon: Option<ImageRef>,
    pub link: Option<String>,
}

/// Navigation document for the layout scope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NavbarContent {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: Option<String>,
    pub logo: Option<ImageRef>,
    pub nav_links: Vec<NavLink>,
    pub social_links: Vec<SocialLink>,
    pub source_code_link: Option<String>,
}

impl NavbarContent {
    pub fn is_present(&self) -> bool {
        !self.id.trim().is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FooterLink {
    pub name: Option<String>,
    pub icon_name: Option<String>,
    pub icon: Option<ImageRef>,
    pub link: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FooterColumn {
    pub title: Option<String>,
    pub links: Vec<FooterLink>,
}

/// Footer document for the layout scope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FooterContent {
    #[serde(rename = "_id")]
    pub id: String,
    pub columns: Vec<FooterColumn>,
    pub copyright_text: Option<String>,
}

impl FooterContent {
    pub fn is_present(&self) -> bool {
        !self.id.trim().is_empty()
    }
}

/// Consolidated whole-page document (tier 1 of the body cascade).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HomeDocument {
    #[serde(rename = "_id")]
    pub id: String,
    pub hero: Option<HeroSection>,
    pub skills_section: Option<SkillsSection>,
    pub work_history_section: Option<WorkHistorySection>,
    pub projects_section: Option<ProjectsSection>,
}

impl HomeDocument {
    /// Presence is decided solely by the identifier marker; a document
    /// without one is interchangeable with a failed fetch.
    pub fn is_present(&self) -> bool {
        !self.id.trim().is_empty()
    }
}

/// Legacy per-section aggregate (tier 2): a site-settings document whose
/// section fields are expanded references to standalone section documents.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SiteSettingsDocument {
    #[serde(rename = "_id")]
    pub id: String,
    pub hero: Option<HeroSection>,
    pub skills_section: Option<SkillsSection>,
    pub work_history_section: Option<WorkHistorySection>,
    pub projects_section: Option<ProjectsSection>,
}

impl SiteSettingsDocument {
    pub fn is_present(&self) -> bool {
        !self.id.trim().is_empty()
    }
}

/// Render-ready body content for the home route.
///
/// Built fresh on every cache miss, never mutated after composition. Each
/// section is filled by at most one cascade tier.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageContent {
    pub hero: Option<HeroSection>,
    pub skills: Option<SkillsSection>,
    pub work_history: Option<WorkHistorySection>,
    pub projects: Option<ProjectsSection>,
}

impl PageContent {
    pub fn is_complete(&self) -> bool {
        self.hero.is_some()
            && self.skills.is_some()
            && self.work_history.is_some()
            && self.projects.is_some()
    }
}

/// Layout-level chrome, resolved independently of the body sections.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteChrome {
    pub navbar: Option<NavbarContent>,
    pub footer: Option<FooterContent>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presence_requires_nonempty_identifier() {
        let missing = HomeDocument::default();
        assert!(!missing.is_present());

        let blank = HomeDocument {
            id: "   ".to_string(),
            ..HomeDocument::default()
        };
        assert!(!blank.is_present());

        let present = HomeDocument {
            id: "homePage".to_string(),
            ..HomeDocument::default()
        };
        assert!(present.is_present());
    }

    #[test]
    fn store_documents_deserialize_from_wire_names() {
        let value = serde_json::json!({
            "_id": "homePage",
            "hero": { "mainHeading": "Providing", "highlightedText": "the best" },
            "skillsSection": { "skills": [{ "name": "Rust", "width": 80 }] },
            "workHistorySection": { "workItems": [{ "role": "Engineer", "skills": ["Rust"] }] }
        });

        let doc: HomeDocument = serde_json::from_value(value).expect("home document");
        assert!(doc.is_present());
        assert_eq!(
            doc.hero.as_ref().and_then(|h| h.main_heading.as_deref()),
            Some("Providing")
        );
        assert_eq!(
            doc.skills_section.as_ref().map(|s| s.skills.len()),
            Some(1)
        );
        assert!(doc.projects_section.is_none());
    }

    #[test]
    fn page_content_serializes_camel_case() {
        let page = PageContent {
            work_history: Some(WorkHistorySection {
                title: Some("Work".to_string()),
                work_items: Vec::new(),
            }),
            ..PageContent::default()
        };

        let value = serde_json::to_value(&page).expect("serialize page content");
        assert!(value.get("workHistory").is_some());
        assert!(value.get("hero").expect("hero key").is_null());
    }
}
