//! The query catalog: every read the server issues against the content
//! store, with its projection and freshness policy.
//!
//! Body-section queries use a short TTL so editorial changes surface on
//! their own; layout queries are tag-scoped and refresh only when the
//! revalidation gateway signals the `layout` scope.

use std::time::Duration;

use super::{Freshness, SectionQuery};

pub const LAYOUT_TAG: &str = "layout";

const BODY_MAX_AGE: Duration = Duration::from_secs(60);

/// Tier 1: the consolidated whole-page document.
pub const HOME_PAGE: SectionQuery = SectionQuery {
    name: "homePage",
    groq: r#"*[_type == "homePage"][0] {
  _id,
  hero { badgeText, mainHeading, highlightedText, description, buttonText,
    "avatar": avatar{ "url": asset->url, alt } },
  skillsSection { badgeText, mainHeading, subHeading,
    skills[] { name, "image": image{ "url": asset->url, alt }, width, height, category } },
  workHistorySection { title,
    workItems[] { period, role, company, description, skills } | order(period desc) },
  projectsSection { title,
    projects[] { title, description, "image": image{ "url": asset->url, alt }, link } }
}"#,
    freshness: Freshness::MaxAge(BODY_MAX_AGE),
};

/// Tier 2: the legacy site-settings aggregate with expanded section
/// references.
pub const SITE_SETTINGS: SectionQuery = SectionQuery {
    name: "siteSettings",
    groq: r#"*[_type == "siteSettings"][0] {
  _id,
  "hero": hero-> { badgeText, mainHeading, highlightedText, description, buttonText,
    "avatar": avatar{ "url": asset->url, alt } },
  "skillsSection": skillsSection-> { badgeText, mainHeading, subHeading,
    skills[] { name, "image": image{ "url": asset->url, alt }, width, height, category } },
  "workHistorySection": workHistorySection-> { title,
    workItems[] { period, role, company, description, skills } | order(period desc) },
  "projectsSection": projectsSection-> { title,
    projects[] { title, description, "image": image{ "url": asset->url, alt }, link } }
}"#,
    freshness: Freshness::MaxAge(BODY_MAX_AGE),
};

// Tier 3: direct per-section reads, issued only for the gaps tier 2 left.

pub const HERO: SectionQuery = SectionQuery {
    name: "hero",
    groq: r#"*[_type == "hero"][0] {
  badgeText, mainHeading, highlightedText, description, buttonText,
  "avatar": avatar{ "url": asset->url, alt }
}"#,
    freshness: Freshness::MaxAge(BODY_MAX_AGE),
};

pub const SKILLS_SECTION: SectionQuery = SectionQuery {
    name: "skillsSection",
    groq: r#"*[_type == "skillsSection"][0] {
  badgeText, mainHeading, subHeading,
  skills[] { name, "image": image{ "url": asset->url, alt }, width, height, category }
}"#,
    freshness: Freshness::MaxAge(BODY_MAX_AGE),
};

pub const WORK_HISTORY_SECTION: SectionQuery = SectionQuery {
    name: "workHistorySection",
    groq: r#"*[_type == "workHistorySection"][0] {
  title,
  workItems[] { period, role, company, description, skills } | order(period desc)
}"#,
    freshness: Freshness::MaxAge(BODY_MAX_AGE),
};

pub const PROJECTS_SECTION: SectionQuery = SectionQuery {
    name: "projectsSection",
    groq: r#"*[_type == "projectsSection"][0] {
  title,
  projects[] { title, description, "image": image{ "url": asset->url, alt }, link }
}"#,
    freshness: Freshness::MaxAge(BODY_MAX_AGE),
};

// Layout scope.

pub const NAVBAR: SectionQuery = SectionQuery {
    name: "navbar",
    groq: r#"*[_type == "navbar"][0] {
  _id, name, "logo": logo{ "url": asset->url, alt },
  navLinks[] { title, link },
  socialLinks[] { name, iconName, "icon": icon{ "url": asset->url, alt }, link },
  sourceCodeLink
}"#,
    freshness: Freshness::Tags(&[LAYOUT_TAG]),
};

pub const FOOTER: SectionQuery = SectionQuery {
    name: "footer",
    groq: r#"*[_type == "footer"][0] {
  _id,
  columns[] { title, links[] { name, iconName, "icon": icon{ "url": asset->url, alt }, link } },
  copyrightText
}"#,
    freshness: Freshness::Tags(&[LAYOUT_TAG]),
};

/// Freshness of every query consulted while assembling the home route.
/// The render cache derives the composed entry's policy from these.
pub fn home_route_freshness() -> [&'static Freshness; 8] {
    [
        &HOME_PAGE.freshness,
        &SITE_SETTINGS.freshness,
        &HERO.freshness,
        &SKILLS_SECTION.freshness,
        &WORK_HISTORY_SECTION.freshness,
        &PROJECTS_SECTION.freshness,
        &NAVBAR.freshness,
        &FOOTER.freshness,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_queries_are_time_based() {
        for query in [
            &HOME_PAGE,
            &SITE_SETTINGS,
            &HERO,
            &SKILLS_SECTION,
            &WORK_HISTORY_SECTION,
            &PROJECTS_SECTION,
        ] {
            assert!(
                matches!(query.freshness, Freshness::MaxAge(_)),
                "{} should be time-based",
                query.name
            );
        }
    }

    #[test]
    fn layout_queries_are_tag_scoped() {
        for query in [&NAVBAR, &FOOTER] {
            match query.freshness {
                Freshness::Tags(tags) => assert!(tags.contains(&LAYOUT_TAG)),
                Freshness::MaxAge(_) => panic!("{} should be tag-scoped", query.name),
            }
        }
    }

    #[test]
    fn consolidated_query_projects_the_presence_marker() {
        assert!(HOME_PAGE.groq.contains("_id"));
        assert!(SITE_SETTINGS.groq.contains("_id"));
    }
}
