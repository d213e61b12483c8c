//! Page composition.
//!
//! Two strategies, selected by scope:
//!
//! - layout chrome (navbar + footer): independent concurrent fetches, no
//!   cross-section fallback;
//! - home body: a strict three-tier cascade — consolidated document, then
//!   the legacy site-settings aggregate, then direct per-section queries
//!   for whatever is still unresolved.
//!
//! The composer performs no retries and returns no errors. The content
//! client's never-fail contract plus the cascade is the entire resilience
//! story; the worst case is an all-default page.

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::domain::content::{
    FooterContent, HeroSection, HomeDocument, NavbarContent, PageContent, ProjectsSection,
    SiteChrome, SiteSettingsDocument, SkillsSection, WorkHistorySection,
};
use crate::infra::content::{ContentClient, SectionQuery, queries};

pub struct PageComposer {
    client: ContentClient,
}

impl PageComposer {
    pub fn new(client: ContentClient) -> Self {
        Self { client }
    }

    /// Resolve the layout scope. Navbar and footer degrade independently;
    /// neither can prevent the other, or the body, from rendering.
    pub async fn compose_chrome(&self) -> SiteChrome {
        let (navbar, footer) = tokio::join!(
            self.client.fetch::<NavbarContent>(&queries::NAVBAR, &[]),
            self.client.fetch::<FooterContent>(&queries::FOOTER, &[]),
        );

        SiteChrome {
            navbar: navbar.filter(NavbarContent::is_present),
            footer: footer.filter(FooterContent::is_present),
        }
    }

    /// Resolve the home-route body through the fallback cascade.
    ///
    /// Tiers run in strict sequence; a section filled by one tier is never
    /// consulted in a lower one, and tier 3 is issued only for the gaps
    /// tier 2 left.
    pub async fn compose_home(&self) -> PageContent {
        // Tier 1: the consolidated document. Presence hinges on the
        // identifier marker alone.
        if let Some(doc) = self
            .client
            .fetch::<HomeDocument>(&queries::HOME_PAGE, &[])
            .await
            && doc.is_present()
        {
            return PageContent {
                hero: doc.hero,
                skills: doc.skills_section,
                work_history: doc.work_history_section,
                projects: doc.projects_section,
            };
        }

        // Tier 2: the legacy aggregate's expanded references.
        let mut page = PageContent::default();
        if let Some(settings) = self
            .client
            .fetch::<SiteSettingsDocument>(&queries::SITE_SETTINGS, &[])
            .await
            && settings.is_present()
        {
            page.hero = settings.hero;
            page.skills = settings.skills_section;
            page.work_history = settings.work_history_section;
            page.projects = settings.projects_section;
        }

        if page.is_complete() {
            return page;
        }

        debug!(
            target: "solara::compose",
            hero = page.hero.is_some(),
            skills = page.skills.is_some(),
            work_history = page.work_history.is_some(),
            projects = page.projects.is_some(),
            "aggregate left gaps; issuing per-section queries"
        );

        // Tier 3: direct queries, concurrently, only for unresolved
        // sections. Aggregate values take precedence over anything fetched
        // here, which `Option::or` preserves.
        let (hero, skills, work_history, projects) = tokio::join!(
            self.fetch_gap::<HeroSection>(page.hero.is_none(), &queries::HERO),
            self.fetch_gap::<SkillsSection>(page.skills.is_none(), &queries::SKILLS_SECTION),
            self.fetch_gap::<WorkHistorySection>(
                page.work_history.is_none(),
                &queries::WORK_HISTORY_SECTION,
            ),
            self.fetch_gap::<ProjectsSection>(page.projects.is_none(), &queries::PROJECTS_SECTION),
        );

        page.hero = page.hero.or(hero);
        page.skills = page.skills.or(skills);
        page.work_history = page.work_history.or(work_history);
        page.projects = page.projects.or(projects);
        page
    }

    async fn fetch_gap<T: DeserializeOwned>(
        &self,
        unresolved: bool,
        query: &SectionQuery,
    ) -> Option<T> {
        if !unresolved {
            return None;
        }
        self.client.fetch(query, &[]).await
    }
}
