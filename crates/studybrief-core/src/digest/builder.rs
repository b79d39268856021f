//! Digest orchestration
//!
//! Lookups run in dependency order: plan row, objectives, resources, practice
//! test, mistakes. Objective and resource lookups for different ids are
//! independent and run with bounded concurrency; results are kept in id
//! order, not completion order.

use super::{Brief, Digest, DigestReason};
use crate::config::{ServiceConfig, TableIds};
use crate::error::CoreError;
use crate::ids::{expand_all, expand_ids};
use crate::models::{plan, study, Mistake, Objective, PlanRow, PracticeTest, Resource};
use crate::notion::{Page, TableSource};
use crate::policy::{FetchPolicies, FetchPolicy};
use futures::stream::{self, StreamExt, TryStreamExt};
use std::collections::HashSet;
use tracing::{debug, info};

/// Open mistakes shown per digest
pub const MAX_MISTAKES: usize = 3;

/// Builds the daily digest from a [`TableSource`]
#[derive(Debug, Clone)]
pub struct DigestBuilder<S> {
    source: S,
    tables: TableIds,
    policies: FetchPolicies,
    concurrency: usize,
    exam_label: String,
}

impl<S: TableSource> DigestBuilder<S> {
    pub fn new(source: S, config: &ServiceConfig) -> Self {
        Self {
            source,
            tables: config.tables.clone(),
            policies: FetchPolicies::default(),
            concurrency: config.fetch_concurrency.max(1),
            exam_label: config.exam_label.clone(),
        }
    }

    /// Override the per-call-site failure policies
    pub fn with_policies(mut self, policies: FetchPolicies) -> Self {
        self.policies = policies;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Build the digest for `date` (`YYYY-MM-DD`).
    ///
    /// Returns `Err` only when a `Required` lookup fails; the caller turns
    /// that into an `error` response.
    pub async fn build(&self, date: &str) -> Result<Digest, CoreError> {
        info!(date, "Building study digest");

        let rows = self.policies.plan.settle(
            "plan",
            date,
            self.source
                .query_by_date(&self.tables.plan, plan::columns::DATE, date)
                .await,
        )?;

        // First row wins if the table holds duplicates for a date
        let Some(page) = rows.first() else {
            info!(date, "No plan row for date");
            return Ok(Digest::skipped(date, DigestReason::NoPlan));
        };

        let plan = PlanRow::from_page(page);
        if plan.is_completed() {
            info!(date, "Both sessions already done");
            return Ok(Digest::skipped(date, DigestReason::Completed));
        }

        let objective_ids = expand_ids(&plan.focus_objectives);
        let objectives = self
            .lookup_each(
                "objective",
                self.policies.objective,
                &self.tables.objectives,
                study::columns::OBJECTIVE_ID,
                &objective_ids,
                Objective::from_page,
            )
            .await?;

        let resource_ids = expand_all(
            [plan.session1_resources.as_str(), plan.session2_resources.as_str()]
                .into_iter()
                .chain(objectives.iter().map(|o| o.primary_resources.as_str())),
        );
        let resources = self
            .lookup_each(
                "resource",
                self.policies.resource,
                &self.tables.resources,
                study::columns::RESOURCE_ID,
                &resource_ids,
                Resource::from_page,
            )
            .await?;

        let practice_test = self.practice_test(date).await?;
        let mistakes = self.open_mistakes(&objective_ids).await?;

        let brief = Brief {
            exam_label: self.exam_label.clone(),
            date: date.to_string(),
            plan,
            objectives,
            resources,
            practice_test,
            mistakes,
        };
        let digest = Digest::ready(&brief);

        info!(
            date,
            objectives = digest.debug.objectives_count,
            objectives_requested = objective_ids.len(),
            resources = digest.debug.resources_count,
            resources_requested = resource_ids.len(),
            practice_test = digest.debug.practice_test_found,
            mistakes = digest.debug.mistakes_found,
            "Study digest ready"
        );
        Ok(digest)
    }

    /// Look up each id by exact text match; ids without a row are left out
    async fn lookup_each<T>(
        &self,
        site: &'static str,
        policy: FetchPolicy,
        table_id: &str,
        column: &str,
        ids: &[String],
        shape: fn(&str, &Page) -> T,
    ) -> Result<Vec<T>, CoreError> {
        // Ids are cloned: futures borrowing from the slice fail the `Send`
        // bound on axum handlers
        let lookups = ids.iter().cloned().map(move |id| async move {
            let id = id.as_str();
            let rows = policy.settle(
                site,
                id,
                self.source.query_by_text(table_id, column, id).await,
            )?;
            if rows.is_empty() {
                debug!(site, id, "No row for id");
            }
            Ok::<_, CoreError>(rows.first().map(|page| shape(id, page)))
        });

        let found: Vec<Option<T>> = stream::iter(lookups)
            .buffered(self.concurrency)
            .try_collect()
            .await?;
        Ok(found.into_iter().flatten().collect())
    }

    async fn practice_test(&self, date: &str) -> Result<Option<PracticeTest>, CoreError> {
        let rows = self.policies.practice_test.settle(
            "practice_test",
            date,
            self.source
                .query_by_date(
                    &self.tables.practice_tests,
                    study::columns::PRACTICE_DATE,
                    date,
                )
                .await,
        )?;
        Ok(rows.first().map(PracticeTest::from_page))
    }

    async fn open_mistakes(&self, objective_ids: &[String]) -> Result<Vec<Mistake>, CoreError> {
        let rows = self.policies.mistakes.settle(
            "mistakes",
            &self.tables.mistakes,
            self.source
                .query_unresolved(&self.tables.mistakes, study::columns::RESOLVED)
                .await,
        )?;
        Ok(correlate_mistakes(
            rows.iter().map(Mistake::from_page).collect(),
            objective_ids,
        ))
    }
}

/// Keep unresolved mistakes tied to one of `objective_ids`, newest first,
/// at most [`MAX_MISTAKES`].
pub fn correlate_mistakes(mut mistakes: Vec<Mistake>, objective_ids: &[String]) -> Vec<Mistake> {
    let wanted: HashSet<&str> = objective_ids.iter().map(String::as_str).collect();

    // Stable: rows without a timestamp keep their service order, after dated ones
    mistakes.sort_by(|a, b| b.created_time.cmp(&a.created_time));

    mistakes
        .into_iter()
        .filter(|m| !m.resolved && wanted.contains(m.objective_id.as_str()))
        .take(MAX_MISTAKES)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mistake(objective_id: &str, created: Option<&str>) -> Mistake {
        Mistake {
            objective_id: objective_id.to_string(),
            summary: format!("{} at {:?}", objective_id, created),
            created_time: created.map(str::to_string),
            ..Default::default()
        }
    }

    fn assert_send<T: Send>(_: &T) {}

    /// Fails to compile if the digest future stops being `Send` for an
    /// arbitrary source, which axum requires of handler futures
    fn build_future_is_send<S: TableSource>(builder: &DigestBuilder<S>) {
        assert_send(&builder.build("2026-03-02"));
    }

    #[test]
    fn test_build_future_is_send() {
        use crate::config::Settings;
        use crate::notion::NotionClient;

        let config = Settings {
            notion_token: Some("secret_abc".to_string()),
            plan_db_id: Some("plan".to_string()),
            objectives_db_id: Some("objectives".to_string()),
            resources_db_id: Some("resources".to_string()),
            practice_db_id: Some("practice".to_string()),
            mistakes_db_id: Some("mistakes".to_string()),
            ..Default::default()
        }
        .service_config()
        .unwrap();
        let client = NotionClient::new(&config.notion).unwrap();
        build_future_is_send(&DigestBuilder::new(client, &config));
    }

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_correlate_filters_to_today() {
        let kept = correlate_mistakes(
            vec![
                mistake("OBJ-01", Some("2026-02-03T00:00:00.000Z")),
                mistake("OBJ-09", Some("2026-02-04T00:00:00.000Z")),
                mistake("OBJ-02", Some("2026-02-01T00:00:00.000Z")),
            ],
            &ids(&["OBJ-01", "OBJ-02"]),
        );
        let objective_ids: Vec<_> = kept.iter().map(|m| m.objective_id.as_str()).collect();
        assert_eq!(objective_ids, vec!["OBJ-01", "OBJ-02"]);
    }

    #[test]
    fn test_correlate_keeps_three_newest() {
        let kept = correlate_mistakes(
            vec![
                mistake("A", Some("2026-01-01T00:00:00.000Z")),
                mistake("A", Some("2026-01-04T00:00:00.000Z")),
                mistake("A", None),
                mistake("A", Some("2026-01-03T00:00:00.000Z")),
                mistake("A", Some("2026-01-02T00:00:00.000Z")),
            ],
            &ids(&["A"]),
        );
        let created: Vec<_> = kept.iter().map(|m| m.created_time.as_deref()).collect();
        assert_eq!(
            created,
            vec![
                Some("2026-01-04T00:00:00.000Z"),
                Some("2026-01-03T00:00:00.000Z"),
                Some("2026-01-02T00:00:00.000Z"),
            ]
        );
    }

    #[test]
    fn test_correlate_drops_resolved() {
        let mut resolved = mistake("A", Some("2026-01-05T00:00:00.000Z"));
        resolved.resolved = true;
        let kept = correlate_mistakes(vec![resolved, mistake("A", None)], &ids(&["A"]));
        assert_eq!(kept.len(), 1);
        assert!(!kept[0].resolved);
    }

    #[test]
    fn test_correlate_with_no_objectives() {
        assert!(correlate_mistakes(vec![mistake("A", None)], &[]).is_empty());
    }
}
