//! Recommendation engine implementation
//!
//! The engine is an explicit immutable snapshot built once from the loaded
//! dataset: plan catalog, user profiles, interaction matrix, feature space
//! and popularity counts. Every query is a pure read against that
//! snapshot; none of the operations can fail, they degrade to documented
//! fallbacks instead.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use crate::domain::plan::{Plan, PlanId};
use crate::domain::subscription::Subscription;
use crate::domain::user::UserId;
use crate::profile::UserProfile;

use super::features::FeatureSpace;
use super::interactions::{derive_interactions, InteractionMatrix};
use super::scoring;
use super::types::{Recommendation, Strategy};
use super::{NEIGHBORHOOD_SIZE, POPULAR_PLAN_SCORE};

pub struct RecommendationEngine {
    plans: Vec<Plan>,
    plan_index: HashMap<PlanId, usize>,
    profiles: Vec<UserProfile>,
    profile_index: HashMap<UserId, usize>,
    matrix: InteractionMatrix,
    features: FeatureSpace,
    /// (plan, subscription count), sorted by descending count then
    /// ascending plan identifier.
    popularity: Vec<(PlanId, usize)>,
}

impl RecommendationEngine {
    /// Build the immutable query snapshot. Profiles come from the profile
    /// builder so the caller controls the user ordering; the matrix,
    /// feature space and popularity counts are derived here.
    pub fn new(
        plans: &[Plan],
        subscriptions: &[Subscription],
        profiles: &[UserProfile],
    ) -> Self {
        let interactions = derive_interactions(subscriptions);
        let matrix = InteractionMatrix::from_interactions(&interactions);
        let features = FeatureSpace::from_plans(plans);

        let plan_index =
            plans.iter().enumerate().map(|(idx, plan)| (plan.id.clone(), idx)).collect();
        let profile_index = profiles
            .iter()
            .enumerate()
            .map(|(idx, profile)| (profile.user_id.clone(), idx))
            .collect();

        Self {
            plans: plans.to_vec(),
            plan_index,
            profiles: profiles.to_vec(),
            profile_index,
            matrix,
            features,
            popularity: popularity_counts(subscriptions),
        }
    }

    pub fn profile(&self, user_id: &UserId) -> Option<&UserProfile> {
        self.profile_index.get(user_id).map(|&idx| &self.profiles[idx])
    }

    pub fn plan(&self, plan_id: &PlanId) -> Option<&Plan> {
        self.plan_index.get(plan_id).map(|&idx| &self.plans[idx])
    }

    pub fn interaction_matrix(&self) -> &InteractionMatrix {
        &self.matrix
    }

    /// Dispatch by strategy name; the popularity fallback is reachable
    /// through `popular` directly.
    pub fn recommend(
        &self,
        strategy: Strategy,
        user_id: &UserId,
        top_n: usize,
    ) -> Vec<Recommendation> {
        match strategy {
            Strategy::Content => self.content(user_id, top_n),
            Strategy::Collaborative => self.collaborative(user_id, top_n),
            Strategy::Hybrid => self.hybrid(user_id, top_n),
        }
    }

    /// Content-based scoring: match the user's profile attributes against
    /// every plan they do not currently hold. Unknown users fall through
    /// to the popularity ranking.
    pub fn content(&self, user_id: &UserId, top_n: usize) -> Vec<Recommendation> {
        let Some(profile) = self.profile(user_id) else {
            return self.popular(top_n);
        };

        let user_price_norm = self.features.normalize_price(profile.avg_price_preference);
        let current: HashSet<&PlanId> = profile.current_plans.iter().collect();

        let mut scored: Vec<Recommendation> = self
            .plans
            .iter()
            .filter(|plan| !current.contains(&plan.id))
            .map(|plan| {
                let plan_price_norm =
                    self.features.plan_price_norm(&plan.id).unwrap_or_default();
                let score = scoring::content_score(
                    user_price_norm,
                    plan_price_norm,
                    profile.prefers_auto_renewal,
                    plan.auto_renewal.allowed(),
                    profile.preferred_type,
                    plan.price,
                );
                Recommendation::for_plan(plan, score)
            })
            .collect();

        sort_descending(&mut scored);
        scored.truncate(top_n);
        scored
    }

    /// Neighbor-based collaborative scoring. Preconditions are explicit:
    /// the user must appear in the interaction matrix and at least two
    /// users must be present, otherwise the result is a defined empty
    /// sequence.
    pub fn collaborative(&self, user_id: &UserId, top_n: usize) -> Vec<Recommendation> {
        let Some(target) = self.matrix.row_of(user_id) else {
            return Vec::new();
        };
        if self.matrix.user_count() < 2 {
            return Vec::new();
        }
        let Some(profile) = self.profile(user_id) else {
            return Vec::new();
        };

        let k = NEIGHBORHOOD_SIZE.min(self.matrix.user_count());
        let neighbors = scoring::nearest_rows(self.matrix.values(), target, k);
        let current: HashSet<&PlanId> = profile.current_plans.iter().collect();

        let mut scored = Vec::new();
        for (col, plan_id) in self.matrix.plans().iter().enumerate() {
            if current.contains(plan_id) {
                continue;
            }
            // A positive cell means the user already rated this plan.
            if self.matrix.row(target)[col] > 0.0 {
                continue;
            }

            let neighbor_ratings: Vec<f64> = neighbors
                .iter()
                .map(|&row| self.matrix.row(row)[col])
                .filter(|&rating| rating > 0.0)
                .collect();
            if neighbor_ratings.is_empty() {
                continue;
            }

            let Some(plan) = self.plan(plan_id) else {
                continue;
            };

            let avg = neighbor_ratings.iter().sum::<f64>() / neighbor_ratings.len() as f64;
            scored.push(Recommendation::for_plan(plan, avg / 5.0));
        }

        sort_descending(&mut scored);
        scored.truncate(top_n);
        scored
    }

    /// Hybrid scoring: union of oversampled content and collaborative
    /// candidates, blended 70/30. A plan seen by only one source
    /// contributes only that source's weighted term.
    pub fn hybrid(&self, user_id: &UserId, top_n: usize) -> Vec<Recommendation> {
        let content = self.content(user_id, top_n * 2);
        let collaborative = self.collaborative(user_id, top_n * 2);

        struct Blend {
            recommendation: Recommendation,
            content: Option<f64>,
            collaborative: Option<f64>,
        }

        let mut order: Vec<PlanId> = Vec::new();
        let mut blends: HashMap<PlanId, Blend> = HashMap::new();

        for rec in content {
            order.push(rec.plan_id.clone());
            blends.insert(
                rec.plan_id.clone(),
                Blend { content: Some(rec.score), collaborative: None, recommendation: rec },
            );
        }
        for rec in collaborative {
            match blends.get_mut(&rec.plan_id) {
                Some(blend) => blend.collaborative = Some(rec.score),
                None => {
                    order.push(rec.plan_id.clone());
                    blends.insert(
                        rec.plan_id.clone(),
                        Blend {
                            content: None,
                            collaborative: Some(rec.score),
                            recommendation: rec,
                        },
                    );
                }
            }
        }

        // Combine in first-seen order so the stable sort keeps insertion
        // order among score ties.
        let mut combined: Vec<Recommendation> = order
            .into_iter()
            .filter_map(|plan_id| blends.remove(&plan_id))
            .map(|blend| {
                let mut rec = blend.recommendation;
                rec.score = scoring::combine_hybrid(blend.content, blend.collaborative);
                rec
            })
            .collect();

        sort_descending(&mut combined);
        combined.truncate(top_n);
        combined
    }

    /// Population-wide popularity ranking with a fixed placeholder score.
    pub fn popular(&self, top_n: usize) -> Vec<Recommendation> {
        self.popularity
            .iter()
            .filter_map(|(plan_id, _)| self.plan(plan_id))
            .map(|plan| Recommendation::for_plan(plan, POPULAR_PLAN_SCORE))
            .take(top_n)
            .collect()
    }
}

fn popularity_counts(subscriptions: &[Subscription]) -> Vec<(PlanId, usize)> {
    let mut counts: HashMap<&PlanId, usize> = HashMap::new();
    for subscription in subscriptions {
        *counts.entry(&subscription.plan_id).or_insert(0) += 1;
    }

    let mut ranked: Vec<(PlanId, usize)> =
        counts.into_iter().map(|(plan_id, count)| (plan_id.clone(), count)).collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked
}

fn sort_descending(recommendations: &mut [Recommendation]) {
    recommendations
        .sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::plan::AutoRenewal;
    use crate::domain::subscription::{SubscriptionStatus, SubscriptionType};
    use crate::domain::user::{User, UserStatus};
    use crate::profile::build_user_profiles;
    use crate::recommend::{COLLAB_WEIGHT, CONTENT_WEIGHT};

    fn user(id: &str) -> User {
        User {
            id: UserId(id.to_string()),
            name: format!("User {id}"),
            status: UserStatus::Active,
        }
    }

    fn plan(id: &str, price: f64, renewal: AutoRenewal) -> Plan {
        Plan {
            id: PlanId(id.to_string()),
            name: format!("Plan {id}"),
            price,
            auto_renewal: renewal,
        }
    }

    fn sub(
        user_id: &str,
        plan_id: &str,
        status: SubscriptionStatus,
        kind: SubscriptionType,
    ) -> Subscription {
        Subscription {
            user_id: UserId(user_id.to_string()),
            plan_id: PlanId(plan_id.to_string()),
            status,
            subscription_type: kind,
            start_date: None,
            last_billed_date: None,
            last_renewed_date: None,
        }
    }

    fn engine_for(
        users: Vec<User>,
        subscriptions: Vec<Subscription>,
        plans: Vec<Plan>,
    ) -> RecommendationEngine {
        let profiles = build_user_profiles(&users, &subscriptions, &plans);
        RecommendationEngine::new(&plans, &subscriptions, &profiles)
    }

    #[test]
    fn content_never_recommends_a_currently_held_plan() {
        let engine = engine_for(
            vec![user("u1")],
            vec![sub("u1", "p1", SubscriptionStatus::Active, SubscriptionType::Monthly)],
            vec![
                plan("p1", 30.0, AutoRenewal::Yes),
                plan("p2", 40.0, AutoRenewal::Yes),
                plan("p3", 50.0, AutoRenewal::No),
            ],
        );

        let recs = engine.content(&UserId("u1".into()), 10);
        assert!(!recs.is_empty());
        assert!(recs.iter().all(|rec| rec.plan_id != PlanId("p1".into())));
    }

    #[test]
    fn content_for_unknown_user_falls_back_to_popularity() {
        let engine = engine_for(
            vec![user("u1")],
            vec![
                sub("u1", "p2", SubscriptionStatus::Active, SubscriptionType::Monthly),
                sub("u1", "p2", SubscriptionStatus::Paused, SubscriptionType::Monthly),
                sub("u1", "p1", SubscriptionStatus::Active, SubscriptionType::Monthly),
            ],
            vec![plan("p1", 30.0, AutoRenewal::Yes), plan("p2", 40.0, AutoRenewal::Yes)],
        );

        let recs = engine.content(&UserId("ghost".into()), 5);
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].plan_id, PlanId("p2".into()));
        assert!(recs.iter().all(|rec| rec.score == POPULAR_PLAN_SCORE));
    }

    #[test]
    fn collaborative_returns_empty_with_fewer_than_two_users() {
        let engine = engine_for(
            vec![user("u1")],
            vec![sub("u1", "p1", SubscriptionStatus::Active, SubscriptionType::Monthly)],
            vec![plan("p1", 30.0, AutoRenewal::Yes), plan("p2", 40.0, AutoRenewal::Yes)],
        );

        assert!(engine.collaborative(&UserId("u1".into()), 5).is_empty());
    }

    #[test]
    fn collaborative_returns_empty_for_user_outside_matrix() {
        let engine = engine_for(
            vec![user("u1"), user("u2"), user("u3")],
            vec![
                sub("u1", "p1", SubscriptionStatus::Active, SubscriptionType::Monthly),
                sub("u2", "p1", SubscriptionStatus::Active, SubscriptionType::Monthly),
            ],
            vec![plan("p1", 30.0, AutoRenewal::Yes)],
        );

        // u3 has a profile but never subscribed, so it has no matrix row.
        assert!(engine.collaborative(&UserId("u3".into()), 5).is_empty());
    }

    #[test]
    fn collaborative_averages_nonzero_neighbor_ratings() {
        // u1 and u2 share p1; u2 also rates p2. p2 is unrated and unheld by
        // u1, so its score is u2's rating of p2 divided by 5.
        let subscriptions = vec![
            sub("u1", "p1", SubscriptionStatus::Active, SubscriptionType::Monthly),
            sub("u2", "p1", SubscriptionStatus::Active, SubscriptionType::Monthly),
            sub("u2", "p2", SubscriptionStatus::Active, SubscriptionType::Yearly),
        ];
        let engine = engine_for(
            vec![user("u1"), user("u2")],
            subscriptions,
            vec![plan("p1", 30.0, AutoRenewal::Yes), plan("p2", 60.0, AutoRenewal::Yes)],
        );

        let recs = engine.collaborative(&UserId("u1".into()), 5);
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].plan_id, PlanId("p2".into()));
        assert!((recs[0].score - 5.0 / 5.0).abs() < 1e-12);
    }

    #[test]
    fn collaborative_skips_plans_no_neighbor_rated() {
        let subscriptions = vec![
            sub("u1", "p1", SubscriptionStatus::Active, SubscriptionType::Monthly),
            sub("u2", "p1", SubscriptionStatus::Active, SubscriptionType::Monthly),
        ];
        // p2 exists in the catalog but has no interactions at all, so it
        // never enters the matrix and cannot be collaboratively scored.
        let engine = engine_for(
            vec![user("u1"), user("u2")],
            subscriptions,
            vec![plan("p1", 30.0, AutoRenewal::Yes), plan("p2", 60.0, AutoRenewal::Yes)],
        );

        assert!(engine.collaborative(&UserId("u1".into()), 5).is_empty());
    }

    #[test]
    fn hybrid_blends_shared_plans_and_passes_through_single_source_plans() {
        let subscriptions = vec![
            sub("u1", "p1", SubscriptionStatus::Active, SubscriptionType::Monthly),
            sub("u2", "p1", SubscriptionStatus::Active, SubscriptionType::Monthly),
            sub("u2", "p2", SubscriptionStatus::Active, SubscriptionType::Monthly),
        ];
        let plans = vec![
            plan("p1", 30.0, AutoRenewal::Yes),
            plan("p2", 35.0, AutoRenewal::Yes),
            plan("p3", 90.0, AutoRenewal::No),
        ];
        let engine = engine_for(vec![user("u1"), user("u2")], subscriptions, plans);

        let user_id = UserId("u1".into());
        let content = engine.content(&user_id, 10);
        let collaborative = engine.collaborative(&user_id, 10);
        let hybrid = engine.hybrid(&user_id, 5);

        let content_p2 = content.iter().find(|r| r.plan_id == PlanId("p2".into())).unwrap();
        let collab_p2 =
            collaborative.iter().find(|r| r.plan_id == PlanId("p2".into())).unwrap();
        let hybrid_p2 = hybrid.iter().find(|r| r.plan_id == PlanId("p2".into())).unwrap();
        let expected = content_p2.score * CONTENT_WEIGHT + collab_p2.score * COLLAB_WEIGHT;
        assert!((hybrid_p2.score - expected).abs() < 1e-12);

        // p3 only appears in the content results.
        assert!(collaborative.iter().all(|r| r.plan_id != PlanId("p3".into())));
        let content_p3 = content.iter().find(|r| r.plan_id == PlanId("p3".into())).unwrap();
        let hybrid_p3 = hybrid.iter().find(|r| r.plan_id == PlanId("p3".into())).unwrap();
        assert!((hybrid_p3.score - content_p3.score * CONTENT_WEIGHT).abs() < 1e-12);
    }

    #[test]
    fn popular_ranks_by_count_then_plan_id() {
        let subscriptions = vec![
            sub("u1", "p2", SubscriptionStatus::Active, SubscriptionType::Monthly),
            sub("u2", "p2", SubscriptionStatus::Paused, SubscriptionType::Monthly),
            sub("u1", "p3", SubscriptionStatus::Active, SubscriptionType::Monthly),
            sub("u2", "p1", SubscriptionStatus::Active, SubscriptionType::Monthly),
        ];
        let plans = vec![
            plan("p1", 30.0, AutoRenewal::Yes),
            plan("p2", 40.0, AutoRenewal::Yes),
            plan("p3", 50.0, AutoRenewal::No),
        ];
        let engine = engine_for(vec![user("u1"), user("u2")], subscriptions, plans);

        let recs = engine.popular(5);
        let ids: Vec<&str> = recs.iter().map(|rec| rec.plan_id.0.as_str()).collect();
        // p2 has two subscriptions; p1 and p3 tie on one and break by id.
        assert_eq!(ids, vec!["p2", "p1", "p3"]);
        assert!(recs.iter().all(|rec| rec.score == POPULAR_PLAN_SCORE));
    }

    #[test]
    fn popular_skips_plans_missing_from_catalog() {
        let subscriptions = vec![
            sub("u1", "ghost", SubscriptionStatus::Active, SubscriptionType::Monthly),
            sub("u1", "p1", SubscriptionStatus::Active, SubscriptionType::Monthly),
        ];
        let engine = engine_for(
            vec![user("u1")],
            subscriptions,
            vec![plan("p1", 30.0, AutoRenewal::Yes)],
        );

        let recs = engine.popular(5);
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].plan_id, PlanId("p1".into()));
    }
}
